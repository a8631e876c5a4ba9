use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Desired voice of the generated content. Serialized exactly as shown in the
/// form's select options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Informative,
    Persuasive,
    Witty,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Informative => "Informative",
            Tone::Persuasive => "Persuasive",
            Tone::Witty => "Witty",
        };
        f.write_str(label)
    }
}

/// What the user typed into the form. Immutable once submitted for a
/// generation request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StrategyInput {
    pub topic: String,
    pub goal: String,
    pub audience: String,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KeyPillar {
    pub pillar: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContentIdea {
    pub title: String,
    pub format: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DistributionChannel {
    pub channel: String,
    pub strategy: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Kpi {
    pub metric: String,
    pub goal: String,
}

/// The strategy content produced entirely by the AI service. All four arrays
/// are required; the 3-4 / 5-7 element counts are prompt hints only and never
/// validated here.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedStrategy {
    pub key_pillars: Vec<KeyPillar>,
    pub content_ideas: Vec<ContentIdea>,
    pub distribution_channels: Vec<DistributionChannel>,
    pub kpis: Vec<Kpi>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonetizationIdea {
    /// Free-text reference to one of the strategy's content idea titles.
    /// Not checked against the actual titles.
    pub content_idea_title: String,
    pub method: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutreachTemplate {
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonetizationPlan {
    pub monetization_ideas: Vec<MonetizationIdea>,
    pub outreach_templates: Vec<OutreachTemplate>,
}

/// The single strategy slot: originating input plus the generated content,
/// an id and creation timestamp, and the optional follow-on monetization
/// plan. Replaced wholesale on each new generation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub input: StrategyInput,
    #[serde(flatten)]
    pub generated: GeneratedStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monetization_plan: Option<MonetizationPlan>,
}

impl Strategy {
    /// Build a new strategy from a successful generation. The id is derived
    /// from the creation time in epoch milliseconds.
    pub fn from_generation(input: StrategyInput, generated: GeneratedStrategy) -> Self {
        let created_at = Utc::now();
        Self {
            id: created_at.timestamp_millis().to_string(),
            created_at,
            input,
            generated,
            monetization_plan: None,
        }
    }
}
