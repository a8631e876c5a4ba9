use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::{GeneratedStrategy, MonetizationPlan, Strategy, StrategyInput};

pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self { client: Client::new(), api_key, base_url }
    }

    /// One `generateContent` call constrained to JSON output via the declared
    /// response schema. Returns the trimmed text of the first candidate part.
    async fn generate_json(&self, prompt: &str, schema: serde_json::Value) -> Result<String, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, GEMINI_MODEL, self.api_key
        );
        info!("🔗 Making request to: {}", url.replace(&self.api_key, "***"));

        let request_body = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| GeminiError::Http(e.to_string()))?;

        if !status.is_success() {
            error!("❌ Gemini API call failed with status {}: {}", status, response_text);
            return Err(GeminiError::Http(format!("status={} body={}", status, response_text)));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Parse(format!("failed to parse response: {e}")))?;

        extract_text(&parsed)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| GeminiError::Parse("no text content found in response".into()))
    }

    /// Generate the primary content strategy. Transport failures, service
    /// errors and replies that do not match the declared shape all surface
    /// as an error so the caller can report the cause. No retry.
    pub async fn generate_strategy(&self, input: &StrategyInput) -> Result<GeneratedStrategy, GeminiError> {
        let prompt = build_strategy_prompt(input);
        info!("🎯 Generating strategy for topic: {}", input.topic);

        let json_text = self.generate_json(&prompt, strategy_schema()).await?;
        let generated: GeneratedStrategy = serde_json::from_str(&json_text)
            .map_err(|e| GeminiError::Parse(format!("strategy response did not match the expected shape: {e}")))?;

        info!(
            "✅ Strategy generated: {} pillars, {} content ideas, {} channels, {} KPIs",
            generated.key_pillars.len(),
            generated.content_ideas.len(),
            generated.distribution_channels.len(),
            generated.kpis.len()
        );
        Ok(generated)
    }

    /// Generate the follow-on monetization plan for an existing strategy.
    /// Unlike `generate_strategy`, every failure is swallowed into `None`
    /// with the cause logged: a missing plan never invalidates the strategy
    /// it was meant to enrich.
    pub async fn generate_monetization_plan(&self, strategy: &Strategy) -> Option<MonetizationPlan> {
        let prompt = build_monetization_prompt(strategy);
        info!("🎯 Generating monetization plan for topic: {}", strategy.input.topic);

        let json_text = match self.generate_json(&prompt, monetization_schema()).await {
            Ok(text) => text,
            Err(e) => {
                error!("❌ Gemini call for monetization plan failed: {e}");
                return None;
            }
        };

        let plan: MonetizationPlan = match serde_json::from_str(&json_text) {
            Ok(plan) => plan,
            Err(e) => {
                error!("❌ Failed to parse monetization plan JSON: {e}");
                return None;
            }
        };

        // The title reference is free text; mismatches are tolerated.
        for idea in &plan.monetization_ideas {
            let known = strategy
                .generated
                .content_ideas
                .iter()
                .any(|c| c.title == idea.content_idea_title);
            if !known {
                warn!(
                    "Monetization idea references an unknown content idea title: {}",
                    idea.content_idea_title
                );
            }
        }

        info!(
            "✅ Monetization plan generated: {} ideas, {} outreach templates",
            plan.monetization_ideas.len(),
            plan.outreach_templates.len()
        );
        Some(plan)
    }
}

pub fn build_strategy_prompt(input: &StrategyInput) -> String {
    let framework = input
        .framework
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or("Not specified");

    format!(
        "You are an expert content strategist. Create a comprehensive content strategy based on the following details.\n\
         Topic: {}\n\
         Primary Goal: {}\n\
         Target Audience: {}\n\
         Desired Tone: {}\n\
         Optional Framework: {}\n\n\
         Provide a detailed strategy including key content pillars, a list of specific content ideas with formats, \
         recommended distribution channels, and key performance indicators (KPIs) to track success. \
         Return the output in JSON format.",
        input.topic, input.goal, input.audience, input.tone, framework
    )
}

pub fn build_monetization_prompt(strategy: &Strategy) -> String {
    let pillars = strategy
        .generated
        .key_pillars
        .iter()
        .map(|p| p.pillar.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let ideas = strategy
        .generated
        .content_ideas
        .iter()
        .map(|idea| format!("- {} ({})", idea.title, idea.format))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a growth marketing expert specializing in content monetization.\n\
         Based on the following content strategy, create a detailed monetization and outreach plan.\n\
         **Content Strategy to Analyze:**\n\
         - **Topic:** {}\n\
         - **Goal:** {}\n\
         - **Target Audience:** {}\n\
         - **Key Content Pillars:** {}\n\
         - **Content Ideas:**\n\
         {}\n\
         **Your Task:**\n\
         1. Suggest 3-4 specific, actionable monetization ideas. Each idea must be directly tied to one of the content ideas listed above.\n\
         2. Provide 2-3 distinct outreach templates (e.g., for email, LinkedIn) to contact potential sponsors, affiliate partners, or collaborators. \
         The templates should be professional, persuasive, and ready to use with minor edits.\n\
         Return the output in JSON format.",
        strategy.input.topic, strategy.input.goal, strategy.input.audience, pillars, ideas
    )
}

/// Response schema for the strategy call, declared out-of-band so the service
/// is constrained to the `GeneratedStrategy` shape. Descriptions double as
/// generation hints.
pub fn strategy_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "keyPillars": {
                "type": "ARRAY",
                "description": "3-4 main themes or topics to focus content on.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "pillar": { "type": "STRING", "description": "The name of the content pillar." },
                        "description": { "type": "STRING", "description": "A brief description of this pillar." }
                    },
                    "required": ["pillar", "description"]
                }
            },
            "contentIdeas": {
                "type": "ARRAY",
                "description": "A list of 5-7 specific content ideas.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING", "description": "A catchy title for the content piece." },
                        "format": { "type": "STRING", "description": "The format of the content (e.g., Blog Post, Video, Infographic, Social Media Carousel)." },
                        "description": { "type": "STRING", "description": "A brief description of what the content will cover." }
                    },
                    "required": ["title", "format", "description"]
                }
            },
            "distributionChannels": {
                "type": "ARRAY",
                "description": "Recommended channels to distribute the content.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "channel": { "type": "STRING", "description": "The name of the channel (e.g., Blog, LinkedIn, Instagram, YouTube)." },
                        "strategy": { "type": "STRING", "description": "A brief strategy for using this channel." }
                    },
                    "required": ["channel", "strategy"]
                }
            },
            "kpis": {
                "type": "ARRAY",
                "description": "Key Performance Indicators to measure the success of the strategy.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "metric": { "type": "STRING", "description": "The metric to track (e.g., Website Traffic, Lead Generation, Engagement Rate)." },
                        "goal": { "type": "STRING", "description": "A specific goal for this metric." }
                    },
                    "required": ["metric", "goal"]
                }
            }
        },
        "required": ["keyPillars", "contentIdeas", "distributionChannels", "kpis"]
    })
}

/// Response schema for the monetization call.
pub fn monetization_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "monetizationIdeas": {
                "type": "ARRAY",
                "description": "3-4 monetization ideas, each tied to one of the content ideas.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "contentIdeaTitle": { "type": "STRING", "description": "The title of the content idea this method applies to." },
                        "method": { "type": "STRING", "description": "The monetization method (e.g., Affiliate Marketing, Sponsorship, Digital Product)." },
                        "description": { "type": "STRING", "description": "How to apply this method to the content idea." }
                    },
                    "required": ["contentIdeaTitle", "method", "description"]
                }
            },
            "outreachTemplates": {
                "type": "ARRAY",
                "description": "2-3 outreach templates for different platforms.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "platform": { "type": "STRING", "description": "The platform the template is written for (e.g., Email, LinkedIn)." },
                        "subject": { "type": "STRING", "description": "Subject line, where the platform uses one." },
                        "body": { "type": "STRING", "description": "The message body, ready to use with minor edits." }
                    },
                    "required": ["platform", "body"]
                }
            }
        },
        "required": ["monetizationIdeas", "outreachTemplates"]
    })
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Other(serde_json::Value),
}

fn extract_text(resp: &GenerateContentResponse) -> Option<&str> {
    for c in &resp.candidates {
        for p in &c.content.parts {
            if let Part::Text { text } = p {
                return Some(text);
            }
        }
    }
    None
}
