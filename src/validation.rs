use serde::Serialize;

use crate::models::StrategyInput;

/// A single inline form error, keyed by the field it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Check the three required fields. Topic, goal and audience must be
/// non-empty after trimming; tone and framework are never required. An empty
/// result means the input may be submitted for generation.
pub fn validate(input: &StrategyInput) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.topic.trim().is_empty() {
        errors.push(FieldError { field: "topic", message: "Topic is required" });
    }
    if input.goal.trim().is_empty() {
        errors.push(FieldError { field: "goal", message: "Goal is required" });
    }
    if input.audience.trim().is_empty() {
        errors.push(FieldError { field: "audience", message: "Target Audience is required" });
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tone;
    use pretty_assertions::assert_eq;

    fn input(topic: &str, goal: &str, audience: &str) -> StrategyInput {
        StrategyInput {
            topic: topic.into(),
            goal: goal.into(),
            audience: audience.into(),
            tone: Tone::default(),
            framework: None,
        }
    }

    #[test]
    fn complete_input_passes() {
        let errors = validate(&input("Sustainable Fashion", "Increase brand awareness", "Millennials"));
        assert_eq!(errors, vec![]);
    }

    #[test]
    fn whitespace_only_fields_are_treated_as_empty() {
        let errors = validate(&input("  ", "\t", "Millennials"));
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["topic", "goal"]);
    }

    #[test]
    fn all_required_fields_missing_reports_all_three() {
        let errors = validate(&input("", "", ""));
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["topic", "goal", "audience"]);
    }

    #[test]
    fn tone_and_framework_are_never_required() {
        let mut full = input("Topic", "Goal", "Audience");
        full.framework = Some(String::new());
        assert!(validate(&full).is_empty());
    }

    #[test]
    fn messages_match_the_form_copy() {
        let errors = validate(&input("", "Goal", ""));
        assert_eq!(errors[0].message, "Topic is required");
        assert_eq!(errors[1].message, "Target Audience is required");
    }

    #[test]
    fn field_errors_serialize_for_inline_display() {
        let errors = validate(&input("", "Goal", "Audience"));
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value[0]["field"], "topic");
        assert_eq!(value[0]["message"], "Topic is required");
    }
}
