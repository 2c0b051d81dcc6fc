use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Which hosted model handles a request.
///
/// `standard` and `advanced` map to the configured tier identifiers; any
/// other string is passed through to the completion service unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModelChoice {
    #[default]
    Standard,
    Advanced,
    Named(String),
}

impl ModelChoice {
    /// The model identifier sent on the wire.
    pub fn resolve<'a>(&'a self, llm: &'a LlmConfig) -> &'a str {
        match self {
            Self::Standard => &llm.standard_model,
            Self::Advanced => &llm.advanced_model,
            Self::Named(id) => id,
        }
    }
}

impl From<String> for ModelChoice {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "standard" => Self::Standard,
            "advanced" => Self::Advanced,
            _ => Self::Named(trimmed.to_string()),
        }
    }
}

impl From<ModelChoice> for String {
    fn from(value: ModelChoice) -> Self {
        value.to_string()
    }
}

impl FromStr for ModelChoice {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Advanced => f.write_str("advanced"),
            Self::Named(id) => f.write_str(id),
        }
    }
}

/// One entry of the model pick-list.
#[derive(Debug, Clone, Serialize)]
pub struct ModelOption {
    pub choice: ModelChoice,
    pub model: String,
    pub note: &'static str,
    pub default: bool,
}

pub fn model_options(llm: &LlmConfig) -> Vec<ModelOption> {
    vec![
        ModelOption {
            choice: ModelChoice::Standard,
            model: llm.standard_model.clone(),
            note: "Works with all accounts (free and paid).",
            default: true,
        },
        ModelOption {
            choice: ModelChoice::Advanced,
            model: llm.advanced_model.clone(),
            note: "Higher capability; requires a paid account with API access.",
            default: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tiers_case_insensitively() {
        assert_eq!("Standard".parse::<ModelChoice>().unwrap(), ModelChoice::Standard);
        assert_eq!(" advanced ".parse::<ModelChoice>().unwrap(), ModelChoice::Advanced);
        assert_eq!("".parse::<ModelChoice>().unwrap(), ModelChoice::Standard);
    }

    #[test]
    fn unknown_identifiers_pass_through() {
        let choice: ModelChoice = "gpt-4o-mini".parse().unwrap();
        assert_eq!(choice, ModelChoice::Named("gpt-4o-mini".into()));
        assert_eq!(choice.resolve(&LlmConfig::default()), "gpt-4o-mini");
    }

    #[test]
    fn tiers_resolve_through_config() {
        let llm = LlmConfig::default();
        assert_eq!(ModelChoice::default().resolve(&llm), "gpt-3.5-turbo");
        assert_eq!(ModelChoice::Advanced.resolve(&llm), "gpt-4");
    }

    #[test]
    fn serde_uses_plain_strings() {
        let json = serde_json::to_string(&ModelChoice::Advanced).unwrap();
        assert_eq!(json, "\"advanced\"");
        let parsed: ModelChoice = serde_json::from_str("\"gpt-4-turbo\"").unwrap();
        assert_eq!(parsed, ModelChoice::Named("gpt-4-turbo".into()));
    }

    #[test]
    fn pick_list_defaults_to_standard() {
        let options = model_options(&LlmConfig::default());
        let defaults: Vec<_> = options.iter().filter(|o| o.default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].choice, ModelChoice::Standard);
    }
}
