//! Configuration types shared by the client and storage crates.

use serde::{Deserialize, Serialize};

/// Model used when neither the secret file nor the environment names one.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Environment variable that overrides the API key from `secret.json`.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable that overrides the model name.
pub const MODEL_ENV: &str = "SIMRUN_MODEL";

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl GeminiConfig {
    /// The configured model, or [`DEFAULT_GEMINI_MODEL`].
    pub fn model(&self) -> &str {
        self.model_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_GEMINI_MODEL)
    }
}

impl SecretConfig {
    /// Applies `GEMINI_API_KEY` / `SIMRUN_MODEL` style overrides.
    ///
    /// The lookup is injected so callers (and tests) decide where values
    /// come from.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty());
        let model = lookup(MODEL_ENV).filter(|model| !model.trim().is_empty());

        match (self.gemini.as_mut(), api_key) {
            (Some(gemini), Some(key)) => gemini.api_key = key,
            (None, Some(key)) => {
                self.gemini = Some(GeminiConfig {
                    api_key: key,
                    model_name: None,
                })
            }
            _ => {}
        }

        if let (Some(gemini), Some(model)) = (self.gemini.as_mut(), model) {
            gemini.model_name = Some(model);
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_secret_json() {
        let config: SecretConfig =
            serde_json::from_str(r#"{"gemini": {"api_key": "abc", "model_name": "gemini-pro"}}"#)
                .unwrap();
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key, "abc");
        assert_eq!(gemini.model(), "gemini-pro");
    }

    #[test]
    fn test_empty_secret_json() {
        let config: SecretConfig = serde_json::from_str("{}").unwrap();
        assert!(config.gemini.is_none());
    }

    #[test]
    fn test_default_model_when_blank() {
        let gemini = GeminiConfig {
            api_key: "k".into(),
            model_name: Some("  ".into()),
        };
        assert_eq!(gemini.model(), DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_env_overrides_file() {
        let config = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "from-file".into(),
                model_name: None,
            }),
        }
        .with_overrides(lookup(&[(API_KEY_ENV, "from-env"), (MODEL_ENV, "gemini-x")]));

        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key, "from-env");
        assert_eq!(gemini.model(), "gemini-x");
    }

    #[test]
    fn test_env_creates_missing_section() {
        let config = SecretConfig::default().with_overrides(lookup(&[(API_KEY_ENV, "k")]));
        assert_eq!(config.gemini.unwrap().api_key, "k");
    }

    #[test]
    fn test_model_override_alone_needs_a_key() {
        let config = SecretConfig::default().with_overrides(lookup(&[(MODEL_ENV, "m")]));
        assert!(config.gemini.is_none());
    }
}
