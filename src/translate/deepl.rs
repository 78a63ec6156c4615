//! DeepL translation backend.

use crate::config::TranslationConfig;
use crate::error::{Result, StreamsubError};
use crate::translate::Translator;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    text: String,
}

/// Translator backed by the DeepL HTTP API.
///
/// Uses a blocking client with a hard request timeout so a hung backend
/// cannot stall the subtitle relay beyond the configured bound.
pub struct DeepLTranslator {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
}

impl DeepLTranslator {
    /// Builds a client from config. Fails if no API key is configured.
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| StreamsubError::Translation {
                message: "no API key configured".to_string(),
            })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StreamsubError::Translation {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl Translator for DeepLTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .form(&[("text", text), ("target_lang", target_lang)])
            .send()
            .map_err(|e| StreamsubError::Translation {
                message: format!("request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(StreamsubError::Translation {
                message: format!("backend returned status {}", response.status()),
            });
        }

        let parsed: DeepLResponse = response.json().map_err(|e| StreamsubError::Translation {
            message: format!("invalid response body: {e}"),
        })?;

        parsed
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| StreamsubError::Translation {
                message: "empty translation result".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_without_key_is_error() {
        let config = TranslationConfig::default();
        assert!(config.api_key.is_none());
        assert!(DeepLTranslator::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_with_key() {
        let config = TranslationConfig {
            api_key: Some("key:fx".to_string()),
            ..Default::default()
        };
        assert!(DeepLTranslator::from_config(&config).is_ok());
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"translations":[{"detected_source_language":"EN","text":"merhaba"}]}"#;
        let parsed: DeepLResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.translations[0].text, "merhaba");
    }
}
