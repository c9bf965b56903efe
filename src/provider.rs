use crate::config::ProviderSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Chat Completion request sent to an OpenAI-compatible endpoint
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// JSON object the model is instructed to reply with
#[derive(Debug, Deserialize)]
struct TranslationPayload {
    key: String,
    translations: BTreeMap<String, String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// A generated key with its translations, keyed by locale identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub key: String,
    pub translations: BTreeMap<String, String>,
}

impl Translation {
    /// Translations as `(locale, text)` pairs, in locale order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.translations
            .iter()
            .map(|(locale, text)| (locale.clone(), text.clone()))
            .collect()
    }
}

/// Why a translation request failed. Never retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Failed to reach translation service: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Translation service error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Translation service returned no choices")]
    EmptyResponse,

    #[error("Malformed translation payload: {0}")]
    MalformedPayload(String),

    #[error("Translation service rejected the request: {0}")]
    Rejected(String),
}

fn build_system_prompt() -> &'static str {
    r#"You are a translation API that ONLY responds in JSON format.
ALWAYS follow this exact format for ANY input:
{
    "key": "<java_properties_key>",
    "translations": {
        "en": "<english_translation>",
        "zh": "<simplified_chinese>",
        "zh_TW": "<traditional_chinese>"
    },
    "status": "success"
}

Key Generation Rules:
1. Use lowercase letters, numbers, and dots (.)
2. Use dots (.) as separators for hierarchical keys
3. Use common prefixes for different modules/categories:
   - error. for error messages
   - success. for success messages
   - info. for information messages
   - label. for UI labels
   - button. for button texts
   - title. for page/section titles
   - msg. for general messages
   - validation. for validation messages"#
}

fn build_user_prompt(text: &str) -> String {
    format!("Translate this text: {}", text)
}

/// Strip a surrounding Markdown code fence (```json ... ```), if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn parse_payload(content: &str) -> Result<Translation, ProviderError> {
    let payload: TranslationPayload = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?;

    if let Some(status) = payload.status.as_deref() {
        if status != "success" {
            let reason = payload.message.unwrap_or_else(|| status.to_string());
            return Err(ProviderError::Rejected(reason));
        }
    }

    let key = payload.key.trim().to_string();
    if key.is_empty() {
        return Err(ProviderError::MalformedPayload("empty key".to_string()));
    }
    if payload.translations.is_empty() {
        return Err(ProviderError::MalformedPayload("no translations".to_string()));
    }

    Ok(Translation {
        key,
        translations: payload.translations,
    })
}

/// Client for an OpenAI-compatible chat completion endpoint that generates
/// a key and translations for a piece of text.
#[derive(Debug, Clone)]
pub struct TranslationProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl TranslationProvider {
    pub fn new(
        settings: &ProviderSettings,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if api_key.is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: settings.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask the model for a key and translations of `text`.
    pub async fn translate(&self, text: &str) -> Result<Translation, ProviderError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: build_system_prompt().to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: build_user_prompt(text),
                },
            ],
            temperature: 0.3,
            stream: false,
        };

        debug!("Requesting translation from {} ({})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ProviderError::Api { status, body });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedPayload(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyResponse)?;

        parse_payload(&content)
    }
}
