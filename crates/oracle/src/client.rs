use crate::error::{OracleError, Result};
use crate::oracle::{Oracle, OracleRequest};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Connection settings for an OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Read the API key from `api_key_env`
    pub fn from_env(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key_env: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| OracleError::MissingApiKey(api_key_env.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            timeout,
        })
    }
}

/// Oracle backed by a chat completions API with strict JSON-schema output
pub struct OpenAiOracle {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiOracle {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn body(&self, request: &OracleRequest) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema_name,
                    "description": "Structured response based on JSON schema",
                    "schema": request.schema,
                    "strict": true,
                },
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    refusal: Option<String>,
}

fn first_content(completion: ChatCompletion) -> Result<String> {
    let message = completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or(OracleError::EmptyResponse)?;
    if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
        return Err(OracleError::Refusal(refusal));
    }
    message
        .content
        .filter(|content| !content.trim().is_empty())
        .ok_or(OracleError::EmptyResponse)
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn complete(&self, request: &OracleRequest) -> Result<String> {
        log::debug!(
            "Oracle request to {} ({} prompt bytes)",
            self.config.model,
            request.prompt.len()
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&self.body(request))
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let completion: ChatCompletion = serde_json::from_slice(&bytes)?;
        let content = first_content(completion)?;
        log::debug!("Oracle response: {content}");
        Ok(content)
    }
}
