use crate::types::{
    env_parse, env_var, BridgeError, CapabilityError, CapabilityHandle, CapabilityService, OperationKind,
    OperationOptions, Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpCapabilityConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_ms: u64,
}

impl HttpCapabilityConfig {
    /// `None` when no endpoint is configured; the caller then runs on
    /// heuristics alone.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(base_url) = env_var("ACCESS_BRIDGE_AI_BASE_URL") else {
            return Ok(None);
        };
        let model = env_var("ACCESS_BRIDGE_AI_MODEL").ok_or_else(|| {
            BridgeError::Config("ACCESS_BRIDGE_AI_MODEL is required with ACCESS_BRIDGE_AI_BASE_URL".to_string())
        })?;
        let timeout_ms = env_parse::<u64>("ACCESS_BRIDGE_AI_TIMEOUT_MS")?.unwrap_or(30_000);

        Ok(Some(Self {
            base_url,
            api_key: env_var("ACCESS_BRIDGE_AI_API_KEY"),
            model,
            timeout_ms,
        }))
    }
}

/// Capability service backed by an OpenAI-compatible chat completions
/// endpoint. Every operation kind maps to one system prompt; the request
/// options are passed through into that prompt untouched.
#[derive(Debug, Clone)]
pub struct HttpCapabilityService {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl HttpCapabilityService {
    pub fn new(client: reqwest::Client, config: HttpCapabilityConfig) -> Result<Self> {
        let base = Url::parse(config.base_url.trim_end_matches('/'))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(BridgeError::Config(format!("unsupported AI endpoint scheme: {}", base.scheme())));
        }
        let endpoint = Url::parse(&format!("{}/v1/chat/completions", base.as_str().trim_end_matches('/')))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
            model: config.model,
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl CapabilityService for HttpCapabilityService {
    fn name(&self) -> String {
        format!("HTTP capability service ({})", self.model)
    }

    fn supports(&self, _kind: OperationKind) -> bool {
        true
    }

    async fn create(
        &self,
        kind: OperationKind,
        options: &OperationOptions,
    ) -> std::result::Result<Box<dyn CapabilityHandle>, CapabilityError> {
        Ok(Box::new(HttpCapabilityHandle {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            timeout: self.timeout,
            system_prompt: system_prompt(kind, options),
        }))
    }
}

/// System prompt for one capability
pub fn system_prompt(kind: OperationKind, options: &OperationOptions) -> String {
    let task = match kind {
        OperationKind::Summarize => "Summarize the user's text for a reader who needs it simplified.",
        OperationKind::Describe => "Write alt text for an image as instructed by the user.",
        OperationKind::Translate => "Translate the user's text. Reply with the translation only.",
        OperationKind::Rewrite => "Rewrite the user's text in plain, easy to follow language.",
    };

    if options.is_empty() {
        return task.to_string();
    }

    let settings = options
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{task} Settings: {settings}.")
}

struct HttpCapabilityHandle {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
    system_prompt: String,
}

#[async_trait]
impl CapabilityHandle for HttpCapabilityHandle {
    async fn invoke(&self, input: &str) -> std::result::Result<String, CapabilityError> {
        let req = ChatCompletionsRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                Message {
                    role: "user".to_string(),
                    content: input.to_string(),
                },
            ],
            stream: Some(false),
        };

        let mut rb = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(key) = &self.api_key {
            rb = rb.header(reqwest::header::AUTHORIZATION, format!("Bearer {key}"));
        }

        let resp = rb
            .json(&req)
            .send()
            .await
            .map_err(|e| CapabilityError::Invocation(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CapabilityError::Invocation(format!("chat.completions HTTP {status}")));
        }

        let parsed: ChatCompletionsResponse = resp
            .json()
            .await
            .map_err(|e| CapabilityError::Invocation(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CapabilityError::Invocation("chat.completions returned no choices".to_string()))?;

        debug!("AI endpoint answered with {} chars", content.chars().count());
        Ok(content)
    }

    async fn release(&self) -> std::result::Result<(), CapabilityError> {
        // Stateless over HTTP, nothing to tear down.
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionsRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: Message,
}
