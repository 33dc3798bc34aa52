use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ToolSpec;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Structured text generation, the one external capability the engine consumes
///
/// Implementations either return a payload shaped by the tool schema or fail.
/// Payload contents are not trusted; callers repair and re-validate them.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Force a call of `tool` and return its input arguments
    async fn generate_structured(
        &self,
        system: &[String],
        user: &str,
        tool: &ToolSpec,
    ) -> Result<serde_json::Value>;

    /// Free-text completion
    async fn generate_text(&self, system: &[String], user: &str) -> Result<String>;
}

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Model to use (DIGEST_MODEL env var overrides the default)
    pub model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;
        let model = std::env::var("DIGEST_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, model))
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            temperature: 0.1,
            max_tokens: 4096,
        }
    }
}

/// Anthropic API client
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn post(&self, request: &MessagesRequest<'_>) -> Result<MessagesResponse> {
        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error: {} - {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse Anthropic API response")
    }

    fn request<'a>(&'a self, system: &'a [String], user: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            system: system
                .iter()
                .map(|text| SystemBlock {
                    block_type: "text",
                    text,
                })
                .collect(),
            messages: vec![Message {
                role: "user",
                content: user,
            }],
            tools: Vec::new(),
            tool_choice: None,
        }
    }
}

#[async_trait]
impl Generator for AnthropicClient {
    async fn generate_structured(
        &self,
        system: &[String],
        user: &str,
        tool: &ToolSpec,
    ) -> Result<serde_json::Value> {
        let mut request = self.request(system, user);
        request.tools.push(tool);
        request.tool_choice = Some(ToolChoice {
            choice_type: "tool",
            name: &tool.name,
        });

        let response = self.post(&request).await?;

        // Find the tool_use content block
        for content in response.content {
            if content.content_type == "tool_use"
                && content.name.as_deref() == Some(tool.name.as_str())
            {
                if let Some(input) = content.input {
                    debug!("Tool {} returned {} bytes", tool.name, input.to_string().len());
                    return Ok(input);
                }
            }
        }

        anyhow::bail!("No tool_use response found for {}", tool.name)
    }

    async fn generate_text(&self, system: &[String], user: &str) -> Result<String> {
        let request = self.request(system, user);
        let response = self.post(&request).await?;

        response
            .content
            .into_iter()
            .find(|c| c.content_type == "text")
            .map(|c| c.text)
            .context("No text content in response")
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    system: Vec<SystemBlock<'a>>,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<&'a ToolSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemBlock<'a> {
    #[serde(rename = "type")]
    block_type: &'static str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'static str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    input: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::summary_tool;

    #[test]
    fn test_config_defaults() {
        let config = AnthropicConfig::new("key".to_string(), "model-x".to_string());
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn test_tool_request_serialization() {
        let client = AnthropicClient::new(AnthropicConfig::new(
            "key".to_string(),
            "model-x".to_string(),
        ));
        let system = vec!["uno".to_string(), "dos".to_string()];
        let tool = summary_tool();
        let mut request = client.request(&system, "hola");
        request.tools.push(&tool);
        request.tool_choice = Some(ToolChoice {
            choice_type: "tool",
            name: &tool.name,
        });

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "model-x");
        assert_eq!(json["system"].as_array().unwrap().len(), 2);
        assert_eq!(json["system"][1]["text"], "dos");
        assert_eq!(json["tool_choice"]["type"], "tool");
        assert_eq!(json["tool_choice"]["name"], tool.name);
        assert_eq!(json["tools"][0]["name"], tool.name);
        assert!(json["tools"][0]["input_schema"].is_object());
    }

    #[test]
    fn test_text_request_omits_tools() {
        let client = AnthropicClient::new(AnthropicConfig::new(
            "key".to_string(),
            "model-x".to_string(),
        ));
        let system: Vec<String> = Vec::new();
        let json = serde_json::to_value(client.request(&system, "hola")).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["content"], "hola");
    }

    #[test]
    fn test_parse_tool_use_response() {
        let json = r#"{"content": [
            {"type": "text", "text": "ok"},
            {"type": "tool_use", "name": "format_meeting_summary", "input": {"main_points": []}}
        ]}"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content.len(), 2);
        assert_eq!(response.content[1].name.as_deref(), Some("format_meeting_summary"));
        assert!(response.content[1].input.is_some());
    }
}
