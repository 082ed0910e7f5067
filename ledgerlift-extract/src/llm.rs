//! Outbound LLM calls for statement extraction.

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub model: String,
    pub max_tokens: i32,
}

impl LlmConfig {
    pub fn anthropic_default() -> Self {
        Self {
            provider: Provider::Anthropic,
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4000,
        }
    }

    pub fn openai_default() -> Self {
        Self {
            provider: Provider::OpenAI,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 4000,
        }
    }
}

/// Ask the model to extract transactions from plain text (CSV statements).
pub async fn extract_text(cfg: &LlmConfig, api_key: &str, prompt: &str) -> Result<String> {
    match cfg.provider {
        Provider::Anthropic => {
            anthropic_messages(cfg, api_key, UserContent::Text(prompt.to_string())).await
        }
        Provider::OpenAI => openai_complete(cfg, api_key, prompt).await,
    }
}

/// Ask the model to extract transactions from a base64-encoded PDF.
///
/// Document content blocks are an Anthropic messages feature; the OpenAI arm
/// bails with guidance.
pub async fn extract_pdf(
    cfg: &LlmConfig,
    api_key: &str,
    pdf_base64: &str,
    prompt: &str,
) -> Result<String> {
    match cfg.provider {
        Provider::Anthropic => {
            let blocks = vec![
                ContentBlock::Document {
                    source: DocumentSource {
                        kind: "base64".to_string(),
                        media_type: "application/pdf".to_string(),
                        data: pdf_base64.to_string(),
                    },
                },
                ContentBlock::Text {
                    text: prompt.to_string(),
                },
            ];
            anthropic_messages(cfg, api_key, UserContent::Blocks(blocks)).await
        }
        Provider::OpenAI => {
            bail!("pdf statements need the anthropic provider; set [llm] provider = \"anthropic\"")
        }
    }
}

/// User-message content: a plain string for text statements, or document +
/// instruction blocks for PDFs.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum UserContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Document { source: DocumentSource },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct DocumentSource {
    #[serde(rename = "type")]
    kind: String,
    media_type: String,
    data: String,
}

async fn anthropic_messages(
    cfg: &LlmConfig,
    api_key: &str,
    content: UserContent,
) -> Result<String> {
    #[derive(Serialize)]
    struct Msg {
        role: String,
        content: UserContent,
    }

    #[derive(Serialize)]
    struct Req {
        model: String,
        max_tokens: i32,
        messages: Vec<Msg>,
    }

    #[derive(Deserialize)]
    struct Resp {
        content: Vec<RespBlock>,
    }

    #[derive(Deserialize)]
    struct RespBlock {
        #[serde(rename = "type")]
        t: String,
        text: Option<String>,
    }

    let body = Req {
        model: cfg.model.clone(),
        max_tokens: cfg.max_tokens,
        messages: vec![Msg {
            role: "user".to_string(),
            content,
        }],
    };

    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
    headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    debug!(model = %cfg.model, "anthropic messages request");

    let client = reqwest::Client::new();
    let resp = client
        .post("https://api.anthropic.com/v1/messages")
        .headers(headers)
        .json(&body)
        .send()
        .await
        .context("anthropic request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("anthropic error: {status} {txt}");
    }

    let out: Resp = resp.json().await.context("parse anthropic response")?;
    let mut s = String::new();
    for b in out.content {
        if b.t == "text" {
            if let Some(t) = b.text {
                s.push_str(&t);
            }
        }
    }

    if s.trim().is_empty() {
        bail!("no text content in model reply");
    }
    Ok(s.trim().to_string())
}

async fn openai_complete(cfg: &LlmConfig, api_key: &str, prompt: &str) -> Result<String> {
    #[derive(Serialize)]
    struct Msg {
        role: String,
        content: String,
    }

    #[derive(Serialize)]
    struct Req {
        model: String,
        messages: Vec<Msg>,
        temperature: f32,
    }

    #[derive(Deserialize)]
    struct Resp {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: MsgOut,
    }

    #[derive(Deserialize)]
    struct MsgOut {
        content: Option<String>,
    }

    let body = Req {
        model: cfg.model.clone(),
        messages: vec![Msg {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        // Extraction wants determinism, not flair.
        temperature: 0.0,
    };

    debug!(model = %cfg.model, "openai chat request");

    let client = reqwest::Client::new();
    let resp = client
        .post("https://api.openai.com/v1/chat/completions")
        .header(AUTHORIZATION, format!("Bearer {api_key}"))
        .json(&body)
        .send()
        .await
        .context("openai request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("openai error: {status} {txt}");
    }

    let out: Resp = resp.json().await.context("parse openai response")?;
    let content = out
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .unwrap_or_default();

    if content.trim().is_empty() {
        bail!("no text content in model reply");
    }
    Ok(content.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_block_wire_shape() {
        let block = ContentBlock::Document {
            source: DocumentSource {
                kind: "base64".to_string(),
                media_type: "application/pdf".to_string(),
                data: "JVBERi0=".to_string(),
            },
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "document");
        assert_eq!(json["source"]["type"], "base64");
        assert_eq!(json["source"]["media_type"], "application/pdf");
        assert_eq!(json["source"]["data"], "JVBERi0=");
    }

    #[test]
    fn test_text_content_serializes_as_plain_string() {
        let content = UserContent::Text("Parse this".to_string());
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json, serde_json::json!("Parse this"));
    }

    #[tokio::test]
    async fn test_pdf_requires_anthropic() {
        let cfg = LlmConfig::openai_default();
        let err = extract_pdf(&cfg, "sk-test", "JVBERi0=", "extract")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("anthropic"), "{err}");
    }
}
