//! OpenAI-compatible chat completions provider.
//!
//! Sends a short classification prompt and expects a strict-JSON answer
//! (one object or an array of objects). Any transport or parse failure falls
//! back to [`HeuristicAugmenter`] so a flaky endpoint never costs a document
//! its augmentation pass.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::heuristic::HeuristicAugmenter;
use super::{augmented_snippet, Augmenter};
use crate::error::AugmentError;
use crate::rules::{Finding, Regime, Severity};

const PROVIDER: &str = "openai";
/// Characters of document text included in the prompt
const PROMPT_TEXT_LIMIT: usize = 4000;
const SYSTEM_PROMPT: &str = "You are a compliance assistant. Answer in strict JSON.";

/// Remote provider speaking the chat completions protocol
pub struct OpenAiAugmenter {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
    fallback: HeuristicAugmenter,
}

impl OpenAiAugmenter {
    /// Create a provider with a request timeout.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AugmentError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            fallback: HeuristicAugmenter::new(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_api_request(&self, regime: Regime, text: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(regime, text),
                },
            ],
            temperature: 0.1,
        }
    }

    async fn complete(&self, regime: Regime, text: &str) -> Result<Vec<Finding>, AugmentError> {
        let request = self.to_api_request(regime, text);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AugmentError::Api {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| AugmentError::Parse {
            provider: PROVIDER.to_string(),
            message: e.to_string(),
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AugmentError::Parse {
                provider: PROVIDER.to_string(),
                message: "no choices in response".to_string(),
            })?;

        parse_answer(&content, text)
    }
}

#[async_trait]
impl Augmenter for OpenAiAugmenter {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn analyze(&self, regime: Regime, text: &str) -> Result<Vec<Finding>, AugmentError> {
        match self.complete(regime, text).await {
            Ok(findings) => {
                debug!(model = %self.model, count = findings.len(), "Model answered");
                Ok(findings)
            }
            Err(e) => {
                warn!(error = %e, "Model call failed, using heuristic fallback");
                Ok(self.fallback.classify(regime, text))
            }
        }
    }
}

fn build_prompt(regime: Regime, text: &str) -> String {
    let excerpt: String = text.chars().take(PROMPT_TEXT_LIMIT).collect();
    match regime {
        Regime::Gdpr => format!(
            "Task: Determine if text implies GDPR breach-notification timing.\n\
             Return JSON with: label, rule_id, severity (low|medium|high), confidence (0-1), rationale.\n\
             Criteria: mentions notifying regulator/authority/controller AND mentions timing \
             (72 hours, three days, or implied terms like 'promptly'/'undue delay').\n\
             Text:\n{excerpt}"
        ),
        Regime::Soc2 => format!(
            "Task: Identify SOC 2-relevant policy signals for access controls or encryption.\n\
             Return JSON array (0-2 items), fields: label, rule_id, severity, confidence (0-1), rationale.\n\
             Text:\n{excerpt}"
        ),
    }
}

/// One classification item as returned by the model
#[derive(Debug, Deserialize)]
struct ModelItem {
    #[serde(default = "default_rule_id")]
    rule_id: String,
    #[serde(default = "default_label")]
    label: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    rationale: String,
}

fn default_rule_id() -> String {
    "AI-GENERIC".to_string()
}

fn default_label() -> String {
    "AI Finding".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModelAnswer {
    Many(Vec<ModelItem>),
    One(ModelItem),
}

/// Interpret the model's JSON answer as findings.
///
/// Tolerates a Markdown code fence around the JSON.
fn parse_answer(content: &str, text: &str) -> Result<Vec<Finding>, AugmentError> {
    let json = strip_code_fence(content);
    let answer: ModelAnswer = serde_json::from_str(json).map_err(|e| AugmentError::Parse {
        provider: PROVIDER.to_string(),
        message: e.to_string(),
    })?;

    let items = match answer {
        ModelAnswer::Many(items) => items,
        ModelAnswer::One(item) => vec![item],
    };

    let snippet = augmented_snippet(text);
    Ok(items
        .into_iter()
        .map(|item| {
            let severity = item
                .severity
                .as_deref()
                .and_then(Severity::from_string)
                .unwrap_or(Severity::Low);
            Finding::augmented(
                item.rule_id,
                item.label,
                severity,
                item.confidence.unwrap_or(0.5),
                item.rationale,
                snippet.clone(),
            )
        })
        .collect())
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::FindingSource;
    use pretty_assertions::assert_eq;

    fn provider() -> OpenAiAugmenter {
        OpenAiAugmenter::new(
            "test-key",
            "gpt-4o-mini",
            "http://127.0.0.1:9/v1/",
            Duration::from_millis(200),
        )
        .expect("create provider")
    }

    #[test]
    fn test_provider_creation() {
        let p = provider();
        assert_eq!(p.name(), "openai");
        assert_eq!(p.model(), "gpt-4o-mini");
        assert_eq!(p.base_url, "http://127.0.0.1:9/v1");
    }

    #[test]
    fn test_api_request_conversion() {
        let long_text = "x".repeat(5000);
        let request = provider().to_api_request(Regime::Gdpr, &long_text);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1].content.contains("breach-notification"));
        assert!(request.messages[1].content.ends_with(&"x".repeat(PROMPT_TEXT_LIMIT)));
        assert!(!request.messages[1].content.contains(&"x".repeat(PROMPT_TEXT_LIMIT + 1)));
    }

    #[test]
    fn test_parse_single_object() {
        let content = r#"{"rule_id":"GDPR-BREACH-72H-IMPLICIT","label":"Breach","severity":"medium","confidence":0.777,"rationale":"timing implied"}"#;
        let findings = parse_answer(content, "some text").unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "GDPR-BREACH-72H-IMPLICIT");
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].confidence, Some(0.78));
        assert_eq!(findings[0].source, FindingSource::Llm);
        assert_eq!(findings[0].snippet, "some text");
    }

    #[test]
    fn test_parse_fenced_array_with_defaults() {
        let content = "```json\n[{\"severity\":\"bogus\"}, {\"rule_id\":\"SOC2-X\",\"confidence\":0.9}]\n```";
        let findings = parse_answer(content, "t").unwrap();

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].rule_id, "AI-GENERIC");
        assert_eq!(findings[0].label, "AI Finding");
        assert_eq!(findings[0].severity, Severity::Low);
        assert_eq!(findings[0].confidence, Some(0.5));
        assert_eq!(findings[1].rule_id, "SOC2-X");
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(matches!(
            parse_answer("I think this is compliant.", "t"),
            Err(AugmentError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back_to_heuristic() {
        let findings = provider()
            .analyze(Regime::Gdpr, "We will promptly inform regulators as appropriate.")
            .await
            .unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "GDPR-BREACH-72H-IMPLICIT");
    }
}
