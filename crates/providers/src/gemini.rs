use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::error::RequestError;
use shared::settings::ModelTier;
use std::time::Duration;

use crate::CompletionClient;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Fixed instruction prepended to every turn.
const PROMPT_INSTRUCTION: &str = "Answer based on the following web page content.";

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    code: i64,
    message: String,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new() -> Result<Self, RequestError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(45))
            .build()
            .map_err(|e| RequestError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Single-turn prompt: fixed instruction, page text, user question.
///
/// The page context may be empty; the instruction and question are always
/// present so page-less chat keeps working.
fn compose_prompt(user_text: &str, page_context: &str) -> String {
    format!(
        "{PROMPT_INSTRUCTION}\n\n[Page content]: {page_context}\n\n[User question]: {user_text}"
    )
}

/// Classify a response body.
///
/// An `error` object wins over everything else; a body with no usable
/// candidate text is an empty response; otherwise the first candidate's
/// first part is the reply.
fn parse_response(body: &str) -> Result<String, RequestError> {
    let parsed: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| RequestError::Transport(format!("unreadable response body: {e}")))?;

    if let Some(err) = parsed.error {
        return Err(RequestError::Api {
            code: err.code,
            message: err.message,
        });
    }

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or(RequestError::Empty)
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn send(
        &self,
        key: &str,
        user_text: &str,
        page_context: &str,
        tier: ModelTier,
    ) -> Result<String, RequestError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            tier.model_name(),
            key
        );
        let req = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: compose_prompt(user_text, page_context),
                }],
            }],
        };

        tracing::debug!(model = tier.model_name(), "sending completion request");
        let resp = self
            .http
            .post(&url)
            .json(&req)
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(%status, "completion endpoint returned an error status");
        }

        // Error statuses usually still carry a JSON error object; fall back
        // to the bare status line when the body is unreadable.
        parse_response(&body).map_err(|err| match err {
            RequestError::Transport(_) if !status.is_success() => {
                RequestError::Transport(format!("gemini error: {status}"))
            }
            other => other,
        })
    }
}
