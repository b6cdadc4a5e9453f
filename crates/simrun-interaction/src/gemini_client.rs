//! GeminiSimulationClient - simulation service backed by the Gemini REST API.
//!
//! Interactive runs are multi-turn chats: each [`GeminiChat`] keeps the
//! system instruction and every committed user/model turn, and the whole
//! history is sent with each request.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use simrun_core::SimulationError;
use simrun_core::config::SecretConfig;
use simrun_core::execution::{SimulationClient, StartedSession};
use simrun_core::secret::SecretService;
use simrun_infrastructure::SecretServiceImpl;

use crate::prompts;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Simulation client that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiSimulationClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiSimulationClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Loads the API key and model from `secret.json` and the environment.
    pub async fn try_from_env() -> Result<Self, SimulationError> {
        let service = SecretServiceImpl::new(None).map_err(|e| {
            SimulationError::Configuration(format!("Failed to initialize secret service: {e}"))
        })?;

        let secrets = service.load_secrets().await.map_err(|e| {
            SimulationError::Configuration(format!("Failed to load secret.json: {e}"))
        })?;

        Self::from_secrets(&secrets).map_err(|err| match err {
            SimulationError::Configuration(message) => SimulationError::Configuration(format!(
                "{message} ({})",
                service.path().display()
            )),
            other => other,
        })
    }

    /// Builds a client from already loaded secrets.
    pub fn from_secrets(secrets: &SecretConfig) -> Result<Self, SimulationError> {
        let gemini = secrets
            .gemini
            .as_ref()
            .filter(|gemini| !gemini.api_key.trim().is_empty())
            .ok_or_else(|| {
                SimulationError::Configuration(
                    "Gemini API key not configured. Set GEMINI_API_KEY or add it to secret.json"
                        .to_string(),
                )
            })?;

        Ok(Self::new(gemini.api_key.clone(), gemini.model()))
    }

    /// Points the client at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one chat turn and commits it to the history on success.
    async fn send_turn(&self, chat: &mut GeminiChat, text: &str) -> Result<String, SimulationError> {
        let contents = chat.contents_with(text);
        let reply = self
            .generate(&chat.system_instruction, &contents)
            .await?;
        chat.commit(text, &reply);
        Ok(reply)
    }

    async fn generate(
        &self,
        system_instruction: &str,
        contents: &[Content],
    ) -> Result<String, SimulationError> {
        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::system(system_instruction)),
        };
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        tracing::debug!(
            model = %self.model,
            turns = contents.len(),
            "[GeminiClient] Sending generateContent request"
        );

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                let is_retryable = err.is_connect() || err.is_timeout();
                // reqwest errors embed the URL, which carries the key
                SimulationError::Transport {
                    message: format!("Gemini API request failed: {}", err.without_url()),
                    is_retryable,
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            tracing::warn!(status = status.as_u16(), "[GeminiClient] Request rejected");
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            SimulationError::upstream(format!(
                "Failed to parse Gemini response: {}",
                err.without_url()
            ))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl SimulationClient for GeminiSimulationClient {
    type Session = GeminiChat;

    async fn start_interactive_run(
        &self,
        source_code: &str,
        language_label: &str,
    ) -> Result<StartedSession<GeminiChat>, SimulationError> {
        let mut chat = GeminiChat::new(prompts::interactive_instruction(language_label));
        let response_text = self.send_turn(&mut chat, source_code).await?;
        Ok(StartedSession {
            session: chat,
            response_text,
        })
    }

    async fn continue_interactive_run(
        &self,
        session: &mut GeminiChat,
        user_input: &str,
    ) -> Result<String, SimulationError> {
        self.send_turn(session, user_input).await
    }

    async fn run_code_once(
        &self,
        source_code: &str,
        language_label: &str,
        input_blob: &str,
    ) -> Result<String, SimulationError> {
        let contents = [Content::user(prompts::run_once_prompt(source_code, input_blob))];
        self.generate(&prompts::run_once_instruction(language_label), &contents)
            .await
    }

    async fn format_code(
        &self,
        source_code: &str,
        language_label: &str,
    ) -> Result<String, SimulationError> {
        let contents = [Content::user(source_code)];
        let formatted = self
            .generate(&prompts::format_instruction(language_label), &contents)
            .await?;
        Ok(strip_code_fence(&formatted))
    }
}

/// An open interactive dialogue with Gemini.
#[derive(Debug, Clone)]
pub struct GeminiChat {
    system_instruction: String,
    history: Vec<Content>,
}

impl GeminiChat {
    fn new(system_instruction: String) -> Self {
        Self {
            system_instruction,
            history: Vec::new(),
        }
    }

    /// Number of committed user/model exchanges.
    pub fn exchanges(&self) -> usize {
        self.history.len() / 2
    }

    fn contents_with(&self, text: &str) -> Vec<Content> {
        let mut contents = self.history.clone();
        contents.push(Content::user(text));
        contents
    }

    fn commit(&mut self, user_text: &str, model_text: &str) {
        self.history.push(Content::user(user_text));
        self.history.push(Content::model(model_text));
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }

    fn user(text: impl Into<String>) -> Self {
        Self::with_role("user", text)
    }

    fn model(text: impl Into<String>) -> Self {
        Self::with_role("model", text)
    }

    fn system(text: impl Into<String>) -> Self {
        Self::with_role("system", text)
    }
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenates the text parts of the first candidate.
fn extract_text_response(response: GenerateContentResponse) -> Result<String, SimulationError> {
    let text = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .ok_or_else(|| {
            SimulationError::EmptyResponse(
                "Gemini API returned no text in the response candidates".into(),
            )
        })?;

    Ok(text)
}

fn map_http_error(status: StatusCode, body: String) -> SimulationError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                format!("Gemini API returned HTTP {}", status.as_u16())
            } else {
                body.clone()
            }
        });

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    SimulationError::Upstream {
        status: Some(status.as_u16()),
        message,
        is_retryable,
    }
}

/// Removes a surrounding Markdown fence (```lang ... ```) if present.
fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return text.to_string();
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text.to_string();
    };
    // Drop the info string (```python) on the opening line.
    match body.split_once('\n') {
        Some((_, code)) => code.to_string(),
        None => body.to_string(),
    }
}
