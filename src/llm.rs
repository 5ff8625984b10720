//! Generation client for routine text
//!
//! Sends the composed prompt to Google Gemini with fixed safety settings and
//! a JSON response type, and classifies every failure into a
//! [`GenerationError`] before it leaves this module. The client is created
//! lazily, once per process, through [`GeneratorSlot`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::Config;

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

const API_KEY_HEADER: &str = "x-goog-api-key";
const RESPONSE_MIME_TYPE: &str = "application/json";
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: [&str; 4] = [
  "HARM_CATEGORY_HARASSMENT",
  "HARM_CATEGORY_HATE_SPEECH",
  "HARM_CATEGORY_SEXUALLY_EXPLICIT",
  "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const SAFETY_FINISH_REASON: &str = "SAFETY";
const INVALID_KEY_MARKER: &str = "API key not valid";

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Generation blocked: {0}")]
  Blocked(String),

  #[error("Empty response from provider")]
  Empty,

  #[error("Invalid credential: {0}")]
  InvalidCredential(String),

  #[error("Request failed: {0}")]
  Transport(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Generator Trait
/// ---------------------------------------------------------------------------

/// Anything that can turn a prompt into raw response text
#[async_trait]
pub trait TextGenerator: Send + Sync {
  async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// ---------------------------------------------------------------------------
/// Gemini API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
  contents: Vec<RequestContent<'a>>,
  generation_config: GenerationConfig,
  safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
  role: &'static str,
  parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
  text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  temperature: f32,
  response_mime_type: &'static str,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
  category: &'static str,
  threshold: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
  content: Option<ResponseContent>,
  finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
  #[serde(default)]
  parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
  block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
  error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
  message: String,
  status: Option<String>,
}

fn safety_settings() -> Vec<SafetySetting> {
  SAFETY_CATEGORIES
    .iter()
    .map(|&category| SafetySetting {
      category,
      threshold: SAFETY_THRESHOLD,
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Gemini Client
/// ---------------------------------------------------------------------------

pub struct GeminiClient {
  client: Client,
  api_key: String,
  model: String,
  base_url: Url,
  temperature: f32,
}

impl GeminiClient {
  pub fn new(
    api_key: impl Into<String>,
    model: impl Into<String>,
    base_url: &str,
    temperature: f32,
  ) -> Result<Self, GenerationError> {
    let base_url = Url::parse(base_url)
      .map_err(|e| GenerationError::Api(format!("Invalid API base URL {}: {}", base_url, e)))?;

    Ok(Self {
      client: Client::new(),
      api_key: api_key.into(),
      model: model.into(),
      base_url,
      temperature,
    })
  }

  /// Build a client from runtime configuration; fails when no key is set
  pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
    let api_key = config
      .api_key
      .as_deref()
      .filter(|k| !k.trim().is_empty())
      .ok_or(GenerationError::MissingApiKey)?;

    Self::new(api_key, &config.model, &config.api_base_url, config.temperature)
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  fn endpoint(&self) -> Result<Url, GenerationError> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| GenerationError::Api(format!("API base URL cannot be a base: {}", self.base_url)))?
      .pop_if_empty()
      .push("models")
      .push(&format!("{}:generateContent", self.model));
    Ok(url)
  }
}

#[async_trait]
impl TextGenerator for GeminiClient {
  #[instrument(skip(self, prompt), fields(model = %self.model))]
  async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
    let request = GenerateContentRequest {
      contents: vec![RequestContent {
        role: "user",
        parts: vec![RequestPart { text: prompt }],
      }],
      generation_config: GenerationConfig {
        temperature: self.temperature,
        response_mime_type: RESPONSE_MIME_TYPE,
      },
      safety_settings: safety_settings(),
    };

    debug!(prompt_chars = prompt.len(), "Sending generateContent request");

    let response = self
      .client
      .post(self.endpoint()?)
      .header(API_KEY_HEADER, &self.api_key)
      .json(&request)
      .send()
      .await
      .map_err(|e| GenerationError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| GenerationError::Transport(e.to_string()))?;

    if !status.is_success() {
      error!(status = %status, "Gemini API returned an error status");
      return Err(classify_api_error(status.as_u16(), &body));
    }

    let parsed: GenerateContentResponse =
      serde_json::from_str(&body).map_err(|e| GenerationError::Parse(e.to_string()))?;

    let text = extract_text(parsed)?;
    info!(response_chars = text.len(), "Received generation response");
    Ok(text)
  }
}

/// Map a non-success HTTP response to a generation error
fn classify_api_error(status: u16, body: &str) -> GenerationError {
  let (message, api_status) = match serde_json::from_str::<ApiErrorResponse>(body) {
    Ok(resp) => (resp.error.message, resp.error.status),
    Err(_) => (format!("HTTP {}: {}", status, body), None),
  };

  let invalid_key = message.contains(INVALID_KEY_MARKER)
    || api_status.as_deref() == Some("UNAUTHENTICATED");
  if invalid_key {
    return GenerationError::InvalidCredential(message);
  }

  GenerationError::Api(message)
}

/// Pull the response text out, treating safety stops as blocked
fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
  if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
    warn!(reason = %reason, "Prompt blocked by provider safety filter");
    return Err(GenerationError::Blocked(reason));
  }

  let Some(candidate) = response.candidates.into_iter().next() else {
    return Err(GenerationError::Empty);
  };

  if candidate.finish_reason.as_deref() == Some(SAFETY_FINISH_REASON) {
    warn!("Candidate stopped by provider safety filter");
    return Err(GenerationError::Blocked(SAFETY_FINISH_REASON.to_string()));
  }

  let text: String = candidate
    .content
    .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
    .unwrap_or_default();

  if text.trim().is_empty() {
    return Err(GenerationError::Empty);
  }

  Ok(text)
}

/// ---------------------------------------------------------------------------
/// Process-wide Handle
/// ---------------------------------------------------------------------------

/// Lazily created generator shared by all requests in the process
///
/// Initialization failure is not cached, so a later call retries.
pub struct GeneratorSlot {
  cell: OnceCell<Arc<dyn TextGenerator>>,
}

impl GeneratorSlot {
  pub fn new() -> Self {
    Self {
      cell: OnceCell::new(),
    }
  }

  /// Slot pre-filled with a specific generator
  pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
    Self {
      cell: OnceCell::from(generator),
    }
  }

  pub fn is_initialized(&self) -> bool {
    self.cell.initialized()
  }

  pub async fn get_or_init(&self, config: &Config) -> Result<Arc<dyn TextGenerator>, GenerationError> {
    let generator = self
      .cell
      .get_or_try_init(|| async {
        let client = GeminiClient::from_config(config)?;
        info!(model = client.model(), "Generation client initialized");
        Ok::<Arc<dyn TextGenerator>, GenerationError>(Arc::new(client))
      })
      .await?;
    Ok(Arc::clone(generator))
  }
}

impl Default for GeneratorSlot {
  fn default() -> Self {
    Self::new()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
