use crate::error::{Error, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{info, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Ordered preference list: newest/most capable first, then the same
/// identifiers with the `models/` namespace prefix as a naming fallback.
pub const CANDIDATE_MODELS: &[&str] = &[
    "gemini-2.5-pro",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b",
    "gemini-1.5-pro",
    "models/gemini-2.5-pro",
    "models/gemini-2.5-flash",
    "models/gemini-2.5-flash-lite",
    "models/gemini-2.0-flash",
    "models/gemini-2.0-flash-lite",
    "models/gemini-1.5-flash",
    "models/gemini-1.5-flash-8b",
    "models/gemini-1.5-pro",
];

const PROBE_PROMPT: &str = "Respond with 'OK' if you can see this message.";
const CONNECTION_TEST_PROMPT: &str =
    "Respond with exactly 'API_TEST_SUCCESS' if you receive this message.";

#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: Option<f32>,
    pub timeout: Duration,
}

impl GenerationOptions {
    /// Minimal probe used while picking a model at connect time.
    pub fn probe() -> Self {
        Self {
            temperature: 0.1,
            max_output_tokens: 10,
            top_p: None,
            timeout: Duration::from_secs(15),
        }
    }

    /// Explicit operator-triggered connectivity test.
    pub fn connection_test() -> Self {
        Self {
            temperature: 0.1,
            max_output_tokens: 20,
            top_p: Some(0.8),
            timeout: Duration::from_secs(20),
        }
    }
}

/// Result of an explicit connectivity test: the model that answered, its
/// reply, and a human-readable transcript of every probe attempt.
#[derive(Debug, Clone)]
pub struct ConnectionTest {
    pub model: String,
    pub reply: String,
    pub logs: Vec<String>,
}

/// Handle to the Gemini text-generation API, pinned to the first candidate
/// model that answered a probe. Pinning avoids re-probing on every call.
#[derive(Clone)]
pub struct ModelGateway {
    client: Client,
    api_key: String,
    model: String,
    probe_log: Vec<String>,
}

impl ModelGateway {
    /// Try candidate models in order of preference and bind to the first one
    /// that returns non-empty text. Fails with `Authentication` as soon as
    /// the provider rejects the key, or `ModelUnavailable` once the whole
    /// list is exhausted.
    pub async fn connect(client: Client, api_key: String) -> Result<Self> {
        let mut logs: Vec<String> = Vec::new();
        let mut last_error = "no models attempted".to_string();

        for model in CANDIDATE_MODELS {
            info!("Trying model: {}", model);
            logs.push(format!("Trying model: {}", model));

            match request_text(&client, &api_key, model, PROBE_PROMPT, &GenerationOptions::probe())
                .await
            {
                Ok(_) => {
                    info!("Successfully connected with: {}", model);
                    logs.push(format!("Successfully connected with: {}", model));
                    return Ok(Self {
                        client,
                        api_key,
                        model: model.to_string(),
                        probe_log: logs,
                    });
                }
                Err(Error::EmptyResponse) => {
                    warn!("Empty response from: {}", model);
                    logs.push(format!("Empty response from: {}", model));
                    last_error = format!("Empty response from {}", model);
                }
                Err(err @ Error::Authentication(_)) => return Err(err),
                Err(err) => {
                    warn!("Failed with {}: {}", model, err);
                    logs.push(format!("Failed with {}: {}", model, err));
                    last_error = err.to_string();
                }
            }
        }

        Err(Error::ModelUnavailable(last_error))
    }

    /// Generate free-form text from the pinned model.
    pub async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        request_text(&self.client, &self.api_key, &self.model, prompt, options).await
    }

    /// Operator-facing connectivity test. Independent of any pinned handle so
    /// it can run before an interview session exists.
    pub async fn test_connection(client: &Client, api_key: &str) -> Result<ConnectionTest> {
        let mut logs: Vec<String> = Vec::new();
        let mut last_error = "no models attempted".to_string();
        let options = GenerationOptions::connection_test();

        for model in CANDIDATE_MODELS {
            logs.push(format!("Testing connection with {}...", model));

            match request_text(client, api_key, model, CONNECTION_TEST_PROMPT, &options).await {
                Ok(reply) => {
                    logs.push(format!("API test successful with {}", model));
                    return Ok(ConnectionTest {
                        model: model.to_string(),
                        reply: reply.trim().to_string(),
                        logs,
                    });
                }
                Err(err @ Error::Authentication(_)) => return Err(err),
                Err(err) => {
                    logs.push(format!("Failed with {}: {}", model, err));
                    last_error = err.to_string();
                }
            }
        }

        Err(Error::ModelUnavailable(last_error))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn probe_log(&self) -> &[String] {
        &self.probe_log
    }
}

async fn request_text(
    client: &Client,
    api_key: &str,
    model: &str,
    prompt: &str,
    options: &GenerationOptions,
) -> Result<String> {
    let mut generation_config = serde_json::json!({
        "temperature": options.temperature,
        "maxOutputTokens": options.max_output_tokens,
    });
    if let Some(top_p) = options.top_p {
        generation_config["topP"] = serde_json::json!(top_p);
    }

    let payload = serde_json::json!({
        "contents": [{"parts": [{"text": prompt}]}],
        "generationConfig": generation_config,
    });

    let res = client
        .post(endpoint_url(model))
        .header("x-goog-api-key", api_key)
        .json(&payload)
        .timeout(options.timeout)
        .send()
        .await?;

    if !res.status().is_success() {
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || (status == StatusCode::BAD_REQUEST && text.contains("API key"))
        {
            return Err(Error::Authentication(format!(
                "Gemini API error {}: {}",
                status, text
            )));
        }
        return Err(Error::Provider(format!(
            "Gemini API error {}: {}",
            status, text
        )));
    }

    let body: JsonValue = res.json().await?;
    match extract_text(&body) {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(Error::EmptyResponse),
    }
}

fn endpoint_url(model: &str) -> String {
    if model.starts_with("models/") {
        format!("{}/{}:generateContent", GEMINI_API_BASE, model)
    } else {
        format!("{}/models/{}:generateContent", GEMINI_API_BASE, model)
    }
}

fn extract_text(body: &JsonValue) -> Option<String> {
    let parts = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())?;

    Some(
        parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect::<String>(),
    )
}
