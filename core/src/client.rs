//! Completion-service client with retry and backoff.
//!
//! The single place the pipeline tolerates transient external failure.
//! Rate limiting waits `backoff * (attempt + 1)` and consumes an attempt
//! from the shared budget; other HTTP errors and request timeouts retry
//! after fixed short delays. The full response is materialized before
//! returning; there is no caching and no streaming.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::CompletionConfig;
use crate::error::{CompletionError, MigrationError, Result};

/// Environment variable holding the completion-service credential.
pub const API_KEY_ENV: &str = "CURSOR_API_KEY";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Synchronous-in-spirit chat-completion client: one request in flight at a
/// time, awaited to completion.
pub struct CompletionClient {
    http: reqwest::Client,
    config: CompletionConfig,
    api_key: String,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(MigrationError::HttpClient)?;
        Ok(Self::with_client(http, config, api_key))
    }

    /// Construct with a caller-supplied HTTP client. Useful for tests.
    pub fn with_client(
        http: reqwest::Client,
        config: CompletionConfig,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            config,
            api_key: api_key.into(),
        }
    }

    /// Send one (system instructions, user prompt) pair and return the text
    /// of the single completion choice, retrying per the configured policy.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let retries = self.config.retries;
        for attempt in 0..retries {
            let sent = self
                .http
                .post(&self.config.api_url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await;

            match sent {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return extract_content(response, attempt + 1).await;
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let wait = self.config.rate_limit_backoff * (attempt as u32 + 1);
                        warn!("rate limited; waiting {wait:?} before retrying");
                        sleep(wait).await;
                    } else if attempt + 1 < retries {
                        warn!("completion request failed with HTTP {status}; retrying");
                        sleep(self.config.http_retry_delay).await;
                    } else {
                        let body = response.text().await.unwrap_or_default();
                        return Err(MigrationError::Service {
                            attempts: retries,
                            source: CompletionError::Http {
                                status: status.as_u16(),
                                body,
                            },
                        });
                    }
                }
                Err(err) if err.is_timeout() => {
                    if attempt + 1 < retries {
                        warn!("completion request timed out; retrying");
                        sleep(self.config.timeout_retry_delay).await;
                    } else {
                        return Err(MigrationError::Service {
                            attempts: retries,
                            source: CompletionError::Timeout,
                        });
                    }
                }
                // Transport failures other than timeouts are not retried.
                Err(err) => {
                    return Err(MigrationError::Service {
                        attempts: attempt + 1,
                        source: CompletionError::Network(err),
                    });
                }
            }
        }

        // Every attempt was consumed by 429 responses.
        Err(MigrationError::Service {
            attempts: retries,
            source: CompletionError::RateLimited,
        })
    }
}

async fn extract_content(response: reqwest::Response, attempts: usize) -> Result<String> {
    let parsed: ChatResponse = response.json().await.map_err(|err| MigrationError::Service {
        attempts,
        source: CompletionError::MalformedResponse(err.to_string()),
    })?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| MigrationError::Service {
            attempts,
            source: CompletionError::MalformedResponse("response contained no choices".to_string()),
        })?;

    debug!("received completion ({} chars)", content.len());
    Ok(content)
}
