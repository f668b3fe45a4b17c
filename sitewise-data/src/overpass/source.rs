//! `FeatureSource` backed by the Overpass interpreter.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use sitewise_core::{FeatureCount, FeatureQuery, FeatureQueryError, FeatureSource};
use tokio_util::sync::CancellationToken;

use super::config::OverpassConfig;
use super::response::InterpreterResponse;
use crate::ClientBuildError;

/// Statuses signalling an overloaded or briefly unavailable server.
const RETRYABLE_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Longest response excerpt kept in error messages.
const BODY_EXCERPT_CHARS: usize = 200;

/// Overpass-backed feature source with retry and deduplication.
#[derive(Debug, Clone)]
pub struct OverpassFeatureSource {
    client: Client,
    config: OverpassConfig,
}

/// Outcome of a single failed attempt.
#[derive(Debug)]
enum AttemptError {
    Retryable {
        status: Option<u16>,
        message: String,
    },
    Fatal(FeatureQueryError),
}

impl OverpassFeatureSource {
    /// Create a source for `url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(OverpassConfig::new(url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: OverpassConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &OverpassConfig {
        &self.config
    }

    async fn attempt(&self, body: &str) -> Result<FeatureCount, AttemptError> {
        let response = self
            .client
            .post(&self.config.url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body.to_owned())
            .send()
            .await
            .map_err(|err| transport_error(&err))?;
        let status = response.status();
        let text = response.text().await.map_err(|err| transport_error(&err))?;

        if status.is_success() {
            let decoded: InterpreterResponse = serde_json::from_str(&text).map_err(|err| {
                AttemptError::Fatal(FeatureQueryError::Decode {
                    message: err.to_string(),
                })
            })?;
            return Ok(FeatureCount::from_elements(decoded.into_features()));
        }

        let message = format!("Overpass returned {status}: {}", excerpt(&text));
        if is_retryable(status, &text) {
            Err(AttemptError::Retryable {
                status: Some(status.as_u16()),
                message,
            })
        } else {
            Err(AttemptError::Fatal(FeatureQueryError::Permanent {
                status: status.as_u16(),
                message,
            }))
        }
    }
}

#[async_trait]
impl FeatureSource for OverpassFeatureSource {
    async fn fetch(
        &self,
        query: &FeatureQuery,
        cancel: &CancellationToken,
    ) -> Result<FeatureCount, FeatureQueryError> {
        if query.is_empty() {
            debug!("skipping empty Overpass query");
            return Ok(FeatureCount::empty());
        }
        let body = query.render();
        debug!("Overpass query: {body}");
        let policy = self.config.retry;
        let attempts = policy.attempts();
        let mut attempt = 1;
        loop {
            if cancel.is_cancelled() {
                return Err(FeatureQueryError::Cancelled);
            }
            let outcome = tokio::select! {
                () = cancel.cancelled() => return Err(FeatureQueryError::Cancelled),
                outcome = self.attempt(&body) => outcome,
            };
            let (status, message) = match outcome {
                Ok(count) => {
                    debug!("Overpass matched {} distinct elements", count.count());
                    return Ok(count);
                }
                Err(AttemptError::Fatal(err)) => return Err(err),
                Err(AttemptError::Retryable { status, message }) => (status, message),
            };
            if attempt >= attempts {
                return Err(FeatureQueryError::Transient {
                    attempts: attempt,
                    status,
                    message,
                });
            }
            let delay = policy.delay_for(attempt);
            warn!("Overpass attempt {attempt}/{attempts} failed ({message}); retrying in {delay:?}");
            tokio::select! {
                () = cancel.cancelled() => return Err(FeatureQueryError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}

fn transport_error(err: &reqwest::Error) -> AttemptError {
    AttemptError::Retryable {
        status: err.status().map(|status| status.as_u16()),
        message: if err.is_timeout() {
            format!("Overpass request timed out: {err}")
        } else {
            format!("Overpass request failed: {err}")
        },
    }
}

fn is_retryable(status: StatusCode, body: &str) -> bool {
    if RETRYABLE_STATUSES.contains(&status) {
        return true;
    }
    let body = body.to_ascii_lowercase();
    body.contains("timeout") || body.contains("busy")
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
