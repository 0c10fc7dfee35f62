use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;
use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::BackfillConfig;

/// Statuses worth another attempt; anything else fails immediately.
const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The one seam between the pipeline and the network. Tests swap in a
/// canned client; the binaries use [`RetryingClient`].
pub trait HttpGet {
    fn get(&self, url: &str, params: &[(String, String)]) -> Result<HttpResponse, HttpError>;
}

pub fn is_retryable_status(status: u16) -> bool {
    RETRY_STATUSES.contains(&status)
}

/// Delay before retry number `attempt` (zero-based): 1.5s, 3s, 6s, ...
pub fn backoff_delay(initial: Duration, attempt: u32) -> Duration {
    initial * 2u32.saturating_pow(attempt)
}

/// Blocking GET client with bounded retry and a courtesy pause after every
/// request. Only idempotent reads go through here.
pub struct RetryingClient {
    client: Client,
    max_attempts: u32,
    initial_backoff: Duration,
    request_pause: Duration,
}

impl RetryingClient {
    pub fn new(config: &BackfillConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(RetryingClient {
            client,
            max_attempts: config.max_attempts,
            initial_backoff: config.initial_backoff,
            request_pause: config.request_pause,
        })
    }
}

impl HttpGet for RetryingClient {
    fn get(&self, url: &str, params: &[(String, String)]) -> Result<HttpResponse, HttpError> {
        let mut attempt = 0;
        loop {
            let result = self.client.get(url).query(params).send();

            // Rate-limit ourselves no matter how the request went.
            thread::sleep(self.request_pause);

            let last_attempt = attempt + 1 >= self.max_attempts;
            match result {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if response.status().is_success() {
                        let body = response.text().map_err(|e| HttpError::Transport {
                            url: url.to_string(),
                            message: e.to_string(),
                        })?;
                        return Ok(HttpResponse { status, body });
                    }
                    if last_attempt || !is_retryable_status(status) {
                        return Err(HttpError::Status {
                            status,
                            url: url.to_string(),
                        });
                    }
                    warn!("HTTP {} for {}, retrying", status, url);
                }
                Err(e) => {
                    if last_attempt {
                        return Err(HttpError::Transport {
                            url: url.to_string(),
                            message: e.to_string(),
                        });
                    }
                    warn!("request to {} failed ({}), retrying", url, e);
                }
            }

            thread::sleep(backoff_delay(self.initial_backoff, attempt));
            attempt += 1;
        }
    }
}
