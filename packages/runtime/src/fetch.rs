use crate::error::{LoadError, LoadResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single HTTP GET, no retries
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> LoadResult<Response>;
}

/// `Fetcher` over a shared `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> LoadResult<Response> {
        let transport = |e: reqwest::Error| LoadError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        Ok(Response { status, body })
    }
}

/// GET `url`, retrying failures with linear backoff (`delay * attempt`).
///
/// A 404 fails immediately with [`LoadError::NotFound`], as does any error
/// the fetcher reports that is not retryable.
pub async fn fetch_with_retry(
    fetcher: &dyn Fetcher,
    url: &str,
    attempts: u32,
    delay: Duration,
) -> LoadResult<String> {
    let attempts = attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match fetcher.get(url).await {
            Ok(response) if response.is_success() => {
                debug!(url, attempt, bytes = response.body.len(), "Fetched");
                return Ok(response.body);
            }
            Ok(response) if response.status == 404 => {
                return Err(LoadError::NotFound { url: url.to_string() });
            }
            Ok(response) => last_error = format!("HTTP {}", response.status),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => last_error = e.to_string(),
        }

        if attempt < attempts {
            let backoff = delay * attempt;
            warn!(url, attempt, error = %last_error, backoff_ms = backoff.as_millis() as u64, "Fetch failed, retrying");
            tokio::time::sleep(backoff).await;
        }
    }

    Err(LoadError::Network {
        url: url.to_string(),
        attempts,
        message: last_error,
    })
}
