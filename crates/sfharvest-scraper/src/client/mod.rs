//! HTTP client for the storefront lookup and listing endpoints.

mod listing;
mod resolve;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use sfharvest_core::AppConfig;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// HTTP client for a storefront host.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors. Every failure, including an unparseable body, is retried
/// with linear backoff until `max_attempts` is spent.
pub struct StorefrontClient {
    pub(super) client: Client,
    base_url: String,
    /// Total attempts per request, including the first.
    max_attempts: u32,
    /// Linear backoff unit: `backoff_base_ms * attempt`.
    backoff_base_ms: u64,
}

impl StorefrontClient {
    /// Creates a `StorefrontClient` with configured timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_attempts: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_attempts,
            backoff_base_ms,
        })
    }

    /// Builds a client from the application config.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            &config.base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_attempts,
            config.retry_backoff_base_ms,
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `url` and decodes the JSON body, retrying every failure.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::RetriesExhausted`] wrapping the last
    /// [`ScraperError::RateLimited`], [`ScraperError::NotFound`],
    /// [`ScraperError::UnexpectedStatus`], [`ScraperError::Transport`] or
    /// [`ScraperError::Deserialize`].
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        referer: Option<&str>,
        context: &str,
    ) -> Result<T, ScraperError> {
        retry_with_backoff(url, self.max_attempts, self.backoff_base_ms, || {
            self.get_json_once(url, referer, context)
        })
        .await
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        url: &str,
        referer: Option<&str>,
        context: &str,
    ) -> Result<T, ScraperError> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .header(reqwest::header::ACCEPT_LANGUAGE, "ko-KR,ko;q=0.9,en;q=0.8");

        if let Some(referer) = referer {
            request = request.header(reqwest::header::REFERER, referer);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(ScraperError::RateLimited {
                url: url.to_owned(),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ScraperError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
