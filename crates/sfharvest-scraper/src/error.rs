use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {url}")]
    RateLimited {
        url: String,
        retry_after_secs: Option<u64>,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("normalization error for product {source_product_id}: {reason}")]
    Normalization {
        source_product_id: String,
        reason: String,
    },

    #[error("giving up on {resource} after {attempts} attempts: {last}")]
    RetriesExhausted {
        resource: String,
        attempts: u32,
        #[source]
        last: Box<ScraperError>,
    },

    #[error("could not resolve channel for storefront \"{storefront}\": {reason}")]
    Resolution { storefront: String, reason: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ScraperError {
    /// The innermost error, looking through [`ScraperError::RetriesExhausted`].
    #[must_use]
    pub fn root(&self) -> &ScraperError {
        match self {
            ScraperError::RetriesExhausted { last, .. } => last.root(),
            other => other,
        }
    }

    /// `true` when the request ultimately failed with HTTP 429.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.root(), ScraperError::RateLimited { .. })
    }

    /// `true` when the request ultimately failed with HTTP 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), ScraperError::NotFound { .. })
    }
}
