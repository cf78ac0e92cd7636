//! One harvest run: resolve the storefront, open its store, walk the listing.

mod pager;
mod writer;

use std::fmt;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use sfharvest_core::{AppConfig, StorefrontName};
use sfharvest_scraper::{CatalogSource, ScraperError, StorefrontClient};
use sfharvest_store::{SqliteStore, StoreError};

pub(crate) use pager::harvest_catalog;

/// Knobs for the page loop, usually taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub(crate) struct HarvestOptions {
    pub page_size: u32,
    pub inter_page_delay: Duration,
    pub rate_limit_cooldown: Duration,
    pub max_concurrent_writes: usize,
}

impl HarvestOptions {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            inter_page_delay: Duration::from_millis(config.inter_page_delay_ms),
            rate_limit_cooldown: Duration::from_millis(config.rate_limit_cooldown_ms),
            max_concurrent_writes: config.max_concurrent_writes.max(1),
        }
    }
}

/// Why the page loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopReason {
    /// A page contained a product from the storefront's newly-listed set.
    NewProductSeen,
    /// A page came back with no products.
    EmptyPage,
    /// Every page up to `ceil(totalCount / pageSize)` was visited.
    LastPage,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::NewProductSeen => write!(f, "new product seen"),
            StopReason::EmptyPage => write!(f, "empty page"),
            StopReason::LastPage => write!(f, "last page"),
        }
    }
}

/// Outcome of a completed run. `channel_name` is what callers act on; the
/// counters are for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HarvestReport {
    pub channel_name: String,
    pub pages_fetched: u32,
    pub pages_failed: u32,
    pub products_saved: usize,
    pub products_failed: usize,
    /// Listing records dropped by normalization, including repeated ids.
    pub records_skipped: usize,
    pub stop_reason: StopReason,
}

/// Failures that abort a run. Later-page, per-record and per-write failures
/// are logged and counted instead.
#[derive(Debug, Error)]
pub(crate) enum HarvestError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] ScraperError),

    #[error(transparent)]
    Resolution(ScraperError),

    #[error("first listing page for storefront \"{storefront}\" failed: {source}")]
    FirstPage {
        storefront: String,
        #[source]
        source: ScraperError,
    },

    #[error("could not open store for channel \"{channel_name}\": {source}")]
    Store {
        channel_name: String,
        #[source]
        source: StoreError,
    },
}

/// Runs a full harvest of `storefront` against the configured host.
pub(crate) async fn harvest_storefront(
    config: &AppConfig,
    storefront: &StorefrontName,
    db_dir: &Path,
) -> Result<HarvestReport, HarvestError> {
    let client = StorefrontClient::from_config(config).map_err(HarvestError::Client)?;
    let options = HarvestOptions::from_config(config);
    run_harvest(&client, storefront, db_dir, &options).await
}

/// Resolve → open the channel store under `db_dir` → page loop.
pub(crate) async fn run_harvest<C: CatalogSource>(
    source: &C,
    storefront: &StorefrontName,
    db_dir: &Path,
    options: &HarvestOptions,
) -> Result<HarvestReport, HarvestError> {
    let channel = source
        .resolve_channel(storefront)
        .await
        .map_err(HarvestError::Resolution)?;

    let store = SqliteStore::open(
        db_dir,
        &channel.channel_name,
        u32::try_from(options.max_concurrent_writes).unwrap_or(u32::MAX),
    )
    .await
    .map_err(|source| HarvestError::Store {
        channel_name: channel.channel_name.clone(),
        source,
    })?;

    let result = harvest_catalog(source, &store, storefront, &channel, options).await;
    store.close().await;
    result
}

#[cfg(test)]
#[path = "harvest_test.rs"]
mod tests;
