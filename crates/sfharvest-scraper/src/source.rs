//! The seam between the harvest loop and the remote catalog.

use std::future::Future;

use sfharvest_core::{ChannelInfo, StorefrontName};

use crate::client::StorefrontClient;
use crate::error::ScraperError;
use crate::types::ListingPage;

/// Remote catalog operations the harvest loop depends on.
///
/// [`StorefrontClient`] is the production implementation; tests substitute
/// scripted in-memory sources.
pub trait CatalogSource: Send + Sync {
    /// Host base URL used to build product page links.
    fn base_url(&self) -> &str;

    /// Resolves a storefront name to its channel and special product sets.
    fn resolve_channel(
        &self,
        storefront: &StorefrontName,
    ) -> impl Future<Output = Result<ChannelInfo, ScraperError>> + Send;

    /// Fetches one 1-based listing page.
    fn fetch_page(
        &self,
        channel_uid: &str,
        storefront: &StorefrontName,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<ListingPage, ScraperError>> + Send;
}

impl CatalogSource for StorefrontClient {
    fn base_url(&self) -> &str {
        StorefrontClient::base_url(self)
    }

    fn resolve_channel(
        &self,
        storefront: &StorefrontName,
    ) -> impl Future<Output = Result<ChannelInfo, ScraperError>> + Send {
        StorefrontClient::resolve_channel(self, storefront)
    }

    fn fetch_page(
        &self,
        channel_uid: &str,
        storefront: &StorefrontName,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<ListingPage, ScraperError>> + Send {
        StorefrontClient::fetch_page(self, channel_uid, storefront, page, page_size)
    }
}
