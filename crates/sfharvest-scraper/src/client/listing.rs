//! Single-page fetch of the channel product listing.

use sfharvest_core::StorefrontName;

use crate::error::ScraperError;
use crate::pagination::page_request;
use crate::types::ListingPage;

use super::StorefrontClient;

impl StorefrontClient {
    /// Fetches one 1-based page of the channel listing sorted by total sales,
    /// sending the matching category page as `Referer`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if the configured base URL is unusable.
    /// - [`ScraperError::RetriesExhausted`] after the attempt budget is spent;
    ///   use [`ScraperError::is_rate_limited`] to detect a final 429.
    pub async fn fetch_page(
        &self,
        channel_uid: &str,
        storefront: &StorefrontName,
        page: u32,
        page_size: u32,
    ) -> Result<ListingPage, ScraperError> {
        let request = page_request(
            self.base_url(),
            channel_uid,
            storefront.as_str(),
            page,
            page_size,
        )?;

        tracing::debug!(
            storefront = %storefront,
            page,
            page_size,
            url = %request.url,
            "fetching listing page"
        );

        self.get_json(
            &request.url,
            Some(&request.referer),
            &format!("listing page {page} of {storefront}"),
        )
        .await
    }
}
