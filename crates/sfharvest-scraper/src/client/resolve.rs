//! Storefront name → channel resolution.

use sfharvest_core::{ChannelInfo, SpecialProductIds, StorefrontName};

use crate::error::ScraperError;
use crate::pagination::store_lookup_url;
use crate::types::SmartStoreResponse;

use super::StorefrontClient;

impl StorefrontClient {
    /// Resolves `storefront` to its channel handle and the curated best/new
    /// product id sets, with one lookup call.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Resolution`] naming the storefront when the
    /// lookup ultimately fails or the response carries no channel uid.
    pub async fn resolve_channel(
        &self,
        storefront: &StorefrontName,
    ) -> Result<ChannelInfo, ScraperError> {
        let resolution_error = |reason: String| ScraperError::Resolution {
            storefront: storefront.to_string(),
            reason,
        };

        let url = store_lookup_url(self.base_url(), storefront.as_str())
            .map_err(|e| resolution_error(e.to_string()))?;

        let response: SmartStoreResponse = self
            .get_json(&url, None, &format!("store lookup for {storefront}"))
            .await
            .map_err(|e| resolution_error(e.to_string()))?;

        let info = channel_info_from_response(storefront, response)?;
        tracing::info!(
            storefront = %storefront,
            channel_uid = %info.channel_uid,
            channel_name = %info.channel_name,
            best = info.special.best.len(),
            new = info.special.new.len(),
            "resolved storefront channel"
        );
        Ok(info)
    }
}

/// Converts a lookup response into [`ChannelInfo`].
///
/// A missing `channelName` falls back to the storefront name; missing special
/// lists are treated as empty.
pub(crate) fn channel_info_from_response(
    storefront: &StorefrontName,
    response: SmartStoreResponse,
) -> Result<ChannelInfo, ScraperError> {
    let channel = response.channel.ok_or_else(|| ScraperError::Resolution {
        storefront: storefront.to_string(),
        reason: "response has no channel object".to_owned(),
    })?;

    let channel_uid = channel
        .channel_uid
        .filter(|uid| !uid.trim().is_empty())
        .ok_or_else(|| ScraperError::Resolution {
            storefront: storefront.to_string(),
            reason: "response has no channelUid".to_owned(),
        })?;

    let channel_name = channel
        .channel_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| {
            tracing::warn!(
                storefront = %storefront,
                "lookup response has no channelName; using storefront name"
            );
            storefront.to_string()
        });

    let special = response
        .special_products
        .map(|s| {
            SpecialProductIds::new(
                s.best_product_nos.unwrap_or_default(),
                s.new_product_nos.unwrap_or_default(),
            )
        })
        .unwrap_or_default();

    Ok(ChannelInfo {
        channel_uid,
        channel_name,
        special,
    })
}
