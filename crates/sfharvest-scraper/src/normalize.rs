//! Normalization from raw listing records to [`sfharvest_core::NormalizedProduct`].
//!
//! Pure conversion, no I/O. A record that does not decode, or has no
//! identifier to key it by, is dropped; every other gap is filled with a
//! default.

use std::collections::HashSet;

use serde_json::Value;
use sfharvest_core::{NormalizedProduct, SpecialProductIds};

use crate::error::ScraperError;
use crate::pagination::product_page_url;
use crate::types::RawProduct;

/// Normalizes one raw listing record.
///
/// - `id` and `productNo` stand in for each other when only one is present.
/// - Discounted prices fall back to `salePrice` when absent or `0`.
/// - `totalReviewCount` falls back to `0`.
/// - Tags come from `special`, `BEST` before `NEW`.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] if the record has neither `id`
/// nor `productNo`.
pub fn normalize_product(
    product: RawProduct,
    base_url: &str,
    storefront: &str,
    special: &SpecialProductIds,
) -> Result<NormalizedProduct, ScraperError> {
    let (id, product_no) = match (product.id, product.product_no) {
        (Some(id), Some(no)) => (id, no),
        (Some(id), None) => (id, id),
        (None, Some(no)) => (no, no),
        (None, None) => {
            return Err(ScraperError::Normalization {
                source_product_id: product
                    .name
                    .map_or_else(|| "<unnamed>".to_owned(), |n| format!("\"{n}\"")),
                reason: "record has neither id nor productNo".into(),
            });
        }
    };

    let sale_price = product.sale_price.unwrap_or(0);
    let benefits = product.benefits_view.unwrap_or_default();
    let discounted_sale_price = benefits
        .discounted_sale_price
        .filter(|p| *p != 0)
        .unwrap_or(sale_price);
    let mobile_discounted_sale_price = benefits
        .mobile_discounted_sale_price
        .filter(|p| *p != 0)
        .unwrap_or(sale_price);
    let total_review_count = product
        .review_amount
        .and_then(|r| r.total_review_count)
        .unwrap_or(0);

    let id_str = id.to_string();
    Ok(NormalizedProduct {
        url: product_page_url(base_url, storefront, &id_str),
        id: id_str,
        product_no: product_no.to_string(),
        name: product.name.unwrap_or_default(),
        sale_price,
        discounted_sale_price,
        mobile_discounted_sale_price,
        total_review_count,
        tags: special.tags_for(id),
    })
}

/// Decodes one listing record into the fields the normalizer reads.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] naming the record's `id` (when it
/// has one) if a read field has an unexpected type.
pub fn decode_record(value: Value) -> Result<RawProduct, ScraperError> {
    let source_product_id = value
        .get("id")
        .or_else(|| value.get("productNo"))
        .map_or_else(|| "<unknown>".to_owned(), ToString::to_string);
    serde_json::from_value(value).map_err(|e| ScraperError::Normalization {
        source_product_id,
        reason: format!("undecodable record: {e}"),
    })
}

/// Normalizes a page of raw records, preserving input order.
///
/// Records that cannot be decoded or keyed are logged and skipped. A
/// repeated id within the batch keeps its first occurrence so one page never
/// yields two writes to the same key.
#[must_use]
pub fn transform_products(
    products: Vec<Value>,
    base_url: &str,
    storefront: &str,
    special: &SpecialProductIds,
) -> Vec<NormalizedProduct> {
    let mut seen: HashSet<String> = HashSet::with_capacity(products.len());
    let mut normalized = Vec::with_capacity(products.len());

    for (index, value) in products.into_iter().enumerate() {
        let result = decode_record(value)
            .and_then(|raw| normalize_product(raw, base_url, storefront, special));
        match result {
            Ok(product) => {
                if seen.insert(product.id.clone()) {
                    normalized.push(product);
                } else {
                    tracing::debug!(
                        storefront,
                        id = %product.id,
                        "duplicate product id within page; keeping first occurrence"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    storefront,
                    index,
                    error = %e,
                    "skipping unusable listing record"
                );
            }
        }
    }

    normalized
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
