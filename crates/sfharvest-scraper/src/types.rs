//! Wire types for the storefront lookup and listing endpoints.
//!
//! The listing record is large and changes without notice. Only the fields
//! the normalizer reads are typed; everything else lands in `extra`. Every
//! typed field is optional because individual records routinely omit
//! `benefitsView` or `reviewAmount`.
//!
//! `simpleProducts` stays untyped on [`ListingPage`]: each record is decoded
//! into [`RawProduct`] on its own during normalization, so one record with an
//! odd field type is skipped without losing its siblings.
//!
//! ### `page`
//! Observed both as a JSON string (`"1"`) and as a number, so it is parsed
//! leniently.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Response from `GET /i/v1/smart-stores?url={storefront}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartStoreResponse {
    #[serde(default)]
    pub channel: Option<RawChannel>,
    #[serde(default)]
    pub special_products: Option<RawSpecialProducts>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawChannel {
    #[serde(default)]
    pub channel_uid: Option<String>,
    #[serde(default)]
    pub channel_name: Option<String>,
}

/// Curated product id lists. Either list may be `null` or absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpecialProducts {
    #[serde(default)]
    pub best_product_nos: Option<Vec<i64>>,
    #[serde(default)]
    pub new_product_nos: Option<Vec<i64>>,
}

/// One page of `GET /i/v2/channels/{uid}/categories/ALL/products`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    #[serde(default)]
    pub sort_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_page_number")]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub simple_products: Vec<Value>,
}

/// A listing record: the fields we read plus an untyped bag for the rest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub product_no: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sale_price: Option<i64>,
    #[serde(default)]
    pub benefits_view: Option<BenefitsView>,
    #[serde(default)]
    pub review_amount: Option<ReviewAmount>,
    /// Pricing details, delivery info, images and every other vendor field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitsView {
    #[serde(default)]
    pub discounted_sale_price: Option<i64>,
    #[serde(default)]
    pub mobile_discounted_sale_price: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAmount {
    #[serde(default)]
    pub total_review_count: Option<i64>,
}

fn lenient_page_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    })
}
