use serde::{Deserialize, Serialize};

/// Marker attached to a product that appears in the storefront's curated
/// best-seller or newly-listed sets at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductTag {
    #[serde(rename = "BEST")]
    Best,
    #[serde(rename = "NEW")]
    New,
}

impl std::fmt::Display for ProductTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductTag::Best => write!(f, "BEST"),
            ProductTag::New => write!(f, "NEW"),
        }
    }
}

/// A storefront listing record reduced to the fields this tool persists.
///
/// Serialized with camelCase keys; this is the exact shape stored per product
/// id and read back by downstream exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProduct {
    /// Listing id, stored as a string. Natural key of the store.
    pub id: String,
    pub product_no: String,
    pub name: String,
    /// Human-facing product page, e.g. `https://smartstore.naver.com/shop/products/123`.
    pub url: String,
    pub sale_price: i64,
    /// Equals `sale_price` when the listing carries no discount.
    pub discounted_sale_price: i64,
    /// Equals `sale_price` when the listing carries no mobile discount.
    pub mobile_discounted_sale_price: i64,
    pub total_review_count: i64,
    /// `BEST` always precedes `NEW` when both apply.
    #[serde(default)]
    pub tags: Vec<ProductTag>,
}

impl NormalizedProduct {
    /// Returns `true` if the product was in the newly-listed set.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.tags.contains(&ProductTag::New)
    }

    #[must_use]
    pub fn is_best(&self) -> bool {
        self.tags.contains(&ProductTag::Best)
    }

    /// Returns `true` if either discounted price is below the list price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discounted_sale_price < self.sale_price
            || self.mobile_discounted_sale_price < self.sale_price
    }
}
