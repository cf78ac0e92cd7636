pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
pub(crate) mod rate_limit;
pub mod source;
pub mod types;

pub use client::StorefrontClient;
pub use error::ScraperError;
pub use normalize::{decode_record, normalize_product, transform_products};
pub use pagination::total_pages;
pub use source::CatalogSource;
pub use types::{ListingPage, RawProduct, SmartStoreResponse};
