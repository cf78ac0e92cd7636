//! Page-number pagination for the channel product listing.
//!
//! The listing is requested sorted by total sales across the `ALL` category.
//! Page numbers are 1-based. Each API request carries a `Referer` mirroring
//! the human-facing category page with the same page and size; the upstream
//! rejects requests whose referer does not match.
//!
//! ## URL format
//!
//! ```text
//! {base}/i/v2/channels/{uid}/categories/ALL/products?categorySearchType=STDCATG&sortType=TOTALSALE&page=1&pageSize=40
//! {base}/{storefront}/category/ALL?st=TOTALSALE&dt=BIG_IMAGE&page=1&size=40
//! ```

use crate::error::ScraperError;

pub const SORT_TYPE: &str = "TOTALSALE";
pub const CATEGORY_ALL: &str = "ALL";
const CATEGORY_SEARCH_TYPE: &str = "STDCATG";
const DISPLAY_TYPE: &str = "BIG_IMAGE";

/// The API URL for one listing page and the referer that must accompany it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    pub referer: String,
}

/// Number of pages needed to cover `total_count` items, i.e.
/// `ceil(total_count / page_size)`. Returns `0` when `page_size` is `0`.
#[must_use]
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Builds the listing URL and referer for `page` (1-based).
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `base_url` cannot be parsed or
/// cannot carry a path.
pub fn page_request(
    base_url: &str,
    channel_uid: &str,
    storefront: &str,
    page: u32,
    page_size: u32,
) -> Result<PageRequest, ScraperError> {
    let page = page.to_string();
    let size = page_size.to_string();

    let mut url = parse_base(base_url)?;
    extend_path(
        &mut url,
        base_url,
        &[
            "i",
            "v2",
            "channels",
            channel_uid,
            "categories",
            CATEGORY_ALL,
            "products",
        ],
    )?;
    url.query_pairs_mut()
        .append_pair("categorySearchType", CATEGORY_SEARCH_TYPE)
        .append_pair("sortType", SORT_TYPE)
        .append_pair("page", &page)
        .append_pair("pageSize", &size);

    let mut referer = parse_base(base_url)?;
    extend_path(&mut referer, base_url, &[storefront, "category", CATEGORY_ALL])?;
    referer
        .query_pairs_mut()
        .append_pair("st", SORT_TYPE)
        .append_pair("dt", DISPLAY_TYPE)
        .append_pair("page", &page)
        .append_pair("size", &size);

    Ok(PageRequest {
        url: url.to_string(),
        referer: referer.to_string(),
    })
}

/// Builds `{base}/i/v1/smart-stores?url={storefront}`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `base_url` cannot be parsed.
pub fn store_lookup_url(base_url: &str, storefront: &str) -> Result<String, ScraperError> {
    let mut url = parse_base(base_url)?;
    extend_path(&mut url, base_url, &["i", "v1", "smart-stores"])?;
    url.query_pairs_mut().append_pair("url", storefront);
    Ok(url.to_string())
}

/// Builds the human-facing product page `{base}/{storefront}/products/{id}`.
#[must_use]
pub fn product_page_url(base_url: &str, storefront: &str, id: &str) -> String {
    format!(
        "{}/{storefront}/products/{id}",
        base_url.trim_end_matches('/')
    )
}

fn parse_base(base_url: &str) -> Result<reqwest::Url, ScraperError> {
    reqwest::Url::parse(base_url).map_err(|e| ScraperError::InvalidUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

fn extend_path(
    url: &mut reqwest::Url,
    base_url: &str,
    segments: &[&str],
) -> Result<(), ScraperError> {
    url.path_segments_mut()
        .map_err(|()| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: "URL cannot be a base".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}
