//! The page loop and its stopping rules.

use sfharvest_core::{ChannelInfo, StorefrontName};
use sfharvest_scraper::{total_pages, transform_products, CatalogSource, ListingPage, ScraperError};
use sfharvest_store::KeyedStore;

use super::writer::persist_page;
use super::{HarvestError, HarvestOptions, HarvestReport, StopReason};

/// Loop states. Pages are 1-based; `total_pages` is fixed by page 1.
#[derive(Debug)]
pub(crate) enum HarvestState {
    Init,
    FetchingFirstPage,
    Processing {
        page: u32,
        total_pages: u32,
        listing: ListingPage,
    },
    FetchingNextPage {
        page: u32,
        total_pages: u32,
    },
    Stopped(StopReason),
}

/// Walks the listing of an already-resolved channel, merging every page into
/// `store` before deciding whether to continue.
///
/// Stops when a page yields a product tagged `NEW`, when a page is empty, or
/// after page `ceil(totalCount / pageSize)`. The `NEW` rule assumes that
/// reaching a newly-listed product means the rest of the listing was already
/// captured by an earlier run.
///
/// # Errors
///
/// Only a failed first page aborts ([`HarvestError::FirstPage`]). Failures
/// on later pages are logged and the page is skipped.
pub(crate) async fn harvest_catalog<C: CatalogSource, S: KeyedStore>(
    source: &C,
    store: &S,
    storefront: &StorefrontName,
    channel: &ChannelInfo,
    options: &HarvestOptions,
) -> Result<HarvestReport, HarvestError> {
    let mut report = HarvestReport {
        channel_name: channel.channel_name.clone(),
        pages_fetched: 0,
        pages_failed: 0,
        products_saved: 0,
        products_failed: 0,
        records_skipped: 0,
        stop_reason: StopReason::LastPage,
    };

    let mut state = HarvestState::Init;
    loop {
        state = match state {
            HarvestState::Init => HarvestState::FetchingFirstPage,

            HarvestState::FetchingFirstPage => {
                let listing = source
                    .fetch_page(&channel.channel_uid, storefront, 1, options.page_size)
                    .await
                    .map_err(|source| HarvestError::FirstPage {
                        storefront: storefront.to_string(),
                        source,
                    })?;
                report.pages_fetched += 1;
                let total_pages = total_pages(listing.total_count, options.page_size);
                tracing::info!(
                    storefront = %storefront,
                    total_count = listing.total_count,
                    total_pages,
                    "fetched first listing page"
                );
                HarvestState::Processing {
                    page: 1,
                    total_pages,
                    listing,
                }
            }

            HarvestState::Processing {
                page,
                total_pages,
                listing,
            } => {
                match process_page(source, store, storefront, channel, options, listing, &mut report)
                    .await
                {
                    Some(reason) => {
                        tracing::info!(storefront = %storefront, page, %reason, "stopping");
                        HarvestState::Stopped(reason)
                    }
                    None => advance(page, total_pages),
                }
            }

            HarvestState::FetchingNextPage { page, total_pages } => {
                tokio::time::sleep(options.inter_page_delay).await;
                match fetch_with_cooldown(source, storefront, channel, options, page).await {
                    Ok(listing) => {
                        report.pages_fetched += 1;
                        HarvestState::Processing {
                            page,
                            total_pages,
                            listing,
                        }
                    }
                    Err(e) => {
                        report.pages_failed += 1;
                        tracing::warn!(
                            storefront = %storefront,
                            page,
                            error = %e,
                            "listing page failed; skipping"
                        );
                        advance(page, total_pages)
                    }
                }
            }

            HarvestState::Stopped(reason) => {
                report.stop_reason = reason;
                break;
            }
        };
    }

    tracing::info!(
        storefront = %storefront,
        channel_name = %report.channel_name,
        pages_fetched = report.pages_fetched,
        pages_failed = report.pages_failed,
        products_saved = report.products_saved,
        products_failed = report.products_failed,
        records_skipped = report.records_skipped,
        stop_reason = %report.stop_reason,
        "harvest finished"
    );
    Ok(report)
}

fn advance(page: u32, total_pages: u32) -> HarvestState {
    if page < total_pages {
        HarvestState::FetchingNextPage {
            page: page + 1,
            total_pages,
        }
    } else {
        HarvestState::Stopped(StopReason::LastPage)
    }
}

/// Transforms and persists one page, then applies the stopping rules.
async fn process_page<C: CatalogSource, S: KeyedStore>(
    source: &C,
    store: &S,
    storefront: &StorefrontName,
    channel: &ChannelInfo,
    options: &HarvestOptions,
    listing: ListingPage,
    report: &mut HarvestReport,
) -> Option<StopReason> {
    let raw_count = listing.simple_products.len();
    if raw_count == 0 {
        return Some(StopReason::EmptyPage);
    }

    let products = transform_products(
        listing.simple_products,
        source.base_url(),
        storefront.as_str(),
        &channel.special,
    );
    report.records_skipped += raw_count - products.len();

    let writes = persist_page(store, &products, options.max_concurrent_writes).await;
    report.products_saved += writes.saved;
    report.products_failed += writes.failed;

    tracing::info!(
        storefront = %storefront,
        page = ?listing.page,
        saved = writes.saved,
        failed = writes.failed,
        "processed listing page"
    );

    products
        .iter()
        .any(sfharvest_core::NormalizedProduct::is_new)
        .then_some(StopReason::NewProductSeen)
}

/// Fetches a later page; a rate-limited failure waits out the cooldown and
/// gets one more try.
async fn fetch_with_cooldown<C: CatalogSource>(
    source: &C,
    storefront: &StorefrontName,
    channel: &ChannelInfo,
    options: &HarvestOptions,
    page: u32,
) -> Result<ListingPage, ScraperError> {
    match source
        .fetch_page(&channel.channel_uid, storefront, page, options.page_size)
        .await
    {
        Err(e) if e.is_rate_limited() => {
            tracing::warn!(
                storefront = %storefront,
                page,
                cooldown_ms = u64::try_from(options.rate_limit_cooldown.as_millis()).unwrap_or(u64::MAX),
                "rate limited; cooling down before one more try"
            );
            tokio::time::sleep(options.rate_limit_cooldown).await;
            source
                .fetch_page(&channel.channel_uid, storefront, page, options.page_size)
                .await
        }
        other => other,
    }
}
