//! Per-page fan-out of store merges.

use futures::stream::{self, StreamExt};

use sfharvest_core::NormalizedProduct;
use sfharvest_store::{merge_product, KeyedStore};

/// Saved/failed counts for one page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct PageWrites {
    pub saved: usize,
    pub failed: usize,
}

/// Merges every product of a page into `store`, at most `max_concurrent`
/// at a time, and waits for all of them. A failed write is logged and does
/// not affect its siblings.
pub(super) async fn persist_page<S: KeyedStore>(
    store: &S,
    products: &[NormalizedProduct],
    max_concurrent: usize,
) -> PageWrites {
    let results: Vec<_> = stream::iter(products)
        .map(|product| async move { (product, merge_product(store, product).await) })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut writes = PageWrites::default();
    for (product, result) in results {
        match result {
            Ok(()) => writes.saved += 1,
            Err(e) => {
                writes.failed += 1;
                tracing::error!(
                    id = %product.id,
                    product_no = %product.product_no,
                    error = %e,
                    "failed to save product"
                );
            }
        }
    }
    writes
}
