//! `show`: read back what a harvest stored for a channel.

use std::path::Path;

use sfharvest_core::NormalizedProduct;
use sfharvest_store::SqliteStore;

pub(crate) async fn run_show(db_dir: &Path, channel: &str, limit: u32) -> anyhow::Result<()> {
    let path = SqliteStore::file_path(db_dir, channel);
    anyhow::ensure!(
        path.exists(),
        "no store for channel \"{channel}\" at {}",
        path.display()
    );

    let store = SqliteStore::open_default(db_dir, channel).await?;
    let total = store.count_products().await?;
    let records = store.list_products(Some(limit)).await?;

    println!("{channel}: {total} stored products");
    for stored in &records {
        match stored.product() {
            Ok(product) => println!("{}", product_line(&product)),
            Err(e) => {
                tracing::warn!(id = %stored.id, error = %e, "stored record has unexpected shape");
                println!("{}\t{}", stored.id, serde_json::Value::Object(stored.record.clone()));
            }
        }
    }

    store.close().await;
    Ok(())
}

/// One tab-separated row: id, product number, prices, review count, flags, name.
///
/// Flags are `B` (best seller), `N` (newly listed) and `S` (on sale), with
/// `-` in place of an unset flag.
fn product_line(product: &NormalizedProduct) -> String {
    let flag = |set: bool, c: char| if set { c } else { '-' };
    let flags: String = [
        flag(product.is_best(), 'B'),
        flag(product.is_new(), 'N'),
        flag(product.is_discounted(), 'S'),
    ]
    .into_iter()
    .collect();
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        product.id,
        product.product_no,
        product.sale_price,
        product.discounted_sale_price,
        product.total_review_count,
        flags,
        product.name
    )
}
