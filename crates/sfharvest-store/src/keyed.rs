//! Read-modify-write merge over any keyed record store.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use sfharvest_core::NormalizedProduct;

use crate::StoreError;

/// A flat JSON object as persisted per key.
pub type Record = Map<String, Value>;

/// Minimal keyed persistence: fetch-with-default and overwrite.
pub trait KeyedStore: Send + Sync {
    /// Returns the record at `key`, or `default` when the key is absent.
    fn get_or_default(
        &self,
        key: &str,
        default: Record,
    ) -> impl Future<Output = Result<Record, StoreError>> + Send;

    /// Writes `record` at `key`, replacing any previous value.
    fn put(
        &self,
        key: &str,
        record: &Record,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Merges `product` into the record stored at `product.id`.
///
/// Fields of `product` overwrite same-named stored fields; stored fields the
/// product does not carry are kept. Merging the same product twice leaves
/// the record unchanged apart from its update timestamp.
///
/// # Errors
///
/// Returns [`StoreError`] if the product cannot be encoded or the store
/// read/write fails.
pub async fn merge_product<S: KeyedStore>(
    store: &S,
    product: &NormalizedProduct,
) -> Result<(), StoreError> {
    let Value::Object(incoming) =
        serde_json::to_value(product).map_err(|source| StoreError::Encode {
            id: product.id.clone(),
            source,
        })?
    else {
        return Err(StoreError::NotAnObject {
            id: product.id.clone(),
        });
    };

    let mut merged = store.get_or_default(&product.id, Record::new()).await?;
    merged.extend(incoming);
    store.put(&product.id, &merged, Utc::now()).await?;

    tracing::debug!(
        id = %product.id,
        product_no = %product.product_no,
        name = %product.name,
        "merged product"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::json;
    use sfharvest_core::ProductTag;

    use super::*;

    #[derive(Default)]
    struct MapStore {
        records: Mutex<HashMap<String, (Record, DateTime<Utc>)>>,
    }

    impl MapStore {
        fn get(&self, key: &str) -> Option<Record> {
            self.records
                .lock()
                .unwrap()
                .get(key)
                .map(|(record, _)| record.clone())
        }
    }

    impl KeyedStore for MapStore {
        async fn get_or_default(&self, key: &str, default: Record) -> Result<Record, StoreError> {
            Ok(self.get(key).unwrap_or(default))
        }

        async fn put(
            &self,
            key: &str,
            record: &Record,
            updated_at: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            self.records
                .lock()
                .unwrap()
                .insert(key.to_owned(), (record.clone(), updated_at));
            Ok(())
        }
    }

    fn product(id: &str, price: i64) -> NormalizedProduct {
        NormalizedProduct {
            id: id.to_owned(),
            product_no: format!("9{id}"),
            name: "Cold Brew Pack".to_owned(),
            url: format!("https://smartstore.naver.com/beanshop/products/{id}"),
            sale_price: price,
            discounted_sale_price: price,
            mobile_discounted_sale_price: price,
            total_review_count: 4,
            tags: vec![ProductTag::Best],
        }
    }

    #[tokio::test]
    async fn merge_into_empty_store_writes_product_fields() {
        let store = MapStore::default();
        merge_product(&store, &product("1", 10_000)).await.unwrap();

        let record = store.get("1").unwrap();
        assert_eq!(record["id"], json!("1"));
        assert_eq!(record["salePrice"], json!(10_000));
        assert_eq!(record["tags"], json!(["BEST"]));
    }

    #[tokio::test]
    async fn merge_is_idempotent() {
        let store = MapStore::default();
        merge_product(&store, &product("1", 10_000)).await.unwrap();
        let once = store.get("1").unwrap();
        merge_product(&store, &product("1", 10_000)).await.unwrap();
        assert_eq!(store.get("1").unwrap(), once);
    }

    #[tokio::test]
    async fn merge_overwrites_changed_fields_and_keeps_unknown_ones() {
        let store = MapStore::default();
        let mut existing = Record::new();
        existing.insert("salePrice".to_owned(), json!(1));
        existing.insert("note".to_owned(), json!("kept"));
        store.put("1", &existing, Utc::now()).await.unwrap();

        merge_product(&store, &product("1", 12_500)).await.unwrap();

        let record = store.get("1").unwrap();
        assert_eq!(record["salePrice"], json!(12_500));
        assert_eq!(record["note"], json!("kept"));
    }
}
