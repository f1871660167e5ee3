//! Page Results
//!
//! Decoding of `{data: [...], pagination: {...}}` list responses into typed
//! pages whose metadata always satisfies
//! `total_pages = ceil(total_items / page_size)` and `items.len() <= page_size`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::config::CollectionConfig;
use crate::descriptor::FetchDescriptor;
use crate::error::ClassifiedError;
use crate::types::{Entry, ItemId};

/// Page metadata without the items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total_items: u64) -> Self {
        let page_size = page_size.max(1);
        Self {
            page: page.max(1),
            page_size,
            total_items,
            total_pages: Self::pages_for(total_items, page_size),
        }
    }

    /// `ceil(total_items / page_size)`
    pub fn pages_for(total_items: u64, page_size: u32) -> u32 {
        let size = u64::from(page_size.max(1));
        u32::try_from(total_items.div_ceil(size)).unwrap_or(u32::MAX)
    }

    /// Highest page that can be shown; an empty collection still has page 1
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    pub fn with_total_items(self, total_items: u64) -> Self {
        Self::new(self.page, self.page_size, total_items)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// One decoded page
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Decode a list response for `requested` using the envelope names in `config`.
///
/// Missing pagination fields fall back to the requested page/size and the
/// number of returned items. The server's `pages` value is only checked, never
/// trusted.
pub fn decode_page<T: DeserializeOwned>(
    body: Value,
    config: &CollectionConfig,
    requested: &FetchDescriptor,
) -> Result<PageResult<Entry<T>>, ClassifiedError> {
    let fields = &config.envelope;
    let Value::Object(mut envelope) = body else {
        return Err(ClassifiedError::Decode("list response is not an object".into()));
    };
    let Some(Value::Array(raw_items)) = envelope.remove(&fields.data) else {
        return Err(ClassifiedError::Decode(format!(
            "list response has no `{}` array",
            fields.data
        )));
    };

    let mut items = Vec::with_capacity(raw_items.len());
    for raw in raw_items {
        let id = raw
            .get(&config.id_field)
            .and_then(ItemId::from_json)
            .ok_or_else(|| {
                ClassifiedError::Decode(format!("item without `{}` identifier", config.id_field))
            })?;
        let item = serde_json::from_value::<T>(raw)
            .map_err(|e| ClassifiedError::Decode(format!("item {id}: {e}")))?;
        items.push(Entry { id, item });
    }

    let meta = envelope.get(&fields.pagination);
    let read = |key: &str| meta.and_then(|m| m.get(key)).and_then(Value::as_u64);

    let page = read(fields.page.as_str())
        .and_then(|p| u32::try_from(p).ok())
        .unwrap_or(requested.page());
    let page_size = read(fields.limit.as_str())
        .and_then(|l| u32::try_from(l).ok())
        .filter(|l| *l > 0)
        .unwrap_or(requested.page_size());
    let total_items = read(fields.total.as_str()).unwrap_or(items.len() as u64);
    let pagination = Pagination::new(page, page_size, total_items);

    if let Some(reported) = read(fields.pages.as_str()) {
        if reported != u64::from(pagination.total_pages) {
            warn!(
                resource = requested.resource_path(),
                reported,
                computed = pagination.total_pages,
                "server page count disagrees with totals"
            );
        }
    }
    if items.len() > pagination.page_size as usize {
        warn!(
            resource = requested.resource_path(),
            received = items.len(),
            page_size = pagination.page_size,
            "truncating oversized page"
        );
        items.truncate(pagination.page_size as usize);
    }

    Ok(PageResult { items, pagination })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Rent {
        id: String,
        amount: u32,
    }

    fn config() -> CollectionConfig {
        CollectionConfig::new("/rents")
    }

    fn rows(n: usize) -> Vec<Value> {
        (1..=n).map(|i| json!({"id": format!("R{i}"), "amount": 100 * i})).collect()
    }

    #[test]
    fn test_pages_for() {
        assert_eq!(Pagination::pages_for(0, 10), 0);
        assert_eq!(Pagination::pages_for(10, 10), 1);
        assert_eq!(Pagination::pages_for(25, 10), 3);
        assert_eq!(Pagination::new(1, 10, 0).last_page(), 1);
    }

    #[test]
    fn test_decode_list_response() {
        let body = json!({
            "data": rows(10),
            "pagination": {"page": 1, "limit": 10, "total": 25, "pages": 3}
        });
        let page = decode_page::<Rent>(body, &config(), &config().initial_descriptor()).unwrap();

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items[0].id, ItemId::from("R1"));
        assert_eq!(page.items[2].item, Rent { id: "R3".into(), amount: 300 });
        assert_eq!(page.pagination, Pagination::new(1, 10, 25));
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_next());
        assert!(!page.pagination.has_previous());
    }

    #[test]
    fn test_decode_recomputes_pages_and_truncates() {
        let body = json!({
            "data": rows(4),
            "pagination": {"page": 2, "limit": 3, "total": 7, "pages": 99}
        });
        let page = decode_page::<Rent>(body, &config(), &config().initial_descriptor()).unwrap();
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.items.len(), 3);
    }

    #[test]
    fn test_decode_falls_back_to_requested_paging() {
        let requested = config().initial_descriptor().with_page(4);
        let page = decode_page::<Rent>(json!({"data": rows(2)}), &config(), &requested).unwrap();
        assert_eq!(page.pagination.page, 4);
        assert_eq!(page.pagination.page_size, 10);
        assert_eq!(page.pagination.total_items, 2);
    }

    #[test]
    fn test_decode_uses_configured_field_names() {
        let mut cfg = config().with_id_field("rentId");
        cfg.envelope.data = "results".into();
        cfg.envelope.total = "count".into();
        let body = json!({
            "results": [{"rentId": 7, "id": "x", "amount": 5}],
            "pagination": {"count": 1}
        });
        let page = decode_page::<Rent>(body, &cfg, &cfg.initial_descriptor()).unwrap();
        assert_eq!(page.items[0].id, ItemId::from(7u32));
    }

    #[test]
    fn test_decode_errors() {
        let d = config().initial_descriptor();
        assert!(matches!(
            decode_page::<Rent>(json!([1, 2]), &config(), &d),
            Err(ClassifiedError::Decode(_))
        ));
        assert!(matches!(
            decode_page::<Rent>(json!({"data": {}}), &config(), &d),
            Err(ClassifiedError::Decode(_))
        ));
        assert!(matches!(
            decode_page::<Rent>(json!({"data": [{"amount": 1}]}), &config(), &d),
            Err(ClassifiedError::Decode(_))
        ));
        assert!(matches!(
            decode_page::<Rent>(json!({"data": [{"id": "R1", "amount": "lots"}]}), &config(), &d),
            Err(ClassifiedError::Decode(_))
        ));
    }
}
