//! Fetch Descriptors
//!
//! Immutable description of one page request. Two descriptors that compare
//! equal describe the same fetch.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar filter value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl FilterValue {
    /// Rendering used in query strings
    pub fn to_query_value(&self) -> String {
        match self {
            FilterValue::Bool(b) => b.to_string(),
            FilterValue::Integer(n) => n.to_string(),
            FilterValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_value())
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Integer(n)
    }
}

impl From<u32> for FilterValue {
    fn from(n: u32) -> Self {
        FilterValue::Integer(i64::from(n))
    }
}

/// Set of filter changes: `Some` sets a key, `None` removes it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    changes: BTreeMap<String, Option<FilterValue>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.changes.insert(key.into(), Some(value.into()));
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.changes.insert(key.into(), None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn apply_to(&self, filters: &mut BTreeMap<String, FilterValue>) {
        for (key, change) in &self.changes {
            match change {
                Some(value) => {
                    filters.insert(key.clone(), value.clone());
                }
                None => {
                    filters.remove(key);
                }
            }
        }
    }
}

/// One page request against a list resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchDescriptor {
    resource_path: String,
    filters: BTreeMap<String, FilterValue>,
    page: u32,
    page_size: u32,
}

impl FetchDescriptor {
    /// First page of `resource_path` with no filters
    pub fn new(resource_path: impl Into<String>, page_size: u32) -> Self {
        Self {
            resource_path: resource_path.into(),
            filters: BTreeMap::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    pub fn filters(&self) -> &BTreeMap<String, FilterValue> {
        &self.filters
    }

    pub fn filter(&self, key: &str) -> Option<&FilterValue> {
        self.filters.get(key)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn with_filters(mut self, filters: BTreeMap<String, FilterValue>) -> Self {
        self.filters = filters;
        self
    }

    /// Page numbers start at 1; zero is raised to 1
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Apply a filter patch. Returns the descriptor unchanged (same page) when
    /// the patch is a no-op, otherwise the patched descriptor back on page 1.
    pub fn patched(&self, patch: &FilterPatch) -> Self {
        let mut filters = self.filters.clone();
        patch.apply_to(&mut filters);
        if filters == self.filters {
            return self.clone();
        }
        Self {
            resource_path: self.resource_path.clone(),
            filters,
            page: 1,
            page_size: self.page_size,
        }
    }

    /// Query string pairs: filters in key order, then page and page size
    pub fn query_pairs(&self, page_param: &str, limit_param: &str) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(key, value)| (key.clone(), value.to_query_value()))
            .collect();
        pairs.push((page_param.to_owned(), self.page.to_string()));
        pairs.push((limit_param.to_owned(), self.page_size.to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rents() -> FetchDescriptor {
        FetchDescriptor::new("/rents", 10)
    }

    #[test]
    fn test_structural_equality() {
        let a = rents().patched(&FilterPatch::new().set("propertyId", "P1"));
        let b = rents().patched(&FilterPatch::new().set("propertyId", "P1"));
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with_page(2));
        assert_ne!(a, rents().patched(&FilterPatch::new().set("propertyId", "P2")));
    }

    #[test]
    fn test_page_and_size_clamped_to_one() {
        let d = FetchDescriptor::new("/vendors", 0).with_page(0);
        assert_eq!(d.page(), 1);
        assert_eq!(d.page_size(), 1);
    }

    #[test]
    fn test_patch_resets_page_only_when_filters_change() {
        let on_page_3 = rents().patched(&FilterPatch::new().set("status", "late")).with_page(3);

        let same = on_page_3.patched(&FilterPatch::new().set("status", "late"));
        assert_eq!(same.page(), 3);

        let changed = on_page_3.patched(&FilterPatch::new().set("status", "paid"));
        assert_eq!(changed.page(), 1);
        assert_eq!(changed.filter("status"), Some(&FilterValue::from("paid")));

        let removed = changed.patched(&FilterPatch::new().remove("status"));
        assert!(removed.filters().is_empty());
    }

    #[test]
    fn test_query_pairs_order() {
        let d = rents()
            .patched(&FilterPatch::new().set("propertyId", "P1").set("overdue", true))
            .with_page(2);
        assert_eq!(
            d.query_pairs("page", "limit"),
            vec![
                ("overdue".to_string(), "true".to_string()),
                ("propertyId".to_string(), "P1".to_string()),
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }
}
