//! Collection Configuration
//!
//! Per-resource constants: where the list lives, how items are identified,
//! and what the list envelope and query parameters are called.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::descriptor::{FetchDescriptor, FilterValue};
use crate::error::ConfigError;
use crate::transport::TransportRequest;

/// Field names of the list response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeFields {
    pub data: String,
    pub pagination: String,
    pub page: String,
    pub limit: String,
    pub total: String,
    pub pages: String,
}

impl Default for EnvelopeFields {
    fn default() -> Self {
        Self {
            data: "data".to_string(),
            pagination: "pagination".to_string(),
            page: "page".to_string(),
            limit: "limit".to_string(),
            total: "total".to_string(),
            pages: "pages".to_string(),
        }
    }
}

/// Query parameter names for paging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    pub page: String,
    pub limit: String,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: "page".to_string(),
            limit: "limit".to_string(),
        }
    }
}

/// Configuration supplied when a controller is constructed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectionConfig {
    pub resource_path: String,
    pub id_field: String,
    pub default_filters: BTreeMap<String, FilterValue>,
    pub page_size: u32,
    /// Filter key written by `set_search`
    pub search_key: String,
    pub envelope: EnvelopeFields,
    pub query: QueryParams,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            resource_path: String::new(),
            id_field: "id".to_string(),
            default_filters: BTreeMap::new(),
            page_size: 10,
            search_key: "search".to_string(),
            envelope: EnvelopeFields::default(),
            query: QueryParams::default(),
        }
    }
}

impl CollectionConfig {
    pub fn new(resource_path: impl Into<String>) -> Self {
        Self {
            resource_path: resource_path.into(),
            ..Default::default()
        }
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_default_filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.default_filters.insert(key.into(), value.into());
        self
    }

    pub fn with_search_key(mut self, key: impl Into<String>) -> Self {
        self.search_key = key.into();
        self
    }

    /// Parse and validate a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resource_path.trim().is_empty() {
            return Err(ConfigError::Invalid("resourcePath must not be empty".into()));
        }
        if self.id_field.trim().is_empty() {
            return Err(ConfigError::Invalid("idField must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("pageSize must be at least 1".into()));
        }
        Ok(())
    }

    /// Descriptor for the first page with the default filters applied
    pub fn initial_descriptor(&self) -> FetchDescriptor {
        FetchDescriptor::new(self.resource_path.clone(), self.page_size)
            .with_filters(self.default_filters.clone())
    }

    /// GET request that fetches `descriptor`
    pub fn fetch_request(&self, descriptor: &FetchDescriptor) -> TransportRequest {
        TransportRequest::get(descriptor.resource_path())
            .with_query(descriptor.query_pairs(&self.query.page, &self.query.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Method;

    #[test]
    fn test_from_json_applies_defaults() {
        let config = CollectionConfig::from_json(
            r#"{"resourcePath":"/notifications","defaultFilters":{"unread":true}}"#,
        )
        .expect("valid config");
        assert_eq!(config.resource_path, "/notifications");
        assert_eq!(config.id_field, "id");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.envelope.total, "total");
        assert_eq!(config.default_filters.get("unread"), Some(&FilterValue::Bool(true)));
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            CollectionConfig::from_json(r#"{"idField":"id"}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CollectionConfig::from_json(r#"{"resourcePath":"/rents","pageSize":0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(CollectionConfig::from_json("not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_fetch_request_uses_configured_params() {
        let mut config = CollectionConfig::new("/vendors")
            .with_page_size(25)
            .with_default_filter("active", true);
        config.query.limit = "per_page".to_string();

        let request = config.fetch_request(&config.initial_descriptor().with_page(3));
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/vendors");
        assert_eq!(
            request.query,
            vec![
                ("active".to_string(), "true".to_string()),
                ("page".to_string(), "3".to_string()),
                ("per_page".to_string(), "25".to_string()),
            ]
        );
    }
}
