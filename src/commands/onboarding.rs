//! Onboarding Document Commands

use collection_controller::{CollectionConfig, ItemId, TransportRequest};
use serde_json::json;

use super::member_path;
use crate::models::DocumentStatus;

pub const ONBOARDING_PATH: &str = "/onboarding/documents";
pub const STATUS_FILTER: &str = "status";

/// Opens on the pending queue
pub fn onboarding_config(page_size: u32) -> CollectionConfig {
    CollectionConfig::new(ONBOARDING_PATH)
        .with_page_size(page_size)
        .with_default_filter(STATUS_FILTER, DocumentStatus::Pending.as_str())
}

pub fn set_document_status_request(id: &ItemId, status: DocumentStatus) -> TransportRequest {
    TransportRequest::put(
        format!("{}/status", member_path(ONBOARDING_PATH, id.as_str())),
        json!({ "status": status }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_queue_is_default() {
        let descriptor = onboarding_config(10).initial_descriptor();
        assert_eq!(
            descriptor.filter(STATUS_FILTER).map(|v| v.to_query_value()),
            Some("pending".to_string())
        );
    }

    #[test]
    fn test_approve_request() {
        let request = set_document_status_request(&ItemId::from("d-1"), DocumentStatus::Approved);
        assert_eq!(request.path, "/onboarding/documents/d-1/status");
        assert_eq!(request.body, Some(json!({"status": "approved"})));
    }
}
