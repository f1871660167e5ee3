//! Notification Commands

use collection_controller::{CollectionConfig, ItemId, TransportRequest};
use serde_json::json;

use super::member_path;

pub const NOTIFICATIONS_PATH: &str = "/notifications";

pub fn notifications_config(page_size: u32) -> CollectionConfig {
    CollectionConfig::new(NOTIFICATIONS_PATH).with_page_size(page_size)
}

pub fn mark_read_request(id: &ItemId) -> TransportRequest {
    TransportRequest::patch(member_path(NOTIFICATIONS_PATH, id.as_str()), json!({ "read": true }))
}

pub fn delete_notification_request(id: &ItemId) -> TransportRequest {
    TransportRequest::delete(member_path(NOTIFICATIONS_PATH, id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_controller::Method;

    #[test]
    fn test_notification_requests() {
        let id = ItemId::from("n-3");
        let mark = mark_read_request(&id);
        assert_eq!(mark.method, Method::Patch);
        assert_eq!(mark.path, "/notifications/n-3");
        assert_eq!(mark.body, Some(json!({"read": true})));

        let delete = delete_notification_request(&id);
        assert_eq!(delete.method, Method::Delete);
        assert_eq!(delete.body, None);
    }
}
