//! Vendor Directory Commands

use collection_controller::{CollectionConfig, ItemId, TransportRequest};

use super::member_path;

pub const VENDORS_PATH: &str = "/vendors";

pub fn vendors_config(page_size: u32) -> CollectionConfig {
    CollectionConfig::new(VENDORS_PATH)
        .with_page_size(page_size)
        .with_search_key("q")
}

pub fn remove_vendor_request(id: &ItemId) -> TransportRequest {
    TransportRequest::delete(member_path(VENDORS_PATH, id.as_str()))
}
