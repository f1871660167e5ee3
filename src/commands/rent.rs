//! Rent Ledger Commands

use collection_controller::{ClassifiedError, CollectionConfig, TransportRequest};

use crate::models::PaymentDraft;

pub const RENTS_PATH: &str = "/rents";
pub const PROPERTY_FILTER: &str = "propertyId";

pub fn rent_ledger_config(page_size: u32) -> CollectionConfig {
    CollectionConfig::new(RENTS_PATH).with_page_size(page_size)
}

pub fn record_payment_request(draft: &PaymentDraft) -> Result<TransportRequest, ClassifiedError> {
    let body = serde_json::to_value(draft).map_err(|e| ClassifiedError::Decode(e.to_string()))?;
    Ok(TransportRequest::post(RENTS_PATH, body))
}
