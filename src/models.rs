//! Frontend Models
//!
//! Rows returned by the RentDesk REST API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentStatus {
    Paid,
    Pending,
    Late,
}

impl RentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RentStatus::Paid => "Paid",
            RentStatus::Pending => "Pending",
            RentStatus::Late => "Late",
        }
    }
}

/// One line of the rent ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentEntry {
    pub id: String,
    pub property_id: String,
    pub tenant_name: String,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub status: RentStatus,
}

/// Body of `POST /rents`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    pub property_id: String,
    pub tenant_name: String,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 3] = [
        DocumentStatus::Pending,
        DocumentStatus::Approved,
        DocumentStatus::Rejected,
    ];

    /// Value sent in the `status` filter
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingDocument {
    pub id: String,
    pub tenant_name: String,
    pub document_type: String,
    pub status: DocumentStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub trade: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// `123456` -> `"$1,234.56"`
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// `"1,234.5"` -> `123450`; at most two decimals
pub fn parse_amount(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let (whole, fraction) = match cleaned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (cleaned.as_str(), ""),
    };
    if whole.is_empty() || fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let dollars: i64 = whole.parse().ok()?;
    let cents: i64 = format!("{fraction:0<2}").parse().ok()?;
    if dollars < 0 {
        return None;
    }
    dollars.checked_mul(100)?.checked_add(cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(0), "$0.00");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(123456), "$1,234.56");
        assert_eq!(format_cents(100000000), "$1,000,000.00");
        assert_eq!(format_cents(-250), "-$2.50");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1200"), Some(120000));
        assert_eq!(parse_amount("$1,250.5"), Some(125050));
        assert_eq!(parse_amount("0.99"), Some(99));
        assert_eq!(parse_amount("12.345"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("-5"), None);
    }

    #[test]
    fn test_rent_entry_from_api_row() {
        let row = serde_json::json!({
            "id": "r-17",
            "propertyId": "P1",
            "tenantName": "Ada Lovelace",
            "amountCents": 185000,
            "dueDate": "2026-11-01",
            "status": "late"
        });
        let rent: RentEntry = serde_json::from_value(row).unwrap();
        assert_eq!(rent.status, RentStatus::Late);
        assert_eq!(rent.due_date, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
    }

    #[test]
    fn test_document_status_round_trip_through_filter_value() {
        for status in DocumentStatus::ALL {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DocumentStatus::parse("archived"), None);
    }
}
