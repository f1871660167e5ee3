//! Shared Types
//!
//! Identifiers, generations, request states and reconciliation policies.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClassifiedError;

/// Stable identifier of an item within a collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an identifier out of a JSON scalar (string or number)
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u32> for ItemId {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Fetch attempt counter. Strictly increasing per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of one tracked request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Failure(ClassifiedError),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestState::Success(_))
    }

    pub fn error(&self) -> Option<&ClassifiedError> {
        match self {
            RequestState::Failure(err) => Some(err),
            _ => None,
        }
    }

    /// Same state with the payload dropped
    pub fn status(&self) -> RequestState<()> {
        match self {
            RequestState::Idle => RequestState::Idle,
            RequestState::Loading => RequestState::Loading,
            RequestState::Success(_) => RequestState::Success(()),
            RequestState::Failure(err) => RequestState::Failure(err.clone()),
        }
    }
}

/// How a mutation's effect reaches the visible collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Patch the list immediately, roll back if the server rejects it
    Optimistic,
    /// Leave the list alone and re-run the current fetch once the server confirms
    RefetchOnSuccess,
}

/// An item together with its identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    pub id: ItemId,
    pub item: T,
}

impl<T> Entry<T> {
    pub fn new(id: impl Into<ItemId>, item: T) -> Self {
        Self { id: id.into(), item }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_id_from_json_scalars() {
        assert_eq!(ItemId::from_json(&json!("N1")), Some(ItemId::from("N1")));
        assert_eq!(ItemId::from_json(&json!(42)), Some(ItemId::from(42u32)));
        assert_eq!(ItemId::from_json(&json!("")), None);
        assert_eq!(ItemId::from_json(&json!(null)), None);
        assert_eq!(ItemId::from_json(&json!({"id": 1})), None);
    }

    #[test]
    fn test_request_state_status_drops_payload() {
        let state: RequestState<Vec<u32>> = RequestState::Success(vec![1, 2]);
        assert_eq!(state.status(), RequestState::Success(()));

        let failed: RequestState<Vec<u32>> = RequestState::Failure(ClassifiedError::Network("down".into()));
        assert!(failed.status().error().is_some());
        assert!(RequestState::<()>::default().is_idle());
    }
}
