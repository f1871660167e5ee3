//! Collection Controller
//!
//! Fetches paginated, filterable collections from a remote API and keeps the
//! visible list consistent with the requests in flight:
//! - tracker: lifecycle of one call plus a generation counter
//! - controller: visible view of one list resource, latest fetch wins
//! - dispatcher: optimistic or refetching mutations with rollback
//!
//! Everything runs on a single logical thread. Async work is spawned on an
//! injected `LocalSpawn`, so the same code runs on the browser event loop and
//! on a `LocalPool` in tests.

mod alert;
mod config;
mod controller;
mod descriptor;
mod dispatcher;
mod error;
mod page;
mod tracker;
mod transport;
mod types;

pub use alert::AlertChannel;
pub use config::{CollectionConfig, EnvelopeFields, QueryParams};
pub use controller::{CollectionController, CollectionView, SubscriptionId};
pub use descriptor::{FetchDescriptor, FilterPatch, FilterValue};
pub use dispatcher::{MutationDispatcher, PendingMutation};
pub use error::{ClassifiedError, ConfigError};
pub use page::{decode_page, PageResult, Pagination};
pub use tracker::RequestTracker;
pub use transport::{Method, Transport, TransportRequest, TransportResult};
pub use types::{Entry, Generation, ItemId, Reconciliation, RequestState};
