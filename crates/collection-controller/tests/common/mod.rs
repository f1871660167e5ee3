//! Shared test harness: a transport whose calls stay open until the test
//! resolves them, and an alert channel that records what it was told.

#![allow(dead_code)]

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use async_trait::async_trait;
use collection_controller::{
    AlertChannel, ClassifiedError, CollectionConfig, CollectionController, MutationDispatcher,
    Transport, TransportRequest, TransportResult,
};
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

struct Call {
    request: TransportRequest,
    reply: Option<oneshot::Sender<TransportResult>>,
}

/// Records every request and holds it open until `resolve` is called
#[derive(Default)]
pub struct ScriptedTransport {
    calls: RefCell<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn request(&self, index: usize) -> TransportRequest {
        self.calls.borrow()[index].request.clone()
    }

    pub fn query_value(&self, index: usize, key: &str) -> Option<String> {
        self.request(index)
            .query
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn resolve(&self, index: usize, result: TransportResult) {
        let reply = self.calls.borrow_mut()[index]
            .reply
            .take()
            .expect("call already resolved");
        reply.send(result).expect("caller went away");
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn call(&self, request: TransportRequest) -> TransportResult {
        let (tx, rx) = oneshot::channel();
        self.calls.borrow_mut().push(Call {
            request,
            reply: Some(tx),
        });
        rx.await
            .unwrap_or_else(|_| Err(ClassifiedError::Network("reply dropped".into())))
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    pub successes: RefCell<Vec<String>>,
    pub errors: RefCell<Vec<String>>,
}

impl RecordingAlerts {
    pub fn error_count(&self) -> usize {
        self.errors.borrow().len()
    }
}

impl AlertChannel for RecordingAlerts {
    fn notify_success(&self, message: &str) {
        self.successes.borrow_mut().push(message.to_owned());
    }

    fn notify_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_owned());
    }
}

pub type Outcome = Rc<RefCell<Option<Result<(), ClassifiedError>>>>;

pub struct Harness {
    pub pool: LocalPool,
    pub transport: Rc<ScriptedTransport>,
    pub alerts: Rc<RecordingAlerts>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            pool: LocalPool::new(),
            transport: Rc::new(ScriptedTransport::default()),
            alerts: Rc::new(RecordingAlerts::default()),
        }
    }

    pub fn controller<T>(&self, config: CollectionConfig) -> CollectionController<T>
    where
        T: DeserializeOwned + Clone + 'static,
    {
        CollectionController::new(
            config,
            self.transport.clone(),
            self.alerts.clone(),
            Rc::new(self.pool.spawner()),
        )
    }

    pub fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Resolve call `index` and let everything settle
    pub fn reply(&mut self, index: usize, result: TransportResult) {
        self.transport.resolve(index, result);
        self.run();
    }

    /// Future performing `request` through the scripted transport
    pub fn call(&self, request: TransportRequest) -> impl Future<Output = TransportResult> + 'static {
        let transport = self.transport.clone();
        async move { transport.call(request).await }
    }

    /// Spawn a dispatcher operation and capture its result
    pub fn spawn_outcome<Fut>(&self, operation: Fut) -> Outcome
    where
        Fut: Future<Output = Result<(), ClassifiedError>> + 'static,
    {
        let outcome: Outcome = Rc::new(RefCell::new(None));
        let slot = outcome.clone();
        self.pool
            .spawner()
            .spawn_local(async move {
                *slot.borrow_mut() = Some(operation.await);
            })
            .expect("spawn");
        outcome
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rent {
    pub id: String,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub read: bool,
}

pub fn rent_rows(page: u32, count: u32) -> Vec<Value> {
    (1..=count)
        .map(|i| json!({"id": format!("R{page}-{i}"), "amount": 1000 + i}))
        .collect()
}

pub fn notification_rows(ids: &[&str]) -> Vec<Value> {
    ids.iter()
        .map(|id| json!({"id": id, "title": format!("Notice {id}"), "read": false}))
        .collect()
}

pub fn list_body(items: Vec<Value>, page: u32, limit: u32, total: u64) -> Value {
    let pages = total.div_ceil(u64::from(limit));
    json!({
        "data": items,
        "pagination": {"page": page, "limit": limit, "total": total, "pages": pages}
    })
}

pub fn ids<T>(controller: &CollectionController<T>) -> Vec<String>
where
    T: DeserializeOwned + Clone + 'static,
{
    controller
        .view()
        .items
        .iter()
        .map(|entry| entry.id.to_string())
        .collect()
}

pub fn dispatcher<T>(controller: &CollectionController<T>) -> MutationDispatcher<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    MutationDispatcher::new(controller.clone())
}

pub fn server_error() -> ClassifiedError {
    ClassifiedError::Http {
        status: 500,
        message: "Internal Server Error".into(),
    }
}
