//! Request Lifecycle Tracker
//!
//! Runs one call at a time and exposes its `RequestState`.
//!
//! ```text
//! Idle --start--> Loading --ok--> Success
//!                         --err-> Failure
//! Success | Failure --start--> Loading
//! ```
//!
//! Every started call gets a fresh generation. Only the call holding the
//! current generation may move the tracker out of `Loading`; every settlement
//! (current or not) is still reported to the `on_settled` callback, which
//! decides what to do with it.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::task::{LocalSpawn, LocalSpawnExt};
use tracing::{debug, error};

use crate::error::ClassifiedError;
use crate::types::{Generation, RequestState};

type SettledCallback<T> = Rc<dyn Fn(Generation, Result<T, ClassifiedError>)>;

struct TrackerInner<D, T> {
    state: RequestState<T>,
    generation: Generation,
    /// Descriptor of the current generation while it is loading
    in_flight: Option<D>,
    on_settled: Option<SettledCallback<T>>,
}

/// Tracks the lifecycle of calls keyed by a descriptor `D` producing `T`
pub struct RequestTracker<D, T> {
    inner: Rc<RefCell<TrackerInner<D, T>>>,
    spawner: Rc<dyn LocalSpawn>,
}

impl<D, T> RequestTracker<D, T>
where
    D: PartialEq + 'static,
    T: Clone + 'static,
{
    pub fn new(spawner: Rc<dyn LocalSpawn>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TrackerInner {
                state: RequestState::Idle,
                generation: Generation::default(),
                in_flight: None,
                on_settled: None,
            })),
            spawner,
        }
    }

    /// Register the settlement callback, replacing any previous one
    pub fn on_settled(&self, callback: impl Fn(Generation, Result<T, ClassifiedError>) + 'static) {
        self.inner.borrow_mut().on_settled = Some(Rc::new(callback));
    }

    pub fn state(&self) -> RequestState<T> {
        self.inner.borrow().state.clone()
    }

    /// Generation of the most recently started call
    pub fn current_generation(&self) -> Generation {
        self.inner.borrow().generation
    }

    pub fn is_loading(&self) -> bool {
        self.inner.borrow().state.is_loading()
    }

    /// Start a call for `descriptor` unless an identical one is already
    /// loading, in which case nothing is issued and the in-flight generation
    /// is returned.
    pub fn start<F, Fut>(&self, descriptor: D, call: F) -> Generation
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClassifiedError>> + 'static,
    {
        {
            let inner = self.inner.borrow();
            if inner.state.is_loading() && inner.in_flight.as_ref() == Some(&descriptor) {
                debug!(generation = %inner.generation, "identical request already in flight");
                return inner.generation;
            }
        }
        self.launch(descriptor, call)
    }

    /// Start a call for `descriptor` even if an identical one is loading
    pub fn start_forced<F, Fut>(&self, descriptor: D, call: F) -> Generation
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClassifiedError>> + 'static,
    {
        self.launch(descriptor, call)
    }

    fn launch<F, Fut>(&self, descriptor: D, call: F) -> Generation
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClassifiedError>> + 'static,
    {
        let generation = {
            let mut inner = self.inner.borrow_mut();
            inner.generation = inner.generation.next();
            inner.state = RequestState::Loading;
            inner.in_flight = Some(descriptor);
            inner.generation
        };

        let pending = call();
        let weak = Rc::downgrade(&self.inner);
        let task = async move {
            let result = pending.await;
            if let Some(inner) = weak.upgrade() {
                Self::settle(&inner, generation, result);
            }
        };
        if let Err(err) = self.spawner.spawn_local(task) {
            error!(%generation, %err, "failed to spawn request");
            Self::settle(
                &self.inner,
                generation,
                Err(ClassifiedError::Network(format!("request could not be scheduled: {err}"))),
            );
        }
        generation
    }

    fn settle(inner: &Rc<RefCell<TrackerInner<D, T>>>, generation: Generation, result: Result<T, ClassifiedError>) {
        let callback = {
            let mut guard = inner.borrow_mut();
            if generation == guard.generation {
                guard.state = match &result {
                    Ok(data) => RequestState::Success(data.clone()),
                    Err(err) => RequestState::Failure(err.clone()),
                };
                guard.in_flight = None;
            }
            guard.on_settled.clone()
        };
        if let Some(callback) = callback {
            callback(generation, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::LocalPool;
    use std::cell::Cell;

    type Reply = oneshot::Sender<Result<u32, ClassifiedError>>;

    fn tracker(pool: &LocalPool) -> RequestTracker<&'static str, u32> {
        RequestTracker::new(Rc::new(pool.spawner()))
    }

    /// Call that stays pending until the returned sender fires
    fn held() -> (Reply, impl Future<Output = Result<u32, ClassifiedError>>) {
        let (tx, rx) = oneshot::channel();
        let fut = async move { rx.await.unwrap_or_else(|_| Err(ClassifiedError::Network("dropped".into()))) };
        (tx, fut)
    }

    #[test]
    fn test_starts_idle_and_settles_success() {
        let mut pool = LocalPool::new();
        let tracker = tracker(&pool);
        assert!(tracker.state().is_idle());

        let (tx, fut) = held();
        let generation = tracker.start("page-1", move || fut);
        assert_eq!(generation.value(), 1);
        assert!(tracker.is_loading());

        tx.send(Ok(7)).unwrap();
        pool.run_until_stalled();
        assert_eq!(tracker.state(), RequestState::Success(7));
    }

    #[test]
    fn test_failure_then_restart() {
        let mut pool = LocalPool::new();
        let tracker = tracker(&pool);

        let (tx, fut) = held();
        tracker.start("page-1", move || fut);
        tx.send(Err(ClassifiedError::Http { status: 500, message: "boom".into() })).unwrap();
        pool.run_until_stalled();
        assert!(tracker.state().error().is_some());

        let (_tx, fut) = held();
        let generation = tracker.start("page-1", move || fut);
        assert_eq!(generation.value(), 2);
        assert!(tracker.is_loading());
    }

    #[test]
    fn test_identical_descriptor_while_loading_is_suppressed() {
        let pool = LocalPool::new();
        let tracker = tracker(&pool);
        let calls = Rc::new(Cell::new(0));

        let (_tx1, fut1) = held();
        let counter = calls.clone();
        let first = tracker.start("page-1", move || {
            counter.set(counter.get() + 1);
            fut1
        });

        let (_tx2, fut2) = held();
        let counter = calls.clone();
        let second = tracker.start("page-1", move || {
            counter.set(counter.get() + 1);
            fut2
        });

        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);

        let (_tx3, fut3) = held();
        let forced = tracker.start_forced("page-1", move || fut3);
        assert_eq!(forced.value(), 2);
    }

    #[test]
    fn test_stale_settlement_reported_but_state_untouched() {
        let mut pool = LocalPool::new();
        let tracker = tracker(&pool);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        tracker.on_settled(move |generation, result| log.borrow_mut().push((generation.value(), result)));

        let (tx1, fut1) = held();
        tracker.start("page-1", move || fut1);
        let (tx2, fut2) = held();
        tracker.start("page-2", move || fut2);

        tx1.send(Ok(1)).unwrap();
        pool.run_until_stalled();
        assert!(tracker.is_loading());

        tx2.send(Ok(2)).unwrap();
        pool.run_until_stalled();
        assert_eq!(tracker.state(), RequestState::Success(2));
        assert_eq!(*seen.borrow(), vec![(1, Ok(1)), (2, Ok(2))]);
    }
}
