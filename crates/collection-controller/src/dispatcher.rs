//! Mutation Dispatcher
//!
//! Runs create/update/delete calls against a collection and reconciles the
//! controller's items, either optimistically (patch now, roll back on
//! failure) or by re-fetching once the server confirms.
//!
//! Mutations on the same item are serialized so a rollback always restores
//! the value that was visible right before that mutation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::lock::Mutex;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::controller::{CollectionController, MutationPatch, RowAnchor};
use crate::error::ClassifiedError;
use crate::transport::TransportResult;
use crate::types::{Entry, ItemId, Reconciliation};

/// A mutation whose transport call has not resolved yet
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMutation<T> {
    pub target_id: ItemId,
    /// Value visible before the mutation, restored on failure
    pub previous_value: T,
    pub applied_value: T,
    pub reconciliation: Reconciliation,
}

/// Dispatches mutations for one collection. Cheap to clone.
pub struct MutationDispatcher<T> {
    controller: CollectionController<T>,
    locks: Rc<RefCell<HashMap<ItemId, Rc<Mutex<()>>>>>,
    pending: Rc<RefCell<HashMap<ItemId, PendingMutation<T>>>>,
}

impl<T> Clone for MutationDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            locks: Rc::clone(&self.locks),
            pending: Rc::clone(&self.pending),
        }
    }
}

impl<T> MutationDispatcher<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    pub fn new(controller: CollectionController<T>) -> Self {
        Self {
            controller,
            locks: Rc::new(RefCell::new(HashMap::new())),
            pending: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn controller(&self) -> &CollectionController<T> {
        &self.controller
    }

    pub fn is_pending(&self, id: &ItemId) -> bool {
        self.pending.borrow().contains_key(id)
    }

    pub fn pending(&self, id: &ItemId) -> Option<PendingMutation<T>> {
        self.pending.borrow().get(id).cloned()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Change the item `target_id` through `call`.
    ///
    /// Fails with `NotFound` (without running `call`) when the item is not
    /// visible. Transport failures are reported to the alert channel and
    /// returned.
    pub async fn mutate<F, Fut>(
        &self,
        target_id: impl Into<ItemId>,
        change: F,
        reconciliation: Reconciliation,
        call: Fut,
    ) -> Result<(), ClassifiedError>
    where
        F: FnOnce(&T) -> T,
        Fut: Future<Output = TransportResult>,
    {
        let target_id = target_id.into();
        let lock = self.lock_for(&target_id);
        let result = {
            let _guard = lock.lock().await;
            self.mutate_locked(&target_id, change, reconciliation, call).await
        };
        self.release_lock(&target_id, lock);
        result
    }

    /// Delete the item `target_id` through `call`
    pub async fn remove<Fut>(
        &self,
        target_id: impl Into<ItemId>,
        reconciliation: Reconciliation,
        call: Fut,
    ) -> Result<(), ClassifiedError>
    where
        Fut: Future<Output = TransportResult>,
    {
        let target_id = target_id.into();
        let lock = self.lock_for(&target_id);
        let result = {
            let _guard = lock.lock().await;
            self.remove_locked(&target_id, reconciliation, call).await
        };
        self.release_lock(&target_id, lock);
        result
    }

    /// Create a new item through `call`; the collection is re-fetched on success
    pub async fn create<Fut>(&self, call: Fut) -> Result<(), ClassifiedError>
    where
        Fut: Future<Output = TransportResult>,
    {
        match call.await {
            Ok(_) => {
                info!(resource = %self.controller.config().resource_path, "create confirmed");
                self.controller.refresh();
                Ok(())
            }
            Err(err) => Err(self.report(None, err)),
        }
    }

    async fn mutate_locked<F, Fut>(
        &self,
        target_id: &ItemId,
        change: F,
        reconciliation: Reconciliation,
        call: Fut,
    ) -> Result<(), ClassifiedError>
    where
        F: FnOnce(&T) -> T,
        Fut: Future<Output = TransportResult>,
    {
        let (_, snapshot) = self.require(target_id)?;
        let applied = change(&snapshot.item);
        debug!(id = %target_id, ?reconciliation, "mutation dispatched");

        if reconciliation == Reconciliation::Optimistic {
            self.controller.apply_mutation(MutationPatch::Replace {
                id: target_id.clone(),
                item: applied.clone(),
            })?;
        }
        self.pending.borrow_mut().insert(
            target_id.clone(),
            PendingMutation {
                target_id: target_id.clone(),
                previous_value: snapshot.item,
                applied_value: applied,
                reconciliation,
            },
        );

        let outcome = call.await;
        let pending = self.pending.borrow_mut().remove(target_id);

        match (outcome, reconciliation) {
            (Ok(_), Reconciliation::Optimistic) => {
                debug!(id = %target_id, "optimistic mutation confirmed");
                Ok(())
            }
            (Ok(_), Reconciliation::RefetchOnSuccess) => {
                debug!(id = %target_id, "mutation confirmed, refetching");
                self.controller.refresh();
                Ok(())
            }
            (Err(err), Reconciliation::Optimistic) => {
                if let Some(pending) = pending {
                    self.roll_back(MutationPatch::Replace {
                        id: target_id.clone(),
                        item: pending.previous_value,
                    });
                }
                Err(self.report(Some(target_id), err))
            }
            (Err(err), Reconciliation::RefetchOnSuccess) => Err(self.report(Some(target_id), err)),
        }
    }

    async fn remove_locked<Fut>(
        &self,
        target_id: &ItemId,
        reconciliation: Reconciliation,
        call: Fut,
    ) -> Result<(), ClassifiedError>
    where
        Fut: Future<Output = TransportResult>,
    {
        let (anchor, snapshot) = self.require(target_id)?;
        debug!(id = %target_id, ?reconciliation, "removal dispatched");

        if reconciliation == Reconciliation::Optimistic {
            self.controller.apply_mutation(MutationPatch::Remove { id: target_id.clone() })?;
        }

        match (call.await, reconciliation) {
            (Ok(_), Reconciliation::Optimistic) => {
                debug!(id = %target_id, "optimistic removal confirmed");
                self.controller.reconcile_page_bounds();
                Ok(())
            }
            (Ok(_), Reconciliation::RefetchOnSuccess) => {
                debug!(id = %target_id, "removal confirmed, refetching");
                self.controller.refresh();
                Ok(())
            }
            (Err(err), Reconciliation::Optimistic) => {
                self.roll_back(MutationPatch::Reinsert {
                    entry: snapshot,
                    anchor,
                });
                Err(self.report(Some(target_id), err))
            }
            (Err(err), Reconciliation::RefetchOnSuccess) => Err(self.report(Some(target_id), err)),
        }
    }

    fn require(&self, target_id: &ItemId) -> Result<(RowAnchor, Entry<T>), ClassifiedError> {
        self.controller.snapshot(target_id).ok_or_else(|| {
            error!(id = %target_id, "mutation target is not in the current view");
            ClassifiedError::NotFound(target_id.clone())
        })
    }

    fn roll_back(&self, patch: MutationPatch<T>) {
        if let Err(err) = self.controller.apply_mutation(patch) {
            // A newer fetch replaced the page while the call was in flight
            warn!(%err, "rollback target left the view");
        }
    }

    fn report(&self, target_id: Option<&ItemId>, err: ClassifiedError) -> ClassifiedError {
        match target_id {
            Some(id) => warn!(id = %id, %err, "mutation failed"),
            None => warn!(%err, "create failed"),
        }
        self.controller.alerts().notify_error(&err.user_message());
        err
    }

    fn lock_for(&self, id: &ItemId) -> Rc<Mutex<()>> {
        let mut locks = self.locks.borrow_mut();
        Rc::clone(locks.entry(id.clone()).or_insert_with(|| Rc::new(Mutex::new(()))))
    }

    fn release_lock(&self, id: &ItemId, lock: Rc<Mutex<()>>) {
        let mut locks = self.locks.borrow_mut();
        // Only the map and this handle left: nobody is waiting
        if Rc::strong_count(&lock) == 2 {
            locks.remove(id);
        }
    }
}
