//! Collection Controller
//!
//! Owns the visible, paginated view of one list resource. Commands
//! (`set_page`, `set_filters`, `refresh`) compute a new descriptor and hand it
//! to the tracker; settlements are merged into the view only when they belong
//! to the most recently started fetch.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::LocalSpawn;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::alert::AlertChannel;
use crate::config::CollectionConfig;
use crate::descriptor::{FetchDescriptor, FilterPatch};
use crate::error::ClassifiedError;
use crate::page::{decode_page, PageResult, Pagination};
use crate::tracker::RequestTracker;
use crate::transport::Transport;
use crate::types::{Entry, Generation, ItemId, RequestState};

/// What the UI renders for one collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionView<T> {
    pub items: Vec<Entry<T>>,
    pub pagination: Pagination,
    pub request_state: RequestState<()>,
}

impl<T> CollectionView<T> {
    fn empty(descriptor: &FetchDescriptor) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::new(descriptor.page(), descriptor.page_size(), 0),
            request_state: RequestState::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.request_state.is_loading()
    }

    pub fn get(&self, id: &ItemId) -> Option<&T> {
        self.items.iter().find(|entry| &entry.id == id).map(|entry| &entry.item)
    }
}

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Rc<dyn Fn(&CollectionView<T>)>;

/// In-place edits of the visible items, written by the mutation dispatcher
pub(crate) enum MutationPatch<T> {
    /// Replace the item with `id` where it currently sits
    Replace { id: ItemId, item: T },
    /// Take the item out and count it out of the totals
    Remove { id: ItemId },
    /// Undo a `Remove`: put the entry back next to its old neighbours and
    /// count it in again
    Reinsert { entry: Entry<T>, anchor: RowAnchor },
}

/// Where a row sat relative to the rows around it
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RowAnchor {
    pub index: usize,
    pub previous: Option<ItemId>,
    pub next: Option<ItemId>,
}

impl RowAnchor {
    /// Insert position in `items`, preferring surviving neighbours over the raw index
    fn position<T>(&self, items: &[Entry<T>]) -> usize {
        let find = |id: &ItemId| items.iter().position(|entry| &entry.id == id);
        if let Some(at) = self.previous.as_ref().and_then(find) {
            return at + 1;
        }
        if let Some(at) = self.next.as_ref().and_then(find) {
            return at;
        }
        match (&self.previous, &self.next) {
            (None, _) => 0,
            (_, None) => items.len(),
            _ => self.index.min(items.len()),
        }
    }
}

struct ControllerState<T> {
    descriptor: FetchDescriptor,
    view: CollectionView<T>,
}

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener<T>)>,
}

struct Shared<T> {
    config: CollectionConfig,
    transport: Rc<dyn Transport>,
    alerts: Rc<dyn AlertChannel>,
    tracker: RequestTracker<FetchDescriptor, PageResult<Entry<T>>>,
    state: RefCell<ControllerState<T>>,
    listeners: RefCell<Listeners<T>>,
}

/// Controller for one paginated, filterable list resource.
///
/// Cloning yields another handle to the same controller.
pub struct CollectionController<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for CollectionController<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T> CollectionController<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    pub fn new(
        config: CollectionConfig,
        transport: Rc<dyn Transport>,
        alerts: Rc<dyn AlertChannel>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        let descriptor = config.initial_descriptor();
        let view = CollectionView::empty(&descriptor);
        let shared = Rc::new(Shared {
            config,
            transport,
            alerts,
            tracker: RequestTracker::new(spawner),
            state: RefCell::new(ControllerState { descriptor, view }),
            listeners: RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            }),
        });

        let weak: Weak<Shared<T>> = Rc::downgrade(&shared);
        shared.tracker.on_settled(move |generation, result| {
            if let Some(shared) = weak.upgrade() {
                CollectionController { shared }.settle(generation, result);
            }
        });

        Self { shared }
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.shared.config
    }

    /// Snapshot of the visible state
    pub fn view(&self) -> CollectionView<T> {
        self.shared.state.borrow().view.clone()
    }

    /// Descriptor of the most recently issued fetch
    pub fn descriptor(&self) -> FetchDescriptor {
        self.shared.state.borrow().descriptor.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.shared.state.borrow().view.pagination
    }

    pub fn request_state(&self) -> RequestState<()> {
        self.shared.state.borrow().view.request_state.clone()
    }

    pub fn current_generation(&self) -> Generation {
        self.shared.tracker.current_generation()
    }

    /// Register a listener called after every change of the view
    pub fn subscribe(&self, listener: impl Fn(&CollectionView<T>) + 'static) -> SubscriptionId {
        let mut listeners = self.shared.listeners.borrow_mut();
        listeners.next_id += 1;
        let id = SubscriptionId(listeners.next_id);
        listeners.entries.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.shared.listeners.borrow_mut();
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry_id, _)| *entry_id != id);
        listeners.entries.len() != before
    }

    /// Fetch the active descriptor. A no-op while the same fetch is loading.
    pub fn load(&self) -> Generation {
        let descriptor = self.descriptor();
        self.mark_loading();
        let call = self.fetch_call(&descriptor);
        self.shared.tracker.start(descriptor, call)
    }

    /// Move to page `page` (at least 1). Returns the generation when a fetch was issued.
    pub fn set_page(&self, page: u32) -> Option<Generation> {
        let next = self.descriptor().with_page(page);
        self.issue(next)
    }

    /// Merge `patch` into the active filters; a real change goes back to page 1.
    pub fn set_filters(&self, patch: FilterPatch) -> Option<Generation> {
        let next = self.descriptor().patched(&patch);
        self.issue(next)
    }

    /// Set or clear the configured search filter
    pub fn set_search(&self, text: &str) -> Option<Generation> {
        let key = self.shared.config.search_key.clone();
        let text = text.trim();
        let patch = if text.is_empty() {
            FilterPatch::new().remove(key)
        } else {
            FilterPatch::new().set(key, text)
        };
        self.set_filters(patch)
    }

    pub fn set_page_size(&self, page_size: u32) -> Option<Generation> {
        let current = self.descriptor();
        if current.page_size() == page_size.max(1) {
            return None;
        }
        self.issue(current.with_page_size(page_size).with_page(1))
    }

    /// Re-issue the active descriptor unconditionally
    pub fn refresh(&self) -> Generation {
        let descriptor = self.descriptor();
        debug!(resource = descriptor.resource_path(), page = descriptor.page(), "refreshing collection");
        self.mark_loading();
        let call = self.fetch_call(&descriptor);
        self.shared.tracker.start_forced(descriptor, call)
    }

    fn issue(&self, next: FetchDescriptor) -> Option<Generation> {
        {
            let mut state = self.shared.state.borrow_mut();
            // A failed descriptor may be asked for again
            if state.descriptor == next && state.view.request_state.error().is_none() {
                return None;
            }
            state.descriptor = next.clone();
        }
        self.mark_loading();
        let call = self.fetch_call(&next);
        let generation = self.shared.tracker.start(next.clone(), call);
        info!(
            resource = next.resource_path(),
            page = next.page(),
            %generation,
            "fetch issued"
        );
        Some(generation)
    }

    fn fetch_call(
        &self,
        descriptor: &FetchDescriptor,
    ) -> impl FnOnce() -> LocalBoxFuture<'static, Result<PageResult<Entry<T>>, ClassifiedError>> {
        let transport = Rc::clone(&self.shared.transport);
        let request = self.shared.config.fetch_request(descriptor);
        let config = self.shared.config.clone();
        let requested = descriptor.clone();
        move || {
            async move {
                let body = transport.call(request).await?;
                decode_page::<T>(body, &config, &requested)
            }
            .boxed_local()
        }
    }

    fn mark_loading(&self) {
        self.shared.state.borrow_mut().view.request_state = RequestState::Loading;
        self.notify();
    }

    fn settle(&self, generation: Generation, result: Result<PageResult<Entry<T>>, ClassifiedError>) {
        let current = self.shared.tracker.current_generation();
        if generation != current {
            let stale = ClassifiedError::StaleDiscard { generation, current };
            debug!(resource = %self.shared.config.resource_path, %stale, "discarding stale result");
            return;
        }

        match result {
            Ok(page) => {
                let descriptor = self.descriptor();
                let last_page = page.pagination.last_page();
                if descriptor.page() > last_page {
                    info!(
                        resource = descriptor.resource_path(),
                        from = descriptor.page(),
                        to = last_page,
                        "page out of range, clamping"
                    );
                    self.issue(descriptor.with_page(last_page));
                    return;
                }
                {
                    let mut state = self.shared.state.borrow_mut();
                    state.view.items = page.items;
                    state.view.pagination = page.pagination;
                    state.view.request_state = RequestState::Success(());
                }
                debug!(resource = descriptor.resource_path(), %generation, "fetch applied");
            }
            Err(error) => {
                warn!(resource = %self.shared.config.resource_path, %generation, %error, "fetch failed");
                self.shared.state.borrow_mut().view.request_state = RequestState::Failure(error.clone());
                self.shared.alerts.notify_error(&error.user_message());
            }
        }
        self.notify();
    }

    fn notify(&self) {
        let view = self.view();
        let listeners: Vec<Listener<T>> = self
            .shared
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&view);
        }
    }

    // ========================
    // Reconciliation entry points (mutation dispatcher only)
    // ========================

    pub(crate) fn alerts(&self) -> &Rc<dyn AlertChannel> {
        &self.shared.alerts
    }

    /// Position and copy of the visible entry with `id`
    pub(crate) fn snapshot(&self, id: &ItemId) -> Option<(RowAnchor, Entry<T>)> {
        let state = self.shared.state.borrow();
        let items = &state.view.items;
        let index = items.iter().position(|entry| &entry.id == id)?;
        let anchor = RowAnchor {
            index,
            previous: index.checked_sub(1).map(|at| items[at].id.clone()),
            next: items.get(index + 1).map(|entry| entry.id.clone()),
        };
        Some((anchor, items[index].clone()))
    }

    pub(crate) fn apply_mutation(&self, patch: MutationPatch<T>) -> Result<(), ClassifiedError> {
        {
            let mut state = self.shared.state.borrow_mut();
            let view = &mut state.view;
            match patch {
                MutationPatch::Replace { id, item } => {
                    let entry = view
                        .items
                        .iter_mut()
                        .find(|entry| entry.id == id)
                        .ok_or(ClassifiedError::NotFound(id))?;
                    entry.item = item;
                }
                MutationPatch::Remove { id } => {
                    let index = view
                        .items
                        .iter()
                        .position(|entry| entry.id == id)
                        .ok_or(ClassifiedError::NotFound(id))?;
                    view.items.remove(index);
                    let total = view.pagination.total_items.saturating_sub(1);
                    view.pagination = view.pagination.with_total_items(total);
                }
                MutationPatch::Reinsert { entry, anchor } => {
                    if view.items.iter().any(|visible| visible.id == entry.id) {
                        // A fetch already brought the row back
                        return Ok(());
                    }
                    let index = anchor.position(&view.items);
                    view.items.insert(index, entry);
                    let total = view.pagination.total_items.saturating_add(1);
                    view.pagination = view.pagination.with_total_items(total);
                }
            }
        }
        self.notify();
        Ok(())
    }

    /// Fetch again when the visible page fell past the last page (or emptied
    /// out) after a confirmed removal
    pub(crate) fn reconcile_page_bounds(&self) -> Option<Generation> {
        let (descriptor, pagination, empty) = {
            let state = self.shared.state.borrow();
            (state.descriptor.clone(), state.view.pagination, state.view.items.is_empty())
        };
        let last_page = pagination.last_page();
        if descriptor.page() > last_page {
            info!(
                resource = descriptor.resource_path(),
                from = descriptor.page(),
                to = last_page,
                "page emptied by removal, clamping"
            );
            return self.issue(descriptor.with_page(last_page));
        }
        if empty && pagination.total_items > 0 {
            return Some(self.refresh());
        }
        None
    }
}
