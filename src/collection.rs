//! Collection Hook
//!
//! Bridges a `CollectionController` into Leptos: the controller's
//! subscription feeds a signal, and the handle exposes the intents.

use std::future::Future;
use std::rc::Rc;

use collection_controller::{
    CollectionConfig, CollectionController, CollectionView, FilterPatch, MutationDispatcher,
    Transport, TransportRequest, TransportResult,
};
use leptos::prelude::*;
use serde::de::DeserializeOwned;

use crate::context::use_app_context;

pub struct CollectionHandle<T: 'static> {
    /// Latest snapshot published by the controller
    pub view: ReadSignal<CollectionView<T>>,
    controller: StoredValue<CollectionController<T>, LocalStorage>,
    dispatcher: StoredValue<MutationDispatcher<T>, LocalStorage>,
    transport: StoredValue<Rc<dyn Transport>, LocalStorage>,
}

impl<T: 'static> Clone for CollectionHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for CollectionHandle<T> {}

/// Build a controller for `config`, load its first page and keep `view` in sync
pub fn use_collection<T>(config: CollectionConfig) -> CollectionHandle<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let ctx = use_app_context();
    let transport = ctx.transport();
    let controller: CollectionController<T> = ctx.controller(config, transport.clone());

    let (view, set_view) = signal(controller.view());
    let subscription = controller.subscribe(move |next| {
        // `None` once the panel is unmounted and the signal disposed
        let _ = set_view.try_set(next.clone());
    });
    let dispatcher = MutationDispatcher::new(controller.clone());
    controller.load();

    let controller = StoredValue::new_local(controller);
    on_cleanup(move || {
        controller.try_with_value(|controller| controller.unsubscribe(subscription));
    });

    CollectionHandle {
        view,
        controller,
        dispatcher: StoredValue::new_local(dispatcher),
        transport: StoredValue::new_local(transport),
    }
}

impl<T> CollectionHandle<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn set_page(&self, page: u32) {
        self.controller.with_value(|controller| {
            controller.set_page(page);
        });
    }

    pub fn set_filters(&self, patch: FilterPatch) {
        self.controller.with_value(|controller| {
            controller.set_filters(patch);
        });
    }

    pub fn set_search(&self, text: &str) {
        self.controller.with_value(|controller| {
            controller.set_search(text);
        });
    }

    pub fn refresh(&self) {
        self.controller.with_value(|controller| {
            controller.refresh();
        });
    }

    pub fn dispatcher(&self) -> MutationDispatcher<T> {
        self.dispatcher.get_value()
    }

    /// Send `request` through this collection's transport
    pub fn call(&self, request: TransportRequest) -> impl Future<Output = TransportResult> + 'static {
        let transport = self.transport.get_value();
        async move { transport.call(request).await }
    }

    pub fn is_loading(&self) -> bool {
        self.view.with(|view| view.is_loading())
    }
}
