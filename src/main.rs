//! RentDesk Frontend Entry Point

mod alerts;
mod app;
mod collection;
mod commands;
mod components;
mod config;
mod context;
mod models;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = rolling_logger::init_logger("RentDesk", tracing::Level::DEBUG) {
        leptos::logging::warn!("logger already installed: {err}");
    }
    mount_to_body(App);
}
