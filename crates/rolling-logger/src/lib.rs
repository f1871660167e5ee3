//! Rolling Logger
//!
//! `tracing` layer that keeps the most recent log lines in a circular buffer
//! and echoes them to the browser console (stderr off wasm).

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Default number of lines kept in memory
pub const DEFAULT_CAPACITY: usize = 500;

static GLOBAL_BUFFER: OnceLock<Arc<RollingBuffer>> = OnceLock::new();

/// Fixed-capacity line buffer; the oldest line is dropped when full
pub struct RollingBuffer {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl RollingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Oldest first
    pub fn lines(&self) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|lines| lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// `[12:00:01.250] WARN  RentDesk collection_controller::controller: fetch failed page=2`
pub fn format_line(timestamp: &str, app_name: &str, level: &Level, target: &str, message: &str, fields: &str) -> String {
    format!("[{timestamp}] {level:<5} {app_name} {target}: {message}{fields}")
}

/// Layer writing every event into a `RollingBuffer`
pub struct RollingLayer {
    app_name: String,
    buffer: Arc<RollingBuffer>,
    echo: bool,
}

impl RollingLayer {
    pub fn new(app_name: impl Into<String>, buffer: Arc<RollingBuffer>) -> Self {
        Self {
            app_name: app_name.into(),
            buffer,
            echo: true,
        }
    }

    /// Keep lines in the buffer only
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let meta = event.metadata();
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        let line = format_line(
            &timestamp,
            &self.app_name,
            meta.level(),
            meta.target(),
            &visitor.message,
            &visitor.fields,
        );
        if self.echo {
            console::emit(*meta.level(), &line);
        }
        self.buffer.push(line);
    }
}

/// Install the rolling layer as the global subscriber
pub fn init_logger(app_name: &str, max_level: Level) -> Result<(), TryInitError> {
    let buffer = GLOBAL_BUFFER
        .get_or_init(|| Arc::new(RollingBuffer::new(DEFAULT_CAPACITY)))
        .clone();
    tracing_subscriber::registry()
        .with(LevelFilter::from_level(max_level))
        .with(RollingLayer::new(app_name, buffer))
        .try_init()
}

/// Lines captured by the global logger, oldest first
pub fn recent_lines() -> Vec<String> {
    GLOBAL_BUFFER.get().map(|buffer| buffer.lines()).unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
mod console {
    use tracing::Level;
    use wasm_bindgen::JsValue;

    pub fn emit(level: Level, line: &str) {
        let value = JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&value),
            Level::WARN => web_sys::console::warn_1(&value),
            _ => web_sys::console::log_1(&value),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod console {
    use tracing::Level;

    pub fn emit(_level: Level, line: &str) {
        eprintln!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_drops_oldest() {
        let buffer = RollingBuffer::new(2);
        buffer.push("a".into());
        buffer.push("b".into());
        buffer.push("c".into());
        assert_eq!(buffer.lines(), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_format_line() {
        let line = format_line("09:15:00.001", "RentDesk", &Level::WARN, "collection_controller", "fetch failed", " page=2");
        assert_eq!(line, "[09:15:00.001] WARN  RentDesk collection_controller: fetch failed page=2");
    }

    #[test]
    fn test_layer_captures_message_and_fields() {
        let buffer = Arc::new(RollingBuffer::new(10));
        let subscriber = tracing_subscriber::registry().with(RollingLayer::new("RentDesk", buffer.clone()).quiet());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(resource = "/rents", page = 2, "fetch issued");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("fetch issued"));
        assert!(lines[0].contains("resource=/rents"));
        assert!(lines[0].contains("page=2"));
    }

    #[test]
    fn test_global_logger_exposes_recent_lines() {
        init_logger("RentDesk", Level::INFO).expect("first install");
        assert!(init_logger("RentDesk", Level::INFO).is_err());

        tracing::debug!("below the level filter");
        tracing::warn!(generation = 3, "stale result discarded");

        let lines = recent_lines();
        assert!(lines.iter().any(|line| line.contains("stale result discarded generation=3")));
        assert!(!lines.iter().any(|line| line.contains("below the level filter")));
    }
}
