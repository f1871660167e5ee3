//! Alert Channel
//!
//! Process-wide sink for user-facing notifications. Constructed once at
//! startup and handed to every controller.

/// Fire-and-forget notification sink. Implementations must not panic.
pub trait AlertChannel {
    fn notify_success(&self, message: &str);
    fn notify_error(&self, message: &str);
}
