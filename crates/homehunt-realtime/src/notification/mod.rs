//! Notification fan-out: dispatch to live channels, orchestration, formatting.

pub mod dispatcher;
pub mod formatter;
pub mod orchestrator;

pub use dispatcher::NotificationDispatcher;
pub use formatter::{NotificationFormatter, truncate_preview};
pub use orchestrator::{FanoutReport, NotificationEvent, NotificationOrchestrator};
