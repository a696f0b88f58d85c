//! # homehunt-realtime
//!
//! Real-time engine for HomeHunt. Provides:
//!
//! - A connection registry mapping users to their live WebSocket channels
//! - A dispatcher that writes notifications to every open channel of a user
//! - The notification orchestrator: record, dispatch and push fan-out
//! - Formatting of collaborative events into notification text
//! - Engine counters for the detailed health endpoint

pub mod connection;
pub mod message;
pub mod metrics;
pub mod notification;
pub mod server;

pub use connection::{ChannelGuard, ConnectionHandle, ConnectionRegistry};
pub use notification::dispatcher::NotificationDispatcher;
pub use notification::formatter::NotificationFormatter;
pub use notification::orchestrator::{FanoutReport, NotificationEvent, NotificationOrchestrator};
pub use server::RealtimeEngine;
