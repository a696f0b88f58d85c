//! WebSocket connection management: handles, the registry, close guards.

pub mod guard;
pub mod handle;
pub mod registry;

pub use guard::ChannelGuard;
pub use handle::{ConnectionHandle, ConnectionId};
pub use registry::ConnectionRegistry;
