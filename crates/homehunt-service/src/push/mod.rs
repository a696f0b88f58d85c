//! Browser push side-channel.
//!
//! Runs independently of the WebSocket registry: a user with no open tab
//! still receives pushes on every browser they subscribed.

pub mod delivery;
pub mod gateway;
pub mod payload;

pub use delivery::PushDelivery;
pub use gateway::{PushGateway, WebPushGateway};
pub use payload::{PushAction, PushPayload};
