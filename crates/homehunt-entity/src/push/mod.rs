//! Browser push subscription entities.

pub mod subscription;

pub use subscription::PushSubscription;
