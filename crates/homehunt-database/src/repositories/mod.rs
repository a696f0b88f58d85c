//! PostgreSQL repository implementations of the store traits.

pub mod apartment;
pub mod notification;
pub mod push_subscription;
pub mod user;

pub use apartment::ApartmentRepository;
pub use notification::NotificationRepository;
pub use push_subscription::PushSubscriptionRepository;
pub use user::UserRepository;
