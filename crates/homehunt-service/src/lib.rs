//! # homehunt-service
//!
//! Business logic service layer for HomeHunt. Services are written
//! against the store traits of `homehunt-database` and receive every
//! dependency at construction time via `Arc` references.

pub mod apartment;
pub mod context;
pub mod notification;
pub mod push;
pub mod user;

pub use apartment::{ApartmentService, CommentAdded, CreateApartment, CreateComment, FavoriteToggled};
pub use context::RequestContext;
pub use notification::NotificationService;
pub use push::{PushDelivery, PushGateway, PushPayload, WebPushGateway};
pub use user::UserService;
