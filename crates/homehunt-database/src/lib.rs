//! # homehunt-database
//!
//! PostgreSQL connection management, the store traits the notification
//! core is written against, and two implementations of them: sqlx
//! repositories and in-memory stores for tests and database-less runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::InMemoryStore;
pub use store::{ApartmentStore, NotificationStore, PushSubscriptionStore, Stores, UserStore};
