//! # homehunt-entity
//!
//! Domain entity models for HomeHunt. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod apartment;
pub mod notification;
pub mod push;
pub mod user;
