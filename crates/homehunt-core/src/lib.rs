//! # homehunt-core
//!
//! Core crate for HomeHunt. Contains configuration schemas, typed
//! identifiers, the push delivery error taxonomy, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other HomeHunt crates.

pub mod config;
pub mod error;
pub mod push;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
