//! Core type definitions used across the HomeHunt workspace.

pub mod id;

pub use id::*;
