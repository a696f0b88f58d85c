//! Route handlers organized by domain.

pub mod apartment;
pub mod health;
pub mod notification;
pub mod push;
pub mod ws;
