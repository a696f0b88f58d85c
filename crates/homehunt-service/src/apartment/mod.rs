//! The thin apartment write path: listings, comments, favorites.

pub mod input;
pub mod service;

pub use input::{CreateApartment, CreateComment};
pub use service::{ApartmentService, CommentAdded, FavoriteToggled};
