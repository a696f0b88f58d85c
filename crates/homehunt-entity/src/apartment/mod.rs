//! Apartment, comment and favorite entities.

pub mod comment;
pub mod favorite;
pub mod model;
pub mod status;

pub use comment::Comment;
pub use favorite::Favorite;
pub use model::Apartment;
pub use status::ApartmentStatus;
