//! User bookkeeping for identities presented by the proxy.

pub mod service;

pub use service::UserService;
