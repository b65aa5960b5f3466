//! Custom Axum extractors.

pub mod admin_key;

pub use admin_key::{AdminKeyAuth, ADMIN_KEY_HEADER};
