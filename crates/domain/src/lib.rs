//! Domain layer for the rating schema service.
//!
//! This crate contains:
//! - Domain models (aggregate ratings, schema records, settings, content metadata)
//! - The aggregation and rendering pipeline services
//! - Collaborator contracts (review store, content source, settings store, cache)
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;

pub use errors::StoreError;
