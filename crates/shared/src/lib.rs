//! Shared utilities for the rating schema service.
//!
//! This crate provides small, dependency-light helpers used across the
//! other crates:
//! - Admin key hashing and comparison
//! - Text helpers for markup output (tag stripping, escaping, number formatting)
//! - Reusable validation functions

pub mod crypto;
pub mod text;
pub mod validation;
