//! HTTP request handlers.
//!
//! - [`previews`]: preview upload
//! - [`health`]: liveness probe
//!
//! Handlers return [`crate::errors::Error`], which converts to the matching
//! status code and a `{"error": ...}` JSON body.

pub mod health;
pub mod previews;
