//! API request and response data models.
//!
//! These structures define the public wire contract and are kept separate from
//! the pipeline types in [`crate::previews`], so the two can evolve independently.
//! All models are annotated with `utoipa` for the generated OpenAPI document.

pub mod previews;
