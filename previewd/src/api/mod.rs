//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//!
//! # API Structure
//!
//! - `POST /generate-preview`: upload an image with its metadata
//! - `GET /healthz`: liveness
//! - `GET /internal/metrics`: Prometheus metrics (when enabled)
//!
//! CORS preflight is answered by the CORS layer for every path. The OpenAPI
//! document is served at `/api-docs/openapi.json` and rendered at `/docs`.

pub mod handlers;
pub mod models;
