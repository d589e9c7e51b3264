//! Preview upload pipeline.
//!
//! A request moves strictly forward through four steps:
//!
//! 1. [`upload`]: validate the JSON body and decode the image
//! 2. [`keys`]: derive the object key from upload time and a partial content hash
//! 3. [`crate::storage`]: write the bytes to the bucket
//! 4. [`compose`]: build the CDN link and the reply, including [`enrichment`] suggestions
//!
//! There is no cross-request state; every step is a function of its inputs
//! except the storage write.

pub mod compose;
pub mod enrichment;
pub mod keys;
pub mod upload;

pub use enrichment::{Enricher, Enrichment, MockEnricher, SimilarVideo};
pub use keys::ObjectKey;
pub use upload::{PreviewMetadata, PreviewUpload};
