//! Upload counters.
//!
//! Recorded through the `metrics` facade. When `enable_metrics` is set the
//! axum-prometheus recorder is installed and these show up next to the HTTP
//! metrics at `/internal/metrics`; otherwise they are no-ops.

pub const UPLOADS_TOTAL: &str = "previewd_uploads_total";
pub const UPLOAD_BYTES_TOTAL: &str = "previewd_upload_bytes_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Image written to storage
    Stored,
    /// Client error, nothing written
    Rejected,
    /// Backend or internal failure
    Failed,
}

impl UploadOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadOutcome::Stored => "stored",
            UploadOutcome::Rejected => "rejected",
            UploadOutcome::Failed => "failed",
        }
    }
}

pub fn record_upload(outcome: UploadOutcome) {
    ::metrics::counter!(UPLOADS_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

pub fn record_stored_bytes(bytes: usize) {
    ::metrics::counter!(UPLOAD_BYTES_TOTAL).increment(bytes as u64);
}
