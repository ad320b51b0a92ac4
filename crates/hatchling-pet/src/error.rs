//! Error types for the hatchling-pet crate.
//!
//! Domain guards never fail: a refused operation is reported as a
//! [`Rejection`](crate::rejection::Rejection) and leaves the pet untouched.
//! The only fallible work in this crate is turning a pet into its persisted
//! record.

/// Errors that can occur while building a persisted record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A field could not be converted to JSON.
    #[error("failed to serialize pet field `{field}`: {source}")]
    Serialization {
        /// The record key being written.
        field: &'static str,
        /// The underlying serialization error.
        source: serde_json::Error,
    },

    /// A sprite scale is NaN or infinite and has no JSON number form.
    #[error("pet field `{field}` is not a finite number")]
    NonFinite {
        /// The record key being written.
        field: &'static str,
    },
}
