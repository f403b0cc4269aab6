//! Document-level errors.
//!
//! These are faults that prevent a validation run from starting at all.
//! Rule violations inside a well-formed document are never reported here;
//! they end up as findings in a [`ValidationResult`](crate::ValidationResult).

/// Errors raised before any rule is evaluated.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The input is not well-formed XML
    #[error("malformed document: {0}")]
    Malformed(#[from] roxmltree::Error),

    /// The root element matches neither the booking nor the fare schema
    #[error("unsupported document root: <{0}>")]
    UnsupportedRoot(String),
}
