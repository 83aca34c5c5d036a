//! Errors surfaced to the presentation layer
//!
//! Only the catalog fetch can fail in a user-visible way. Malformed record
//! fields and malformed query values degrade to defaults instead of erroring.

/// The catalog could not be retrieved or understood.
///
/// Terminal for a session: the controller reports it once and never shows
/// partial data afterwards.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Catalog responded with HTTP {0}")]
    Status(u16),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Failed to decode catalog: {0}")]
    Decode(String),
}
