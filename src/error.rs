//! Error types for bundle reading.

use std::io;

/// Bundle reading errors.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// The file does not start with the bundle magic bytes.
    #[error("invalid bundle signature")]
    InvalidSignature,

    /// Fewer bytes were available than the header or index declared.
    #[error("truncated bundle data while {action}")]
    TruncatedData { action: &'static str },

    /// Operation attempted after `close()`.
    #[error("bundle reader is closed")]
    Closed,

    /// No entry with the requested name exists in the index.
    #[error("entry not found in bundle: {name}")]
    EntryNotFound { name: String },

    /// Underlying file or stream failure, propagated unchanged.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Maps `UnexpectedEof` onto `TruncatedData` so short reads carry the
/// format-level meaning instead of a bare io error.
pub(crate) trait IoResultExt<T> {
    fn or_truncated(self, action: &'static str) -> BundleResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn or_truncated(self, action: &'static str) -> BundleResult<T> {
        self.map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => BundleError::TruncatedData { action },
            _ => BundleError::Io(e),
        })
    }
}
