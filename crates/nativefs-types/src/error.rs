//! Error types for nativefs.

use crate::JobId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for nativefs operations.
pub type Result<T> = std::result::Result<T, NativeFsError>;

/// Errors that can occur while bridging filesystem and transfer calls.
#[derive(Error, Debug)]
pub enum NativeFsError {
    /// A request option is missing or has an invalid value.
    ///
    /// Raised synchronously, before any job is created.
    #[error("{operation}: Invalid value for property `{field}`")]
    InvalidArgument {
        /// The operation that rejected the request (e.g. `downloadFile`).
        operation: &'static str,
        /// The offending option.
        field: &'static str,
    },

    /// The engine does not provide an optional capability.
    ///
    /// Raised synchronously, before any job or resource is allocated.
    #[error("`{operation}` is unsupported on this platform ({platform})")]
    CapabilityUnsupported {
        /// The operation that needs the capability.
        operation: &'static str,
        /// The platform reported by the engine.
        platform: String,
    },

    /// The requested content encoding is not one of `utf8`, `ascii`, `base64`.
    #[error("Invalid encoding type \"{0}\"")]
    InvalidEncoding(String),

    /// Content could not be converted to or from its transport form.
    #[error("Malformed content: {0}")]
    MalformedContent(String),

    /// A transfer job settled with a failure.
    ///
    /// Listener cleanup for the job has already run when this is observed.
    #[error("Transfer job {job_id} failed: {cause}")]
    TransferFailed {
        /// The job that failed.
        job_id: JobId,
        /// The engine-side failure.
        #[source]
        cause: Box<NativeFsError>,
    },

    /// The path does not exist.
    #[error("No such file or directory: '{0}'")]
    NotFound(PathBuf),

    /// An I/O operation failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The path being operated on.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The transfer was stopped before it finished.
    #[error("Job {0} was cancelled")]
    Cancelled(JobId),

    /// Any other engine-side failure.
    #[error("Native engine error: {0}")]
    Native(String),
}

impl NativeFsError {
    /// Wraps an engine failure as the terminal failure of `job_id`.
    #[must_use]
    pub fn transfer_failed(job_id: JobId, cause: Self) -> Self {
        Self::TransferFailed {
            job_id,
            cause: Box::new(cause),
        }
    }

    /// Returns true if the error was raised before any job was created.
    #[must_use]
    pub const fn is_pre_job(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::CapabilityUnsupported { .. }
        )
    }
}
