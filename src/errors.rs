use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic, ReadExecutor};

/// Error kinds for adapter operations.
///
/// Each kind maps to one category of the adapter's failure taxonomy. Plain
/// lookups never produce an error; a miss is reported as `Ok(None)` by the
/// store and façade operations themselves.
///
/// # Examples
///
/// ```rust,ignore
/// use authstore::errors::{AdapterError, ErrorKind, AdapterResult};
///
/// fn example() -> AdapterResult<()> {
///     Err(AdapterError::new("Session does not exist", ErrorKind::PreconditionFailed))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Precondition violations - update operations presume prior existence
    /// An update targeted a record that does not exist
    PreconditionFailed,

    // Configuration errors - the composed façade is missing a capability
    /// A required sibling operation is absent from the composed façade
    ConfigurationError,

    // Operation errors
    /// The operation is not valid in the current context
    InvalidOperation,

    // IO and storage errors - write failures from the file-backed backend
    /// Generic IO error
    IOError,
    /// The disk is full
    DiskFull,
    /// The file was not found
    FileNotFound,
    /// Permission denied for file operation
    PermissionDenied,
    /// File data is corrupted
    FileCorrupted,

    // Data encoding errors - JSON or binary field codec failures
    /// Error encoding or decoding data
    EncodingError,

    // Generic/internal errors - used as fallback
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::PreconditionFailed => write!(f, "Precondition failed"),
            ErrorKind::ConfigurationError => write!(f, "Configuration error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::DiskFull => write!(f, "Disk full"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::FileCorrupted => write!(f, "File corrupted"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom adapter error type.
///
/// `AdapterError` encapsulates the error message, kind, and optional cause.
/// It supports error chaining and backtraces for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use authstore::errors::{AdapterError, ErrorKind};
///
/// // Create a simple error
/// let err = AdapterError::new("Authenticator does not exist", ErrorKind::PreconditionFailed);
///
/// // Create an error with a cause
/// let cause = AdapterError::new("Disk full", ErrorKind::DiskFull);
/// let err = AdapterError::new_with_cause("Failed to persist store", ErrorKind::IOError, cause);
/// ```
///
/// # Type alias
///
/// The `AdapterResult<T>` type alias is equivalent to `Result<T, AdapterError>`
/// and is used throughout the codebase for operations that can fail.
#[derive(Clone)]
pub struct AdapterError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<AdapterError>>,
    backtrace: Atomic<Backtrace>,
}

impl AdapterError {
    /// Creates a new `AdapterError` with the specified message and error kind.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    ///
    /// # Returns
    ///
    /// A new `AdapterError` instance.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        AdapterError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `AdapterError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for debugging.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    /// * `cause` - The underlying error that caused this error
    ///
    /// # Returns
    ///
    /// A new `AdapterError` instance with the cause error attached.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: AdapterError) -> Self {
        AdapterError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&Box<AdapterError>> {
        self.cause.as_ref()
    }
}

impl Display for AdapterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for AdapterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => self
                .backtrace
                .read_with(|bt| write!(f, "{}\n{:?}", self.message, bt)),
        }
    }
}

impl Error for AdapterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for adapter operations.
///
/// `AdapterResult<T>` is shorthand for `Result<T, AdapterError>`.
/// All fallible adapter operations return this type.
pub type AdapterResult<T> = Result<T, AdapterError>;

// From trait implementations for automatic error conversion
impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            std::io::ErrorKind::StorageFull => ErrorKind::DiskFull,
            _ => ErrorKind::IOError,
        };
        AdapterError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::new(
            &format!("JSON serialization error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<base64::DecodeError> for AdapterError {
    fn from(err: base64::DecodeError) -> Self {
        AdapterError::new(
            &format!("Base64 decoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<String> for AdapterError {
    fn from(msg: String) -> Self {
        AdapterError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for AdapterError {
    fn from(msg: &str) -> Self {
        AdapterError::new(msg, ErrorKind::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_error_new_creates_error() {
        let error = AdapterError::new("An error occurred", ErrorKind::IOError);
        assert_eq!(error.message, "An error occurred");
        assert_eq!(error.error_kind, ErrorKind::IOError);
        assert!(error.cause.is_none());
    }

    #[test]
    fn adapter_error_new_with_cause_creates_error() {
        let cause = AdapterError::new("Disk full", ErrorKind::DiskFull);
        let error = AdapterError::new_with_cause("Failed to persist", ErrorKind::IOError, cause);
        assert_eq!(error.message, "Failed to persist");
        assert_eq!(error.error_kind, ErrorKind::IOError);
        assert!(error.cause.is_some());
    }

    #[test]
    fn adapter_error_accessors_return_fields() {
        let error = AdapterError::new("An error occurred", ErrorKind::PreconditionFailed);
        assert_eq!(error.message(), "An error occurred");
        assert_eq!(error.kind(), &ErrorKind::PreconditionFailed);
        assert!(error.cause().is_none());
    }

    #[test]
    fn adapter_error_display_formats_correctly() {
        let error = AdapterError::new("An error occurred", ErrorKind::IOError);
        assert_eq!(format!("{}", error), "An error occurred");
    }

    #[test]
    fn adapter_error_debug_formats_with_cause() {
        let cause = AdapterError::new("Disk full", ErrorKind::DiskFull);
        let error = AdapterError::new_with_cause("Failed to persist", ErrorKind::IOError, cause);
        let formatted = format!("{:?}", error);
        assert!(formatted.contains("Failed to persist"));
        assert!(formatted.contains("Caused by:"));
    }

    #[test]
    fn adapter_error_source_returns_cause() {
        let cause = AdapterError::new("Disk full", ErrorKind::DiskFull);
        let error = AdapterError::new_with_cause("Failed to persist", ErrorKind::IOError, cause);
        assert!(error.source().is_some());

        let error = AdapterError::new("An error occurred", ErrorKind::IOError);
        assert!(error.source().is_none());
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(
            format!("{}", ErrorKind::PreconditionFailed),
            "Precondition failed"
        );
        assert_eq!(
            format!("{}", ErrorKind::ConfigurationError),
            "Configuration error"
        );
        assert_eq!(format!("{}", ErrorKind::EncodingError), "Encoding error");
    }

    #[test]
    fn test_from_io_error_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let adapter_err: AdapterError = io_err.into();

        assert_eq!(adapter_err.kind(), &ErrorKind::FileNotFound);
        assert!(adapter_err.message().contains("IO error"));
    }

    #[test]
    fn test_from_io_error_permission_denied() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let adapter_err: AdapterError = io_err.into();

        assert_eq!(adapter_err.kind(), &ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_from_io_error_other() {
        let io_err = std::io::Error::other("unknown io error");
        let adapter_err: AdapterError = io_err.into();

        assert_eq!(adapter_err.kind(), &ErrorKind::IOError);
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let adapter_err: AdapterError = json_err.into();

        assert_eq!(adapter_err.kind(), &ErrorKind::EncodingError);
        assert!(adapter_err.message().contains("JSON"));
    }

    #[test]
    fn test_from_string_and_str() {
        let err: AdapterError = String::from("string error").into();
        assert_eq!(err.kind(), &ErrorKind::InternalError);
        assert_eq!(err.message(), "string error");

        let err: AdapterError = "str error".into();
        assert_eq!(err.kind(), &ErrorKind::InternalError);
    }

    #[test]
    fn test_error_chain_with_different_kinds() {
        let root_cause = AdapterError::new("File not found", ErrorKind::FileNotFound);
        let mid_level =
            AdapterError::new_with_cause("Failed to read store", ErrorKind::IOError, root_cause);
        let top_level = AdapterError::new_with_cause(
            "Cannot initialize store",
            ErrorKind::InternalError,
            mid_level,
        );

        assert_eq!(top_level.kind(), &ErrorKind::InternalError);
        if let Some(cause_box) = top_level.cause() {
            assert_eq!(cause_box.kind(), &ErrorKind::IOError);
        }
    }

    #[test]
    fn test_question_mark_operator_with_from() {
        fn operation_that_fails_with_io() -> AdapterResult<String> {
            let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
            Err(io_err.into())
        }

        let result = operation_that_fails_with_io();
        assert!(result.is_err());

        if let Err(err) = result {
            assert_eq!(err.kind(), &ErrorKind::FileNotFound);
        }
    }
}
