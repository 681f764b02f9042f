use std::fmt;

/// Fatal error types for flight log processing.
///
/// Per-record and per-point problems never surface here; they are counted
/// in [`crate::DecodeStats`] / [`crate::ProjectionStats`] and decoding continues.
#[derive(Debug)]
pub enum FlightLogError {
    /// I/O errors while acquiring the input buffer or writing exports
    Io(std::io::Error),
    /// Null or empty input buffer
    EmptyBuffer,
    /// File extension or content that maps to no supported log format
    UnsupportedFormat(String),
    /// Persistence collaborator rejected a write
    Sink(String),
    /// Export format error
    Export(String),
    /// Read past the end of a record buffer
    UnexpectedEof,
}

impl fmt::Display for FlightLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightLogError::Io(err) => write!(f, "I/O error: {}", err),
            FlightLogError::EmptyBuffer => {
                write!(f, "Failed to process file: input buffer is empty")
            }
            FlightLogError::UnsupportedFormat(what) => {
                write!(f, "Failed to process file: unsupported log format '{}'", what)
            }
            FlightLogError::Sink(msg) => write!(f, "Sink error: {}", msg),
            FlightLogError::Export(msg) => write!(f, "Export error: {}", msg),
            FlightLogError::UnexpectedEof => write!(f, "Unexpected end of buffer"),
        }
    }
}

impl std::error::Error for FlightLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlightLogError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FlightLogError {
    fn from(err: std::io::Error) -> Self {
        FlightLogError::Io(err)
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for FlightLogError {
    fn from(err: csv::Error) -> Self {
        FlightLogError::Export(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for FlightLogError {
    fn from(err: serde_json::Error) -> Self {
        FlightLogError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FlightLogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_is_reported_as_failed_processing() {
        let err = FlightLogError::EmptyBuffer;
        assert!(err.to_string().starts_with("Failed to process file"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err: FlightLogError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("missing"));
    }
}
