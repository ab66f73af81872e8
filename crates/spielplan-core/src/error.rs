//! Codec error types.
//!
//! Only genuinely unrecoverable input surfaces as an error. Missing venues,
//! unparsable results and malformed VEVENT blocks degrade to neutral output
//! instead (see the individual modules).

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while normalizing or decoding calendar data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The date matches neither `YYYY-MM-DD` nor `DD.MM.YYYY`.
    #[error("unsupported date format: {value:?}")]
    UnsupportedDateFormat { value: String },

    /// The time is not a valid `HH:MM` value.
    #[error("unsupported time format: {value:?}")]
    UnsupportedTimeFormat { value: String },

    /// The calendar document has no recognizable VCALENDAR structure.
    #[error("malformed calendar document: {message}")]
    MalformedDocument { message: String },
}

impl CodecError {
    /// Creates an unsupported date format error.
    pub fn unsupported_date(value: impl Into<String>) -> Self {
        Self::UnsupportedDateFormat {
            value: value.into(),
        }
    }

    /// Creates an unsupported time format error.
    pub fn unsupported_time(value: impl Into<String>) -> Self {
        Self::UnsupportedTimeFormat {
            value: value.into(),
        }
    }

    /// Creates a malformed document error.
    pub fn malformed_document(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    /// Returns true if this error rejects a single record's date or time.
    ///
    /// Callers skip the offending record and continue with the batch.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedDateFormat { .. } | Self::UnsupportedTimeFormat { .. }
        )
    }
}
