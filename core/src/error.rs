//! Error types for the jservice client.
//!
//! # Design
//! Input rejections (`CountTooLarge`, `NegativeCategoryId`) are produced
//! before any request is built, so no I/O happens for them. Everything else
//! is a transport or decoding failure. The default-empty operations on
//! `JService` collapse all of these into an empty result; the `try_*`
//! operations hand them back unchanged.

use std::fmt;

/// Errors returned by `JServiceClient` build/parse methods and by the
/// `JService::try_*` operations.
#[derive(Debug)]
pub enum ApiError {
    /// The requested page or batch size exceeds what the API serves.
    CountTooLarge { count: u32, max: u32 },

    /// Category ids are never negative.
    NegativeCategoryId(i64),

    /// The HTTP round-trip did not produce a response body.
    TransportError(String),

    /// The response body is not valid JSON.
    DeserializationError(String),

    /// The JSON document lacks the array the operation reads from.
    MissingArray(&'static str),
}

impl ApiError {
    /// True for errors raised from the arguments alone, before any request.
    pub fn is_input_rejection(&self) -> bool {
        matches!(
            self,
            ApiError::CountTooLarge { .. } | ApiError::NegativeCategoryId(_)
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::CountTooLarge { count, max } => {
                write!(f, "count {count} exceeds the maximum of {max}")
            }
            ApiError::NegativeCategoryId(id) => write!(f, "negative category id {id}"),
            ApiError::TransportError(msg) => write!(f, "transport failed: {msg}"),
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::MissingArray(what) => write!(f, "response has no {what} array"),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_rejections_are_flagged() {
        assert!(ApiError::CountTooLarge { count: 101, max: 100 }.is_input_rejection());
        assert!(ApiError::NegativeCategoryId(-1).is_input_rejection());
        assert!(!ApiError::TransportError("refused".into()).is_input_rejection());
        assert!(!ApiError::MissingArray("clues").is_input_rejection());
    }

    #[test]
    fn display_mentions_the_offending_value() {
        let err = ApiError::CountTooLarge { count: 250, max: 100 };
        assert_eq!(err.to_string(), "count 250 exceeds the maximum of 100");
        assert_eq!(
            ApiError::MissingArray("clues").to_string(),
            "response has no clues array"
        );
    }
}
