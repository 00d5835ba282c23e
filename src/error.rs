//! Error types for Geocaching JSON API operations
//!
//! This module defines the error types that can occur when talking to
//! the Geocaching service or decoding its JSON responses.
//!
//! Field-level oddities in a response (an unparseable date, an unknown
//! enum code) are not errors. They are logged and decoded to a sentinel
//! value so the rest of the document is still read.

use thiserror::Error;

/// Main error type for Geocaching JSON API operations
///
/// Every failed call reports exactly one of these variants.
#[derive(Debug, Error)]
pub enum GeocachingError {
    /// The HTTP exchange itself failed
    ///
    /// Connection refused, DNS failure, connect or read timeout. The
    /// underlying cause is kept as the error source.
    #[error("Error occurs while downloading data: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The service answered, but not with a JSON success body
    ///
    /// Raised for HTTP status >= 400 and for any response whose
    /// `Content-Type` is not a JSON media type. The body is the full,
    /// decompressed response text and is never handed to the decoder.
    #[error("Invalid response: {status} {message}")]
    InvalidResponse {
        /// HTTP status code
        status: u16,
        /// HTTP status message (reason phrase)
        message: String,
        /// Decompressed response body
        body: String,
    },

    /// The response body did not have the expected JSON structure
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// A filter was written to a query while not valid
    ///
    /// This is a programming error: check [`Filter::is_valid`] first, or
    /// let [`QueryBuilder::filters`] do it.
    ///
    /// [`Filter::is_valid`]: crate::protocol::Filter::is_valid
    /// [`QueryBuilder::filters`]: crate::protocol::v6::filter::QueryBuilder::filters
    #[error("Filter {0} is not valid and cannot be written")]
    InvalidFilter(&'static str),

    /// A request body could not be serialized
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl GeocachingError {
    pub(crate) fn network<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        GeocachingError::Network(Box::new(err))
    }

    pub(crate) fn from_decode(err: serde_json::Error) -> Self {
        if err.is_io() {
            GeocachingError::network(err)
        } else {
            GeocachingError::Decode(err)
        }
    }

    /// Returns `true` for transport failures (connection, timeout, I/O)
    pub fn is_network(&self) -> bool {
        matches!(self, GeocachingError::Network(_))
    }

    /// HTTP status code of an [`GeocachingError::InvalidResponse`]
    pub fn status(&self) -> Option<u16> {
        match self {
            GeocachingError::InvalidResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}
