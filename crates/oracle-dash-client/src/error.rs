/*
[INPUT]:  Error sources (transport, serialization, protocol, decode)
[OUTPUT]: Structured error types for the oracle client
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use thiserror::Error;

/// Main error type for the oracle dashboard client
#[derive(Error, Debug)]
pub enum OracleError {
    /// Transport is not connected; send calls fail fast
    #[error("not connected to oracle service")]
    NotConnected,

    /// Underlying transport failed
    #[error("transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Response carried an id with no live pending request
    #[error("response id {id} does not match any pending request")]
    UnmatchedResponse { id: u64 },

    /// Notification addressed a subscription nobody registered
    #[error("notification for unregistered subscription {subscription}")]
    UnknownSubscription { subscription: u64 },

    /// Price exponent outside the supported scaling range
    #[error("price exponent {exponent} outside supported range")]
    ExponentOutOfRange { exponent: i32 },

    /// Frame was missing a field the protocol requires
    #[error("missing expected field: {0}")]
    MissingField(&'static str),

    /// Pending request expired before a response arrived
    #[error("request {id} timed out")]
    RequestTimeout { id: u64 },

    /// Server returned a JSON-RPC error member
    #[error("server error (code {code}): {message}")]
    Rpc { code: i64, message: String },
}

/// Result type alias using OracleError
pub type Result<T> = std::result::Result<T, OracleError>;
