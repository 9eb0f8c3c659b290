//! Error types for the Pedersen authentication protocol.

use std::time::Duration;

/// Main error types for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport read or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a whole frame was received.
    #[error("Incomplete frame: expected {expected} bytes, received {received}")]
    IncompleteFrame {
        /// Number of bytes the frame header (or the header itself) announced.
        expected: usize,
        /// Number of bytes actually collected before end-of-stream.
        received: usize,
    },

    /// A frame header announced more bytes than the configured limit.
    #[error("Frame of {size} bytes exceeds the {limit} byte limit")]
    FrameTooLarge {
        /// Announced payload size.
        size: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// A protobuf payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// A request was structurally valid but semantically unusable.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// The peer opened a session with a message that is not a request.
    #[error("Unknown request: {0}")]
    UnknownRequest(String),

    /// An envelope carried a type name outside the protocol vocabulary.
    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),

    /// An envelope carried a different type than the caller asked for.
    #[error("Wrong message type: expected {expected}, got {actual}")]
    WrongMessageType {
        /// Type name the caller expected.
        expected: String,
        /// Type name found in the envelope.
        actual: String,
    },

    /// The peer answered with a message that does not fit the protocol state.
    #[error("Wrong response: expected {expected}, got {actual}")]
    WrongResponse {
        /// Type name the protocol state expected.
        expected: &'static str,
        /// Type name received.
        actual: String,
    },

    /// Registration refused because the user id is taken.
    #[error("user already exists")]
    UserExists(String),

    /// Lookup of a user id that was never registered.
    #[error("user doesn't exist")]
    UserDoesNotExist(String),

    /// The entropy source failed.
    #[error("Randomness error: {0}")]
    Randomness(#[from] rand::Error),

    /// The entropy source failed while drawing a challenge.
    #[error("Challenge construction error: {0}")]
    ChallengeConstruction(#[source] rand::Error),

    /// Password stretching failed.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// A proof was requested before any commitment was computed.
    #[error("No commitment has been computed for this prover")]
    MissingCommitment,

    /// Invalid group parameters were provided.
    #[error("Invalid group parameters: {0}")]
    InvalidParams(String),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The peer did not send anything within the configured read timeout.
    #[error("Timed out after {0:?} waiting for the peer")]
    Timeout(Duration),
}

impl Error {
    /// Returns true for business-logic failures that are reported to the peer
    /// instead of aborting the connection.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UserExists(_) | Error::UserDoesNotExist(_))
    }
}
