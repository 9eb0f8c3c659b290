//! Protobuf messages of the authentication protocol.
//!
//! Integers travel as minimal big-endian byte strings. Every message is
//! wrapped in an [`EnvelopeMessage`] naming its type before being framed.

/// Registration request carrying the public record.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterRequest {
    #[prost(string, tag = "1")]
    pub user: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub commits: ::prost::alloc::vec::Vec<register_request::Commits>,
}

/// Nested message types of [`RegisterRequest`].
pub mod register_request {
    /// Public record `(y1, y2)`.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Commits {
        #[prost(bytes = "vec", tag = "1")]
        pub y1: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "2")]
        pub y2: ::prost::alloc::vec::Vec<u8>,
    }
}

/// Outcome of a registration.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterResponse {
    #[prost(bool, tag = "1")]
    pub result: bool,
    #[prost(string, tag = "2")]
    pub error: ::prost::alloc::string::String,
}

/// Login request carrying the session commitment.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthRequest {
    #[prost(string, tag = "1")]
    pub user: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub commits: ::prost::alloc::vec::Vec<auth_request::Commits>,
}

/// Nested message types of [`AuthRequest`].
pub mod auth_request {
    /// Session commitment `(r1, r2)`.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Commits {
        #[prost(bytes = "vec", tag = "1")]
        pub r1: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "2")]
        pub r2: ::prost::alloc::vec::Vec<u8>,
    }
}

/// Server challenge for a pending login.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChallengeResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub challenge: ::prost::alloc::vec::Vec<u8>,
}

/// Client answer to a challenge.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AnswerRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub answer: ::prost::alloc::vec::Vec<u8>,
}

/// Outcome of a login.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthResponse {
    #[prost(bool, tag = "1")]
    pub result: bool,
    #[prost(string, tag = "2")]
    pub error: ::prost::alloc::string::String,
}

/// Self-describing wrapper: the type name and the encoded message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnvelopeMessage {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub message: ::prost::alloc::vec::Vec<u8>,
}
