//! Envelope codec and the closed set of protocol messages.

use prost::Message as _;

use super::proto::{
    AnswerRequest, AuthRequest, AuthResponse, ChallengeResponse, EnvelopeMessage, RegisterRequest,
    RegisterResponse,
};
use crate::{Error, Result};

/// A protobuf message with a fixed envelope type name.
pub trait NamedMessage: prost::Message + Default {
    /// Type name written into the envelope.
    const NAME: &'static str;
}

/// A payload tagged with its type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    name: String,
    payload: Vec<u8>,
}

impl Envelope {
    /// Wraps an already encoded payload.
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Wraps a typed message.
    pub fn wrap<M: NamedMessage>(message: &M) -> Self {
        Self::new(M::NAME, message.encode_to_vec())
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the opaque payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serializes the envelope.
    pub fn encode(&self) -> Vec<u8> {
        EnvelopeMessage {
            name: self.name.clone(),
            message: self.payload.clone(),
        }
        .encode_to_vec()
    }

    /// Deserializes an envelope without interpreting the payload.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let envelope = EnvelopeMessage::decode(bytes)?;
        Ok(Self {
            name: envelope.name,
            payload: envelope.message,
        })
    }

    /// Deserializes an envelope that must carry an `M`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongMessageType`] if the envelope names another type.
    pub fn decode_as<M: NamedMessage>(bytes: &[u8]) -> Result<M> {
        Self::decode(bytes)?.open()
    }

    /// Decodes the payload as an `M`, checking the type name first.
    pub fn open<M: NamedMessage>(&self) -> Result<M> {
        if self.name != M::NAME {
            return Err(Error::WrongMessageType {
                expected: M::NAME.to_string(),
                actual: self.name.clone(),
            });
        }
        Ok(M::decode(self.payload.as_slice())?)
    }
}

/// Every message the protocol knows.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    RegisterRequest(RegisterRequest),
    RegisterResponse(RegisterResponse),
    AuthRequest(AuthRequest),
    ChallengeResponse(ChallengeResponse),
    AnswerRequest(AnswerRequest),
    AuthResponse(AuthResponse),
}

macro_rules! protocol_messages {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl NamedMessage for $variant {
                const NAME: &'static str = stringify!($variant);
            }

            impl From<$variant> for Message {
                fn from(message: $variant) -> Self {
                    Message::$variant(message)
                }
            }
        )+

        impl Message {
            /// Returns the envelope type name of this message.
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(Message::$variant(_) => $variant::NAME,)+
                }
            }

            /// Wraps the message into an envelope.
            pub fn to_envelope(&self) -> Envelope {
                match self {
                    $(Message::$variant(message) => Envelope::wrap(message),)+
                }
            }

            /// Interprets an envelope.
            ///
            /// # Errors
            ///
            /// Returns [`Error::UnknownMessageType`] for type names outside the protocol.
            pub fn from_envelope(envelope: &Envelope) -> Result<Self> {
                match envelope.name() {
                    $(stringify!($variant) => Ok(Message::$variant(envelope.open()?)),)+
                    other => Err(Error::UnknownMessageType(other.to_string())),
                }
            }
        }
    };
}

protocol_messages!(
    RegisterRequest,
    RegisterResponse,
    AuthRequest,
    ChallengeResponse,
    AnswerRequest,
    AuthResponse,
);

impl Message {
    /// Serializes the message inside its envelope.
    pub fn encode(&self) -> Vec<u8> {
        self.to_envelope().encode()
    }

    /// Deserializes an envelope and its payload.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::from_envelope(&Envelope::decode(bytes)?)
    }
}
