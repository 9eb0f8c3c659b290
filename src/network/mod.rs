/// Typed message channel over a framed stream.
pub mod connection;
/// Envelope codec and protocol message set.
pub mod envelope;
/// Length-prefixed packet framing.
pub mod framing;
/// Protobuf wire messages.
pub mod proto;

pub use connection::Connection;
pub use envelope::{Envelope, Message, NamedMessage};
pub use framing::{read_frame, write_frame, DEFAULT_MAX_FRAME_SIZE};
