use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::trace;

use super::envelope::{Envelope, Message};
use super::framing::{read_frame, write_frame, DEFAULT_MAX_FRAME_SIZE};
use crate::{Error, Result};

/// Typed message channel over a framed byte stream.
///
/// Reads block until a whole frame arrives unless a read timeout is set.
#[derive(Debug)]
pub struct Connection<S> {
    stream: S,
    read_timeout: Option<Duration>,
    max_frame_size: usize,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a stream with no read timeout and the default frame limit.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            read_timeout: None,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// Sets the per-read timeout. `None` waits forever.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the largest accepted frame payload.
    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    /// Sends a message inside an envelope.
    pub async fn send(&mut self, message: impl Into<Message>) -> Result<()> {
        let message = message.into();
        trace!(message = message.type_name(), "sending");
        write_frame(&mut self.stream, &message.encode()).await
    }

    /// Receives a raw envelope.
    pub async fn recv_envelope(&mut self) -> Result<Envelope> {
        let frame = match self.read_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.read())
                .await
                .map_err(|_| Error::Timeout(timeout))??,
            None => self.read().await?,
        };
        Envelope::decode(&frame)
    }

    /// Receives and interprets one message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMessageType`] if the envelope names a type
    /// outside the protocol, besides framing and decoding failures.
    pub async fn recv(&mut self) -> Result<Message> {
        let envelope = self.recv_envelope().await?;
        trace!(message = envelope.name(), "received");
        Message::from_envelope(&envelope)
    }

    async fn read(&mut self) -> Result<Vec<u8>> {
        read_frame(&mut self.stream, self.max_frame_size).await
    }
}
