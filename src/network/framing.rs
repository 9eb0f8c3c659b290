//! Length-prefixed packet framing.
//!
//! ```text
//! 4 bytes          | N bytes
//! -----------------+----------------
//! N, little endian | payload
//! ```
//!
//! Readers accumulate until the whole frame is available, however the
//! transport splits it, and never consume bytes past the frame.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{Error, Result};

/// Size of the length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default upper bound on a frame payload.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024;

/// Writes one frame and flushes the writer.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(payload.len()).map_err(|_| Error::FrameTooLarge {
        size: payload.len(),
        limit: u32::MAX as usize,
    })?;

    writer.write_all(&len.to_le_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one frame.
///
/// # Errors
///
/// - [`Error::IncompleteFrame`] if the stream ends inside the prefix or payload
/// - [`Error::FrameTooLarge`] if the prefix announces more than `max_frame_size`
/// - [`Error::Io`] on transport failure
pub async fn read_frame<R>(reader: &mut R, max_frame_size: usize) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    fill(reader, &mut prefix).await?;

    let size = u32::from_le_bytes(prefix) as usize;
    if size > max_frame_size {
        return Err(Error::FrameTooLarge {
            size,
            limit: max_frame_size,
        });
    }

    let mut payload = vec![0u8; size];
    fill(reader, &mut payload).await?;
    Ok(payload)
}

async fn fill<R>(reader: &mut R, buf: &mut [u8]) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut received = 0;
    while received < buf.len() {
        let n = reader.read(&mut buf[received..]).await?;
        if n == 0 {
            return Err(Error::IncompleteFrame {
                expected: buf.len(),
                received,
            });
        }
        received += n;
    }
    Ok(())
}
