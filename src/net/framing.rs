//! Length-prefixed command frames
//!
//! Format: `[4 bytes little-endian length][payload]`. A stream may only end
//! on a frame boundary; ending anywhere else is a truncated frame.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::constants::net::{LENGTH_PREFIX_SIZE, MAX_MESSAGE_SIZE};

/// Errors that can occur while reading frames
#[derive(Debug, thiserror::Error)]
pub enum FramingError {
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Stream ended inside a frame: got {received} of {expected} bytes")]
    Truncated { expected: usize, received: usize },
    #[error("Message too large: {0} bytes (max {1})")]
    MessageTooLarge(usize, usize),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Fill `buf` from the stream, stopping early only at end of stream.
/// Returns the number of bytes read.
async fn read_full<R: AsyncRead + Unpin>(stream: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]).await? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

/// Read one frame payload.
///
/// End of stream before the length prefix is `ConnectionClosed`; end of
/// stream after it has started is `Truncated`.
pub async fn read_frame<R: AsyncRead + Unpin>(stream: &mut R) -> Result<Vec<u8>, FramingError> {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    match read_full(stream, &mut prefix).await? {
        0 => return Err(FramingError::ConnectionClosed),
        LENGTH_PREFIX_SIZE => {}
        received => {
            return Err(FramingError::Truncated {
                expected: LENGTH_PREFIX_SIZE,
                received,
            })
        }
    }

    let len = u32::from_le_bytes(prefix) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(FramingError::MessageTooLarge(len, MAX_MESSAGE_SIZE));
    }

    let mut payload = vec![0u8; len];
    let received = read_full(stream, &mut payload).await?;
    if received < len {
        return Err(FramingError::Truncated {
            expected: len,
            received,
        });
    }
    Ok(payload)
}
