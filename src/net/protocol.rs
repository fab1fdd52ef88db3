//! Arena command protocol
//!
//! Every frame payload is `[tag: u8][body]`. Bodies are bincode (legacy config:
//! fixed-width little-endian integers, u64 length prefix on sequences).

use serde::{Deserialize, Serialize};

use crate::constants::net::tag;

/// Command from the server to the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reinitialize the arena at the given size
    Resize { width: usize, height: usize },
    /// Full arena contents as wire bytes, column-major
    Display { cells: Vec<u8> },
    /// Server asks for command `command_number` to be repeated
    Retransmit { command_number: i32 },
}

impl Command {
    pub fn tag(&self) -> u8 {
        match self {
            Self::Resize { .. } => tag::ARENA_CONFIG,
            Self::Display { .. } => tag::ARENA_DISPLAY,
            Self::Retransmit { .. } => tag::ERR,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resize { .. } => "ARENA_CONFIG",
            Self::Display { .. } => "ARENA_DISPLAY",
            Self::Retransmit { .. } => "ERR",
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ResizeBody {
    width: i32,
    height: i32,
}

#[derive(Serialize, Deserialize)]
struct DisplayBody {
    cells: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct RetransmitBody {
    command_number: i32,
}

/// Errors turning bytes into commands (or back)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("Empty command frame")]
    Empty,
    #[error("Unknown command tag {0}")]
    UnknownTag(u8),
    #[error("Negative arena dimensions {width}x{height}")]
    NegativeDimension { width: i32, height: i32 },
    #[error("Arena dimension does not fit the wire format")]
    DimensionOverflow,
    #[error("Malformed command body: {0}")]
    Body(String),
    #[error("{0} trailing bytes after command body")]
    TrailingBytes(usize),
    #[error("Encode error: {0}")]
    Encode(String),
}

fn encode_body<T: Serialize>(body: &T) -> Result<Vec<u8>, ProtocolError> {
    bincode::serde::encode_to_vec(body, bincode::config::legacy())
        .map_err(|e| ProtocolError::Encode(e.to_string()))
}

fn decode_body<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, ProtocolError> {
    let (body, read) = bincode::serde::decode_from_slice(data, bincode::config::legacy())
        .map_err(|e| ProtocolError::Body(e.to_string()))?;
    if read != data.len() {
        return Err(ProtocolError::TrailingBytes(data.len() - read));
    }
    Ok(body)
}

/// Encode a command into a frame payload
pub fn encode_command(command: &Command) -> Result<Vec<u8>, ProtocolError> {
    let body = match command {
        Command::Resize { width, height } => {
            let width = i32::try_from(*width).map_err(|_| ProtocolError::DimensionOverflow)?;
            let height = i32::try_from(*height).map_err(|_| ProtocolError::DimensionOverflow)?;
            encode_body(&ResizeBody { width, height })?
        }
        Command::Display { cells } => encode_body(&DisplayBody {
            cells: cells.clone(),
        })?,
        Command::Retransmit { command_number } => encode_body(&RetransmitBody {
            command_number: *command_number,
        })?,
    };

    let mut payload = Vec::with_capacity(body.len() + 1);
    payload.push(command.tag());
    payload.extend_from_slice(&body);
    Ok(payload)
}

/// Decode a frame payload into a command
pub fn decode_command(data: &[u8]) -> Result<Command, ProtocolError> {
    let (&command_tag, body) = data.split_first().ok_or(ProtocolError::Empty)?;

    match command_tag {
        tag::ARENA_CONFIG => {
            let ResizeBody { width, height } = decode_body(body)?;
            match (usize::try_from(width), usize::try_from(height)) {
                (Ok(width), Ok(height)) => Ok(Command::Resize { width, height }),
                _ => Err(ProtocolError::NegativeDimension { width, height }),
            }
        }
        tag::ARENA_DISPLAY => {
            let DisplayBody { cells } = decode_body(body)?;
            Ok(Command::Display { cells })
        }
        tag::ERR => {
            let RetransmitBody { command_number } = decode_body(body)?;
            Ok(Command::Retransmit { command_number })
        }
        other => Err(ProtocolError::UnknownTag(other)),
    }
}
