//! TCP transport feeding the command decoder
//!
//! Frames are read and applied strictly in order on one task, so command
//! application is sequential. A rejected command is logged and skipped; only
//! transport failures end the session.

use std::net::SocketAddr;

use tokio::io::AsyncRead;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::arena::decoder::CommandDecoder;
use crate::config::ClientConfig;
use crate::net::framing::{read_frame, FramingError};

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not yet connected
    Connecting,
    /// Receiving commands
    Connected,
    /// Stream ended or failed
    Disconnected,
}

/// Totals for one stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub frames: u64,
    pub bytes: u64,
    pub applied: u64,
    pub rejected: u64,
}

/// Reads framed commands from the server and applies them to the arena
pub struct ArenaClient {
    config: ClientConfig,
    decoder: CommandDecoder,
    state: ConnectionState,
}

impl ArenaClient {
    pub fn new(config: ClientConfig, decoder: CommandDecoder) -> Self {
        Self {
            config,
            decoder,
            state: ConnectionState::Connecting,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.config.server_address, self.config.port)
    }

    /// Connect to the configured server and process commands until it hangs up
    pub async fn connect_and_run(&mut self) -> Result<StreamStats, FramingError> {
        let addr = self.server_addr();
        info!("Connecting to arena server at {}", addr);
        let stream = match TcpStream::connect(addr).await {
            Ok(stream) => stream,
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                return Err(e.into());
            }
        };
        stream.set_nodelay(true)?;
        info!("Connected to {}", addr);
        self.run(stream).await
    }

    /// Process framed commands from `reader` until end of stream
    pub async fn run<R: AsyncRead + Unpin>(&mut self, mut reader: R) -> Result<StreamStats, FramingError> {
        self.state = ConnectionState::Connected;
        let mut stats = StreamStats::default();

        let result = loop {
            let frame = match read_frame(&mut reader).await {
                Ok(frame) => frame,
                Err(FramingError::ConnectionClosed) => {
                    info!("Server closed the stream after {} frames", stats.frames);
                    break Ok(stats);
                }
                Err(e) => {
                    warn!("Stream error after {} frames: {}", stats.frames, e);
                    break Err(e);
                }
            };

            stats.frames += 1;
            stats.bytes += frame.len() as u64;
            self.record_frame(frame.len());

            if self.decoder.handle_frame(&frame) {
                stats.applied += 1;
            } else {
                stats.rejected += 1;
                debug!("Frame {} rejected, keeping last good arena", stats.frames);
            }
        };

        self.state = ConnectionState::Disconnected;
        result
    }

    fn record_frame(&self, bytes: usize) {
        self.decoder.metrics().record_frame(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::cell::CellValue;
    use crate::net::protocol::{encode_command, Command};
    use crate::session::ArenaSession;
    use std::io;
    use std::sync::atomic::Ordering;

    fn framed(command: &Command) -> Vec<u8> {
        let payload = encode_command(command).unwrap();
        let mut frame = (payload.len() as u32).to_le_bytes().to_vec();
        frame.extend_from_slice(&payload);
        frame
    }

    #[tokio::test]
    async fn test_stream_applies_commands_in_order() {
        let session = ArenaSession::new(&ClientConfig::default());
        let renders = session.subscribe();
        let mut client = ArenaClient::new(ClientConfig::default(), session.decoder());

        let reader = tokio_test::io::Builder::new()
            .read(&framed(&Command::Resize { width: 3, height: 2 }))
            .read(&framed(&Command::Display {
                cells: vec![1, 1, 1, 1, 1, 1],
            }))
            .read(&framed(&Command::Display {
                cells: vec![2, 3, 4, 0, 1, 5],
            }))
            .build();

        let stats = client.run(reader).await.unwrap();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.applied, 3);
        assert_eq!(stats.rejected, 0);
        assert_eq!(client.state(), ConnectionState::Disconnected);

        assert_eq!(renders.len(), 2);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.cell_at(0, 0), CellValue::Wall);
        assert_eq!(snapshot.cell_at(2, 1), CellValue::SnakeSegment(1));
        assert_eq!(
            session.metrics().frames_received.load(Ordering::Relaxed),
            3
        );
    }

    #[tokio::test]
    async fn test_rejected_commands_do_not_end_stream() {
        let session = ArenaSession::new(&ClientConfig::default());
        let mut client = ArenaClient::new(ClientConfig::default(), session.decoder());

        let mut unknown = 2u32.to_le_bytes().to_vec();
        unknown.extend_from_slice(&[77, 0]);

        let reader = tokio_test::io::Builder::new()
            .read(&framed(&Command::Resize { width: 2, height: 1 }))
            .read(&framed(&Command::Display { cells: vec![2, 2] }))
            .read(&unknown)
            .read(&framed(&Command::Display { cells: vec![3] }))
            .read(&framed(&Command::Retransmit { command_number: 4 }))
            .build();

        let stats = client.run(reader).await.unwrap();
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.applied, 2);
        assert_eq!(stats.rejected, 3);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.cell_at(0, 0), CellValue::Wall);
        assert_eq!(snapshot.cell_at(1, 0), CellValue::Wall);
        assert_eq!(session.metrics().commands_rejected(), 3);
    }

    #[tokio::test]
    async fn test_truncated_frame_is_an_error() {
        let session = ArenaSession::new(&ClientConfig::default());
        let mut client = ArenaClient::new(ClientConfig::default(), session.decoder());

        let display = framed(&Command::Display { cells: vec![2, 2] });
        let reader = tokio_test::io::Builder::new()
            .read(&framed(&Command::Resize { width: 2, height: 1 }))
            .read(&display[..display.len() - 1])
            .build();

        let result = client.run(reader).await;
        assert!(matches!(result, Err(FramingError::Truncated { .. })));
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert_eq!(session.metrics().frames_received.load(Ordering::Relaxed), 1);
        assert_eq!(session.snapshot().cell_at(0, 0), CellValue::Unknown);
    }

    #[tokio::test]
    async fn test_io_error_ends_stream() {
        let session = ArenaSession::new(&ClientConfig::default());
        let mut client = ArenaClient::new(ClientConfig::default(), session.decoder());

        let reader = tokio_test::io::Builder::new()
            .read(&framed(&Command::Resize { width: 1, height: 1 }))
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();

        let result = client.run(reader).await;
        assert!(matches!(result, Err(FramingError::Io(_))));
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert_eq!(session.snapshot().dimensions(), (1, 1));
    }

    #[test]
    fn test_server_addr_from_config() {
        let config = ClientConfig {
            port: 7000,
            ..ClientConfig::default()
        };
        let session = ArenaSession::new(&config);
        let client = ArenaClient::new(config, session.decoder());
        assert_eq!(client.server_addr().port(), 7000);
        assert_eq!(client.state(), ConnectionState::Connecting);
    }
}
