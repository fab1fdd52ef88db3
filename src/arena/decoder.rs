//! Applies server commands to the arena
//!
//! Commands are applied one at a time: the decoder holds the arena's writer
//! lock for the whole command, so two DISPLAYs can never interleave their
//! cell writes.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use super::cell::CellValue;
use super::grid::BoundsError;
use super::shared::SharedArena;
use crate::constants::arena::DEFAULT_MAX_CELLS;
use crate::metrics::ClientMetrics;
use crate::net::protocol::{decode_command, Command, ProtocolError};
use crate::render::RenderNotifier;

/// Why a command was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("Display carries {actual} cells but the arena has {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Display write out of bounds: {0}")]
    OutOfBounds(#[from] BoundsError),
    #[error("Arena {width}x{height} exceeds the {limit} cell limit")]
    ArenaTooLarge {
        width: usize,
        height: usize,
        limit: usize,
    },
    #[error("Retransmission of command {command_number} is not implemented")]
    NotImplemented { command_number: i32 },
}

/// Coarse classification of rejected commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Protocol,
    Bounds,
    Unsupported,
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Protocol(_) | Self::LengthMismatch { .. } | Self::ArenaTooLarge { .. } => {
                ErrorKind::Protocol
            }
            Self::OutOfBounds(_) => ErrorKind::Bounds,
            Self::NotImplemented { .. } => ErrorKind::Unsupported,
        }
    }
}

/// Result of a successfully applied command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Resized { width: usize, height: usize },
    /// Display applied and published under `version`; `subscribers` renders scheduled
    Displayed {
        version: u64,
        cells: usize,
        subscribers: usize,
    },
}

/// Interprets commands and applies them to a [`SharedArena`]
#[derive(Clone)]
pub struct CommandDecoder {
    arena: Arc<SharedArena>,
    notifier: Arc<RenderNotifier>,
    metrics: Arc<ClientMetrics>,
    max_cells: usize,
}

impl CommandDecoder {
    pub fn new(
        arena: Arc<SharedArena>,
        notifier: Arc<RenderNotifier>,
        metrics: Arc<ClientMetrics>,
    ) -> Self {
        Self {
            arena,
            notifier,
            metrics,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }

    /// Reject resizes whose area exceeds `max_cells`
    pub fn with_cell_limit(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    pub fn arena(&self) -> &Arc<SharedArena> {
        &self.arena
    }

    pub fn metrics(&self) -> &Arc<ClientMetrics> {
        &self.metrics
    }

    /// Apply one command
    pub fn apply(&self, command: Command) -> Result<CommandOutcome, CommandError> {
        match command {
            Command::Resize { width, height } => self.resize(width, height),
            Command::Display { cells } => self.display(&cells),
            Command::Retransmit { command_number } => {
                Err(CommandError::NotImplemented { command_number })
            }
        }
    }

    /// Decode a wire frame and apply it
    pub fn apply_frame(&self, frame: &[u8]) -> Result<CommandOutcome, CommandError> {
        let command = decode_command(frame)?;
        self.apply(command)
    }

    /// Apply a command, logging and counting any rejection.
    ///
    /// Returns `true` if the command was applied.
    pub fn handle(&self, command: Command) -> bool {
        let name = command.name();
        let result = self.apply(command);
        self.report(name, result)
    }

    /// Decode and apply a wire frame, logging and counting any rejection
    pub fn handle_frame(&self, frame: &[u8]) -> bool {
        let result = self.apply_frame(frame);
        self.report("frame", result)
    }

    fn report(&self, name: &str, result: Result<CommandOutcome, CommandError>) -> bool {
        match result {
            Ok(outcome) => {
                debug!("Applied {}: {:?}", name, outcome);
                true
            }
            Err(e) => {
                let counter = match e.kind() {
                    ErrorKind::Protocol => &self.metrics.protocol_errors,
                    ErrorKind::Bounds => &self.metrics.bounds_errors,
                    ErrorKind::Unsupported => &self.metrics.unsupported_commands,
                };
                counter.fetch_add(1, Ordering::Relaxed);
                warn!("Rejected {} command: {}", name, e);
                false
            }
        }
    }

    fn resize(&self, width: usize, height: usize) -> Result<CommandOutcome, CommandError> {
        let too_large = CommandError::ArenaTooLarge {
            width,
            height,
            limit: self.max_cells,
        };
        match width.checked_mul(height) {
            Some(area) if area <= self.max_cells => {}
            _ => return Err(too_large),
        }

        self.arena.resize(width, height);
        self.metrics.record_resize();
        Ok(CommandOutcome::Resized { width, height })
    }

    fn display(&self, cells: &[u8]) -> Result<CommandOutcome, CommandError> {
        let mut writer = self.arena.write();
        let (width, height) = writer.grid().dimensions();
        let expected = width * height;

        // Short payloads would leave cells unset; reject before touching the grid
        if cells.len() < expected {
            return Err(CommandError::LengthMismatch {
                expected,
                actual: cells.len(),
            });
        }

        // Long payloads are applied until the first write past the edge. The
        // cells written before it are published but no render is requested.
        let grid = writer.grid_mut();
        for (i, byte) in cells.iter().enumerate() {
            let (x, y) = if height == 0 {
                (0, i)
            } else {
                (i / height, i % height)
            };
            if let Err(e) = grid.try_set_cell(x, y, CellValue::from_byte(*byte)) {
                if i > 0 {
                    let partial = writer.publish();
                    debug!(
                        "Published {} cells of an oversized display as v{}",
                        i,
                        partial.version()
                    );
                }
                return Err(e.into());
            }
        }

        let snapshot = writer.publish();
        self.metrics.record_display(cells.len());
        self.metrics
            .renders_requested
            .fetch_add(1, Ordering::Relaxed);
        // Notify before releasing the writer so renders are queued in version order
        let subscribers = self.notifier.notify(&snapshot);
        drop(writer);

        Ok(CommandOutcome::Displayed {
            version: snapshot.version(),
            cells: cells.len(),
            subscribers,
        })
    }
}
