//! One arena per session
//!
//! The session owns the arena, the render fan-out and the metrics, and hands
//! out decoders and render subscriptions. Nothing here is global: dropping the
//! session (and its decoders) ends its render threads.

use std::io;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::info;

use crate::arena::decoder::CommandDecoder;
use crate::arena::shared::{ArenaSnapshot, SharedArena};
use crate::config::ClientConfig;
use crate::metrics::ClientMetrics;
use crate::render::{RenderHandle, RenderNotifier, RenderWorker, Renderer};

pub struct ArenaSession {
    arena: Arc<SharedArena>,
    notifier: Arc<RenderNotifier>,
    metrics: Arc<ClientMetrics>,
    max_arena_cells: usize,
}

impl ArenaSession {
    pub fn new(config: &ClientConfig) -> Self {
        info!(
            "Arena session created (max {} cells)",
            config.max_arena_cells
        );
        Self {
            arena: Arc::new(SharedArena::new()),
            notifier: Arc::new(RenderNotifier::new()),
            metrics: Arc::new(ClientMetrics::new()),
            max_arena_cells: config.max_arena_cells,
        }
    }

    /// Decoder writing into this session's arena
    pub fn decoder(&self) -> CommandDecoder {
        CommandDecoder::new(self.arena.clone(), self.notifier.clone(), self.metrics.clone())
            .with_cell_limit(self.max_arena_cells)
    }

    pub fn arena(&self) -> &Arc<SharedArena> {
        &self.arena
    }

    pub fn metrics(&self) -> &Arc<ClientMetrics> {
        &self.metrics
    }

    /// Latest published arena state
    pub fn snapshot(&self) -> ArenaSnapshot {
        self.arena.snapshot()
    }

    /// Receive a snapshot after every applied DISPLAY
    pub fn subscribe(&self) -> Receiver<ArenaSnapshot> {
        self.notifier.subscribe()
    }

    /// Run `renderer` on its own thread after every applied DISPLAY
    pub fn on_update<R: Renderer>(&self, renderer: R) -> io::Result<RenderHandle> {
        RenderWorker::spawn(self.subscribe(), renderer, self.metrics.clone())
    }
}
