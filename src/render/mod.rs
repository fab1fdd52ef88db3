//! Renderer boundary
//!
//! The decoder publishes a snapshot after every applied DISPLAY and hands it
//! to each subscriber through an unbounded crossbeam channel, so scheduling a
//! render never blocks the decoder. Each subscriber drains its channel on its
//! own thread.

pub mod terminal;

use std::io;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::arena::shared::ArenaSnapshot;
use crate::metrics::ClientMetrics;

/// Draws arena snapshots
pub trait Renderer: Send + 'static {
    fn render(&mut self, snapshot: &ArenaSnapshot);
}

impl<F> Renderer for F
where
    F: FnMut(&ArenaSnapshot) + Send + 'static,
{
    fn render(&mut self, snapshot: &ArenaSnapshot) {
        self(snapshot)
    }
}

/// Fan-out of published snapshots to render subscribers
#[derive(Default)]
pub struct RenderNotifier {
    subscribers: Mutex<Vec<Sender<ArenaSnapshot>>>,
}

impl RenderNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Receiver<ArenaSnapshot> {
        let (sender, receiver) = unbounded();
        self.subscribers.lock().push(sender);
        receiver
    }

    /// Schedule a render on every subscriber. Never blocks.
    ///
    /// Returns the number of subscribers reached; dropped subscribers are pruned.
    pub fn notify(&self, snapshot: &ArenaSnapshot) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| sender.send(snapshot.clone()).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

/// Handle to a running render thread
pub struct RenderHandle {
    handle: JoinHandle<()>,
}

impl RenderHandle {
    /// Wait for the render thread to drain its queue and exit.
    ///
    /// The thread exits once the session that feeds it is dropped.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Runs a renderer on its own thread, once per received snapshot
pub struct RenderWorker;

impl RenderWorker {
    pub fn spawn<R: Renderer>(
        receiver: Receiver<ArenaSnapshot>,
        mut renderer: R,
        metrics: Arc<ClientMetrics>,
    ) -> io::Result<RenderHandle> {
        let handle = thread::Builder::new()
            .name("arena-render".to_string())
            .spawn(move || {
                for snapshot in receiver.iter() {
                    renderer.render(&snapshot);
                    metrics.renders_completed.fetch_add(1, Ordering::Relaxed);
                }
                debug!("Render thread finished");
            })
            .map_err(|e| {
                error!("Failed to spawn render thread: {}", e);
                e
            })?;
        Ok(RenderHandle { handle })
    }
}
