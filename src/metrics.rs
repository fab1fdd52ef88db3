//! Client-side counters
//!
//! Prometheus text format so the numbers can be scraped or dumped to the log.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Metrics registry for one arena session
#[derive(Debug)]
pub struct ClientMetrics {
    // Transport
    pub frames_received: AtomicU64,
    pub bytes_received: AtomicU64,

    // Commands
    pub commands_applied: AtomicU64,
    pub resizes_applied: AtomicU64,
    pub displays_applied: AtomicU64,
    pub cells_written: AtomicU64,

    // Rejections by kind
    pub protocol_errors: AtomicU64,
    pub bounds_errors: AtomicU64,
    pub unsupported_commands: AtomicU64,

    // Rendering
    pub renders_requested: AtomicU64,
    pub renders_completed: AtomicU64,

    start_time: Instant,
}

impl Default for ClientMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientMetrics {
    pub fn new() -> Self {
        Self {
            frames_received: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            commands_applied: AtomicU64::new(0),
            resizes_applied: AtomicU64::new(0),
            displays_applied: AtomicU64::new(0),
            cells_written: AtomicU64::new(0),
            protocol_errors: AtomicU64::new(0),
            bounds_errors: AtomicU64::new(0),
            unsupported_commands: AtomicU64::new(0),
            renders_requested: AtomicU64::new(0),
            renders_completed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    #[inline]
    pub fn record_frame(&self, bytes: usize) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_resize(&self) {
        self.commands_applied.fetch_add(1, Ordering::Relaxed);
        self.resizes_applied.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_display(&self, cells: usize) {
        self.commands_applied.fetch_add(1, Ordering::Relaxed);
        self.displays_applied.fetch_add(1, Ordering::Relaxed);
        self.cells_written.fetch_add(cells as u64, Ordering::Relaxed);
    }

    /// Total rejected commands of every kind
    pub fn commands_rejected(&self) -> u64 {
        self.protocol_errors.load(Ordering::Relaxed)
            + self.bounds_errors.load(Ordering::Relaxed)
            + self.unsupported_commands.load(Ordering::Relaxed)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// One-line summary for the shutdown log
    pub fn summary(&self) -> String {
        format!(
            "frames={} bytes={} applied={} rejected={} renders={}/{}",
            self.frames_received.load(Ordering::Relaxed),
            self.bytes_received.load(Ordering::Relaxed),
            self.commands_applied.load(Ordering::Relaxed),
            self.commands_rejected(),
            self.renders_completed.load(Ordering::Relaxed),
            self.renders_requested.load(Ordering::Relaxed),
        )
    }

    /// Generate Prometheus-format metrics output
    pub fn to_prometheus(&self) -> String {
        let mut output = String::with_capacity(2048);

        macro_rules! metric {
            ($name:expr, $help:expr, $type:expr, $value:expr) => {
                output.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} {}\n{} {}\n",
                    $name, $help, $name, $type, $name, $value
                ));
            };
        }

        metric!("snake_arena_frames_received_total", "Frames read from the server", "counter",
            self.frames_received.load(Ordering::Relaxed));
        metric!("snake_arena_bytes_received_total", "Payload bytes read from the server", "counter",
            self.bytes_received.load(Ordering::Relaxed));
        metric!("snake_arena_commands_applied_total", "Commands applied to the arena", "counter",
            self.commands_applied.load(Ordering::Relaxed));
        metric!("snake_arena_resizes_total", "ARENA_CONFIG commands applied", "counter",
            self.resizes_applied.load(Ordering::Relaxed));
        metric!("snake_arena_displays_total", "ARENA_DISPLAY commands applied", "counter",
            self.displays_applied.load(Ordering::Relaxed));
        metric!("snake_arena_cells_written_total", "Cells written by applied displays", "counter",
            self.cells_written.load(Ordering::Relaxed));

        output.push_str("# HELP snake_arena_commands_rejected_total Rejected commands by kind\n");
        output.push_str("# TYPE snake_arena_commands_rejected_total counter\n");
        for (kind, counter) in [
            ("protocol", &self.protocol_errors),
            ("bounds", &self.bounds_errors),
            ("unsupported", &self.unsupported_commands),
        ] {
            output.push_str(&format!(
                "snake_arena_commands_rejected_total{{kind=\"{}\"}} {}\n",
                kind,
                counter.load(Ordering::Relaxed)
            ));
        }

        metric!("snake_arena_renders_requested_total", "Renders scheduled", "counter",
            self.renders_requested.load(Ordering::Relaxed));
        metric!("snake_arena_renders_completed_total", "Renders finished", "counter",
            self.renders_completed.load(Ordering::Relaxed));
        metric!("snake_arena_uptime_seconds", "Session uptime", "gauge", self.uptime_seconds());

        output
    }
}
