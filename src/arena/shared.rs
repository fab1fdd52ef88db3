//! Shared arena state: one writer, many readers
//!
//! The writer holds a mutex for the whole of one command and mutates a
//! working copy. Readers only ever see a published `Arc<ArenaGrid>`, which is
//! swapped atomically when a command completes. The working copy and the
//! published pointer share one grid between commands, so the first write of
//! each command clones it (`Arc::make_mut`) and published grids are never
//! written in place.

use std::ops::Deref;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::debug;

use super::cell::CellValue;
use super::color::{self, Color};
use super::grid::{ArenaGrid, BoundsError};

/// Published grid plus the version it was published under
#[derive(Debug, Clone)]
struct Published {
    grid: Arc<ArenaGrid>,
    version: u64,
}

/// The single arena of a session
#[derive(Debug)]
pub struct SharedArena {
    working: Mutex<Arc<ArenaGrid>>,
    published: RwLock<Published>,
}

impl Default for SharedArena {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedArena {
    /// Empty 0x0 arena
    pub fn new() -> Self {
        let grid = Arc::new(ArenaGrid::default());
        Self {
            working: Mutex::new(grid.clone()),
            published: RwLock::new(Published { grid, version: 0 }),
        }
    }

    /// Replace the grid with a fresh all-`Unknown` one and publish it.
    ///
    /// Readers holding the previous grid keep a complete (stale) copy.
    pub fn resize(&self, width: usize, height: usize) -> ArenaSnapshot {
        let mut writer = self.write();
        *writer.working = Arc::new(ArenaGrid::new(width, height));
        debug!("Arena resized to {}x{}", width, height);
        writer.publish()
    }

    /// Take the writer lock. Blocks while another command is being applied.
    pub fn write(&self) -> ArenaWriter<'_> {
        ArenaWriter {
            working: self.working.lock(),
            published: &self.published,
        }
    }

    /// Latest published state
    pub fn snapshot(&self) -> ArenaSnapshot {
        let published = self.published.read();
        ArenaSnapshot {
            grid: published.grid.clone(),
            version: published.version,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.published.read().grid.dimensions()
    }

    /// Read a published cell. Out-of-range coordinates panic.
    pub fn get_cell(&self, x: usize, y: usize) -> CellValue {
        self.published.read().grid.get_cell(x, y)
    }

    /// Number of publishes so far
    pub fn version(&self) -> u64 {
        self.published.read().version
    }
}

/// Exclusive write access to the arena for one command
pub struct ArenaWriter<'a> {
    working: MutexGuard<'a, Arc<ArenaGrid>>,
    published: &'a RwLock<Published>,
}

impl ArenaWriter<'_> {
    /// Current working grid (may hold unpublished writes from a rejected command)
    pub fn grid(&self) -> &ArenaGrid {
        &self.working
    }

    /// Mutable working grid; clones it first if a reader still shares it
    pub fn grid_mut(&mut self) -> &mut ArenaGrid {
        Arc::make_mut(&mut *self.working)
    }

    pub fn set_cell(&mut self, x: usize, y: usize, value: CellValue) -> Result<(), BoundsError> {
        self.grid_mut().try_set_cell(x, y, value)
    }

    /// Make the working grid visible to readers.
    ///
    /// The writer lock stays held until the writer is dropped, so anything
    /// done with the returned snapshot before then is ordered by version.
    pub fn publish(&mut self) -> ArenaSnapshot {
        let mut published = self.published.write();
        published.grid = Arc::clone(&*self.working);
        published.version += 1;
        ArenaSnapshot {
            grid: published.grid.clone(),
            version: published.version,
        }
    }
}

/// Read-only, internally consistent view of the arena handed to renderers
#[derive(Debug, Clone)]
pub struct ArenaSnapshot {
    grid: Arc<ArenaGrid>,
    version: u64,
}

impl ArenaSnapshot {
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    /// Panics outside the snapshot's dimensions
    pub fn cell_at(&self, x: usize, y: usize) -> CellValue {
        self.grid.get_cell(x, y)
    }

    pub fn try_cell_at(&self, x: usize, y: usize) -> Result<CellValue, BoundsError> {
        self.grid.try_get_cell(x, y)
    }

    pub fn color_for(&self, snake_index: usize) -> Color {
        color::color_for(snake_index)
    }

    /// Publish counter this snapshot was taken at; later snapshots have larger versions
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn grid(&self) -> &ArenaGrid {
        &self.grid
    }
}

impl Deref for ArenaSnapshot {
    type Target = ArenaGrid;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_arena_is_empty() {
        let arena = SharedArena::new();
        assert_eq!(arena.dimensions(), (0, 0));
        assert_eq!(arena.version(), 0);
        assert!(arena.snapshot().is_empty());
    }

    #[test]
    fn test_resize_publishes_unknown_grid() {
        let arena = SharedArena::new();
        let snapshot = arena.resize(3, 2);
        assert_eq!(snapshot.dimensions(), (3, 2));
        assert_eq!(arena.dimensions(), (3, 2));
        assert_eq!(arena.get_cell(2, 1), CellValue::Unknown);
        assert_eq!(arena.version(), 1);
    }

    #[test]
    fn test_unpublished_writes_are_invisible() {
        let arena = SharedArena::new();
        arena.resize(2, 2);

        {
            let mut writer = arena.write();
            writer.set_cell(0, 0, CellValue::Wall).unwrap();
            assert_eq!(arena.get_cell(0, 0), CellValue::Unknown);
            // dropped without publishing
        }
        assert_eq!(arena.get_cell(0, 0), CellValue::Unknown);

        let mut writer = arena.write();
        assert_eq!(writer.grid().get_cell(0, 0), CellValue::Wall);
        writer.set_cell(1, 1, CellValue::Fruit).unwrap();
        writer.publish();
        assert_eq!(arena.get_cell(0, 0), CellValue::Wall);
        assert_eq!(arena.get_cell(1, 1), CellValue::Fruit);
    }

    #[test]
    fn test_held_snapshot_is_not_mutated() {
        let arena = SharedArena::new();
        arena.resize(2, 1);
        let before = arena.snapshot();

        let mut writer = arena.write();
        writer.set_cell(1, 0, CellValue::Empty).unwrap();
        let after = writer.publish();

        assert_eq!(before.cell_at(1, 0), CellValue::Unknown);
        assert_eq!(after.cell_at(1, 0), CellValue::Empty);
        assert!(after.version() > before.version());
    }

    #[test]
    fn test_snapshot_survives_resize() {
        let arena = SharedArena::new();
        arena.resize(4, 4);
        let mut writer = arena.write();
        writer.set_cell(3, 3, CellValue::Wall).unwrap();
        writer.publish();
        let old = arena.snapshot();

        arena.resize(1, 1);
        assert_eq!(old.dimensions(), (4, 4));
        assert_eq!(old.cell_at(3, 3), CellValue::Wall);
        assert_eq!(arena.dimensions(), (1, 1));
    }

    #[test]
    fn test_writer_out_of_bounds() {
        let arena = SharedArena::new();
        arena.resize(1, 1);
        let mut writer = arena.write();
        assert!(writer.set_cell(1, 0, CellValue::Wall).is_err());
    }

    #[test]
    fn test_snapshot_color_for() {
        let snapshot = SharedArena::new().snapshot();
        assert_eq!(snapshot.color_for(3), color::color_for(3));
    }

    #[test]
    fn test_readers_never_see_partial_commands() {
        let arena = Arc::new(SharedArena::new());
        arena.resize(8, 8);

        let writer_arena = arena.clone();
        let writer = thread::spawn(move || {
            for round in 0..200u32 {
                let value = if round % 2 == 0 {
                    CellValue::Wall
                } else {
                    CellValue::Empty
                };
                let mut writer = writer_arena.write();
                for x in 0..8 {
                    for y in 0..8 {
                        writer.set_cell(x, y, value).unwrap();
                    }
                }
                writer.publish();
            }
        });

        for _ in 0..500 {
            let snapshot = arena.snapshot();
            let first = snapshot.cell_at(0, 0);
            assert!(snapshot.iter().all(|(_, _, c)| c == first));
        }
        writer.join().unwrap();
    }
}
