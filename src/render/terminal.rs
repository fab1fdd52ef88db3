//! ANSI truecolor renderer
//!
//! Each cell is drawn as two spaces with a 24-bit background color, rows top
//! to bottom. Every frame starts by homing the cursor so frames overwrite each
//! other in place.

use std::io::{self, Write};

use tracing::warn;

use super::Renderer;
use crate::arena::color::CellPalette;
use crate::arena::shared::ArenaSnapshot;

const CURSOR_HOME: &str = "\x1b[H";
const RESET: &str = "\x1b[0m";

pub struct TerminalRenderer<W: Write> {
    out: W,
    palette: CellPalette,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(palette: CellPalette) -> Self {
        Self::new(io::stdout(), palette)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, palette: CellPalette) -> Self {
        Self { out, palette }
    }

    /// Draw one frame
    pub fn draw(&mut self, snapshot: &ArenaSnapshot) -> io::Result<()> {
        let (width, height) = snapshot.dimensions();
        let mut frame = String::with_capacity(CURSOR_HOME.len() + width * height * 24);
        frame.push_str(CURSOR_HOME);

        for y in 0..height {
            for x in 0..width {
                let color = self.palette.cell_color(snapshot.cell_at(x, y));
                frame.push_str(&format!("\x1b[48;2;{};{};{}m  ", color.r, color.g, color.b));
            }
            frame.push_str(RESET);
            frame.push('\n');
        }

        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> Renderer for TerminalRenderer<W> {
    fn render(&mut self, snapshot: &ArenaSnapshot) {
        if let Err(e) = self.draw(snapshot) {
            warn!("Failed to draw arena frame: {}", e);
        }
    }
}
