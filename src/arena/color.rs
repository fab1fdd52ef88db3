//! Snake and cell colors
//!
//! The first [`PALETTE_SIZE`] snakes get hand-picked colors; later snakes get
//! a generated hue so `color_for` never runs out.

use std::fmt::{self, Display, Formatter};

use super::cell::CellValue;
use crate::constants::arena::PALETTE_SIZE;
use crate::constants::hue;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const DARK_GREY: Color = Color::rgb(0x40, 0x40, 0x40);
    pub const LIGHT_GREY: Color = Color::rgb(0xD3, 0xD3, 0xD3);
    pub const MAGENTA: Color = Color::rgb(0xFF, 0x00, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert hue (degrees), saturation and brightness (0..=1) to RGB
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = brightness.clamp(0.0, 1.0);

        let chroma = v * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = v - chroma;
        let channel = |c: f64| ((c + m) * 255.0).round() as u8;
        Self::rgb(channel(r), channel(g), channel(b))
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fixed snake colors, indexed by snake number
const SNAKE_PALETTE: [Color; PALETTE_SIZE] = [
    Color::rgb(0x00, 0x00, 0xFF), // blue
    Color::rgb(0xFF, 0x00, 0x00), // red
    Color::rgb(0x00, 0x80, 0x00), // green
    Color::rgb(0xFF, 0xFF, 0x00), // yellow
    Color::rgb(0xFF, 0xA5, 0x00), // orange
    Color::rgb(0x80, 0x00, 0x80), // purple
    Color::rgb(0x1E, 0x90, 0xFF), // dodger blue
    Color::rgb(0x4B, 0x00, 0x82), // indigo
    Color::rgb(0x00, 0xFF, 0xFF), // aqua
    Color::rgb(0x8B, 0x00, 0x00), // dark red
    Color::rgb(0x00, 0x00, 0x8B), // dark blue
    Color::rgb(0x00, 0x64, 0x00), // dark green
    Color::rgb(0xFF, 0x8C, 0x00), // dark orange
    Color::rgb(0x99, 0x32, 0xCC), // dark orchid
    Color::rgb(0xFF, 0xD7, 0x00), // gold
    Color::rgb(0xCD, 0x85, 0x3F), // peru
    Color::rgb(0x00, 0x80, 0x80), // teal
    Color::rgb(0x9A, 0xCD, 0x32), // yellow green
];

/// Color of the snake with the given index. Total and deterministic.
pub fn color_for(snake_index: usize) -> Color {
    match SNAKE_PALETTE.get(snake_index) {
        Some(color) => *color,
        None => {
            let degrees = (snake_index % 360) * hue::STEP_DEGREES % 360;
            Color::from_hsb(degrees as f64, hue::SATURATION, hue::BRIGHTNESS)
        }
    }
}

/// Maps cell values to display colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPalette {
    /// Color of empty cells
    pub background: Color,
}

impl Default for CellPalette {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
        }
    }
}

impl CellPalette {
    pub fn new(background: Color) -> Self {
        Self { background }
    }

    pub fn cell_color(&self, cell: CellValue) -> Color {
        match cell {
            CellValue::Unknown => Color::DARK_GREY,
            CellValue::Empty => self.background,
            CellValue::Wall => Color::LIGHT_GREY,
            CellValue::Fruit => Color::MAGENTA,
            CellValue::SnakeSegment(index) => color_for(usize::from(index)),
        }
    }
}
