//! Cell kinds and their wire bytes

use std::fmt::{self, Display, Formatter};

use crate::constants::arena::{MAX_SNAKE_INDEX, SNAKE_BASE};

/// Wire bytes for the fixed cell kinds
const UNKNOWN: u8 = 0;
const EMPTY: u8 = 1;
const WALL: u8 = 2;
const FRUIT: u8 = 3;

/// What occupies one arena cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CellValue {
    /// No data received yet, or bad data for this cell
    #[default]
    Unknown,
    Empty,
    Wall,
    Fruit,
    /// Segment of the snake with the given index
    SnakeSegment(u8),
}

impl CellValue {
    /// Decode a wire byte. Every byte is valid.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            UNKNOWN => Self::Unknown,
            EMPTY => Self::Empty,
            WALL => Self::Wall,
            FRUIT => Self::Fruit,
            b => Self::SnakeSegment(b - SNAKE_BASE),
        }
    }

    /// Encode to a wire byte.
    ///
    /// Returns `None` for snake indices above [`MAX_SNAKE_INDEX`], which no
    /// single byte can carry.
    pub fn to_byte(self) -> Option<u8> {
        match self {
            Self::Unknown => Some(UNKNOWN),
            Self::Empty => Some(EMPTY),
            Self::Wall => Some(WALL),
            Self::Fruit => Some(FRUIT),
            Self::SnakeSegment(index) if index <= MAX_SNAKE_INDEX => Some(index + SNAKE_BASE),
            Self::SnakeSegment(_) => None,
        }
    }

    pub fn is_snake(self) -> bool {
        matches!(self, Self::SnakeSegment(_))
    }

    pub fn snake_index(self) -> Option<u8> {
        match self {
            Self::SnakeSegment(index) => Some(index),
            _ => None,
        }
    }
}

impl From<u8> for CellValue {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "?"),
            Self::Empty => write!(f, "."),
            Self::Wall => write!(f, "#"),
            Self::Fruit => write!(f, "*"),
            Self::SnakeSegment(index) => {
                // base-36 digit, wraps for large indices
                let glyph = char::from_digit(u32::from(*index) % 36, 36).unwrap_or('s');
                write!(f, "{}", glyph)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_kinds_decode() {
        assert_eq!(CellValue::from_byte(0), CellValue::Unknown);
        assert_eq!(CellValue::from_byte(1), CellValue::Empty);
        assert_eq!(CellValue::from_byte(2), CellValue::Wall);
        assert_eq!(CellValue::from_byte(3), CellValue::Fruit);
    }

    #[test]
    fn test_snake_bytes_decode() {
        assert_eq!(CellValue::from_byte(4), CellValue::SnakeSegment(0));
        assert_eq!(CellValue::from_byte(5), CellValue::SnakeSegment(1));
        assert_eq!(CellValue::from_byte(255), CellValue::SnakeSegment(251));
    }

    #[test]
    fn test_every_byte_decodes_and_encodes_back() {
        for byte in 0..=u8::MAX {
            let cell = CellValue::from_byte(byte);
            assert_eq!(cell.to_byte(), Some(byte), "byte {} did not survive", byte);
            assert_eq!(cell.is_snake(), byte >= 4);
        }
    }

    #[test]
    fn test_unrepresentable_snake_index() {
        assert_eq!(CellValue::SnakeSegment(MAX_SNAKE_INDEX).to_byte(), Some(255));
        assert_eq!(CellValue::SnakeSegment(252).to_byte(), None);
    }

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(CellValue::default(), CellValue::Unknown);
        assert_eq!(CellValue::from(1u8), CellValue::Empty);
    }

    #[test]
    fn test_display_glyphs() {
        let row: String = [0u8, 1, 2, 3, 4, 14]
            .iter()
            .map(|b| CellValue::from_byte(*b).to_string())
            .collect();
        assert_eq!(row, "?.#*0a");
    }
}
