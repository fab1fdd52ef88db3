pub mod cell;
pub mod color;
pub mod decoder;
pub mod grid;
pub mod shared;
