/// Wire protocol constants
pub mod net {
    /// Maximum framed message size (a full DISPLAY of the largest allowed arena fits)
    pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;
    /// Bytes of the little-endian `u32` length in front of every frame
    pub const LENGTH_PREFIX_SIZE: usize = 4;
    /// DISPLAY payload bytes besides the cells: tag plus `u64` cell count
    pub const DISPLAY_HEADER_SIZE: usize = 1 + 8;
    /// Default server port
    pub const DEFAULT_PORT: u16 = 5555;

    /// Command tags (first byte of every frame payload)
    pub mod tag {
        /// Server asks the client to repeat a command
        pub const ERR: u8 = 0;
        /// Resize/reinitialize the arena
        pub const ARENA_CONFIG: u8 = 1;
        /// Full arena contents, column-major
        pub const ARENA_DISPLAY: u8 = 2;
    }
}

/// Arena model constants
pub mod arena {
    /// Wire byte of the first snake segment; snake index = byte - SNAKE_BASE
    pub const SNAKE_BASE: u8 = 4;
    /// Largest snake index a single wire byte can carry
    pub const MAX_SNAKE_INDEX: u8 = u8::MAX - SNAKE_BASE;
    /// Number of hand-picked snake colors before falling back to generated hues
    pub const PALETTE_SIZE: usize = 18;
    /// Default upper bound on width * height accepted from the server
    pub const DEFAULT_MAX_CELLS: usize = 4 * 1024 * 1024;
}

/// Snake hue generation for indices past the fixed palette
pub mod hue {
    /// Hue step in degrees; coprime with 360 so 360 consecutive indices get distinct hues
    pub const STEP_DEGREES: usize = 137;
    pub const SATURATION: f64 = 0.5;
    pub const BRIGHTNESS: f64 = 1.0;
}
