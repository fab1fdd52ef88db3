use std::net::{IpAddr, Ipv4Addr};

use crate::arena::color::Color;
use crate::constants::arena::DEFAULT_MAX_CELLS;
use crate::constants::net::{DEFAULT_PORT, DISPLAY_HEADER_SIZE, MAX_MESSAGE_SIZE};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Address of the arena server
    pub server_address: IpAddr,
    /// Port of the arena server
    pub port: u16,
    /// Largest arena (width * height) accepted from the server
    pub max_arena_cells: usize,
    /// Color drawn for empty cells
    pub background: Color,
    /// Draw frames to the terminal (otherwise frames are only logged)
    pub render_terminal: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            max_arena_cells: DEFAULT_MAX_CELLS,
            background: Color::BLACK,
            render_terminal: true,
        }
    }
}

impl ClientConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("SERVER_ADDRESS") {
            if let Ok(parsed) = addr.parse() {
                config.server_address = parsed;
            } else {
                tracing::warn!("Invalid SERVER_ADDRESS '{}', using default", addr);
            }
        }

        if let Ok(port) = std::env::var("SERVER_PORT") {
            if let Ok(parsed) = port.parse::<u16>() {
                if parsed > 0 {
                    config.port = parsed;
                } else {
                    tracing::warn!("SERVER_PORT must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid SERVER_PORT '{}', using default", port);
            }
        }

        if let Ok(max_cells) = std::env::var("MAX_ARENA_CELLS") {
            match max_cells.parse::<usize>() {
                Ok(parsed) if parsed > 0 => config.max_arena_cells = parsed,
                _ => tracing::warn!("Invalid MAX_ARENA_CELLS '{}', using default", max_cells),
            }
        }

        if let Ok(background) = std::env::var("ARENA_BACKGROUND") {
            if let Some(parsed) = Color::from_hex(&background) {
                config.background = parsed;
            } else {
                tracing::warn!("Invalid ARENA_BACKGROUND '{}', using default", background);
            }
        }

        if let Ok(render) = std::env::var("RENDER_TERMINAL") {
            match render.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => config.render_terminal = true,
                "0" | "false" | "no" => config.render_terminal = false,
                _ => tracing::warn!("Invalid RENDER_TERMINAL '{}', using default", render),
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port cannot be 0".to_string());
        }
        if self.max_arena_cells == 0 {
            return Err("max_arena_cells must be at least 1".to_string());
        }
        // A full DISPLAY of the largest arena must fit in one frame
        let max_cells = MAX_MESSAGE_SIZE - DISPLAY_HEADER_SIZE;
        if self.max_arena_cells > max_cells {
            return Err(format!(
                "max_arena_cells {} exceeds the {} cells one frame can carry",
                self.max_arena_cells, max_cells
            ));
        }
        Ok(())
    }
}
