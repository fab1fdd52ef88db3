//! Snake Arena Client Library
//!
//! Keeps a local copy of a multiplayer snake arena in sync with the server.
//! A transport task decodes server commands into a shared grid; render
//! threads receive a consistent snapshot after every applied display update.

pub mod arena;
pub mod config;
pub mod constants;
pub mod metrics;
pub mod net;
pub mod render;
pub mod session;
