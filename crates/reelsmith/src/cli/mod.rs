//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the reelsmith binary.

mod commands;
mod config;
mod scenes;
mod snapshot;

pub use commands::{Cli, Commands};
pub use config::show_config;
pub use scenes::{edit_scene, show_scenes};
pub use snapshot::handle_snapshot_command;
