//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use reelsmith::Language;
use std::path::PathBuf;

/// Reelsmith - storyboard-driven image and video generation
#[derive(Parser, Debug)]
#[command(name = "reelsmith")]
#[command(about = "Inspect storyboards, session snapshots and configuration", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a storyboard file and print its scenes
    Scenes {
        /// Path to the storyboard text
        file: PathBuf,

        /// Storyboard language
        #[arg(long, value_enum, default_value = "english")]
        language: LanguageArg,

        /// Print scenes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the text of one scene and write the rebuilt storyboard
    EditScene {
        /// Path to the storyboard text
        file: PathBuf,

        /// Scene number, starting at 1
        scene: usize,

        /// New scene text
        text: String,

        /// Storyboard language
        #[arg(long, value_enum, default_value = "english")]
        language: LanguageArg,

        /// Write here instead of back to FILE
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Session snapshot commands
    #[command(subcommand)]
    Snapshot(SnapshotCommands),

    /// Print the effective configuration
    Config,
}

/// Session snapshot subcommands
#[derive(Subcommand, Debug)]
pub enum SnapshotCommands {
    /// Print the stored snapshot
    Show,

    /// Delete the stored snapshot
    Clear,
}

/// Storyboard language options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LanguageArg {
    /// English
    English,
    /// Bahasa Malaysia
    Malay,
    /// Chinese
    Chinese,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::English => Language::English,
            LanguageArg::Malay => Language::BahasaMalaysia,
            LanguageArg::Chinese => Language::Chinese,
        }
    }
}
