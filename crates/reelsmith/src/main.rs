//! Reelsmith CLI binary.
//!
//! This binary provides command-line access to the offline parts of reelsmith:
//! - Inspect and edit storyboard files
//! - Show or clear the persisted session snapshot
//! - Print the effective configuration

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, edit_scene, handle_snapshot_command, show_config, show_scenes};

    // Pick up RUST_LOG and friends from a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    reelsmith::init_tracing(cli.verbose, cli.json_logs)?;

    match cli.command {
        Commands::Scenes {
            file,
            language,
            json,
        } => {
            show_scenes(&file, language.into(), json)?;
        }

        Commands::EditScene {
            file,
            scene,
            text,
            language,
            output,
        } => {
            edit_scene(&file, scene, &text, language.into(), output.as_deref())?;
        }

        Commands::Snapshot(snapshot_cmd) => {
            handle_snapshot_command(snapshot_cmd)?;
        }

        Commands::Config => {
            show_config()?;
        }
    }

    Ok(())
}
