//! Session snapshot command handlers.

use super::commands::SnapshotCommands;
use reelsmith::{
    ConfigSnapshot, FileSnapshotStore, PipelineConfig, ReelsmithResult, SnapshotAdapter,
    SnapshotValue, summarize,
};
use std::sync::Arc;

/// Handle session snapshot commands.
pub fn handle_snapshot_command(cmd: SnapshotCommands) -> ReelsmithResult<()> {
    let config = PipelineConfig::load()?;
    let dir = config.resolved_snapshot_dir();
    let store = FileSnapshotStore::new(&dir, *config.max_snapshot_bytes())?;
    let adapter = SnapshotAdapter::new(Arc::new(store), config.snapshot_key().clone());

    match cmd {
        SnapshotCommands::Show => match adapter.load() {
            Some(snapshot) => print!("{}", render_snapshot(&snapshot)),
            None => println!("No snapshot stored in {}", dir.display()),
        },
        SnapshotCommands::Clear => {
            adapter.clear();
            println!("Cleared snapshot '{}'", adapter.key());
        }
    }
    Ok(())
}

/// Text longer than this is shortened for display.
const LONG_TEXT_CHARS: usize = 60;

/// One `key = value` line per field; long text is shortened.
fn render_snapshot(snapshot: &ConfigSnapshot) -> String {
    let mut out = String::new();
    for (key, value) in snapshot.iter() {
        let value = match value {
            SnapshotValue::Flag(flag) => flag.to_string(),
            SnapshotValue::Integer(integer) => integer.to_string(),
            SnapshotValue::Number(number) => number.to_string(),
            SnapshotValue::Text(text) if text.as_str().chars().count() > LONG_TEXT_CHARS => {
                format!("{:?}", summarize("", text.as_str()))
            }
            SnapshotValue::Text(text) => format!("{:?}", text.as_str()),
        };
        out.push_str(&format!("{key} = {value}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_snapshot() {
        let mut snapshot = ConfigSnapshot::new();
        snapshot.insert_flag("include_captions", true);
        snapshot.insert_integer("creativity_level", 7);
        snapshot.insert_text("vibe", "Calm").unwrap();

        assert_eq!(
            render_snapshot(&snapshot),
            "creativity_level = 7\ninclude_captions = true\nvibe = \"Calm\"\n"
        );

        snapshot.insert_text("storyboard", "x".repeat(200)).unwrap();
        let rendered = render_snapshot(&snapshot);
        assert!(rendered.contains(&format!("storyboard = \"{}...\"", "x".repeat(50))));
    }
}
