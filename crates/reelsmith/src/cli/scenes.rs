//! Storyboard file command handlers.

use reelsmith::{
    Language, PersistenceError, PersistenceErrorKind, PipelineConfig, ReelsmithResult,
    SceneFields, Storyboard, ValidationError,
};
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

/// One scene as printed by `reelsmith scenes --json`.
#[derive(Debug, Serialize)]
struct SceneSummary<'a> {
    number: usize,
    label: &'a str,
    #[serde(flatten)]
    fields: SceneFields,
}

fn read_storyboard(file: &Path, language: Language) -> ReelsmithResult<Storyboard> {
    let text = std::fs::read_to_string(file).map_err(|e| {
        PersistenceError::new(PersistenceErrorKind::Read(format!(
            "{}: {}",
            file.display(),
            e
        )))
    })?;
    let config = PipelineConfig::load()?;
    Ok(Storyboard::parse(text, language, *config.slot_count()))
}

/// Human-readable listing of every scene.
fn render_scenes(storyboard: &Storyboard) -> String {
    let mut out = String::new();
    for scene in storyboard.scenes() {
        let fields = scene.fields();
        out.push_str(&format!("{}\n", scene.label()));
        if !fields.spoken_script().is_empty() {
            out.push_str(&format!("  Voiceover: {}\n", fields.spoken_script()));
        }
        if !fields.on_screen_caption().is_empty() {
            out.push_str(&format!("  Caption:   {}\n", fields.on_screen_caption()));
        }
        out.push_str(&format!("  Visual:    {}\n", fields.visual_description()));
    }
    out.push_str(&format!("Total: {} scenes\n", storyboard.len()));
    out
}

fn scenes_json(storyboard: &Storyboard) -> ReelsmithResult<String> {
    let summaries: Vec<SceneSummary<'_>> = storyboard
        .scenes()
        .iter()
        .map(|scene| SceneSummary {
            number: scene.index() + 1,
            label: scene.label(),
            fields: scene.fields(),
        })
        .collect();
    serde_json::to_string_pretty(&summaries)
        .map_err(|e| PersistenceError::new(PersistenceErrorKind::Serialize(e.to_string())).into())
}

/// Parse `file` and print its scenes.
#[instrument(skip(file), fields(file = %file.display()))]
pub fn show_scenes(file: &Path, language: Language, json: bool) -> ReelsmithResult<()> {
    let storyboard = read_storyboard(file, language)?;
    if !storyboard.is_structured() {
        warn!("No scene markers found");
    }

    if json {
        println!("{}", scenes_json(&storyboard)?);
    } else {
        print!("{}", render_scenes(&storyboard));
    }
    Ok(())
}

/// Replace scene `scene` (1-based) in `file` and write the rebuilt text.
#[instrument(skip(file, text, output), fields(file = %file.display()))]
pub fn edit_scene(
    file: &Path,
    scene: usize,
    text: &str,
    language: Language,
    output: Option<&Path>,
) -> ReelsmithResult<()> {
    let index = scene
        .checked_sub(1)
        .ok_or_else(|| ValidationError::new("Scene numbers start at 1"))?;
    let mut storyboard = read_storyboard(file, language)?;
    storyboard.edit_scene(index, text)?;

    let target = output.unwrap_or(file);
    std::fs::write(target, storyboard.text()).map_err(|e| {
        PersistenceError::new(PersistenceErrorKind::Write(format!(
            "{}: {}",
            target.display(),
            e
        )))
    })?;
    info!(scene, target = %target.display(), "Storyboard rewritten");
    Ok(())
}
