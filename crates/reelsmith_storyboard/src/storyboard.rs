//! Storyboard text kept in sync with its scene records.

use crate::grammar::{has_scene_markers, split};
use crate::{SceneRecord, default_label};
use derive_getters::Getters;
use reelsmith_core::Language;
use reelsmith_error::{ParseError, ParseErrorKind, ReelsmithResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A storyboard and the scenes derived from it.
///
/// The text is the serialized form; `scenes` is always the result of parsing it.
/// Edits go through [`Storyboard::edit_scene`], which rebuilds the text and
/// re-parses, so the two never diverge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Storyboard {
    /// Full storyboard text
    text: String,
    /// Text before the first scene marker
    preamble: String,
    /// Parsed scenes, at most `capacity`
    scenes: Vec<SceneRecord>,
    /// Language used for synthesized labels
    language: Language,
    /// Maximum number of scenes kept
    capacity: usize,
}

impl Storyboard {
    /// Parse storyboard text, keeping at most `capacity` scenes.
    ///
    /// Text without scene markers yields a storyboard with no scenes.
    #[instrument(skip(text))]
    pub fn parse(text: impl Into<String>, language: Language, capacity: usize) -> Self {
        let text = text.into();
        let (preamble, scenes) = split(&text, capacity);
        let preamble = if scenes.is_empty() {
            String::new()
        } else {
            preamble.to_string()
        };
        debug!(scenes = scenes.len(), "Parsed storyboard");

        Self {
            text,
            preamble,
            scenes,
            language,
            capacity,
        }
    }

    /// Parse storyboard text, failing when it has no scene marker.
    ///
    /// # Errors
    ///
    /// Returns `ParseErrorKind::NoSceneMarkers` when no scene could be found.
    pub fn parse_strict(
        text: impl Into<String>,
        language: Language,
        capacity: usize,
    ) -> ReelsmithResult<Self> {
        let storyboard = Self::parse(text, language, capacity);
        if storyboard.scenes.is_empty() {
            return Err(ParseError::new(ParseErrorKind::NoSceneMarkers).into());
        }
        Ok(storyboard)
    }

    /// Build a storyboard from scene texts, with default labels.
    pub fn from_scenes<S: AsRef<str>>(scenes: &[S], language: Language, capacity: usize) -> Self {
        let records: Vec<SceneRecord> = scenes
            .iter()
            .take(capacity)
            .enumerate()
            .map(|(index, text)| SceneRecord::with_default_label(index, language, text.as_ref()))
            .collect();
        Self::parse(render("", &records, language), language, capacity)
    }

    /// True when at least one scene was found.
    pub fn is_structured(&self) -> bool {
        !self.scenes.is_empty()
    }

    /// Scene at `index`, if present.
    pub fn scene(&self, index: usize) -> Option<&SceneRecord> {
        self.scenes.get(index)
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// True when there are no scenes.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Replace the raw text of scene `index`, then rebuild and re-parse the storyboard.
    ///
    /// Existing markers are kept as written. The preamble is kept verbatim. Scenes
    /// beyond `capacity` were never parsed and do not survive the rebuild.
    ///
    /// # Errors
    ///
    /// Returns `ParseErrorKind::SceneOutOfRange` when there is no scene `index`, and
    /// `ParseErrorKind::MarkerInSceneText` when the new text carries a scene marker,
    /// which would split it into extra scenes. The storyboard is unchanged on error.
    #[instrument(skip(self, raw_text))]
    pub fn edit_scene(&mut self, index: usize, raw_text: impl Into<String>) -> ReelsmithResult<()> {
        if index >= self.scenes.len() {
            return Err(ParseError::new(ParseErrorKind::SceneOutOfRange {
                index,
                count: self.scenes.len(),
            })
            .into());
        }
        let raw_text = raw_text.into();
        let marker_error = || ParseError::new(ParseErrorKind::MarkerInSceneText { scene: index + 1 });
        if has_scene_markers(&raw_text) {
            return Err(marker_error().into());
        }

        let mut scenes = self.scenes.clone();
        scenes[index] = SceneRecord::new(index, scenes[index].label().clone(), raw_text);

        let text = render(&self.preamble, &scenes, self.language);
        let rebuilt = Self::parse(text, self.language, self.capacity);
        if rebuilt.scenes.len() != self.scenes.len() {
            return Err(marker_error().into());
        }
        *self = rebuilt;
        debug!(scenes = self.scenes.len(), "Rebuilt storyboard after edit");
        Ok(())
    }
}

/// Serialize scenes back into storyboard text.
fn render(preamble: &str, scenes: &[SceneRecord], language: Language) -> String {
    let body = scenes
        .iter()
        .enumerate()
        .map(|(index, scene)| {
            let label = if scene.label().trim().is_empty() {
                default_label(index, language)
            } else {
                scene.label().clone()
            };
            format!("{}\n{}", label, scene.raw_text())
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let preamble = preamble.trim_end();
    if preamble.is_empty() {
        body
    } else {
        format!("{preamble}\n\n{body}")
    }
}
