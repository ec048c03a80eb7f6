//! Scene records and their derived fields.

use crate::extract_fields;
use derive_getters::Getters;
use reelsmith_core::Language;
use serde::{Deserialize, Serialize};

/// One scene of a storyboard, aligned 1:1 with a generation slot.
///
/// Only `raw_text` is stored. The spoken script, caption and visual description are
/// computed from it on every call, so an edited scene can never serve stale fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SceneRecord {
    /// Slot index this scene feeds
    index: usize,
    /// Marker text as it appeared in the storyboard, e.g. `**Scene 1: Hook**`
    label: String,
    /// The scene's source text, without the marker
    raw_text: String,
}

impl SceneRecord {
    /// Creates a scene record.
    pub fn new(index: usize, label: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            raw_text: raw_text.into(),
        }
    }

    /// Creates a scene record with the default label for `language`.
    pub fn with_default_label(index: usize, language: Language, raw_text: impl Into<String>) -> Self {
        Self::new(index, default_label(index, language), raw_text)
    }

    /// All derived fields at once.
    pub fn fields(&self) -> SceneFields {
        extract_fields(&self.raw_text)
    }

    /// Text to be spoken in the scene's video.
    pub fn spoken_script(&self) -> String {
        self.fields().spoken_script
    }

    /// Text to be shown on screen.
    pub fn on_screen_caption(&self) -> String {
        self.fields().on_screen_caption
    }

    /// Cleaned description of what the scene shows.
    pub fn visual_description(&self) -> String {
        self.fields().visual_description
    }
}

/// Fields derived from a scene's raw text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Getters)]
pub struct SceneFields {
    spoken_script: String,
    on_screen_caption: String,
    visual_description: String,
}

impl SceneFields {
    pub(crate) fn new(
        spoken_script: String,
        on_screen_caption: String,
        visual_description: String,
    ) -> Self {
        Self {
            spoken_script,
            on_screen_caption,
            visual_description,
        }
    }
}

/// Marker used when a scene has no label of its own: `**Scene 2:**`, `**Babak 2:**`.
///
/// ```
/// use reelsmith_core::Language;
/// use reelsmith_storyboard::default_label;
///
/// assert_eq!(default_label(1, Language::English), "**Scene 2:**");
/// assert_eq!(default_label(0, Language::BahasaMalaysia), "**Babak 1:**");
/// ```
pub fn default_label(index: usize, language: Language) -> String {
    format!("**{} {}:**", language.scene_word(), index + 1)
}
