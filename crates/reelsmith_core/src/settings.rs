//! Production settings: the user's creative direction for a session.

use crate::{AspectRatio, ConfigSnapshot, Resolution};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

/// Language used for storyboard labels, dialogue and on-screen text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Language {
    /// English
    #[default]
    English,
    /// Bahasa Malaysia
    #[strum(serialize = "Bahasa Malaysia")]
    #[serde(rename = "Bahasa Malaysia")]
    BahasaMalaysia,
    /// Chinese
    Chinese,
}

impl Language {
    /// Name used when instructing the video model which language to speak.
    pub fn spoken_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::BahasaMalaysia => "Malaysian Malay",
            Language::Chinese => "Mandarin Chinese",
        }
    }

    /// Word used in scene markers, `Scene` or `Babak`.
    pub fn scene_word(&self) -> &'static str {
        match self {
            Language::BahasaMalaysia => "Babak",
            Language::English | Language::Chinese => "Scene",
        }
    }
}

/// Creative direction for a production session.
///
/// Option values such as `"Random"` and `"None"` are carried as plain strings; the
/// option lists themselves belong to the presentation layer.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{Language, ProductionSettings};
///
/// let settings = ProductionSettings::default()
///     .with_product_description("Cold brew coffee".to_string())
///     .with_storyboard_language(Language::BahasaMalaysia);
///
/// let snapshot = settings.to_snapshot();
/// let mut restored = ProductionSettings::default();
/// restored.merge_snapshot(&snapshot);
/// assert_eq!(restored, settings);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct ProductionSettings {
    /// What is being reviewed or advertised
    product_description: String,
    /// Overall mood
    vibe: String,
    /// Background setting
    background_vibe: String,
    /// Lighting direction
    lighting: String,
    /// Kind of content (review, unboxing, ...)
    content_type: String,
    /// Language of the storyboard text
    storyboard_language: Language,
    /// Ask for on-screen captions
    include_captions: bool,
    /// Ask for a spoken voiceover
    include_voiceover: bool,
    /// Include a person, from the face reference image
    include_model: bool,
    /// Artistic style
    style: String,
    /// Camera framing
    camera: String,
    /// Composition rule
    composition: String,
    /// Lens type
    lens_type: String,
    /// Film simulation
    film_sim: String,
    /// Visual effect
    effect: String,
    /// Creativity slider, 0..=10
    creativity_level: u8,
    /// Video aspect ratio
    aspect_ratio: AspectRatio,
    /// Video resolution
    resolution: Resolution,
    /// Language spoken in the videos
    video_language: Language,
}

impl Default for ProductionSettings {
    fn default() -> Self {
        Self {
            product_description: String::new(),
            vibe: "None".to_string(),
            background_vibe: "None".to_string(),
            lighting: "Random".to_string(),
            content_type: "Random".to_string(),
            storyboard_language: Language::English,
            include_captions: false,
            include_voiceover: true,
            include_model: false,
            style: "Random".to_string(),
            camera: "Random".to_string(),
            composition: "Random".to_string(),
            lens_type: "Random".to_string(),
            film_sim: "Random".to_string(),
            effect: "None".to_string(),
            creativity_level: 5,
            aspect_ratio: AspectRatio::default(),
            resolution: Resolution::default(),
            video_language: Language::English,
        }
    }
}

/// Highest value of the creativity slider.
const MAX_CREATIVITY: u8 = 10;

impl ProductionSettings {
    /// Bounded snapshot of every field.
    ///
    /// A text field too large for a snapshot is left out.
    pub fn to_snapshot(&self) -> ConfigSnapshot {
        let mut snapshot = ConfigSnapshot::new();
        let texts = [
            ("product_description", self.product_description.clone()),
            ("vibe", self.vibe.clone()),
            ("background_vibe", self.background_vibe.clone()),
            ("lighting", self.lighting.clone()),
            ("content_type", self.content_type.clone()),
            ("storyboard_language", self.storyboard_language.to_string()),
            ("style", self.style.clone()),
            ("camera", self.camera.clone()),
            ("composition", self.composition.clone()),
            ("lens_type", self.lens_type.clone()),
            ("film_sim", self.film_sim.clone()),
            ("effect", self.effect.clone()),
            ("aspect_ratio", self.aspect_ratio.to_string()),
            ("resolution", self.resolution.to_string()),
            ("video_language", self.video_language.to_string()),
        ];
        for (key, value) in texts {
            if let Err(e) = snapshot.insert_text(key, value) {
                warn!(key, error = %e, "Leaving field out of snapshot");
            }
        }
        snapshot.insert_flag("include_captions", self.include_captions);
        snapshot.insert_flag("include_voiceover", self.include_voiceover);
        snapshot.insert_flag("include_model", self.include_model);
        snapshot.insert_integer("creativity_level", i64::from(self.creativity_level));
        snapshot
    }

    /// Overwrite fields present and well-formed in `snapshot`.
    ///
    /// Missing, mistyped or out-of-range fields keep their current value.
    pub fn merge_snapshot(&mut self, snapshot: &ConfigSnapshot) {
        let text = |key: &str| snapshot.get(key).and_then(|v| v.as_text()).map(str::to_string);
        let flag = |key: &str| snapshot.get(key).and_then(|v| v.as_flag());

        merge_field(&mut self.product_description, text("product_description"));
        merge_field(&mut self.vibe, text("vibe"));
        merge_field(&mut self.background_vibe, text("background_vibe"));
        merge_field(&mut self.lighting, text("lighting"));
        merge_field(&mut self.content_type, text("content_type"));
        merge_field(&mut self.style, text("style"));
        merge_field(&mut self.camera, text("camera"));
        merge_field(&mut self.composition, text("composition"));
        merge_field(&mut self.lens_type, text("lens_type"));
        merge_field(&mut self.film_sim, text("film_sim"));
        merge_field(&mut self.effect, text("effect"));
        merge_field(&mut self.storyboard_language, parsed(snapshot, "storyboard_language"));
        merge_field(&mut self.aspect_ratio, parsed(snapshot, "aspect_ratio"));
        merge_field(&mut self.resolution, parsed(snapshot, "resolution"));
        merge_field(&mut self.include_captions, flag("include_captions"));
        merge_field(&mut self.include_voiceover, flag("include_voiceover"));
        merge_field(&mut self.include_model, flag("include_model"));
        merge_field(
            &mut self.creativity_level,
            snapshot
                .get("creativity_level")
                .and_then(|v| v.as_integer())
                .and_then(|level| u8::try_from(level).ok())
                .filter(|level| *level <= MAX_CREATIVITY),
        );

        // Older snapshots have no video language; follow the storyboard language.
        match parsed(snapshot, "video_language") {
            Some(language) => self.video_language = language,
            None => {
                if let Some(language) = parsed(snapshot, "storyboard_language") {
                    self.video_language = language;
                }
            }
        }
        debug!(fields = snapshot.len(), "Merged settings snapshot");
    }
}

fn merge_field<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn parsed<T: FromStr>(snapshot: &ConfigSnapshot, key: &str) -> Option<T> {
    snapshot
        .get(key)
        .and_then(|v| v.as_text())
        .and_then(|text| text.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_leaves_missing_and_malformed_fields_alone() {
        let mut snapshot = ConfigSnapshot::new();
        snapshot.insert_text("vibe", "Energetic & Fun").unwrap();
        snapshot.insert_text("aspect_ratio", "4:3").unwrap();
        snapshot.insert_integer("creativity_level", 42);
        snapshot.insert_integer("include_model", 1);

        let mut settings = ProductionSettings::default();
        settings.merge_snapshot(&snapshot);

        assert_eq!(settings.vibe(), "Energetic & Fun");
        assert_eq!(*settings.aspect_ratio(), AspectRatio::Portrait);
        assert_eq!(*settings.creativity_level(), 5);
        assert!(!settings.include_model());
    }

    #[test]
    fn video_language_falls_back_to_storyboard_language() {
        let mut snapshot = ConfigSnapshot::new();
        snapshot.insert_text("storyboard_language", "Bahasa Malaysia").unwrap();

        let mut settings = ProductionSettings::default();
        settings.merge_snapshot(&snapshot);

        assert_eq!(*settings.video_language(), Language::BahasaMalaysia);
    }
}
