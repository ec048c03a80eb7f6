//! Request and response types for the generation service.

use crate::MediaPayload;
use serde::{Deserialize, Serialize};

/// The call shapes the orchestrator issues.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum GenerationMode {
    /// Text-only generation (storyboard script)
    Text,
    /// Image composition conditioned on reference images
    ImageComposition,
    /// Image edit of an existing result
    ImageEdit,
    /// Video animated from an optional starting image
    Video,
}

/// Video aspect ratio.
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
pub enum AspectRatio {
    /// Vertical, 9:16
    #[default]
    #[strum(serialize = "9:16")]
    #[serde(rename = "9:16")]
    Portrait,
    /// Horizontal, 16:9
    #[strum(serialize = "16:9")]
    #[serde(rename = "16:9")]
    Landscape,
    /// Square, 1:1
    #[strum(serialize = "1:1")]
    #[serde(rename = "1:1")]
    Square,
}

/// Video resolution.
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
pub enum Resolution {
    /// 720p
    #[default]
    #[strum(serialize = "720p")]
    #[serde(rename = "720p")]
    Hd,
    /// 1080p
    #[strum(serialize = "1080p")]
    #[serde(rename = "1080p")]
    FullHd,
}

/// Extra parameters for the video call shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, derive_getters::Getters)]
pub struct VideoOptions {
    aspect_ratio: AspectRatio,
    resolution: Resolution,
    negative_prompt: Option<String>,
}

impl VideoOptions {
    /// Create video options.
    pub fn new(
        aspect_ratio: AspectRatio,
        resolution: Resolution,
        negative_prompt: Option<String>,
    ) -> Self {
        Self {
            aspect_ratio,
            resolution,
            negative_prompt,
        }
    }
}

/// A single generation call.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{GenerationMode, GenerationRequest, MediaPayload};
///
/// let request = GenerationRequest::builder()
///     .mode(GenerationMode::ImageComposition)
///     .prompt("A bottle on a marble counter")
///     .reference_media(vec![MediaPayload::new("image/png", vec![1, 2, 3])])
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.mode(), GenerationMode::ImageComposition);
/// assert!(request.video().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct GenerationRequest {
    /// Call shape
    mode: GenerationMode,
    /// Prompt text
    prompt: String,
    /// Reference images, starting frame, or the image being edited
    #[builder(default)]
    reference_media: Vec<MediaPayload>,
    /// Video parameters, for `GenerationMode::Video`
    #[builder(default)]
    video: Option<VideoOptions>,
}

impl GenerationRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }
}

/// One output produced by the service.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    /// Generated text
    Text(String),
    /// Generated image or video
    Media(MediaPayload),
}

/// The unified response object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationResponse {
    /// Outputs in the order the service produced them
    pub outputs: Vec<GenerationOutput>,
}

impl GenerationResponse {
    /// Response with a single text output.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            outputs: vec![GenerationOutput::Text(text.into())],
        }
    }

    /// Response with a single media output.
    pub fn media(payload: MediaPayload) -> Self {
        Self {
            outputs: vec![GenerationOutput::Media(payload)],
        }
    }

    /// First non-blank text output.
    pub fn first_text(&self) -> Option<&str> {
        self.outputs.iter().find_map(|output| match output {
            GenerationOutput::Text(text) if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        })
    }

    /// First non-empty media output.
    pub fn first_media(&self) -> Option<&MediaPayload> {
        self.outputs.iter().find_map(|output| match output {
            GenerationOutput::Media(media) if !media.is_empty() => Some(media),
            _ => None,
        })
    }
}
