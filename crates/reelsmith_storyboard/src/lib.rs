//! Storyboard parsing for reelsmith.
//!
//! A storyboard is a block of generated text divided into scenes by bold markers
//! such as `**Scene 1:**` or `**Babak 1:**`. Each scene carries labelled fields
//! (voiceover, captions) and free visual description. This crate splits the text into
//! [`SceneRecord`]s, derives the fields from each record's raw text, and rebuilds the
//! text when a scene is edited so the structured view and the text never diverge.
//!
//! # Example
//!
//! ```
//! use reelsmith_core::Language;
//! use reelsmith_storyboard::Storyboard;
//!
//! let text = "**Scene 1:**\nVoiceover: Hello\nCaptions: Hi!\nA dog runs.\n\n**Scene 2:**\nA cat sleeps.";
//! let mut storyboard = Storyboard::parse(text, Language::English, 4);
//!
//! let first = storyboard.scene(0).unwrap().fields();
//! assert_eq!(first.spoken_script(), "Hello");
//! assert_eq!(first.on_screen_caption(), "Hi!");
//! assert_eq!(first.visual_description(), "A dog runs.");
//!
//! storyboard.edit_scene(0, "A dog jumps.").unwrap();
//! assert_eq!(storyboard.scene(0).unwrap().visual_description(), "A dog jumps.");
//! assert_eq!(storyboard.scene(1).unwrap().raw_text(), "A cat sleeps.");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod grammar;
mod scene;
mod storyboard;

pub use grammar::{extract_fields, has_scene_markers, parse, strip_labels};
pub use scene::{SceneFields, SceneRecord, default_label};
pub use storyboard::Storyboard;
