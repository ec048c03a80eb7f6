//! Storyboard parse error types.

/// Specific error conditions for storyboard parsing and editing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ParseErrorKind {
    /// The text contains no scene marker at all
    #[display("No scene markers found; expected '**Scene 1:**' or '**Babak 1:**'")]
    NoSceneMarkers,
    /// A scene edit targeted a scene that does not exist
    #[display("Scene {} does not exist (storyboard has {} scenes)", index, count)]
    SceneOutOfRange {
        /// Requested scene index
        index: usize,
        /// Number of scenes in the storyboard
        count: usize,
    },
    /// Replacement scene text contains a scene marker of its own
    #[display("Text for scene {} contains a scene marker; remove it and try again", scene)]
    MarkerInSceneText {
        /// 1-based scene number
        scene: usize,
    },
}

/// Error type for storyboard parsing.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ParseError, ParseErrorKind};
///
/// let err = ParseError::new(ParseErrorKind::NoSceneMarkers);
/// assert!(format!("{}", err).contains("No scene markers"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Parse Error: {} at line {} in {}", kind, line, file)]
pub struct ParseError {
    /// The specific error condition
    pub kind: ParseErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ParseError {
    /// Create a new ParseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ParseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
