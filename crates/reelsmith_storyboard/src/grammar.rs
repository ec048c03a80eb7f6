//! The storyboard label grammar.
//!
//! Scene markers are bold spans `**Scene <n>:**` or `**Babak <n>:**`, matched
//! case-insensitively, optionally carrying a title before the closing `**`.
//!
//! Field labels come in two forms:
//!
//! - bold, `**Voiceover:**`, whose value runs until the next line beginning with
//!   `**`, the next bold label, the next plain field label, or the end of the text;
//! - plain, `Voiceover:` at the start of a line (optionally after a list bullet), whose
//!   value runs to the end of that line.
//!
//! Spoken script labels are `Voiceover` and `Skrip Suara Latar`; caption labels are
//! `Caption`, `Captions` and `Kapsyen`.

use crate::{SceneFields, SceneRecord};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::debug;

static SCENE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*[ \t]*(?:scene|babak)[ \t]+\d+[ \t]*:[^*\n]*\*\*")
        .expect("valid scene marker regex")
});

static BOLD_SPOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*[ \t]*(?:voiceover|skrip suara latar)[ \t]*:[ \t]*\*\*")
        .expect("valid bold voiceover regex")
});

static BOLD_CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*[ \t]*(?:captions?|kapsyen)[ \t]*:[ \t]*\*\*")
        .expect("valid bold caption regex")
});

static PLAIN_SPOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:[-*•][ \t]+)?(?:voiceover|skrip suara latar)[ \t]*:")
        .expect("valid plain voiceover regex")
});

static PLAIN_CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:[-*•][ \t]+)?(?:captions?|kapsyen)[ \t]*:")
        .expect("valid plain caption regex")
});

// Where a bold field value stops.
static BOLD_FIELD_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*\*\*|\*\*[^*\n]*:[ \t]*\*\*|^[ \t]*(?:[-*•][ \t]+)?(?:voiceover|skrip suara latar|captions?|kapsyen)[ \t]*:",
    )
    .expect("valid field end regex")
});

static BOLD_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*[^*\n]*:[ \t]*\*\*").expect("valid bold label regex")
});

static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-*•][ \t]+)+").expect("valid bullet regex")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Spoken,
    Caption,
}

/// A labelled field occurrence: `span` covers label and value, `value` the value only.
#[derive(Debug, Clone)]
struct FieldSpan {
    field: Field,
    span: Range<usize>,
    value: Range<usize>,
}

/// True when `text` contains at least one scene marker.
pub fn has_scene_markers(text: &str) -> bool {
    SCENE_MARKER.is_match(text)
}

/// Split storyboard text into at most `capacity` scene records.
///
/// Returns an empty vector when the text has no scene marker; the caller decides
/// whether that is an error.
pub fn parse(text: &str, capacity: usize) -> Vec<SceneRecord> {
    split(text, capacity).1
}

/// Split storyboard text into the preamble before the first marker and the scenes.
pub(crate) fn split(text: &str, capacity: usize) -> (&str, Vec<SceneRecord>) {
    let markers: Vec<_> = SCENE_MARKER.find_iter(text).collect();
    let Some(first) = markers.first() else {
        debug!("No scene markers found");
        return (text, Vec::new());
    };

    let preamble = &text[..first.start()];
    let scenes: Vec<SceneRecord> = markers
        .iter()
        .enumerate()
        .take(capacity)
        .map(|(index, marker)| {
            let end = markers
                .get(index + 1)
                .map(|next| next.start())
                .unwrap_or(text.len());
            SceneRecord::new(index, marker.as_str(), text[marker.end()..end].trim())
        })
        .collect();

    if markers.len() > capacity {
        debug!(
            found = markers.len(),
            kept = capacity,
            "Discarding scenes beyond slot capacity"
        );
    }

    (preamble, scenes)
}

/// Derive the spoken script, caption and visual description of one scene.
pub fn extract_fields(raw: &str) -> SceneFields {
    let spans = field_spans(raw);

    let first_value = |field: Field| {
        spans
            .iter()
            .find(|span| span.field == field)
            .map(|span| normalize_value(&raw[span.value.clone()]))
            .unwrap_or_default()
    };

    SceneFields::new(
        first_value(Field::Spoken),
        first_value(Field::Caption),
        visual_description(raw),
    )
}

/// Remove field spans and label markup, leaving only the visual description.
///
/// Applying this to its own output returns the output unchanged.
pub fn strip_labels(raw: &str) -> String {
    visual_description(raw)
}

fn visual_description(raw: &str) -> String {
    let mut current = clean_once(raw);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(raw: &str) -> String {
    let mut remaining = String::with_capacity(raw.len());
    let mut cursor = 0;
    for span in field_spans(raw) {
        remaining.push_str(&raw[cursor..span.span.start]);
        remaining.push('\n');
        cursor = span.span.end;
    }
    remaining.push_str(&raw[cursor..]);

    let without_labels = BOLD_LABEL.replace_all(&remaining, "");
    let without_bullets = BULLET.replace_all(&without_labels, "");
    let without_emphasis = without_bullets.replace('*', "");
    WHITESPACE
        .replace_all(&without_emphasis, " ")
        .trim()
        .to_string()
}

/// All field occurrences in `raw`, ordered by position, overlaps dropped.
fn field_spans(raw: &str) -> Vec<FieldSpan> {
    let mut spans = Vec::new();

    for (regex, field) in [(&*BOLD_SPOKEN, Field::Spoken), (&*BOLD_CAPTION, Field::Caption)] {
        for label in regex.find_iter(raw) {
            let end = BOLD_FIELD_END
                .find_at(raw, label.end())
                .map(|m| m.start())
                .unwrap_or(raw.len());
            spans.push(FieldSpan {
                field,
                span: label.start()..end,
                value: label.end()..end,
            });
        }
    }

    for (regex, field) in [
        (&*PLAIN_SPOKEN, Field::Spoken),
        (&*PLAIN_CAPTION, Field::Caption),
    ] {
        for label in regex.find_iter(raw) {
            let end = raw[label.end()..]
                .find('\n')
                .map(|offset| label.end() + offset)
                .unwrap_or(raw.len());
            spans.push(FieldSpan {
                field,
                span: label.start()..end,
                value: label.end()..end,
            });
        }
    }

    spans.sort_by_key(|span| span.span.start);

    let mut kept: Vec<FieldSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match kept.last() {
            Some(previous) if span.span.start < previous.span.end => continue,
            _ => kept.push(span),
        }
    }
    kept
}

/// Trim, collapse whitespace, and turn double quotes into single quotes.
fn normalize_value(value: &str) -> String {
    let quoted = value.replace(['"', '\u{201C}', '\u{201D}'], "'");
    WHITESPACE.replace_all(quoted.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_field_runs_across_lines() {
        let raw = "A hand holds a jar.\n**Voiceover:** This is\ngreat stuff\n**Captions:** Wow";
        let fields = extract_fields(raw);
        assert_eq!(fields.spoken_script(), "This is great stuff");
        assert_eq!(fields.on_screen_caption(), "Wow");
        assert_eq!(fields.visual_description(), "A hand holds a jar.");
    }

    #[test]
    fn test_bold_field_swallows_trailing_lines() {
        let raw = "**Captions:** Wow\nA hand holds a jar.";
        let fields = extract_fields(raw);
        assert_eq!(fields.on_screen_caption(), "Wow A hand holds a jar.");
        assert_eq!(fields.visual_description(), "");
    }

    #[test]
    fn test_bold_field_stops_at_inline_bold_label() {
        let raw = "A jar on a shelf. **Voiceover:** Hello there **Visual:** close up";
        let fields = extract_fields(raw);
        assert_eq!(fields.spoken_script(), "Hello there");
        assert_eq!(fields.visual_description(), "A jar on a shelf. close up");
    }

    #[test]
    fn test_plain_field_is_line_scoped() {
        let raw = "Voiceover: Hello\nA dog runs.";
        let fields = extract_fields(raw);
        assert_eq!(fields.spoken_script(), "Hello");
        assert_eq!(fields.visual_description(), "A dog runs.");
    }

    #[test]
    fn test_bullets_and_emphasis_removed() {
        let raw = "- *Close-up* of the jar\n* Warm light\n- - Nested";
        assert_eq!(strip_labels(raw), "Close-up of the jar Warm light Nested");
    }

    #[test]
    fn test_inner_hyphens_survive() {
        assert_eq!(strip_labels("A well-lit close-up."), "A well-lit close-up.");
    }

    #[test]
    fn test_quotes_normalized() {
        let fields = extract_fields("Voiceover: \u{201C}Try it\u{201D}, she said \"now\"");
        assert_eq!(fields.spoken_script(), "'Try it', she said 'now'");
    }

    #[test]
    fn test_overlapping_spans_dropped() {
        // The bold voiceover stops at the plain caption line
        let spans = field_spans("**Voiceover:** Hi\nCaptions: Yo");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].field, Field::Spoken);
        assert_eq!(spans[1].field, Field::Caption);
    }

    #[test]
    fn test_split_preamble() {
        let (preamble, scenes) = split("Intro line\n**Scene 1:**\nA", 4);
        assert_eq!(preamble, "Intro line\n");
        assert_eq!(scenes.len(), 1);
    }
}
