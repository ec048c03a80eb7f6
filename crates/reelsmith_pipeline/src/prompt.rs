//! Prompt assembly for each call shape.

use reelsmith_core::{Language, ProductionSettings};
use reelsmith_storyboard::SceneFields;

/// Option values that mean "let the model decide".
fn is_unset(value: &str) -> bool {
    value.trim().is_empty() || value == "Random" || value == "None"
}

fn push_option(lines: &mut Vec<String>, name: &str, value: &str) {
    if !is_unset(value) {
        lines.push(format!("- {name}: {value}"));
    }
}

fn creative_direction(settings: &ProductionSettings) -> Vec<String> {
    let mut lines = Vec::new();
    push_option(&mut lines, "Vibe", settings.vibe());
    push_option(&mut lines, "Background", settings.background_vibe());
    push_option(&mut lines, "Lighting", settings.lighting());
    push_option(&mut lines, "Artistic style", settings.style());
    push_option(&mut lines, "Camera", settings.camera());
    push_option(&mut lines, "Composition", settings.composition());
    push_option(&mut lines, "Lens", settings.lens_type());
    push_option(&mut lines, "Film simulation", settings.film_sim());
    push_option(&mut lines, "Effect", settings.effect());
    lines.push(format!(
        "- Creativity: {}/10",
        settings.creativity_level()
    ));
    lines
}

/// Prompt for the text-only storyboard call.
pub fn storyboard_prompt(settings: &ProductionSettings, scene_count: usize) -> String {
    let language = settings.storyboard_language();
    let word = language.scene_word();

    let mut lines = vec![
        format!(
            "Write a {scene_count}-scene storyboard for a short social video about this product: {}",
            settings.product_description()
        ),
        format!("Write everything in {language}."),
    ];
    push_option(&mut lines, "Content type", settings.content_type());
    lines.push(format!(
        "Start each scene with a bold marker exactly like **{word} 1:**, **{word} 2:** and so on."
    ));
    if *settings.include_voiceover() {
        let label = match language {
            Language::BahasaMalaysia => "Skrip Suara Latar",
            _ => "Voiceover",
        };
        lines.push(format!(
            "Give each scene a **{label}:** line with the words to be spoken."
        ));
    }
    if *settings.include_captions() {
        let label = match language {
            Language::BahasaMalaysia => "Kapsyen",
            _ => "Captions",
        };
        lines.push(format!("Give each scene a short **{label}:** line for on-screen text."));
    }
    if *settings.include_model() {
        lines.push("A person, matching the face reference image, presents the product.".to_string());
    }
    lines.push("Describe what each scene shows.".to_string());
    lines.push("Creative direction:".to_string());
    lines.extend(creative_direction(settings));
    lines.join("\n")
}

/// Prompt for composing one scene image from the reference images.
pub fn image_prompt(settings: &ProductionSettings, scene: &SceneFields) -> String {
    let mut lines = vec![
        format!(
            "Create a photorealistic product image for this product: {}",
            settings.product_description()
        ),
        format!("Scene: {}", scene.visual_description()),
    ];
    if *settings.include_model() {
        lines.push(
            "Feature the person from the second reference image naturally using the product."
                .to_string(),
        );
    } else {
        lines.push("Show only the product. Do not add people, hands or body parts.".to_string());
    }
    lines.push("Creative direction:".to_string());
    lines.extend(creative_direction(settings));
    lines.push("Do not add any text, captions or watermarks.".to_string());
    lines.join("\n")
}

/// Prompt for animating one scene image into a video.
pub fn video_prompt(settings: &ProductionSettings, scene: &SceneFields) -> String {
    let language = settings.video_language().spoken_name();

    let mut lines = vec![
        "SYSTEM RULES:".to_string(),
        format!(
            "Spoken language and voiceover MUST be 100% in {language}. This is the most important instruction."
        ),
        "Do not use other languages or foreign accents.".to_string(),
        String::new(),
        "VISUAL:".to_string(),
        "Animate the provided image.".to_string(),
    ];
    if !*settings.include_model() {
        lines.push(
            "The animation must focus only on the product. Do not add or animate any people, hands or body parts."
                .to_string(),
        );
    }
    lines.push(scene.visual_description().clone());
    lines.push(String::new());

    lines.push("CREATIVE STYLE:".to_string());
    lines.push(format!("- Artistic style: {}", or_default(settings.style(), "photorealistic")));
    lines.push(format!("- Lighting: {}", or_default(settings.lighting(), "natural")));
    lines.push(format!("- Camera: {}", or_default(settings.camera(), "medium shot")));
    lines.push(String::new());

    if *settings.include_voiceover() && !scene.spoken_script().is_empty() {
        lines.push("AUDIO:".to_string());
        lines.push(format!("Use only the following dialogue in {language}:"));
        lines.push(format!("\"{}\"", scene.spoken_script()));
        lines.push("Voice tone: friendly, confident and enthusiastic.".to_string());
        lines.push(String::new());
    }

    lines.push("REMINDERS:".to_string());
    if *settings.include_captions() && !scene.on_screen_caption().is_empty() {
        lines.push(format!(
            "- Display this exact on-screen text: \"{}\".",
            scene.on_screen_caption()
        ));
    } else {
        lines.push("- Do not include any on-screen text, captions or subtitles.".to_string());
    }
    lines.push("- Do not change the language.".to_string());
    lines.join("\n")
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if is_unset(value) { fallback } else { value }
}

/// Things the video model must avoid for a given spoken language.
///
/// ```
/// use reelsmith_core::Language;
/// use reelsmith_pipeline::prompt::negative_prompt;
///
/// let negative = negative_prompt(Language::English);
/// assert!(negative.starts_with("subtitles, text"));
/// assert!(negative.contains("Malay accent"));
/// assert!(!negative.contains("English accent"));
/// ```
pub fn negative_prompt(language: Language) -> String {
    let base = "subtitles, text, words, watermark, logo, Indonesian language, Indonesian accent, Indonesian voiceover";
    let others = match language {
        Language::BahasaMalaysia => {
            "English language, Chinese language, English accent, Chinese accent"
        }
        Language::English => {
            "Malaysian Malay language, Chinese language, Malay accent, Chinese accent"
        }
        Language::Chinese => {
            "Malaysian Malay language, English language, Malay accent, English accent"
        }
    };
    format!("{base}, {others}")
}

/// Prompt for editing an existing image.
pub fn edit_prompt(instruction: &str) -> String {
    format!(
        "Edit the provided image as follows, keeping everything else unchanged: {}",
        instruction.trim()
    )
}
