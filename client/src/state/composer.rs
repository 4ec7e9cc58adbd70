//! Scene composer draft: prompt text, visual style, and aspect ratio.

#[cfg(test)]
#[path = "composer_test.rs"]
mod composer_test;

/// Visual styles offered by the composer, in display order.
pub const VISUAL_STYLES: [&str; 4] = ["Cinematic", "Anime", "Fantasy", "Cyberpunk"];

/// Aspect-ratio tokens offered by the composer, in display order. Must stay
/// within the set the image model accepts.
pub const ASPECT_RATIOS: [&str; 4] = ["16:9", "1:1", "4:3", "9:16"];

/// Draft inputs for the next generation request.
#[derive(Clone, Debug)]
pub struct ComposerState {
    pub prompt: String,
    pub visual_style: String,
    pub aspect_ratio: String,
}

impl Default for ComposerState {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            visual_style: "Cinematic".to_string(),
            aspect_ratio: "16:9".to_string(),
        }
    }
}
