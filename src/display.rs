//! Presentation settings. Persisted verbatim; the core never interprets them.

use crate::config::{DEFAULT_BACKGROUND_COLOR, DEFAULT_IMAGE_OPACITY, DEFAULT_TEXT_COLOR};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundType {
    #[default]
    Casino,
    Simple,
    Digital,
}

impl SoundType {
    pub const ALL: [SoundType; 3] = [SoundType::Casino, SoundType::Simple, SoundType::Digital];

    pub fn id(self) -> &'static str {
        match self {
            SoundType::Casino => "casino",
            SoundType::Simple => "simple",
            SoundType::Digital => "digital",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundImageOptions {
    pub opacity: f64,
    pub blur: f64,
}

impl Default for BackgroundImageOptions {
    fn default() -> Self {
        Self {
            opacity: DEFAULT_IMAGE_OPACITY,
            blur: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    pub background_color: String,
    pub text_color: String,
    /// Data URL of the background image, empty when unset.
    pub background_image: String,
    pub background_image_options: BackgroundImageOptions,
    pub sound_enabled: bool,
    /// Played when a level runs out.
    pub warning_sound_type: SoundType,
    /// Legacy: stored and editable, never played.
    pub level_change_sound_type: SoundType,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            background_image: String::new(),
            background_image_options: BackgroundImageOptions::default(),
            sound_enabled: false,
            warning_sound_type: SoundType::Casino,
            level_change_sound_type: SoundType::Casino,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySettingsPatch {
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub background_image: Option<String>,
    pub background_image_options: Option<BackgroundImageOptions>,
    pub sound_enabled: Option<bool>,
    pub warning_sound_type: Option<SoundType>,
    pub level_change_sound_type: Option<SoundType>,
}

impl DisplaySettings {
    pub fn apply(&mut self, patch: DisplaySettingsPatch) {
        if let Some(v) = patch.background_color {
            self.background_color = v;
        }
        if let Some(v) = patch.text_color {
            self.text_color = v;
        }
        if let Some(v) = patch.background_image {
            self.background_image = v;
        }
        if let Some(v) = patch.background_image_options {
            self.background_image_options = v;
        }
        if let Some(v) = patch.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = patch.warning_sound_type {
            self.warning_sound_type = v;
        }
        if let Some(v) = patch.level_change_sound_type {
            self.level_change_sound_type = v;
        }
    }

    /// Inline style for the page root.
    pub fn page_style(&self) -> String {
        format!(
            "background-color: {}; color: {};",
            self.background_color, self.text_color
        )
    }

    pub fn image_style(&self) -> Option<String> {
        if self.background_image.is_empty() {
            return None;
        }
        Some(format!(
            "background-image: url({}); opacity: {}; filter: blur({}px);",
            self.background_image,
            self.background_image_options.opacity,
            self.background_image_options.blur
        ))
    }
}
