use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CARD_WIDTH: u32 = 440;
pub const DEFAULT_CARD_HEIGHT: u32 = 586;

pub const MIN_ZOOM: u16 = 50;
pub const MAX_ZOOM: u16 = 200;
pub const ZOOM_STEP: u16 = 5;
pub const DEFAULT_ZOOM: u16 = 100;

/// Cosmetic card theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StylePreset {
    #[default]
    AppleNotes,
    PopArt,
    ArtDeco,
    GlassMorphism,
    WarmAndSoft,
    MinimalGray,
    DreamyGradient,
    FreshNature,
}

impl StylePreset {
    pub const ALL: [StylePreset; 8] = [
        StylePreset::AppleNotes,
        StylePreset::PopArt,
        StylePreset::ArtDeco,
        StylePreset::GlassMorphism,
        StylePreset::WarmAndSoft,
        StylePreset::MinimalGray,
        StylePreset::DreamyGradient,
        StylePreset::FreshNature,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StylePreset::AppleNotes => "Apple Notes",
            StylePreset::PopArt => "Pop Art",
            StylePreset::ArtDeco => "Art deco",
            StylePreset::GlassMorphism => "Glass Morphism",
            StylePreset::WarmAndSoft => "Warm & Soft",
            StylePreset::MinimalGray => "Minimal Gray",
            StylePreset::DreamyGradient => "Dreamy Gradient",
            StylePreset::FreshNature => "Fresh Nature",
        }
    }

    /// The preset after this one, wrapping around
    pub fn cycle(self) -> Self {
        let i = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown style preset: {0}")]
pub struct UnknownPreset(pub String);

impl FromStr for StylePreset {
    type Err = UnknownPreset;

    /// Case-insensitive match on the display label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Preset card sizes for social platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeTemplate {
    TwitterPost,
    InstagramPost,
    InstagramStory,
    FacebookPost,
}

impl SizeTemplate {
    pub const ALL: [SizeTemplate; 4] = [
        SizeTemplate::TwitterPost,
        SizeTemplate::InstagramPost,
        SizeTemplate::InstagramStory,
        SizeTemplate::FacebookPost,
    ];

    /// (width, height) in px
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            SizeTemplate::TwitterPost => (1200, 675),
            SizeTemplate::InstagramPost => (1080, 1080),
            SizeTemplate::InstagramStory => (1080, 1920),
            SizeTemplate::FacebookPost => (1200, 630),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeTemplate::TwitterPost => "Twitter Post",
            SizeTemplate::InstagramPost => "Instagram Post",
            SizeTemplate::InstagramStory => "Instagram Story",
            SizeTemplate::FacebookPost => "Facebook Post",
        }
    }
}

/// How cards are sized and styled. None of it affects slide derivation
/// except `auto_split`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSettings {
    width: u32,
    height: u32,
    zoom: u16,
    pub auto_split: bool,
    pub style: StylePreset,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_CARD_WIDTH,
            height: DEFAULT_CARD_HEIGHT,
            zoom: DEFAULT_ZOOM,
            auto_split: true,
            style: StylePreset::default(),
        }
    }
}

impl CardSettings {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Zoom in percent
    pub fn zoom(&self) -> u16 {
        self.zoom
    }

    /// Zoom as a scale factor (100% == 1.0)
    pub fn scale(&self) -> f32 {
        f32::from(self.zoom) / 100.0
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Parse width/height as typed into a text field; bad input leaves the
    /// current value in place
    pub fn set_size_from_input(&mut self, width: &str, height: &str) {
        let width = width.trim().parse().unwrap_or(self.width);
        let height = height.trim().parse().unwrap_or(self.height);
        self.set_size(width, height);
    }

    pub fn apply_template(&mut self, template: SizeTemplate) {
        let (width, height) = template.dimensions();
        self.set_size(width, height);
    }

    /// Snap to the slider's range and step
    pub fn set_zoom(&mut self, zoom: u16) {
        let clamped = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let snapped = (clamped + ZOOM_STEP / 2) / ZOOM_STEP * ZOOM_STEP;
        self.zoom = snapped.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.saturating_add(ZOOM_STEP));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.saturating_sub(ZOOM_STEP));
    }
}
