pub mod card_settings;

pub use card_settings::{CardSettings, SizeTemplate, StylePreset};
