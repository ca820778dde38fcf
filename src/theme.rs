use std::fmt;

use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            ThemeMode::Dark => "☾",
            ThemeMode::Light => "☀",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct ThemeDefinition {
    background: &'static str,
    surface: &'static str,
    text: &'static str,
    muted: &'static str,
    card: &'static str,
    card_border: &'static str,
    button: &'static str,
    button_border: &'static str,
    empty: &'static str,
    accent: &'static str,
    accent_text: &'static str,
}

const DARK: ThemeDefinition = ThemeDefinition {
    background: "#0F172A",
    surface: "#1E3A8A",
    text: "#FFFFFF",
    muted: "#CBD5E1",
    card: "#1E293B",
    card_border: "#334155",
    button: "#334155",
    button_border: "#64748B",
    empty: "#94A3B8",
    accent: "#EF4444",
    accent_text: "#FFFFFF",
};

const LIGHT: ThemeDefinition = ThemeDefinition {
    background: "#F9FAFB",
    surface: "#EFF6FF",
    text: "#111827",
    muted: "#4B5563",
    card: "#FFFFFF",
    card_border: "#E5E7EB",
    button: "#F3F4F6",
    button_border: "#9CA3AF",
    empty: "#6B7280",
    accent: "#EF4444",
    accent_text: "#FFFFFF",
};

/// Resolved palette for one [`ThemeMode`]. Only presentation reads it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub mode: ThemeMode,
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub card: Color,
    pub card_border: Color,
    pub button: Color,
    pub button_border: Color,
    pub empty: Color,
    pub accent: Color,
    pub accent_text: Color,
    pub swatch_text: Color,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        let def = match mode {
            ThemeMode::Dark => &DARK,
            ThemeMode::Light => &LIGHT,
        };
        Theme::from_definition(mode, def)
    }

    fn from_definition(mode: ThemeMode, def: &ThemeDefinition) -> Theme {
        Theme {
            mode,
            background: color_from_hex(def.background).unwrap_or(Color::Black),
            surface: color_from_hex(def.surface).unwrap_or(Color::Blue),
            text: color_from_hex(def.text).unwrap_or(Color::White),
            muted: color_from_hex(def.muted).unwrap_or(Color::Gray),
            card: color_from_hex(def.card).unwrap_or(Color::DarkGray),
            card_border: color_from_hex(def.card_border).unwrap_or(Color::Gray),
            button: color_from_hex(def.button).unwrap_or(Color::DarkGray),
            button_border: color_from_hex(def.button_border).unwrap_or(Color::Gray),
            empty: color_from_hex(def.empty).unwrap_or(Color::Gray),
            accent: color_from_hex(def.accent).unwrap_or(Color::Red),
            accent_text: color_from_hex(def.accent_text).unwrap_or(Color::White),
            swatch_text: color_from_hex("#1F2937").unwrap_or(Color::Black),
        }
    }
}

pub fn color_from_hex(value: &str) -> Option<Color> {
    let normalized = normalize_hex(value)?;
    let r = u8::from_str_radix(&normalized[1..3], 16).ok()?;
    let g = u8::from_str_radix(&normalized[3..5], 16).ok()?;
    let b = u8::from_str_radix(&normalized[5..7], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn normalize_hex(value: &str) -> Option<String> {
    let mut cleaned = value.trim().to_string();
    if !cleaned.starts_with('#') {
        cleaned.insert(0, '#');
    }
    if cleaned.len() != 7 || !cleaned.is_ascii() {
        return None;
    }
    Some(cleaned)
}
