// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Language;
use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE_PX: u8 = 12;
pub const MAX_FONT_SIZE_PX: u8 = 24;
pub const MIN_LINE_HEIGHT: f64 = 1.2;
pub const MAX_LINE_HEIGHT: f64 = 2.2;

const DEFAULT_FONT_SIZE_PX: u8 = 16;
const DEFAULT_LINE_HEIGHT: f64 = 1.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Default,
    HighContrast,
    Compact,
}

impl Theme {
    pub const ALL: [Self; 3] = [Self::Default, Self::HighContrast, Self::Compact];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::HighContrast => "high-contrast",
            Self::Compact => "compact",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "default" => Some(Self::Default),
            "high-contrast" => Some(Self::HighContrast),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// User UI choices that outlive any single snapshot. Fields are orthogonal:
/// setting one never resets another.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub theme: Theme,
    pub dark_mode: bool,
    pub font_size_px: u8,
    pub line_height: f64,
    pub chat_language: Option<Language>,
    pub ui_language: Language,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Default,
            dark_mode: false,
            font_size_px: DEFAULT_FONT_SIZE_PX,
            line_height: DEFAULT_LINE_HEIGHT,
            chat_language: None,
            ui_language: Language::English,
        }
    }
}

/// Shallow partial update; unset fields leave the current value alone.
/// Numeric fields take wide types so out-of-range input can be expressed
/// and clamped rather than rejected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrefUpdate {
    pub theme: Option<Theme>,
    pub dark_mode: Option<bool>,
    pub font_size_px: Option<i64>,
    pub line_height: Option<f64>,
    pub chat_language: Option<Language>,
    pub ui_language: Option<Language>,
}

impl Preferences {
    /// Merges the update in place, clamping numerics to their documented
    /// ranges. Returns whether anything actually changed.
    pub fn apply(&mut self, update: &PrefUpdate) -> bool {
        let before = self.clone();
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(dark_mode) = update.dark_mode {
            self.dark_mode = dark_mode;
        }
        if let Some(size) = update.font_size_px {
            self.font_size_px = clamp_font_size(size);
        }
        if let Some(height) = update.line_height {
            self.line_height = clamp_line_height(height);
        }
        if let Some(language) = update.chat_language {
            self.chat_language = Some(language);
        }
        if let Some(language) = update.ui_language {
            self.ui_language = language;
        }
        *self != before
    }
}

pub fn clamp_font_size(value: i64) -> u8 {
    value.clamp(i64::from(MIN_FONT_SIZE_PX), i64::from(MAX_FONT_SIZE_PX)) as u8
}

pub fn clamp_line_height(value: f64) -> f64 {
    if value.is_nan() {
        return DEFAULT_LINE_HEIGHT;
    }
    value.clamp(MIN_LINE_HEIGHT, MAX_LINE_HEIGHT)
}
