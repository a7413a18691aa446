// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use shiksha_model::{
    Language, PrefUpdate, Preferences, Theme, clamp_font_size, clamp_line_height,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const APP_NAME: &str = "shiksha";

type Listener = Box<dyn FnMut(&Preferences)>;

/// On-disk shape. Every field is optional so files written by older
/// builds (or edited by hand) keep loading; anything unreadable falls
/// back to the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredPrefs {
    theme: Option<String>,
    dark_mode: Option<bool>,
    font_size: Option<i64>,
    line_height: Option<f64>,
    language: Option<String>,
    chat_language: Option<String>,
}

impl StoredPrefs {
    fn from_prefs(prefs: &Preferences) -> Self {
        Self {
            theme: Some(prefs.theme.as_str().to_owned()),
            dark_mode: Some(prefs.dark_mode),
            font_size: Some(i64::from(prefs.font_size_px)),
            line_height: Some(prefs.line_height),
            language: Some(prefs.ui_language.as_str().to_owned()),
            chat_language: prefs.chat_language.map(|lang| lang.as_str().to_owned()),
        }
    }

    fn into_prefs(self, path: &Path) -> Preferences {
        let mut prefs = Preferences::default();
        if let Some(raw) = self.theme {
            match Theme::parse(&raw) {
                Some(theme) => prefs.theme = theme,
                None => warn!(path = %path.display(), theme = %raw, "unknown theme, keeping default"),
            }
        }
        if let Some(dark_mode) = self.dark_mode {
            prefs.dark_mode = dark_mode;
        }
        if let Some(size) = self.font_size {
            prefs.font_size_px = clamp_font_size(size);
        }
        if let Some(height) = self.line_height {
            prefs.line_height = clamp_line_height(height);
        }
        if let Some(raw) = self.language {
            match Language::parse(&raw) {
                Some(language) => prefs.ui_language = language,
                None => warn!(path = %path.display(), language = %raw, "unknown language, keeping default"),
            }
        }
        if let Some(raw) = self.chat_language {
            match Language::parse(&raw) {
                Some(language) => prefs.chat_language = Some(language),
                None => warn!(path = %path.display(), language = %raw, "unknown chat language, keeping default"),
            }
        }
        prefs
    }
}

/// Durable user preferences with change notification. Reads are served
/// from memory; every accepted update is written through to disk and
/// announced to listeners before `set` returns.
pub struct PreferenceStore {
    path: PathBuf,
    prefs: Preferences,
    listeners: Vec<Listener>,
}

impl PreferenceStore {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("SHIKSHA_PREFS_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set SHIKSHA_PREFS_PATH to the preferences file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("preferences.toml"))
    }

    /// Opening never fails: a missing or unreadable file yields defaults
    /// and a warning rather than blocking startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = match fs::read_to_string(&path) {
            Ok(raw) => match toml::from_str::<StoredPrefs>(&raw) {
                Ok(stored) => stored.into_prefs(&path),
                Err(error) => {
                    warn!(path = %path.display(), %error, "preferences file unreadable, using defaults");
                    Preferences::default()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(error) => {
                warn!(path = %path.display(), %error, "preferences file unreadable, using defaults");
                Preferences::default()
            }
        };

        Self {
            path,
            prefs,
            listeners: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> &Preferences {
        &self.prefs
    }

    /// Merge an update. When anything changes the result is persisted and
    /// listeners run synchronously; a no-op update does neither. A failed
    /// write is logged but never loses the in-memory change.
    pub fn set(&mut self, update: &PrefUpdate) -> bool {
        if !self.prefs.apply(update) {
            return false;
        }

        if let Err(error) = self.persist() {
            warn!(path = %self.path.display(), %error, "failed to persist preferences");
        }
        for listener in &mut self.listeners {
            listener(&self.prefs);
        }
        true
    }

    pub fn on_change(&mut self, listener: impl FnMut(&Preferences) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn persist(&self) -> Result<()> {
        let stored = StoredPrefs::from_prefs(&self.prefs);
        let raw = toml::to_string_pretty(&stored).context("encode preferences")?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&self.path, raw)
            .with_context(|| format!("write preferences file {}", self.path.display()))
    }
}
