//! Persisted multi-frame zoom sessions.

use crate::config::RenderSettings;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings record for resuming a zoom sequence. Coordinates are stored as
/// text, so a save/load cycle loses nothing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedSession {
    /// Settings of frame 0.
    pub settings: RenderSettings,
    pub frame_count: u32,
    /// Magnification factor between consecutive frames.
    pub zoom_per_frame: f64,
    /// Palette file handed to the colour mapper; never read here.
    #[serde(default)]
    pub palette_path: Option<PathBuf>,
}

impl SavedSession {
    pub fn new(settings: RenderSettings, frame_count: u32, zoom_per_frame: f64) -> Self {
        Self {
            settings,
            frame_count,
            zoom_per_frame,
            palette_path: None,
        }
    }

    /// Settings of frame `index`: same centre, magnification scaled by
    /// `zoom_per_frame^index`.
    pub fn frame_settings(&self, index: u32) -> RenderSettings {
        let mut settings = self.settings.clone();
        settings.magnification *= self.zoom_per_frame.powi(index as i32);
        settings
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let session: Self = serde_json::from_str(text)?;
        session.settings.validate()?;
        Ok(session)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved session ({} frames) to {}", self.frame_count, path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let session = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Loaded session ({} frames, x{} per frame) from {}",
            session.frame_count,
            session.zoom_per_frame,
            path.display()
        );
        Ok(session)
    }
}
