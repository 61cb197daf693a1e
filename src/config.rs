//! Settings and configuration.
//!
//! `Settings` is the persisted, user-editable file (controls, HUD toggles,
//! high scores). The simulation never reads it directly: the orchestrator is
//! handed a `SimConfig` built from it when a game starts.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::LEVEL_SECONDS;
use crate::error::ConfigError;
use crate::input::ControlBindings;

pub const HIGH_SCORE_SLOTS: usize = 10;

// ── High scores ──────────────────────────────────────────────────────────────

/// Ten best scores, highest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores(Vec<u32>);

impl Default for HighScores {
    fn default() -> Self {
        Self(vec![0; HIGH_SCORE_SLOTS])
    }
}

impl HighScores {
    pub fn entries(&self) -> &[u32] {
        &self.0
    }

    pub fn best(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Insert `score` ahead of the first lower entry, dropping the last one.
    /// Returns whether the score made the table.
    pub fn submit(&mut self, score: u32) -> bool {
        match self.0.iter().position(|&s| score > s) {
            Some(index) => {
                self.0.insert(index, score);
                self.0.truncate(HIGH_SCORE_SLOTS);
                true
            }
            None => false,
        }
    }

    /// Repair a hand-edited table: sorted, exactly ten slots.
    fn normalize(&mut self) {
        self.0.sort_unstable_by(|a, b| b.cmp(a));
        self.0.resize(HIGH_SCORE_SLOTS, 0);
    }
}

// ── Settings file ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub controls: ControlBindings,
    pub high_scores: HighScores,
    pub game_music_on: bool,
    pub show_fps: bool,
    pub show_score: bool,
    pub show_health_bar: bool,
    pub show_gun_bar: bool,
    pub gun_upgrade_on: bool,
    pub show_game_timer: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            controls: ControlBindings::default(),
            high_scores: HighScores::default(),
            game_music_on: true,
            show_fps: true,
            show_score: true,
            show_health_bar: true,
            show_gun_bar: true,
            gun_upgrade_on: true,
            show_game_timer: true,
        }
    }
}

impl Settings {
    /// Load settings; a missing file gives the defaults, missing keys fall
    /// back to their default values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let mut settings: Settings = serde_json::from_str(&text)?;
        settings.high_scores.normalize();
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn hud(&self) -> HudFlags {
        HudFlags {
            show_fps: self.show_fps,
            show_score: self.show_score,
            show_health: self.show_health_bar,
            show_gun_bar: self.show_gun_bar,
            show_timer: self.show_game_timer,
        }
    }

    pub fn sim_config(&self, viewport: Vec2) -> SimConfig {
        SimConfig {
            controls: self.controls.clone(),
            gun_upgrade_on: self.gun_upgrade_on,
            viewport,
            ..SimConfig::default()
        }
    }
}

/// What the renderer should draw on top of the level. Never read by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudFlags {
    pub show_fps: bool,
    pub show_score: bool,
    pub show_health: bool,
    pub show_gun_bar: bool,
    pub show_timer: bool,
}

// ── Simulation config ────────────────────────────────────────────────────────

/// Read-only configuration handed to a session at start.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub controls: ControlBindings,
    pub gun_upgrade_on: bool,
    /// Viewport size in level pixels, for camera clamping.
    pub viewport: Vec2,
    pub level_seconds: u32,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            controls: ControlBindings::default(),
            gun_upgrade_on: true,
            viewport: Vec2::new(1920.0, 1080.0),
            level_seconds: LEVEL_SECONDS,
            seed: None,
        }
    }
}
