//! Tunable settings
//!
//! Everything here has a sensible default, so a partial (or missing) JSON
//! file still produces a playable configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{PLAYBACK_RATE, SIM_DT};
use crate::sim::swing::SwingTuning;
use crate::sim::trajectory::{PhysicsParams, TrajectoryIntegrator};
use crate::sim::wind::GUST_VARIATION;

/// Wind roll range for each attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindRange {
    pub min_mph: f32,
    pub max_mph: f32,
    /// Gust amplitude as a fraction of base speed
    pub gust_variation: f32,
}

impl Default for WindRange {
    fn default() -> Self {
        Self {
            min_mph: 0.0,
            max_mph: 15.0,
            gust_variation: GUST_VARIATION,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsParams,
    pub swing: SwingTuning,
    pub wind: WindRange,
    /// Integrator step (s)
    pub sim_dt: f32,
    /// Trajectory samples replayed per second
    pub playback_rate: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: PhysicsParams::default(),
            swing: SwingTuning::default(),
            wind: WindRange::default(),
            sim_dt: SIM_DT,
            playback_rate: PLAYBACK_RATE,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Integrator configured from these settings
    pub fn integrator(&self) -> TrajectoryIntegrator {
        TrajectoryIntegrator::new(self.physics, self.sim_dt)
    }

    /// Replace values that would stall or break the simulation with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.sim_dt > 0.0 && self.sim_dt.is_finite()) {
            log::warn!("Invalid sim_dt {}, using {}", self.sim_dt, defaults.sim_dt);
            self.sim_dt = defaults.sim_dt;
        }
        if !(self.playback_rate > 0.0 && self.playback_rate.is_finite()) {
            log::warn!(
                "Invalid playback_rate {}, using {}",
                self.playback_rate,
                defaults.playback_rate
            );
            self.playback_rate = defaults.playback_rate;
        }
        if !(self.physics.max_flight_time > 0.0 && self.physics.max_flight_time.is_finite()) {
            log::warn!("Invalid max_flight_time, using default");
            self.physics.max_flight_time = defaults.physics.max_flight_time;
        }
        if !(self.physics.ball_mass > 0.0) {
            log::warn!("Invalid ball_mass, using default");
            self.physics.ball_mass = defaults.physics.ball_mass;
        }
        if !(self.swing.ideal_tempo > 0.0) {
            log::warn!("Invalid ideal_tempo, using default");
            self.swing.ideal_tempo = defaults.swing.ideal_tempo;
        }
        if self.wind.min_mph > self.wind.max_mph {
            std::mem::swap(&mut self.wind.min_mph, &mut self.wind.max_mph);
        }
        self
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Bad settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write settings as JSON
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match self.to_json() {
            Ok(json) => match fs::write(path, json) {
                Ok(()) => log::info!("Settings saved to {}", path.display()),
                Err(e) => log::warn!("Failed to save settings to {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}
