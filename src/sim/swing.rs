//! Two-press swing timer
//!
//! First press starts the oscillating power meter, second press locks power
//! and opens the tempo window, third press scores tempo and completes the
//! swing. Time only moves through [`SwingTimer::advance`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Swing state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SwingPhase {
    #[default]
    Idle,
    /// Power meter oscillating
    Powering,
    /// Power locked, waiting for the tempo press
    Timing,
    /// Result emitted (transient, resets to Idle)
    Complete,
}

/// Output of one completed swing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShotResult {
    /// 0..=100
    pub power: f32,
    /// -1 (too fast) ..= 1 (too slow), 0 is perfect
    pub tempo: f32,
    pub backspin: f32,
    pub sidespin: f32,
}

/// Swing timing knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingTuning {
    /// Power units per second
    pub power_rate: f32,
    pub max_power: f32,
    /// Ideal seconds between power lock and tempo press
    pub ideal_tempo: f32,
    /// Fractional band around the ideal that scores a perfect tempo
    pub tempo_tolerance: f32,
    /// Multiplier on fractional deviation outside the band
    pub tempo_scale: f32,
}

impl Default for SwingTuning {
    fn default() -> Self {
        Self {
            power_rate: 80.0,
            max_power: 100.0,
            ideal_tempo: 0.4,
            tempo_tolerance: 0.15,
            tempo_scale: 2.0,
        }
    }
}

/// Deviation past `tempo_tolerance` that still scores perfect, so a press
/// landing a tenth of a percent outside the band is not penalized
const TEMPO_BAND_SLACK: f32 = 1.5e-3;

impl SwingTuning {
    /// Score a tempo press `elapsed` seconds after power lock
    pub fn score_tempo(&self, elapsed: f32) -> f32 {
        let deviation = elapsed - self.ideal_tempo;
        let ratio = deviation.abs() / self.ideal_tempo;
        if ratio <= self.tempo_tolerance + TEMPO_BAND_SLACK {
            0.0
        } else {
            deviation.signum() * (ratio * self.tempo_scale).min(1.0)
        }
    }
}

pub const BACKSPIN_MAX: f32 = 100.0;
pub const SIDESPIN_MAX: f32 = 100.0;

const PREVIEW_FREQUENCY: f32 = 2.0;
const PREVIEW_AMPLITUDE: f32 = 0.5;

type ShotCallback = Box<dyn FnMut(&ShotResult)>;

/// Swing input state machine. One per shot context.
pub struct SwingTimer {
    tuning: SwingTuning,
    phase: SwingPhase,
    power: f32,
    power_rising: bool,
    tempo: f32,
    tempo_preview: f32,
    backspin: f32,
    sidespin: f32,
    /// Seconds since the current phase began
    phase_elapsed: f32,
    on_shot: Option<ShotCallback>,
}

impl fmt::Debug for SwingTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwingTimer")
            .field("phase", &self.phase)
            .field("power", &self.power)
            .field("tempo", &self.tempo)
            .field("backspin", &self.backspin)
            .field("sidespin", &self.sidespin)
            .field("phase_elapsed", &self.phase_elapsed)
            .finish_non_exhaustive()
    }
}

impl Default for SwingTimer {
    fn default() -> Self {
        Self::new(SwingTuning::default())
    }
}

impl SwingTimer {
    pub fn new(tuning: SwingTuning) -> Self {
        Self {
            tuning,
            phase: SwingPhase::Idle,
            power: 0.0,
            power_rising: true,
            tempo: 0.0,
            tempo_preview: 0.0,
            backspin: 0.0,
            sidespin: 0.0,
            phase_elapsed: 0.0,
            on_shot: None,
        }
    }

    /// Install the single completion callback (replaces any previous one)
    pub fn set_on_shot<F>(&mut self, callback: F)
    where
        F: FnMut(&ShotResult) + 'static,
    {
        self.on_shot = Some(Box::new(callback));
    }

    pub fn clear_on_shot(&mut self) {
        self.on_shot = None;
    }

    pub fn phase(&self) -> SwingPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SwingPhase::Idle
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    /// Cosmetic tempo wobble shown while Timing
    pub fn tempo_preview(&self) -> f32 {
        self.tempo_preview
    }

    pub fn backspin(&self) -> f32 {
        self.backspin
    }

    pub fn sidespin(&self) -> f32 {
        self.sidespin
    }

    pub fn tuning(&self) -> &SwingTuning {
        &self.tuning
    }

    pub fn set_backspin(&mut self, value: f32) {
        self.backspin = value.clamp(0.0, BACKSPIN_MAX);
    }

    pub fn set_sidespin(&mut self, value: f32) {
        self.sidespin = value.clamp(-SIDESPIN_MAX, SIDESPIN_MAX);
    }

    /// Begin a swing. Ignored unless Idle.
    pub fn start_swing(&mut self) {
        if self.phase != SwingPhase::Idle {
            return;
        }
        self.phase = SwingPhase::Powering;
        self.power = 0.0;
        self.power_rising = true;
        self.phase_elapsed = 0.0;
        log::debug!("Swing started");
    }

    /// Advance meters by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        match self.phase {
            SwingPhase::Powering => {
                self.phase_elapsed += dt;
                let max = self.tuning.max_power;
                let delta = self.tuning.power_rate * dt;
                if self.power_rising {
                    self.power += delta;
                    if self.power >= max {
                        self.power = max;
                        self.power_rising = false;
                    }
                } else {
                    self.power -= delta;
                    if self.power <= 0.0 {
                        self.power = 0.0;
                        self.power_rising = true;
                    }
                }
                self.power = self.power.clamp(0.0, max);
            }
            SwingPhase::Timing => {
                self.phase_elapsed += dt;
                self.tempo_preview =
                    (self.phase_elapsed * PREVIEW_FREQUENCY).sin() * PREVIEW_AMPLITUDE;
            }
            SwingPhase::Idle | SwingPhase::Complete => {}
        }
    }

    /// The swing button. Locks power while Powering, scores tempo and
    /// completes the swing while Timing, otherwise ignored.
    pub fn trigger_input(&mut self) -> Option<ShotResult> {
        match self.phase {
            SwingPhase::Powering => {
                self.phase = SwingPhase::Timing;
                self.phase_elapsed = 0.0;
                self.tempo_preview = 0.0;
                log::debug!("Power locked at {:.1}", self.power);
                None
            }
            SwingPhase::Timing => {
                self.tempo = self.tuning.score_tempo(self.phase_elapsed);
                self.phase = SwingPhase::Complete;

                let result = ShotResult {
                    power: self.power,
                    tempo: self.tempo,
                    backspin: self.backspin,
                    sidespin: self.sidespin,
                };
                log::debug!(
                    "Swing complete: power={:.1} tempo={:.2} after {:.3}s",
                    result.power,
                    result.tempo,
                    self.phase_elapsed
                );
                if let Some(callback) = self.on_shot.as_mut() {
                    callback(&result);
                }

                self.reset();
                Some(result)
            }
            SwingPhase::Idle | SwingPhase::Complete => None,
        }
    }

    /// Back to Idle with meters zeroed. Spin sliders are kept.
    pub fn reset(&mut self) {
        self.phase = SwingPhase::Idle;
        self.power = 0.0;
        self.power_rising = true;
        self.tempo = 0.0;
        self.tempo_preview = 0.0;
        self.phase_elapsed = 0.0;
    }
}

/// Rising-edge detector for level-triggered buttons
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonEdge {
    was_pressed: bool,
}

impl ButtonEdge {
    /// True only on the frame the button goes down
    pub fn rising(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        edge
    }
}
