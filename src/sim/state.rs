//! Hole state
//!
//! The single owner of the swing timer and the ball for one hole. Swing and
//! flight never overlap: the phase gates which of the two receives ticks.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lie::LieType;
use super::player::TrajectoryPlayer;
use super::shot::{Club, Equipment, LaunchParams};
use super::swing::{ButtonEdge, ShotResult, SwingTimer};
use super::wind::{WindModel, WindState};
use crate::consts::HOLE_RADIUS;
use crate::settings::Settings;

/// Where the hole is in its shot cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HolePhase {
    /// Ball at rest, waiting for the first press
    #[default]
    Address,
    /// Swing timer running
    Swinging,
    /// Trajectory playing back
    InFlight,
    /// Ball finished within the cup
    Holed,
}

/// Record of one struck shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub stroke: u32,
    pub result: ShotResult,
    pub launch: LaunchParams,
    pub lie: LieType,
    pub wind: WindState,
    pub start: Vec3,
    /// Filled in when the ball comes to rest
    pub rest: Option<Vec3>,
    pub carry: f32,
}

/// Everything happening on one hole
#[derive(Debug)]
pub struct HoleState {
    /// Hole seed for reproducible wind
    pub seed: u64,
    rng: Pcg32,
    pub settings: Settings,
    pub phase: HolePhase,
    pub swing: SwingTimer,
    pub ball: TrajectoryPlayer,
    pub button: ButtonEdge,
    pub wind: WindState,
    pub tee: Vec3,
    pub pin: Vec3,
    pub club: Club,
    pub equipment: Equipment,
    pub strokes: u32,
    /// Seconds since the hole started
    pub clock: f32,
    pub shots: Vec<ShotRecord>,
}

impl HoleState {
    pub fn new(seed: u64, settings: Settings, tee: Vec3, pin: Vec3) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let wind = WindModel::generate(&mut rng, settings.wind.min_mph, settings.wind.max_mph);
        log::info!("Hole seed {}: wind {}", seed, WindModel::display(&wind));

        let mut ball = TrajectoryPlayer::new(settings.integrator(), settings.playback_rate);
        ball.set_position(tee);

        Self {
            seed,
            rng,
            swing: SwingTimer::new(settings.swing),
            settings,
            phase: HolePhase::Address,
            ball,
            button: ButtonEdge::default(),
            wind,
            tee,
            pin,
            club: Club::default(),
            equipment: Equipment::default(),
            strokes: 0,
            clock: 0.0,
            shots: Vec::new(),
        }
    }

    /// Roll the wind for the next attempt
    pub fn reroll_wind(&mut self) {
        let range = self.settings.wind;
        self.wind = WindModel::generate(&mut self.rng, range.min_mph, range.max_mph);
        log::debug!("Wind now {}", WindModel::display(&self.wind));
    }

    /// Wind vector felt right now, gust included
    pub fn current_wind(&self) -> Vec2 {
        WindModel::gust_vector(&self.wind, self.clock, self.settings.wind.gust_variation)
    }

    /// Yaw from the ball toward the pin
    pub fn aim(&self) -> f32 {
        let to_pin = self.pin - self.ball.position();
        if to_pin.x == 0.0 && to_pin.z == 0.0 {
            0.0
        } else {
            to_pin.z.atan2(to_pin.x)
        }
    }

    pub fn distance_to_pin(&self) -> f32 {
        self.ball.position().distance(self.pin)
    }

    pub fn is_holed(&self, position: Vec3) -> bool {
        position.distance(self.pin) < HOLE_RADIUS
    }

    pub fn select_club(&mut self, club: Club) {
        if self.phase == HolePhase::Address {
            self.club = club;
        }
    }

    /// Back to the tee, new wind, score cleared
    pub fn restart(&mut self) {
        self.swing.reset();
        self.ball.set_position(self.tee);
        self.phase = HolePhase::Address;
        self.strokes = 0;
        self.clock = 0.0;
        self.shots.clear();
        self.reroll_wind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hole(seed: u64) -> HoleState {
        HoleState::new(seed, Settings::default(), Vec3::ZERO, Vec3::new(120.0, 0.0, 0.0))
    }

    #[test]
    fn test_new_hole() {
        let state = hole(12345);
        assert_eq!(state.phase, HolePhase::Address);
        assert_eq!(state.strokes, 0);
        assert_eq!(state.ball.position(), Vec3::ZERO);
        assert!(state.wind.speed_mps <= 15.0 * crate::consts::MPH_TO_MPS);
    }

    #[test]
    fn test_same_seed_same_wind() {
        let mut a = hole(99);
        let mut b = hole(99);
        assert_eq!(a.wind, b.wind);
        a.reroll_wind();
        b.reroll_wind();
        assert_eq!(a.wind, b.wind);
        assert_ne!(hole(1).wind, hole(2).wind);
    }

    #[test]
    fn test_aim_points_at_pin() {
        let mut state = hole(1);
        assert!(state.aim().abs() < 1e-6);
        state.pin = Vec3::new(0.0, 0.0, 50.0);
        assert!((state.aim() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_holed_radius() {
        let state = hole(1);
        assert!(state.is_holed(Vec3::new(119.7, 0.0, 0.0)));
        assert!(!state.is_holed(Vec3::new(119.4, 0.0, 0.0)));
    }
}
