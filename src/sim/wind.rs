//! Per-attempt wind generation
//!
//! Wind is rolled once at the start of a hole/attempt and stays fixed while
//! the ball is in the air. The random source is always injected so a seeded
//! hole replays the same sequence of winds.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MPH_TO_MPS;
use crate::wrap_angle;

/// Default gust amplitude as a fraction of the base speed
pub const GUST_VARIATION: f32 = 0.1;

/// Gust oscillation frequency (radians per second of hole time)
const GUST_FREQUENCY: f32 = 0.5;

/// Compass arrows, counter-clockwise from +X
const ARROWS: [&str; 8] = ["→", "↗", "↑", "↖", "←", "↙", "↓", "↘"];

/// Wind for a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindState {
    /// Always >= 0
    pub speed_mps: f32,
    /// Direction the wind blows toward, in [0, 2π)
    pub direction: f32,
}

impl WindState {
    pub fn new(speed_mps: f32, direction: f32) -> Self {
        Self {
            speed_mps: speed_mps.max(0.0),
            direction: wrap_angle(direction),
        }
    }

    pub fn calm() -> Self {
        Self::default()
    }
}

/// Stateless wind generator
#[derive(Debug, Clone, Copy, Default)]
pub struct WindModel;

impl WindModel {
    /// Roll a wind between `min_mph` and `max_mph` (converted to m/s) with a
    /// uniformly random direction.
    pub fn generate<R: Rng>(rng: &mut R, min_mph: f32, max_mph: f32) -> WindState {
        let lo = min_mph.min(max_mph).max(0.0) * MPH_TO_MPS;
        let hi = min_mph.max(max_mph).max(0.0) * MPH_TO_MPS;
        let speed_mps = rng.random_range(lo..=hi);
        let direction = rng.random_range(0.0..TAU);
        WindState {
            speed_mps,
            direction,
        }
    }

    /// Horizontal wind vector (x, z-plane packed as Vec2)
    pub fn to_vector(state: &WindState) -> Vec2 {
        Vec2::new(
            state.speed_mps * state.direction.cos(),
            state.speed_mps * state.direction.sin(),
        )
    }

    /// Compass sector (0..8) for a direction; sector 0 is centered on 0 rad
    pub fn sector(direction: f32) -> usize {
        let width = TAU / ARROWS.len() as f32;
        let shifted = wrap_angle(direction + width / 2.0);
        ((shifted / width).floor() as usize) % ARROWS.len()
    }

    /// HUD string, e.g. `"12 mph ↗"`
    pub fn display(state: &WindState) -> String {
        let mph = (state.speed_mps / MPH_TO_MPS).round() as i32;
        format!("{} mph {}", mph, ARROWS[Self::sector(state.direction)])
    }

    /// Gusting speed at `time_secs` into the hole
    pub fn with_gust(state: &WindState, time_secs: f32, variation: f32) -> f32 {
        state.speed_mps + (time_secs * GUST_FREQUENCY).sin() * variation * state.speed_mps
    }

    /// Wind vector with gust applied, keeping the attempt's direction
    pub fn gust_vector(state: &WindState, time_secs: f32, variation: f32) -> Vec2 {
        let speed = Self::with_gust(state, time_secs, variation).max(0.0);
        Self::to_vector(&WindState {
            speed_mps: speed,
            direction: state.direction,
        })
    }
}
