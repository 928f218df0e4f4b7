//! Fairway Flight - golf shot simulation core
//!
//! Core modules:
//! - `sim`: Deterministic ball flight, swing timing and playback
//! - `settings`: Data-driven physics and timing tuning

pub mod settings;
pub mod sim;

pub use settings::{Settings, WindRange};

use glam::Vec3;

/// Simulation constants
pub mod consts {
    /// Integrator timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Trajectory samples replayed per second of real time
    pub const PLAYBACK_RATE: f32 = 10.0;
    /// Miles per hour to meters per second
    pub const MPH_TO_MPS: f32 = 0.447;
    /// Ball at rest closer than this to the pin is holed (m)
    pub const HOLE_RADIUS: f32 = 0.5;
}

/// Normalize angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Rotate a vector about +Y so that +X turns toward +Z by `angle`
#[inline]
pub fn rotate_yaw(v: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos)
}
