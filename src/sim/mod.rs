//! Deterministic shot simulation
//!
//! All ball and swing logic lives here. This module must stay pure:
//! - Time only enters through explicit `dt` arguments
//! - Randomness only through an injected, seeded RNG
//! - No rendering, input polling or storage

pub mod lie;
pub mod player;
pub mod shot;
pub mod state;
pub mod swing;
pub mod tick;
pub mod trajectory;
pub mod wind;

pub use lie::{LieInfo, LieType, TerrainLookup, UniformTerrain, lie_for};
pub use player::TrajectoryPlayer;
pub use shot::{Club, Equipment, LaunchParams};
pub use state::{HolePhase, HoleState, ShotRecord};
pub use swing::{ButtonEdge, ShotResult, SwingPhase, SwingTimer, SwingTuning};
pub use tick::{HoleEvent, TickInput, tick};
pub use trajectory::{
    PhysicsParams, SpinState, Touchdown, Trajectory, TrajectoryIntegrator, TrajectorySample,
};
pub use wind::{WindModel, WindState};
