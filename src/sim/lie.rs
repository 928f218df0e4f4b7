//! Lie table and the terrain seam
//!
//! Terrain only matters once per shot: the lie under the ball at address
//! scales the launch velocity. Course content plugs in through
//! [`TerrainLookup`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Terrain directly under the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LieType {
    #[default]
    Fairway,
    Rough,
    Sand,
    Green,
    Water,
}

/// One row of the lie table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LieInfo {
    pub name: &'static str,
    /// Applied once to the launch velocity
    pub multiplier: f32,
    pub difficulty: f32,
}

impl LieType {
    pub const ALL: [LieType; 5] = [
        LieType::Fairway,
        LieType::Rough,
        LieType::Sand,
        LieType::Green,
        LieType::Water,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LieType::Fairway => "fairway",
            LieType::Rough => "rough",
            LieType::Sand => "sand",
            LieType::Green => "green",
            LieType::Water => "water",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fairway" => Some(LieType::Fairway),
            "rough" => Some(LieType::Rough),
            "sand" | "bunker" => Some(LieType::Sand),
            "green" => Some(LieType::Green),
            "water" => Some(LieType::Water),
            _ => None,
        }
    }

    pub fn info(&self) -> LieInfo {
        let (multiplier, difficulty) = match self {
            LieType::Fairway => (1.0, 1.0),
            LieType::Rough => (0.85, 1.3),
            LieType::Sand => (0.7, 1.6),
            LieType::Green => (1.0, 0.8),
            LieType::Water => (0.5, 2.0),
        };
        LieInfo {
            name: self.as_str(),
            multiplier,
            difficulty,
        }
    }

    pub fn multiplier(&self) -> f32 {
        self.info().multiplier
    }
}

/// Look up a lie by terrain classification name. Unknown names play as fairway.
pub fn lie_for(classification: &str) -> LieInfo {
    match LieType::from_str(classification) {
        Some(lie) => lie.info(),
        None => {
            log::debug!("Unknown terrain '{}', using fairway lie", classification);
            LieType::Fairway.info()
        }
    }
}

/// Course-side terrain classification, queried once before each hit
pub trait TerrainLookup {
    fn terrain_at(&self, position: Vec3) -> LieType;
}

impl<F> TerrainLookup for F
where
    F: Fn(Vec3) -> LieType,
{
    fn terrain_at(&self, position: Vec3) -> LieType {
        self(position)
    }
}

/// Course where every point has the same lie
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformTerrain(pub LieType);

impl TerrainLookup for UniformTerrain {
    fn terrain_at(&self, _position: Vec3) -> LieType {
        self.0
    }
}
