//! Turning a scored swing into integrator inputs
//!
//! Equipment values come from progression and are treated as opaque
//! multipliers here.

use serde::{Deserialize, Serialize};

use super::swing::ShotResult;

/// Fraction of launch speed lost at the worst possible tempo
const TEMPO_SPEED_PENALTY: f32 = 0.25;
/// Sidespin added at full tempo error before accuracy damping
const TEMPO_SIDESPIN: f32 = 40.0;
const MIN_ACCURACY: f32 = 0.1;

/// A club in the bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub name: String,
    /// Launch angle in radians
    pub loft: f32,
    /// Ball speed at 100 power with neutral equipment (m/s)
    pub max_speed: f32,
}

impl Club {
    pub fn new(name: impl Into<String>, loft_degrees: f32, max_speed: f32) -> Self {
        Self {
            name: name.into(),
            loft: loft_degrees.to_radians(),
            max_speed,
        }
    }

    pub fn driver() -> Self {
        Self::new("Driver", 12.0, 70.0)
    }

    pub fn iron() -> Self {
        Self::new("7 Iron", 30.0, 50.0)
    }

    pub fn wedge() -> Self {
        Self::new("Wedge", 50.0, 35.0)
    }

    pub fn putter() -> Self {
        Self::new("Putter", 2.0, 12.0)
    }

    /// Default bag, longest first
    pub fn bag() -> Vec<Self> {
        vec![Self::driver(), Self::iron(), Self::wedge(), Self::putter()]
    }
}

impl Default for Club {
    fn default() -> Self {
        Self::iron()
    }
}

/// Combined club/ball modifiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Equipment {
    pub power: f32,
    pub spin: f32,
    pub accuracy: f32,
}

impl Default for Equipment {
    fn default() -> Self {
        Self {
            power: 1.0,
            spin: 1.0,
            accuracy: 1.0,
        }
    }
}

impl Equipment {
    /// Stack two modifier sets (e.g. club upgrade and ball)
    pub fn combine(&self, other: &Equipment) -> Equipment {
        Equipment {
            power: self.power * other.power,
            spin: self.spin * other.spin,
            accuracy: self.accuracy * other.accuracy,
        }
    }
}

/// Everything the integrator needs for one hit, apart from wind and lie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParams {
    /// m/s
    pub speed: f32,
    /// radians above horizontal
    pub angle: f32,
    pub backspin: f32,
    pub sidespin: f32,
}

impl LaunchParams {
    /// Bad tempo costs speed and bends the ball; accuracy damps the bend.
    pub fn derive(result: &ShotResult, club: &Club, equipment: &Equipment) -> Self {
        let tempo = result.tempo.clamp(-1.0, 1.0);
        let power = result.power.clamp(0.0, 100.0) / 100.0;

        let speed =
            club.max_speed * power * equipment.power * (1.0 - TEMPO_SPEED_PENALTY * tempo.abs());
        let accuracy = equipment.accuracy.max(MIN_ACCURACY);
        let sidespin = (result.sidespin + tempo * TEMPO_SIDESPIN / accuracy) * equipment.spin;

        Self {
            speed,
            angle: club.loft,
            backspin: result.backspin * equipment.spin,
            sidespin,
        }
    }
}
