//! Per-frame hole driver
//!
//! Routes one frame of input to the swing timer or the ball depending on
//! the hole phase, and glues a completed swing into a hit.

use glam::Vec3;

use super::lie::{LieType, TerrainLookup};
use super::shot::LaunchParams;
use super::state::{HolePhase, HoleState, ShotRecord};
use super::swing::ShotResult;
use super::wind::WindModel;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Swing button held this frame (level, not edge)
    pub pressed: bool,
    /// Backspin slider, if it moved
    pub backspin: Option<f32>,
    /// Sidespin slider, if it moved
    pub sidespin: Option<f32>,
}

/// Something the UI may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum HoleEvent {
    SwingStarted,
    PowerLocked { power: f32 },
    Struck(ShotRecord),
    CameToRest { position: Vec3, distance_to_pin: f32 },
    Holed { strokes: u32 },
}

/// Advance the hole by one frame of `dt` seconds
pub fn tick<T>(state: &mut HoleState, input: &TickInput, terrain: &T, dt: f32) -> Option<HoleEvent>
where
    T: TerrainLookup + ?Sized,
{
    if state.phase == HolePhase::Holed {
        return None;
    }

    state.clock += dt;
    if let Some(backspin) = input.backspin {
        state.swing.set_backspin(backspin);
    }
    if let Some(sidespin) = input.sidespin {
        state.swing.set_sidespin(sidespin);
    }
    let pressed = state.button.rising(input.pressed);

    match state.phase {
        HolePhase::Address => {
            if !pressed {
                return None;
            }
            state.swing.start_swing();
            state.phase = HolePhase::Swinging;
            Some(HoleEvent::SwingStarted)
        }
        HolePhase::Swinging => {
            state.swing.advance(dt);
            if !pressed {
                return None;
            }
            let power = state.swing.power();
            match state.swing.trigger_input() {
                Some(result) => Some(strike(state, result, terrain)),
                None => Some(HoleEvent::PowerLocked { power }),
            }
        }
        HolePhase::InFlight => {
            let rest = state.ball.update(dt)?;
            Some(come_to_rest(state, rest))
        }
        HolePhase::Holed => None,
    }
}

/// Turn a scored swing into a hit from the ball's current spot
fn strike<T>(state: &mut HoleState, result: ShotResult, terrain: &T) -> HoleEvent
where
    T: TerrainLookup + ?Sized,
{
    let start = state.ball.position();
    let lie: LieType = terrain.terrain_at(start);
    let launch = LaunchParams::derive(&result, &state.club, &state.equipment);
    let wind = state.current_wind();
    let aim = state.aim();

    state.ball.hit_ball_aimed(
        launch.speed,
        launch.angle,
        launch.backspin,
        launch.sidespin,
        wind,
        lie.multiplier(),
        aim,
    );
    state.strokes += 1;
    state.phase = HolePhase::InFlight;

    let carry = state.ball.trajectory().map(|t| t.carry()).unwrap_or(0.0);
    log::info!(
        "Stroke {}: {} from {} at {:.1} m/s, {:.1}° (power {:.0}, tempo {:+.2}), wind {}, carry {:.1} m",
        state.strokes,
        state.club.name,
        lie.as_str(),
        launch.speed,
        launch.angle.to_degrees(),
        result.power,
        result.tempo,
        WindModel::display(&state.wind),
        carry
    );

    let record = ShotRecord {
        stroke: state.strokes,
        result,
        launch,
        lie,
        wind: state.wind,
        start,
        rest: None,
        carry,
    };
    state.shots.push(record);
    HoleEvent::Struck(record)
}

fn come_to_rest(state: &mut HoleState, rest: Vec3) -> HoleEvent {
    if let Some(last) = state.shots.last_mut() {
        last.rest = Some(rest);
    }

    if state.is_holed(rest) {
        state.phase = HolePhase::Holed;
        log::info!("Holed in {} strokes", state.strokes);
        return HoleEvent::Holed {
            strokes: state.strokes,
        };
    }

    let distance_to_pin = rest.distance(state.pin);
    log::info!(
        "Ball at rest ({:.1}, {:.1}), {:.1} m from pin",
        rest.x,
        rest.z,
        distance_to_pin
    );
    state.phase = HolePhase::Address;
    state.reroll_wind();
    HoleEvent::CameToRest {
        position: rest,
        distance_to_pin,
    }
}
