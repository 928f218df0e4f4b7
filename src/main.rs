//! Headless demo: plays a scripted hole and logs every shot.
//!
//! Usage: `fairway-flight [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
use fairway_flight::{
    Settings,
    consts::SIM_DT,
    sim::{Club, HoleEvent, HolePhase, HoleState, LieType, TickInput, WindModel, tick},
};
#[cfg(not(target_arch = "wasm32"))]
use glam::Vec3;

#[cfg(not(target_arch = "wasm32"))]
const MAX_STROKES: u32 = 8;

/// Simple course: green around the pin, a bunker short of it, rough off the line
#[cfg(not(target_arch = "wasm32"))]
fn course(pin: Vec3) -> impl Fn(Vec3) -> LieType {
    move |p: Vec3| {
        let to_pin = p.distance(pin);
        if to_pin < 12.0 {
            LieType::Green
        } else if (p - (pin - Vec3::new(25.0, 0.0, 0.0))).length() < 6.0 {
            LieType::Sand
        } else if p.z.abs() > 20.0 {
            LieType::Rough
        } else {
            LieType::Fairway
        }
    }
}

/// Club and target power for the distance left
#[cfg(not(target_arch = "wasm32"))]
fn plan(distance: f32) -> (Club, f32) {
    let (club, full_carry) = if distance > 160.0 {
        (Club::driver(), 190.0)
    } else if distance > 70.0 {
        (Club::iron(), 120.0)
    } else if distance > 8.0 {
        (Club::wedge(), 75.0)
    } else {
        (Club::putter(), 8.0)
    };
    let power = (distance / full_carry * 100.0).clamp(5.0, 100.0);
    (club, power)
}

/// Drive one swing through the tick loop: hold power until `power`, then
/// release on tempo.
#[cfg(not(target_arch = "wasm32"))]
fn play_stroke<T: Fn(Vec3) -> LieType>(state: &mut HoleState, terrain: &T, power: f32) {
    let up = TickInput::default();
    let down = TickInput {
        pressed: true,
        ..Default::default()
    };
    let power_frames = (power / state.settings.swing.power_rate / SIM_DT).round() as usize;
    let tempo_frames = (state.settings.swing.ideal_tempo / SIM_DT).round() as usize;

    tick(state, &down, terrain, SIM_DT);
    for _ in 0..power_frames.saturating_sub(1) {
        tick(state, &up, terrain, SIM_DT);
    }
    tick(state, &down, terrain, SIM_DT);
    for _ in 0..tempo_frames.saturating_sub(1) {
        tick(state, &up, terrain, SIM_DT);
    }
    tick(state, &down, terrain, SIM_DT);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Fairway Flight (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024);

    let tee = Vec3::ZERO;
    let pin = Vec3::new(260.0, 0.0, 18.0);
    let terrain = course(pin);
    let mut state = HoleState::new(seed, settings, tee, pin);

    while state.phase != HolePhase::Holed && state.strokes < MAX_STROKES {
        let (club, power) = plan(state.distance_to_pin());
        state.select_club(club);
        log::info!(
            "{:.1} m to pin, wind {}, playing {} at {:.0}%",
            state.distance_to_pin(),
            WindModel::display(&state.wind),
            state.club.name,
            power
        );

        play_stroke(&mut state, &terrain, power);

        let idle = TickInput::default();
        while state.phase == HolePhase::InFlight {
            match tick(&mut state, &idle, &terrain, SIM_DT) {
                Some(HoleEvent::Holed { strokes }) => println!("Holed in {}!", strokes),
                Some(HoleEvent::CameToRest { distance_to_pin, .. }) => {
                    println!("Stroke {}: {:.1} m to go", state.strokes, distance_to_pin)
                }
                _ => {}
            }
        }
    }

    for shot in &state.shots {
        println!(
            "#{} {:>6} lie, power {:>5.1}, tempo {:+.2}, carry {:>6.1} m",
            shot.stroke,
            shot.lie.as_str(),
            shot.result.power,
            shot.result.tempo,
            shot.carry
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host game loop on the web
}
