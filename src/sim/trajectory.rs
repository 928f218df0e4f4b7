//! Ball flight integrator
//!
//! Explicit fixed-step integration of a struck ball under gravity, quadratic
//! drag, wind advection and a Magnus term. The whole flight is computed in
//! one call, relative to the origin, and returned as an ordered list of
//! samples ending at the first ground contact or the flight-time ceiling.
//!
//! Inputs are not validated: NaN or negative speeds flow through as NaN
//! positions. Callers are expected to pass finite scalars and a positive `dt`.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;
use crate::rotate_yaw;

/// Physical constants used by the integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// m/s², applied along -Y
    pub gravity: f32,
    /// kg/m³
    pub air_density: f32,
    /// m
    pub ball_radius: f32,
    /// kg
    pub ball_mass: f32,
    pub drag_coefficient: f32,
    /// Fraction of spin kept per second of flight
    pub spin_decay: f32,
    /// Vertical velocity kept (and reversed) on bounce
    pub bounce_damping: f32,
    /// Horizontal velocity kept on bounce
    pub bounce_restitution: f32,
    /// Spin kept on bounce
    pub bounce_spin_retention: f32,
    pub magnus_coefficient: f32,
    /// Spin state units to spin-axis units
    pub spin_scale: f32,
    /// s
    pub max_flight_time: f32,
    /// m
    pub ground_tolerance: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            air_density: 1.225,
            ball_radius: 0.02135,
            ball_mass: 0.04593,
            drag_coefficient: 0.47,
            spin_decay: 0.95,
            bounce_damping: 0.6,
            bounce_restitution: 0.8,
            bounce_spin_retention: 0.5,
            magnus_coefficient: 0.0001,
            spin_scale: 0.01,
            max_flight_time: 15.0,
            ground_tolerance: 0.01,
        }
    }
}

impl PhysicsParams {
    /// Cross-sectional area of the ball
    #[inline]
    pub fn cross_section(&self) -> f32 {
        PI * self.ball_radius * self.ball_radius
    }

    /// Drag acceleration per (m/s)² of speed
    #[inline]
    pub fn drag_factor(&self) -> f32 {
        0.5 * self.air_density * self.cross_section() * self.drag_coefficient / self.ball_mass
    }

    /// Wind acceleration per m/s of wind
    #[inline]
    pub fn wind_factor(&self) -> f32 {
        self.cross_section() / self.ball_mass
    }
}

/// Back and side spin of the ball
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpinState {
    pub backspin: f32,
    pub sidespin: f32,
}

impl SpinState {
    pub fn new(backspin: f32, sidespin: f32) -> Self {
        Self { backspin, sidespin }
    }

    /// Spin axis fed into the Magnus cross product
    #[inline]
    pub fn axis(&self, scale: f32) -> Vec3 {
        Vec3::new(self.sidespin * scale, self.backspin * scale, 0.0)
    }

    #[inline]
    pub fn scale(&mut self, factor: f32) {
        self.backspin *= factor;
        self.sidespin *= factor;
    }
}

/// One integrator step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub position: Vec3,
    pub velocity: Vec3,
    pub spin: SpinState,
    /// s since launch, strictly increasing along a trajectory
    pub time: f32,
    /// Set on the ground-contact sample
    #[serde(default)]
    pub grounded: bool,
}

impl TrajectorySample {
    /// Stationary sample, for building trajectories by hand
    pub fn at(position: Vec3, time: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            spin: SpinState::default(),
            time,
            grounded: false,
        }
    }
}

/// First ground contact of a flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Touchdown {
    pub position: Vec3,
    pub velocity_before: Vec3,
    pub velocity_after: Vec3,
    pub time: f32,
}

/// A complete computed flight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
    touchdown: Option<Touchdown>,
    /// Launch point, not itself a sample
    origin: Vec3,
}

impl Trajectory {
    /// Wrap precomputed samples (assumed time-ordered)
    pub fn from_samples(samples: Vec<TrajectorySample>) -> Self {
        Self {
            samples,
            touchdown: None,
            origin: Vec3::ZERO,
        }
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrajectorySample> {
        self.samples.get(index)
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn touchdown(&self) -> Option<&Touchdown> {
        self.touchdown.as_ref()
    }

    /// Where playback leaves the ball
    pub fn rest_position(&self) -> Vec3 {
        self.last().map(|s| s.position).unwrap_or(Vec3::ZERO)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Horizontal distance from the launch point to touchdown (or rest)
    pub fn carry(&self) -> f32 {
        let land = self
            .touchdown
            .map(|t| t.position)
            .unwrap_or_else(|| self.rest_position());
        Vec2::new(land.x - self.origin.x, land.z - self.origin.z).length()
    }

    /// Highest point of the flight
    pub fn apex(&self) -> f32 {
        self.samples
            .iter()
            .map(|s| s.position.y)
            .fold(0.0_f32, f32::max)
    }

    pub fn flight_time(&self) -> f32 {
        self.last().map(|s| s.time).unwrap_or(0.0)
    }

    /// Shift every position (and the touchdown) by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        self.origin += offset;
        for sample in &mut self.samples {
            sample.position += offset;
        }
        if let Some(touchdown) = &mut self.touchdown {
            touchdown.position += offset;
        }
    }

    /// Rotate the flight about the vertical axis through its origin
    pub fn rotate_yaw(&mut self, angle: f32) {
        let origin = self.origin;
        for sample in &mut self.samples {
            sample.position = origin + rotate_yaw(sample.position - origin, angle);
            sample.velocity = rotate_yaw(sample.velocity, angle);
        }
        if let Some(touchdown) = &mut self.touchdown {
            touchdown.position = origin + rotate_yaw(touchdown.position - origin, angle);
            touchdown.velocity_before = rotate_yaw(touchdown.velocity_before, angle);
            touchdown.velocity_after = rotate_yaw(touchdown.velocity_after, angle);
        }
    }
}

/// Fixed-step flight integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryIntegrator {
    pub params: PhysicsParams,
    pub dt: f32,
}

impl Default for TrajectoryIntegrator {
    fn default() -> Self {
        Self::new(PhysicsParams::default(), SIM_DT)
    }
}

impl TrajectoryIntegrator {
    pub fn new(params: PhysicsParams, dt: f32) -> Self {
        debug_assert!(dt > 0.0, "integrator timestep must be positive");
        Self { params, dt }
    }

    /// Upper bound on samples for one flight
    pub fn max_samples(&self) -> usize {
        (self.params.max_flight_time / self.dt).ceil() as usize + 1
    }

    /// Integrate a shot launched from the origin along +X.
    ///
    /// `wind` is horizontal (x, z). `lie_multiplier` scales the launch
    /// velocity once, before the first step.
    pub fn calculate_trajectory(
        &self,
        initial_speed: f32,
        launch_angle: f32,
        backspin: f32,
        sidespin: f32,
        wind: Vec2,
        lie_multiplier: f32,
    ) -> Trajectory {
        let p = &self.params;
        let dt = self.dt;

        let mut position = Vec3::ZERO;
        let mut velocity = Vec3::new(
            initial_speed * launch_angle.cos(),
            initial_speed * launch_angle.sin(),
            0.0,
        ) * lie_multiplier;
        let mut spin = SpinState::new(backspin, sidespin);

        let gravity = Vec3::new(0.0, -p.gravity, 0.0);
        let drag_factor = p.drag_factor();
        let wind_accel = Vec3::new(wind.x, 0.0, wind.y) * p.wind_factor();
        let decay = p.spin_decay.powf(dt);

        let mut samples = Vec::with_capacity(self.max_samples().min(4096));
        let mut touchdown = None;
        let mut step: u32 = 0;

        loop {
            let time = step as f32 * dt;

            let drag = -velocity.normalize_or_zero() * drag_factor * velocity.length_squared();
            let magnus = velocity.cross(spin.axis(p.spin_scale)) * p.magnus_coefficient;
            let accel = gravity + drag + wind_accel + magnus;

            velocity += accel * dt;
            position += velocity * dt;

            let grounded = position.y <= p.ground_tolerance && velocity.y < 0.0;
            if grounded {
                let velocity_before = velocity;
                position.y = 0.0;
                velocity.y *= -p.bounce_damping;
                velocity.x *= p.bounce_restitution;
                velocity.z *= p.bounce_restitution;
                spin.scale(p.bounce_spin_retention);
                touchdown = Some(Touchdown {
                    position,
                    velocity_before,
                    velocity_after: velocity,
                    time,
                });
            }

            spin.scale(decay);

            samples.push(TrajectorySample {
                position,
                velocity,
                spin,
                time,
                grounded,
            });
            step += 1;

            if grounded {
                log::trace!("Touchdown at t={:.3}s after {} samples", time, samples.len());
                break;
            }
            if step as f32 * dt >= p.max_flight_time {
                log::trace!("Flight ceiling reached after {} samples", samples.len());
                break;
            }
        }

        Trajectory {
            samples,
            touchdown,
            origin: Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn integrator() -> TrajectoryIntegrator {
        TrajectoryIntegrator::default()
    }

    fn drive(speed: f32, angle_deg: f32) -> Trajectory {
        integrator().calculate_trajectory(speed, angle_deg.to_radians(), 0.0, 0.0, Vec2::ZERO, 1.0)
    }

    #[test]
    fn test_deterministic() {
        let i = integrator();
        let a = i.calculate_trajectory(45.0, 0.3, 60.0, -20.0, Vec2::new(1.5, -2.0), 0.85);
        let b = i.calculate_trajectory(45.0, 0.3, 60.0, -20.0, Vec2::new(1.5, -2.0), 0.85);
        assert_eq!(a, b);
    }

    #[test]
    fn test_drag_shortens_range() {
        let speed = 30.0;
        let angle = 45.0_f32.to_radians();
        let analytic = speed * speed * (2.0 * angle).sin() / 9.8;

        let traj = drive(speed, 45.0);
        let carry = traj.touchdown().expect("ball should land").position.x;
        assert!(carry > 0.0);
        assert!(carry < analytic, "carry {} >= analytic {}", carry, analytic);
    }

    #[test]
    fn test_dragless_matches_analytic_range() {
        let params = PhysicsParams {
            drag_coefficient: 0.0,
            ..Default::default()
        };
        let i = TrajectoryIntegrator::new(params, SIM_DT);
        let speed = 30.0;
        let angle = 45.0_f32.to_radians();
        let analytic = speed * speed * (2.0 * angle).sin() / 9.8;

        let traj = i.calculate_trajectory(speed, angle, 0.0, 0.0, Vec2::ZERO, 1.0);
        let carry = traj.rest_position().x;
        assert!(
            (carry - analytic).abs() < analytic * 0.03,
            "carry {} vs analytic {}",
            carry,
            analytic
        );
    }

    #[test]
    fn test_bounce_energy_loss() {
        let traj = drive(25.0, 30.0);
        let td = traj.touchdown().expect("ball should land");
        assert!(td.velocity_before.y < 0.0);
        assert!((td.velocity_after.y + 0.6 * td.velocity_before.y).abs() < 1e-4);
        assert!((td.velocity_after.x - 0.8 * td.velocity_before.x).abs() < 1e-4);
        assert!((td.velocity_after.z - 0.8 * td.velocity_before.z).abs() < 1e-4);

        let last = traj.last().unwrap();
        assert!(last.grounded);
        assert_eq!(last.position.y, 0.0);
        assert_eq!(last.velocity, td.velocity_after);
        assert_eq!(traj.samples().iter().filter(|s| s.grounded).count(), 1);
    }

    #[test]
    fn test_bounce_halves_spin() {
        let traj = integrator().calculate_trajectory(30.0, 0.5, 80.0, 40.0, Vec2::ZERO, 1.0);
        let n = traj.len();
        assert!(n >= 2);
        let before = traj.samples()[n - 2].spin;
        let after = traj.samples()[n - 1].spin;
        let decay = 0.95_f32.powf(SIM_DT);
        assert!((after.backspin - before.backspin * 0.5 * decay).abs() < 1e-3);
        assert!((after.sidespin - before.sidespin * 0.5 * decay).abs() < 1e-3);
    }

    #[test]
    fn test_flat_launch_lands_immediately() {
        let traj = drive(20.0, 0.0);
        assert_eq!(traj.len(), 1);
        assert!(traj.samples()[0].grounded);
        assert_eq!(traj.samples()[0].time, 0.0);
    }

    #[test]
    fn test_time_ceiling() {
        // Straight up with no gravity never lands
        let params = PhysicsParams {
            gravity: 0.0,
            drag_coefficient: 0.0,
            ..Default::default()
        };
        let i = TrajectoryIntegrator::new(params, 0.1);
        let traj = i.calculate_trajectory(5.0, 1.2, 0.0, 0.0, Vec2::ZERO, 1.0);
        assert!(traj.touchdown().is_none());
        assert!(traj.len() <= i.max_samples());
        assert!(traj.len() >= 149);
        assert!(traj.flight_time() < 15.0);
    }

    #[test]
    fn test_lie_multiplier_reduces_carry() {
        let i = integrator();
        let fairway = i.calculate_trajectory(40.0, 0.4, 0.0, 0.0, Vec2::ZERO, 1.0);
        let sand = i.calculate_trajectory(40.0, 0.4, 0.0, 0.0, Vec2::ZERO, 0.7);
        assert!(sand.carry() < fairway.carry());
        assert!(sand.apex() < fairway.apex());
    }

    #[test]
    fn test_wind_pushes_ball() {
        let i = integrator();
        let calm = i.calculate_trajectory(40.0, 0.5, 0.0, 0.0, Vec2::ZERO, 1.0);
        let cross = i.calculate_trajectory(40.0, 0.5, 0.0, 0.0, Vec2::new(0.0, 6.0), 1.0);
        let tail = i.calculate_trajectory(40.0, 0.5, 0.0, 0.0, Vec2::new(6.0, 0.0), 1.0);
        let head = i.calculate_trajectory(40.0, 0.5, 0.0, 0.0, Vec2::new(-6.0, 0.0), 1.0);

        assert_eq!(calm.rest_position().z, 0.0);
        assert!(cross.rest_position().z > 0.0);
        assert!(tail.carry() > calm.carry());
        assert!(head.carry() < calm.carry());
    }

    #[test]
    fn test_translate() {
        let mut traj = drive(20.0, 40.0);
        let rest = traj.rest_position();
        let carry = traj.carry();
        let offset = Vec3::new(10.0, 0.0, -5.0);
        traj.translate(offset);
        assert_eq!(traj.rest_position(), rest + offset);
        assert_eq!(traj.touchdown().unwrap().position, rest + offset);
        assert_eq!(traj.origin(), offset);
        assert!((traj.carry() - carry).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_time_monotonic_and_bounded(
            speed in 0.0f32..80.0,
            angle in 0.0f32..1.5,
            backspin in 0.0f32..100.0,
            sidespin in -100.0f32..100.0,
            wx in -10.0f32..10.0,
            wz in -10.0f32..10.0,
            lie in 0.5f32..1.0,
        ) {
            let i = integrator();
            let wind = Vec2::new(wx, wz);
            let traj = i.calculate_trajectory(speed, angle, backspin, sidespin, wind, lie);
            prop_assert!(!traj.is_empty());
            prop_assert!(traj.len() <= i.max_samples());
            for pair in traj.samples().windows(2) {
                prop_assert!(pair[0].time < pair[1].time);
            }
        }

        #[test]
        fn prop_spin_never_grows(
            speed in 5.0f32..70.0,
            angle in 0.1f32..1.3,
            backspin in 0.0f32..100.0,
            sidespin in -100.0f32..100.0,
        ) {
            let traj = integrator()
                .calculate_trajectory(speed, angle, backspin, sidespin, Vec2::ZERO, 1.0);
            let mut prev = SpinState::new(backspin, sidespin);
            for s in traj.samples() {
                prop_assert!(s.spin.backspin.abs() <= prev.backspin.abs());
                prop_assert!(s.spin.sidespin.abs() <= prev.sidespin.abs());
                prev = s.spin;
            }
        }
    }
}
