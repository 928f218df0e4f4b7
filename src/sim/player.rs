//! Trajectory playback
//!
//! Owns the ball position. A hit computes the whole flight up front, then
//! `update` walks through the samples at a fixed playback rate that is
//! independent of the integrator's timestep.

use std::fmt;

use glam::{Vec2, Vec3};

use super::trajectory::{Trajectory, TrajectoryIntegrator};
use crate::consts::PLAYBACK_RATE;

type RestCallback = Box<dyn FnMut(Vec3)>;

/// Ball controller. One per ball.
pub struct TrajectoryPlayer {
    integrator: TrajectoryIntegrator,
    /// Samples advanced per second of real time
    playback_rate: f32,
    position: Vec3,
    trajectory: Option<Trajectory>,
    index: f32,
    moving: bool,
    on_complete: Option<RestCallback>,
}

impl fmt::Debug for TrajectoryPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrajectoryPlayer")
            .field("position", &self.position)
            .field("moving", &self.moving)
            .field("index", &self.index)
            .field("samples", &self.trajectory.as_ref().map(Trajectory::len))
            .finish_non_exhaustive()
    }
}

impl Default for TrajectoryPlayer {
    fn default() -> Self {
        Self::new(TrajectoryIntegrator::default(), PLAYBACK_RATE)
    }
}

impl TrajectoryPlayer {
    pub fn new(integrator: TrajectoryIntegrator, playback_rate: f32) -> Self {
        Self {
            integrator,
            playback_rate,
            position: Vec3::ZERO,
            trajectory: None,
            index: 0.0,
            moving: false,
            on_complete: None,
        }
    }

    /// Install the single rest callback (replaces any previous one)
    pub fn set_on_complete<F>(&mut self, callback: F)
    where
        F: FnMut(Vec3) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn clear_on_complete(&mut self) {
        self.on_complete = None;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    pub fn integrator(&self) -> &TrajectoryIntegrator {
        &self.integrator
    }

    /// Fraction of the current trajectory played back (1.0 when idle)
    pub fn progress(&self) -> f32 {
        match &self.trajectory {
            Some(t) if self.moving && !t.is_empty() => (self.index / t.len() as f32).min(1.0),
            _ => 1.0,
        }
    }

    /// Teleport the ball. Drops any flight in progress.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.trajectory = None;
        self.index = 0.0;
        self.moving = false;
    }

    /// Strike the ball from its current position along +X
    pub fn hit_ball(
        &mut self,
        speed: f32,
        angle: f32,
        backspin: f32,
        sidespin: f32,
        wind: Vec2,
        lie_multiplier: f32,
    ) {
        self.hit_ball_aimed(speed, angle, backspin, sidespin, wind, lie_multiplier, 0.0);
    }

    /// Strike the ball toward `aim` radians of yaw (0 = +X, π/2 = +Z).
    ///
    /// The integrator works in a frame where the shot travels along +X, so
    /// wind is rotated into that frame and the result rotated back out.
    #[allow(clippy::too_many_arguments)]
    pub fn hit_ball_aimed(
        &mut self,
        speed: f32,
        angle: f32,
        backspin: f32,
        sidespin: f32,
        wind: Vec2,
        lie_multiplier: f32,
        aim: f32,
    ) {
        let local_wind = Vec2::from_angle(-aim).rotate(wind);
        let mut trajectory = self.integrator.calculate_trajectory(
            speed,
            angle,
            backspin,
            sidespin,
            local_wind,
            lie_multiplier,
        );
        if aim != 0.0 {
            trajectory.rotate_yaw(aim);
        }
        self.play(trajectory);
    }

    /// Play an origin-relative trajectory from the current position.
    /// Any flight in progress is discarded.
    pub fn play(&mut self, mut trajectory: Trajectory) {
        if self.moving {
            log::debug!("Re-hit mid-flight, discarding previous trajectory");
        }
        trajectory.translate(self.position);
        self.trajectory = Some(trajectory);
        self.index = 0.0;
        self.moving = true;
    }

    /// Advance playback. Returns the rest position on the tick the flight ends.
    pub fn update(&mut self, dt: f32) -> Option<Vec3> {
        if !self.moving {
            return None;
        }
        let Some(trajectory) = &self.trajectory else {
            self.moving = false;
            return None;
        };

        self.index += dt * self.playback_rate;
        let len = trajectory.len();

        if self.index >= len as f32 {
            if let Some(last) = trajectory.last() {
                self.position = last.position;
            }
            self.index = len.saturating_sub(1) as f32;
            self.moving = false;

            let rest = self.position;
            if let Some(callback) = self.on_complete.as_mut() {
                callback(rest);
            }
            return Some(rest);
        }

        if let Some(sample) = trajectory.get(self.index.floor() as usize) {
            self.position = sample.position;
        }
        None
    }

    /// Render position: blends the current sample toward the next one.
    /// The owned position itself only ever snaps to samples.
    pub fn interpolated_position(&self) -> Vec3 {
        let Some(trajectory) = self.trajectory.as_ref().filter(|_| self.moving) else {
            return self.position;
        };
        let i = self.index.floor() as usize;
        match (trajectory.get(i), trajectory.get(i + 1)) {
            (Some(a), Some(b)) => a.position.lerp(b.position, self.index.fract()),
            (Some(a), None) => a.position,
            _ => self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::trajectory::TrajectorySample;
    use std::cell::RefCell;
    use std::f32::consts::FRAC_PI_2;
    use std::rc::Rc;

    /// Straight line of `n` samples from x=step to x=n*step
    fn line(n: usize, step: f32, x0: f32) -> Trajectory {
        Trajectory::from_samples(
            (1..=n)
                .map(|i| {
                    TrajectorySample::at(Vec3::new(x0 + i as f32 * step, 0.0, 0.0), i as f32 * 0.1)
                })
                .collect(),
        )
    }

    #[test]
    fn test_update_without_trajectory_is_noop() {
        let mut player = TrajectoryPlayer::default();
        player.set_position(Vec3::new(1.0, 0.0, 2.0));
        assert!(player.update(1.0).is_none());
        assert_eq!(player.position(), Vec3::new(1.0, 0.0, 2.0));
        assert!(!player.is_moving());
    }

    #[test]
    fn test_playback_reaches_rest_once() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);

        let mut player = TrajectoryPlayer::default();
        player.set_on_complete(move |p| sink.borrow_mut().push(p));
        let origin = Vec3::new(5.0, 0.0, -3.0);
        player.set_position(origin);
        player.play(line(10, 10.0, 0.0));
        assert!(player.is_moving());

        // 10 samples at 10 samples/s: done after 1s
        let mut rests = Vec::new();
        for _ in 0..120 {
            if let Some(rest) = player.update(1.0 / 60.0) {
                rests.push(rest);
            }
        }

        let expected = Vec3::new(100.0, 0.0, 0.0) + origin;
        assert_eq!(rests, vec![expected]);
        assert_eq!(*calls.borrow(), vec![expected]);
        assert_eq!(player.position(), expected);
        assert!(!player.is_moving());
    }

    #[test]
    fn test_cleared_callback_stays_silent() {
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);

        let mut player = TrajectoryPlayer::default();
        player.set_on_complete(move |_| *sink.borrow_mut() += 1);
        player.clear_on_complete();
        player.play(line(3, 1.0, 0.0));

        let mut rest = None;
        while rest.is_none() {
            rest = player.update(0.1);
        }
        assert_eq!(rest, Some(Vec3::new(3.0, 0.0, 0.0)));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_playback_rate_indexes_samples() {
        let mut player = TrajectoryPlayer::default();
        player.play(line(10, 1.0, 0.0));

        player.update(0.05);
        assert_eq!(player.position().x, 1.0); // index 0.5 -> sample 0
        player.update(0.1);
        assert_eq!(player.position().x, 2.0); // index 1.5 -> sample 1
        player.update(0.3);
        assert_eq!(player.position().x, 5.0); // index 4.5 -> sample 4
        assert!((player.interpolated_position().x - 5.5).abs() < 1e-4);
        assert!((player.progress() - 0.45).abs() < 1e-4);
    }

    #[test]
    fn test_rehit_discards_previous_flight() {
        let mut player = TrajectoryPlayer::default();
        player.play(line(50, 1.0, 1000.0));
        player.update(0.5);
        let mid = player.position();
        assert!(mid.x > 1000.0);

        player.play(line(5, -1.0, 0.0));
        let mut positions = Vec::new();
        for _ in 0..60 {
            player.update(1.0 / 60.0);
            positions.push(player.position());
        }
        assert!(!player.is_moving());
        // Every position after the re-hit comes from the new flight
        assert!(positions.iter().all(|p| p.x < mid.x));
        assert_eq!(player.position(), mid + Vec3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn test_set_position_aborts_flight() {
        let mut player = TrajectoryPlayer::default();
        player.play(line(20, 1.0, 0.0));
        player.update(0.3);
        player.set_position(Vec3::ZERO);
        assert!(!player.is_moving());
        assert!(player.update(10.0).is_none());
        assert_eq!(player.position(), Vec3::ZERO);
    }

    #[test]
    fn test_hit_ball_translates_to_origin() {
        let mut player = TrajectoryPlayer::default();
        let tee = Vec3::new(10.0, 0.0, 20.0);
        player.set_position(tee);
        player.hit_ball(30.0, 0.5, 0.0, 0.0, Vec2::ZERO, 1.0);

        let expected = player.trajectory().unwrap().rest_position();
        let bare = TrajectoryIntegrator::default()
            .calculate_trajectory(30.0, 0.5, 0.0, 0.0, Vec2::ZERO, 1.0)
            .rest_position();
        assert_eq!(expected, bare + tee);

        let mut rest = None;
        while rest.is_none() {
            rest = player.update(0.1);
        }
        assert_eq!(rest, Some(expected));
    }

    #[test]
    fn test_aimed_hit_rotates_flight() {
        let mut player = TrajectoryPlayer::default();
        player.hit_ball_aimed(30.0, 0.5, 0.0, 0.0, Vec2::ZERO, 1.0, FRAC_PI_2);
        let rest = player.trajectory().unwrap().rest_position();
        let straight = TrajectoryIntegrator::default()
            .calculate_trajectory(30.0, 0.5, 0.0, 0.0, Vec2::ZERO, 1.0)
            .rest_position();
        assert!(rest.x.abs() < 1e-3);
        assert!((rest.z - straight.x).abs() < 1e-3);
    }

    #[test]
    fn test_aimed_hit_sees_wind_in_shot_frame() {
        // Tailwind along the aim line carries further than calm air
        let mut calm = TrajectoryPlayer::default();
        calm.hit_ball_aimed(35.0, 0.5, 0.0, 0.0, Vec2::ZERO, 1.0, FRAC_PI_2);
        let mut windy = TrajectoryPlayer::default();
        windy.hit_ball_aimed(35.0, 0.5, 0.0, 0.0, Vec2::new(0.0, 8.0), 1.0, FRAC_PI_2);

        let calm_carry = calm.trajectory().unwrap().carry();
        let windy_carry = windy.trajectory().unwrap().carry();
        assert!(windy_carry > calm_carry);
    }
}
