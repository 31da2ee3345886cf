//! Fixed-timestep stepping and the scripted observer that flies along the ring.

use glam::DVec3;
use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame accepted before clamping, so a stall never turns into a
/// burst of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulator that turns variable frame times into fixed-size steps.
#[derive(Debug, Default)]
pub struct FixedStep {
    accumulator: f64,
    total_sim_time: f64,
    update_count: u64,
}

impl FixedStep {
    /// Creates a stepper with an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame of `frame_time` seconds, calling `update_fn(FIXED_DT, sim_time)`
    /// zero or more times.
    pub fn step(&mut self, frame_time: f64, mut update_fn: impl FnMut(f64, f64)) {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT, self.total_sim_time);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }
    }

    /// Returns the total simulated time in seconds.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }

    /// Returns the number of fixed steps executed.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

/// An observer gliding along the inside of the ring at constant speed.
#[derive(Clone, Copy, Debug)]
pub struct RingFlight {
    radius: f64,
    altitude: f64,
    speed: f64,
    angle: f64,
}

impl RingFlight {
    /// Start at angle zero, `altitude` meters above the ring floor (toward the
    /// axis), moving at `speed` meters per second.
    pub fn new(radius: f64, altitude: f64, speed: f64) -> Self {
        Self {
            radius,
            altitude: altitude.clamp(0.0, radius),
            speed,
            angle: 0.0,
        }
    }

    /// Moves the observer forward by `dt` seconds, wrapping at a full turn.
    pub fn advance(&mut self, dt: f64) {
        let orbit = self.radius - self.altitude;
        if orbit > 0.0 {
            self.angle = (self.angle + self.speed * dt / orbit).rem_euclid(std::f64::consts::TAU);
        }
    }

    /// Returns the observer's world position; the ring axis is +Z.
    pub fn position(&self) -> DVec3 {
        let orbit = self.radius - self.altitude;
        DVec3::new(orbit * self.angle.cos(), orbit * self.angle.sin(), 0.0)
    }

    /// Current heading in degrees, `[0, 360)`.
    pub fn degrees(&self) -> f64 {
        self.angle.to_degrees()
    }
}
