//! Timestamped ripple disturbances.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Interference group tag.
///
/// Waves of the same group add where they overlap; where both groups reach a
/// point, the combined wave offset is cancelled outright. The tag is fixed at
/// emission and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveGroup {
    Alpha,
    Beta,
}

/// A single in-flight ripple. Immutable after creation; expiry removal is
/// the only destruction path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaveEvent {
    /// World-space origin, projected onto the stage surface at emission.
    pub origin: Vec3,
    pub start_time: f32,
    /// Front propagation speed, world units per second.
    pub speed: f32,
    pub wavelength: f32,
    pub amplitude: f32,
    /// Exponential decay rate over the event's age.
    pub damping: f32,
    /// Grace period kept after the front has crossed the whole field.
    pub hide_delay: f32,
    pub group: WaveGroup,
    /// Set when no stage surface was found below the requested emission
    /// point and the raw position was used instead. Still sampleable;
    /// physics-critical consumers may choose to skip degraded events.
    pub degraded: bool,
}

impl WaveEvent {
    #[inline]
    pub fn age(&self, now: f32) -> f32 {
        now - self.start_time
    }

    /// Radius the front has expanded to at `now`.
    #[inline]
    pub fn front_radius(&self, now: f32) -> f32 {
        self.age(now).max(0.0) * self.speed
    }

    /// Age past which the event can no longer influence any point of a field
    /// with the given maximum traversal distance.
    pub fn lifetime(&self, max_traversal: f32) -> f32 {
        self.hide_delay + max_traversal / self.speed + self.hide_delay
    }

    pub fn expired(&self, now: f32, max_traversal: f32) -> bool {
        self.age(now) > self.lifetime(max_traversal)
    }

    /// Whether the front has reached `point` at `now`.
    #[inline]
    pub fn reaches(&self, point: Vec3, now: f32) -> bool {
        self.age(now) >= 0.0 && point.distance(self.origin) <= self.front_radius(now)
    }

    /// Height contribution at `point`, zero until the front arrives.
    pub fn contribution(&self, point: Vec3, now: f32) -> f32 {
        let dt = self.age(now);
        if dt < 0.0 {
            return 0.0;
        }
        let front = dt * self.speed;
        let dist = point.distance(self.origin);
        if dist > front {
            return 0.0;
        }
        let phase = (front - dist) / self.wavelength * (2.0 * PI);
        self.amplitude * phase.sin() * (-self.damping * dt).exp()
    }
}
