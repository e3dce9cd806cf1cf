//! Darkness scalar field.
//!
//! Every pixel carries a 0..1 darkness driven by its distance to the
//! nearest surface pixel: 0 at the surface, approaching 1 at a nominal
//! radius deep. Rendering multiplies colors by the complement, so digging
//! visibly peels light into the body.

use std::time::{Duration, Instant};

use super::Body;

/// Wall-clock throttle for the darkness pass, which is
/// O(pixels x surface) and far too heavy to run every tick.
///
/// Callers pass `now` in; the clock never reads the system time itself,
/// so tests can drive it with fabricated instants.
#[derive(Debug, Clone)]
pub struct DarknessClock {
    min_interval: Duration,
    last_run: Option<Instant>,
}

impl DarknessClock {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_run: None,
        }
    }

    /// True when the interval has elapsed (or the clock never ran). Arms
    /// the clock as a side effect, so call it only when a `true` answer
    /// will actually be acted on.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last_run {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_run = Some(now);
                true
            }
        }
    }

    /// Record a run that happened outside [`DarknessClock::due`].
    pub fn mark(&mut self, now: Instant) {
        self.last_run = Some(now);
    }
}

/// Recompute darkness for every pixel.
///
/// `darkness = 2d/r - d^2/r^2` clamped to 0..1, where `d` is the distance
/// to the closest surface pixel and `r` the body's nominal radius. The
/// curve steepens near the surface, so shallow digging reveals quickly
/// while the deep interior stays pinned near full darkness. Surface
/// pixels themselves sit at exactly 0.
pub(crate) fn recompute(body: &mut Body) {
    let surface: Vec<glam::Vec2> = body
        .surface
        .iter()
        .filter_map(|&key| body.pixels.get(key))
        .map(|px| px.position().as_vec2())
        .collect();
    if surface.is_empty() {
        return;
    }

    let inv_r = 1.0 / body.nominal_radius;
    for (_, px) in body.pixels.iter_mut() {
        let pos = px.position().as_vec2();
        let mut closest = f32::INFINITY;
        for anchor in &surface {
            let dist = pos.distance_squared(*anchor);
            if dist < closest {
                closest = dist;
            }
        }
        let d = closest.sqrt();
        let raw = 2.0 * d * inv_r - (d * inv_r) * (d * inv_r);
        px.darkness = raw.clamp(0.0, 1.0);
    }
}
