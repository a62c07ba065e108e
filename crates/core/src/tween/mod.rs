//! Tweening primitives shared by the intro and the gallery.
//!
//! A [`Tween`] interpolates one scalar from `from` to `to` over a duration
//! with an [`Easing`] curve. Staggered groups are expressed as per-target
//! delays derived from a [`StaggerOrder`], which decides the order targets
//! start in.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

/// Easing curves used by the portfolio animations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Quadratic ease-in.
    Power2In,
    /// Quadratic ease-out.
    Power2Out,
    /// CSS style `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier(f32, f32, f32, f32),
}

/// Curve the gallery cylinder rotates with.
pub const GALLERY_EASING: Easing = Easing::CubicBezier(0.25, 0.46, 0.45, 0.94);

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` onto the curve.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::Power2In => t * t,
            Easing::Power2Out => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                if t <= 0.0 || t >= 1.0 {
                    return t;
                }
                let u = solve_bezier_parameter(t, x1, x2);
                bezier_component(u, y1, y2)
            }
        }
    }
}

fn bezier_component(u: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - u;
    3.0 * inv * inv * u * p1 + 3.0 * inv * u * u * p2 + u * u * u
}

/// Finds the curve parameter whose x coordinate equals `x`. The x component is
/// monotonic for control points in `[0, 1]`, so bisection always converges.
fn solve_bezier_parameter(x: f32, x1: f32, x2: f32) -> f32 {
    let mut low = 0.0_f32;
    let mut high = 1.0_f32;
    for _ in 0..32 {
        let mid = (low + high) * 0.5;
        let estimate = bezier_component(mid, x1, x2);
        if (estimate - x).abs() < 1e-6 {
            return mid;
        }
        if estimate < x {
            low = mid;
        } else {
            high = mid;
        }
    }
    (low + high) * 0.5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenStatus {
    Running,
    Finished,
}

/// A single scalar animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    delay: f32,
    easing: Easing,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            delay: 0.0,
            easing,
            elapsed: 0.0,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Total time from creation until the tween settles.
    pub fn total_duration(&self) -> f32 {
        self.delay + self.duration
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total_duration()
    }

    pub fn value(&self) -> f32 {
        self.value_at(self.elapsed)
    }

    /// Value at an absolute time since the tween was created.
    pub fn value_at(&self, elapsed: f32) -> f32 {
        let active = elapsed - self.delay;
        if active <= 0.0 {
            return self.from;
        }
        if self.duration <= f32::EPSILON || active >= self.duration {
            return self.to;
        }
        let eased = self.easing.apply(active / self.duration);
        self.from + (self.to - self.from) * eased
    }

    pub fn advance(&mut self, delta: f32) -> TweenStatus {
        self.elapsed = (self.elapsed + delta.max(0.0)).min(self.total_duration());
        if self.is_finished() {
            TweenStatus::Finished
        } else {
            TweenStatus::Running
        }
    }

    /// Replaces the destination, restarting from the current value so the
    /// animation never jumps.
    pub fn retarget(&mut self, to: f32) {
        self.from = self.value();
        self.to = to;
        self.delay = 0.0;
        self.elapsed = 0.0;
    }
}

/// Decides the order in which a staggered group of targets starts.
///
/// Implementations return a permutation of `0..count`: element `k` is the
/// target that starts `k`-th.
pub trait StaggerOrder {
    fn order(&mut self, count: usize) -> Vec<usize>;
}

/// Targets start in index order.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialOrder;

impl StaggerOrder for SequentialOrder {
    fn order(&mut self, count: usize) -> Vec<usize> {
        (0..count).collect()
    }
}

/// Targets start in a shuffled order.
#[derive(Debug)]
pub struct RandomOrder {
    rng: StdRng,
}

impl RandomOrder {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl StaggerOrder for RandomOrder {
    fn order(&mut self, count: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..count).collect();
        order.shuffle(&mut self.rng);
        order
    }
}

/// Per-target start delays for a stagger with fixed spacing.
///
/// `delays[target]` is `base + rank * each`, where `rank` is the target's
/// position in `order`.
pub fn stagger_delays(order: &[usize], base: f32, each: f32) -> Vec<f32> {
    let mut delays = vec![base; order.len()];
    for (rank, &target) in order.iter().enumerate() {
        if let Some(slot) = delays.get_mut(target) {
            *slot = base + rank as f32 * each;
        }
    }
    delays
}
