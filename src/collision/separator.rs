use tracing::warn;

use crate::bodies::Body;
use crate::collision::resolver::center_distance;
use crate::core::{Arena, SimulationConfig};
use crate::math::Vector2;

/// Outcome of pushing an overlapping pair apart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    /// Number of nudges applied
    pub iterations: u32,

    /// Centre distance after the last nudge
    pub distance: f64,

    /// Whether the distance ended above the threshold
    pub separated: bool,
}

/// Iterative positional correction for pairs that still overlap after their
/// velocities were resolved.
///
/// Each iteration moves both anchors along their new velocities and measures
/// again. The loop ends once the centres are further apart than `threshold`
/// or after `max_iterations` nudges, whichever comes first; residual overlap
/// after the cap is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separator {
    pub threshold: f64,
    pub max_iterations: u32,
}

impl Separator {
    pub fn new(threshold: f64, max_iterations: u32) -> Self {
        Self { threshold, max_iterations }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.separation_threshold, config.separation_max_iterations)
    }

    /// Per-axis displacement for one iteration: the velocity component,
    /// limited by the same component of the velocity direction scaled to `reach`
    pub fn nudge(velocity: Vector2, reach: f64) -> Vector2 {
        let direction = velocity.normalize();
        Vector2::new(
            velocity.x.min(reach * direction.x),
            velocity.y.min(reach * direction.y),
        )
    }

    /// Pushes `a` and `b` apart along `v1` and `v2`
    pub fn unstick(&self, a: &mut Body, b: &mut Body, v1: Vector2, v2: Vector2, arena: &Arena) -> Separation {
        let reach = a.size().x + b.size().x;
        let step_a = Self::nudge(v1, reach);
        let step_b = Self::nudge(v2, reach);

        let mut distance = center_distance(a, b);
        let mut iterations = 0;
        while distance <= self.threshold && iterations < self.max_iterations {
            a.translate(step_a, arena);
            b.translate(step_b, arena);
            distance = center_distance(a, b);
            iterations += 1;
        }

        let separated = distance > self.threshold;
        if !separated {
            warn!(
                body_a = a.name(),
                body_b = b.name(),
                distance,
                iterations,
                "separation stopped at iteration cap with residual overlap"
            );
        }
        Separation { iterations, distance, separated }
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::new(40.0, 6)
    }
}
