//! Post-collision velocities for two bodies.
//!
//! Two independent formulations of the same 2D elastic collision live here:
//! the trigonometric one decomposes each velocity into an angle and rotates
//! it onto the line of centres, the angle-free one works on the vectors
//! directly. Both conserve momentum and kinetic energy, and both are expected
//! to agree for any input.

use crate::bodies::Body;
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

/// Offset applied to the first centre when both centres coincide exactly
pub const COINCIDENT_OFFSET: Vector2 = Vector2::new(0.1, 0.1);

/// One side of a collision: velocity, mass and centre at the time of contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    velocity: Vector2,
    mass: f64,
    center: Vector2,
}

impl Collider {
    /// Creates a collider, rejecting a non-positive mass or non-finite vectors
    pub fn new(velocity: Vector2, mass: f64, center: Vector2) -> Result<Self> {
        if !(mass > 0.0) || !mass.is_finite() {
            return Err(PhysicsError::InvalidArgument(format!(
                "collider mass must be positive, got {}",
                mass
            )));
        }
        if !velocity.is_finite() || !center.is_finite() {
            return Err(PhysicsError::InvalidArgument(format!(
                "collider velocity {} and centre {} must be finite",
                velocity, center
            )));
        }
        Ok(Self { velocity, mass, center })
    }

    /// Snapshot of a body's current velocity, mass and centre
    pub fn from_body(body: &Body) -> Self {
        Self {
            velocity: body.velocity(),
            mass: body.mass(),
            center: body.center(),
        }
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn center(&self) -> Vector2 {
        self.center
    }
}

/// Velocities of both colliders after impact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionVectors {
    /// First collider's new velocity
    pub v1: Vector2,
    /// Second collider's new velocity
    pub v2: Vector2,
}

impl CollisionVectors {
    fn flip_y(self) -> Self {
        Self {
            v1: self.v1.flip_y(),
            v2: self.v2.flip_y(),
        }
    }

    /// Largest component difference between two results
    pub fn max_difference(&self, other: &Self) -> f64 {
        [
            self.v1.x - other.v1.x,
            self.v1.y - other.v1.y,
            self.v2.x - other.v2.x,
            self.v2.y - other.v2.y,
        ]
        .iter()
        .fold(0.0_f64, |acc, d| acc.max(d.abs()))
    }
}

/// Knobs shared by both resolution methods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverOptions {
    /// Negate the y component of both results, converting between the
    /// y-up math convention and a y-down screen
    pub invert: bool,

    /// Offset added to the first centre when both centres coincide
    pub coincident_offset: Vector2,
}

impl ResolverOptions {
    /// Options with the y-axis inversion enabled
    pub fn inverted() -> Self {
        Self {
            invert: true,
            ..Self::default()
        }
    }
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            invert: false,
            coincident_offset: COINCIDENT_OFFSET,
        }
    }
}

/// Distance between the centres of two bodies
pub fn center_distance(a: &Body, b: &Body) -> f64 {
    a.center().distance(&b.center())
}

/// Overlap test treating both bodies as circles of diameter equal to their width
pub fn intersects(a: &Body, b: &Body) -> bool {
    center_distance(a, b) <= a.half_width() + b.half_width()
}

/// Direction of a velocity in radians, in `[-PI, PI]`. A zero vector has angle 0.
pub fn theta_angle(vector: Vector2) -> f64 {
    if vector.x == 0.0 && vector.y == 0.0 {
        return 0.0;
    }
    vector.y.atan2(vector.x)
}

/// Contact angle: direction from the first centre to the second, in radians
pub fn contact_angle(x1: Vector2, x2: Vector2) -> f64 {
    (x2.y - x1.y).atan2(x2.x - x1.x)
}

/// Moves the first centre off the second when both are identical
fn distinct_centers(x1: Vector2, x2: Vector2, offset: Vector2) -> (Vector2, Vector2) {
    if x1 == x2 {
        (x1 + offset, x2)
    } else {
        (x1, x2)
    }
}

/// Velocity of one collider after impact, from the angle decomposition.
///
/// `speed`/`theta`/`mass` describe the collider being solved for,
/// `other_*` the collider it hits, `phi` is the contact angle.
pub fn trigonometric_components(
    speed: f64,
    theta: f64,
    mass: f64,
    other_speed: f64,
    other_theta: f64,
    other_mass: f64,
    phi: f64,
) -> Vector2 {
    let along = (speed * (theta - phi).cos() * (mass - other_mass)
        + 2.0 * other_mass * other_speed * (other_theta - phi).cos())
        / (mass + other_mass);
    let across = speed * (theta - phi).sin();

    let normal = Vector2::from_angle(phi);
    normal * along + normal.perpendicular() * across
}

/// Trigonometric method: rotate both velocities onto the line of centres,
/// solve the 1-D elastic collision there and rotate back
pub fn momentum_trigonometry(c1: &Collider, c2: &Collider, options: ResolverOptions) -> CollisionVectors {
    let (x1, x2) = distinct_centers(c1.center, c2.center, options.coincident_offset);
    let phi = contact_angle(x1, x2);
    let theta1 = theta_angle(c1.velocity);
    let theta2 = theta_angle(c2.velocity);
    let speed1 = c1.velocity.length();
    let speed2 = c2.velocity.length();

    let result = CollisionVectors {
        v1: trigonometric_components(speed1, theta1, c1.mass, speed2, theta2, c2.mass, phi),
        v2: trigonometric_components(speed2, theta2, c2.mass, speed1, theta1, c1.mass, phi),
    };
    if options.invert {
        result.flip_y()
    } else {
        result
    }
}

/// New velocity of the collider at `x1` in the angle-free form
fn angle_free_components(v1: Vector2, v2: Vector2, m1: f64, m2: f64, x1: Vector2, x2: Vector2) -> Vector2 {
    let x12 = x1 - x2;
    let distance_squared = x12.length_squared();
    if distance_squared == 0.0 || !distance_squared.is_finite() {
        return v1;
    }
    let mass = 2.0 * m2 / (m1 + m2);
    v1 - x12 * (mass * (v1 - v2).dot(&x12) / distance_squared)
}

/// Angle-free method: the same elastic collision expressed with dot products
/// on the centre offset, no angles involved
pub fn momentum_angle_free(c1: &Collider, c2: &Collider, options: ResolverOptions) -> CollisionVectors {
    let (x1, x2) = distinct_centers(c1.center, c2.center, options.coincident_offset);

    let result = CollisionVectors {
        v1: angle_free_components(c1.velocity, c2.velocity, c1.mass, c2.mass, x1, x2),
        v2: angle_free_components(c2.velocity, c1.velocity, c2.mass, c1.mass, x2, x1),
    };
    if options.invert {
        result.flip_y()
    } else {
        result
    }
}

/// Closing speed of the two colliders along the line of centres.
/// Positive when they approach each other.
pub fn approach_speed(c1: &Collider, c2: &Collider) -> f64 {
    let offset = c2.center - c1.center;
    if offset.is_zero() {
        return (c1.velocity - c2.velocity).length();
    }
    (c1.velocity - c2.velocity).dot(&offset.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn collider(vx: f64, vy: f64, mass: f64, cx: f64, cy: f64) -> Collider {
        Collider::new(Vector2::new(vx, vy), mass, Vector2::new(cx, cy)).unwrap()
    }

    #[test]
    fn theta_angle_of_zero_vector_is_exactly_zero() {
        assert_eq!(theta_angle(Vector2::zero()), 0.0);
        assert_eq!(theta_angle(Vector2::new(-0.0, -0.0)), 0.0);
    }

    #[test]
    fn theta_angle_matches_quadrants() {
        assert_abs_diff_eq!(theta_angle(Vector2::new(0.707, 0.707)), PI / 4.0, epsilon = 1e-3);
        assert_abs_diff_eq!(theta_angle(Vector2::new(-0.707, 0.707)), 3.0 * PI / 4.0, epsilon = 1e-3);
        assert_abs_diff_eq!(theta_angle(Vector2::new(-0.707, -0.707)), -3.0 * PI / 4.0, epsilon = 1e-3);
        assert_abs_diff_eq!(theta_angle(Vector2::new(0.0, -0.707)), -PI / 2.0, epsilon = 1e-3);
        for degrees in 0..=360 {
            let angle = theta_angle(Vector2::from_angle(crate::math::to_radians(degrees as f64)));
            assert!((-PI..=PI).contains(&angle));
        }
    }

    #[test]
    fn contact_angle_points_from_first_to_second() {
        let origin = Vector2::zero();
        assert_abs_diff_eq!(contact_angle(origin, Vector2::new(1.0, 0.0)), 0.0);
        assert_abs_diff_eq!(contact_angle(origin, Vector2::new(0.0, 0.5)), PI / 2.0);
        assert_abs_diff_eq!(contact_angle(origin, Vector2::new(0.0, -0.5)), -PI / 2.0);
    }

    #[test]
    fn collider_rejects_bad_mass() {
        assert!(matches!(
            Collider::new(Vector2::zero(), -1.0, Vector2::zero()),
            Err(PhysicsError::InvalidArgument(_))
        ));
        assert!(Collider::new(Vector2::new(f64::NAN, 0.0), 1.0, Vector2::zero()).is_err());
    }

    #[test]
    fn horizontal_head_on_swaps_velocities() {
        let c1 = collider(0.707, 0.0, 1.0, 0.0, 0.0);
        let c2 = collider(-0.707, 0.0, 1.0, 1.4142, 0.0);
        for result in [
            momentum_trigonometry(&c1, &c2, ResolverOptions::default()),
            momentum_angle_free(&c1, &c2, ResolverOptions::default()),
        ] {
            assert_abs_diff_eq!(result.v1.x, -0.707, epsilon = 1e-6);
            assert_abs_diff_eq!(result.v1.y, 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(result.v2.x, 0.707, epsilon = 1e-6);
            assert_abs_diff_eq!(result.v2.y, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn glancing_motion_is_untouched() {
        // both velocities perpendicular to the line of centres
        let c1 = collider(0.0, 2.0, 3.0, 0.0, 0.0);
        let c2 = collider(0.0, -1.0, 1.0, 5.0, 0.0);
        let result = momentum_angle_free(&c1, &c2, ResolverOptions::default());
        assert_abs_diff_eq!(result.v1.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.v1.y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.v2.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn approach_speed_is_positive_when_closing() {
        let c1 = collider(1.0, 0.0, 1.0, 0.0, 0.0);
        let c2 = collider(-1.0, 0.0, 1.0, 10.0, 0.0);
        assert_abs_diff_eq!(approach_speed(&c1, &c2), 2.0);
        assert_abs_diff_eq!(approach_speed(&c2, &c1), 2.0);
        let receding = collider(1.0, 0.0, 1.0, 10.0, 0.0);
        let chasing = collider(-1.0, 0.0, 1.0, 0.0, 0.0);
        assert!(approach_speed(&chasing, &receding) < 0.0);
    }
}
