use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// The bounded plane every body lives in, plus the rules applied when a
/// vertex is written
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Arena {
    /// Width of the arena; x coordinates live in `[0, width - body width]`
    pub width: f64,

    /// Height of the arena; y coordinates live in `[0, height - body height]`
    pub height: f64,

    /// Lowest allowed value for a momentum component
    pub velocity_low: f64,

    /// Highest allowed value for a momentum component
    pub velocity_high: f64,

    /// Factor applied to a momentum component when it bounces off a wall
    pub restitution: f64,
}

impl Arena {
    /// Creates an arena with the default velocity limits and a perfect bounce
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Largest anchor coordinate for a body of the given size
    pub fn upper_bound(&self, size: Vector2) -> Vector2 {
        Vector2::new(
            (self.width - size.x).max(0.0),
            (self.height - size.y).max(0.0),
        )
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 1024.0,
            velocity_low: -15.0,
            velocity_high: 15.0,
            restitution: 1.0,
        }
    }
}

/// Parameters for splitting a body into fragments
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct FragmentationConfig {
    /// Number of fragments spawned per explosion
    pub fragment_count: usize,

    /// Edge length of a fragment
    pub fragment_size: f64,

    /// Open range fragment masses are drawn from
    pub mass_range: (f64, f64),

    /// Fragment velocity components are drawn from `(-speed_range, speed_range)`
    pub speed_range: f64,

    /// Bodies lighter than this never fragment
    pub indivisible_below: f64,

    /// Seconds a fragment lives before it decays
    pub decay_after: f64,

    /// Relative approach speed at which colliding bodies explode (disabled when `None`)
    pub impact_speed: Option<f64>,
}

impl Default for FragmentationConfig {
    fn default() -> Self {
        Self {
            fragment_count: 1,
            fragment_size: 4.0,
            mass_range: (0.1, 0.9),
            speed_range: 10.0,
            indivisible_below: 1.0,
            decay_after: 20.0,
            impact_speed: None,
        }
    }
}

/// Parameters for the squash-and-stretch animation played after impacts
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct DeformationConfig {
    /// Seconds each curve frame stays on screen
    pub frame_interval: f64,

    /// Start an animation on both bodies of every resolved collision
    pub on_collision: bool,
}

impl Default for DeformationConfig {
    fn default() -> Self {
        Self {
            frame_interval: 0.01,
            on_collision: false,
        }
    }
}

/// Configuration parameters for the collision simulation
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Arena bounds and vertex write rules
    pub arena: Arena,

    /// Multiplier applied to velocity during position integration
    pub friction: f64,

    /// Centre distance above which a stuck pair counts as separated
    pub separation_threshold: f64,

    /// Maximum number of nudges the separator applies to one pair
    pub separation_max_iterations: u32,

    /// Offset added to the first centre when two centres coincide exactly
    pub coincident_offset: Vector2,

    /// Flip the y component of resolved velocities (screen space vs math space)
    pub invert_y: bool,

    /// Run the trigonometric resolver next to the angle-free one and log disagreement
    pub cross_check: bool,

    /// Largest component difference tolerated by the cross-check
    pub cross_check_tolerance: f64,

    /// Fragment spawning parameters
    pub fragmentation: FragmentationConfig,

    /// Impact deformation parameters
    pub deformation: DeformationConfig,

    /// Seed for the world's random number generator
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Checks that the configuration describes a usable simulation
    pub fn validate(&self) -> Result<()> {
        let arena = &self.arena;
        if !(arena.width > 0.0 && arena.height > 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "arena dimensions must be positive, got {}x{}",
                arena.width, arena.height
            )));
        }
        if !(arena.velocity_low < arena.velocity_high) {
            return Err(PhysicsError::InvalidArgument(format!(
                "velocity limits are inverted: [{}, {}]",
                arena.velocity_low, arena.velocity_high
            )));
        }
        if !self.friction.is_finite() || !self.coincident_offset.is_finite() {
            return Err(PhysicsError::InvalidArgument(
                "friction and coincident offset must be finite".to_string(),
            ));
        }
        if !(self.separation_threshold >= 0.0 && self.separation_threshold.is_finite()) {
            return Err(PhysicsError::InvalidArgument(format!(
                "separation threshold must be finite and non-negative, got {}",
                self.separation_threshold
            )));
        }
        if self.coincident_offset.is_zero() {
            return Err(PhysicsError::InvalidArgument(
                "coincident offset cannot be zero".to_string(),
            ));
        }

        let fragments = &self.fragmentation;
        if !(fragments.fragment_size > 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "fragment size must be positive, got {}",
                fragments.fragment_size
            )));
        }
        let (low, high) = fragments.mass_range;
        if !(low > 0.0 && low < high && high.is_finite()) {
            return Err(PhysicsError::InvalidArgument(format!(
                "fragment mass range ({}, {}) is empty, unbounded or not positive",
                low, high
            )));
        }
        if !(fragments.speed_range >= 0.0 && fragments.speed_range.is_finite()) {
            return Err(PhysicsError::InvalidArgument(format!(
                "fragment speed range must be finite and non-negative, got {}",
                fragments.speed_range
            )));
        }
        if !(fragments.decay_after >= 0.0) {
            return Err(PhysicsError::InvalidArgument(
                "fragment decay time must be non-negative".to_string(),
            ));
        }
        if !(self.deformation.frame_interval > 0.0) {
            return Err(PhysicsError::InvalidArgument(
                "deformation frame interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            friction: 1.0,
            separation_threshold: 40.0,
            separation_max_iterations: 6,
            coincident_offset: Vector2::new(0.1, 0.1),
            invert_y: false,
            cross_check: false,
            cross_check_tolerance: 1.0e-4,
            fragmentation: FragmentationConfig::default(),
            deformation: DeformationConfig::default(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_velocity_limits_are_rejected() {
        let mut config = SimulationConfig::default();
        config.arena.velocity_low = 5.0;
        config.arena.velocity_high = -5.0;
        assert!(matches!(config.validate(), Err(PhysicsError::InvalidArgument(_))));
    }

    #[test]
    fn empty_fragment_mass_range_is_rejected() {
        let mut config = SimulationConfig::default();
        config.fragmentation.mass_range = (0.5, 0.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn unbounded_fragment_ranges_are_rejected() {
        let mut config = SimulationConfig::default();
        config.fragmentation.speed_range = f64::INFINITY;
        assert!(matches!(config.validate(), Err(PhysicsError::InvalidArgument(_))));

        let mut config = SimulationConfig::default();
        config.fragmentation.speed_range = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.fragmentation.mass_range = (0.5, f64::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn separation_threshold_must_be_finite() {
        for threshold in [f64::INFINITY, f64::NAN, -1.0] {
            let mut config = SimulationConfig::default();
            config.separation_threshold = threshold;
            assert!(matches!(config.validate(), Err(PhysicsError::InvalidArgument(_))));
        }
        let mut config = SimulationConfig::default();
        config.separation_threshold = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn upper_bound_subtracts_body_size() {
        let arena = Arena::new(100.0, 80.0);
        assert_eq!(arena.upper_bound(Vector2::new(10.0, 20.0)), Vector2::new(90.0, 60.0));
    }
}
