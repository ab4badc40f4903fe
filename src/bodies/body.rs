use crate::bodies::body_flags::BodyFlags;
use crate::bodies::vertex::{Reflection, Vertex, VertexId};
use crate::core::Arena;
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

/// Visual scale factors applied by the renderer.
///
/// `1.0` is the rest shape; values in `(0, 1)` compress the body and values
/// slightly above `1.0` describe the rebound overshoot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deformation {
    pub x: f64,
    pub y: f64,
}

impl Default for Deformation {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// A rectangle body positioned by its top-left anchor vertex.
///
/// Collision treats the body as a circle whose diameter is the rectangle's
/// width, centred on [`Body::center`].
#[derive(Debug, Clone)]
pub struct Body {
    /// Top-left corner, carries the velocity
    anchor: Vertex,

    /// Width and height
    size: Vector2,

    mass: f64,

    /// Unique among live bodies
    name: String,

    deformation: Deformation,

    flags: BodyFlags,
}

impl Body {
    /// Creates a body at rest. The anchor is clamped into the arena.
    pub fn new(
        position: Vector2,
        size: Vector2,
        mass: f64,
        name: impl Into<String>,
        arena: &Arena,
    ) -> Result<Self> {
        let name = name.into();
        if !position.is_finite() {
            return Err(PhysicsError::InvalidArgument(format!(
                "body '{}' position must be finite, got {}",
                name, position
            )));
        }
        if !(size.x > 0.0 && size.y > 0.0) || !size.is_finite() {
            return Err(PhysicsError::InvalidArgument(format!(
                "body '{}' size must be positive, got {}",
                name, size
            )));
        }
        if !(mass > 0.0) || !mass.is_finite() {
            return Err(PhysicsError::InvalidArgument(format!(
                "body '{}' mass must be positive, got {}",
                name, mass
            )));
        }

        let mut anchor = Vertex::new(Vector2::zero());
        anchor.set_position(position, arena.upper_bound(size), arena);

        Ok(Self {
            anchor,
            size,
            mass,
            name,
            deformation: Deformation::default(),
            flags: BodyFlags::empty(),
        })
    }

    /// Returns the anchor (top-left) position
    pub fn position(&self) -> Vector2 {
        self.anchor.position()
    }

    /// Returns the geometric centre, `anchor + size / 2`
    pub fn center(&self) -> Vector2 {
        self.anchor.position() + self.size / 2.0
    }

    /// Returns the stored velocity
    pub fn velocity(&self) -> Vector2 {
        self.anchor.momentum()
    }

    pub fn size(&self) -> Vector2 {
        self.size
    }

    /// Radius of the circle used for overlap tests
    pub fn half_width(&self) -> f64 {
        self.size.x / 2.0
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn anchor(&self) -> &Vertex {
        &self.anchor
    }

    pub fn vertex_id(&self) -> VertexId {
        self.anchor.id()
    }

    pub fn deformation(&self) -> Deformation {
        self.deformation
    }

    /// Sets the visual scale factors. Both must be finite and positive.
    pub fn set_deformation(&mut self, x: f64, y: f64) -> Result<()> {
        if !(x > 0.0 && y > 0.0) || !x.is_finite() || !y.is_finite() {
            return Err(PhysicsError::InvalidArgument(format!(
                "deformation of '{}' must be positive, got ({}, {})",
                self.name, x, y
            )));
        }
        self.deformation = Deformation { x, y };
        Ok(())
    }

    /// Writes a deformation already known to be positive and finite
    pub(crate) fn apply_deformation(&mut self, deformation: Deformation) {
        self.deformation = deformation;
    }

    /// Restores the rest shape
    pub fn reset_deformation(&mut self) {
        self.deformation = Deformation::default();
    }

    pub fn flags(&self) -> BodyFlags {
        self.flags
    }

    pub(crate) fn insert_flags(&mut self, flags: BodyFlags) {
        self.flags.insert(flags);
    }

    pub(crate) fn remove_flags(&mut self, flags: BodyFlags) {
        self.flags.remove(flags);
    }

    /// Returns true if the body is too light to break into fragments
    pub fn is_indivisible(&self, threshold: f64) -> bool {
        self.mass < threshold
    }

    /// Moves the anchor, applying the wall-bounce rule
    pub fn set_position(&mut self, position: Vector2, arena: &Arena) -> Reflection {
        self.anchor.set_position(position, arena.upper_bound(self.size), arena)
    }

    /// Displaces the anchor, applying the wall-bounce rule
    pub fn translate(&mut self, delta: Vector2, arena: &Arena) -> Reflection {
        self.anchor.translate(delta, arena.upper_bound(self.size), arena)
    }

    /// Replaces the velocity, clamped to the arena's velocity limits
    pub fn set_velocity(&mut self, velocity: Vector2, arena: &Arena) {
        self.anchor.set_momentum(velocity, arena);
    }

    /// Writes one velocity component by index (0 = x, 1 = y)
    pub fn set_velocity_component(&mut self, index: usize, value: f64, arena: &Arena) -> Result<()> {
        self.anchor.set_momentum_component(index, value, arena)
    }
}
