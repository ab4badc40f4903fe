use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::Arena;
use crate::math::{clamp, Vector2};
use crate::Result;

/// Identifier of a vertex, unique for the lifetime of the process
pub type VertexId = u64;

static NEXT_VERTEX_ID: AtomicU64 = AtomicU64::new(1);

fn next_vertex_id() -> VertexId {
    NEXT_VERTEX_ID.fetch_add(1, Ordering::Relaxed)
}

/// One side of the arena along a single axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wall {
    /// The zero coordinate
    Lower,
    /// The arena extent minus the body size
    Upper,
}

/// Result of writing one coordinate through the wall-bounce rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisReflection {
    /// The coordinate after clamping
    pub value: f64,

    /// The momentum component after any bounce
    pub momentum: f64,

    /// The wall the coordinate was clamped against, if any
    pub wall: Option<Wall>,

    /// Whether the momentum component was negated by this write
    pub reflected: bool,
}

/// Applies the wall-bounce rule to a single axis.
///
/// A coordinate outside `[0, upper]` is snapped to the violated bound. The
/// momentum component is negated (and scaled by `restitution`) on the first
/// write that lands on that wall, tracked through `pinned`. Further writes
/// against the same wall only negate again if the momentum points back into
/// the wall, so repeating an out-of-range write never flips the sign twice.
pub fn reflect_axis(
    value: f64,
    upper: f64,
    momentum: f64,
    restitution: f64,
    pinned: Option<Wall>,
) -> AxisReflection {
    let (clamped, wall) = if value < 0.0 {
        (0.0, Some(Wall::Lower))
    } else if value > upper {
        (upper, Some(Wall::Upper))
    } else {
        (value, None)
    };

    let reflected = match wall {
        Some(hit) => {
            let pushing_outward = match hit {
                Wall::Lower => momentum < 0.0,
                Wall::Upper => momentum > 0.0,
            };
            pinned != Some(hit) || pushing_outward
        }
        None => false,
    };

    AxisReflection {
        value: clamped,
        momentum: if reflected { -momentum * restitution } else { momentum },
        wall,
        reflected,
    }
}

/// Which axes bounced during a vertex write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reflection {
    pub x: bool,
    pub y: bool,
}

impl Reflection {
    /// Returns true if either axis bounced
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// A point in the arena carrying a velocity ("momentum")
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    id: VertexId,
    position: Vector2,
    momentum: Vector2,
    pinned: [Option<Wall>; 2],
}

impl Vertex {
    /// Creates a vertex at rest. The position is taken as given; use
    /// [`Vertex::set_position`] to apply arena bounds.
    pub fn new(position: Vector2) -> Self {
        Self {
            id: next_vertex_id(),
            position,
            momentum: Vector2::zero(),
            pinned: [None, None],
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn momentum(&self) -> Vector2 {
        self.momentum
    }

    /// Sets the x coordinate inside `[0, upper]`, bouncing the x momentum on a crossing
    pub fn set_x(&mut self, x: f64, upper: f64, arena: &Arena) -> bool {
        self.write_axis(0, x, upper, arena)
    }

    /// Sets the y coordinate inside `[0, upper]`, bouncing the y momentum on a crossing
    pub fn set_y(&mut self, y: f64, upper: f64, arena: &Arena) -> bool {
        self.write_axis(1, y, upper, arena)
    }

    /// Moves the vertex to `position`, keeping the anchor inside `[0, bound]` per axis
    pub fn set_position(&mut self, position: Vector2, bound: Vector2, arena: &Arena) -> Reflection {
        Reflection {
            x: self.set_x(position.x, bound.x, arena),
            y: self.set_y(position.y, bound.y, arena),
        }
    }

    /// Moves the vertex by `delta` under the same rules as [`Vertex::set_position`]
    pub fn translate(&mut self, delta: Vector2, bound: Vector2, arena: &Arena) -> Reflection {
        self.set_position(self.position + delta, bound, arena)
    }

    /// Replaces the momentum, clamping each component to the arena's velocity limits
    pub fn set_momentum(&mut self, momentum: Vector2, arena: &Arena) {
        self.momentum = Vector2::new(
            clamp(momentum.x, arena.velocity_low, arena.velocity_high),
            clamp(momentum.y, arena.velocity_low, arena.velocity_high),
        );
    }

    /// Reads a momentum component by index (0 = x, 1 = y)
    pub fn momentum_component(&self, index: usize) -> Result<f64> {
        self.momentum.component(index)
    }

    /// Writes a momentum component by index, clamped to the arena's velocity limits
    pub fn set_momentum_component(&mut self, index: usize, value: f64, arena: &Arena) -> Result<()> {
        let mut momentum = self.momentum;
        momentum.set_component(index, value)?;
        self.set_momentum(momentum, arena);
        Ok(())
    }

    fn write_axis(&mut self, axis: usize, value: f64, upper: f64, arena: &Arena) -> bool {
        let (current, momentum) = match axis {
            0 => (&mut self.position.x, self.momentum.x),
            _ => (&mut self.position.y, self.momentum.y),
        };

        let outcome = reflect_axis(value, upper, momentum, arena.restitution, self.pinned[axis]);
        *current = outcome.value;
        self.pinned[axis] = outcome.wall;

        if outcome.reflected {
            let mut bounced = self.momentum;
            match axis {
                0 => bounced.x = outcome.momentum,
                _ => bounced.y = outcome.momentum,
            }
            self.set_momentum(bounced, arena);
        }
        outcome.reflected
    }
}

/// Builds a vertex from a plain coordinate pair
pub fn vertex_from_pair(x: f64, y: f64) -> Vertex {
    Vertex::new(Vector2::new(x, y))
}
