pub mod world;
pub mod config;
pub mod storage;
pub mod events;
mod registry;
mod scheduler;
mod shared;

pub use self::world::{PhysicsWorld, WorldTask};
pub use self::config::{Arena, DeformationConfig, FragmentationConfig, SimulationConfig};
pub use self::storage::{BodyStorage, Storage};
pub use self::events::{BodyEvent, BodyEventType, CollisionEvent, EventQueue};
pub use self::registry::BodyRegistry;
pub use self::scheduler::TaskScheduler;
pub use self::shared::SharedWorld;

use std::fmt;

/// A unique identifier for a body in the physics world.
///
/// Slots are reused after removal; the generation tells a stale handle
/// apart from the body that took its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the body storage
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}
