pub mod math;
pub mod core;
pub mod bodies;
pub mod collision;
pub mod effects;

/// Re-export common types for easier usage
pub use crate::core::{BodyHandle, PhysicsWorld, SharedWorld, SimulationConfig};
pub use crate::bodies::Body;
pub use crate::collision::{Collider, CollisionVectors};
pub use crate::math::Vector2;

/// Error types for the collision engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        #[error("Invalid argument: {0}")]
        InvalidArgument(String),

        #[error("Component index {0} out of range")]
        IndexOutOfRange(usize),

        #[error("Duplicate body name: {0}")]
        DuplicateName(String),

        #[error("Lookup failed: {0}")]
        LookupFailed(String),
    }
}

/// Result type for collision engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
