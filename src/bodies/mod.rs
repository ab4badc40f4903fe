mod body;
mod vertex;

pub use self::body::{Body, Deformation};
pub use self::vertex::{reflect_axis, vertex_from_pair, AxisReflection, Reflection, Vertex, VertexId, Wall};
pub use self::body_flags::BodyFlags;

/// Flags describing a body's role in the simulation
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags describing a body's role in the simulation
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct BodyFlags: u32 {
            /// Body was spawned by an explosion
            const FRAGMENT = 0x01;

            /// Body has a pending timed removal
            const DECAYING = 0x02;

            /// Body is playing an impact deformation
            const DEFORMING = 0x04;
        }
    }
}
