//! Optional effects layered on top of the collision core: explosions that
//! replace a body with fragments, and the squash-and-stretch animation
//! played after an impact.

mod deformation;
mod fragmentation;

pub use self::deformation::{DeformationAnimator, DeformationFrame, DEFORMATION_X, DEFORMATION_Y};
pub use self::fragmentation::{explode, fragment_name, Fragmentation};
