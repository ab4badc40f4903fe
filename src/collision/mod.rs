mod collision_pair;
mod engine;
pub mod resolver;
mod separator;

pub use self::collision_pair::CollisionPair;
pub use self::engine::CollisionEngine;
pub use self::resolver::{
    approach_speed, center_distance, contact_angle, intersects, momentum_angle_free,
    momentum_trigonometry, theta_angle, trigonometric_components, Collider, CollisionVectors,
    ResolverOptions, COINCIDENT_OFFSET,
};
pub use self::separator::{Separation, Separator};
