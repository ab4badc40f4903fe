use rand::Rng;
use tracing::{debug, info};

use crate::bodies::{Body, BodyFlags};
use crate::core::{Arena, BodyHandle, BodyRegistry, FragmentationConfig};
use crate::math::Vector2;
use crate::Result;

/// Result of an [`explode`] call
#[derive(Debug, Clone)]
pub struct Fragmentation {
    /// The destroyed body, `None` when it was indivisible and left untouched
    pub parent: Option<Body>,

    /// Fragments registered in its place
    pub fragments: Vec<BodyHandle>,
}

impl Fragmentation {
    /// Whether the parent was actually destroyed
    pub fn exploded(&self) -> bool {
        self.parent.is_some()
    }
}

/// Name given to the `serial`-th fragment of `parent`
pub fn fragment_name(parent: &str, serial: u64) -> String {
    format!("{}#{}", parent, serial)
}

/// Destroys a body and spawns fragments at its centre.
///
/// A body lighter than `config.indivisible_below` is left in place and no
/// fragment is created. Fragments are tagged [`BodyFlags::FRAGMENT`], get a
/// random mass from `config.mass_range` and random velocity components in
/// `[-config.speed_range, config.speed_range]`. `serial` numbers fragment
/// names and is advanced for every fragment created.
pub fn explode<R: Rng>(
    registry: &mut BodyRegistry,
    handle: BodyHandle,
    config: &FragmentationConfig,
    arena: &Arena,
    rng: &mut R,
    serial: &mut u64,
) -> Result<Fragmentation> {
    let body = registry.get(handle)?;
    if body.is_indivisible(config.indivisible_below) {
        debug!(body = body.name(), mass = body.mass(), "indivisible body left intact");
        return Ok(Fragmentation {
            parent: None,
            fragments: Vec::new(),
        });
    }

    let parent = registry.remove(handle)?;
    let origin = parent.center();
    let size = Vector2::new(config.fragment_size, config.fragment_size);
    let (mass_low, mass_high) = config.mass_range;

    let mut fragments = Vec::with_capacity(config.fragment_count);
    for _ in 0..config.fragment_count {
        let mut name = fragment_name(parent.name(), *serial);
        *serial += 1;
        while registry.contains_name(&name) {
            name = fragment_name(parent.name(), *serial);
            *serial += 1;
        }

        let mass = rng.gen_range(mass_low..mass_high);
        let velocity = Vector2::new(
            rng.gen_range(-config.speed_range..=config.speed_range),
            rng.gen_range(-config.speed_range..=config.speed_range),
        );

        let mut fragment = Body::new(origin, size, mass, name, arena)?;
        fragment.set_velocity(velocity, arena);
        fragment.insert_flags(BodyFlags::FRAGMENT);
        fragments.push(registry.insert(fragment)?);
    }

    info!(
        body = parent.name(),
        fragments = fragments.len(),
        "body exploded"
    );
    Ok(Fragmentation {
        parent: Some(parent),
        fragments,
    })
}
