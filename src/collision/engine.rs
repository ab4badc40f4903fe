use tracing::{debug, warn};

use crate::collision::resolver::{
    approach_speed, center_distance, intersects, momentum_angle_free, momentum_trigonometry,
    Collider, ResolverOptions,
};
use crate::collision::separator::Separator;
use crate::core::{Arena, BodyHandle, BodyRegistry, CollisionEvent, SimulationConfig};

/// Exhaustive pairwise collision sweep.
///
/// Every unordered pair of live bodies is visited once, in registry order.
/// Intersecting pairs get their velocities replaced by the angle-free
/// resolver, are displaced by the new velocity, and are handed to the
/// [`Separator`] if they still overlap. Pairs are processed one after the
/// other, so a body touching two others sees the first collision's result
/// when the second one is resolved.
#[derive(Debug, Clone)]
pub struct CollisionEngine {
    separator: Separator,
    options: ResolverOptions,
    cross_check_tolerance: Option<f64>,
}

impl CollisionEngine {
    pub fn new(separator: Separator, options: ResolverOptions) -> Self {
        Self {
            separator,
            options,
            cross_check_tolerance: None,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        let options = ResolverOptions {
            invert: config.invert_y,
            coincident_offset: config.coincident_offset,
        };
        let mut engine = Self::new(Separator::from_config(config), options);
        if config.cross_check {
            engine.cross_check_tolerance = Some(config.cross_check_tolerance);
        }
        engine
    }

    /// Also runs the trigonometric resolver on every pair and logs when the two
    /// methods disagree by more than `tolerance`
    pub fn with_cross_check(mut self, tolerance: f64) -> Self {
        self.cross_check_tolerance = Some(tolerance);
        self
    }

    pub fn separator(&self) -> &Separator {
        &self.separator
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Runs one sweep over the registry and returns the resolved collisions
    pub fn detect(&self, registry: &mut BodyRegistry, arena: &Arena) -> Vec<CollisionEvent> {
        let handles = registry.handles();
        let mut events = Vec::new();

        for (i, &a) in handles.iter().enumerate() {
            for &b in &handles[i + 1..] {
                if let Some(event) = self.resolve_pair(registry, a, b, arena) {
                    events.push(event);
                }
            }
        }
        events
    }

    fn resolve_pair(
        &self,
        registry: &mut BodyRegistry,
        a: BodyHandle,
        b: BodyHandle,
        arena: &Arena,
    ) -> Option<CollisionEvent> {
        // a body may have left the registry since the handles were taken
        let (body_a, body_b) = registry.get_pair_mut(a, b).ok()?;
        if !intersects(body_a, body_b) {
            return None;
        }

        let c1 = Collider::from_body(body_a);
        let c2 = Collider::from_body(body_b);
        let impact_speed = approach_speed(&c1, &c2);
        let resolved = momentum_angle_free(&c1, &c2, self.options);

        if let Some(tolerance) = self.cross_check_tolerance {
            let check = momentum_trigonometry(&c1, &c2, self.options);
            let difference = resolved.max_difference(&check);
            if difference > tolerance {
                warn!(%a, %b, difference, "trigonometric and angle-free resolvers disagree");
            }
        }

        body_a.set_velocity(resolved.v1, arena);
        body_b.set_velocity(resolved.v2, arena);
        body_a.translate(resolved.v1, arena);
        body_b.translate(resolved.v2, arena);

        let separation = if center_distance(body_a, body_b) <= body_a.half_width() + body_b.half_width() {
            Some(self.separator.unstick(body_a, body_b, resolved.v1, resolved.v2, arena))
        } else {
            None
        };

        debug!(
            %a,
            %b,
            velocity_a = %resolved.v1,
            velocity_b = %resolved.v2,
            impact_speed,
            separated = separation.map(|s| s.separated),
            "collision resolved"
        );

        Some(CollisionEvent {
            body_a: a,
            body_b: b,
            velocity_a: resolved.v1,
            velocity_b: resolved.v2,
            impact_speed,
            separation,
        })
    }
}

impl Default for CollisionEngine {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}
