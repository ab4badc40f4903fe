use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::bodies::{Body, BodyFlags, Reflection};
use crate::collision::{CollisionEngine, CollisionPair};
use crate::core::{
    Arena, BodyEvent, BodyEventType, BodyHandle, BodyRegistry, CollisionEvent, EventQueue,
    SimulationConfig, TaskScheduler,
};
use crate::effects::{self, DeformationAnimator, DeformationFrame, Fragmentation};
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

/// Timed work queued on the world's clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldTask {
    /// Remove a body on request of the caller
    Remove(BodyHandle),

    /// End of a fragment's life
    Decay(BodyHandle),
}

impl WorldTask {
    /// The body the task acts on
    pub fn handle(&self) -> BodyHandle {
        match *self {
            WorldTask::Remove(handle) | WorldTask::Decay(handle) => handle,
        }
    }
}

/// The main world type that owns every body and drives the simulation.
///
/// A frame is [`step`](Self::step) (pairwise collision sweep),
/// [`integrate`](Self::integrate) (move every body by its velocity) and
/// [`advance`](Self::advance) (run timed removals and deformation frames).
/// [`tick`](Self::tick) does all three.
pub struct PhysicsWorld {
    /// All live bodies, in insertion order
    registry: BodyRegistry,

    /// Configuration for the simulation
    config: SimulationConfig,

    engine: CollisionEngine,

    /// Queue of simulation events
    events: EventQueue,

    /// Removals waiting on the clock
    scheduler: TaskScheduler<WorldTask>,

    deformations: DeformationAnimator,

    /// Pairs that collided during the last step
    contacts: HashSet<CollisionPair>,

    rng: StdRng,

    /// The total elapsed simulation time
    time: f64,

    fragment_serial: u64,
    spawn_serial: u64,
}

impl PhysicsWorld {
    /// Creates a new world with default settings
    pub fn new() -> Self {
        Self::build(SimulationConfig::default())
    }

    /// Creates a new world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            width = config.arena.width,
            height = config.arena.height,
            seed = ?config.seed,
            "world created"
        );
        Self {
            registry: BodyRegistry::new(),
            engine: CollisionEngine::from_config(&config),
            deformations: DeformationAnimator::from_config(&config.deformation),
            config,
            events: EventQueue::new(),
            scheduler: TaskScheduler::new(),
            contacts: HashSet::new(),
            rng,
            time: 0.0,
            fragment_serial: 0,
            spawn_serial: 0,
        }
    }

    /// Returns the current simulation time
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Returns a reference to the simulation configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.config.arena
    }

    /// Creates a body at rest and registers it
    pub fn create_body(
        &mut self,
        position: Vector2,
        size: Vector2,
        mass: f64,
        name: impl Into<String>,
    ) -> Result<BodyHandle> {
        let body = Body::new(position, size, mass, name, &self.config.arena)?;
        self.add_body(body)
    }

    /// Registers an existing body
    pub fn add_body(&mut self, body: Body) -> Result<BodyHandle> {
        let name = body.name().to_string();
        let handle = self.registry.insert(body)?;
        info!(%handle, name = %name, "body added");
        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::Added,
            body: handle,
            name,
        });
        Ok(handle)
    }

    /// Creates a body at a random position with a random velocity whose
    /// components lie in `[-max_speed, max_speed]`
    pub fn spawn_random_body(&mut self, size: Vector2, mass: f64, max_speed: f64) -> Result<BodyHandle> {
        if !(max_speed >= 0.0) || !max_speed.is_finite() {
            return Err(PhysicsError::InvalidArgument(format!(
                "maximum speed must be non-negative, got {}",
                max_speed
            )));
        }
        let bound = self.config.arena.upper_bound(size);
        let position = Vector2::new(
            self.rng.gen_range(0.0..=bound.x),
            self.rng.gen_range(0.0..=bound.y),
        );
        let velocity = Vector2::new(
            self.rng.gen_range(-max_speed..=max_speed),
            self.rng.gen_range(-max_speed..=max_speed),
        );

        let mut name = format!("body-{}", self.spawn_serial);
        while self.registry.contains_name(&name) {
            self.spawn_serial += 1;
            name = format!("body-{}", self.spawn_serial);
        }
        self.spawn_serial += 1;

        let mut body = Body::new(position, size, mass, name, &self.config.arena)?;
        body.set_velocity(velocity, &self.config.arena);
        self.add_body(body)
    }

    /// Removes a body, dropping any timed work pending on it
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        let body = self.detach(handle)?;
        info!(%handle, name = body.name(), "body removed");
        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::Removed,
            body: handle,
            name: body.name().to_string(),
        });
        Ok(body)
    }

    /// Removes the live body with the given name
    pub fn remove_body_by_name(&mut self, name: &str) -> Result<Body> {
        let handle = self.registry.handle_by_name(name)?;
        self.remove_body(handle)
    }

    fn detach(&mut self, handle: BodyHandle) -> Result<Body> {
        let body = self.registry.remove(handle)?;
        self.scheduler.cancel(|task| task.handle() == handle);
        self.deformations.cancel(&mut self.registry, handle);
        self.contacts.retain(|pair| !pair.contains(handle));
        Ok(body)
    }

    /// Gets a reference to a body by its handle
    pub fn body(&self, handle: BodyHandle) -> Result<&Body> {
        self.registry.get(handle)
    }

    /// Gets a mutable reference to a body by its handle
    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.registry.get_mut(handle)
    }

    pub fn handle_by_name(&self, name: &str) -> Result<BodyHandle> {
        self.registry.handle_by_name(name)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.registry.contains(handle)
    }

    /// Live bodies in insertion order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.registry.iter()
    }

    pub fn body_count(&self) -> usize {
        self.registry.len()
    }

    /// Read access to the underlying registry
    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    /// Sets a body's velocity, clamped to the arena limits
    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vector2) -> Result<()> {
        let arena = self.config.arena;
        self.registry.get_mut(handle)?.set_velocity(velocity, &arena);
        Ok(())
    }

    /// Moves a body, reflecting it off any wall it crosses
    pub fn set_position(&mut self, handle: BodyHandle, position: Vector2) -> Result<Reflection> {
        let arena = self.config.arena;
        Ok(self.registry.get_mut(handle)?.set_position(position, &arena))
    }

    /// Runs one collision sweep.
    ///
    /// Resolved collisions are queued as events and returned. Depending on
    /// the configuration they also start deformations and explode bodies
    /// that hit hard enough.
    pub fn step(&mut self) -> Vec<CollisionEvent> {
        let collisions = self.engine.detect(&mut self.registry, &self.config.arena);
        self.contacts = collisions.iter().map(CollisionEvent::pair).collect();

        if self.config.deformation.on_collision {
            for event in &collisions {
                for handle in [event.body_a, event.body_b] {
                    self.begin_deformation(handle);
                }
            }
        }

        if let Some(threshold) = self.config.fragmentation.impact_speed {
            let mut doomed: Vec<BodyHandle> = Vec::new();
            for event in collisions.iter().filter(|e| e.impact_speed >= threshold) {
                for handle in [event.body_a, event.body_b] {
                    if !doomed.contains(&handle) {
                        doomed.push(handle);
                    }
                }
            }
            for handle in doomed {
                if !self.registry.contains(handle) {
                    continue;
                }
                if let Err(error) = self.explode(handle) {
                    warn!(%handle, %error, "impact fragmentation failed");
                }
            }
        }

        for event in &collisions {
            self.events.add_collision_event(event.clone());
        }
        collisions
    }

    /// Moves every body by its velocity scaled by `friction`, reflecting off walls
    pub fn integrate(&mut self, friction: f64) {
        let arena = self.config.arena;
        for handle in self.registry.handles() {
            if let Ok(body) = self.registry.get_mut(handle) {
                let reflection = body.translate(body.velocity() * friction, &arena);
                if reflection.any() {
                    trace!(%handle, x = reflection.x, y = reflection.y, "wall reflection");
                }
            }
        }
        trace!(bodies = self.registry.len(), friction, "integrated");
    }

    /// Advances the clock by `dt` seconds and runs everything that became due
    pub fn advance(&mut self, dt: f64) -> Vec<BodyEvent> {
        self.time += dt.max(0.0);
        let mut fired = Vec::new();

        for task in self.scheduler.pop_due(self.time) {
            let handle = task.handle();
            let event_type = match task {
                WorldTask::Remove(_) => BodyEventType::Removed,
                WorldTask::Decay(_) => BodyEventType::Decayed,
            };
            match self.detach(handle) {
                Ok(body) => {
                    debug!(%handle, name = body.name(), ?event_type, "timed removal");
                    fired.push(BodyEvent {
                        event_type,
                        body: handle,
                        name: body.name().to_string(),
                    });
                }
                Err(error) => warn!(%handle, %error, "timed removal found no body"),
            }
        }

        for (handle, frame) in self.deformations.advance(&mut self.registry, self.time) {
            if frame != DeformationFrame::Finished {
                continue;
            }
            if let Ok(body) = self.registry.get(handle) {
                fired.push(BodyEvent {
                    event_type: BodyEventType::DeformationFinished,
                    body: handle,
                    name: body.name().to_string(),
                });
            }
        }

        for event in &fired {
            self.events.add_body_event(event.clone());
        }
        fired
    }

    /// Runs a full frame: collision sweep, integration with the configured
    /// friction, then `dt` seconds of timed work
    pub fn tick(&mut self, dt: f64) -> Vec<CollisionEvent> {
        let collisions = self.step();
        self.integrate(self.config.friction);
        self.advance(dt);
        collisions
    }

    /// Destroys a body and replaces it with fragments that decay after the
    /// configured time. An indivisible body is left untouched.
    pub fn explode(&mut self, handle: BodyHandle) -> Result<Fragmentation> {
        let outcome = effects::explode(
            &mut self.registry,
            handle,
            &self.config.fragmentation,
            &self.config.arena,
            &mut self.rng,
            &mut self.fragment_serial,
        )?;

        let Some(parent) = &outcome.parent else {
            return Ok(outcome);
        };
        self.scheduler.cancel(|task| task.handle() == handle);
        self.deformations.cancel(&mut self.registry, handle);
        self.contacts.retain(|pair| !pair.contains(handle));
        self.events.add_body_event(BodyEvent {
            event_type: BodyEventType::Fragmented,
            body: handle,
            name: parent.name().to_string(),
        });

        let decay_after = self.config.fragmentation.decay_after;
        for &fragment in &outcome.fragments {
            let body = self.registry.get_mut(fragment)?;
            body.insert_flags(BodyFlags::DECAYING);
            self.events.add_body_event(BodyEvent {
                event_type: BodyEventType::Added,
                body: fragment,
                name: body.name().to_string(),
            });
            self.scheduler.schedule(self.time, decay_after, WorldTask::Decay(fragment));
        }
        Ok(outcome)
    }

    /// Queues a body for removal `delay` seconds from now
    pub fn schedule_removal(&mut self, handle: BodyHandle, delay: f64) -> Result<()> {
        if !(delay >= 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "removal delay must be non-negative, got {}",
                delay
            )));
        }
        self.registry.get_mut(handle)?.insert_flags(BodyFlags::DECAYING);
        self.scheduler.schedule(self.time, delay, WorldTask::Remove(handle));
        Ok(())
    }

    /// Number of timed removals still waiting
    pub fn pending_removals(&self) -> usize {
        self.scheduler.len()
    }

    /// Starts the impact deformation curve on a body. Returns `false` when
    /// one is already playing.
    pub fn start_deformation(&mut self, handle: BodyHandle) -> Result<bool> {
        self.registry.get(handle)?;
        Ok(self.begin_deformation(handle))
    }

    fn begin_deformation(&mut self, handle: BodyHandle) -> bool {
        if !self.deformations.start(&mut self.registry, handle, self.time) {
            return false;
        }
        if let Ok(body) = self.registry.get(handle) {
            self.events.add_body_event(BodyEvent {
                event_type: BodyEventType::DeformationStarted,
                body: handle,
                name: body.name().to_string(),
            });
        }
        true
    }

    /// Stops a running deformation and restores the rest shape
    pub fn cancel_deformation(&mut self, handle: BodyHandle) -> bool {
        self.deformations.cancel(&mut self.registry, handle)
    }

    pub fn is_deforming(&self, handle: BodyHandle) -> bool {
        self.deformations.is_active(handle)
    }

    /// Whether the two bodies collided during the last step
    pub fn was_touching(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.contacts.contains(&CollisionPair::new(a, b))
    }

    /// Returns a reference to the event queue
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Removes every body and pending task and resets the clock
    pub fn clear(&mut self) {
        self.registry.clear();
        self.scheduler.clear();
        self.deformations.clear();
        self.contacts.clear();
        self.events.clear();
        self.time = 0.0;
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> PhysicsWorld {
        PhysicsWorld::with_config(SimulationConfig {
            seed: Some(42),
            ..SimulationConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SimulationConfig::default();
        config.arena.width = 0.0;
        assert!(PhysicsWorld::with_config(config).is_err());
    }

    #[test]
    fn removal_cancels_pending_tasks() {
        let mut world = seeded();
        let handle = world
            .create_body(Vector2::new(10.0, 10.0), Vector2::new(20.0, 20.0), 2.0, "a")
            .unwrap();
        world.schedule_removal(handle, 1.0).unwrap();
        assert_eq!(world.pending_removals(), 1);
        world.remove_body(handle).unwrap();
        assert_eq!(world.pending_removals(), 0);
        assert!(world.advance(2.0).is_empty());
    }

    #[test]
    fn random_bodies_get_unique_names() {
        let mut world = seeded();
        world
            .create_body(Vector2::zero(), Vector2::new(5.0, 5.0), 1.0, "body-1")
            .unwrap();
        for _ in 0..4 {
            world.spawn_random_body(Vector2::new(10.0, 10.0), 1.0, 5.0).unwrap();
        }
        assert_eq!(world.body_count(), 5);
        for (_, body) in world.bodies() {
            assert!(body.velocity().x.abs() <= 5.0);
        }
    }

    #[test]
    fn contacts_track_last_step() {
        let mut world = seeded();
        let a = world
            .create_body(Vector2::new(100.0, 100.0), Vector2::new(50.0, 50.0), 1.0, "a")
            .unwrap();
        let b = world
            .create_body(Vector2::new(120.0, 100.0), Vector2::new(50.0, 50.0), 1.0, "b")
            .unwrap();
        world.set_velocity(a, Vector2::new(2.0, 0.0)).unwrap();
        world.set_velocity(b, Vector2::new(-2.0, 0.0)).unwrap();

        assert_eq!(world.step().len(), 1);
        assert!(world.was_touching(b, a));
        world.remove_body(b).unwrap();
        assert!(!world.was_touching(a, b));
    }
}
