use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::{BodyEvent, BodyHandle, CollisionEvent, PhysicsWorld};
use crate::Result;

/// A [`PhysicsWorld`] that several threads can drive.
///
/// Every access goes through one lock, so a removal requested from another
/// thread is never interleaved with a collision sweep. A panic while the lock
/// was held does not make the world unusable.
#[derive(Clone)]
pub struct SharedWorld {
    inner: Arc<Mutex<PhysicsWorld>>,
}

impl SharedWorld {
    pub fn new(world: PhysicsWorld) -> Self {
        Self {
            inner: Arc::new(Mutex::new(world)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PhysicsWorld> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the world
    pub fn with<R>(&self, f: impl FnOnce(&mut PhysicsWorld) -> R) -> R {
        let mut world = self.lock();
        f(&mut world)
    }

    pub fn tick(&self, dt: f64) -> Vec<CollisionEvent> {
        self.lock().tick(dt)
    }

    pub fn advance(&self, dt: f64) -> Vec<BodyEvent> {
        self.lock().advance(dt)
    }

    pub fn schedule_removal(&self, handle: BodyHandle, delay: f64) -> Result<()> {
        self.lock().schedule_removal(handle, delay)
    }

    pub fn body_count(&self) -> usize {
        self.lock().body_count()
    }

    /// Returns the world if this is the last handle to it
    pub fn into_inner(self) -> Option<PhysicsWorld> {
        Arc::try_unwrap(self.inner)
            .ok()
            .map(|mutex| mutex.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Default for SharedWorld {
    fn default() -> Self {
        Self::new(PhysicsWorld::default())
    }
}

impl From<PhysicsWorld> for SharedWorld {
    fn from(world: PhysicsWorld) -> Self {
        Self::new(world)
    }
}
