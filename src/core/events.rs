use crate::collision::{CollisionPair, Separation};
use crate::core::BodyHandle;
use crate::math::Vector2;
use std::collections::VecDeque;

/// A resolved collision between two bodies
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    /// The first body in sweep order
    pub body_a: BodyHandle,

    /// The second body in sweep order
    pub body_b: BodyHandle,

    /// Velocity written onto `body_a`
    pub velocity_a: Vector2,

    /// Velocity written onto `body_b`
    pub velocity_b: Vector2,

    /// Relative approach speed along the line of centres before resolution
    pub impact_speed: f64,

    /// Present when the pair was still overlapping and had to be pushed apart
    pub separation: Option<Separation>,
}

impl CollisionEvent {
    /// Returns whether the event involves the given body
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// The colliding bodies as an unordered pair
    pub fn pair(&self) -> CollisionPair {
        CollisionPair::new(self.body_a, self.body_b)
    }
}

/// Types of body events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEventType {
    /// A body has been added to the world
    Added,

    /// A body has been removed from the world
    Removed,

    /// A body was destroyed by an explosion
    Fragmented,

    /// A body reached the end of its timed life
    Decayed,

    /// An impact deformation started playing
    DeformationStarted,

    /// An impact deformation finished or was cancelled
    DeformationFinished,
}

/// An event related to a single body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyEvent {
    /// The type of body event
    pub event_type: BodyEventType,

    /// The body that the event refers to
    pub body: BodyHandle,

    /// The body's name at the time of the event
    pub name: String,
}

/// A queue of simulation events
#[derive(Debug, Default)]
pub struct EventQueue {
    collision_events: VecDeque<CollisionEvent>,
    body_events: VecDeque<BodyEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collision event to the queue
    pub fn add_collision_event(&mut self, event: CollisionEvent) {
        self.collision_events.push_back(event);
    }

    /// Adds a body event to the queue
    pub fn add_body_event(&mut self, event: BodyEvent) {
        self.body_events.push_back(event);
    }

    /// Gets the next collision event from the queue
    pub fn next_collision_event(&mut self) -> Option<CollisionEvent> {
        self.collision_events.pop_front()
    }

    /// Gets the next body event from the queue
    pub fn next_body_event(&mut self) -> Option<BodyEvent> {
        self.body_events.pop_front()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.collision_events.is_empty() && self.body_events.is_empty()
    }

    /// Clears all events from the queue
    pub fn clear(&mut self) {
        self.collision_events.clear();
        self.body_events.clear();
    }

    /// Gets all body events of a specific type
    pub fn get_body_events_of_type(&self, event_type: BodyEventType) -> Vec<&BodyEvent> {
        self.body_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Gets all collision events involving a specific body
    pub fn get_collision_events_for_body(&self, body: BodyHandle) -> Vec<&CollisionEvent> {
        self.collision_events
            .iter()
            .filter(|e| e.involves(body))
            .collect()
    }

    /// Gets all body events for a specific body
    pub fn get_body_events_for_body(&self, body: BodyHandle) -> Vec<&BodyEvent> {
        self.body_events
            .iter()
            .filter(|e| e.body == body)
            .collect()
    }
}
