//! Registered observer handles.
//!
//! Observers are entities in `bevy_ecs`. The game spawns them when it is
//! activated and keeps their ids here so that deactivation can despawn every
//! one of them and leave no dangling handlers behind.

use bevy_ecs::prelude::*;

#[derive(Resource, Debug, Default)]
pub struct Subscriptions {
    pub observers: Vec<Entity>,
}

impl Subscriptions {
    pub fn is_active(&self) -> bool {
        !self.observers.is_empty()
    }
}
