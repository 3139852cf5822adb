//! Registry of marker proxy entities.
//!
//! Maps the tracking subsystem's marker ids to the proxy entities that mirror
//! them, so repeated updates for the same marker land on the same entity.

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

use crate::components::marker::MarkerId;

/// Map of marker ids to proxy entities.
#[derive(Resource, Debug, Default)]
pub struct MarkerRegistry {
    pub map: FxHashMap<MarkerId, Entity>,
}

impl MarkerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        MarkerRegistry {
            map: FxHashMap::default(),
        }
    }

    pub fn get(&self, id: MarkerId) -> Option<Entity> {
        self.map.get(&id).copied()
    }

    pub fn insert(&mut self, id: MarkerId, proxy: Entity) {
        self.map.insert(id, proxy);
    }

    /// Drop whichever id maps to `proxy`.
    pub fn remove_proxy(&mut self, proxy: Entity) -> Option<MarkerId> {
        let id = self
            .map
            .iter()
            .find_map(|(id, e)| (*e == proxy).then_some(*id))?;
        self.map.remove(&id);
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
