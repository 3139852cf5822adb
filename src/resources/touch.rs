//! Per-frame touch input resource.
//!
//! The host writes the active contacts each frame before ticking the game.
//! Positions are screen pixels; `delta` is the movement since the previous
//! frame as reported by the platform.
use bevy_ecs::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

/// One finger on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchContact {
    pub id: u64,
    pub position: Vec2,
    #[serde(default)]
    pub delta: Vec2,
    pub phase: TouchPhase,
}

impl TouchContact {
    /// Position reported for the previous frame.
    pub fn previous_position(&self) -> Vec2 {
        self.position - self.delta
    }
}

/// Resource capturing the touch contacts for the current frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct TouchInput {
    pub contacts: SmallVec<[TouchContact; 4]>,
}

impl TouchInput {
    pub fn set(&mut self, contacts: impl IntoIterator<Item = TouchContact>) {
        self.contacts.clear();
        self.contacts.extend(contacts);
    }
}
