//! Mirror of an externally tracked image marker.
//!
//! The tracking subsystem owns the real trackable; the crate keeps a proxy
//! entity per marker id with the last reported tracking state and, while
//! tracking, the live pose in its [`Transform3D`](super::transform::Transform3D).

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::piece::PieceKind;

/// Identifier assigned to a trackable by the tracking subsystem.
pub type MarkerId = u64;

/// Tracking confidence reported for a marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingState {
    #[default]
    None,
    Limited,
    Tracking,
}

/// What a reference image stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Board placement anchor.
    Card,
    Piece(PieceKind),
    Unknown,
}

impl MarkerKind {
    /// Classify a reference image by name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Card" => MarkerKind::Card,
            "O" => MarkerKind::Piece(PieceKind::O),
            "X" => MarkerKind::Piece(PieceKind::X),
            _ => MarkerKind::Unknown,
        }
    }
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct TrackedMarker {
    pub id: MarkerId,
    pub kind: MarkerKind,
    pub tracking: TrackingState,
    /// Physical size of the printed image in meters.
    pub size: Vec2,
}

impl TrackedMarker {
    pub fn is_tracking(&self) -> bool {
        self.tracking == TrackingState::Tracking
    }
}

/// Piece spawned for this marker proxy.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundPiece(pub Entity);
