//! Game pieces that follow a tracked marker until placed on a grid cell.
//!
//! A [`Piece`] starts in [`PieceState::Following`], bound to the proxy entity
//! of its marker. Confirming a placement while a target cell is pending moves
//! it to [`PieceState::Placed`], which is terminal: the marker binding is
//! dropped and the piece lives as a child of the cell from then on.

use bevy_ecs::prelude::{Component, Entity};
use glam::{Quat, Vec2, Vec3};
use smallvec::SmallVec;

use crate::components::transform::{Transform3D, euler_vec_degrees};

/// The two token types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    O,
    X,
}

impl PieceKind {
    pub fn name(&self) -> &'static str {
        match self {
            PieceKind::O => "O",
            PieceKind::X => "X",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceState {
    Following,
    Placed,
}

/// Piece lifecycle and binding.
#[derive(Component, Clone, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    state: PieceState,
    marker: Option<Entity>,
    /// Cell currently offered for placement.
    pub target_cell: Option<Entity>,
    /// Cells whose trigger volumes contain the piece, oldest first.
    pub overlapping: SmallVec<[Entity; 4]>,
    /// Overlapping cells whose prompt was cancelled; offered again only
    /// after the piece leaves and re-enters them.
    dismissed: SmallVec<[Entity; 2]>,
    /// Last position written by the follow system; held while the marker
    /// pose only jitters below the threshold.
    pub last_stable_position: Vec3,
}

impl Piece {
    pub fn new(kind: PieceKind, marker: Entity) -> Self {
        Self {
            kind,
            state: PieceState::Following,
            marker: Some(marker),
            target_cell: None,
            overlapping: SmallVec::new(),
            dismissed: SmallVec::new(),
            last_stable_position: Vec3::ZERO,
        }
    }

    pub fn state(&self) -> PieceState {
        self.state
    }

    pub fn is_following(&self) -> bool {
        self.state == PieceState::Following
    }

    /// Marker proxy this piece follows, `None` once placed.
    pub fn marker(&self) -> Option<Entity> {
        self.marker
    }

    /// Switch to [`PieceState::Placed`] and release the marker binding.
    ///
    /// Returns the released marker proxy. Calling this on a placed piece is a
    /// no-op returning `None`.
    pub fn place(&mut self) -> Option<Entity> {
        if self.state == PieceState::Placed {
            return None;
        }
        self.state = PieceState::Placed;
        self.target_cell = None;
        self.overlapping.clear();
        self.dismissed.clear();
        self.marker.take()
    }

    /// Record that the piece entered `cell`; the newest cell becomes the
    /// target.
    pub fn enter_cell(&mut self, cell: Entity) {
        self.dismissed.retain(|c| *c != cell);
        self.overlapping.retain(|c| *c != cell);
        self.overlapping.push(cell);
        self.target_cell = Some(cell);
    }

    /// Record that the piece left `cell`.
    ///
    /// Leaving the target falls back to the most recently entered cell still
    /// overlapping and not dismissed, if any. Returns whether the target
    /// changed.
    pub fn exit_cell(&mut self, cell: Entity) -> bool {
        self.overlapping.retain(|c| *c != cell);
        self.dismissed.retain(|c| *c != cell);
        if self.target_cell == Some(cell) {
            self.target_cell = self
                .overlapping
                .iter()
                .rev()
                .find(|c| !self.dismissed.contains(c))
                .copied();
            return true;
        }
        false
    }

    /// Drop the current target without placing.
    ///
    /// The cell stays in `overlapping` but is not offered again until the
    /// piece re-enters it.
    pub fn cancel(&mut self) {
        if let Some(cell) = self.target_cell.take() {
            if !self.dismissed.contains(&cell) {
                self.dismissed.push(cell);
            }
        }
    }

    pub fn is_dismissed(&self, cell: Entity) -> bool {
        self.dismissed.contains(&cell)
    }
}

/// Tunables for following a marker.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PieceFollow {
    /// Offset from the marker, in the marker's local frame.
    pub position_offset: Vec3,
    /// Extra rotation applied after the marker rotation, Euler degrees.
    pub rotation_offset: Vec3,
    /// Exponential approach rate per second.
    pub smoothness: f32,
    /// Positional deltas at or below this are treated as noise.
    pub position_threshold: f32,
}

impl Default for PieceFollow {
    fn default() -> Self {
        Self {
            position_offset: Vec3::new(0.0, 0.1, 0.0),
            rotation_offset: Vec3::ZERO,
            smoothness: 25.0,
            position_threshold: 0.005,
        }
    }
}

impl PieceFollow {
    /// Target pose for a marker at `marker`.
    pub fn target_pose(&self, marker: &Transform3D) -> (Vec3, Quat) {
        let position = marker.translation + marker.rotation * self.position_offset;
        let rotation = marker.rotation * euler_vec_degrees(self.rotation_offset);
        (position, rotation)
    }
}

/// Billboarded confirm/cancel affordance shown while a piece is over a cell.
///
/// The host renders it; the crate keeps its visibility, world anchor, screen
/// projection and facing up to date.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PlacementPrompt {
    pub visible: bool,
    pub world_position: Vec3,
    pub screen_position: Option<Vec2>,
    pub facing: Quat,
}

impl Default for PlacementPrompt {
    fn default() -> Self {
        Self {
            visible: false,
            world_position: Vec3::ZERO,
            screen_position: None,
            facing: Quat::IDENTITY,
        }
    }
}

impl PlacementPrompt {
    pub fn hide(&mut self) {
        self.visible = false;
        self.screen_position = None;
    }
}

/// Prompt height above the piece.
pub const PROMPT_HEIGHT: f32 = 0.2;
