//! Board session resources.
//!
//! [`BoardSession`] is the authoritative record of the board lifecycle: which
//! phase placement is in, which entity is the live board and the yaw/pitch
//! accumulators used by drag-to-rotate. Systems and observers query it
//! instead of a process-wide "board exists" flag.
//!
//! [`BoardPrompt`] is the host-facing state of the board confirmation and
//! recenter affordances.

use bevy_ecs::prelude::*;
use glam::Vec2;

/// Discrete phases of board placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardPhase {
    #[default]
    NoBoard,
    /// The placement marker is tracked and the user is asked to confirm.
    AwaitingConfirmation { marker: Entity },
    Placed,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct BoardSession {
    phase: BoardPhase,
    board: Option<Entity>,
    /// Accumulated rotation about the vertical axis, degrees.
    pub yaw: f32,
    /// Accumulated tilt, degrees, clamped by the gesture settings.
    pub pitch: f32,
}

impl BoardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn board(&self) -> Option<Entity> {
        self.board
    }

    pub fn has_board(&self) -> bool {
        self.board.is_some()
    }

    /// Ask for confirmation of a board anchored at `marker`.
    ///
    /// Ignored once a board exists.
    pub fn await_confirmation(&mut self, marker: Entity) -> bool {
        if self.has_board() {
            return false;
        }
        self.phase = BoardPhase::AwaitingConfirmation { marker };
        true
    }

    /// Record the newly spawned board and its gesture baseline.
    ///
    /// Returns the previous board, which the caller must despawn.
    pub fn place(&mut self, board: Entity, yaw: f32, pitch: f32) -> Option<Entity> {
        let previous = self.board.replace(board);
        self.phase = BoardPhase::Placed;
        self.yaw = yaw;
        self.pitch = pitch;
        previous
    }

    /// Forget the board and return to [`BoardPhase::NoBoard`].
    pub fn clear(&mut self) -> Option<Entity> {
        self.phase = BoardPhase::NoBoard;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.board.take()
    }
}

/// Whether placement-marker events are processed.
///
/// Disabled after a board is placed so the placement flow cannot re-enter.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PlacementTracking {
    pub enabled: bool,
}

impl Default for PlacementTracking {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Board confirmation and recenter affordances, rendered by the host.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct BoardPrompt {
    pub confirm_visible: bool,
    /// Screen position of the confirmation button.
    pub confirm_screen_position: Option<Vec2>,
    /// Whether the recenter button is offered.
    pub recenter_available: bool,
}

impl BoardPrompt {
    pub fn show_confirm(&mut self, screen_position: Option<Vec2>) {
        self.confirm_visible = true;
        self.confirm_screen_position = screen_position;
    }

    pub fn hide_confirm(&mut self) {
        self.confirm_visible = false;
        self.confirm_screen_position = None;
    }
}
