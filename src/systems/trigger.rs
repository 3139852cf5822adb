//! Piece-over-cell detection.
//!
//! [`trigger_volume_system`] tests every following piece against the enabled
//! [`TriggerVolume`] of every grid cell, in the cell's local space, and turns
//! the result into enter/exit transitions on the [`Piece`]. The piece's
//! [`PlacementPrompt`] is shown while it has a target cell and hidden
//! otherwise.
//!
//! Precedence: the cell entered last is the target. Cells entered in the same
//! frame are entered farthest first, so the nearest one wins. Leaving the
//! target falls back to the most recently entered cell still overlapped.

use bevy_ecs::prelude::*;
use log::debug;
use smallvec::SmallVec;

use crate::components::gridcell::{GridCell, TriggerVolume};
use crate::components::piece::{Piece, PlacementPrompt};
use crate::components::transform::GlobalTransform3D;

/// Cells containing a piece this frame, with the squared distance from the
/// cell center in its local space.
pub type Overlaps = SmallVec<[(Entity, f32); 4]>;

/// Apply this frame's overlaps to `piece`. Returns whether the target changed.
pub fn apply_overlaps(piece: &mut Piece, inside: &Overlaps) -> bool {
    let before = piece.target_cell;

    let left: SmallVec<[Entity; 4]> = piece
        .overlapping
        .iter()
        .copied()
        .filter(|cell| !inside.iter().any(|(e, _)| e == cell))
        .collect();
    for cell in left {
        piece.exit_cell(cell);
    }

    let mut entered: Overlaps = inside
        .iter()
        .copied()
        .filter(|(e, _)| !piece.overlapping.contains(e))
        .collect();
    entered.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (cell, _) in entered {
        piece.enter_cell(cell);
    }

    piece.target_cell != before
}

pub fn trigger_volume_system(
    mut pieces: Query<(Entity, &mut Piece, &mut PlacementPrompt, &GlobalTransform3D)>,
    cells: Query<(Entity, &TriggerVolume, &GlobalTransform3D), With<GridCell>>,
) {
    for (entity, mut piece, mut prompt, global) in pieces.iter_mut() {
        if !piece.is_following() {
            continue;
        }
        let position = global.translation();
        let inside: Overlaps = cells
            .iter()
            .filter_map(|(cell, volume, cell_global)| {
                let local = cell_global.0.inverse_transform_point(position);
                volume
                    .contains_local(local)
                    .then(|| (cell, local.length_squared()))
            })
            .collect();

        if apply_overlaps(&mut piece, &inside) {
            debug!("Piece {:?} target cell is now {:?}", entity, piece.target_cell);
        }

        let show = piece.target_cell.is_some();
        if show != prompt.visible {
            if show {
                prompt.visible = true;
            } else {
                prompt.hide();
            }
        }
    }
}
