//! Piece placement commands.
//!
//! The host shows a piece's [`PlacementPrompt`] while the piece hovers over a
//! free cell and answers it with one of these events.
use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::gridcell::{GridCell, TriggerVolume};
use crate::components::piece::{Piece, PlacementPrompt};
use crate::components::transform::{GlobalTransform3D, Transform3D};
use crate::resources::gameconfig::GameConfig;
use crate::resources::markerregistry::MarkerRegistry;

/// Lock `piece` onto its current target cell.
#[derive(Event, Debug, Clone, Copy)]
pub struct ConfirmPiecePlacement {
    pub piece: Entity,
}

/// Dismiss the placement prompt of `piece` without placing it.
#[derive(Event, Debug, Clone, Copy)]
pub struct CancelPiecePlacement {
    pub piece: Entity,
}

/// Place a piece on its target cell.
///
/// Behavior
/// - Ignored when the piece is already placed or has no target cell.
/// - The cell's occupancy is written first; if the cell is already taken the
///   placement is cancelled with a warning.
/// - On success the piece becomes a child of the cell at the configured
///   placement offset, keeping its world rotation. The cell's trigger volume
///   is disabled, the prompt hidden and the marker proxy the piece followed
///   is despawned and unregistered, so the same marker can spawn a new piece.
pub fn observe_confirm_piece_placement(
    trigger: On<ConfirmPiecePlacement>,
    mut commands: Commands,
    config: Res<GameConfig>,
    mut registry: ResMut<MarkerRegistry>,
    mut pieces: Query<(&mut Piece, &mut PlacementPrompt, &mut Transform3D)>,
    mut cells: Query<(&mut GridCell, &mut TriggerVolume, &GlobalTransform3D), Without<Piece>>,
) {
    let piece_entity = trigger.event().piece;
    let Ok((mut piece, mut prompt, mut transform)) = pieces.get_mut(piece_entity) else {
        warn!("Cannot place {:?}: not a piece", piece_entity);
        return;
    };
    if !piece.is_following() {
        debug!("Piece {:?} is already placed", piece_entity);
        return;
    }
    let Some(cell_entity) = piece.target_cell else {
        debug!("Piece {:?} has no target cell", piece_entity);
        return;
    };
    let Ok((mut cell, mut volume, cell_global)) = cells.get_mut(cell_entity) else {
        warn!("Target cell {:?} of piece {:?} is gone", cell_entity, piece_entity);
        piece.exit_cell(cell_entity);
        prompt.hide();
        return;
    };
    if let Err(e) = cell.occupy(piece.kind) {
        warn!("Cannot place piece {:?}: {}", piece_entity, e);
        piece.exit_cell(cell_entity);
        prompt.hide();
        return;
    }

    volume.enabled = false;
    // following pieces are roots, so the local transform is the world pose
    let mut local = cell_global.0.relative(&transform);
    local.translation = config.piece.placement_offset();
    *transform = local;

    let released = piece.place();
    prompt.hide();
    commands.entity(piece_entity).insert(ChildOf(cell_entity));
    if let Some(marker) = released {
        registry.remove_proxy(marker);
        commands.entity(marker).despawn();
    }
    info!(
        "Placed '{}' piece {:?} on cell ({}, {})",
        piece.kind.name(),
        piece_entity,
        cell.x,
        cell.y
    );
}

/// Hide the prompt and forget the target.
///
/// The cancelled cell is not offered again until the piece leaves and
/// re-enters it, even when another overlapping cell is exited.
pub fn observe_cancel_piece_placement(
    trigger: On<CancelPiecePlacement>,
    mut pieces: Query<(&mut Piece, &mut PlacementPrompt)>,
) {
    let piece_entity = trigger.event().piece;
    let Ok((mut piece, mut prompt)) = pieces.get_mut(piece_entity) else {
        warn!("Cannot cancel placement of {:?}: not a piece", piece_entity);
        return;
    };
    piece.cancel();
    prompt.hide();
}
