//! Grid regeneration requests.
use bevy_ecs::hierarchy::Children;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{error, info, warn};

use crate::components::gridcell::GridCell;
use crate::components::gridgenerator::GridGenerator;
use crate::systems::grid::rebuild_grid;

/// Regenerate the grid of `board`, optionally with new parameters.
///
/// Existing cells, and any pieces placed on them, are destroyed first.
#[derive(Event, Debug, Clone, Copy)]
pub struct GenerateGrid {
    pub board: Entity,
    pub grid_size: Option<u32>,
    pub cell_size: Option<f32>,
}

impl GenerateGrid {
    pub fn new(board: Entity) -> Self {
        Self {
            board,
            grid_size: None,
            cell_size: None,
        }
    }

    pub fn with_params(board: Entity, grid_size: u32, cell_size: f32) -> Self {
        Self {
            board,
            grid_size: Some(grid_size),
            cell_size: Some(cell_size),
        }
    }
}

pub fn observe_generate_grid(
    trigger: On<GenerateGrid>,
    mut commands: Commands,
    mut generators: Query<(&mut GridGenerator, Option<&Children>)>,
    cells: Query<(), With<GridCell>>,
) {
    let event = *trigger.event();
    let Ok((mut generator, children)) = generators.get_mut(event.board) else {
        warn!("Cannot generate grid: {:?} has no grid generator", event.board);
        return;
    };
    let grid_size = event.grid_size.unwrap_or(generator.grid_size());
    let cell_size = event.cell_size.unwrap_or(generator.cell_size);
    generator.set_params(grid_size, cell_size);

    match rebuild_grid(&mut commands, event.board, &generator, children, &cells) {
        Ok(count) => info!(
            "Regenerated {}x{} grid ({} cells) on {:?}",
            generator.grid_size(), generator.grid_size(), count, event.board
        ),
        Err(e) => error!("Grid generation failed for {:?}: {}", event.board, e),
    }
    generator.spawned = true;
}
