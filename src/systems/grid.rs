//! Board grid spawning and lookup.
//!
//! [`grid_spawn_system`] generates the cells of every [`GridGenerator`] whose
//! current parameters have not been generated yet, which covers freshly
//! added generators and parameter changes alike. Regeneration on request goes
//! through [`rebuild_grid`] from the
//! [`GenerateGrid`](crate::events::grid::GenerateGrid) observer.
//!
//! Each cell is a child of the board entity carrying a [`GridCell`], a
//! [`TriggerVolume`] and a local [`Transform3D`] rotated 90° about X so its
//! XY plane lies flat on the board. The trigger volume's Z half extent is
//! therefore the vertical reach above and below the board surface.
//!
//! # Related
//!
//! - [`crate::components::gridgenerator::GridGenerator`] – the trigger component
//! - [`crate::components::gridcell::GridCell`] – per-cell occupancy

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, error};

use crate::components::gridcell::{CellOccupancy, GridCell, GridError, TriggerVolume};
use crate::components::gridgenerator::GridGenerator;
use crate::components::transform::{GlobalTransform3D, Transform3D, euler_degrees};

/// Despawn the cells currently under `board` and spawn a fresh lattice.
///
/// Pieces placed on the old cells go with them. Returns the number of cells
/// queued for spawning.
pub fn rebuild_grid(
    commands: &mut Commands,
    board: Entity,
    generator: &GridGenerator,
    children: Option<&Children>,
    cells: &Query<(), With<GridCell>>,
) -> Result<usize, GridError> {
    generator.validate()?;

    if let Some(children) = children {
        for child in children.iter() {
            if cells.contains(child) {
                commands.entity(child).despawn();
            }
        }
    }

    let half = generator.cell_size * 0.5;
    let volume = TriggerVolume::new(Vec3::new(half, half, generator.trigger_depth));
    let rotation = euler_degrees(90.0, 0.0, 0.0);
    let mut count = 0;
    for (x, y, position) in generator.iter_cells() {
        let local = Transform3D::from_translation_rotation(position, rotation);
        commands.spawn((
            GridCell::new(x, y),
            volume,
            local,
            GlobalTransform3D::default(),
            ChildOf(board),
        ));
        count += 1;
    }
    Ok(count)
}

/// System that generates cells for generators not yet spawned.
pub fn grid_spawn_system(
    mut commands: Commands,
    mut generators: Query<(Entity, &mut GridGenerator, Option<&Children>)>,
    cells: Query<(), With<GridCell>>,
) {
    for (board, mut generator, children) in generators.iter_mut() {
        if generator.spawned {
            continue;
        }
        match rebuild_grid(&mut commands, board, &generator, children, &cells) {
            Ok(count) => debug!(
                "Generated {}x{} grid ({} cells) for {:?}",
                generator.grid_size(), generator.grid_size(), count, board
            ),
            Err(e) => error!("Grid generation failed for {:?}: {}", board, e),
        }
        // prevent retrying invalid parameters every frame
        generator.spawned = true;
    }
}

/// Cell `(x, y)` of `board`, or `None` when out of range or not spawned.
pub fn cell_at(world: &World, board: Entity, x: i32, y: i32) -> Option<Entity> {
    let generator = world.get::<GridGenerator>(board)?;
    let (x, y) = generator.check_coords(x, y).ok()?;
    world.get::<Children>(board)?.iter().find(|&child| {
        world
            .get::<GridCell>(child)
            .is_some_and(|cell| cell.x == x && cell.y == y)
    })
}

/// Occupancy matrix of `board`, indexed `[y][x]`.
pub fn board_layout(world: &World, board: Entity) -> Option<Vec<Vec<CellOccupancy>>> {
    let size = world.get::<GridGenerator>(board)?.grid_size() as usize;
    let mut layout = vec![vec![CellOccupancy::Empty; size]; size];
    if let Some(children) = world.get::<Children>(board) {
        for child in children.iter() {
            if let Some(cell) = world.get::<GridCell>(child) {
                let (x, y) = (cell.x as usize, cell.y as usize);
                if x < size && y < size {
                    layout[y][x] = cell.occupancy();
                }
            }
        }
    }
    Some(layout)
}
