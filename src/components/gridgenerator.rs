//! Grid generator component for board cell spawning.
//!
//! The [`GridGenerator`] component sits on the board entity. When it is added
//! (or a [`GenerateGrid`](crate::events::grid::GenerateGrid) event names the
//! board) the grid systems destroy any previous cells and spawn
//! `grid_size * grid_size` [`GridCell`](super::gridcell::GridCell) children on
//! a centered lattice.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::gridcell::GridError;

pub const MIN_GRID_SIZE: u32 = 3;
pub const MAX_GRID_SIZE: u32 = 7;

/// Spawns an N×N grid of cells as children of its entity.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct GridGenerator {
    /// Cells per side, always within `3..=7`.
    grid_size: u32,
    /// Spacing between cell centers in meters.
    pub cell_size: f32,
    /// Half height of each cell's trigger volume.
    pub trigger_depth: f32,
    /// whether the current parameters have been generated
    pub spawned: bool,
}

impl GridGenerator {
    pub fn new(grid_size: u32, cell_size: f32) -> Self {
        Self {
            grid_size: grid_size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE),
            cell_size,
            trigger_depth: 0.15,
            spawned: false,
        }
    }

    /// Cells per side.
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn with_trigger_depth(mut self, depth: f32) -> Self {
        self.trigger_depth = depth;
        self
    }

    /// Change the parameters; the grid must be regenerated afterwards.
    pub fn set_params(&mut self, grid_size: u32, cell_size: f32) {
        self.grid_size = grid_size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        self.cell_size = cell_size;
        self.spawned = false;
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if !(self.cell_size > 0.0) || !self.cell_size.is_finite() {
            return Err(GridError::InvalidCellSize(self.cell_size));
        }
        Ok(())
    }

    /// Distance from the board origin to the outermost cell centers.
    pub fn offset(&self) -> f32 {
        (self.grid_size - 1) as f32 * self.cell_size * 0.5
    }

    /// Local position of cell `(x, y)` relative to the board.
    pub fn cell_local_position(&self, x: u32, y: u32) -> Vec3 {
        let offset = self.offset();
        Vec3::new(
            x as f32 * self.cell_size - offset,
            0.0,
            y as f32 * self.cell_size - offset,
        )
    }

    /// Validate signed coordinates against the grid bounds.
    pub fn check_coords(&self, x: i32, y: i32) -> Result<(u32, u32), GridError> {
        let size = self.grid_size as i32;
        if x < 0 || y < 0 || x >= size || y >= size {
            return Err(GridError::OutOfBounds {
                x,
                y,
                size: self.grid_size,
            });
        }
        Ok((x as u32, y as u32))
    }

    /// Iterate over all cell coordinates with their local positions, `x` major.
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u32, Vec3)> + '_ {
        (0..self.grid_size).flat_map(move |x| {
            (0..self.grid_size).map(move |y| (x, y, self.cell_local_position(x, y)))
        })
    }
}
