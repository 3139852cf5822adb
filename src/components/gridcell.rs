//! A single placement slot on the board.
//!
//! Cells are spawned by the grid generator as children of the board. Each
//! one carries its integer coordinates, a write-once [`CellOccupancy`] and a
//! [`TriggerVolume`] that pieces are tested against while they follow their
//! markers.

use bevy_ecs::prelude::Component;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::piece::PieceKind;

/// Occupancy of a grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellOccupancy {
    #[default]
    Empty,
    O,
    X,
}

impl From<PieceKind> for CellOccupancy {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::O => CellOccupancy::O,
            PieceKind::X => CellOccupancy::X,
        }
    }
}

impl CellOccupancy {
    pub fn symbol(&self) -> char {
        match self {
            CellOccupancy::Empty => '.',
            CellOccupancy::O => 'O',
            CellOccupancy::X => 'X',
        }
    }
}

/// Errors raised by grid rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Cell ({x}, {y}) is already occupied by {occupant:?}")]
    AlreadyOccupied {
        x: u32,
        y: u32,
        occupant: CellOccupancy,
    },

    #[error("Cell ({x}, {y}) is outside a {size}x{size} grid")]
    OutOfBounds { x: i32, y: i32, size: u32 },

    #[error("Invalid cell size: {0}")]
    InvalidCellSize(f32),
}

/// Board slot addressed by `(x, y)`.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
    occupancy: CellOccupancy,
}

impl GridCell {
    pub fn new(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            occupancy: CellOccupancy::Empty,
        }
    }

    pub fn occupancy(&self) -> CellOccupancy {
        self.occupancy
    }

    pub fn is_occupied(&self) -> bool {
        self.occupancy != CellOccupancy::Empty
    }

    /// Mark the cell as taken by `kind`.
    ///
    /// Occupancy is write-once: a second call fails and leaves the cell as is.
    pub fn occupy(&mut self, kind: PieceKind) -> Result<(), GridError> {
        if self.is_occupied() {
            return Err(GridError::AlreadyOccupied {
                x: self.x,
                y: self.y,
                occupant: self.occupancy,
            });
        }
        self.occupancy = kind.into();
        Ok(())
    }
}

/// Box-shaped trigger region in the owner's local space, centered on its
/// origin.
///
/// Disabled volumes never report overlaps; a cell disables its volume once
/// occupied.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct TriggerVolume {
    pub half_extents: Vec3,
    pub enabled: bool,
}

impl TriggerVolume {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            enabled: true,
        }
    }

    /// Whether `local_point` (already in the owner's local space) is inside.
    pub fn contains_local(&self, local_point: Vec3) -> bool {
        self.enabled
            && local_point.x.abs() <= self.half_extents.x
            && local_point.y.abs() <= self.half_extents.y
            && local_point.z.abs() <= self.half_extents.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_empty() {
        let cell = GridCell::new(1, 2);
        assert_eq!(cell.occupancy(), CellOccupancy::Empty);
        assert!(!cell.is_occupied());
    }

    #[test]
    fn test_occupy_is_write_once() {
        let mut cell = GridCell::new(0, 0);
        assert!(cell.occupy(PieceKind::X).is_ok());
        assert_eq!(cell.occupancy(), CellOccupancy::X);

        let err = cell.occupy(PieceKind::O).unwrap_err();
        assert_eq!(
            err,
            GridError::AlreadyOccupied {
                x: 0,
                y: 0,
                occupant: CellOccupancy::X
            }
        );
        assert_eq!(cell.occupancy(), CellOccupancy::X);
    }

    #[test]
    fn test_trigger_volume_contains() {
        let vol = TriggerVolume::new(Vec3::new(0.1, 0.1, 0.05));
        assert!(vol.contains_local(Vec3::ZERO));
        assert!(vol.contains_local(Vec3::new(0.1, -0.1, 0.05)));
        assert!(!vol.contains_local(Vec3::new(0.11, 0.0, 0.0)));
        assert!(!vol.contains_local(Vec3::new(0.0, 0.0, 0.06)));
    }

    #[test]
    fn test_disabled_trigger_volume_never_contains() {
        let mut vol = TriggerVolume::new(Vec3::splat(1.0));
        vol.enabled = false;
        assert!(!vol.contains_local(Vec3::ZERO));
    }

    #[test]
    fn test_occupancy_symbols() {
        assert_eq!(CellOccupancy::Empty.symbol(), '.');
        assert_eq!(CellOccupancy::from(PieceKind::O).symbol(), 'O');
        assert_eq!(CellOccupancy::from(PieceKind::X).symbol(), 'X');
    }
}
