//! Piece templates bound by the host.
//!
//! Spawning a piece for an `O` or `X` marker needs the matching
//! [`PiecePrefab`]. A missing binding is a host setup error: the spawn is
//! skipped with an error log and retried on the next tracking update.

use bevy_ecs::prelude::Resource;

use crate::components::piece::{PieceFollow, PieceKind};

/// Marker width a piece at unit scale is modelled for, in meters.
pub const REFERENCE_MARKER_WIDTH: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiecePrefab {
    pub follow: PieceFollow,
    /// Marker width that maps to unit scale.
    pub reference_width: f32,
    /// Multiplier handed to the piece's scale adjuster.
    pub scale_multiplier: f32,
}

impl Default for PiecePrefab {
    fn default() -> Self {
        Self {
            follow: PieceFollow::default(),
            reference_width: REFERENCE_MARKER_WIDTH,
            scale_multiplier: 1.0,
        }
    }
}

impl PiecePrefab {
    /// Uniform scale for a marker `width` meters wide, or `None` when the
    /// width (or the reference) is not positive.
    pub fn scale_for_width(&self, width: f32) -> Option<f32> {
        if width <= 0.0 || self.reference_width <= 0.0 {
            return None;
        }
        Some(width / self.reference_width)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PiecePrefabs {
    pub o: Option<PiecePrefab>,
    pub x: Option<PiecePrefab>,
}

impl PiecePrefabs {
    pub fn both(prefab: PiecePrefab) -> Self {
        Self {
            o: Some(prefab),
            x: Some(prefab),
        }
    }

    pub fn get(&self, kind: PieceKind) -> Option<&PiecePrefab> {
        match kind {
            PieceKind::O => self.o.as_ref(),
            PieceKind::X => self.x.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_for_width() {
        let prefab = PiecePrefab::default();
        assert_eq!(prefab.scale_for_width(0.1), Some(2.0));
        assert_eq!(prefab.scale_for_width(0.0), None);
        assert_eq!(prefab.scale_for_width(-0.05), None);
    }

    #[test]
    fn test_lookup_by_kind() {
        let prefabs = PiecePrefabs {
            o: Some(PiecePrefab::default()),
            x: None,
        };
        assert!(prefabs.get(PieceKind::O).is_some());
        assert!(prefabs.get(PieceKind::X).is_none());
    }
}
