//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the game world.
//!
//! Submodules overview:
//! - [`board`] – tag for the spawned board and its spatial anchor
//! - [`gridcell`] – board slot with write-once occupancy and a trigger volume
//! - [`gridgenerator`] – N×N cell lattice parameters for a board
//! - [`marker`] – proxy for an externally tracked image marker
//! - [`piece`] – O/X token following a marker until placed, plus its prompt
//! - [`scale`] – base scale times multiplier, applied every frame
//! - [`transform`] – local and world 3D transforms and their composition
//! - [`tween`] – eased pose animation for recenter/reset moves

pub mod board;
pub mod gridcell;
pub mod gridgenerator;
pub mod marker;
pub mod piece;
pub mod scale;
pub mod transform;
pub mod tween;
