//! Game systems.
//!
//! This module groups the ECS systems that advance the simulation each tick.
//! [`crate::game::build_update_schedule`] chains them in the order listed.
//!
//! Submodules overview
//! - [`grid`] – spawn board cells and look them up
//! - [`gesture`] – rotate and scale the board from touches
//! - [`tween`] – advance recenter/reset animations
//! - [`scale`] – apply piece scale multipliers
//! - [`piece_follow`] – ease pieces toward their markers, update prompts
//! - [`propagate_transforms`] – compose world transforms down the hierarchy
//! - [`trigger`] – detect pieces hovering over cells
//! - [`time`] – update simulation time and delta

pub mod gesture;
pub mod grid;
pub mod piece_follow;
pub mod propagate_transforms;
pub mod scale;
pub mod time;
pub mod trigger;
pub mod tween;
