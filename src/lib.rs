//! AR tic-tac-toe library.
//!
//! This module exposes the game's ECS components, resources, systems, and
//! events for use by hosts, integration tests and the session replay tool.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod script;
pub mod systems;
