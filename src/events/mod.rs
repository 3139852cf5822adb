//! Event types and observers used by the game.
//!
//! The host drives the game through events: the tracking subsystem reports
//! markers with [`tracking::TrackedMarkersChanged`] and the UI issues board
//! and piece commands. Observers react immediately when an event is
//! triggered; they are registered by [`crate::game::ArGame::activate`].
//!
//! Submodules:
//! - [`board`] – confirm, recenter, reset and clear the board
//! - [`grid`] – regenerate a board's cells
//! - [`piece`] – confirm or cancel a piece placement
//! - [`tracking`] – marker tracking updates, proxies and piece spawning
pub mod board;
pub mod grid;
pub mod piece;
pub mod tracking;
