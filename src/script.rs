//! Scripted session replay.
//!
//! A session script is a JSON file listing frames. Each frame sets the camera
//! pose and touches, reports tracked markers, issues UI commands and then
//! ticks the game. It stands in for a device so the whole placement flow can
//! run headless.
//!
//! ```json
//! {
//!   "ground_heights": [0.0],
//!   "frames": [
//!     { "camera": { "position": [0, 1.4, 0] },
//!       "markers": [{ "id": 1, "name": "Card", "position": [0, 0, 0.8] }] },
//!     { "commands": [{ "type": "confirm_board" }] },
//!     { "dt": 0.016, "repeat": 30,
//!       "markers": [{ "id": 2, "name": "X", "position": [0.2, 0.0, 1.2] }] },
//!     { "commands": [{ "type": "confirm_piece", "marker": 2 }] }
//!   ]
//! }
//! ```
//!
//! Fields left out fall back to defaults: `dt` is 1/60 s, `repeat` is 1,
//! markers report `Tracking` with a 5 cm image.

use std::error::Error;
use std::path::Path;

use glam::{Vec2, Vec3};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::components::gridcell::CellOccupancy;
use crate::components::marker::{MarkerId, TrackingState};
use crate::components::transform::{Transform3D, euler_vec_degrees, to_euler_degrees};
use crate::events::board::{ClearBoard, ConfirmBoardPlacement, RecenterBoard, ResetBoard};
use crate::events::grid::GenerateGrid;
use crate::events::piece::{CancelPiecePlacement, ConfirmPiecePlacement};
use crate::events::tracking::{MarkerUpdate, TrackedMarkersChanged};
use crate::game::ArGame;
use crate::resources::raycast::{GroundPlanes, Raycaster};
use crate::resources::touch::TouchContact;

fn default_dt() -> f32 {
    1.0 / 60.0
}

fn default_repeat() -> u32 {
    1
}

fn default_marker_size() -> Vec2 {
    Vec2::splat(0.05)
}

fn default_tracking() -> TrackingState {
    TrackingState::Tracking
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionScript {
    /// Heights of detected horizontal planes; none means every ray misses.
    #[serde(default)]
    pub ground_heights: Vec<f32>,
    pub frames: Vec<ScriptFrame>,
}

/// A position plus Euler rotation in degrees `(pitch, yaw, roll)`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScriptPose {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
}

impl ScriptPose {
    pub fn to_transform(self) -> Transform3D {
        Transform3D::from_translation_rotation(self.position, euler_vec_degrees(self.rotation))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptMarker {
    pub id: MarkerId,
    pub name: String,
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_marker_size")]
    pub size: Vec2,
    #[serde(default = "default_tracking")]
    pub tracking: TrackingState,
}

impl ScriptMarker {
    fn to_update(&self, jitter: Vec3) -> MarkerUpdate {
        MarkerUpdate {
            id: self.id,
            name: self.name.clone(),
            pose: Transform3D::from_translation_rotation(
                self.position + jitter,
                euler_vec_degrees(self.rotation),
            ),
            tracking: self.tracking,
            size: self.size,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptCommand {
    ConfirmBoard,
    Recenter,
    Reset,
    ClearBoard,
    /// Confirm the piece spawned for marker `marker`.
    ConfirmPiece { marker: MarkerId },
    CancelPiece { marker: MarkerId },
    RegenerateGrid {
        grid_size: Option<u32>,
        cell_size: Option<f32>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptFrame {
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Number of ticks this frame is replayed for; inputs are re-sent on
    /// each one, commands only on the first.
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    pub camera: Option<ScriptPose>,
    #[serde(default)]
    pub touches: Vec<TouchContact>,
    #[serde(default)]
    pub markers: Vec<ScriptMarker>,
    #[serde(default)]
    pub commands: Vec<ScriptCommand>,
}

impl SessionScript {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Board state at the end of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSummary {
    pub position: Vec3,
    /// `(pitch, yaw, roll)` degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
    /// One string per row, `.` for empty cells.
    pub rows: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub ticks: u64,
    pub board: Option<BoardSummary>,
}

/// Options for [`replay`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    /// Maximum random offset added to each marker position, meters.
    pub jitter: f32,
    pub seed: u64,
}

/// Run `script` against `game` and summarize the result.
pub fn replay(game: &mut ArGame, script: &SessionScript, options: ReplayOptions) -> ReplaySummary {
    game.set_raycaster(Raycaster::new(GroundPlanes::new(script.ground_heights.clone())));
    let mut rng = fastrand::Rng::with_seed(options.seed);
    let mut ticks = 0;

    for (index, frame) in script.frames.iter().enumerate() {
        debug!("Frame {} ({} ticks)", index, frame.repeat);
        for step in 0..frame.repeat.max(1) {
            if let Some(camera) = frame.camera {
                game.set_camera_pose(camera.to_transform());
            }
            game.set_touches(frame.touches.iter().copied());
            if !frame.markers.is_empty() {
                let updates: Vec<MarkerUpdate> = frame
                    .markers
                    .iter()
                    .map(|m| m.to_update(jitter(&mut rng, options.jitter)))
                    .collect();
                game.world.trigger(TrackedMarkersChanged::updated(updates));
            }
            if step == 0 {
                for command in &frame.commands {
                    run_command(game, command);
                }
            }
            game.tick(frame.dt);
            ticks += 1;
        }
    }

    ReplaySummary {
        ticks,
        board: board_summary(game),
    }
}

fn jitter(rng: &mut fastrand::Rng, amount: f32) -> Vec3 {
    if amount <= 0.0 {
        return Vec3::ZERO;
    }
    let mut axis = || (rng.f32() * 2.0 - 1.0) * amount;
    Vec3::new(axis(), axis(), axis())
}

fn run_command(game: &mut ArGame, command: &ScriptCommand) {
    info!("Command {:?}", command);
    match *command {
        ScriptCommand::ConfirmBoard => game.world.trigger(ConfirmBoardPlacement),
        ScriptCommand::Recenter => game.world.trigger(RecenterBoard),
        ScriptCommand::Reset => game.world.trigger(ResetBoard),
        ScriptCommand::ClearBoard => game.world.trigger(ClearBoard),
        ScriptCommand::ConfirmPiece { marker } => match game.piece_for_marker(marker) {
            Some(piece) => game.world.trigger(ConfirmPiecePlacement { piece }),
            None => warn!("No piece bound to marker {}", marker),
        },
        ScriptCommand::CancelPiece { marker } => match game.piece_for_marker(marker) {
            Some(piece) => game.world.trigger(CancelPiecePlacement { piece }),
            None => warn!("No piece bound to marker {}", marker),
        },
        ScriptCommand::RegenerateGrid {
            grid_size,
            cell_size,
        } => match game.board() {
            Some(board) => game.world.trigger(GenerateGrid {
                board,
                grid_size,
                cell_size,
            }),
            None => warn!("Cannot regenerate grid: no board"),
        },
    }
}

/// Render an occupancy matrix as one string per row.
pub fn layout_rows(layout: &[Vec<CellOccupancy>]) -> Vec<String> {
    layout
        .iter()
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

pub fn board_summary(game: &ArGame) -> Option<BoardSummary> {
    let transform = game.board_transform()?;
    Some(BoardSummary {
        position: transform.translation,
        rotation: to_euler_degrees(transform.rotation),
        scale: transform.scale,
        rows: layout_rows(&game.board_layout().unwrap_or_default()),
    })
}
