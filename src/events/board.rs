//! Board commands issued by the host UI and their observers.
//!
//! - [`ConfirmBoardPlacement`] spawns the board in front of the camera.
//! - [`RecenterBoard`] animates the board back in front of the camera,
//!   resting on the ground below when a ray finds it.
//! - [`ResetBoard`] animates the board back to its flat orientation.
//! - [`ClearBoard`] destroys the board and restarts placement.
//!
//! Recenter and reset animations are [`PoseTween`] components advanced by the
//! tween system. A board carries at most one; requests issued while one runs
//! are dropped.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, error, info, warn};

use crate::components::board::{Board, SpatialAnchor};
use crate::components::gridgenerator::GridGenerator;
use crate::components::transform::{
    GlobalTransform3D, Transform3D, euler_degrees, euler_vec_degrees, look_rotation,
    to_euler_degrees,
};
use crate::components::tween::{Easing, PoseTween, TweenPurpose};
use crate::resources::camera::ArCamera;
use crate::resources::gameconfig::{GameConfig, RecenterSettings, SpawnSettings};
use crate::resources::raycast::Raycaster;
use crate::resources::session::{BoardPhase, BoardPrompt, BoardSession, PlacementTracking};
use crate::resources::worldtime::WorldTime;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ConfirmBoardPlacement;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RecenterBoard;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetBoard;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ClearBoard;

/// Pose of a freshly placed board: `distance` ahead of the camera, shifted
/// along its up and right axes, facing the camera's forward direction.
pub fn board_spawn_pose(camera: &ArCamera, spawn: &SpawnSettings) -> Transform3D {
    let translation = camera.position()
        + camera.forward() * spawn.distance
        + camera.up() * spawn.vertical_offset
        + camera.right() * spawn.horizontal_offset;
    let rotation =
        look_rotation(camera.forward(), Vec3::Y) * euler_vec_degrees(spawn.rotation_offset);
    Transform3D::from_translation_rotation(translation, rotation.normalize())
}

/// Destination of a recenter animation.
///
/// The point is taken from the viewport at `vertical_position_factor` height
/// and `near_clip + camera_distance_offset` depth, then dropped onto the
/// ground found by a downward ray cast from one meter above it. Without a
/// hit (or a raycaster) the board sits `fallback_drop` below the camera.
pub fn recenter_target(
    camera: &ArCamera,
    raycaster: Option<&Raycaster>,
    settings: &RecenterSettings,
) -> Transform3D {
    let mut position = camera.viewport_to_world(Vec3::new(
        0.5,
        settings.vertical_position_factor,
        camera.near_clip + settings.camera_distance_offset,
    ));
    let hit = raycaster.and_then(|r| {
        r.raycast(position + Vec3::Y, Vec3::NEG_Y, settings.ground_check_distance)
    });
    position.y = match hit {
        Some(hit) => hit.point.y + settings.ground_clearance,
        None => camera.position().y - settings.fallback_drop,
    };
    Transform3D {
        translation: position,
        rotation: look_rotation(camera.forward(), Vec3::Y),
        scale: Vec3::ONE,
    }
}

/// Destination of a reset animation: flat pitch, current yaw, pose otherwise
/// unchanged.
pub fn reset_target(current: &Transform3D, yaw: f32, reset_pitch: f32) -> Transform3D {
    Transform3D {
        rotation: euler_degrees(reset_pitch, yaw, 0.0),
        ..*current
    }
}

/// Spawn the board once the user confirms placement.
///
/// Requires a pending confirmation and an [`ArCamera`]. A board left over from
/// an earlier placement is despawned together with its cells.
pub fn observe_confirm_board_placement(
    _trigger: On<ConfirmBoardPlacement>,
    mut commands: Commands,
    camera: Option<Res<ArCamera>>,
    config: Res<GameConfig>,
    mut session: ResMut<BoardSession>,
    mut prompt: ResMut<BoardPrompt>,
    mut placement: ResMut<PlacementTracking>,
) {
    let Some(camera) = camera else {
        error!("Cannot place board: no AR camera");
        return;
    };
    if !matches!(session.phase(), BoardPhase::AwaitingConfirmation { .. }) {
        debug!("Board confirmation ignored in phase {:?}", session.phase());
        return;
    }

    let pose = board_spawn_pose(&camera, &config.spawn);
    let euler = to_euler_degrees(pose.rotation);
    let max_pitch = config.gesture.max_vertical_angle;
    let generator = GridGenerator::new(config.grid.size, config.grid.cell_size)
        .with_trigger_depth(config.grid.trigger_depth);

    let board = commands
        .spawn((
            Board,
            SpatialAnchor { pose },
            generator,
            pose,
            GlobalTransform3D(pose),
        ))
        .id();
    if let Some(previous) = session.place(board, euler.y, euler.x.clamp(-max_pitch, max_pitch)) {
        commands.entity(previous).despawn();
    }

    placement.enabled = false;
    prompt.hide_confirm();
    prompt.recenter_available = true;
    info!(
        "Board {:?} placed at {:?} (yaw {:.1}, pitch {:.1})",
        board, pose.translation, session.yaw, session.pitch
    );
}

/// Start a recenter animation.
pub fn observe_recenter_board(
    _trigger: On<RecenterBoard>,
    mut commands: Commands,
    session: Res<BoardSession>,
    camera: Option<Res<ArCamera>>,
    raycaster: Option<Res<Raycaster>>,
    config: Res<GameConfig>,
    time: Res<WorldTime>,
    boards: Query<(&Transform3D, Has<PoseTween>), With<Board>>,
) {
    let Some(board) = session.board() else {
        debug!("Recenter ignored: no board");
        return;
    };
    let Ok((transform, animating)) = boards.get(board) else {
        warn!("Recenter ignored: board {:?} not found", board);
        return;
    };
    if animating {
        debug!("Recenter ignored: board is already animating");
        return;
    }
    let Some(camera) = camera else {
        error!("Cannot recenter board: no AR camera");
        return;
    };
    if raycaster.is_none() {
        warn!("No raycaster available, recentering without ground check");
    }

    let target = recenter_target(&camera, raycaster.as_deref(), &config.recenter);
    commands.entity(board).insert(
        PoseTween::new(
            *transform,
            target,
            time.elapsed,
            config.recenter.duration,
            TweenPurpose::Recenter,
        )
        .with_easing(Easing::SmoothStep),
    );
    debug!("Recentering board to {:?}", target.translation);
}

/// Start a reset animation.
pub fn observe_reset_board(
    _trigger: On<ResetBoard>,
    mut commands: Commands,
    session: Res<BoardSession>,
    config: Res<GameConfig>,
    time: Res<WorldTime>,
    boards: Query<(&Transform3D, Has<PoseTween>), With<Board>>,
) {
    let Some(board) = session.board() else {
        debug!("Reset ignored: no board");
        return;
    };
    let Ok((transform, animating)) = boards.get(board) else {
        warn!("Reset ignored: board {:?} not found", board);
        return;
    };
    if animating {
        debug!("Reset ignored: board is already animating");
        return;
    }

    let target = reset_target(transform, session.yaw, config.recenter.reset_pitch);
    commands.entity(board).insert(PoseTween::new(
        *transform,
        target,
        time.elapsed,
        config.recenter.reset_duration,
        TweenPurpose::Reset,
    ));
}

/// Destroy the board and return to placement.
pub fn observe_clear_board(
    _trigger: On<ClearBoard>,
    mut commands: Commands,
    mut session: ResMut<BoardSession>,
    mut prompt: ResMut<BoardPrompt>,
    mut placement: ResMut<PlacementTracking>,
) {
    let Some(board) = session.clear() else {
        debug!("Clear ignored: no board");
        return;
    };
    commands.entity(board).despawn();
    placement.enabled = true;
    prompt.hide_confirm();
    prompt.recenter_available = false;
    info!("Board {:?} cleared", board);
}
