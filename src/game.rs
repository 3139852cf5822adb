//! Game world setup and frame tick.
//!
//! [`ArGame`] owns the ECS [`World`] and the update [`Schedule`]. The host:
//!
//! 1. creates it from a [`GameConfig`],
//! 2. calls [`ArGame::activate`] to register the observers,
//! 3. each frame writes the camera pose and touches, triggers tracking
//!    updates and UI commands on [`ArGame::world`], then calls
//!    [`ArGame::tick`],
//! 4. calls [`ArGame::deactivate`] when the AR view goes away.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info};

use crate::components::gridcell::CellOccupancy;
use crate::components::marker::{BoundPiece, MarkerId};
use crate::components::transform::Transform3D;
use crate::events::board::{
    observe_clear_board, observe_confirm_board_placement, observe_recenter_board,
    observe_reset_board,
};
use crate::events::grid::observe_generate_grid;
use crate::events::piece::{observe_cancel_piece_placement, observe_confirm_piece_placement};
use crate::events::tracking::observe_tracked_markers_changed;
use crate::resources::camera::ArCamera;
use crate::resources::gameconfig::GameConfig;
use crate::resources::markerregistry::MarkerRegistry;
use crate::resources::prefabs::PiecePrefabs;
use crate::resources::raycast::Raycaster;
use crate::resources::session::{BoardPrompt, BoardSession, PlacementTracking};
use crate::resources::subscriptions::Subscriptions;
use crate::resources::touch::{TouchContact, TouchInput};
use crate::resources::worldtime::WorldTime;
use crate::systems::gesture::board_gesture_system;
use crate::systems::grid::{board_layout, cell_at, grid_spawn_system};
use crate::systems::piece_follow::{piece_follow_system, placement_prompt_system};
use crate::systems::propagate_transforms::propagate_transforms;
use crate::systems::scale::scale_adjuster_system;
use crate::systems::time::update_world_time;
use crate::systems::trigger::trigger_volume_system;
use crate::systems::tween::pose_tween_system;

/// Per-frame update schedule.
///
/// Local transforms are settled first (grid spawn, gestures, animations,
/// scaling, following), then propagated, then used for trigger detection and
/// prompt placement.
pub fn build_update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(grid_spawn_system);
    update.add_systems(board_gesture_system);
    update.add_systems(pose_tween_system.after(board_gesture_system));
    update.add_systems(scale_adjuster_system);
    update.add_systems(piece_follow_system);
    update.add_systems(
        propagate_transforms
            .after(grid_spawn_system)
            .after(pose_tween_system)
            .after(scale_adjuster_system)
            .after(piece_follow_system),
    );
    update.add_systems(
        (trigger_volume_system, placement_prompt_system)
            .chain()
            .after(propagate_transforms),
    );
    update
}

/// Insert every resource the systems and observers expect.
pub fn insert_resources(world: &mut World, config: GameConfig) {
    let prefab = config.piece.prefab();
    world.insert_resource(WorldTime::default().with_time_scale(1.0));
    world.insert_resource(TouchInput::default());
    world.insert_resource(BoardSession::new());
    world.insert_resource(BoardPrompt::default());
    world.insert_resource(PlacementTracking::default());
    world.insert_resource(MarkerRegistry::new());
    world.insert_resource(PiecePrefabs::both(prefab));
    world.insert_resource(Subscriptions::default());
    world.insert_resource(config);
}

/// Spawn the game observers and return their entities.
pub fn spawn_observers(world: &mut World) -> Vec<Entity> {
    let observers = vec![
        world
            .spawn(Observer::new(observe_tracked_markers_changed))
            .id(),
        world
            .spawn(Observer::new(observe_confirm_board_placement))
            .id(),
        world.spawn(Observer::new(observe_recenter_board)).id(),
        world.spawn(Observer::new(observe_reset_board)).id(),
        world.spawn(Observer::new(observe_clear_board)).id(),
        world
            .spawn(Observer::new(observe_confirm_piece_placement))
            .id(),
        world
            .spawn(Observer::new(observe_cancel_piece_placement))
            .id(),
        world.spawn(Observer::new(observe_generate_grid)).id(),
    ];
    world.flush();
    observers
}

/// The AR tic-tac-toe game: world, schedule and host entry points.
pub struct ArGame {
    pub world: World,
    update: Schedule,
}

impl ArGame {
    pub fn new(config: GameConfig) -> Self {
        let mut world = World::new();
        insert_resources(&mut world, config);
        Self {
            world,
            update: build_update_schedule(),
        }
    }

    /// Register the observers. Calling it twice is a no-op.
    pub fn activate(&mut self) {
        if self.is_active() {
            debug!("Game already active");
            return;
        }
        let observers = spawn_observers(&mut self.world);
        info!("Game activated with {} observers", observers.len());
        self.world.resource_mut::<Subscriptions>().observers = observers;
    }

    /// Despawn the observers registered by [`ArGame::activate`].
    ///
    /// Events triggered afterwards reach no handler.
    pub fn deactivate(&mut self) {
        let observers = std::mem::take(&mut self.world.resource_mut::<Subscriptions>().observers);
        let count = observers.len();
        for observer in observers {
            if !self.world.despawn(observer) {
                debug!("Observer {:?} was already gone", observer);
            }
        }
        if count > 0 {
            info!("Game deactivated, {} observers removed", count);
        }
    }

    pub fn is_active(&self) -> bool {
        self.world.resource::<Subscriptions>().is_active()
    }

    /// Advance the game by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.update.run(&mut self.world);
        self.world.clear_trackers();
    }

    pub fn set_camera(&mut self, camera: ArCamera) {
        self.world.insert_resource(camera);
    }

    /// Move the camera, creating it with default optics if none was set.
    pub fn set_camera_pose(&mut self, pose: Transform3D) {
        if let Some(mut camera) = self.world.get_resource_mut::<ArCamera>() {
            camera.transform = pose;
            return;
        }
        self.world.insert_resource(ArCamera {
            transform: pose,
            ..ArCamera::default()
        });
    }

    pub fn set_touches(&mut self, contacts: impl IntoIterator<Item = TouchContact>) {
        self.world.resource_mut::<TouchInput>().set(contacts);
    }

    pub fn set_raycaster(&mut self, raycaster: Raycaster) {
        self.world.insert_resource(raycaster);
    }

    pub fn set_prefabs(&mut self, prefabs: PiecePrefabs) {
        self.world.insert_resource(prefabs);
    }

    pub fn session(&self) -> &BoardSession {
        self.world.resource::<BoardSession>()
    }

    pub fn prompt(&self) -> &BoardPrompt {
        self.world.resource::<BoardPrompt>()
    }

    pub fn board(&self) -> Option<Entity> {
        self.session().board()
    }

    /// Piece spawned for the marker with `id`, while the marker still has a
    /// proxy.
    pub fn piece_for_marker(&self, id: MarkerId) -> Option<Entity> {
        let proxy = self.world.resource::<MarkerRegistry>().get(id)?;
        self.world.get::<BoundPiece>(proxy).map(|bound| bound.0)
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Option<Entity> {
        cell_at(&self.world, self.board()?, x, y)
    }

    /// Occupancy of the current board, indexed `[y][x]`.
    pub fn board_layout(&self) -> Option<Vec<Vec<CellOccupancy>>> {
        board_layout(&self.world, self.board()?)
    }

    pub fn board_transform(&self) -> Option<Transform3D> {
        self.world.get::<Transform3D>(self.board()?).copied()
    }

    pub fn board_scale(&self) -> Option<Vec3> {
        self.board_transform().map(|t| t.scale)
    }
}
