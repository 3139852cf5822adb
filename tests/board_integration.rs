//! Integration tests for board placement, gestures and animations.
//!
//! Every test drives an [`ArGame`] the way a host does: write inputs, trigger
//! events, tick.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test board_integration
//! ```

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};

use ar_tictactoe::components::board::{Board, SpatialAnchor};
use ar_tictactoe::components::gridcell::GridCell;
use ar_tictactoe::components::transform::{Transform3D, euler_degrees};
use ar_tictactoe::components::tween::{PoseTween, TweenPurpose};
use ar_tictactoe::events::board::{ClearBoard, ConfirmBoardPlacement, RecenterBoard, ResetBoard};
use ar_tictactoe::events::tracking::{MarkerUpdate, TrackedMarkersChanged};
use ar_tictactoe::game::ArGame;
use ar_tictactoe::resources::camera::ArCamera;
use ar_tictactoe::resources::gameconfig::GameConfig;
use ar_tictactoe::resources::raycast::{GroundPlanes, Raycaster};
use ar_tictactoe::resources::session::{BoardPhase, PlacementTracking};
use ar_tictactoe::resources::touch::{TouchContact, TouchPhase};

const EPSILON: f32 = 1e-4;
const DT: f32 = 1.0 / 60.0;

fn approx_v3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn new_game(config: GameConfig) -> ArGame {
    let mut game = ArGame::new(config);
    game.set_camera(ArCamera::default());
    game.activate();
    game
}

fn show_card(game: &mut ArGame) {
    let pose = Transform3D::from_translation(Vec3::new(0.0, -0.3, 0.8));
    game.world
        .trigger(TrackedMarkersChanged::updated(vec![MarkerUpdate::tracking(
            1, "Card", pose,
        )]));
}

fn place_board(game: &mut ArGame) -> Entity {
    show_card(game);
    game.world.trigger(ConfirmBoardPlacement);
    game.tick(DT);
    game.board().expect("board should be placed")
}

fn drag(delta: Vec2) -> TouchContact {
    TouchContact {
        id: 0,
        position: Vec2::new(500.0, 900.0),
        delta,
        phase: TouchPhase::Moved,
    }
}

// =============================================================================
// Placement
// =============================================================================

#[test]
fn card_marker_shows_confirmation_prompt() {
    let mut game = new_game(GameConfig::new());
    show_card(&mut game);

    assert!(matches!(
        game.session().phase(),
        BoardPhase::AwaitingConfirmation { .. }
    ));
    assert!(game.prompt().confirm_visible);
    assert!(game.prompt().confirm_screen_position.is_some());
    assert!(game.board().is_none());
}

#[test]
fn confirm_spawns_board_in_front_of_camera() {
    let mut game = new_game(GameConfig::new());
    let board = place_board(&mut game);

    let transform = game.board_transform().unwrap();
    assert!(approx_v3(transform.translation, Vec3::new(0.0, 0.0, 1.0)));
    assert!(approx_v3(transform.forward(), Vec3::Z));
    assert!(game.world.get::<Board>(board).is_some());
    assert_eq!(
        game.world.get::<SpatialAnchor>(board).unwrap().pose,
        transform
    );

    assert_eq!(game.session().phase(), BoardPhase::Placed);
    assert!(!game.prompt().confirm_visible);
    assert!(game.prompt().recenter_available);
    assert!(!game.world.resource::<PlacementTracking>().enabled);
}

#[test]
fn placed_board_gets_three_by_three_grid() {
    let mut game = new_game(GameConfig::new());
    place_board(&mut game);

    let cells = game.world.query::<&GridCell>().iter(&game.world).count();
    assert_eq!(cells, 9);

    let first = game.cell_at(0, 0).unwrap();
    let last = game.cell_at(2, 2).unwrap();
    let first_local = game.world.get::<Transform3D>(first).unwrap();
    let last_local = game.world.get::<Transform3D>(last).unwrap();
    assert!(approx_v3(first_local.translation, Vec3::new(-0.2, 0.0, -0.2)));
    assert!(approx_v3(last_local.translation, Vec3::new(0.2, 0.0, 0.2)));
    assert!(game.cell_at(3, 0).is_none());
}

#[test]
fn confirm_without_card_is_ignored() {
    let mut game = new_game(GameConfig::new());
    game.world.trigger(ConfirmBoardPlacement);
    game.tick(DT);

    assert!(game.board().is_none());
    assert_eq!(game.session().phase(), BoardPhase::NoBoard);
}

#[test]
fn confirm_without_camera_aborts() {
    let mut game = new_game(GameConfig::new());
    game.world.remove_resource::<ArCamera>();
    show_card(&mut game);
    game.world.trigger(ConfirmBoardPlacement);
    game.tick(DT);

    assert!(game.board().is_none());
    assert!(game.world.query::<&Board>().iter(&game.world).next().is_none());
}

#[test]
fn card_after_placement_hides_prompt() {
    let mut game = new_game(GameConfig::new());
    let board = place_board(&mut game);

    show_card(&mut game);
    assert!(!game.prompt().confirm_visible);
    assert_eq!(game.session().phase(), BoardPhase::Placed);

    game.world.trigger(ConfirmBoardPlacement);
    game.tick(DT);
    assert_eq!(game.board(), Some(board));
    assert_eq!(game.world.query::<&Board>().iter(&game.world).count(), 1);
}

#[test]
fn clear_board_allows_placing_again() {
    let mut game = new_game(GameConfig::new());
    let first = place_board(&mut game);

    game.world.trigger(ClearBoard);
    assert!(game.world.get_entity(first).is_err());
    assert_eq!(game.session().phase(), BoardPhase::NoBoard);
    assert!(game.world.resource::<PlacementTracking>().enabled);
    assert!(!game.prompt().recenter_available);
    assert_eq!(game.world.query::<&GridCell>().iter(&game.world).count(), 0);

    let second = place_board(&mut game);
    assert_ne!(first, second);
    assert_eq!(game.world.query::<&GridCell>().iter(&game.world).count(), 9);
}

// =============================================================================
// Gestures
// =============================================================================

#[test]
fn drag_rotates_board_and_clamps_pitch() {
    let mut game = new_game(GameConfig::new());
    let board = place_board(&mut game);

    // 10 px * 20 deg/px/s * 0.1 s = 20 degrees
    game.set_touches([drag(Vec2::new(10.0, 0.0))]);
    game.tick(0.1);
    assert!((game.session().yaw + 20.0).abs() < EPSILON);
    let rotation = game.world.get::<Transform3D>(board).unwrap().rotation;
    assert!(rotation.angle_between(euler_degrees(0.0, -20.0, 0.0)) < 1e-3);

    game.set_touches([drag(Vec2::new(0.0, 1000.0))]);
    game.tick(0.1);
    assert_eq!(game.session().pitch, 90.0);

    game.set_touches([drag(Vec2::new(0.0, -5000.0))]);
    game.tick(0.1);
    assert_eq!(game.session().pitch, -90.0);
}

#[test]
fn stationary_touch_does_not_rotate() {
    let mut game = new_game(GameConfig::new());
    place_board(&mut game);

    let mut touch = drag(Vec2::new(10.0, 10.0));
    touch.phase = TouchPhase::Stationary;
    game.set_touches([touch]);
    game.tick(0.1);
    assert_eq!(game.session().yaw, 0.0);
    assert_eq!(game.session().pitch, 0.0);
}

#[test]
fn rotation_can_be_disabled() {
    let mut config = GameConfig::new();
    config.gesture.allow_rotation = false;
    let mut game = new_game(config);
    let board = place_board(&mut game);
    let before = *game.world.get::<Transform3D>(board).unwrap();

    game.set_touches([drag(Vec2::new(10.0, 10.0))]);
    game.tick(0.1);
    assert_eq!(*game.world.get::<Transform3D>(board).unwrap(), before);
}

#[test]
fn pinch_scales_board_and_clamps() {
    let mut config = GameConfig::new();
    config.gesture.max_scale = 1.8;
    let mut game = new_game(config);
    place_board(&mut game);

    // previous distance 100 px, current 150 px
    let pinch = [
        TouchContact {
            id: 0,
            position: Vec2::new(0.0, 0.0),
            delta: Vec2::ZERO,
            phase: TouchPhase::Moved,
        },
        TouchContact {
            id: 1,
            position: Vec2::new(150.0, 0.0),
            delta: Vec2::new(50.0, 0.0),
            phase: TouchPhase::Moved,
        },
    ];
    game.set_touches(pinch);
    game.tick(DT);
    assert!(approx_v3(game.board_scale().unwrap(), Vec3::splat(1.5)));

    game.tick(DT);
    assert_eq!(game.board_scale().unwrap(), Vec3::splat(1.8));
}

// =============================================================================
// Animations
// =============================================================================

#[test]
fn recenter_moves_board_onto_ground() {
    let mut game = new_game(GameConfig::new());
    game.set_raycaster(Raycaster::new(GroundPlanes::new([-1.0])));
    let board = place_board(&mut game);
    game.set_touches([]);

    game.world.trigger(RecenterBoard);
    let tween = game.world.get::<PoseTween>(board).unwrap();
    assert_eq!(tween.purpose, TweenPurpose::Recenter);

    game.tick(0.25);
    assert!(game.world.get::<PoseTween>(board).is_some());
    // halfway there the board already rests on the ground
    let mid = game.board_transform().unwrap();
    assert!((mid.translation.y - (-1.0 + 0.05)).abs() < EPSILON);
    game.tick(0.3);
    assert!(game.world.get::<PoseTween>(board).is_none());

    let transform = game.board_transform().unwrap();
    assert!((transform.translation.y - (-1.0 + 0.05)).abs() < EPSILON);
    assert!(transform.translation.z > 0.0);
    assert_eq!(transform.scale, Vec3::ONE);
}

#[test]
fn recenter_without_ground_drops_below_camera() {
    let mut game = new_game(GameConfig::new());
    game.set_raycaster(Raycaster::new(GroundPlanes::default()));
    place_board(&mut game);

    game.world.trigger(RecenterBoard);
    game.tick(1.0);

    let transform = game.board_transform().unwrap();
    assert!((transform.translation.y + 0.3).abs() < EPSILON);
}

#[test]
fn animation_requests_are_not_preemptive() {
    let mut game = new_game(GameConfig::new());
    let board = place_board(&mut game);

    game.world.trigger(RecenterBoard);
    let start = game.world.get::<PoseTween>(board).unwrap().start_time;

    game.tick(0.1);
    game.world.trigger(ResetBoard);
    game.world.trigger(RecenterBoard);
    let tween = game.world.get::<PoseTween>(board).unwrap();
    assert_eq!(tween.purpose, TweenPurpose::Recenter);
    assert_eq!(tween.start_time, start);
}

#[test]
fn gestures_are_skipped_while_animating() {
    let mut game = new_game(GameConfig::new());
    place_board(&mut game);

    game.world.trigger(RecenterBoard);
    game.set_touches([drag(Vec2::new(50.0, 50.0))]);
    game.tick(0.1);
    assert_eq!(game.session().yaw, 0.0);
    assert_eq!(game.session().pitch, 0.0);
}

#[test]
fn reset_flattens_board_and_keeps_yaw() {
    let mut game = new_game(GameConfig::new());
    let board = place_board(&mut game);

    game.set_touches([drag(Vec2::new(-15.0, 0.0))]);
    game.tick(0.1);
    game.set_touches([]);
    let yaw = game.session().yaw;
    let position = game.board_transform().unwrap().translation;
    assert!((yaw - 30.0).abs() < EPSILON);

    game.world.trigger(ResetBoard);
    game.tick(1.0);

    assert!(game.world.get::<PoseTween>(board).is_none());
    let transform = game.board_transform().unwrap();
    assert!(approx_v3(transform.translation, position));
    assert!(transform.rotation.angle_between(euler_degrees(90.0, yaw, 0.0)) < 1e-3);
    assert_eq!(game.session().pitch, 90.0);
    assert_eq!(game.session().yaw, yaw);
}

// =============================================================================
// Subscription lifecycle
// =============================================================================

#[test]
fn deactivated_game_ignores_events() {
    let mut game = new_game(GameConfig::new());
    assert!(game.is_active());

    game.deactivate();
    assert!(!game.is_active());
    show_card(&mut game);
    assert!(!game.prompt().confirm_visible);
    assert_eq!(game.session().phase(), BoardPhase::NoBoard);

    game.activate();
    show_card(&mut game);
    assert!(game.prompt().confirm_visible);
}

#[test]
fn activate_twice_registers_once() {
    let mut game = new_game(GameConfig::new());
    game.activate();
    show_card(&mut game);
    game.world.trigger(ConfirmBoardPlacement);
    game.tick(DT);

    assert_eq!(game.world.query::<&Board>().iter(&game.world).count(), 1);
}
