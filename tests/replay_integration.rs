//! Scripted session replays run end to end.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test replay_integration
//! ```

use ar_tictactoe::game::ArGame;
use ar_tictactoe::resources::gameconfig::GameConfig;
use ar_tictactoe::script::{ReplayOptions, SessionScript, replay};

const TWO_MOVES: &str = r#"{
  "ground_heights": [0.0],
  "frames": [
    { "camera": { "position": [0, 0, 0] },
      "markers": [{ "id": 1, "name": "Card", "position": [0, -0.3, 0.8] }] },
    { "commands": [{ "type": "confirm_board" }] },
    { "dt": 0.1, "repeat": 3,
      "markers": [{ "id": 2, "name": "X", "position": [0.2, -0.1, 1.2] }] },
    { "commands": [{ "type": "confirm_piece", "marker": 2 }] },
    { "dt": 0.1, "repeat": 3,
      "markers": [{ "id": 3, "name": "O", "position": [-0.2, -0.1, 0.8] }] },
    { "commands": [{ "type": "confirm_piece", "marker": 3 }] }
  ]
}"#;

fn run(text: &str, options: ReplayOptions) -> ar_tictactoe::script::ReplaySummary {
    let script = SessionScript::from_json(text).unwrap();
    let mut game = ArGame::new(GameConfig::new());
    game.activate();
    replay(&mut game, &script, options)
}

#[test]
fn two_moves_end_up_on_the_board() {
    let summary = run(TWO_MOVES, ReplayOptions::default());

    assert_eq!(summary.ticks, 1 + 1 + 3 + 1 + 3 + 1);
    let board = summary.board.expect("board should be placed");
    assert_eq!(board.rows, vec!["O..", "...", "..X"]);
    assert!((board.position - glam::Vec3::new(0.0, 0.0, 1.0)).length() < 1e-4);
}

#[test]
fn small_jitter_is_reproducible_and_harmless() {
    let options = ReplayOptions {
        jitter: 0.01,
        seed: 42,
    };
    let a = run(TWO_MOVES, options).board.unwrap();
    let b = run(TWO_MOVES, options).board.unwrap();

    assert_eq!(a.rows, b.rows);
    assert_eq!(a.position, b.position);
    assert_eq!(a.rows, vec!["O..", "...", "..X"]);
}

#[test]
fn confirm_piece_for_unknown_marker_is_skipped() {
    let summary = run(
        r#"{ "frames": [
            { "camera": { "position": [0, 0, 0] },
              "markers": [{ "id": 1, "name": "Card", "position": [0, -0.3, 0.8] }] },
            { "commands": [{ "type": "confirm_board" },
                           { "type": "confirm_piece", "marker": 9 }] }
        ] }"#,
        ReplayOptions::default(),
    );
    let board = summary.board.unwrap();
    assert_eq!(board.rows, vec!["...", "...", "..."]);
}

#[test]
fn clearing_leaves_no_board() {
    let summary = run(
        r#"{ "frames": [
            { "camera": { "position": [0, 0, 0] },
              "markers": [{ "id": 1, "name": "Card", "position": [0, -0.3, 0.8] }] },
            { "commands": [{ "type": "confirm_board" }] },
            { "commands": [{ "type": "clear_board" }] }
        ] }"#,
        ReplayOptions::default(),
    );
    assert!(summary.board.is_none());
    assert_eq!(summary.ticks, 3);
}

#[test]
fn demo_session_places_three_pieces() {
    let summary = run(
        include_str!("../demos/session.json"),
        ReplayOptions::default(),
    );
    let board = summary.board.expect("demo should place a board");
    let placed = board
        .rows
        .iter()
        .flat_map(|row| row.chars())
        .filter(|c| *c != '.')
        .count();
    assert_eq!(placed, 3);
}
