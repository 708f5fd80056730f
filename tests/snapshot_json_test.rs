//! Snapshot tests - host-facing serialization

use match_three::core::{GridConfig, TurnController, TurnSnapshot, TurnState};
use match_three::types::{Coordinate, Direction, Token};

#[test]
fn test_snapshot_json_shape() {
    let mut controller = TurnController::new(GridConfig::default(), 12345).unwrap();
    controller.pick(Coordinate::new(2, 5));

    let value = serde_json::to_value(controller.snapshot()).unwrap();
    assert_eq!(value["size"], 8);
    assert_eq!(value["rows"].as_array().unwrap().len(), 8);
    assert_eq!(value["objectives"], 64);
    assert_eq!(value["tracks_objectives"], true);
    assert_eq!(value["score"], 0);
    assert_eq!(value["started"], false);
    assert_eq!(value["state"]["focused"]["x"], 2);
    assert_eq!(value["state"]["focused"]["y"], 5);
}

#[test]
fn test_snapshot_round_trips_through_json() {
    let controller = TurnController::new(GridConfig { size: 5, palette: 4 }, 8).unwrap();
    let snap = controller.snapshot();

    let json = serde_json::to_string(&snap).unwrap();
    let back: TurnSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
    assert_eq!(back.state, TurnState::Idle);
}

#[test]
fn test_snapshot_into_reuses_buffer() {
    let a = TurnController::new(GridConfig::default(), 1).unwrap();
    let b = TurnController::new(GridConfig { size: 4, palette: 3 }, 2).unwrap();

    let mut snap = TurnSnapshot::default();
    a.snapshot_into(&mut snap);
    assert_eq!(snap.rows.len(), 8);

    b.snapshot_into(&mut snap);
    assert_eq!(snap.size, 4);
    assert_eq!(snap.rows.len(), 4);
    assert_eq!(snap, b.snapshot());
}

#[test]
fn test_value_types_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&Token::Purple).unwrap(), "\"purple\"");
    assert_eq!(serde_json::to_string(&Token::Empty).unwrap(), "\"empty\"");
    assert_eq!(serde_json::to_string(&Direction::Up).unwrap(), "\"up\"");
    assert_eq!(
        serde_json::to_string(&Coordinate::new(3, -1)).unwrap(),
        r#"{"x":3,"y":-1}"#
    );
}
