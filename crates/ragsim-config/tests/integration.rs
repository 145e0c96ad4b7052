//! Integration tests for ragsim-config.
//!
//! These tests exercise file round trips through a temporary directory and
//! loading scenarios into a live session.

use ragsim_config::{
    ConfigError, SCENARIO_NAMES, Settings, SnapshotFile, get_scenario, load_state, save_state,
};
use ragsim_core::{EdgeKind, Position, RagError, Session};
use tempfile::TempDir;

/// Build a session, save it, load it back, and compare.
#[test]
fn test_snapshot_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("state.json");

    let mut session = Session::new();
    session.add_process("P1").unwrap();
    session.add_process("P2").unwrap();
    session.add_resource("R1", 2).unwrap();
    session.request("P1", "R1", 2).unwrap();
    session.request("P2", "R1", 1).unwrap();
    session.move_node("P1", Position::new(12.5, 40.0)).unwrap();

    save_state(&path, session.graph(), session.layout()).unwrap();
    assert!(path.exists());

    let (graph, layout) = load_state(&path).unwrap();
    assert_eq!(graph, *session.graph());
    assert_eq!(layout, *session.layout());
    assert!(graph.has_edge("P2", "R1", EdgeKind::Request));
}

/// A rejected non-finite move leaves a state that still round-trips.
#[test]
fn test_non_finite_move_keeps_snapshot_loadable() {
    let mut session = Session::new();
    session.add_process("P1").unwrap();
    assert!(session.move_node("P1", Position::new(f64::NAN, 0.0)).is_err());

    let json = SnapshotFile::from_state(session.graph(), session.layout())
        .to_json()
        .unwrap();
    let (graph, layout) = SnapshotFile::from_json(&json).unwrap().to_state().unwrap();
    assert_eq!(graph, *session.graph());
    assert_eq!(layout, *session.layout());
}

/// Missing files surface as ReadFile with the path.
#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.json");
    let err = SnapshotFile::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { path: ref p, .. } if *p == path));
}

/// A syntactically broken file is an InvalidFormat graph error.
#[test]
fn test_load_garbage_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    std::fs::write(&path, "{\"graph\": [").unwrap();
    let err = load_state(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Graph(RagError::InvalidFormat(_))));
}

/// A dangling edge endpoint is rejected before any graph is returned.
#[test]
fn test_load_dangling_edge() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dangling.json");
    std::fs::write(
        &path,
        r#"{"graph": {"nodes": [{"id": "P1", "type": "process"}],
            "edges": [{"source": "P1", "target": "R9", "type": "request", "instances": 1}]}}"#,
    )
    .unwrap();
    let err = load_state(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Graph(RagError::InvalidFormat(_))));
}

/// Settings written to disk come back identical.
#[test]
fn test_settings_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ragsim.toml");

    let mut settings = Settings::default();
    settings.history_limit = 10;
    settings.canvas.width = 1200.0;
    settings.save(&path).unwrap();

    let loaded = Settings::load(&path).unwrap();
    assert_eq!(loaded, settings);
}

/// Every scenario loads into a session, and exports as a file that loads back.
#[test]
fn test_scenarios_through_session_and_disk() {
    let temp_dir = TempDir::new().unwrap();

    for name in SCENARIO_NAMES {
        let (graph, layout) = get_scenario(name).unwrap().to_state().unwrap();
        let mut session = Session::new();
        session.load(graph, layout);
        assert_eq!(
            session.layout().len(),
            session.graph().node_count(),
            "every node of '{name}' should be placed"
        );

        let path = temp_dir.path().join(format!("{name}.json"));
        save_state(&path, session.graph(), session.layout()).unwrap();
        let (graph, _) = load_state(&path).unwrap();
        assert_eq!(graph, *session.graph());
    }
}

/// Releasing in the promotion scenario promotes the smaller request.
#[test]
fn test_promotion_scenario_release() {
    let (graph, layout) = get_scenario("promotion").unwrap().to_state().unwrap();
    let mut session = Session::new();
    session.load(graph, layout);

    let outcome = session.release("P1", "R1", 1).unwrap();
    assert_eq!(outcome.promoted.unwrap().process, "P3");
    assert!(session.graph().has_edge("P2", "R1", EdgeKind::Request));
}
