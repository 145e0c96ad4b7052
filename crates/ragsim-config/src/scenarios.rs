//! Built-in scenarios bundled with ragsim.
//!
//! Each scenario is a snapshot document embedded at compile time, so the
//! classic textbook situations are always available without external files.

use crate::error::ConfigError;
use crate::snapshot::SnapshotFile;

/// Names of the built-in scenarios, in listing order.
pub static SCENARIO_NAMES: &[&str] = &[
    "empty",
    "classic_deadlock",
    "safe_cycle",
    "dining_philosophers",
    "promotion",
];

/// `(name, summary, json)` for every built-in scenario.
static SCENARIOS: &[(&str, &str, &str)] = &[
    ("empty", "Empty graph", EMPTY),
    (
        "classic_deadlock",
        "Two processes each hold one resource and wait for the other's",
        CLASSIC_DEADLOCK,
    ),
    (
        "safe_cycle",
        "A cyclic wait that still completes thanks to a spare instance",
        SAFE_CYCLE,
    ),
    (
        "dining_philosophers",
        "Five philosophers, each holding the left fork and waiting for the right",
        DINING_PHILOSOPHERS,
    ),
    (
        "promotion",
        "Two queued requests; releasing one instance promotes the smaller",
        PROMOTION,
    ),
];

const EMPTY: &str = r#"{ "graph": { "nodes": [], "edges": [] } }"#;

const CLASSIC_DEADLOCK: &str = r#"{
  "graph": {
    "nodes": [
      { "id": "P1", "type": "process" },
      { "id": "P2", "type": "process" },
      { "id": "R1", "type": "resource", "instances": 1, "available": 0 },
      { "id": "R2", "type": "resource", "instances": 1, "available": 0 }
    ],
    "edges": [
      { "source": "R1", "target": "P1", "type": "allocation", "instances": 1 },
      { "source": "R2", "target": "P2", "type": "allocation", "instances": 1 },
      { "source": "P1", "target": "R2", "type": "request", "instances": 1 },
      { "source": "P2", "target": "R1", "type": "request", "instances": 1 }
    ]
  },
  "positions": {
    "P1": [200.0, 150.0],
    "P2": [600.0, 450.0],
    "R1": [200.0, 450.0],
    "R2": [600.0, 150.0]
  }
}"#;

const SAFE_CYCLE: &str = r#"{
  "graph": {
    "nodes": [
      { "id": "P1", "type": "process" },
      { "id": "P2", "type": "process" },
      { "id": "P3", "type": "process" },
      { "id": "R1", "type": "resource", "instances": 2, "available": 0 },
      { "id": "R2", "type": "resource", "instances": 1, "available": 0 }
    ],
    "edges": [
      { "source": "R1", "target": "P1", "type": "allocation", "instances": 1 },
      { "source": "R1", "target": "P3", "type": "allocation", "instances": 1 },
      { "source": "R2", "target": "P2", "type": "allocation", "instances": 1 },
      { "source": "P1", "target": "R2", "type": "request", "instances": 1 },
      { "source": "P2", "target": "R1", "type": "request", "instances": 1 }
    ]
  }
}"#;

const DINING_PHILOSOPHERS: &str = r#"{
  "graph": {
    "nodes": [
      { "id": "Phil1", "type": "process" },
      { "id": "Phil2", "type": "process" },
      { "id": "Phil3", "type": "process" },
      { "id": "Phil4", "type": "process" },
      { "id": "Phil5", "type": "process" },
      { "id": "Fork1", "type": "resource", "instances": 1, "available": 0 },
      { "id": "Fork2", "type": "resource", "instances": 1, "available": 0 },
      { "id": "Fork3", "type": "resource", "instances": 1, "available": 0 },
      { "id": "Fork4", "type": "resource", "instances": 1, "available": 0 },
      { "id": "Fork5", "type": "resource", "instances": 1, "available": 0 }
    ],
    "edges": [
      { "source": "Fork1", "target": "Phil1", "type": "allocation" },
      { "source": "Fork2", "target": "Phil2", "type": "allocation" },
      { "source": "Fork3", "target": "Phil3", "type": "allocation" },
      { "source": "Fork4", "target": "Phil4", "type": "allocation" },
      { "source": "Fork5", "target": "Phil5", "type": "allocation" },
      { "source": "Phil1", "target": "Fork2", "type": "request" },
      { "source": "Phil2", "target": "Fork3", "type": "request" },
      { "source": "Phil3", "target": "Fork4", "type": "request" },
      { "source": "Phil4", "target": "Fork5", "type": "request" },
      { "source": "Phil5", "target": "Fork1", "type": "request" }
    ]
  }
}"#;

const PROMOTION: &str = r#"{
  "graph": {
    "nodes": [
      { "id": "P1", "type": "process" },
      { "id": "P2", "type": "process" },
      { "id": "P3", "type": "process" },
      { "id": "R1", "type": "resource", "instances": 3, "available": 0 }
    ],
    "edges": [
      { "source": "R1", "target": "P1", "type": "allocation", "instances": 3 },
      { "source": "P2", "target": "R1", "type": "request", "instances": 2 },
      { "source": "P3", "target": "R1", "type": "request", "instances": 1 }
    ]
  }
}"#;

/// Raw JSON of a built-in scenario.
pub fn scenario_json(name: &str) -> Option<&'static str> {
    SCENARIOS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, _, json)| *json)
}

/// One-line summary of a built-in scenario.
pub fn scenario_summary(name: &str) -> Option<&'static str> {
    SCENARIOS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, summary, _)| *summary)
}

/// Parses a built-in scenario.
pub fn get_scenario(name: &str) -> Result<SnapshotFile, ConfigError> {
    let json = scenario_json(name).ok_or_else(|| ConfigError::ScenarioNotFound(name.to_string()))?;
    SnapshotFile::from_json(json)
}

/// Returns `true` if `name` is a built-in scenario.
pub fn is_scenario(name: &str) -> bool {
    SCENARIO_NAMES.contains(&name)
}

/// Every built-in scenario, parsed, in listing order.
pub fn scenarios() -> Vec<(&'static str, SnapshotFile)> {
    SCENARIO_NAMES
        .iter()
        .filter_map(|&name| get_scenario(name).ok().map(|file| (name, file)))
        .collect()
}
