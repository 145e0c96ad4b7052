//! File formats and configuration for the ragsim deadlock simulator.
//!
//! # Features
//!
//! - **Snapshots**: Load and save graphs (with node positions) as JSON
//! - **Settings**: Canvas size and undo depth from a TOML file
//! - **Scenarios**: Built-in textbook graphs, always available
//!
//! # Example
//!
//! ```rust,no_run
//! use ragsim_config::{Settings, SnapshotFile, get_scenario};
//! use ragsim_core::Session;
//!
//! let settings = Settings::load("ragsim.toml")?;
//! let mut session = Session::with_settings(settings.canvas(), settings.history_limit);
//!
//! let (graph, layout) = get_scenario("classic_deadlock")?.to_state()?;
//! session.load(graph, layout);
//! assert!(session.detect_deadlock().is_deadlocked());
//!
//! SnapshotFile::from_state(session.graph(), session.layout()).save("deadlock.json")?;
//! # Ok::<(), ragsim_config::ConfigError>(())
//! ```

mod error;
mod settings;

/// JSON snapshot file format.
pub mod snapshot;

/// Built-in scenarios bundled with the library.
pub mod scenarios;

pub use error::ConfigError;
pub use scenarios::{
    SCENARIO_NAMES, get_scenario, is_scenario, scenario_json, scenario_summary, scenarios,
};
pub use settings::{CanvasSettings, Settings};
pub use snapshot::{EdgeEntry, EdgeType, GraphData, NodeEntry, SnapshotFile, load_state, save_state};
