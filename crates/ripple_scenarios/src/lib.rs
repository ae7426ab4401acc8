//! Ripple Scenarios
//!
//! Scripted input streams played against a real [`EventManager`] on a
//! virtual clock. Each case builds its own node tree, drives touches, mouse
//! and axis samples through the manager and checks what recognizers and
//! callbacks observed.
//!
//! [`EventManager`]: ripple_events::EventManager

pub mod context;
pub mod runner;
pub mod scenarios;

pub use context::{ScenarioContext, ROOT_SIZE};
pub use runner::{RunReport, ScenarioCase, ScenarioOutcome, ScenarioRun, ScenarioRunner, ScenarioSuite};
pub use scenarios::all_suites;
