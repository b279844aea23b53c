//! Adaptive learning engine: pure in-memory state machines and policies.
//!
//! Nothing in here performs I/O or depends on the HTTP layer; every module
//! takes its inputs (including "now") explicitly.

pub mod curriculum;
pub mod difficulty;
pub mod graph;
pub mod mastery;
pub mod planner;
pub mod recommend;
pub mod srs;
pub mod types;

pub use types::{Difficulty, EngineConfig, Level, Tier};
