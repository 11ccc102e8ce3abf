//! Deterministic simulation module
//!
//! All park-life logic lives here. This module must be pure and deterministic:
//! - Integer ticks only (one tick = one simulated minute)
//! - Seeded RNG only
//! - Stable iteration order (by pool index and journey id)
//! - No rendering or platform dependencies

pub mod compose;
pub mod day;
pub mod graph;
pub mod state;

pub use compose::{DrawCommand, DrawKey, Frame, SpritePose, compose_frame};
pub use day::simulate_day;
pub use graph::{Graph, GraphError, Path, PathId};
pub use state::{AgentSegment, AgentState, AnimalKind, KindInfo, Timeline};
