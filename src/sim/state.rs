//! Species resources and the simulated agent pool
//!
//! Everything the day generator produces lives here. Segments are mutable
//! while the day is being generated and frozen once the timeline is
//! returned; from then on the pool is replayed, never re-simulated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::graph::PathId;

/// Kinds of park inhabitants. Three species walk the paths; `Leaf` is
/// decorative set dressing that never becomes an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimalKind {
    Sheep,
    Coati,
    Boar,
    Leaf,
}

/// Static per-kind resources: sprite identity and layout metadata.
/// Actual bitmaps belong to the renderer; the simulation only ever names
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KindInfo {
    /// Sprite shown while walking
    pub walk_sprite: &'static str,
    /// Sprite shown while sitting on the bench
    pub sit_sprite: &'static str,
    /// Walking sprite size in pixels, for rotation-center offsets
    pub walk_size: Vec2,
    /// Screen y of the bench seat for this kind
    pub bench_y: f32,
    /// Paint order among animals sharing a path layer
    pub priority: i32,
}

const SHEEP: KindInfo = KindInfo {
    walk_sprite: "sheep",
    sit_sprite: "sheep_sitting",
    walk_size: Vec2::new(240.0, 170.0),
    bench_y: 310.0,
    priority: 0,
};

const COATI: KindInfo = KindInfo {
    walk_sprite: "coati",
    sit_sprite: "coati_sitting",
    walk_size: Vec2::new(280.0, 200.0),
    bench_y: 350.0,
    priority: 2,
};

const BOAR: KindInfo = KindInfo {
    walk_sprite: "boar",
    sit_sprite: "boar_sitting",
    walk_size: Vec2::new(260.0, 190.0),
    bench_y: 310.0,
    priority: 1,
};

const LEAF: KindInfo = KindInfo {
    walk_sprite: "leaf",
    sit_sprite: "leaf",
    walk_size: Vec2::new(60.0, 60.0),
    bench_y: 0.0,
    priority: 0,
};

impl AnimalKind {
    /// Kinds the day generator may spawn, in spawn-roll order
    pub const SPAWNABLE: [AnimalKind; 3] = [AnimalKind::Sheep, AnimalKind::Coati, AnimalKind::Boar];

    /// Static resources for this kind
    pub fn info(self) -> &'static KindInfo {
        match self {
            AnimalKind::Sheep => &SHEEP,
            AnimalKind::Coati => &COATI,
            AnimalKind::Boar => &BOAR,
            AnimalKind::Leaf => &LEAF,
        }
    }
}

/// Behavioral state of one agent segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    /// On the move along its path
    Walking,
    /// Seated on the left bench slot
    BenchLeft,
    /// Seated on the right bench slot
    BenchRight,
    /// Sprawled across both bench slots
    BenchCenter,
}

impl AgentState {
    /// Whether this state occupies the left bench slot
    pub fn takes_left(self) -> bool {
        matches!(self, AgentState::BenchLeft | AgentState::BenchCenter)
    }

    /// Whether this state occupies the right bench slot
    pub fn takes_right(self) -> bool {
        matches!(self, AgentState::BenchRight | AgentState::BenchCenter)
    }

    /// Whether the agent is seated at all
    pub fn is_benched(self) -> bool {
        self != AgentState::Walking
    }
}

/// One agent's stay on one path
///
/// A journey across the park is a chain of segments sharing an `id`; each
/// path-to-path hop allocates a fresh record instead of mutating a
/// long-lived one, so a segment's lifetime is exactly its tick range.
/// Ticks are absolute and may run past the end of the day for journeys
/// that straddle midnight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSegment {
    /// First tick this segment exists
    pub spawn: i32,
    /// Last tick this segment exists; never below `spawn`
    pub despawn: i32,
    /// Behavioral state for the whole segment
    pub state: AgentState,
    /// Walking against the path's natural orientation
    pub reverse: bool,
    /// The path being walked or sat on
    pub path: PathId,
    /// Species of the journey
    pub kind: AnimalKind,
    /// Walk-duration multiplier, sampled once per journey
    pub speed: f32,
    /// Journey identity, preserved across path hops
    pub id: u32,
}

impl AgentSegment {
    /// Simulator-side activity test (inclusive on both ends)
    #[inline]
    pub fn active_at(&self, tick: i32) -> bool {
        self.spawn <= tick && tick <= self.despawn
    }

    /// Compositor-side visibility test (exclusive upper bound, so a
    /// segment hands off to its successor without a double draw)
    #[inline]
    pub fn visible_at(&self, tick: i32) -> bool {
        self.spawn <= tick && tick < self.despawn
    }
}

/// The finished product of a day simulation: an append-only pool of
/// segments, replayed by tick lookup at render time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// All segments, in creation order
    pub segments: Vec<AgentSegment>,
}

impl Timeline {
    /// An empty timeline; composes to empty frames
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of segments in the pool
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when no day has been simulated
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of distinct journeys in the pool
    pub fn journeys(&self) -> usize {
        self.segments
            .iter()
            .map(|s| s.id)
            .max()
            .map_or(0, |max| max as usize + 1)
    }
}
