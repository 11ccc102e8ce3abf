//! Line-segment path network of the park
//!
//! Every walkable path is a straight segment `y = a*x + b` bounded by two
//! x coordinates. Paths link into a directed graph through two successor
//! lists: one consulted when an animal arrives walking in reverse, one
//! when it arrives walking forward. The graph is built once per session
//! and never mutated afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable index of a path inside its [`Graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathId(pub usize);

/// A walkable line segment
///
/// `start`/`stop` bound the segment on the x axis; `stop` is the natural
/// forward end. Reverse walkers move from `stop` toward `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Slope of `y = a*x + b`
    pub a: f32,
    /// Intercept of `y = a*x + b`
    pub b: f32,
    /// x coordinate of the segment's natural beginning
    pub start: f32,
    /// x coordinate of the segment's natural end
    pub stop: f32,
    /// Whether this path is the bench
    pub bench: bool,
    /// Draw layer; negative paints behind the scenery foreground
    pub z_index: i32,
    /// Successors taken when arriving while walking in reverse
    pub successors_left: Vec<PathId>,
    /// Successors taken when arriving while walking forward
    pub successors_right: Vec<PathId>,
}

impl Path {
    /// Build a path from its pixel endpoints. Successor lists start empty.
    pub fn from_endpoints(x1: f32, y1: f32, x2: f32, y2: f32, z_index: i32) -> Self {
        let a = (y2 - y1) / (x2 - x1);
        Self {
            a,
            b: y1 - a * x1,
            start: x1,
            stop: x2,
            bench: false,
            z_index,
            successors_left: Vec::new(),
            successors_right: Vec::new(),
        }
    }

    /// y coordinate of the segment at a given x
    #[inline]
    pub fn y_at(&self, x: f32) -> f32 {
        self.a * x + self.b
    }

    /// Endpoint at `start`
    pub fn start_point(&self) -> Vec2 {
        Vec2::new(self.start, self.y_at(self.start))
    }

    /// Endpoint at `stop`
    pub fn stop_point(&self) -> Vec2 {
        Vec2::new(self.stop, self.y_at(self.stop))
    }

    /// Euclidean length of the segment
    pub fn length(&self) -> f32 {
        self.start_point().distance(self.stop_point())
    }

    /// Position after covering `progress` of the segment (0.0 to 1.0),
    /// direction-aware: reverse walkers start at `stop`.
    pub fn point_at(&self, progress: f32, reverse: bool) -> Vec2 {
        let x = if reverse {
            self.stop - (self.stop - self.start) * progress
        } else {
            self.start + (self.stop - self.start) * progress
        };
        Vec2::new(x, self.y_at(x))
    }

    /// Successor list for the given walking direction
    #[inline]
    pub fn successors(&self, reverse: bool) -> &[PathId] {
        if reverse {
            &self.successors_left
        } else {
            &self.successors_right
        }
    }
}

/// A malformed path network. The layout is hand-authored, so any of these
/// aborts initialization instead of being recovered from.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// A successor id points past the end of the path arena
    #[error("successor {successor:?} of path {path:?} is out of bounds")]
    SuccessorOutOfBounds {
        /// Path holding the bad reference
        path: PathId,
        /// The out-of-bounds id
        successor: PathId,
    },
    /// A path can never be walked because no entrance leads to it
    #[error("path {0:?} is not reachable from any entrance")]
    Unreachable(PathId),
    /// A nonempty successor list offers only bench paths, which would let
    /// the contested-bench re-roll spin forever
    #[error("path {0:?} can only continue onto the bench")]
    BenchOnlySuccessors(PathId),
    /// The layout must contain exactly one bench
    #[error("expected exactly one bench path, found {0}")]
    BenchCount(usize),
    /// An entrance id points past the end of the path arena
    #[error("entrance {0:?} is out of bounds")]
    EntranceOutOfBounds(PathId),
}

/// The park's immutable path network. Only [`Graph::new`] can produce
/// one, so every instance has passed validation.
#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    paths: Vec<Path>,
    entrances: Vec<PathId>,
    bench: PathId,
}

impl Graph {
    /// Wrap a path arena and entrance set, validating the invariants the
    /// simulator relies on: ids in bounds, exactly one bench, no
    /// bench-only successor lists, and every path reachable from an
    /// entrance.
    pub fn new(paths: Vec<Path>, entrances: Vec<PathId>) -> Result<Self, GraphError> {
        for &entrance in &entrances {
            if entrance.0 >= paths.len() {
                return Err(GraphError::EntranceOutOfBounds(entrance));
            }
        }

        let mut bench = None;
        for (i, path) in paths.iter().enumerate() {
            if path.bench {
                if bench.is_some() {
                    return Err(GraphError::BenchCount(
                        paths.iter().filter(|p| p.bench).count(),
                    ));
                }
                bench = Some(PathId(i));
            }
            for list in [&path.successors_left, &path.successors_right] {
                if list.is_empty() {
                    continue;
                }
                for &succ in list {
                    if succ.0 >= paths.len() {
                        return Err(GraphError::SuccessorOutOfBounds {
                            path: PathId(i),
                            successor: succ,
                        });
                    }
                }
                if list.iter().all(|&succ| paths[succ.0].bench) {
                    return Err(GraphError::BenchOnlySuccessors(PathId(i)));
                }
            }
        }
        let bench = bench.ok_or(GraphError::BenchCount(0))?;

        // Flood from the entrances over both successor lists.
        let mut seen = vec![false; paths.len()];
        let mut frontier: Vec<usize> = entrances.iter().map(|id| id.0).collect();
        for &i in &frontier {
            seen[i] = true;
        }
        while let Some(i) = frontier.pop() {
            for list in [&paths[i].successors_left, &paths[i].successors_right] {
                for &succ in list {
                    if !seen[succ.0] {
                        seen[succ.0] = true;
                        frontier.push(succ.0);
                    }
                }
            }
        }
        if let Some(i) = seen.iter().position(|&s| !s) {
            return Err(GraphError::Unreachable(PathId(i)));
        }

        Ok(Self {
            paths,
            entrances,
            bench,
        })
    }

    /// The authored park layout: 16 paths wiring benches, junctions and
    /// seven entrances into one walkable scene.
    pub fn park() -> Result<Self, GraphError> {
        let spans: [(f32, f32, f32, f32, i32); 16] = [
            (1545.0, 299.0, 1643.0, 392.0, -1),
            (28.0, 561.0, 686.0, 487.0, 1),
            (686.0, 487.0, 1194.0, 493.0, 1),
            (1194.0, 493.0, 1195.0, 493.0, 0),
            (1195.0, 493.0, 1414.0, 494.0, 1),
            (1414.0, 494.0, 1900.0, 432.0, 1),
            (393.0, 1027.0, 615.0, 738.0, 4),
            (615.0, 738.0, 840.0, 622.0, 4),
            (1185.0, 807.0, 1603.0, 999.0, 3),
            (840.0, 622.0, 1185.0, 807.0, 3),
            (686.0, 487.0, 840.0, 622.0, 3),
            (329.0, 225.0, 686.0, 487.0, 0),
            (260.0, 312.0, 329.0, 225.0, -1),
            (951.0, 1025.0, 1185.0, 807.0, 4),
            (1185.0, 807.0, 1414.0, 494.0, 2),
            (1414.0, 494.0, 1545.0, 299.0, 0),
        ];
        let mut paths: Vec<Path> = spans
            .iter()
            .map(|&(x1, y1, x2, y2, z)| Path::from_endpoints(x1, y1, x2, y2, z))
            .collect();

        paths[3].bench = true;

        // (reverse-arrival successors, forward-arrival successors)
        let links: [(&[usize], &[usize]); 16] = [
            (&[15], &[]),
            (&[], &[11, 2, 10]),
            (&[1, 11, 10], &[3, 4]),
            (&[2, 4], &[2, 4]),
            (&[2, 3], &[14, 15, 5]),
            (&[4, 14, 15], &[]),
            (&[], &[7]),
            (&[6], &[9, 10]),
            (&[9, 13, 14], &[]),
            (&[7, 10], &[8, 13, 14]),
            (&[1, 11, 2], &[7, 9]),
            (&[12], &[1, 2, 10]),
            (&[], &[11]),
            (&[], &[9, 14, 8]),
            (&[9, 13, 8], &[4, 15, 5]),
            (&[4, 14, 5], &[0]),
        ];
        for (path, (left, right)) in paths.iter_mut().zip(links) {
            path.successors_left = left.iter().map(|&i| PathId(i)).collect();
            path.successors_right = right.iter().map(|&i| PathId(i)).collect();
        }

        let entrances = [1, 12, 6, 13, 8, 0, 5].map(PathId).to_vec();
        Self::new(paths, entrances)
    }

    /// Path lookup. Ids come from this graph, so the index is always valid.
    #[inline]
    pub fn path(&self, id: PathId) -> &Path {
        &self.paths[id.0]
    }

    /// All paths, indexable by [`PathId`]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Paths where new animals may appear
    pub fn entrances(&self) -> &[PathId] {
        &self.entrances
    }

    /// The single bench path
    pub fn bench(&self) -> PathId {
        self.bench
    }

    /// Walking direction for an animal spawned at `entrance`: reverse when
    /// the entrance is entered from its far end, which its successor
    /// wiring encodes as a nonempty reverse-arrival list.
    pub fn entrance_reverse(&self, entrance: PathId) -> bool {
        !self.path(entrance).successors_left.is_empty()
    }
}
