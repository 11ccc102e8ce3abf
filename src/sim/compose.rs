//! Scene composition
//!
//! Pure replay: project the precomputed timeline at one time of day into
//! an ordered list of sprite placements. Idempotent and re-entrant; the
//! host composes the same timeline twice per frame at two different
//! times, one per screen half.

use glam::Vec2;
use serde::Serialize;

use crate::consts::TICKS_PER_DAY;
use crate::night_value;
use crate::sim::graph::Graph;
use crate::sim::state::{AgentState, AnimalKind, Timeline};

/// Which of a kind's sprites a command refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpritePose {
    /// The walking sprite, rotated to the path heading
    Walking,
    /// The sitting sprite, axis-aligned on the bench
    Sitting,
}

/// Deterministic paint-order key: path layer, then species priority, then
/// journey id. Total, so equal-layer agents never flicker between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DrawKey {
    /// Owning path's draw layer
    pub z_index: i32,
    /// Species paint priority within the layer
    pub priority: i32,
    /// Journey id, the final tie-break
    pub id: u32,
}

/// One sprite placement for the external renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawCommand {
    /// Pool index of the owning segment; a non-owning back-reference
    pub segment: usize,
    /// Paint-order key the frame is sorted by
    pub key: DrawKey,
    /// Which kind's sprite to paint
    pub kind: AnimalKind,
    /// Walking or sitting artwork
    pub pose: SpritePose,
    /// Rotation-center offset inside the sprite, in pixels
    pub center: Vec2,
    /// Screen position of the rotation center
    pub pos: Vec2,
    /// Rotation in radians
    pub angle: f32,
    /// Mirror the sprite horizontally
    pub flip_h: bool,
}

/// A composed frame: draw commands in paint order, split where the
/// scenery foreground slots in between the layers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Frame {
    commands: Vec<DrawCommand>,
    split: usize,
    night: f64,
}

impl Frame {
    fn empty(night: f64) -> Self {
        Self {
            commands: Vec::new(),
            split: 0,
            night,
        }
    }

    /// All commands in paint order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands painted before the scenery foreground (negative layers)
    pub fn behind_scenery(&self) -> &[DrawCommand] {
        &self.commands[..self.split]
    }

    /// Commands painted after the scenery foreground
    pub fn in_front_of_scenery(&self) -> &[DrawCommand] {
        &self.commands[self.split..]
    }

    /// Night level at the sampled time, for the renderer's tinting
    pub fn night(&self) -> f64 {
        self.night
    }
}

/// Project the timeline at `time_of_day` (day fraction; any finite value
/// is reduced into `[0, 1)`, so externally wrapped or rewound clocks are
/// fine). An empty timeline or a non-finite time composes to an empty
/// frame.
pub fn compose_frame(graph: &Graph, timeline: &Timeline, time_of_day: f64) -> Frame {
    if !time_of_day.is_finite() {
        return Frame::empty(0.0);
    }
    let time = time_of_day.rem_euclid(1.0);
    let night = night_value(time);
    let tick = (time * f64::from(TICKS_PER_DAY)) as i32;

    let mut commands: Vec<DrawCommand> = Vec::new();
    for (index, seg) in timeline.segments.iter().enumerate() {
        // Two lookups per segment: this day, and one day later for
        // journeys that wrapped past midnight.
        for pass in 0..2 {
            let pass_time = time + f64::from(pass);
            let pass_tick = tick + pass * TICKS_PER_DAY;
            if !seg.visible_at(pass_tick) {
                continue;
            }

            let progress = (pass_time * f64::from(TICKS_PER_DAY) - f64::from(seg.spawn))
                / f64::from(seg.despawn - seg.spawn);
            let path = graph.path(seg.path);
            let walk_pos = path.point_at(progress as f32, seg.reverse);
            let info = seg.kind.info();
            let key = DrawKey {
                z_index: path.z_index,
                priority: info.priority,
                id: seg.id,
            };

            let command = if seg.state == AgentState::Walking {
                DrawCommand {
                    segment: index,
                    key,
                    kind: seg.kind,
                    pose: SpritePose::Walking,
                    center: Vec2::new(info.walk_size.x / 2.0, info.walk_size.y * 0.75),
                    pos: walk_pos,
                    angle: path.a.atan() + (pass_time * 6000.0 + index as f64).sin() as f32 / 5.0,
                    flip_h: seg.reverse,
                }
            } else {
                let seat_offset = match seg.state {
                    AgentState::BenchLeft => 85.0,
                    AgentState::BenchCenter => 40.0,
                    _ => -5.0,
                };
                DrawCommand {
                    segment: index,
                    key,
                    kind: seg.kind,
                    pose: SpritePose::Sitting,
                    center: Vec2::ZERO,
                    pos: Vec2::new(walk_pos.x - seat_offset, info.bench_y),
                    angle: 0.0,
                    flip_h: seg.state == AgentState::BenchRight,
                }
            };
            commands.push(command);
        }
    }

    commands.sort_by_key(|c| c.key);
    let split = commands.partition_point(|c| c.key.z_index < 0);
    Frame {
        commands,
        split,
        night,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::graph::{Path, PathId};
    use crate::sim::state::AgentSegment;

    /// Two flat horizontal paths chained into a loop, the second one a
    /// bench, plus a low background path.
    fn tiny_graph() -> Graph {
        let mut walk = Path::from_endpoints(0.0, 100.0, 776.0, 100.0, 1);
        let mut bench = Path::from_endpoints(776.0, 100.0, 777.0, 100.0, 0);
        let mut back = Path::from_endpoints(0.0, 50.0, 776.0, 50.0, -2);
        walk.successors_right = vec![PathId(1), PathId(2)];
        bench.bench = true;
        bench.successors_left = vec![PathId(0)];
        back.successors_left = vec![PathId(0)];
        Graph::new(vec![walk, bench, back], vec![PathId(0)]).unwrap()
    }

    fn segment(id: u32, spawn: i32, despawn: i32) -> AgentSegment {
        AgentSegment {
            spawn,
            despawn,
            state: AgentState::Walking,
            reverse: false,
            path: PathId(0),
            kind: AnimalKind::Sheep,
            speed: 1.0,
            id,
        }
    }

    #[test]
    fn test_empty_timeline_composes_empty_frame() {
        let graph = tiny_graph();
        let frame = compose_frame(&graph, &Timeline::new(), 0.5);
        assert!(frame.commands().is_empty());
        assert!(frame.behind_scenery().is_empty());
        assert!(frame.in_front_of_scenery().is_empty());
    }

    #[test]
    fn test_walking_position_interpolates() {
        let graph = tiny_graph();
        let timeline = Timeline {
            segments: vec![segment(0, 0, 20)],
        };
        // Tick 10 of 20: halfway down the 776-unit path.
        let frame = compose_frame(&graph, &timeline, 10.0 / 1440.0);
        assert_eq!(frame.commands().len(), 1);
        let cmd = &frame.commands()[0];
        assert_eq!(cmd.pose, SpritePose::Walking);
        assert!((cmd.pos.x - 388.0).abs() < 1.0);
        assert!((cmd.pos.y - 100.0).abs() < 0.001);
        assert!(!cmd.flip_h);
    }

    #[test]
    fn test_reverse_walker_flips_and_mirrors() {
        let graph = tiny_graph();
        let mut seg = segment(0, 0, 20);
        seg.reverse = true;
        let timeline = Timeline {
            segments: vec![seg],
        };
        let frame = compose_frame(&graph, &timeline, 5.0 / 1440.0);
        let cmd = &frame.commands()[0];
        // A quarter in, measured from the far end.
        assert!((cmd.pos.x - 582.0).abs() < 1.0);
        assert!(cmd.flip_h);
    }

    #[test]
    fn test_midnight_wrap_renders_on_both_sides() {
        let graph = tiny_graph();
        // Spawned 10 ticks before midnight on a 20-tick walk: despawns at
        // tick 1450, i.e. tick 10 of the next day.
        let timeline = Timeline {
            segments: vec![segment(0, 1430, 1450)],
        };

        let late = compose_frame(&graph, &timeline, 1435.0 / 1440.0);
        assert_eq!(late.commands().len(), 1);

        let early = compose_frame(&graph, &timeline, 5.0 / 1440.0);
        assert_eq!(early.commands().len(), 1);
        // Continuity across the boundary: 15 of 20 ticks covered.
        let cmd = &early.commands()[0];
        assert!((cmd.pos.x - 776.0 * 0.75).abs() < 1.0);

        let gone = compose_frame(&graph, &timeline, 11.0 / 1440.0);
        assert!(gone.commands().is_empty());
    }

    #[test]
    fn test_wrapped_and_rewound_times_accepted() {
        let graph = tiny_graph();
        let timeline = Timeline {
            segments: vec![segment(0, 0, 20)],
        };
        let base = compose_frame(&graph, &timeline, 5.0 / 1440.0);
        let wrapped = compose_frame(&graph, &timeline, 3.0 + 5.0 / 1440.0);
        let negative = compose_frame(&graph, &timeline, -1.0 + 5.0 / 1440.0);
        // Same instant modulo the day, so the same spot give or take
        // rounding in the wrap.
        assert!(base.commands()[0].pos.distance(wrapped.commands()[0].pos) < 0.01);
        assert!(base.commands()[0].pos.distance(negative.commands()[0].pos) < 0.01);

        assert!(compose_frame(&graph, &timeline, f64::NAN).commands().is_empty());
        assert!(
            compose_frame(&graph, &timeline, f64::INFINITY)
                .commands()
                .is_empty()
        );
    }

    #[test]
    fn test_sort_breaks_ties_by_id() {
        let graph = tiny_graph();
        // Same path, same species: order must fall back to journey id.
        let timeline = Timeline {
            segments: vec![segment(7, 0, 20), segment(3, 0, 20)],
        };
        let frame = compose_frame(&graph, &timeline, 5.0 / 1440.0);
        let ids: Vec<u32> = frame.commands().iter().map(|c| c.key.id).collect();
        assert_eq!(ids, vec![3, 7]);
    }

    #[test]
    fn test_species_priority_orders_within_layer() {
        let graph = tiny_graph();
        let mut coati = segment(0, 0, 20);
        coati.kind = AnimalKind::Coati;
        let mut sheep = segment(1, 0, 20);
        sheep.kind = AnimalKind::Sheep;
        let timeline = Timeline {
            segments: vec![coati, sheep],
        };
        let frame = compose_frame(&graph, &timeline, 5.0 / 1440.0);
        let kinds: Vec<AnimalKind> = frame.commands().iter().map(|c| c.kind).collect();
        // Sheep paint first despite the higher id.
        assert_eq!(kinds, vec![AnimalKind::Sheep, AnimalKind::Coati]);
    }

    #[test]
    fn test_negative_layers_paint_behind_scenery() {
        let graph = tiny_graph();
        let mut behind = segment(0, 0, 20);
        behind.path = PathId(2);
        let front = segment(1, 0, 20);
        let timeline = Timeline {
            segments: vec![front, behind],
        };
        let frame = compose_frame(&graph, &timeline, 5.0 / 1440.0);
        assert_eq!(frame.behind_scenery().len(), 1);
        assert_eq!(frame.behind_scenery()[0].key.id, 0);
        assert_eq!(frame.in_front_of_scenery().len(), 1);
        assert_eq!(frame.in_front_of_scenery()[0].key.id, 1);
    }

    #[test]
    fn test_benched_agent_uses_seat_offsets() {
        let graph = tiny_graph();
        let mut sitter = segment(0, 0, 2);
        sitter.path = PathId(1);
        sitter.state = AgentState::BenchLeft;
        let timeline = Timeline {
            segments: vec![sitter],
        };
        let frame = compose_frame(&graph, &timeline, 1.0 / 1440.0);
        let cmd = &frame.commands()[0];
        assert_eq!(cmd.pose, SpritePose::Sitting);
        assert_eq!(cmd.pos.y, AnimalKind::Sheep.info().bench_y);
        assert!(!cmd.flip_h);
        // The right-slot sitter mirrors and shifts the other way.
        let mut right = sitter;
        right.state = AgentState::BenchRight;
        let frame = compose_frame(
            &graph,
            &Timeline {
                segments: vec![right],
            },
            1.0 / 1440.0,
        );
        let mirrored = &frame.commands()[0];
        assert!(mirrored.flip_h);
        assert!(mirrored.pos.x > cmd.pos.x);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_compose_never_panics(time in proptest::num::f64::ANY) {
            let graph = tiny_graph();
            let timeline = Timeline {
                segments: vec![segment(0, 0, 20), segment(1, 1430, 1450)],
            };
            let frame = compose_frame(&graph, &timeline, time);
            // Paint order stays sorted whatever the clock does.
            let keys: Vec<DrawKey> = frame.commands().iter().map(|c| c.key).collect();
            let mut sorted = keys.clone();
            sorted.sort();
            prop_assert_eq!(keys, sorted);
        }
    }
}
