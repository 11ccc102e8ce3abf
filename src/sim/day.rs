//! The day generator
//!
//! Runs the whole simulated day up front, at load time, and returns a
//! finished [`Timeline`]. Rendering replays the result by tick lookup;
//! nothing is simulated per frame.
//!
//! Each tick: maybe spawn an animal at an entrance (daylight raises the
//! odds), scan bench occupancy, then resolve every segment that ends this
//! tick onto a random successor path. Journeys that run past midnight
//! keep their absolute ticks, so the loop continues past the end of the
//! day until the last animal is gone.

use log::info;
use rand::Rng;

use crate::consts::TICKS_PER_DAY;
use crate::night_value;
use crate::sim::graph::{Graph, PathId};
use crate::sim::state::{AgentSegment, AgentState, AnimalKind, Timeline};
use crate::tuning::Tuning;

/// Precompute one simulated day of animal traffic.
///
/// Deterministic: the same graph, tuning and RNG state always produce an
/// identical timeline. The caller owns the RNG so a session can seed it
/// once and reproduce a day at will.
pub fn simulate_day(graph: &Graph, tuning: &Tuning, rng: &mut impl Rng) -> Timeline {
    let mut segments: Vec<AgentSegment> = Vec::with_capacity(512);
    let mut next_id: u32 = 0;

    let mut tick: i32 = 0;
    let mut animals_left = false;
    while tick < TICKS_PER_DAY || animals_left {
        if tick < TICKS_PER_DAY {
            let night = night_value(f64::from(tick) / f64::from(TICKS_PER_DAY));
            let probability = (1.0 / tuning.avg_ticks_per_animal)
                * (1.0 - tuning.night_suppression * night).powi(2);
            if rng.random::<f64>() <= probability {
                let entrance = graph.entrances()[rng.random_range(0..graph.entrances().len())];
                let kind = AnimalKind::SPAWNABLE[rng.random_range(0..AnimalKind::SPAWNABLE.len())];
                let speed = rng.random_range(tuning.speed_min..=tuning.speed_max);
                let id = next_id;
                next_id += 1;
                segments.push(spawn_segment(
                    graph,
                    tuning,
                    tick,
                    entrance,
                    kind,
                    graph.entrance_reverse(entrance),
                    speed,
                    id,
                ));
            }
        }

        // Occupancy scan, twice per tick: once for this tick and once one
        // day later, so segments wrapped past midnight still count.
        let mut bench_left_taken = false;
        let mut bench_right_taken = false;
        animals_left = false;
        for pass_tick in [tick, tick + TICKS_PER_DAY] {
            for seg in &segments {
                if seg.active_at(pass_tick) {
                    animals_left = true;
                    if seg.state.takes_left() {
                        bench_left_taken = true;
                    }
                    if seg.state.takes_right() {
                        bench_right_taken = true;
                    }
                }
            }
        }

        // Transition resolution in pool order. Segments appended here are
        // themselves visited before the tick ends.
        let mut i = 0;
        while i < segments.len() {
            if segments[i].active_at(tick) && segments[i].state.is_benched() {
                // A sitter stays until its leave roll lands.
                segments[i].despawn = tick + 1;
                if segments[i].spawn + tuning.min_benching_time <= tick
                    && rng.random::<f64>() <= 1.0 / tuning.avg_benching_time
                {
                    segments[i].despawn = tick;
                }
            }
            if segments[i].despawn != tick {
                i += 1;
                continue;
            }

            let ending = segments[i];
            let choices = graph.path(ending.path).successors(ending.reverse);
            if choices.is_empty() {
                // A park exit: the journey ends here.
                i += 1;
                continue;
            }

            let mut new_path = choices[rng.random_range(0..choices.len())];
            let mut new_state = AgentState::Walking;
            if graph.path(new_path).bench {
                if bench_left_taken && bench_right_taken {
                    // No free seat, keep walking.
                    while graph.path(new_path).bench {
                        new_path = choices[rng.random_range(0..choices.len())];
                    }
                } else {
                    let mut sit_left = rng.random::<f64>() < 0.5;
                    if sit_left && bench_left_taken {
                        sit_left = false;
                    }
                    if !sit_left && bench_right_taken {
                        sit_left = true;
                    }
                    new_state = if sit_left {
                        AgentState::BenchLeft
                    } else {
                        AgentState::BenchRight
                    };
                    if !bench_left_taken
                        && !bench_right_taken
                        && rng.random::<f64>() < tuning.bench_monopoly_chance
                    {
                        // A lone animal sometimes sprawls across the
                        // whole bench.
                        new_state = AgentState::BenchCenter;
                        bench_left_taken = true;
                        bench_right_taken = true;
                    }
                    if sit_left {
                        bench_left_taken = true;
                    } else {
                        bench_right_taken = true;
                    }
                }
            }

            // Arriving at the new path's beginning iff the old path shows
            // up among its reverse-arrival successors.
            let at_start = graph
                .path(new_path)
                .successors_left
                .contains(&ending.path);
            let mut next = spawn_segment(
                graph,
                tuning,
                tick,
                new_path,
                ending.kind,
                !at_start,
                ending.speed,
                ending.id,
            );
            next.state = new_state;
            segments.push(next);
            i += 1;
        }

        tick += 1;
    }

    info!(
        "day generated: {} segments across {} journeys",
        segments.len(),
        next_id
    );
    Timeline { segments }
}

/// Allocate the segment for one stay on `path`, scheduling its despawn
/// from the segment length and the journey's speed multiplier.
#[allow(clippy::too_many_arguments)]
fn spawn_segment(
    graph: &Graph,
    tuning: &Tuning,
    tick: i32,
    path: PathId,
    kind: AnimalKind,
    reverse: bool,
    speed: f32,
    id: u32,
) -> AgentSegment {
    let p = graph.path(path);
    let mut despawn = tick + (p.length() / tuning.walk_units_per_tick * speed).round() as i32;
    if p.bench {
        despawn += 1;
    }
    AgentSegment {
        spawn: tick,
        despawn,
        state: AgentState::Walking,
        reverse,
        path,
        kind,
        speed,
        id,
    }
}
