//! Park Pong headless demo
//!
//! Builds the park graph, precomputes one day of animal traffic and
//! sweeps the compositor across it, logging what an attached renderer
//! would paint. Usage: `park-pong [seed] [tuning.json]`.

use anyhow::Context;
use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use park_pong::Tuning;
use park_pong::sim::{Graph, compose_frame, simulate_day};

const DEFAULT_SEED: u64 = 0x5eed_0da7;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("seed must be an unsigned integer, got {raw:?}"))?,
        None => DEFAULT_SEED,
    };
    let tuning = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading tuning file {path}"))?;
            Tuning::from_json(&text).with_context(|| format!("parsing tuning file {path}"))?
        }
        None => Tuning::default(),
    };
    tuning.validate().context("invalid tuning")?;

    let graph = Graph::park().context("building park layout")?;
    let mut rng = Pcg32::seed_from_u64(seed);
    let timeline = simulate_day(&graph, &tuning, &mut rng);
    info!(
        "seed {seed:#x}: {} segments, {} journeys",
        timeline.len(),
        timeline.journeys()
    );

    // One sample every two simulated hours, like a sped-up attract mode.
    for step in 0..12 {
        let time = f64::from(step) / 12.0;
        let frame = compose_frame(&graph, &timeline, time);
        info!(
            "t={time:.3} night={:.2} behind={} front={}",
            frame.night(),
            frame.behind_scenery().len(),
            frame.in_front_of_scenery().len()
        );
    }

    Ok(())
}
