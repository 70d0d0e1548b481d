//! Vertical Shmup headless driver
//!
//! Runs the simulation at 60 Hz with a scripted autopilot and prints the
//! final renderer snapshot as JSON. An optional first argument names a
//! tuning JSON file.

use std::error::Error;
use std::fs;

use vertical_shmup::{FrameInput, SimView, Simulation, Tuning};

const FRAME_DT: f32 = 1.0 / 60.0;
const FRAMES: u32 = 60 * 90;

/// Sweep under the lowest antagonist, holding fire
fn autopilot(sim: &Simulation) -> FrameInput {
    let player_x = sim.player().pos.x;
    let target = sim
        .antagonists()
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|a| a.pos.x)
        .unwrap_or(sim.width() * 0.5);

    let dx = target - player_x;
    let move_dir = if dx.abs() < 4.0 { 0.0 } else { dx.signum() };
    FrameInput {
        move_dir,
        fire: true,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let tuning = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading tuning from {}", path);
            Tuning::from_json(&fs::read_to_string(&path)?)?
        }
        None => Tuning::default(),
    };
    log::info!(
        "Vertical Shmup (headless) starting: {}x{} seed {}",
        tuning.width,
        tuning.height,
        tuning.seed
    );

    let mut sim = Simulation::new(tuning);
    for frame in 0..FRAMES {
        let input = autopilot(&sim);
        vertical_shmup::sim::tick(&mut sim, &input, FRAME_DT);

        if frame % 600 == 0 {
            log::info!(
                "t={}s wave {} score {} hp {}",
                frame / 60,
                sim.current_wave(),
                sim.score(),
                sim.player().health
            );
        }
        if sim.is_game_over() {
            break;
        }
    }

    let view = SimView::capture(&sim);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
