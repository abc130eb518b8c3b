//! Quark Field entry point
//!
//! Trains the agent for a finite number of episodes, then drives a fresh
//! world at the visualization cadence and prints its scene snapshot as JSON.
//!
//! Usage: `quark-field [settings.json | smoke | reference | long]`

use std::process::ExitCode;

use quark_field::consts::VIEW_DT;
use quark_field::renderer::{Scene, SceneSnapshot};
use quark_field::rl::{Action, QLearningAgent, QuantumEnv, StateEncoder, train};
use quark_field::settings::TrainingPreset;
use quark_field::sim::{FieldClock, FieldWorld};
use quark_field::Settings;

fn load_settings(arg: Option<String>) -> Result<Settings, quark_field::ConfigError> {
    match arg {
        None => Ok(Settings::default()),
        Some(arg) => match TrainingPreset::from_str(&arg) {
            Some(preset) => {
                log::info!("Using {} preset", preset.as_str());
                Ok(Settings::from_preset(preset))
            }
            None => Settings::load(&arg),
        },
    }
}

fn run(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    settings.validate()?;
    let rng = settings.rng_state();

    let mut env = QuantumEnv::new(settings.world.clone(), rng.with_stream(0));
    let mut agent = QLearningAgent::new(settings.training.state_size, Action::COUNT, &settings.agent);
    let encoder = StateEncoder::new(settings.training.state_size, settings.training.encoder_levels)?;
    let mut agent_rng = rng.with_stream(1).to_rng();

    let report = train(&mut env, &mut agent, &encoder, settings, &mut agent_rng)?;
    for (rank, entry) in report.best.entries.iter().enumerate() {
        log::info!(
            "#{} episode {} reward {:.3}",
            rank + 1,
            entry.episode,
            entry.total_reward
        );
    }

    let start = encoder.encode(&env.reset());
    if let Some(action) = Action::from_index(agent.greedy_action(start.get())?) {
        log::info!("Greedy action at start: {}", action.as_str());
    }

    // Visualize a fresh world, as the window would after training
    let mut view_rng = rng.with_stream(2).to_rng();
    let mut world = FieldWorld::new(&settings.world, &mut view_rng);
    let mut clock = FieldClock::new();
    for _ in 0..settings.view_frames {
        clock.advance(&mut world, &settings.world, VIEW_DT, &mut view_rng);
    }

    let scene = Scene::build(&world);
    log::info!(
        "Rendered {} ticks: {} vertices ({} bytes), mean energy {:.3}",
        world.ticks,
        scene.vertex_count(),
        scene.quark_bytes().len() + scene.field_bytes().len(),
        world.mean_energy()
    );

    println!("{}", SceneSnapshot::capture(&world).to_json()?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Quark Field starting...");

    let settings = match load_settings(std::env::args().nth(1)) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
