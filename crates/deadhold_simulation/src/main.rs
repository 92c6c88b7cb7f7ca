//! Headless симуляция DEADHOLD
//!
//! Запускает store без рендера: игрок стоит в центре, зомби идут волнами.
//! Использование: `deadhold_simulation [seed] [config.json]`

use std::time::Duration;

use deadhold_simulation::{log_error, GamePhase, SimCommand, SimulationConfig, SimulationStore};

const FRAME: Duration = Duration::from_micros(16_667);
const MAX_TICKS: u64 = 60 * 60 * 10;

fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|arg| arg.parse::<u64>().ok());

    let mut config = match args.next() {
        Some(path) => match SimulationConfig::from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("config {}: {}", path, err));
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }

    println!("Starting DEADHOLD headless simulation (seed: {})", config.seed);

    let mut store = SimulationStore::new(config);
    if let Err(reason) = store.apply(SimCommand::StartGame) {
        log_error(&format!("start rejected: {}", reason));
        std::process::exit(1);
    }

    let mut last_round = 0;
    for tick in 0..MAX_TICKS {
        store.tick(FRAME);
        store.drain_presentation();

        let round = store.round_state().round;
        if round != last_round {
            last_round = round;
            println!("Tick {}: {} ({} ms)", tick, store.round_message(), store.now_ms());
        }

        if tick % 600 == 0 {
            println!(
                "Tick {}: {} zombies, player hp {}",
                tick,
                store.zombies().len(),
                store.player().health.current
            );
        }

        if store.phase() == GamePhase::GameOver {
            break;
        }
    }

    store.wait_for_announcements(Duration::from_secs(1));
    if let Some(message) = store.game_over_message() {
        println!("{}", message);
    }

    match store.snapshot().to_json() {
        Ok(json) => println!("{}", json),
        Err(err) => log_error(&format!("snapshot: {}", err)),
    }

    println!("Simulation complete!");
}
