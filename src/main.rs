//! Cave Runner entry point
//!
//! Headless demo: the autopilot plays one seeded run, then the result is
//! logged and the best distance is saved next to the working directory.
//!
//! Usage: `cave-runner [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    use cave_runner::consts::SIM_DT;
    use cave_runner::sim::{GameSession, PrefabCatalogue, TickInput, tick};
    use cave_runner::{BestDistanceStore, JsonFileStore, ScreenBounds, Tuning};

    /// Ten minutes of simulated time
    const MAX_TICKS: u64 = 10 * 60 * 50;

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => 0xCAFE,
    };
    let tuning = match args.next() {
        Some(path) => {
            log::info!("loading tuning from {path}");
            Tuning::from_json(&std::fs::read_to_string(path)?)?
        }
        None => Tuning::default(),
    };

    log::info!("Cave Runner (native) starting, seed {seed}");
    let mut session = GameSession::new(
        seed,
        tuning,
        PrefabCatalogue::default(),
        ScreenBounds::default(),
    )?;
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    while !session.is_game_over() && session.time_ticks < MAX_TICKS {
        tick(&mut session, &input, SIM_DT);
    }

    let mut store = JsonFileStore::new("cave_runner_best.json");
    session.submit_best(&mut store)?;

    match &session.summary {
        Some(summary) => println!("{}", summary.message()),
        None => println!(
            "Still running after {} ticks: {} m, tier {}",
            session.time_ticks,
            session.distance_m(),
            session.tier.as_str()
        ),
    }
    log::info!("best distance: {} m", store.load()?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page; nothing to do here
}
