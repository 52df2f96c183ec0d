//! Pendulum Drop entry point
//!
//! Headless host: drives a session with a simulated frame clock, marks a
//! random selection each round and reports the results.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, ensure};
    use clap::Parser;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use pendulum_drop::GameConfig;
    use pendulum_drop::sim::{
        Action, Cell, GamePhase, RoundSnapshot, Session, TickInput, parse_seed, tick,
    };

    /// Keeps the host's cell picks off the session's random stream
    const PICKER_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;
    /// Fastest simulated frame rate accepted by `--fps`
    const MAX_FPS: f64 = 1000.0;

    #[derive(Parser, Debug)]
    #[command(name = "pendulum-drop", about = "Play double-pendulum guessing rounds headlessly")]
    struct Args {
        /// Session seed (decimal, wraps to 32 bits); defaults to the clock
        #[arg(long)]
        seed: Option<String>,
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Rounds to play
        #[arg(long, default_value_t = 1)]
        rounds: u32,
        /// Cells to mark each round
        #[arg(long, default_value_t = 10)]
        cells: u32,
        /// Simulated host frame rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Print each final snapshot as JSON
        #[arg(long)]
        json: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let config = match &args.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GameConfig::default(),
        };
        let frame = frame_interval(args.fps)?;

        let seed = parse_seed(args.seed.as_deref());
        let mut session = Session::new(seed, config);
        let mut picker = Pcg32::seed_from_u64(u64::from(seed) ^ PICKER_STREAM);

        let grid = *session.grid();
        let total = grid.cell_count();
        let marked = args.cells.clamp(1, total);
        if marked != args.cells {
            log::warn!("Marking {} cells instead of {}", marked, args.cells);
        }

        log::info!("Pendulum Drop (headless) seed {}", seed);

        // A second of attract mode before the first round
        for _ in 0..args.fps.ceil() as u32 {
            tick(&mut session, &TickInput::default(), frame);
        }

        let mut hits = 0u32;
        let mut total_score = 0u64;

        for round in 1..=args.rounds {
            let mut actions = vec![Action::Play];
            actions.extend(
                rand::seq::index::sample(&mut picker, total as usize, marked as usize)
                    .into_iter()
                    .map(|i| {
                        let i = i as u32;
                        Action::Paint(Cell::new(i / grid.columns, i % grid.columns))
                    }),
            );
            actions.push(Action::Start);
            tick(&mut session, &TickInput::new(actions), frame);

            let result = play_out(&mut session, frame);
            if result.hit {
                hits += 1;
            }
            total_score += u64::from(result.score);

            let landing = match result.landing.and_then(|l| l.cell()) {
                Some(cell) => format!("row {:>2} col {:>2}", cell.row, cell.col),
                None => "off the grid".to_string(),
            };
            println!(
                "round {:>3}: landed {}, {} marked, {}, score {}",
                round,
                landing,
                result.selected.len(),
                if result.hit { "HIT" } else { "miss" },
                result.score
            );
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }

            tick(&mut session, &TickInput::new([Action::End]), frame);
        }

        println!(
            "seed {}: {} of {} rounds hit, total score {}",
            seed, hits, args.rounds, total_score
        );
        Ok(())
    }

    /// Host frame duration for a simulated frame rate
    fn frame_interval(fps: f64) -> Result<f64> {
        ensure!(
            fps.is_finite() && fps > 0.0 && fps <= MAX_FPS,
            "--fps must be in (0, {MAX_FPS}], got {fps}"
        );
        Ok(1.0 / fps)
    }

    /// Tick until the session leaves the running phase
    fn play_out(session: &mut Session, frame: f64) -> RoundSnapshot {
        loop {
            let snap = tick(session, &TickInput::default(), frame);
            if snap.phase != GamePhase::Running {
                return snap;
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is host-agnostic; a browser host embeds the library directly
}
