//! Gapflight entry point
//!
//! Headless host: reads commands from stdin, runs the simulation at a fixed
//! period and optionally traces snapshots as JSON lines on stdout.
//!
//! Example:
//!   gapflight --autopilot --level 1 --max-ticks 2000 --trace 100

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;

use gapflight::sim::{Command, GameEvent, GameState, Snapshot, TickInput, tick};
use gapflight::{FileStore, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fly through the gaps", long_about = None)]
struct Args {
    /// Settings file (JSON)
    #[arg(long, default_value = Settings::DEFAULT_PATH)]
    settings: PathBuf,
    /// Progress file, overrides the settings
    #[arg(long)]
    progress: Option<PathBuf>,
    /// Start this level right away
    #[arg(long)]
    level: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    /// Let the game fly itself
    #[arg(long)]
    autopilot: bool,
    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Print a JSON snapshot every N ticks (0 = never)
    #[arg(long, default_value_t = 0)]
    trace: u64,
}

/// Session plus host-side bookkeeping
struct Game {
    state: GameState,
    autopilot: bool,
    last_time: Instant,
    ticks: u64,
}

impl Game {
    /// Run one step with the queued commands and real elapsed time
    fn update(&mut self, commands: &[Command]) -> Vec<GameEvent> {
        let mut input = TickInput {
            autopilot: self.autopilot,
            ..Default::default()
        };
        for &command in commands {
            input.push(command);
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_time).as_secs_f32();
        self.last_time = now;
        self.ticks += 1;

        let events = tick(&mut self.state, &input, dt);
        report(&events);
        events
    }

    /// Leave any running level, then exit
    fn shutdown(&mut self) {
        self.update(&[Command::ReturnToMenu]);
        if !self.state.exited {
            self.update(&[Command::Exit]);
        }
    }
}

fn report(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::LevelLocked(locked) => println!("{locked}"),
            GameEvent::LevelEnded { summary, .. } => println!(
                "Level {} over: {} points{}",
                summary.level,
                summary.points,
                if summary.new_high_score { " (new high score)" } else { "" }
            ),
            GameEvent::CoinCollected { .. } | GameEvent::TimeBonus { .. } => {
                log::debug!("{event:?}")
            }
            _ => log::info!("{event:?}"),
        }
    }
}

/// Forward parsed stdin lines until EOF; dropping the sender signals the end
fn read_commands(tx: Sender<Command>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        match line.parse::<Command>() {
            Ok(command) => {
                if tx.send(command).is_err() {
                    break;
                }
            }
            Err(e) => log::warn!("{e}"),
        }
    }
    log::debug!("Input closed");
}

/// Drain everything queued since the last tick. The flag reports a closed input.
fn drain(rx: &Receiver<Command>) -> (Vec<Command>, bool) {
    let mut commands = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(command) => commands.push(command),
            Err(TryRecvError::Empty) => return (commands, false),
            Err(TryRecvError::Disconnected) => return (commands, true),
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = Settings::load(&args.settings);
    let progress_path = args.progress.unwrap_or_else(|| settings.progress_path.clone());
    let seed = args.seed.or(settings.seed).unwrap_or_else(time_seed);
    log::info!("Gapflight starting (seed {seed})");

    let store = FileStore::new(progress_path);
    log::info!("Progress file: {}", store.path().display());
    let mut state = GameState::new(Box::new(store), seed);
    state.countdown_sample = settings.countdown_sample_secs();
    let mut game = Game {
        state,
        autopilot: args.autopilot || settings.autopilot,
        last_time: Instant::now(),
        ticks: 0,
    };

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || read_commands(tx));

    if let Some(level) = args.level {
        game.update(&[Command::StartLevel(level)]);
    }

    let period = settings.tick_period();
    loop {
        let frame_start = Instant::now();
        let (commands, input_closed) = drain(&rx);
        game.update(&commands);
        if game.state.exited {
            break;
        }

        if args.trace > 0 && game.ticks % args.trace == 0 {
            println!("{}", serde_json::to_string(&Snapshot::capture(&game.state))?);
        }

        let out_of_ticks = args.max_ticks.is_some_and(|max| game.ticks >= max);
        if out_of_ticks || (input_closed && args.max_ticks.is_none()) {
            game.shutdown();
            break;
        }

        thread::sleep(period.saturating_sub(frame_start.elapsed()));
    }

    log::info!("Bye after {} ticks", game.ticks);
    Ok(())
}
