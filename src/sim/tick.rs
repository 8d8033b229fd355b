//! Fixed timestep simulation tick
//!
//! One call advances the session by one step: menu commands, or the actor,
//! the obstacle column, collisions and the level clock while playing.

use std::str::FromStr;

use super::collision::detect;
use super::state::{Body, CollectibleKind, EndReason, GameState, LevelLocked, Phase, RunSummary};
use crate::consts::*;

/// A discrete player command, mapped from whatever device the host reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    StartLevel(u32),
    /// Start whatever level the menu has selected
    StartSelected,
    SelectLevel(u32),
    ReturnToMenu,
    Exit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    /// Parse one line of console input
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or("").to_ascii_lowercase();
        let level = |words: &mut std::str::SplitWhitespace<'_>| -> anyhow::Result<u32> {
            let arg = words
                .next()
                .ok_or_else(|| anyhow::anyhow!("`{verb}` needs a level number"))?;
            arg.parse()
                .map_err(|_| anyhow::anyhow!("`{arg}` is not a level number"))
        };

        match verb.as_str() {
            "" | "j" | "jump" => Ok(Command::Jump),
            "start" => Ok(Command::StartLevel(level(&mut words)?)),
            "select" => Ok(Command::SelectLevel(level(&mut words)?)),
            "play" => Ok(Command::StartSelected),
            "menu" => Ok(Command::ReturnToMenu),
            "exit" | "quit" => Ok(Command::Exit),
            other => anyhow::bail!("unknown command `{other}`"),
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (ignored outside `Playing`)
    pub jump: bool,
    /// Start a specific level from the menu
    pub start_level: Option<u32>,
    /// Start the selected level from the menu
    pub start_selected: bool,
    /// Change the menu selection
    pub select_level: Option<u32>,
    /// Abandon the current level
    pub return_to_menu: bool,
    /// Leave the game (menu only)
    pub exit: bool,
    /// Demo mode - the session flies the actor itself
    pub autopilot: bool,
}

impl TickInput {
    /// Fold a queued command into this tick's input
    pub fn push(&mut self, command: Command) {
        match command {
            Command::Jump => self.jump = true,
            Command::StartLevel(level) => self.start_level = Some(level),
            Command::StartSelected => self.start_selected = true,
            Command::SelectLevel(level) => self.select_level = Some(level),
            Command::ReturnToMenu => self.return_to_menu = true,
            Command::Exit => self.exit = true,
        }
    }
}

/// Something the host may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32, countdown: u32 },
    LevelLocked(LevelLocked),
    CoinCollected { coins: i32 },
    TimeBonus { countdown: u32 },
    BatchCleared { points: u32 },
    SpeedUp { speed: i32 },
    LevelEnded { reason: EndReason, summary: RunSummary },
    ReturnedToMenu { points: u32 },
    Exit,
}

/// Advance the game state by one step. `dt` is the real time since the last step.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.exited {
        return events;
    }

    match state.phase {
        Phase::Menu => tick_menu(state, input, &mut events),
        Phase::Playing => tick_playing(state, input, dt, &mut events),
        // Folded back into Menu by end_run; nothing to do
        Phase::Ended => {}
    }
    events
}

fn tick_menu(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    if let Some(level) = input.select_level {
        state.select_level(level);
    }

    let start = input
        .start_level
        .or(input.start_selected.then_some(state.selected_level));
    if let Some(level) = start {
        match state.start_level(level) {
            Ok(()) => {
                let countdown = state.run.as_ref().map(|r| r.countdown_display()).unwrap_or(0);
                events.push(GameEvent::LevelStarted { level, countdown });
                return;
            }
            Err(locked) => events.push(GameEvent::LevelLocked(locked)),
        }
    }

    if input.exit {
        state.exit();
        events.push(GameEvent::Exit);
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput, dt: f32, events: &mut Vec<GameEvent>) {
    if input.return_to_menu {
        if let Some(points) = state.return_to_menu() {
            events.push(GameEvent::ReturnedToMenu { points });
        }
        return;
    }

    let Some(run) = state.run.as_mut() else {
        return;
    };

    // Autopilot: flap whenever we sink below the middle of the next opening
    let mut jump = input.jump;
    if input.autopilot && !run.actor.is_rising() {
        let actor = run.actor.bounds();
        if let Some(gap) = run.column.next_gap(actor.left()) {
            jump |= actor.bottom() > gap.center();
        }
    }
    if jump {
        run.actor.jump();
    }

    run.actor.tick();
    if let Some(cleared) = run.column.tick() {
        events.push(GameEvent::BatchCleared {
            points: cleared.points,
        });
        if let Some(speed) = cleared.speed_up {
            events.push(GameEvent::SpeedUp { speed });
        }
    }

    let report = detect(&run.actor.bounds(), &mut run.column);
    if report.terminal {
        end_run(state, EndReason::Collision, events);
        return;
    }

    for pickup in &report.pickups {
        match pickup.kind {
            CollectibleKind::Coin => {
                state.progress.add_coins(1);
                events.push(GameEvent::CoinCollected {
                    coins: state.progress.coins,
                });
            }
            CollectibleKind::TimerBonus => {
                run.countdown += TIMER_BONUS_SECS;
                events.push(GameEvent::TimeBonus {
                    countdown: run.countdown_display(),
                });
            }
        }
    }
    run.column.purge_collected();
    run.ticks += 1;

    // The clock follows wall time, applied in samples rather than every step
    run.unsampled += dt.max(0.0);
    if run.unsampled >= state.countdown_sample {
        if !run.timer_frozen {
            run.countdown -= run.unsampled;
        }
        run.unsampled = 0.0;
    }

    if run.countdown <= 0.0 {
        end_run(state, EndReason::TimeUp, events);
    }
}

fn end_run(state: &mut GameState, reason: EndReason, events: &mut Vec<GameEvent>) {
    if let Some(summary) = state.end_run(reason) {
        events.push(GameEvent::LevelEnded { reason, summary });
    }
}
