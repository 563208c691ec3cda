mod port;
mod standings;

pub use port::HeadlessPort;
pub use standings::{BotReport, Standings};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use cluedo_bot::BotFactory;
use cluedo_core::game::config::{ConfigError as BoardError, GameConfig, GameDefinition, ValidationError as BoardInvalid};
use cluedo_core::game::engine::{GameEngine, GameResult};
use cluedo_core::game::error::GameError;
use cluedo_core::game::setup::{GameSetup, SetupError};
use cluedo_core::model::player::Difficulty;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchConfig, ResolvedOutputs, SeatConfig};
use crate::logging::telemetry_dir;

/// Plays every configured game and streams one JSONL row per seat and game.
pub struct Tournament {
    config: BenchConfig,
    outputs: ResolvedOutputs,
    definition: GameDefinition,
    difficulties: Vec<Difficulty>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub rotations: usize,
    pub decided: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
    pub reports: Vec<BotReport>,
}

impl Tournament {
    /// Build a runner from a validated configuration, loading the board it names.
    pub fn new(config: BenchConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let board = match &config.board {
            Some(path) => GameConfig::from_path(path)?,
            None => GameConfig::classic()?,
        };
        let definition = board.build()?;

        let difficulties = config
            .seats
            .iter()
            .map(|seat| {
                seat.difficulty().ok_or_else(|| RunnerError::UnknownDifficulty {
                    seat: seat.name.clone(),
                    value: seat.difficulty.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if difficulties.len() > definition.characters.len() {
            return Err(RunnerError::SeatCount {
                seats: difficulties.len(),
                characters: definition.characters.len(),
            });
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            definition,
            difficulties,
        })
    }

    /// Execute the tournament, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let rotations = self.config.games.rotations;
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut standings = Standings::new(&self.config.seats);
        let mut rows_written = 0usize;
        let mut decided = 0usize;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();

            for rotation in 0..rotations {
                let seating = rotate(self.config.seats.len(), rotation);
                let started = Instant::now();
                let (outcome, result) = self.play_game(game_seed, &seating)?;
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                if !matches!(result, GameResult::Abandoned { .. }) {
                    decided += 1;
                }

                self.log_game(game_index, rotation, game_seed, &result, outcome.turns);
                standings.record_game(&outcome);
                rows_written += write_game_rows(
                    &mut writer,
                    &self.config,
                    game_index,
                    rotation,
                    game_seed,
                    &outcome,
                    elapsed_ms,
                )?;
            }
        }

        writer.flush()?;

        let reports = standings.finalize();
        let games_played = self.config.games.count * rotations;
        standings::write_markdown(
            &self.outputs.summary_md,
            &self.config.run_id,
            games_played,
            &reports,
        )?;

        let telemetry_path = self
            .logging_enabled
            .then(|| telemetry_dir(&self.outputs).join("telemetry.jsonl"));

        Ok(RunSummary {
            games_played,
            rotations,
            decided,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
            reports,
        })
    }

    /// `seating[i]` is the configured bot sitting on seat `i`.
    fn play_game(&self, seed: u64, seating: &[usize]) -> Result<(GameOutcome, GameResult), RunnerError> {
        let difficulties: Vec<Difficulty> = seating.iter().map(|bot| self.difficulties[*bot]).collect();
        let setup = GameSetup::headless(&difficulties)
            .with_seed(seed)
            .with_turn_limit(self.config.games.turn_limit);
        let mut engine = GameEngine::new(
            self.definition.clone(),
            &setup,
            Box::new(BotFactory::new()),
            HeadlessPort::new(seating.len()),
        )?;
        let result = engine.run()?;

        let seat_results = seating
            .iter()
            .enumerate()
            .map(|(seat, bot)| SeatResult {
                seat,
                character: engine
                    .characters()
                    .get(seat)
                    .map(|character| character.name().to_string())
                    .unwrap_or_default(),
                bot: self.config.seats[*bot].name.clone(),
                verdict: SeatVerdict::of(&result, seat),
                suspicions: engine.port().suspicions(seat),
                answered: engine.port().answered(seat),
            })
            .collect();

        Ok((
            GameOutcome {
                turns: engine.turns(),
                seat_results,
            },
            result,
        ))
    }

    fn log_game(&self, game_index: usize, rotation: usize, seed: u64, result: &GameResult, turns: u32) {
        if !self.logging_enabled || !tracing::enabled!(Level::INFO) {
            return;
        }
        let winner = result.winner().map(|seat| seat as i64).unwrap_or(-1);
        event!(
            target: "cluedo_bench::game",
            Level::INFO,
            run_id = %self.config.run_id,
            game_index = game_index as u32,
            rotation = rotation as u32,
            seed,
            turns,
            winner,
            abandoned = matches!(result, GameResult::Abandoned { .. }),
        );
    }
}

/// Seat `i` gets bot `(i + rotation) % seats`.
fn rotate(seats: usize, rotation: usize) -> Vec<usize> {
    (0..seats).map(|seat| (seat + rotation) % seats).collect()
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_rows(
    writer: &mut BufWriter<File>,
    config: &BenchConfig,
    game_index: usize,
    rotation: usize,
    game_seed: u64,
    outcome: &GameOutcome,
    elapsed_ms: f64,
) -> Result<usize, RunnerError> {
    let game_id = format!("G{game_index:05}_R{rotation:02}");
    let seating: Vec<SeatSnapshot> = outcome
        .seat_results
        .iter()
        .map(|seat| SeatSnapshot {
            seat: seat.seat,
            bot: seat.bot.clone(),
        })
        .collect();
    let ms_per_turn = if outcome.turns == 0 {
        0.0
    } else {
        elapsed_ms / f64::from(outcome.turns)
    };

    let mut rows_written = 0usize;
    for seat_result in &outcome.seat_results {
        let row = GameLogRow {
            run_id: config.run_id.clone(),
            game_id: game_id.clone(),
            game_index,
            rotation,
            game_seed,
            seat: seat_result.seat,
            character: seat_result.character.clone(),
            bot: seat_result.bot.clone(),
            difficulty: difficulty_label(&config.seats, &seat_result.bot),
            seating: seating.clone(),
            verdict: seat_result.verdict,
            turns: outcome.turns,
            suspicions: seat_result.suspicions,
            answered: seat_result.answered,
            ms_per_turn,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

fn difficulty_label(seats: &[SeatConfig], bot: &str) -> String {
    seats
        .iter()
        .find(|seat| seat.name == bot)
        .and_then(SeatConfig::difficulty)
        .map(|difficulty| difficulty.label().to_string())
        .unwrap_or_default()
}

/// How a game ended from one seat's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatVerdict {
    Won,
    WrongAccusation,
    OpponentWon,
    OpponentLost,
    Abandoned,
}

impl SeatVerdict {
    pub fn of(result: &GameResult, seat: usize) -> Self {
        match result {
            GameResult::Won { seat: winner, .. } if *winner == seat => SeatVerdict::Won,
            GameResult::Won { .. } => SeatVerdict::OpponentWon,
            GameResult::Lost { seat: loser, .. } if *loser == seat => SeatVerdict::WrongAccusation,
            GameResult::Lost { .. } => SeatVerdict::OpponentLost,
            GameResult::Abandoned { .. } => SeatVerdict::Abandoned,
        }
    }
}

pub struct GameOutcome {
    pub turns: u32,
    pub seat_results: Vec<SeatResult>,
}

pub struct SeatResult {
    pub seat: usize,
    pub character: String,
    pub bot: String,
    pub verdict: SeatVerdict,
    pub suspicions: u32,
    pub answered: u32,
}

#[derive(Clone, Serialize)]
pub struct SeatSnapshot {
    pub seat: usize,
    pub bot: String,
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    rotation: usize,
    game_seed: u64,
    seat: usize,
    character: String,
    bot: String,
    difficulty: String,
    seating: Vec<SeatSnapshot>,
    verdict: SeatVerdict,
    turns: u32,
    suspicions: u32,
    answered: u32,
    ms_per_turn: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to load board: {0}")]
    Board(#[from] BoardError),
    #[error("invalid board: {0}")]
    BoardInvalid(#[from] BoardInvalid),
    #[error("seat '{seat}' has unknown difficulty '{value}'")]
    UnknownDifficulty { seat: String, value: String },
    #[error("{seats} seats configured but the board only has {characters} characters")]
    SeatCount { seats: usize, characters: usize },
    #[error("game setup failed: {0}")]
    Setup(#[from] SetupError),
    #[error("game execution failed: {0}")]
    Game(#[from] GameError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
