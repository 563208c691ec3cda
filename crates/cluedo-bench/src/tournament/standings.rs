use std::fs;
use std::path::Path;

use serde::Serialize;

use super::{GameOutcome, SeatVerdict};
use crate::config::SeatConfig;

/// Per-bot aggregates across every game of a run.
pub struct Standings {
    bots: Vec<BotTally>,
}

struct BotTally {
    name: String,
    difficulty: String,
    games: u32,
    wins: u32,
    wrong_accusations: u32,
    abandoned: u32,
    turns_to_win: u64,
    suspicions: u64,
    answered: u64,
}

impl Standings {
    pub fn new(seats: &[SeatConfig]) -> Self {
        let bots = seats
            .iter()
            .map(|seat| BotTally {
                name: seat.name.clone(),
                difficulty: seat.difficulty.to_ascii_lowercase(),
                games: 0,
                wins: 0,
                wrong_accusations: 0,
                abandoned: 0,
                turns_to_win: 0,
                suspicions: 0,
                answered: 0,
            })
            .collect();
        Self { bots }
    }

    pub fn record_game(&mut self, outcome: &GameOutcome) {
        for seat in &outcome.seat_results {
            let Some(tally) = self.bots.iter_mut().find(|bot| bot.name == seat.bot) else {
                continue;
            };
            tally.games += 1;
            tally.suspicions += u64::from(seat.suspicions);
            tally.answered += u64::from(seat.answered);
            match seat.verdict {
                SeatVerdict::Won => {
                    tally.wins += 1;
                    tally.turns_to_win += u64::from(outcome.turns);
                }
                SeatVerdict::WrongAccusation => tally.wrong_accusations += 1,
                SeatVerdict::Abandoned => tally.abandoned += 1,
                SeatVerdict::OpponentWon | SeatVerdict::OpponentLost => {}
            }
        }
    }

    pub fn finalize(self) -> Vec<BotReport> {
        self.bots.into_iter().map(BotTally::into_report).collect()
    }
}

impl BotTally {
    fn into_report(self) -> BotReport {
        let rate = |count: u32| {
            if self.games == 0 {
                0.0
            } else {
                f64::from(count) / f64::from(self.games)
            }
        };
        let avg_turns_to_win = if self.wins == 0 {
            None
        } else {
            Some(self.turns_to_win as f64 / f64::from(self.wins))
        };
        let answer_rate = if self.suspicions == 0 {
            0.0
        } else {
            self.answered as f64 / self.suspicions as f64
        };
        BotReport {
            win_rate: rate(self.wins),
            wrong_accusation_rate: rate(self.wrong_accusations),
            abandoned_rate: rate(self.abandoned),
            avg_turns_to_win,
            answer_rate,
            name: self.name,
            difficulty: self.difficulty,
            games: self.games,
            wins: self.wins,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BotReport {
    pub name: String,
    pub difficulty: String,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub wrong_accusation_rate: f64,
    pub abandoned_rate: f64,
    pub avg_turns_to_win: Option<f64>,
    pub answer_rate: f64,
}

pub fn write_markdown(
    path: impl AsRef<Path>,
    run_id: &str,
    games: usize,
    reports: &[BotReport],
) -> std::io::Result<()> {
    let mut rows = String::new();
    rows.push_str(&format!("# Tournament Summary: {run_id}\n\n"));
    rows.push_str(&format!("Games played: {games}\n\n"));
    rows.push_str("| Bot | Difficulty | Games | Wins | Win % | Wrong accusation % | Abandoned % | Avg turns to win | Answered suspicions % |\n");
    rows.push_str("|-----|------------|-------|------|-------|--------------------|-------------|------------------|-----------------------|\n");

    for report in reports {
        let turns = report
            .avg_turns_to_win
            .map(|turns| format!("{turns:.1}"))
            .unwrap_or_else(|| "-".to_string());
        rows.push_str(&format!(
            "| {name} | {difficulty} | {games} | {wins} | {win:.1}% | {wrong:.1}% | {abandoned:.1}% | {turns} | {answered:.1}% |\n",
            name = report.name,
            difficulty = report.difficulty,
            games = report.games,
            wins = report.wins,
            win = report.win_rate * 100.0,
            wrong = report.wrong_accusation_rate * 100.0,
            abandoned = report.abandoned_rate * 100.0,
            answered = report.answer_rate * 100.0,
        ));
    }

    fs::write(path.as_ref(), rows)
}
