mod knowledge;
mod movement;

pub use knowledge::{OpenCards, record_reveals, show_most_shown, suspect};
pub use movement::{corridor_move, passage_or_corridor_move};

use crate::policy::{NormalStrategy, SmartStrategy, StupidStrategy};
use cluedo_core::game::strategy::{AiStrategy, StrategyFactory};
use cluedo_core::model::player::Difficulty;
use std::sync::OnceLock;
use tracing::{Level, event};

/// Builds the strategy matching each seat's difficulty, unless one difficulty is forced on every
/// computer seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotFactory {
    forced: Option<Difficulty>,
}

impl BotFactory {
    pub const fn new() -> Self {
        Self { forced: None }
    }

    pub const fn forced(difficulty: Difficulty) -> Self {
        Self {
            forced: Some(difficulty),
        }
    }

    /// Reads `CLUEDO_BOT_DIFFICULTY` once per process; unknown values are ignored.
    pub fn from_env() -> Self {
        static CACHED: OnceLock<BotFactory> = OnceLock::new();
        *CACHED.get_or_init(|| Self::from_reader(|key| std::env::var(key).ok()))
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let forced = read("CLUEDO_BOT_DIFFICULTY").and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "stupid" | "easy" => Some(Difficulty::Stupid),
            "normal" | "default" => Some(Difficulty::Normal),
            "smart" | "hard" => Some(Difficulty::Smart),
            _ => None,
        });
        Self { forced }
    }

    pub const fn difficulty_for(&self, requested: Difficulty) -> Difficulty {
        match self.forced {
            Some(difficulty) => difficulty,
            None => requested,
        }
    }
}

impl StrategyFactory for BotFactory {
    fn create(
        &self,
        difficulty: Difficulty,
        seat: usize,
        player_count: usize,
        card_count: usize,
    ) -> Box<dyn AiStrategy> {
        let difficulty = self.difficulty_for(difficulty);
        if tracing::enabled!(Level::DEBUG) {
            event!(target: "cluedo_bot::factory", Level::DEBUG, seat, difficulty = %difficulty);
        }
        match difficulty {
            Difficulty::Stupid => Box::new(StupidStrategy::new()),
            Difficulty::Normal => Box::new(NormalStrategy::new()),
            Difficulty::Smart => Box::new(SmartStrategy::new(seat, player_count, card_count)),
        }
    }
}
