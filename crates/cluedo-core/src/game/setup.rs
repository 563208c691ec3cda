use super::config::{ConfigError, ValidationError};
use super::error::GameError;
use crate::model::player::Difficulty;
use thiserror::Error;

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 6;

/// Seat selection for a new game. Seat `i` plays character `i`; `None` marks the human seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSetup {
    pub seats: Vec<Option<Difficulty>>,
    pub seed: Option<u64>,
    pub turn_limit: Option<u32>,
}

impl GameSetup {
    pub fn new(seats: Vec<Option<Difficulty>>) -> Self {
        Self {
            seats,
            seed: None,
            turn_limit: None,
        }
    }

    /// Human on seat 0 against the given opponents.
    pub fn human_against(opponents: &[Difficulty]) -> Self {
        let seats = std::iter::once(None)
            .chain(opponents.iter().copied().map(Some))
            .collect();
        Self::new(seats)
    }

    /// Computer players only.
    pub fn headless(difficulties: &[Difficulty]) -> Self {
        Self::new(difficulties.iter().copied().map(Some).collect())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_turn_limit(mut self, turns: u32) -> Self {
        self.turn_limit = Some(turns);
        self
    }

    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    pub fn validate(&self, characters: usize) -> Result<(), SetupError> {
        let count = self.seats.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(SetupError::SeatCount {
                count,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }
        if count > characters {
            return Err(SetupError::TooManySeats { count, characters });
        }
        if let Some(seat) = self.seats.iter().skip(1).position(Option::is_none) {
            return Err(SetupError::HumanSeat { seat: seat + 1 });
        }
        Ok(())
    }
}

/// Result of a setup step that the user may abort.
#[derive(Debug)]
pub enum SetupOutcome<T> {
    Proceed(T),
    Cancelled,
    Fatal(SetupError),
}

impl<T> SetupOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SetupOutcome::Cancelled)
    }

    /// `Ok(None)` when cancelled.
    pub fn into_result(self) -> Result<Option<T>, SetupError> {
        match self {
            SetupOutcome::Proceed(value) => Ok(Some(value)),
            SetupOutcome::Cancelled => Ok(None),
            SetupOutcome::Fatal(err) => Err(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("{count} seats requested; between {min} and {max} are supported")]
    SeatCount { count: usize, min: usize, max: usize },
    #[error("{count} seats exceed the {characters} configured characters")]
    TooManySeats { count: usize, characters: usize },
    #[error("seat {seat} must be computer-controlled")]
    HumanSeat { seat: usize },
    #[error("the deck cannot be dealt")]
    Deal,
    #[error(transparent)]
    Engine(#[from] GameError),
}

#[cfg(test)]
mod tests {
    use super::{GameSetup, SetupError, SetupOutcome};
    use crate::model::player::Difficulty;

    #[test]
    fn human_sits_on_seat_zero() {
        let setup = GameSetup::human_against(&[Difficulty::Smart, Difficulty::Stupid]);
        assert_eq!(setup.seats, vec![None, Some(Difficulty::Smart), Some(Difficulty::Stupid)]);
        assert!(setup.validate(6).is_ok());
    }

    #[test]
    fn seat_count_is_bounded() {
        let two = GameSetup::headless(&[Difficulty::Normal; 2]);
        assert!(matches!(two.validate(6), Err(SetupError::SeatCount { count: 2, .. })));
        let seven = GameSetup::headless(&[Difficulty::Normal; 7]);
        assert!(matches!(seven.validate(9), Err(SetupError::SeatCount { count: 7, .. })));
        let four = GameSetup::headless(&[Difficulty::Normal; 4]);
        assert!(matches!(
            four.validate(3),
            Err(SetupError::TooManySeats { count: 4, characters: 3 })
        ));
    }

    #[test]
    fn only_seat_zero_may_be_human() {
        let setup = GameSetup::new(vec![Some(Difficulty::Normal), None, Some(Difficulty::Smart)]);
        assert!(matches!(setup.validate(6), Err(SetupError::HumanSeat { seat: 1 })));
    }

    #[test]
    fn outcome_maps_cancel_to_none() {
        let outcome: SetupOutcome<u8> = SetupOutcome::Cancelled;
        assert!(outcome.is_cancelled());
        assert!(matches!(outcome.into_result(), Ok(None)));
        let proceed = SetupOutcome::Proceed(3u8);
        assert!(matches!(proceed.into_result(), Ok(Some(3))));
    }
}
