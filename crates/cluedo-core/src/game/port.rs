use super::setup::GameSetup;
use super::strategy::{Response, Reveal};
use crate::model::card::Card;
use crate::model::position::Position;
use crate::model::triple::{CardTriple, Envelope};
use crate::path::PositionSet;

/// Answer to the setup prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupChoice {
    Start(GameSetup),
    Cancel,
}

/// Where a character ended up after moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Room(usize),
    Corridor,
}

/// State changes the engine reports to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    TurnStarted {
        seat: usize,
    },
    DiceRolled {
        seat: usize,
        value: u8,
    },
    ReachableCells {
        seat: usize,
        cells: PositionSet,
    },
    CharacterMoved {
        character: usize,
        position: Position,
        location: Location,
    },
    IllegalMove {
        seat: usize,
        target: Position,
    },
    WeaponMoved {
        weapon: usize,
        room: usize,
    },
    /// A computer player's suspicion, shown to everyone.
    SuspicionAnnounced {
        seat: usize,
        suspicion: CardTriple,
    },
    /// The human's own suspicion together with every revealed card.
    OwnSuspicionResult {
        suspicion: CardTriple,
        reveals: Vec<Reveal>,
    },
    /// Another player's suspicion: only whether each responder showed something.
    OthersSuspicionResult {
        declarant: usize,
        suspicion: CardTriple,
        responses: Vec<Response>,
    },
    GameWon {
        seat: usize,
        accusation: CardTriple,
    },
    GameLost {
        seat: usize,
        accusation: CardTriple,
        envelope: Envelope,
    },
    GameAbandoned {
        turns: u32,
    },
}

/// Blocking boundary for human decisions. Every prompt returns only once the decision is made.
pub trait PresentationPort {
    /// Seat selection before a game starts. `characters` lists the selectable figures in seat order.
    fn prompt_setup(&mut self, characters: &[String]) -> SetupChoice;

    /// Target cell for the human's move; `reachable` is what was presented for this turn.
    fn prompt_move(&mut self, reachable: &PositionSet) -> Position;

    /// Character and weapon for a suspicion in `room`.
    fn prompt_suspicion(&mut self, room: Card) -> CardTriple;

    /// One of `showable` to reveal to `declarant`. Only called when `showable` is not empty.
    fn prompt_card_to_show(
        &mut self,
        declarant: usize,
        suspicion: &CardTriple,
        showable: &[Card],
    ) -> Option<Card>;

    /// Offered before each human move; `Some` ends the game with an accusation.
    fn prompt_accusation(&mut self) -> Option<CardTriple> {
        None
    }

    fn notify(&mut self, event: &GameEvent);
}
