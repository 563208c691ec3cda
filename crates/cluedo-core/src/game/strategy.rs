use super::moves::MoveRules;
use crate::belief::WitnessedSuspicion;
use crate::model::board::Board;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::player::{Difficulty, Player};
use crate::model::position::Position;
use crate::model::triple::CardTriple;
use crate::path::PositionSet;
use rand::RngCore;

pub use crate::belief::Response;

/// One polled player's answer to a suspicion, as seen by the declarant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub responder: usize,
    pub card: Option<Card>,
}

impl Reveal {
    /// The binary fact every other player learns.
    pub fn response(&self) -> Response {
        Response {
            responder: self.responder,
            showed: self.card.is_some(),
        }
    }
}

/// Read-only table state handed to computer players.
///
/// Cards map onto the board by index: `Card::room(i)` is room `i`, `Card::character(i)` is
/// character `i` and `Card::weapon(i)` is weapon `i`.
pub struct TableView<'a> {
    board: &'a Board,
    deck: &'a Deck,
    positions: Vec<Position>,
    seats: Vec<usize>,
}

impl<'a> TableView<'a> {
    /// `positions` holds every character's cell; `seats` maps each seat to its character.
    pub fn new(board: &'a Board, deck: &'a Deck, positions: Vec<Position>, seats: Vec<usize>) -> Self {
        Self {
            board,
            deck,
            positions,
            seats,
        }
    }

    pub fn board(&self) -> &'a Board {
        self.board
    }

    pub fn deck(&self) -> &'a Deck {
        self.deck
    }

    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    pub fn character_of(&self, seat: usize) -> Option<usize> {
        self.seats.get(seat).copied()
    }

    pub fn seat_of(&self, character: usize) -> Option<usize> {
        self.seats.iter().position(|c| *c == character)
    }

    pub fn character_position(&self, character: usize) -> Option<Position> {
        self.positions.get(character).copied()
    }

    pub fn seat_position(&self, seat: usize) -> Option<Position> {
        self.character_of(seat)
            .and_then(|character| self.character_position(character))
    }

    /// Room the seat currently stands in.
    pub fn seat_room(&self, seat: usize) -> Option<usize> {
        self.seat_position(seat)
            .and_then(|position| self.board.room_at(position))
    }

    /// Move rules for `seat`: other players block corridors, any other character closes a door.
    pub fn move_rules(&self, seat: usize) -> MoveRules<'a> {
        let me = self.character_of(seat);
        let position = self.seat_position(seat).unwrap_or_default();
        let other_players: PositionSet = self
            .seats
            .iter()
            .filter(|character| Some(**character) != me)
            .filter_map(|character| self.character_position(*character))
            .collect();
        let other_characters: PositionSet = self
            .positions
            .iter()
            .enumerate()
            .filter(|(character, _)| Some(*character) != me)
            .map(|(_, position)| *position)
            .collect();
        MoveRules::new(self.board, position, other_players, other_characters)
    }
}

/// Decision surface of a computer-controlled player.
///
/// The engine owns the [`Player`] entities and lends them out for each call; strategies keep only
/// their private bookkeeping. `seat` is always the strategy's own seat.
pub trait AiStrategy: Send {
    fn difficulty(&self) -> Difficulty;

    /// Destination for this turn, or `None` to stay put.
    fn next_move(
        &mut self,
        table: &TableView<'_>,
        me: &Player,
        seat: usize,
        dice: u8,
        rng: &mut dyn RngCore,
    ) -> Option<Position>;

    /// Character and weapon to name in `room`. The engine fixes the room slot.
    fn declare_suspicion(&mut self, table: &TableView<'_>, me: &Player, seat: usize, room: Card) -> CardTriple;

    /// A complete triple once the player is sure of the solution.
    fn accusation(&self, table: &TableView<'_>, me: &Player, seat: usize) -> Option<CardTriple>;

    /// Card to reveal to `asker`; must be one of `me.showable(suspicion)`, or `None` when empty.
    fn choose_card_to_show(
        &mut self,
        table: &TableView<'_>,
        me: &mut Player,
        seat: usize,
        asker: usize,
        suspicion: &CardTriple,
    ) -> Option<Card>;

    /// Answers to this player's own suspicion, in polling order.
    fn on_cards_shown(
        &mut self,
        table: &TableView<'_>,
        me: &mut Player,
        seat: usize,
        suspicion: &CardTriple,
        reveals: &[Reveal],
    );

    /// Someone else's suspicion and which responders showed a card.
    fn on_suspicion_witnessed(
        &mut self,
        _table: &TableView<'_>,
        _me: &mut Player,
        _seat: usize,
        _witnessed: &WitnessedSuspicion,
    ) {
    }
}

/// Builds strategies for computer seats, at game start and again after a load.
pub trait StrategyFactory {
    fn create(
        &self,
        difficulty: Difficulty,
        seat: usize,
        player_count: usize,
        card_count: usize,
    ) -> Box<dyn AiStrategy>;
}
