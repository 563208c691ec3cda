use cluedo_core::game::port::{GameEvent, PresentationPort, SetupChoice};
use cluedo_core::model::card::Card;
use cluedo_core::model::position::Position;
use cluedo_core::model::triple::CardTriple;
use cluedo_core::path::PositionSet;

/// Presentation port for tables without a human. Prompts are never reached because every seat is a
/// computer player; notifications are tallied per seat.
#[derive(Debug, Clone, Default)]
pub struct HeadlessPort {
    suspicions: Vec<u32>,
    answered: Vec<u32>,
    moves: u32,
}

impl HeadlessPort {
    pub fn new(seats: usize) -> Self {
        Self {
            suspicions: vec![0; seats],
            answered: vec![0; seats],
            moves: 0,
        }
    }

    /// Suspicions declared by `seat`.
    pub fn suspicions(&self, seat: usize) -> u32 {
        self.suspicions.get(seat).copied().unwrap_or(0)
    }

    /// Suspicions by `seat` that at least one other player answered with a card.
    pub fn answered(&self, seat: usize) -> u32 {
        self.answered.get(seat).copied().unwrap_or(0)
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }
}

impl PresentationPort for HeadlessPort {
    fn prompt_setup(&mut self, _characters: &[String]) -> SetupChoice {
        SetupChoice::Cancel
    }

    fn prompt_move(&mut self, reachable: &PositionSet) -> Position {
        reachable.iter().next().copied().unwrap_or_default()
    }

    fn prompt_suspicion(&mut self, _room: Card) -> CardTriple {
        CardTriple::empty()
    }

    fn prompt_card_to_show(
        &mut self,
        _declarant: usize,
        _suspicion: &CardTriple,
        showable: &[Card],
    ) -> Option<Card> {
        showable.first().copied()
    }

    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::CharacterMoved { .. } => self.moves += 1,
            GameEvent::OthersSuspicionResult {
                declarant,
                responses,
                ..
            } => {
                if let Some(count) = self.suspicions.get_mut(*declarant) {
                    *count += 1;
                }
                if responses.iter().any(|response| response.showed)
                    && let Some(count) = self.answered.get_mut(*declarant)
                {
                    *count += 1;
                }
            }
            _ => {}
        }
    }
}
