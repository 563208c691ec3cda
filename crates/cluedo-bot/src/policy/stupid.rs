use super::log_suspicion;
use crate::bot::{OpenCards, corridor_move, record_reveals, suspect};
use cluedo_core::game::strategy::{AiStrategy, Reveal, TableView};
use cluedo_core::model::card::{Card, CardKind};
use cluedo_core::model::player::{Difficulty, Player};
use cluedo_core::model::position::Position;
use cluedo_core::model::triple::CardTriple;
use rand::RngCore;

/// Corridor walker that names the first open weapon and the last open character and shows the first
/// matching card. Ignores other players' suspicions.
#[derive(Debug, Default)]
pub struct StupidStrategy;

impl StupidStrategy {
    pub const fn new() -> Self {
        Self
    }
}

impl AiStrategy for StupidStrategy {
    fn difficulty(&self) -> Difficulty {
        Difficulty::Stupid
    }

    fn next_move(
        &mut self,
        table: &TableView<'_>,
        me: &Player,
        seat: usize,
        dice: u8,
        rng: &mut dyn RngCore,
    ) -> Option<Position> {
        let open = OpenCards::of(table.deck(), me);
        corridor_move(table, seat, &open.room_indices(), dice, rng)
    }

    fn declare_suspicion(&mut self, table: &TableView<'_>, me: &Player, seat: usize, room: Card) -> CardTriple {
        let open = OpenCards::of(table.deck(), me);
        let suspicion = CardTriple::new(
            room,
            suspect(&open, CardKind::Character, OpenCards::last),
            suspect(&open, CardKind::Weapon, OpenCards::first),
        );
        log_suspicion(Difficulty::Stupid, seat, &suspicion, "last_character");
        suspicion
    }

    fn accusation(&self, table: &TableView<'_>, me: &Player, _seat: usize) -> Option<CardTriple> {
        OpenCards::of(table.deck(), me).solution()
    }

    fn choose_card_to_show(
        &mut self,
        _table: &TableView<'_>,
        me: &mut Player,
        _seat: usize,
        _asker: usize,
        suspicion: &CardTriple,
    ) -> Option<Card> {
        me.showable(suspicion).first().copied()
    }

    fn on_cards_shown(
        &mut self,
        table: &TableView<'_>,
        me: &mut Player,
        seat: usize,
        suspicion: &CardTriple,
        reveals: &[Reveal],
    ) {
        record_reveals(seat, me.notes_mut(), table.deck(), suspicion, reveals);
    }
}
