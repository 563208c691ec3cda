use super::log_suspicion;
use crate::bot::{OpenCards, passage_or_corridor_move, record_reveals, show_most_shown, suspect};
use cluedo_core::game::strategy::{AiStrategy, Reveal, TableView};
use cluedo_core::model::card::{Card, CardKind};
use cluedo_core::model::player::{Difficulty, Player};
use cluedo_core::model::position::Position;
use cluedo_core::model::triple::CardTriple;
use rand::RngCore;

/// Uses secret passages, names the first open card of each kind and keeps showing the card it has
/// shown most often.
#[derive(Debug, Default)]
pub struct NormalStrategy;

impl NormalStrategy {
    pub const fn new() -> Self {
        Self
    }
}

impl AiStrategy for NormalStrategy {
    fn difficulty(&self) -> Difficulty {
        Difficulty::Normal
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
        passage_or_corridor_move(table, seat, &open.room_indices(), dice, rng)
    }

    fn declare_suspicion(&mut self, table: &TableView<'_>, me: &Player, seat: usize, room: Card) -> CardTriple {
        let suspicion = first_open_suspicion(&OpenCards::of(table.deck(), me), room);
        log_suspicion(Difficulty::Normal, seat, &suspicion, "first_open");
        suspicion
    }

    fn accusation(&self, table: &TableView<'_>, me: &Player, _seat: usize) -> Option<CardTriple> {
        OpenCards::of(table.deck(), me).solution()
    }

    fn choose_card_to_show(
        &mut self,
        table: &TableView<'_>,
        me: &mut Player,
        _seat: usize,
        _asker: usize,
        suspicion: &CardTriple,
    ) -> Option<Card> {
        show_most_shown(me, table.deck(), suspicion)
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

pub(super) fn first_open_suspicion(open: &OpenCards, room: Card) -> CardTriple {
    CardTriple::new(
        room,
        suspect(open, CardKind::Character, OpenCards::first),
        suspect(open, CardKind::Weapon, OpenCards::first),
    )
}
