use super::log_suspicion;
use super::normal::first_open_suspicion;
use crate::bot::{OpenCards, passage_or_corridor_move, record_reveals, show_most_shown};
use cluedo_core::belief::{WitnessedSuspicion, attribute_remaining_card, deduce, note_non_responders};
use cluedo_core::game::strategy::{AiStrategy, Reveal, TableView};
use cluedo_core::model::card::{Card, CardKind};
use cluedo_core::model::deck::Deck;
use cluedo_core::model::notes::Notebook;
use cluedo_core::model::player::{Difficulty, Player};
use cluedo_core::model::position::Position;
use cluedo_core::model::triple::CardTriple;
use rand::RngCore;
use tracing::{Level, event};

/// Normal play plus per-asker reveal memory, misleading suspicions once the solution is narrowed
/// down, and deduction over every witnessed suspicion.
///
/// The counters and the history live only as long as the strategy; a loaded game starts them empty.
#[derive(Debug)]
pub struct SmartStrategy {
    seat: usize,
    player_count: usize,
    /// `shown[slot][column]`: how often a card went to the asker in that notes slot.
    shown: Vec<Vec<u32>>,
    weapon_turn: usize,
    character_turn: usize,
    history: Vec<WitnessedSuspicion>,
}

impl SmartStrategy {
    pub fn new(seat: usize, player_count: usize, card_count: usize) -> Self {
        Self {
            seat,
            player_count,
            shown: vec![vec![0; card_count]; player_count.saturating_sub(1)],
            weapon_turn: 0,
            character_turn: 0,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[WitnessedSuspicion] {
        &self.history
    }

    /// How often `card` has been shown to `asker`.
    pub fn shown_to(&self, asker: usize, column: usize) -> u32 {
        Notebook::slot_for(self.seat, asker)
            .and_then(|slot| self.shown.get(slot))
            .and_then(|counts| counts.get(column))
            .copied()
            .unwrap_or(0)
    }

    /// Matching card shown to `asker` most often, ties in canonical order; `None` if none was shown
    /// to them before.
    fn favourite_for(&self, asker: usize, deck: &Deck, showable: &[Card]) -> Option<Card> {
        let mut best: Option<(Card, u32)> = None;
        for card in showable {
            let Some(column) = deck.index_of(*card) else {
                continue;
            };
            let count = self.shown_to(asker, column);
            if count > 0 && best.is_none_or(|(_, top)| count > top) {
                best = Some((*card, count));
            }
        }
        best.map(|(card, _)| card)
    }

    fn remember_shown(&mut self, asker: usize, column: usize) {
        let slot = Notebook::slot_for(self.seat, asker);
        if let Some(count) = slot
            .and_then(|slot| self.shown.get_mut(slot))
            .and_then(|counts| counts.get_mut(column))
        {
            *count += 1;
        }
    }

    /// Own card of `kind`, taking turns through the hand; the open card when none is held.
    /// The envelope keeps one card of every kind open, so the last fallback is never reached
    /// while the notes are consistent.
    fn own_in_turn(&mut self, me: &Player, open: &OpenCards, kind: CardKind) -> Card {
        let held: Vec<Card> = me.hand().iter().copied().filter(|card| card.is(kind)).collect();
        if held.is_empty() {
            return open.first(kind).unwrap_or(Card::new(kind, 0));
        }
        let turn = match kind {
            CardKind::Weapon => &mut self.weapon_turn,
            _ => &mut self.character_turn,
        };
        let card = held[*turn % held.len()];
        *turn += 1;
        card
    }

    fn run_deduction(&self, table: &TableView<'_>, me: &mut Player) -> usize {
        let hand = me.hand().to_vec();
        deduce(
            self.seat,
            self.player_count,
            table.deck(),
            &hand,
            me.notes_mut(),
            &self.history,
        )
    }
}

impl AiStrategy for SmartStrategy {
    fn difficulty(&self) -> Difficulty {
        Difficulty::Smart
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
        let open = OpenCards::of(table.deck(), me);
        let narrowed = open.get(CardKind::Weapon).len() == 1 && open.get(CardKind::Character).len() == 1;
        if !narrowed {
            let suspicion = first_open_suspicion(&open, room);
            log_suspicion(Difficulty::Smart, seat, &suspicion, "first_open");
            return suspicion;
        }
        let weapon = self.own_in_turn(me, &open, CardKind::Weapon);
        let character = self.own_in_turn(me, &open, CardKind::Character);
        let suspicion = CardTriple::new(room, character, weapon);
        log_suspicion(Difficulty::Smart, seat, &suspicion, "own_cards");
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
        asker: usize,
        suspicion: &CardTriple,
    ) -> Option<Card> {
        let deck = table.deck();
        let showable = me.showable(suspicion);
        let card = match self.favourite_for(asker, deck, &showable) {
            Some(card) => {
                if let Some(column) = deck.index_of(card) {
                    me.notes_mut().bump_own(column);
                }
                Some(card)
            }
            None => show_most_shown(me, deck, suspicion),
        };
        if let Some(column) = card.and_then(|card| deck.index_of(card)) {
            self.remember_shown(asker, column);
        }
        card
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
        let pinned = self.run_deduction(table, me);
        log_deduction(seat, "own_suspicion", None, pinned);
    }

    fn on_suspicion_witnessed(
        &mut self,
        table: &TableView<'_>,
        me: &mut Player,
        seat: usize,
        witnessed: &WitnessedSuspicion,
    ) {
        let deck = table.deck();
        self.history.push(witnessed.clone());
        note_non_responders(seat, me.notes_mut(), deck, witnessed);
        let hand = me.hand().to_vec();
        let attributed = attribute_remaining_card(seat, &hand, me.notes_mut(), deck, witnessed);
        let pinned = self.run_deduction(table, me);
        log_deduction(seat, "witnessed", attributed.map(|card| deck.label(card)), pinned);
    }
}

fn log_deduction(seat: usize, trigger: &str, attributed: Option<String>, pinned: usize) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    event!(
        target: "cluedo_bot::smart",
        Level::DEBUG,
        seat,
        trigger,
        attributed = attributed.as_deref().unwrap_or("-"),
        pinned,
    );
}
