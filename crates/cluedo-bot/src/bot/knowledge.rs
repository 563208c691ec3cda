use cluedo_core::game::strategy::Reveal;
use cluedo_core::model::card::{Card, CardKind};
use cluedo_core::model::deck::Deck;
use cluedo_core::model::notes::{Notebook, OtherNote, SelfNote};
use cluedo_core::model::player::Player;
use cluedo_core::model::triple::CardTriple;
use std::collections::BTreeSet;

/// Cards that may still be in the envelope: neither held nor marked seen in any other-notes row.
/// Each list keeps canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenCards {
    characters: Vec<Card>,
    weapons: Vec<Card>,
    rooms: Vec<Card>,
    held: Vec<Card>,
}

impl OpenCards {
    pub fn of(deck: &Deck, me: &Player) -> Self {
        let seen: BTreeSet<usize> = me.notes().seen_columns().collect();
        let open = |kind: CardKind| -> Vec<Card> {
            deck.of_kind(kind)
                .filter(|card| !me.holds(*card))
                .filter(|card| {
                    deck.index_of(*card)
                        .is_some_and(|column| !seen.contains(&column))
                })
                .collect()
        };
        let mut held = me.hand().to_vec();
        held.sort();
        Self {
            characters: open(CardKind::Character),
            weapons: open(CardKind::Weapon),
            rooms: open(CardKind::Room),
            held,
        }
    }

    pub fn get(&self, kind: CardKind) -> &[Card] {
        match kind {
            CardKind::Character => &self.characters,
            CardKind::Weapon => &self.weapons,
            CardKind::Room => &self.rooms,
        }
    }

    pub fn first(&self, kind: CardKind) -> Option<Card> {
        self.get(kind).first().copied()
    }

    pub fn last(&self, kind: CardKind) -> Option<Card> {
        self.get(kind).last().copied()
    }

    /// First card of `kind` in the own hand.
    pub fn first_held(&self, kind: CardKind) -> Option<Card> {
        self.held.iter().copied().find(|card| card.is(kind))
    }

    /// Board indices of the open rooms.
    pub fn room_indices(&self) -> Vec<usize> {
        self.rooms.iter().map(|card| card.index).collect()
    }

    /// The accusation, once exactly one card of every kind is left.
    pub fn solution(&self) -> Option<CardTriple> {
        match (self.rooms.as_slice(), self.characters.as_slice(), self.weapons.as_slice()) {
            ([room], [character], [weapon]) => Some(CardTriple::new(*room, *character, *weapon)),
            _ => None,
        }
    }
}

/// Open card of `kind` chosen by `pick`. With nothing open it names an own card of that kind,
/// and only a hand without one falls back to the first card of the deck.
pub fn suspect(open: &OpenCards, kind: CardKind, pick: fn(&OpenCards, CardKind) -> Option<Card>) -> Card {
    pick(open, kind)
        .or_else(|| open.first_held(kind))
        .unwrap_or(Card::new(kind, 0))
}

/// Notes the answers to `seat`'s own suspicion: a shown card is `Seen`, silence rules out all three.
pub fn record_reveals(seat: usize, notes: &mut Notebook, deck: &Deck, suspicion: &CardTriple, reveals: &[Reveal]) {
    for reveal in reveals {
        let Some(slot) = Notebook::slot_for(seat, reveal.responder) else {
            continue;
        };
        match reveal.card {
            Some(card) => {
                if let Some(column) = deck.index_of(card) {
                    notes.set_other(slot, column, OtherNote::Seen);
                }
            }
            None => {
                for card in suspicion.cards() {
                    if let Some(column) = deck.index_of(card) {
                        notes.set_other(slot, column, OtherNote::HasNot);
                    }
                }
            }
        }
    }
}

/// Prefers the matching card shown most often so far, ties in canonical order, and bumps its
/// self-note tier.
pub fn show_most_shown(me: &mut Player, deck: &Deck, suspicion: &CardTriple) -> Option<Card> {
    let showable = me.showable(suspicion);
    let mut best: Option<(Card, SelfNote)> = None;
    for card in &showable {
        let Some(column) = deck.index_of(*card) else {
            continue;
        };
        let tier = me.notes().own_note(column);
        if tier == SelfNote::Nothing {
            continue;
        }
        if best.is_none_or(|(_, top)| tier > top) {
            best = Some((*card, tier));
        }
    }
    let card = best.map(|(card, _)| card).or_else(|| showable.first().copied())?;
    if let Some(column) = deck.index_of(card) {
        me.notes_mut().bump_own(column);
    }
    Some(card)
}
