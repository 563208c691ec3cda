use crate::model::card::{Card, CardKind};
use crate::model::triple::Envelope;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Every card in the game. The canonical order (characters, weapons, rooms, each in configuration
/// order) defines note columns and must match between save and load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    characters: Vec<String>,
    weapons: Vec<String>,
    rooms: Vec<String>,
}

/// Result of shuffling and dealing a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub envelope: Envelope,
    pub hands: Vec<Vec<Card>>,
}

impl Deck {
    pub fn new(characters: Vec<String>, weapons: Vec<String>, rooms: Vec<String>) -> Self {
        Self {
            characters,
            weapons,
            rooms,
        }
    }

    pub fn len(&self) -> usize {
        self.characters.len() + self.weapons.len() + self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, kind: CardKind) -> usize {
        self.names(kind).len()
    }

    pub fn names(&self, kind: CardKind) -> &[String] {
        match kind {
            CardKind::Character => &self.characters,
            CardKind::Weapon => &self.weapons,
            CardKind::Room => &self.rooms,
        }
    }

    /// All cards in canonical order.
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        CardKind::ALL.into_iter().flat_map(move |kind| self.of_kind(kind))
    }

    pub fn of_kind(&self, kind: CardKind) -> impl Iterator<Item = Card> + '_ {
        (0..self.count(kind)).map(move |index| Card::new(kind, index))
    }

    /// Column of `card` in note matrices.
    pub fn index_of(&self, card: Card) -> Option<usize> {
        if card.index >= self.count(card.kind) {
            return None;
        }
        let offset = match card.kind {
            CardKind::Character => 0,
            CardKind::Weapon => self.characters.len(),
            CardKind::Room => self.characters.len() + self.weapons.len(),
        };
        Some(offset + card.index)
    }

    pub fn card_at(&self, column: usize) -> Option<Card> {
        let mut remaining = column;
        for kind in CardKind::ALL {
            let count = self.count(kind);
            if remaining < count {
                return Some(Card::new(kind, remaining));
            }
            remaining -= count;
        }
        None
    }

    pub fn name(&self, card: Card) -> Option<&str> {
        self.names(card.kind).get(card.index).map(String::as_str)
    }

    /// Display name, falling back to the card's index form for foreign cards.
    pub fn label(&self, card: Card) -> String {
        self.name(card)
            .map(str::to_string)
            .unwrap_or_else(|| card.to_string())
    }

    pub fn by_name(&self, kind: CardKind, name: &str) -> Option<Card> {
        self.names(kind)
            .iter()
            .position(|candidate| candidate == name)
            .map(|index| Card::new(kind, index))
    }

    /// Shuffles the full deck, withholds the first card of each kind and deals the rest round-robin.
    pub fn deal<R: rand::Rng + ?Sized>(&self, players: usize, rng: &mut R) -> Option<Deal> {
        if players == 0 {
            return None;
        }
        let mut shuffled: Vec<Card> = self.cards().collect();
        shuffled.shuffle(rng);

        let first = |kind: CardKind| shuffled.iter().copied().find(|card| card.is(kind));
        let envelope = Envelope::new(
            first(CardKind::Room)?,
            first(CardKind::Character)?,
            first(CardKind::Weapon)?,
        )?;

        let mut hands = vec![Vec::new(); players];
        for (dealt, card) in shuffled
            .into_iter()
            .filter(|card| !envelope.contains(*card))
            .enumerate()
        {
            hands[dealt % players].push(card);
        }

        Some(Deal { envelope, hands })
    }

    pub fn deal_with_seed(&self, players: usize, seed: u64) -> Option<Deal> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.deal(players, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use crate::model::card::{Card, CardKind};
    use std::collections::HashSet;

    fn names(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{prefix}{i}")).collect()
    }

    fn deck(characters: usize, weapons: usize, rooms: usize) -> Deck {
        Deck::new(names("c", characters), names("w", weapons), names("r", rooms))
    }

    #[test]
    fn canonical_order_is_characters_weapons_rooms() {
        let deck = deck(2, 2, 2);
        let cards: Vec<Card> = deck.cards().collect();
        assert_eq!(
            cards,
            vec![
                Card::character(0),
                Card::character(1),
                Card::weapon(0),
                Card::weapon(1),
                Card::room(0),
                Card::room(1),
            ]
        );
        for (column, card) in cards.iter().enumerate() {
            assert_eq!(deck.index_of(*card), Some(column));
            assert_eq!(deck.card_at(column), Some(*card));
        }
        assert_eq!(deck.card_at(6), None);
        assert_eq!(deck.index_of(Card::room(2)), None);
    }

    #[test]
    fn lookup_by_name_respects_kind() {
        let deck = Deck::new(
            vec!["Plum".into()],
            vec!["Rope".into()],
            vec!["Hall".into()],
        );
        assert_eq!(deck.by_name(CardKind::Weapon, "Rope"), Some(Card::weapon(0)));
        assert_eq!(deck.by_name(CardKind::Room, "Rope"), None);
        assert_eq!(deck.name(Card::room(0)), Some("Hall"));
        assert_eq!(deck.label(Card::room(3)), "room#3");
    }

    #[test]
    fn deal_partitions_the_deck() {
        for (characters, weapons, rooms, players) in [(6, 6, 9, 3), (6, 6, 9, 4), (6, 6, 9, 6), (3, 4, 5, 3)] {
            let deck = deck(characters, weapons, rooms);
            let deal = deck.deal_with_seed(players, 17).expect("deal");
            let envelope = deal.envelope;
            assert!(envelope.character().is(CardKind::Character));
            assert!(envelope.weapon().is(CardKind::Weapon));
            assert!(envelope.room().is(CardKind::Room));

            let mut seen = HashSet::new();
            for card in deal.hands.iter().flatten() {
                assert!(!envelope.contains(*card));
                assert!(seen.insert(*card), "card dealt twice");
            }
            assert_eq!(seen.len() + 3, deck.len());

            let sizes: Vec<usize> = deal.hands.iter().map(Vec::len).collect();
            let max = sizes.iter().max().copied().unwrap_or(0);
            let min = sizes.iter().min().copied().unwrap_or(0);
            assert!(max - min <= 1);
        }
    }

    #[test]
    fn deal_with_seed_is_deterministic() {
        let deck = deck(6, 6, 9);
        assert_eq!(deck.deal_with_seed(4, 99), deck.deal_with_seed(4, 99));
    }

    #[test]
    fn deal_needs_every_kind() {
        let deck = deck(3, 0, 3);
        assert!(deck.deal_with_seed(3, 1).is_none());
        assert!(self::deck(3, 3, 3).deal_with_seed(0, 1).is_none());
    }
}
