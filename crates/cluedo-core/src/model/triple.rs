use crate::model::card::{Card, CardKind};
use core::fmt;

/// A (room, character, weapon) combination used for suspicions and accusations. Slots may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CardTriple {
    pub room: Option<Card>,
    pub character: Option<Card>,
    pub weapon: Option<Card>,
}

impl CardTriple {
    pub const fn new(room: Card, character: Card, weapon: Card) -> Self {
        Self {
            room: Some(room),
            character: Some(character),
            weapon: Some(weapon),
        }
    }

    pub const fn empty() -> Self {
        Self {
            room: None,
            character: None,
            weapon: None,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.room.is_none() && self.character.is_none() && self.weapon.is_none()
    }

    pub const fn is_complete(&self) -> bool {
        self.room.is_some() && self.character.is_some() && self.weapon.is_some()
    }

    pub const fn has_room(&self) -> bool {
        self.room.is_some()
    }

    pub const fn has_character(&self) -> bool {
        self.character.is_some()
    }

    pub const fn has_weapon(&self) -> bool {
        self.weapon.is_some()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards().any(|c| c == card)
    }

    /// Present cards in canonical order.
    pub fn cards(&self) -> impl Iterator<Item = Card> {
        [self.character, self.weapon, self.room].into_iter().flatten()
    }

    pub fn slot(&self, kind: CardKind) -> Option<Card> {
        match kind {
            CardKind::Character => self.character,
            CardKind::Weapon => self.weapon,
            CardKind::Room => self.room,
        }
    }
}

impl fmt::Display for CardTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |card: Option<Card>| card.map(|c| c.to_string()).unwrap_or_else(|| "-".into());
        write!(
            f,
            "[{} | {} | {}]",
            show(self.room),
            show(self.character),
            show(self.weapon)
        )
    }
}

/// The withheld solution: exactly one card of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Envelope {
    room: Card,
    character: Card,
    weapon: Card,
}

impl Envelope {
    pub fn new(room: Card, character: Card, weapon: Card) -> Option<Self> {
        (room.is(CardKind::Room) && character.is(CardKind::Character) && weapon.is(CardKind::Weapon))
            .then_some(Self {
                room,
                character,
                weapon,
            })
    }

    pub const fn room(&self) -> Card {
        self.room
    }

    pub const fn character(&self) -> Card {
        self.character
    }

    pub const fn weapon(&self) -> Card {
        self.weapon
    }

    pub const fn as_triple(&self) -> CardTriple {
        CardTriple::new(self.room, self.character, self.weapon)
    }

    pub fn contains(&self, card: Card) -> bool {
        card == self.room || card == self.character || card == self.weapon
    }

    /// An accusation wins only when all three slots match.
    pub fn matches(&self, accusation: &CardTriple) -> bool {
        *accusation == self.as_triple()
    }
}
