use core::fmt;
use serde::{Deserialize, Serialize};

/// Card categories in canonical deck order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Character,
    Weapon,
    Room,
}

impl CardKind {
    pub const ALL: [CardKind; 3] = [CardKind::Character, CardKind::Weapon, CardKind::Room];

    pub const fn label(self) -> &'static str {
        match self {
            CardKind::Character => "character",
            CardKind::Weapon => "weapon",
            CardKind::Room => "room",
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A card identified by its kind and its index within that kind's configuration list.
///
/// Names are unique per kind, so this is equivalent to identifying a card by name and kind.
/// The derived ordering is the canonical deck order: characters, then weapons, then rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    pub kind: CardKind,
    pub index: usize,
}

impl Card {
    pub const fn new(kind: CardKind, index: usize) -> Self {
        Self { kind, index }
    }

    pub const fn character(index: usize) -> Self {
        Self::new(CardKind::Character, index)
    }

    pub const fn weapon(index: usize) -> Self {
        Self::new(CardKind::Weapon, index)
    }

    pub const fn room(index: usize) -> Self {
        Self::new(CardKind::Room, index)
    }

    pub const fn is(self, kind: CardKind) -> bool {
        self.kind as u8 == kind as u8
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.index)
    }
}
