use crate::model::card::Card;
use crate::model::notes::{Notebook, SelfNote};
use crate::model::position::Position;
use crate::model::triple::CardTriple;
use core::fmt;

/// Computer opponent strength. Human seats carry no difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Stupid,
    Normal,
    Smart,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Stupid, Difficulty::Normal, Difficulty::Smart];

    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Stupid => "stupid",
            Difficulty::Normal => "normal",
            Difficulty::Smart => "smart",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stupid" | "easy" => Some(Difficulty::Stupid),
            "normal" => Some(Difficulty::Normal),
            "smart" | "hard" => Some(Difficulty::Smart),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A board figure. Only some characters are controlled by players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    name: String,
    start: Position,
    position: Position,
}

impl Character {
    pub fn new(name: impl Into<String>, start: Position) -> Self {
        Self {
            name: name.into(),
            start,
            position: start,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn reset(&mut self) {
        self.position = self.start;
    }
}

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    character: usize,
    difficulty: Option<Difficulty>,
    hand: Vec<Card>,
    requested: bool,
    notes: Notebook,
}

impl Player {
    /// Fresh player whose self-notes mark every held card as `Own`.
    pub fn new(
        character: usize,
        difficulty: Option<Difficulty>,
        mut hand: Vec<Card>,
        card_columns: impl Fn(Card) -> Option<usize>,
        card_count: usize,
        player_count: usize,
    ) -> Self {
        hand.sort();
        let mut notes = Notebook::new(card_count, player_count);
        for card in &hand {
            if let Some(column) = card_columns(*card) {
                notes.set_own(column, SelfNote::Own);
            }
        }
        Self {
            character,
            difficulty,
            hand,
            requested: false,
            notes,
        }
    }

    pub fn restored(
        character: usize,
        difficulty: Option<Difficulty>,
        mut hand: Vec<Card>,
        requested: bool,
        notes: Notebook,
    ) -> Self {
        hand.sort();
        Self {
            character,
            difficulty,
            hand,
            requested,
            notes,
        }
    }

    /// Index of the controlled character.
    pub fn character(&self) -> usize {
        self.character
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn is_ai(&self) -> bool {
        self.difficulty.is_some()
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn holds(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    /// Cards of this hand that appear in `suspicion`, in canonical order.
    pub fn showable(&self, suspicion: &CardTriple) -> Vec<Card> {
        self.hand
            .iter()
            .copied()
            .filter(|card| suspicion.contains(*card))
            .collect()
    }

    pub fn requested(&self) -> bool {
        self.requested
    }

    pub fn set_requested(&mut self, requested: bool) {
        self.requested = requested;
    }

    pub fn notes(&self) -> &Notebook {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut Notebook {
        &mut self.notes
    }
}

#[cfg(test)]
mod tests {
    use super::{Character, Difficulty, Player};
    use crate::model::card::Card;
    use crate::model::notes::SelfNote;
    use crate::model::position::Position;
    use crate::model::triple::CardTriple;

    fn column(card: Card) -> Option<usize> {
        Some(match card.kind {
            crate::model::card::CardKind::Character => card.index,
            crate::model::card::CardKind::Weapon => 3 + card.index,
            crate::model::card::CardKind::Room => 6 + card.index,
        })
    }

    #[test]
    fn new_player_marks_own_cards() {
        let player = Player::new(
            1,
            Some(Difficulty::Normal),
            vec![Card::room(1), Card::character(0)],
            column,
            9,
            3,
        );
        assert_eq!(player.hand(), &[Card::character(0), Card::room(1)]);
        assert_eq!(player.notes().own_note(0), SelfNote::Own);
        assert_eq!(player.notes().own_note(7), SelfNote::Own);
        assert_eq!(player.notes().own_note(1), SelfNote::Nothing);
        assert_eq!(player.notes().others().len(), 2);
        assert!(player.is_ai());
        assert!(!player.requested());
    }

    #[test]
    fn showable_cards_intersect_suspicion() {
        let player = Player::new(
            0,
            None,
            vec![Card::weapon(2), Card::room(0), Card::character(1)],
            column,
            9,
            3,
        );
        let suspicion = CardTriple::new(Card::room(0), Card::character(2), Card::weapon(2));
        assert_eq!(player.showable(&suspicion), vec![Card::weapon(2), Card::room(0)]);
        assert!(!player.is_ai());
    }

    #[test]
    fn difficulty_labels_parse_case_insensitively() {
        assert_eq!(Difficulty::from_label("SMART"), Some(Difficulty::Smart));
        assert_eq!(Difficulty::from_label(" stupid "), Some(Difficulty::Stupid));
        assert_eq!(Difficulty::from_label("genius"), None);
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::from_label(difficulty.label()), Some(difficulty));
        }
    }

    #[test]
    fn character_reset_returns_to_start() {
        let mut character = Character::new("Plum", Position::new(4, 0));
        character.set_position(Position::new(1, 1));
        assert_eq!(character.position(), Position::new(1, 1));
        character.reset();
        assert_eq!(character.position(), Position::new(4, 0));
    }
}
