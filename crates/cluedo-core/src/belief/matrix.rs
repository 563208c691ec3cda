use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::notes::{Notebook, OtherNote};
use crate::model::triple::CardTriple;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Knowledge {
    Has,
    HasNot,
    Unknown,
}

/// Ownership grid over every seat and every card column, built from one player's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeliefMatrix {
    perspective: usize,
    cells: Vec<Vec<Knowledge>>,
}

impl BeliefMatrix {
    /// Seeds the perspective's own row from its hand and the other rows from its notes
    /// (`Seen` becomes `Has`, `HasNot` stays `HasNot`, anything else is unknown).
    pub fn seeded(
        perspective: usize,
        player_count: usize,
        deck: &Deck,
        hand: &[Card],
        notes: &Notebook,
    ) -> Self {
        let columns = deck.len();
        let mut cells = vec![vec![Knowledge::Unknown; columns]; player_count];
        for (seat, row) in cells.iter_mut().enumerate() {
            match Notebook::slot_for(perspective, seat) {
                None => {
                    for (column, cell) in row.iter_mut().enumerate() {
                        let held = deck.card_at(column).is_some_and(|card| hand.contains(&card));
                        *cell = if held {
                            Knowledge::Has
                        } else {
                            Knowledge::HasNot
                        };
                    }
                }
                Some(slot) => {
                    for (column, cell) in row.iter_mut().enumerate() {
                        *cell = match notes.other(slot, column) {
                            OtherNote::Seen => Knowledge::Has,
                            OtherNote::HasNot => Knowledge::HasNot,
                            _ => Knowledge::Unknown,
                        };
                    }
                }
            }
        }
        Self { perspective, cells }
    }

    pub fn perspective(&self) -> usize {
        self.perspective
    }

    pub fn players(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, seat: usize, column: usize) -> Knowledge {
        self.cells
            .get(seat)
            .and_then(|row| row.get(column))
            .copied()
            .unwrap_or(Knowledge::Unknown)
    }

    pub fn set(&mut self, seat: usize, column: usize, value: Knowledge) {
        if let Some(cell) = self.cells.get_mut(seat).and_then(|row| row.get_mut(column)) {
            *cell = value;
        }
    }

    /// A card has at most one holder: once some seat is `Has`, every other seat becomes `HasNot`.
    pub fn close_rows(&mut self) {
        let columns = self.cells.first().map(Vec::len).unwrap_or(0);
        for column in 0..columns {
            let holder = self
                .cells
                .iter()
                .rposition(|row| row[column] == Knowledge::Has);
            if let Some(holder) = holder {
                for (seat, row) in self.cells.iter_mut().enumerate() {
                    if seat != holder {
                        row[column] = Knowledge::HasNot;
                    }
                }
            }
        }
    }

    /// If `seat` revealed something for `suspicion` and two of its three cards are already excluded
    /// for that seat, the remaining card must be the one shown. Returns its column when inferred.
    pub fn infer_reveal(&mut self, seat: usize, deck: &Deck, suspicion: &CardTriple) -> Option<usize> {
        let columns: Vec<usize> = suspicion
            .cards()
            .filter_map(|card| deck.index_of(card))
            .collect();
        let excluded = columns
            .iter()
            .filter(|&&column| self.get(seat, column) == Knowledge::HasNot)
            .count();
        if excluded != 2 {
            return None;
        }
        let remaining = columns
            .into_iter()
            .find(|&column| self.get(seat, column) != Knowledge::HasNot)?;
        self.set(seat, remaining, Knowledge::Has);
        Some(remaining)
    }

    /// Copies the non-perspective rows back into `notes` as `Seen`/`HasNot`; unknown cells keep their note.
    pub fn write_back(&self, notes: &mut Notebook) {
        for (seat, row) in self.cells.iter().enumerate() {
            let Some(slot) = Notebook::slot_for(self.perspective, seat) else {
                continue;
            };
            for (column, cell) in row.iter().enumerate() {
                match cell {
                    Knowledge::Has => notes.set_other(slot, column, OtherNote::Seen),
                    Knowledge::HasNot => notes.set_other(slot, column, OtherNote::HasNot),
                    Knowledge::Unknown => {}
                }
            }
        }
    }
}
