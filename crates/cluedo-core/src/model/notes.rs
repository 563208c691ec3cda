use core::fmt;

/// How often a player has shown one of their own cards. Ordered by frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SelfNote {
    #[default]
    Nothing,
    Own,
    ShownOnce,
    ShownTwice,
    ShownThrice,
    ShownOverThrice,
}

impl SelfNote {
    pub const ALL: [SelfNote; 6] = [
        SelfNote::Nothing,
        SelfNote::Own,
        SelfNote::ShownOnce,
        SelfNote::ShownTwice,
        SelfNote::ShownThrice,
        SelfNote::ShownOverThrice,
    ];

    /// One tier up, saturating at `ShownOverThrice`. A card not held stays `Nothing`.
    pub const fn increment(self) -> Self {
        match self {
            SelfNote::Nothing => SelfNote::Nothing,
            SelfNote::Own => SelfNote::ShownOnce,
            SelfNote::ShownOnce => SelfNote::ShownTwice,
            SelfNote::ShownTwice => SelfNote::ShownThrice,
            SelfNote::ShownThrice | SelfNote::ShownOverThrice => SelfNote::ShownOverThrice,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SelfNote::Nothing => "nothing",
            SelfNote::Own => "own",
            SelfNote::ShownOnce => "shown_once",
            SelfNote::ShownTwice => "shown_twice",
            SelfNote::ShownThrice => "shown_thrice",
            SelfNote::ShownOverThrice => "shown_over_thrice",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|note| note.label() == label)
    }
}

impl fmt::Display for SelfNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Belief about one card in another player's hand. The `Suspicion*` marks are user annotations
/// and are never written by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OtherNote {
    #[default]
    Nothing,
    Seen,
    HasNot,
    SuspicionA,
    SuspicionB,
    SuspicionC,
    SuspicionD,
}

impl OtherNote {
    pub const ALL: [OtherNote; 7] = [
        OtherNote::Nothing,
        OtherNote::Seen,
        OtherNote::HasNot,
        OtherNote::SuspicionA,
        OtherNote::SuspicionB,
        OtherNote::SuspicionC,
        OtherNote::SuspicionD,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            OtherNote::Nothing => "nothing",
            OtherNote::Seen => "seen",
            OtherNote::HasNot => "has_not",
            OtherNote::SuspicionA => "suspicion_a",
            OtherNote::SuspicionB => "suspicion_b",
            OtherNote::SuspicionC => "suspicion_c",
            OtherNote::SuspicionD => "suspicion_d",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|note| note.label() == label)
    }
}

impl fmt::Display for OtherNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A player's notes: one self-note per card and one row of other-notes per other seat.
///
/// Other-note rows are indexed by "slot": the other seats in seat order with the owner skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    own: Vec<SelfNote>,
    others: Vec<Vec<OtherNote>>,
}

impl Notebook {
    pub fn new(card_count: usize, player_count: usize) -> Self {
        Self {
            own: vec![SelfNote::Nothing; card_count],
            others: vec![vec![OtherNote::Nothing; card_count]; player_count.saturating_sub(1)],
        }
    }

    pub fn from_parts(own: Vec<SelfNote>, others: Vec<Vec<OtherNote>>) -> Self {
        Self { own, others }
    }

    /// Row slot that `other` occupies in `owner`'s notebook, `None` for the owner itself.
    pub const fn slot_for(owner: usize, other: usize) -> Option<usize> {
        if other == owner {
            None
        } else if other < owner {
            Some(other)
        } else {
            Some(other - 1)
        }
    }

    /// Inverse of [`Notebook::slot_for`].
    pub const fn seat_for(owner: usize, slot: usize) -> usize {
        if slot < owner { slot } else { slot + 1 }
    }

    pub fn card_count(&self) -> usize {
        self.own.len()
    }

    pub fn own(&self) -> &[SelfNote] {
        &self.own
    }

    pub fn own_note(&self, column: usize) -> SelfNote {
        self.own.get(column).copied().unwrap_or_default()
    }

    pub fn set_own(&mut self, column: usize, note: SelfNote) {
        if let Some(slot) = self.own.get_mut(column) {
            *slot = note;
        }
    }

    pub fn bump_own(&mut self, column: usize) -> SelfNote {
        match self.own.get_mut(column) {
            Some(slot) => {
                *slot = slot.increment();
                *slot
            }
            None => SelfNote::Nothing,
        }
    }

    pub fn others(&self) -> &[Vec<OtherNote>] {
        &self.others
    }

    pub fn other_row(&self, slot: usize) -> Option<&[OtherNote]> {
        self.others.get(slot).map(Vec::as_slice)
    }

    pub fn other(&self, slot: usize, column: usize) -> OtherNote {
        self.others
            .get(slot)
            .and_then(|row| row.get(column))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_other(&mut self, slot: usize, column: usize, note: OtherNote) {
        if let Some(cell) = self.others.get_mut(slot).and_then(|row| row.get_mut(column)) {
            *cell = note;
        }
    }

    /// Columns marked `Seen` in any other-notes row.
    pub fn seen_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.card_count())
            .filter(|&column| self.others.iter().any(|row| row.get(column) == Some(&OtherNote::Seen)))
    }
}
