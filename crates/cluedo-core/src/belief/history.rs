use crate::model::triple::CardTriple;

/// Whether one polled player revealed something. Observers never learn which card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub responder: usize,
    pub showed: bool,
}

/// A suspicion declared by another player, as seen from the outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessedSuspicion {
    pub declarant: usize,
    pub suspicion: CardTriple,
    pub responses: Vec<Response>,
}

impl WitnessedSuspicion {
    pub fn new(declarant: usize, suspicion: CardTriple, responses: Vec<Response>) -> Self {
        Self {
            declarant,
            suspicion,
            responses,
        }
    }

    /// Responders other than the declarant that revealed a card.
    pub fn revealers(&self) -> impl Iterator<Item = usize> + '_ {
        self.responses
            .iter()
            .filter(move |r| r.showed && r.responder != self.declarant)
            .map(|r| r.responder)
    }

    /// Responders other than the declarant that had nothing to show.
    pub fn non_revealers(&self) -> impl Iterator<Item = usize> + '_ {
        self.responses
            .iter()
            .filter(move |r| !r.showed && r.responder != self.declarant)
            .map(|r| r.responder)
    }
}
