use super::history::WitnessedSuspicion;
use super::matrix::BeliefMatrix;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::notes::{Notebook, OtherNote};
use tracing::{Level, event};

/// Marks `HasNot` for all three suspicion cards against every responder that showed nothing.
pub fn note_non_responders(owner: usize, notes: &mut Notebook, deck: &Deck, witnessed: &WitnessedSuspicion) {
    for seat in witnessed.non_revealers() {
        let Some(slot) = Notebook::slot_for(owner, seat) else {
            continue;
        };
        for card in witnessed.suspicion.cards() {
            if let Some(column) = deck.index_of(card) {
                notes.set_other(slot, column, OtherNote::HasNot);
            }
        }
    }
}

/// When `hand` holds exactly two of the three suspicion cards, anyone else who revealed must hold the
/// third. Returns the attributed card.
pub fn attribute_remaining_card(
    owner: usize,
    hand: &[Card],
    notes: &mut Notebook,
    deck: &Deck,
    witnessed: &WitnessedSuspicion,
) -> Option<Card> {
    let held = witnessed
        .suspicion
        .cards()
        .filter(|card| hand.contains(card))
        .count();
    if held != 2 {
        return None;
    }
    let remaining = witnessed.suspicion.cards().find(|card| !hand.contains(card))?;
    let column = deck.index_of(remaining)?;
    for seat in witnessed.revealers() {
        if let Some(slot) = Notebook::slot_for(owner, seat) {
            notes.set_other(slot, column, OtherNote::Seen);
        }
    }
    Some(remaining)
}

/// Replays `history` once over a belief matrix seeded from `hand` and `notes`, then writes every
/// settled cell back into `notes`. Returns how many reveals were pinned to a single card.
pub fn deduce(
    owner: usize,
    player_count: usize,
    deck: &Deck,
    hand: &[Card],
    notes: &mut Notebook,
    history: &[WitnessedSuspicion],
) -> usize {
    let mut matrix = BeliefMatrix::seeded(owner, player_count, deck, hand, notes);
    matrix.close_rows();

    let mut pinned = 0;
    for entry in history {
        for seat in entry.revealers() {
            if seat == owner {
                continue;
            }
            if let Some(column) = matrix.infer_reveal(seat, deck, &entry.suspicion) {
                pinned += 1;
                log_pinned(owner, seat, deck, column);
                matrix.close_rows();
            }
        }
    }

    matrix.write_back(notes);
    pinned
}

fn log_pinned(owner: usize, seat: usize, deck: &Deck, column: usize) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let card = deck
        .card_at(column)
        .map(|card| deck.label(card))
        .unwrap_or_default();
    event!(
        target: "cluedo_core::belief",
        Level::DEBUG,
        owner,
        seat,
        card = %card,
        "reveal pinned by exclusion"
    );
}

#[cfg(test)]
mod tests {
    use super::{attribute_remaining_card, deduce, note_non_responders};
    use crate::belief::history::{Response, WitnessedSuspicion};
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::notes::{Notebook, OtherNote};
    use crate::model::triple::CardTriple;

    fn deck() -> Deck {
        Deck::new(
            vec!["Scarlett".into(), "Plum".into(), "Green".into()],
            vec!["Rope".into(), "Knife".into(), "Pipe".into()],
            vec!["Hall".into(), "Study".into(), "Lounge".into()],
        )
    }

    fn response(responder: usize, showed: bool) -> Response {
        Response { responder, showed }
    }

    #[test]
    fn non_responders_are_excluded_for_all_three_cards() {
        let deck = deck();
        let mut notes = Notebook::new(deck.len(), 4);
        let suspicion = CardTriple::new(Card::room(2), Card::character(1), Card::weapon(0));
        let witnessed = WitnessedSuspicion::new(
            1,
            suspicion,
            vec![response(2, false), response(3, true), response(0, false)],
        );
        note_non_responders(0, &mut notes, &deck, &witnessed);

        // seat 2 lives in slot 1 of seat 0's notebook
        for column in [1, 3, 8] {
            assert_eq!(notes.other(1, column), OtherNote::HasNot);
            assert_eq!(notes.other(2, column), OtherNote::Nothing);
        }
        assert_eq!(notes.other(0, 1), OtherNote::Nothing);
    }

    #[test]
    fn two_held_cards_attribute_the_third_to_revealers() {
        let deck = deck();
        let mut notes = Notebook::new(deck.len(), 3);
        let suspicion = CardTriple::new(Card::room(0), Card::character(2), Card::weapon(1));
        let witnessed = WitnessedSuspicion::new(1, suspicion, vec![response(2, true), response(0, true)]);
        let hand = [Card::room(0), Card::weapon(1)];

        let card = attribute_remaining_card(0, &hand, &mut notes, &deck, &witnessed);
        assert_eq!(card, Some(Card::character(2)));
        assert_eq!(notes.other(1, 2), OtherNote::Seen);
        assert_eq!(notes.other(0, 2), OtherNote::Nothing);

        let mut untouched = Notebook::new(deck.len(), 3);
        assert_eq!(
            attribute_remaining_card(0, &[Card::room(0)], &mut untouched, &deck, &witnessed),
            None
        );
        assert_eq!(untouched, Notebook::new(deck.len(), 3));
    }

    #[test]
    fn held_cards_close_their_column_for_every_other_seat() {
        let deck = deck();
        let mut notes = Notebook::new(deck.len(), 4);
        let pinned = deduce(0, 4, &deck, &[Card::character(0)], &mut notes, &[]);
        assert_eq!(pinned, 0);
        for slot in 0..3 {
            assert_eq!(notes.other(slot, 0), OtherNote::HasNot);
            assert_eq!(notes.other(slot, 1), OtherNote::Nothing);
        }
    }

    #[test]
    fn fully_excluded_reveal_is_not_pinned() {
        let deck = deck();
        let mut notes = Notebook::new(deck.len(), 4);
        notes.set_other(2, 3, OtherNote::HasNot);
        notes.set_other(2, 7, OtherNote::HasNot);
        let suspicion = CardTriple::new(Card::room(1), Card::character(0), Card::weapon(0));
        let history = vec![WitnessedSuspicion::new(
            1,
            suspicion,
            vec![response(2, false), response(3, true), response(0, true)],
        )];
        let pinned = deduce(0, 4, &deck, &[Card::character(0)], &mut notes, &history);
        assert_eq!(pinned, 0);
        assert_eq!(notes.other(2, 0), OtherNote::HasNot);
    }

    #[test]
    fn history_replay_marks_the_only_possible_card_as_seen() {
        let deck = deck();
        let mut notes = Notebook::new(deck.len(), 4);
        let hand = [Card::weapon(2)];
        // seat 3 lacks Plum and Lounge
        notes.set_other(2, 1, OtherNote::HasNot);
        notes.set_other(2, 8, OtherNote::HasNot);
        let suspicion = CardTriple::new(Card::room(2), Card::character(1), Card::weapon(1));
        let history = vec![WitnessedSuspicion::new(
            2,
            suspicion,
            vec![response(3, true), response(0, false), response(1, false)],
        )];

        let pinned = deduce(0, 4, &deck, &hand, &mut notes, &history);
        assert_eq!(pinned, 1);
        assert_eq!(notes.other(2, 4), OtherNote::Seen);
        assert_eq!(notes.other(0, 4), OtherNote::HasNot);
        assert_eq!(notes.other(1, 4), OtherNote::HasNot);
        assert_eq!(notes.other(1, 5), OtherNote::HasNot);
    }
}
