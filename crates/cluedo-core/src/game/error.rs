use crate::model::card::{Card, CardKind};
use crate::model::position::Position;
use crate::model::triple::CardTriple;
use thiserror::Error;

/// Internal invariant violations. The engine stops when one of these surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("seat {seat} was requested into a room but stands at {position}")]
    RequestedButNotInRoom { seat: usize, position: Position },
    #[error("computer seat {seat} chose {target}, which is not a legal move")]
    IllegalAiMove { seat: usize, target: Position },
    #[error("computer seat {seat} has no strategy attached")]
    MissingStrategy { seat: usize },
    #[error("seat {seat} declared {suspicion}, which is incomplete or names unknown cards")]
    InvalidSuspicion { seat: usize, suspicion: CardTriple },
    #[error("seat {seat} answered with {card:?}, which is not one of its matching cards")]
    InvalidReveal { seat: usize, card: Option<Card> },
    #[error("accusation {accusation} is incomplete or names unknown cards")]
    InvalidAccusation { accusation: CardTriple },
    #[error("room {room} does not exist on this board")]
    UnknownRoom { room: usize },
    #[error("seat {seat} does not exist at this table")]
    UnknownSeat { seat: usize },
    #[error("the game has not been started")]
    NotStarted,
    #[error("the game is already over")]
    GameOver,
    #[error("seat {seat} is not waiting for a human decision")]
    NotAwaitingHuman { seat: usize },
}

/// Reasons a save state is rejected. The running game is left untouched.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("save state is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{count} players saved; between {min} and {max} are supported")]
    PlayerCount { count: usize, min: usize, max: usize },
    #[error("unknown character {name:?}")]
    UnknownCharacter { name: String },
    #[error("character {name:?} is played by more than one seat")]
    DuplicatePlayer { name: String },
    #[error("unknown difficulty {label:?} for {player:?}")]
    UnknownDifficulty { player: String, label: String },
    #[error("unknown room {name:?}")]
    UnknownRoom { name: String },
    #[error("unknown weapon {name:?}")]
    UnknownWeapon { name: String },
    #[error("weapon {name:?} is listed more than once")]
    DuplicateWeapon { name: String },
    #[error("unknown {kind} card {name:?}")]
    UnknownCard { kind: CardKind, name: String },
    #[error("card {name:?} is held more than once")]
    DuplicateCard { name: String },
    #[error("{player:?} at {position} is outside the board")]
    OutOfBounds { player: String, position: Position },
    #[error("{player:?} at {position} stands in a wall")]
    PlayerInWall { player: String, position: Position },
    #[error("{player:?} at {position} is not in {room:?}")]
    PlayerInWrongRoom {
        player: String,
        room: String,
        position: Position,
    },
    #[error("{player:?} is in {room:?} but not on its center")]
    PlayerNotInRoomCenter { player: String, room: String },
    #[error("{player:?} is requested but stands in the corridor")]
    RequestedButNotInRoom { player: String },
    #[error("expected {expected} weapons, found {found}")]
    WeaponCountMismatch { expected: usize, found: usize },
    #[error("expected {expected} note blocks, found {found}")]
    NoteBlockCount { expected: usize, found: usize },
    #[error("note block {index} of {player:?} is named {found:?}, expected {expected:?}")]
    NoteBlockOrder {
        player: String,
        index: usize,
        expected: String,
        found: String,
    },
    #[error("own notes of {player:?} list {found} {kind} entries, expected {expected}")]
    NoteSelfLength {
        player: String,
        kind: CardKind,
        expected: usize,
        found: usize,
    },
    #[error("notes of {player:?} about {other:?} list {found} {kind} entries, expected {expected}")]
    NoteOthersLength {
        player: String,
        other: String,
        kind: CardKind,
        expected: usize,
        found: usize,
    },
    #[error("unknown note label {label:?}")]
    UnknownNoteLabel { label: String },
    #[error("no {kind} card is left for the envelope")]
    EnvelopeIncomplete { kind: CardKind },
}
