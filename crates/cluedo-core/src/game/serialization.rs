use super::engine::{GameEngine, RestoredState};
use super::error::{GameError, LoadError};
use super::port::PresentationPort;
use super::setup::{MAX_PLAYERS, MIN_PLAYERS};
use crate::model::board::{Board, Cell};
use crate::model::card::{Card, CardKind};
use crate::model::deck::Deck;
use crate::model::notes::{Notebook, OtherNote, SelfNote};
use crate::model::player::{Character, Difficulty, Player};
use crate::model::position::Position;
use crate::model::triple::Envelope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Room marker for a player standing in the corridor.
pub const CORRIDOR: &str = "corridor";

/// Names or labels split by card kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardGroups {
    pub persons: Vec<String>,
    pub rooms: Vec<String>,
    pub weapons: Vec<String>,
}

impl CardGroups {
    pub fn of_kind(&self, kind: CardKind) -> &[String] {
        match kind {
            CardKind::Character => &self.persons,
            CardKind::Weapon => &self.weapons,
            CardKind::Room => &self.rooms,
        }
    }

    fn of_kind_mut(&mut self, kind: CardKind) -> &mut Vec<String> {
        match kind {
            CardKind::Character => &mut self.persons,
            CardKind::Weapon => &mut self.weapons,
            CardKind::Room => &mut self.rooms,
        }
    }

    /// One entry per card of the deck, produced column by column.
    fn per_column(deck: &Deck, mut label: impl FnMut(usize) -> String) -> Self {
        let mut groups = CardGroups::default();
        for card in deck.cards() {
            if let Some(column) = deck.index_of(card) {
                groups.of_kind_mut(card.kind).push(label(column));
            }
        }
        groups
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedPlayer {
    pub name: String,
    pub iq: String,
    pub room: String,
    pub position: Position,
    pub requested: bool,
    pub cards: CardGroups,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedWeapon {
    pub name: String,
    pub room: String,
}

/// Notes one player keeps about the player named `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedNote {
    pub name: String,
    pub memo: CardGroups,
}

/// Persisted game state. Turn order, dice and computer-player history are not part of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveGame {
    pub players: Vec<SavedPlayer>,
    pub weapons: Vec<SavedWeapon>,
    pub notes: Vec<Vec<SavedNote>>,
}

impl SaveGame {
    pub fn capture<P: PresentationPort>(engine: &GameEngine<P>) -> Result<Self, GameError> {
        let board = engine.board();
        let deck = engine.deck();
        let name_of = |seat: usize| {
            engine
                .player(seat)
                .and_then(|player| engine.characters().get(player.character()))
                .map(|character| character.name().to_string())
                .unwrap_or_default()
        };

        let players = engine
            .players()
            .iter()
            .enumerate()
            .map(|(seat, player)| {
                let position = engine.seat_position(seat)?;
                let room = board
                    .room_at(position)
                    .and_then(|room| board.room(room))
                    .map(|room| room.name().to_string())
                    .unwrap_or_else(|| CORRIDOR.to_string());
                let mut cards = CardGroups::default();
                for card in player.hand() {
                    cards.of_kind_mut(card.kind).push(deck.label(*card));
                }
                Ok(SavedPlayer {
                    name: name_of(seat),
                    iq: player
                        .difficulty()
                        .unwrap_or(Difficulty::Normal)
                        .label()
                        .to_string(),
                    room,
                    position,
                    requested: player.requested(),
                    cards,
                })
            })
            .collect::<Result<Vec<_>, GameError>>()?;

        let weapons = deck
            .names(CardKind::Weapon)
            .iter()
            .zip(engine.weapon_rooms())
            .map(|(name, room)| SavedWeapon {
                name: name.clone(),
                room: board
                    .room(*room)
                    .map(|room| room.name().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        let count = engine.players().len();
        let notes = engine
            .players()
            .iter()
            .enumerate()
            .map(|(owner, player)| {
                let notebook = player.notes();
                (0..count)
                    .map(|other| {
                        let memo = match Notebook::slot_for(owner, other) {
                            None => CardGroups::per_column(deck, |column| {
                                notebook.own_note(column).label().to_string()
                            }),
                            Some(slot) => CardGroups::per_column(deck, |column| {
                                notebook.other(slot, column).label().to_string()
                            }),
                        };
                        SavedNote {
                            name: name_of(other),
                            memo,
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(SaveGame {
            players,
            weapons,
            notes,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks every reference against the running game's board and deck and assembles the
    /// replacement state.
    fn resolve(
        &self,
        board: &Board,
        deck: &Deck,
        characters: &[Character],
    ) -> Result<RestoredState, LoadError> {
        let count = self.players.len();
        let max = MAX_PLAYERS.min(characters.len());
        if !(MIN_PLAYERS..=max).contains(&count) {
            return Err(LoadError::PlayerCount {
                count,
                min: MIN_PLAYERS,
                max,
            });
        }

        let mut figures: Vec<Character> = characters.to_vec();
        figures.iter_mut().for_each(Character::reset);

        let mut seated = BTreeSet::new();
        let mut dealt: BTreeSet<Card> = BTreeSet::new();
        let mut seats = Vec::with_capacity(count);
        for (seat, saved) in self.players.iter().enumerate() {
            let character = characters
                .iter()
                .position(|character| character.name() == saved.name)
                .ok_or_else(|| LoadError::UnknownCharacter {
                    name: saved.name.clone(),
                })?;
            if !seated.insert(character) {
                return Err(LoadError::DuplicatePlayer {
                    name: saved.name.clone(),
                });
            }
            let difficulty = Difficulty::from_label(&saved.iq).ok_or_else(|| {
                LoadError::UnknownDifficulty {
                    player: saved.name.clone(),
                    label: saved.iq.clone(),
                }
            })?;
            check_standing(board, saved)?;

            let mut hand = Vec::new();
            for kind in CardKind::ALL {
                for name in saved.cards.of_kind(kind) {
                    let card = deck.by_name(kind, name).ok_or_else(|| LoadError::UnknownCard {
                        kind,
                        name: name.clone(),
                    })?;
                    if !dealt.insert(card) {
                        return Err(LoadError::DuplicateCard { name: name.clone() });
                    }
                    hand.push(card);
                }
            }

            if let Some(figure) = figures.get_mut(character) {
                figure.set_position(saved.position);
            }
            // seat 0 is always the human
            let difficulty = (seat > 0).then_some(difficulty);
            seats.push((character, difficulty, hand, saved.requested));
        }

        let weapon_rooms = self.resolve_weapons(board, deck)?;

        let mut players = Vec::with_capacity(count);
        for (seat, (character, difficulty, hand, requested)) in seats.into_iter().enumerate() {
            let notes = self.resolve_notes(seat, deck)?;
            players.push(Player::restored(character, difficulty, hand, requested, notes));
        }

        let mut envelope = Vec::with_capacity(CardKind::ALL.len());
        for kind in [CardKind::Room, CardKind::Character, CardKind::Weapon] {
            let card = deck
                .of_kind(kind)
                .find(|card| !dealt.contains(card))
                .ok_or(LoadError::EnvelopeIncomplete { kind })?;
            envelope.push(card);
        }
        let envelope = Envelope::new(envelope[0], envelope[1], envelope[2])
            .ok_or(LoadError::EnvelopeIncomplete { kind: CardKind::Room })?;

        Ok(RestoredState {
            characters: figures,
            players,
            weapon_rooms,
            envelope,
        })
    }

    fn resolve_weapons(&self, board: &Board, deck: &Deck) -> Result<Vec<usize>, LoadError> {
        let expected = deck.count(CardKind::Weapon);
        if self.weapons.len() != expected {
            return Err(LoadError::WeaponCountMismatch {
                expected,
                found: self.weapons.len(),
            });
        }
        let mut rooms: Vec<Option<usize>> = vec![None; expected];
        for saved in &self.weapons {
            let weapon = deck
                .by_name(CardKind::Weapon, &saved.name)
                .ok_or_else(|| LoadError::UnknownWeapon {
                    name: saved.name.clone(),
                })?;
            let room = board
                .room_by_name(&saved.room)
                .ok_or_else(|| LoadError::UnknownRoom {
                    name: saved.room.clone(),
                })?;
            if rooms[weapon.index].replace(room).is_some() {
                return Err(LoadError::DuplicateWeapon {
                    name: saved.name.clone(),
                });
            }
        }
        // counts match and no duplicates, so every slot is filled
        Ok(rooms.into_iter().flatten().collect())
    }

    fn resolve_notes(&self, owner: usize, deck: &Deck) -> Result<Notebook, LoadError> {
        let count = self.players.len();
        let player = &self.players[owner].name;
        let blocks = self.notes.get(owner).ok_or(LoadError::NoteBlockCount {
            expected: count,
            found: self.notes.len(),
        })?;
        if self.notes.len() != count || blocks.len() != count {
            return Err(LoadError::NoteBlockCount {
                expected: count,
                found: if self.notes.len() != count {
                    self.notes.len()
                } else {
                    blocks.len()
                },
            });
        }

        let mut own = Vec::new();
        let mut others = vec![Vec::new(); count - 1];
        for (index, block) in blocks.iter().enumerate() {
            let expected = &self.players[index].name;
            if &block.name != expected {
                return Err(LoadError::NoteBlockOrder {
                    player: player.clone(),
                    index,
                    expected: expected.clone(),
                    found: block.name.clone(),
                });
            }
            for kind in CardKind::ALL {
                let labels = block.memo.of_kind(kind);
                let wanted = deck.count(kind);
                match Notebook::slot_for(owner, index) {
                    None => {
                        if labels.len() != wanted {
                            return Err(LoadError::NoteSelfLength {
                                player: player.clone(),
                                kind,
                                expected: wanted,
                                found: labels.len(),
                            });
                        }
                        for label in labels {
                            own.push(SelfNote::from_label(label).ok_or_else(|| {
                                LoadError::UnknownNoteLabel {
                                    label: label.clone(),
                                }
                            })?);
                        }
                    }
                    Some(slot) => {
                        if labels.len() != wanted {
                            return Err(LoadError::NoteOthersLength {
                                player: player.clone(),
                                other: expected.clone(),
                                kind,
                                expected: wanted,
                                found: labels.len(),
                            });
                        }
                        for label in labels {
                            others[slot].push(OtherNote::from_label(label).ok_or_else(|| {
                                LoadError::UnknownNoteLabel {
                                    label: label.clone(),
                                }
                            })?);
                        }
                    }
                }
            }
        }
        Ok(Notebook::from_parts(own, others))
    }
}

/// Position must agree with the saved room: a corridor cell, or the named room's center.
fn check_standing(board: &Board, saved: &SavedPlayer) -> Result<(), LoadError> {
    let position = saved.position;
    let cell = board.cell(position).ok_or_else(|| LoadError::OutOfBounds {
        player: saved.name.clone(),
        position,
    })?;
    if cell == Cell::Wall {
        return Err(LoadError::PlayerInWall {
            player: saved.name.clone(),
            position,
        });
    }
    if saved.room == CORRIDOR {
        if !cell.is_corridor() {
            return Err(LoadError::PlayerInWrongRoom {
                player: saved.name.clone(),
                room: saved.room.clone(),
                position,
            });
        }
        if saved.requested {
            return Err(LoadError::RequestedButNotInRoom {
                player: saved.name.clone(),
            });
        }
        return Ok(());
    }

    let room = board
        .room_by_name(&saved.room)
        .ok_or_else(|| LoadError::UnknownRoom {
            name: saved.room.clone(),
        })?;
    if cell.room() != Some(room) {
        return Err(LoadError::PlayerInWrongRoom {
            player: saved.name.clone(),
            room: saved.room.clone(),
            position,
        });
    }
    if board.room(room).map(|room| room.center()) != Some(position) {
        return Err(LoadError::PlayerNotInRoomCenter {
            player: saved.name.clone(),
            room: saved.room.clone(),
        });
    }
    Ok(())
}

impl<P: PresentationPort> GameEngine<P> {
    /// Replaces the running game with `save`. On error nothing changes.
    pub fn restore(&mut self, save: &SaveGame) -> Result<(), LoadError> {
        let state = save.resolve(self.board(), self.deck(), self.characters())?;
        self.install(state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CORRIDOR, SaveGame};
    use crate::game::config::GameConfig;
    use crate::game::engine::{GameEngine, Phase};
    use crate::game::error::LoadError;
    use crate::game::port::{GameEvent, PresentationPort, SetupChoice};
    use crate::game::setup::GameSetup;
    use crate::game::strategy::{AiStrategy, Reveal, StrategyFactory, TableView};
    use crate::model::card::Card;
    use crate::model::notes::{OtherNote, SelfNote};
    use crate::model::player::{Difficulty, Player};
    use crate::model::position::Position;
    use crate::model::triple::CardTriple;
    use crate::path::PositionSet;
    use rand::RngCore;

    struct Idle(Difficulty);

    impl AiStrategy for Idle {
        fn difficulty(&self) -> Difficulty {
            self.0
        }

        fn next_move(
            &mut self,
            _table: &TableView<'_>,
            _me: &Player,
            _seat: usize,
            _dice: u8,
            _rng: &mut dyn RngCore,
        ) -> Option<Position> {
            None
        }

        fn declare_suspicion(
            &mut self,
            _table: &TableView<'_>,
            _me: &Player,
            _seat: usize,
            room: Card,
        ) -> CardTriple {
            CardTriple::new(room, Card::character(0), Card::weapon(0))
        }

        fn accusation(&self, _table: &TableView<'_>, _me: &Player, _seat: usize) -> Option<CardTriple> {
            None
        }

        fn choose_card_to_show(
            &mut self,
            _table: &TableView<'_>,
            me: &mut Player,
            _seat: usize,
            _asker: usize,
            suspicion: &CardTriple,
        ) -> Option<Card> {
            me.showable(suspicion).first().copied()
        }

        fn on_cards_shown(
            &mut self,
            _table: &TableView<'_>,
            _me: &mut Player,
            _seat: usize,
            _suspicion: &CardTriple,
            _reveals: &[Reveal],
        ) {
        }
    }

    struct IdleFactory;

    impl StrategyFactory for IdleFactory {
        fn create(&self, difficulty: Difficulty, _: usize, _: usize, _: usize) -> Box<dyn AiStrategy> {
            Box::new(Idle(difficulty))
        }
    }

    #[derive(Default)]
    struct Silent;

    impl PresentationPort for Silent {
        fn prompt_setup(&mut self, _characters: &[String]) -> SetupChoice {
            SetupChoice::Cancel
        }

        fn prompt_move(&mut self, reachable: &PositionSet) -> Position {
            reachable.iter().next().copied().unwrap_or_default()
        }

        fn prompt_suspicion(&mut self, room: Card) -> CardTriple {
            CardTriple::new(room, Card::character(0), Card::weapon(0))
        }

        fn prompt_card_to_show(&mut self, _: usize, _: &CardTriple, showable: &[Card]) -> Option<Card> {
            showable.first().copied()
        }

        fn notify(&mut self, _event: &GameEvent) {}
    }

    fn engine(seed: u64) -> GameEngine<Silent> {
        let definition = GameConfig::classic()
            .expect("classic loads")
            .build()
            .expect("classic builds");
        let setup = GameSetup::human_against(&[Difficulty::Smart, Difficulty::Stupid, Difficulty::Normal])
            .with_seed(seed);
        GameEngine::new(definition, &setup, Box::new(IdleFactory), Silent).expect("engine")
    }

    #[test]
    fn captured_shape_uses_wire_names() {
        let engine = engine(5);
        let save = SaveGame::capture(&engine).expect("capture");
        assert_eq!(save.players.len(), 4);
        assert_eq!(save.players[0].name, "Miss Scarlett");
        assert_eq!(save.players[0].iq, "normal");
        assert_eq!(save.players[1].iq, "smart");
        assert_eq!(save.players[2].iq, "stupid");
        assert_eq!(save.players[0].room, CORRIDOR);
        assert_eq!(save.weapons.len(), 6);
        assert_eq!(save.notes[2].len(), 4);
        assert_eq!(save.notes[2][2].name, save.players[2].name);

        let json = save.to_json().expect("json");
        assert!(json.contains("\"persons\""));
        assert!(json.contains("\"memo\""));
        assert!(json.contains("\"own\""));
    }

    #[test]
    fn round_trip_restores_hands_notes_and_envelope() {
        let source = engine(11);
        let save = SaveGame::capture(&source).expect("capture");
        let json = save.to_json().expect("json");

        let mut target = engine(99);
        target.restore(&SaveGame::from_json(&json).expect("parse")).expect("restore");

        assert_eq!(target.envelope(), source.envelope());
        assert_eq!(target.weapon_rooms(), source.weapon_rooms());
        assert_eq!(target.current_seat(), 0);
        assert_eq!(target.phase(), &Phase::AwaitingHumanMove);
        assert_eq!(SaveGame::capture(&target).expect("capture"), save);
    }

    #[test]
    fn notes_survive_with_their_labels() {
        let source = engine(3);
        let mut save = SaveGame::capture(&source).expect("capture");
        save.notes[1][0].memo.rooms[2] = OtherNote::Seen.label().to_string();
        save.notes[1][1].memo.weapons[0] = SelfNote::ShownTwice.label().to_string();

        let mut target = engine(4);
        target.restore(&save).expect("restore");
        let notes = target.players()[1].notes();
        let room_column = target.deck().index_of(Card::room(2)).expect("column");
        let weapon_column = target.deck().index_of(Card::weapon(0)).expect("column");
        assert_eq!(notes.other(0, room_column), OtherNote::Seen);
        assert_eq!(notes.own_note(weapon_column), SelfNote::ShownTwice);
    }

    #[test]
    fn rejected_load_leaves_the_game_untouched() {
        let mut target = engine(21);
        let before = SaveGame::capture(&target).expect("capture");

        let mut bad_room = before.clone();
        bad_room.weapons[0].room = "Cellar".into();
        assert!(matches!(
            target.restore(&bad_room),
            Err(LoadError::UnknownRoom { name }) if name == "Cellar"
        ));

        let mut in_wall = before.clone();
        in_wall.players[1].position = Position::new(0, 0);
        assert!(matches!(target.restore(&in_wall), Err(LoadError::PlayerInWall { .. })));

        let mut short_notes = before.clone();
        short_notes.notes[0][1].memo.persons.pop();
        assert!(matches!(
            target.restore(&short_notes),
            Err(LoadError::NoteOthersLength { .. })
        ));

        let mut shared_card = before.clone();
        let stolen = shared_card.players[0].cards.persons.first().cloned();
        let stolen = stolen.or_else(|| shared_card.players[0].cards.weapons.first().cloned());
        if let Some(card) = stolen {
            shared_card.players[1].cards.persons.push(card);
            assert!(target.restore(&shared_card).is_err());
        }

        let mut requested_outside = before.clone();
        requested_outside.players[2].requested = true;
        assert!(matches!(
            target.restore(&requested_outside),
            Err(LoadError::RequestedButNotInRoom { .. })
        ));

        assert_eq!(SaveGame::capture(&target).expect("capture"), before);
        assert_eq!(target.phase(), &Phase::Ready);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(SaveGame::from_json("{\"players\": 3"), Err(LoadError::Malformed(_))));
    }
}
