use cluedo_bot::BotFactory;
use cluedo_core::game::config::{GameConfig, GameDefinition};
use cluedo_core::game::engine::{GameEngine, GameResult};
use cluedo_core::game::port::{GameEvent, PresentationPort, SetupChoice};
use cluedo_core::game::serialization::SaveGame;
use cluedo_core::game::setup::GameSetup;
use cluedo_core::model::board::Cell;
use cluedo_core::model::card::Card;
use cluedo_core::model::player::Difficulty;
use cluedo_core::model::position::Position;
use cluedo_core::model::triple::CardTriple;
use cluedo_core::path::PositionSet;
use std::collections::BTreeSet;

/// Counts notifications; computer-only games never prompt.
#[derive(Default)]
struct Tally {
    suspicions: usize,
    moves: usize,
}

impl PresentationPort for Tally {
    fn prompt_setup(&mut self, _characters: &[String]) -> SetupChoice {
        SetupChoice::Cancel
    }

    fn prompt_move(&mut self, _reachable: &PositionSet) -> Position {
        panic!("no human seat")
    }

    fn prompt_suspicion(&mut self, _room: Card) -> CardTriple {
        panic!("no human seat")
    }

    fn prompt_card_to_show(&mut self, _declarant: usize, _suspicion: &CardTriple, showable: &[Card]) -> Option<Card> {
        showable.first().copied()
    }

    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::OthersSuspicionResult { .. } => self.suspicions += 1,
            GameEvent::CharacterMoved { .. } => self.moves += 1,
            _ => {}
        }
    }
}

fn classic() -> GameDefinition {
    GameConfig::classic()
        .expect("classic config")
        .build()
        .expect("classic board")
}

fn play(seed: u64, seats: &[Difficulty]) -> GameEngine<Tally> {
    let definition = classic();
    let setup = GameSetup::headless(seats).with_seed(seed).with_turn_limit(2_000);
    let mut engine = GameEngine::new(definition, &setup, Box::new(BotFactory::new()), Tally::default())
        .expect("engine");
    engine.run().expect("computer-only game runs to the end");
    engine
}

fn assert_table_consistent(engine: &GameEngine<Tally>) {
    let envelope = engine.envelope();
    let mut seen = BTreeSet::new();
    for player in engine.players() {
        for card in player.hand() {
            assert!(!envelope.contains(*card), "{card:?} is both dealt and hidden");
            assert!(seen.insert(*card), "{card:?} dealt twice");
        }
    }
    assert_eq!(seen.len() + 3, engine.deck().len());

    for character in engine.characters() {
        let cell = engine.board().cell(character.position()).expect("on the board");
        assert_ne!(cell, Cell::Wall);
    }
    let rooms = engine.board().rooms().len();
    assert!(engine.weapon_rooms().iter().all(|room| *room < rooms));
}

#[test]
fn mixed_tables_play_to_a_verdict() {
    let seats = [Difficulty::Smart, Difficulty::Normal, Difficulty::Stupid, Difficulty::Smart];
    let mut decided = 0;
    for seed in 1..=6 {
        let engine = play(seed, &seats);
        assert_table_consistent(&engine);
        assert!(engine.port().moves > 0);
        match engine.result().expect("finished") {
            GameResult::Won { accusation, .. } => {
                assert!(engine.envelope().matches(accusation));
                decided += 1;
            }
            GameResult::Lost {
                accusation, envelope, ..
            } => {
                assert!(!envelope.matches(accusation));
                assert_eq!(*envelope, engine.envelope());
                decided += 1;
            }
            GameResult::Abandoned { turns } => assert_eq!(*turns, 2_000),
        }
    }
    assert!(decided > 0, "every seeded game ran into the turn limit");
}

#[test]
fn same_seed_replays_the_same_game() {
    let seats = [Difficulty::Normal, Difficulty::Stupid, Difficulty::Smart];
    let first = play(42, &seats);
    let second = play(42, &seats);
    assert_eq!(first.result(), second.result());
    assert_eq!(first.turns(), second.turns());
    assert_eq!(first.port().suspicions, second.port().suspicions);
}

#[test]
fn finished_game_saves_and_loads() {
    let seats = [Difficulty::Smart, Difficulty::Smart, Difficulty::Normal];
    let finished = play(7, &seats);
    let json = SaveGame::capture(&finished)
        .expect("capture")
        .to_json().expect("serialize");

    let definition = classic();
    let setup = GameSetup::headless(&seats).with_seed(99);
    let mut fresh = GameEngine::new(definition, &setup, Box::new(BotFactory::new()), Tally::default())
        .expect("engine");
    fresh
        .restore(&SaveGame::from_json(&json).expect("parse"))
        .expect("restore");

    assert_eq!(fresh.envelope(), finished.envelope());
    for (restored, played) in fresh.players().iter().zip(finished.players()) {
        assert_eq!(restored.hand(), played.hand());
        assert_eq!(restored.notes().others(), played.notes().others());
    }
    assert!(!fresh.is_over());
}
