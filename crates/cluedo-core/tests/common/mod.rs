#![allow(dead_code)]

use cluedo_core::belief::WitnessedSuspicion;
use cluedo_core::game::config::{GameConfig, GameDefinition};
use cluedo_core::game::port::{GameEvent, PresentationPort, SetupChoice};
use cluedo_core::game::strategy::{AiStrategy, Reveal, StrategyFactory, TableView};
use cluedo_core::model::card::Card;
use cluedo_core::model::player::{Difficulty, Player};
use cluedo_core::model::position::Position;
use cluedo_core::model::triple::CardTriple;
use cluedo_core::path::PositionSet;
use rand::RngCore;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Den (center 0,0) has a secret passage to the Attic (center 4,0). Red starts in the Den.
pub const MANOR: &str = r##"{
  "players": [
    {"name": "Red", "position": {"x": 0, "y": 0}},
    {"name": "Blue", "position": {"x": 4, "y": 2}},
    {"name": "Green", "position": {"x": 2, "y": 4}},
    {"name": "White", "position": {"x": 0, "y": 4}}
  ],
  "rooms": [
    {"name": "Den", "position": {"x": 0, "y": 0}, "doors": [{"x": 2, "y": 0}], "secretCorridor": "Attic"},
    {"name": "Attic", "position": {"x": 4, "y": 0}, "doors": [{"x": 4, "y": 1}]}
  ],
  "weapons": ["Rope", "Vase"],
  "gameField": {
    "gameFieldWidth": 5,
    "gameFieldHeight": 5,
    "gameField": ["00 11", "0    ", "     ", " ### ", "     "]
  }
}"##;

pub const DEN: Position = Position { x: 0, y: 0 };
pub const ATTIC: Position = Position { x: 4, y: 0 };

pub fn manor() -> GameDefinition {
    GameConfig::from_json(MANOR)
        .expect("manor parses")
        .build()
        .expect("manor builds")
}

pub type Journal = Arc<Mutex<Vec<String>>>;

/// What a scripted computer seat does on every call.
#[derive(Clone, Default)]
pub struct Plan {
    pub moves: Vec<Position>,
    /// Character and weapon index to name; defaults to the first of each.
    pub suspect: Option<(usize, usize)>,
    pub accusation: Arc<Mutex<Option<CardTriple>>>,
    /// Answer every poll with this card instead of a legal one.
    pub forced_reveal: Option<Card>,
}

pub struct Scripted {
    seat: usize,
    plan: Plan,
    moves: VecDeque<Position>,
    journal: Journal,
}

impl AiStrategy for Scripted {
    fn difficulty(&self) -> Difficulty {
        Difficulty::Normal
    }

    fn next_move(
        &mut self,
        _table: &TableView<'_>,
        _me: &Player,
        _seat: usize,
        _dice: u8,
        _rng: &mut dyn RngCore,
    ) -> Option<Position> {
        self.moves.pop_front()
    }

    fn declare_suspicion(&mut self, _table: &TableView<'_>, _me: &Player, _seat: usize, room: Card) -> CardTriple {
        let (character, weapon) = self.plan.suspect.unwrap_or((0, 0));
        CardTriple::new(room, Card::character(character), Card::weapon(weapon))
    }

    fn accusation(&self, _table: &TableView<'_>, _me: &Player, _seat: usize) -> Option<CardTriple> {
        *self.plan.accusation.lock().expect("plan lock")
    }

    fn choose_card_to_show(
        &mut self,
        _table: &TableView<'_>,
        me: &mut Player,
        _seat: usize,
        _asker: usize,
        suspicion: &CardTriple,
    ) -> Option<Card> {
        self.plan
            .forced_reveal
            .or_else(|| me.showable(suspicion).first().copied())
    }

    fn on_cards_shown(
        &mut self,
        _table: &TableView<'_>,
        _me: &mut Player,
        _seat: usize,
        _suspicion: &CardTriple,
        reveals: &[Reveal],
    ) {
        let polled: Vec<String> = reveals.iter().map(|r| r.responder.to_string()).collect();
        self.note(format!("{} polled {}", self.seat, polled.join(",")));
    }

    fn on_suspicion_witnessed(
        &mut self,
        _table: &TableView<'_>,
        _me: &mut Player,
        _seat: usize,
        witnessed: &WitnessedSuspicion,
    ) {
        self.note(format!("{} witnessed {}", self.seat, witnessed.declarant));
    }
}

impl Scripted {
    fn note(&self, line: String) {
        self.journal.lock().expect("journal lock").push(line);
    }
}

#[derive(Default)]
pub struct ScriptedFactory {
    pub plans: Vec<Plan>,
    pub journal: Journal,
}

impl ScriptedFactory {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self {
            plans,
            journal: Journal::default(),
        }
    }
}

impl StrategyFactory for ScriptedFactory {
    fn create(&self, _difficulty: Difficulty, seat: usize, _: usize, _: usize) -> Box<dyn AiStrategy> {
        let plan = self.plans.get(seat).cloned().unwrap_or_default();
        Box::new(Scripted {
            seat,
            moves: plan.moves.iter().copied().collect(),
            plan,
            journal: Arc::clone(&self.journal),
        })
    }
}

/// Port that records every notification and answers prompts from a script.
#[derive(Default)]
pub struct RecordingPort {
    pub events: Vec<GameEvent>,
    pub setup: Option<SetupChoice>,
    pub moves: VecDeque<Position>,
    pub suspect: Option<(usize, usize)>,
    pub accusation: Option<CardTriple>,
    pub setup_prompts: usize,
}

impl RecordingPort {
    pub fn count(&self, matches: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|event| matches(event)).count()
    }
}

impl PresentationPort for RecordingPort {
    fn prompt_setup(&mut self, _characters: &[String]) -> SetupChoice {
        self.setup_prompts += 1;
        self.setup.take().unwrap_or(SetupChoice::Cancel)
    }

    fn prompt_move(&mut self, reachable: &PositionSet) -> Position {
        self.moves
            .pop_front()
            .or_else(|| reachable.iter().next().copied())
            .unwrap_or_default()
    }

    fn prompt_suspicion(&mut self, room: Card) -> CardTriple {
        let (character, weapon) = self.suspect.unwrap_or((1, 0));
        CardTriple::new(room, Card::character(character), Card::weapon(weapon))
    }

    fn prompt_card_to_show(&mut self, _declarant: usize, _suspicion: &CardTriple, showable: &[Card]) -> Option<Card> {
        showable.first().copied()
    }

    fn prompt_accusation(&mut self) -> Option<CardTriple> {
        self.accusation.take()
    }

    fn notify(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}
