use super::config::{ConfigSource, GameDefinition};
use super::error::GameError;
use super::port::{GameEvent, Location, PresentationPort, SetupChoice};
use super::setup::{GameSetup, SetupError, SetupOutcome};
use super::strategy::{AiStrategy, Reveal, StrategyFactory, TableView};
use crate::belief::{Response, WitnessedSuspicion};
use crate::model::board::Board;
use crate::model::card::{Card, CardKind};
use crate::model::deck::Deck;
use crate::model::player::{Character, Player};
use crate::model::position::Position;
use crate::model::triple::{CardTriple, Envelope};
use crate::path::PositionSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameResult {
    Won {
        seat: usize,
        accusation: CardTriple,
    },
    Lost {
        seat: usize,
        accusation: CardTriple,
        envelope: Envelope,
    },
    /// The turn limit ran out before anyone accused.
    Abandoned { turns: u32 },
}

impl GameResult {
    pub fn winner(&self) -> Option<usize> {
        match self {
            GameResult::Won { seat, .. } => Some(*seat),
            _ => None,
        }
    }

    /// Seat that made the deciding accusation.
    pub fn accuser(&self) -> Option<usize> {
        match self {
            GameResult::Won { seat, .. } | GameResult::Lost { seat, .. } => Some(*seat),
            GameResult::Abandoned { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Dealt but no turn started yet.
    Ready,
    AwaitingHumanMove,
    AiTurnLoop,
    GameOver(GameResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// The turn passed without leaving the current cell.
    Stayed,
    /// Nothing changed; the human is asked again.
    Illegal,
}

enum HumanStep {
    SuspectInPlace(usize),
    EnterRoom(usize),
    Pass,
    Walk,
    Illegal,
}

/// Replacement state assembled by a validated load.
pub(super) struct RestoredState {
    pub characters: Vec<Character>,
    pub players: Vec<Player>,
    pub weapon_rooms: Vec<usize>,
    pub envelope: Envelope,
}

/// The turn state machine. Owns every piece of mutable game state.
pub struct GameEngine<P: PresentationPort> {
    board: Board,
    deck: Deck,
    characters: Vec<Character>,
    players: Vec<Player>,
    strategies: Vec<Option<Box<dyn AiStrategy>>>,
    factory: Box<dyn StrategyFactory>,
    weapon_rooms: Vec<usize>,
    envelope: Envelope,
    current: usize,
    dice: u8,
    phase: Phase,
    turns: u32,
    turn_limit: Option<u32>,
    rng: StdRng,
    port: P,
}

impl<P: PresentationPort> GameEngine<P> {
    /// Deals a fresh game. Seat `i` plays character `i`.
    pub fn new(
        definition: GameDefinition,
        setup: &GameSetup,
        factory: Box<dyn StrategyFactory>,
        port: P,
    ) -> Result<Self, SetupError> {
        let GameDefinition {
            board,
            deck,
            characters,
        } = definition;
        setup.validate(characters.len())?;
        if deck.count(CardKind::Character) != characters.len()
            || deck.count(CardKind::Room) != board.rooms().len()
        {
            return Err(SetupError::Deal);
        }

        let mut rng = match setup.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let count = setup.player_count();
        let deal = deck.deal(count, &mut rng).ok_or(SetupError::Deal)?;
        let players: Vec<Player> = deal
            .hands
            .into_iter()
            .zip(&setup.seats)
            .enumerate()
            .map(|(seat, (hand, difficulty))| {
                Player::new(
                    seat,
                    *difficulty,
                    hand,
                    |card| deck.index_of(card),
                    deck.len(),
                    count,
                )
            })
            .collect();
        let strategies = create_strategies(factory.as_ref(), &players, deck.len());

        let mut rooms: Vec<usize> = (0..board.rooms().len()).collect();
        rooms.shuffle(&mut rng);
        let weapon_rooms = (0..deck.count(CardKind::Weapon))
            .map(|weapon| rooms[weapon % rooms.len()])
            .collect();

        event!(
            target: "cluedo_core::engine",
            Level::DEBUG,
            players = count,
            seed = ?setup.seed,
            turn_limit = ?setup.turn_limit,
            "game dealt"
        );

        Ok(Self {
            board,
            deck,
            characters,
            players,
            strategies,
            factory,
            weapon_rooms,
            envelope: deal.envelope,
            current: 0,
            dice: 0,
            phase: Phase::Ready,
            turns: 0,
            turn_limit: setup.turn_limit,
            rng,
            port,
        })
    }

    /// Loads the configuration, asks the port for seats and deals. Cancelling is not an error.
    pub fn launch(
        source: &ConfigSource,
        factory: Box<dyn StrategyFactory>,
        mut port: P,
    ) -> SetupOutcome<Self> {
        let definition = match source.load() {
            Ok(cfg) => match cfg.build() {
                Ok(definition) => definition,
                Err(err) => return SetupOutcome::Fatal(SetupError::Invalid(err)),
            },
            Err(err) => return SetupOutcome::Fatal(SetupError::Config(err)),
        };
        let names: Vec<String> = definition
            .characters
            .iter()
            .map(|character| character.name().to_string())
            .collect();
        match port.prompt_setup(&names) {
            SetupChoice::Cancel => SetupOutcome::Cancelled,
            SetupChoice::Start(setup) => match Self::new(definition, &setup, factory, port) {
                Ok(engine) => SetupOutcome::Proceed(engine),
                Err(err) => SetupOutcome::Fatal(err),
            },
        }
    }

    /// Starts the first turn and plays computer seats until a human decision or the end.
    pub fn begin(&mut self) -> Result<(), GameError> {
        match self.phase {
            Phase::Ready => {}
            Phase::GameOver(_) => return Err(GameError::GameOver),
            _ => return Ok(()),
        }
        self.start_turn();
        self.run_ai_loop()
    }

    /// Rolls the dice for the current seat and presents a human's options.
    pub fn start_turn(&mut self) {
        if matches!(self.phase, Phase::GameOver(_)) {
            return;
        }
        let seat = self.current;
        self.dice = self.rng.gen_range(1..=6);
        self.port.notify(&GameEvent::TurnStarted { seat });
        self.port.notify(&GameEvent::DiceRolled {
            seat,
            value: self.dice,
        });
        event!(
            target: "cluedo_core::engine",
            Level::DEBUG,
            seat,
            dice = self.dice,
            turn = self.turns,
            "turn started"
        );

        if self.players[seat].is_ai() {
            self.phase = Phase::AiTurnLoop;
        } else {
            let cells = self.presented_cells();
            self.port.notify(&GameEvent::ReachableCells { seat, cells });
            self.phase = Phase::AwaitingHumanMove;
        }
    }

    /// Handles a human click on `target`.
    pub fn attempt_move(&mut self, target: Position) -> Result<MoveOutcome, GameError> {
        let seat = self.expect_human()?;
        let step = self.classify_human_step(seat, target);
        match step {
            HumanStep::SuspectInPlace(room) => {
                self.resolve_suspicion(room)?;
                self.finish_human_turn()?;
                Ok(MoveOutcome::Stayed)
            }
            HumanStep::EnterRoom(room) => {
                let center = self.room_center(room)?;
                self.move_current(center);
                self.resolve_suspicion(room)?;
                self.finish_human_turn()?;
                Ok(MoveOutcome::Moved)
            }
            HumanStep::Pass => {
                self.finish_human_turn()?;
                Ok(MoveOutcome::Stayed)
            }
            HumanStep::Walk => {
                self.move_current(target);
                self.finish_human_turn()?;
                Ok(MoveOutcome::Moved)
            }
            HumanStep::Illegal => {
                event!(
                    target: "cluedo_core::engine",
                    Level::DEBUG,
                    seat,
                    target = %target,
                    "illegal step"
                );
                self.port.notify(&GameEvent::IllegalMove { seat, target });
                Ok(MoveOutcome::Illegal)
            }
        }
    }

    /// Human accusation; ends the game either way.
    pub fn accuse(&mut self, accusation: CardTriple) -> Result<GameResult, GameError> {
        let seat = self.expect_human()?;
        if !self.is_known_triple(&accusation) {
            return Err(GameError::InvalidAccusation { accusation });
        }
        Ok(self.resolve_accusation(seat, accusation))
    }

    /// Plays the whole game, asking the port whenever a human decision is due.
    pub fn run(&mut self) -> Result<GameResult, GameError> {
        loop {
            match &self.phase {
                Phase::GameOver(result) => return Ok(result.clone()),
                Phase::Ready => self.begin()?,
                Phase::AiTurnLoop => self.run_ai_loop()?,
                Phase::AwaitingHumanMove => {
                    if let Some(accusation) = self.port.prompt_accusation() {
                        self.accuse(accusation)?;
                        continue;
                    }
                    let reachable = self.presented_cells();
                    let target = self.port.prompt_move(&reachable);
                    self.attempt_move(target)?;
                }
            }
        }
    }

    /// Clears the outgoing seat's request, advances round-robin and starts the next turn.
    pub fn next_turn(&mut self) {
        if matches!(self.phase, Phase::GameOver(_)) {
            return;
        }
        self.players[self.current].set_requested(false);
        self.current = (self.current + 1) % self.players.len();
        self.turns = self.turns.saturating_add(1);
        if let Some(limit) = self.turn_limit {
            if self.turns >= limit {
                let turns = self.turns;
                event!(
                    target: "cluedo_core::engine",
                    Level::INFO,
                    turns,
                    "turn limit reached"
                );
                self.port.notify(&GameEvent::GameAbandoned { turns });
                self.phase = Phase::GameOver(GameResult::Abandoned { turns });
                return;
            }
        }
        self.start_turn();
    }

    fn finish_human_turn(&mut self) -> Result<(), GameError> {
        self.next_turn();
        self.run_ai_loop()
    }

    fn classify_human_step(&self, seat: usize, target: Position) -> HumanStep {
        let table = self.table();
        let rules = table.move_rules(seat);
        let position = rules.position();
        let can_move = rules.can_move(self.dice);
        let steps = i32::from(self.dice);

        match self.board.room_at(target) {
            Some(room) => {
                let inside = rules.current_room() == Some(room);
                if !can_move && self.room_center(room) == Ok(position) {
                    HumanStep::SuspectInPlace(room)
                } else if rules.room_is_reachable(room, steps) && !inside {
                    HumanStep::EnterRoom(room)
                } else if inside && self.players[seat].requested() {
                    HumanStep::SuspectInPlace(room)
                } else {
                    HumanStep::Illegal
                }
            }
            None if !can_move && target == position => HumanStep::Pass,
            None if rules.is_corridor_reachable(target, steps, true) => HumanStep::Walk,
            None => HumanStep::Illegal,
        }
    }

    fn run_ai_loop(&mut self) -> Result<(), GameError> {
        while self.phase == Phase::AiTurnLoop {
            let seat = self.current;
            if self.try_ai_accusation(seat)? {
                break;
            }

            if self.players[seat].requested() {
                let position = self.seat_position(seat)?;
                let room = self
                    .board
                    .room_at(position)
                    .ok_or(GameError::RequestedButNotInRoom { seat, position })?;
                self.resolve_suspicion(room)?;
                if self.try_ai_accusation(seat)? {
                    break;
                }
            } else {
                let destination = {
                    let table = table_of(&self.board, &self.deck, &self.characters, &self.players);
                    let strategy = strategy_mut(&mut self.strategies, seat)?;
                    strategy.next_move(&table, &self.players[seat], seat, self.dice, &mut self.rng)
                };
                let entered = match destination {
                    Some(target) => {
                        if !self.valid_moves().contains(&target) {
                            return Err(GameError::IllegalAiMove { seat, target });
                        }
                        self.move_current(target);
                        self.board.room_at(target)
                    }
                    None => self.board.room_at(self.seat_position(seat)?),
                };
                if let Some(room) = entered {
                    self.resolve_suspicion(room)?;
                    if self.try_ai_accusation(seat)? {
                        break;
                    }
                }
            }
            self.next_turn();
        }
        Ok(())
    }

    fn try_ai_accusation(&mut self, seat: usize) -> Result<bool, GameError> {
        let accusation = {
            let table = table_of(&self.board, &self.deck, &self.characters, &self.players);
            let strategy = strategy_mut(&mut self.strategies, seat)?;
            strategy.accusation(&table, &self.players[seat], seat)
        };
        let Some(accusation) = accusation else {
            return Ok(false);
        };
        if !self.is_known_triple(&accusation) {
            return Err(GameError::InvalidAccusation { accusation });
        }
        self.resolve_accusation(seat, accusation);
        Ok(true)
    }

    fn resolve_accusation(&mut self, seat: usize, accusation: CardTriple) -> GameResult {
        let result = if self.envelope.matches(&accusation) {
            self.port.notify(&GameEvent::GameWon { seat, accusation });
            GameResult::Won { seat, accusation }
        } else {
            self.port.notify(&GameEvent::GameLost {
                seat,
                accusation,
                envelope: self.envelope,
            });
            GameResult::Lost {
                seat,
                accusation,
                envelope: self.envelope,
            }
        };
        event!(
            target: "cluedo_core::engine",
            Level::INFO,
            seat,
            accusation = %accusation,
            won = result.winner().is_some(),
            turns = self.turns,
            "accusation resolved"
        );
        self.phase = Phase::GameOver(result.clone());
        result
    }

    /// Runs a suspicion by the current seat in `room`: relocation, polling and bookkeeping.
    fn resolve_suspicion(&mut self, room: usize) -> Result<(), GameError> {
        let seat = self.current;
        let room_card = Card::room(room);
        let declarant_is_ai = self.players[seat].is_ai();
        let declared = if declarant_is_ai {
            let table = table_of(&self.board, &self.deck, &self.characters, &self.players);
            let strategy = strategy_mut(&mut self.strategies, seat)?;
            strategy.declare_suspicion(&table, &self.players[seat], seat, room_card)
        } else {
            self.port.prompt_suspicion(room_card)
        };
        let suspicion = CardTriple {
            room: Some(room_card),
            ..declared
        };
        let (Some(named), Some(weapon)) = (suspicion.character, suspicion.weapon) else {
            return Err(GameError::InvalidSuspicion { seat, suspicion });
        };
        if !self.is_known_triple(&suspicion) {
            return Err(GameError::InvalidSuspicion { seat, suspicion });
        }

        let center = self.room_center(room)?;
        if named.index != self.players[seat].character() {
            if let Some(character) = self.characters.get_mut(named.index) {
                character.set_position(center);
            }
            self.port.notify(&GameEvent::CharacterMoved {
                character: named.index,
                position: center,
                location: Location::Room(room),
            });
            if let Some(player) = self
                .players
                .iter_mut()
                .find(|player| player.character() == named.index)
            {
                player.set_requested(true);
            }
        }
        if let Some(slot) = self.weapon_rooms.get_mut(weapon.index) {
            *slot = room;
        }
        self.port.notify(&GameEvent::WeaponMoved {
            weapon: weapon.index,
            room,
        });
        if declarant_is_ai {
            self.port.notify(&GameEvent::SuspicionAnnounced { seat, suspicion });
        }

        let count = self.players.len();
        let mut reveals = Vec::with_capacity(count.saturating_sub(1));
        for offset in 1..count {
            let responder = (seat + offset) % count;
            let showable = self.players[responder].showable(&suspicion);
            let card = if self.players[responder].is_ai() {
                let table = table_of(&self.board, &self.deck, &self.characters, &self.players);
                let strategy = strategy_mut(&mut self.strategies, responder)?;
                strategy.choose_card_to_show(
                    &table,
                    &mut self.players[responder],
                    responder,
                    seat,
                    &suspicion,
                )
            } else if showable.is_empty() {
                None
            } else {
                self.port.prompt_card_to_show(seat, &suspicion, &showable)
            };
            let honest = match card {
                Some(card) => showable.contains(&card),
                None => showable.is_empty(),
            };
            if !honest {
                return Err(GameError::InvalidReveal {
                    seat: responder,
                    card,
                });
            }
            reveals.push(Reveal { responder, card });
        }

        if tracing::enabled!(Level::DEBUG) {
            let shown = reveals.iter().filter(|reveal| reveal.card.is_some()).count();
            event!(
                target: "cluedo_core::engine",
                Level::DEBUG,
                seat,
                suspicion = %suspicion,
                shown,
                polled = reveals.len(),
                "suspicion resolved"
            );
        }

        let responses: Vec<Response> = reveals.iter().map(Reveal::response).collect();
        let witnessed = WitnessedSuspicion::new(seat, suspicion, responses.clone());
        let table = table_of(&self.board, &self.deck, &self.characters, &self.players);
        if declarant_is_ai {
            strategy_mut(&mut self.strategies, seat)?.on_cards_shown(
                &table,
                &mut self.players[seat],
                seat,
                &suspicion,
                &reveals,
            );
        }
        for observer in 0..count {
            if observer == seat || !self.players[observer].is_ai() {
                continue;
            }
            strategy_mut(&mut self.strategies, observer)?.on_suspicion_witnessed(
                &table,
                &mut self.players[observer],
                observer,
                &witnessed,
            );
        }

        if declarant_is_ai {
            self.port.notify(&GameEvent::OthersSuspicionResult {
                declarant: seat,
                suspicion,
                responses,
            });
        } else {
            self.port
                .notify(&GameEvent::OwnSuspicionResult { suspicion, reveals });
        }
        Ok(())
    }

    fn move_current(&mut self, target: Position) {
        let character = self.players[self.current].character();
        if let Some(figure) = self.characters.get_mut(character) {
            figure.set_position(target);
        }
        let location = self
            .board
            .room_at(target)
            .map(Location::Room)
            .unwrap_or(Location::Corridor);
        self.port.notify(&GameEvent::CharacterMoved {
            character,
            position: target,
            location,
        });
    }

    fn expect_human(&self) -> Result<usize, GameError> {
        match self.phase {
            Phase::AwaitingHumanMove => Ok(self.current),
            Phase::GameOver(_) => Err(GameError::GameOver),
            Phase::Ready => Err(GameError::NotStarted),
            Phase::AiTurnLoop => Err(GameError::NotAwaitingHuman { seat: self.current }),
        }
    }

    /// Complete triple whose cards all exist in this deck.
    fn is_known_triple(&self, triple: &CardTriple) -> bool {
        let known = |card: Option<Card>, kind: CardKind| {
            card.is_some_and(|card| card.is(kind) && self.deck.index_of(card).is_some())
        };
        known(triple.room, CardKind::Room)
            && known(triple.character, CardKind::Character)
            && known(triple.weapon, CardKind::Weapon)
    }

    fn room_center(&self, room: usize) -> Result<Position, GameError> {
        self.board
            .room(room)
            .map(|room| room.center())
            .ok_or(GameError::UnknownRoom { room })
    }

    /// Legal destinations for the current seat and dice.
    pub fn valid_moves(&self) -> PositionSet {
        self.table().move_rules(self.current).valid_moves(self.dice)
    }

    /// What a human is shown: the legal moves, or only the own cell when stuck.
    pub fn presented_cells(&self) -> PositionSet {
        let mut cells = self.valid_moves();
        if cells.is_empty()
            && let Ok(position) = self.seat_position(self.current)
        {
            cells.insert(position);
        }
        cells
    }

    pub fn table(&self) -> TableView<'_> {
        table_of(&self.board, &self.deck, &self.characters, &self.players)
    }

    pub fn seat_position(&self, seat: usize) -> Result<Position, GameError> {
        self.players
            .get(seat)
            .and_then(|player| self.characters.get(player.character()))
            .map(Character::position)
            .ok_or(GameError::UnknownSeat { seat })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    pub fn current_seat(&self) -> usize {
        self.current
    }

    pub fn dice(&self) -> u8 {
        self.dice
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn result(&self) -> Option<&GameResult> {
        match &self.phase {
            Phase::GameOver(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.result().is_some()
    }

    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    /// Room index per weapon index.
    pub fn weapon_rooms(&self) -> &[usize] {
        &self.weapon_rooms
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    /// Swaps in a validated load; seat 0 moves first with a fresh roll.
    pub(super) fn install(&mut self, state: RestoredState) {
        let RestoredState {
            characters,
            players,
            weapon_rooms,
            envelope,
        } = state;
        self.strategies = create_strategies(self.factory.as_ref(), &players, self.deck.len());
        self.characters = characters;
        self.players = players;
        self.weapon_rooms = weapon_rooms;
        self.envelope = envelope;
        self.current = 0;
        self.turns = 0;
        self.phase = Phase::Ready;
        event!(
            target: "cluedo_core::engine",
            Level::INFO,
            players = self.players.len(),
            "game restored"
        );
        self.start_turn();
    }
}

fn table_of<'a>(
    board: &'a Board,
    deck: &'a Deck,
    characters: &[Character],
    players: &[Player],
) -> TableView<'a> {
    TableView::new(
        board,
        deck,
        characters.iter().map(Character::position).collect(),
        players.iter().map(Player::character).collect(),
    )
}

fn strategy_mut(
    strategies: &mut [Option<Box<dyn AiStrategy>>],
    seat: usize,
) -> Result<&mut Box<dyn AiStrategy>, GameError> {
    strategies
        .get_mut(seat)
        .and_then(Option::as_mut)
        .ok_or(GameError::MissingStrategy { seat })
}

fn create_strategies(
    factory: &dyn StrategyFactory,
    players: &[Player],
    card_count: usize,
) -> Vec<Option<Box<dyn AiStrategy>>> {
    players
        .iter()
        .enumerate()
        .map(|(seat, player)| {
            player
                .difficulty()
                .map(|difficulty| factory.create(difficulty, seat, players.len(), card_count))
        })
        .collect()
}
