use crate::model::board::{Board, Cell};
use crate::model::deck::Deck;
use crate::model::player::Character;
use crate::model::position::Position;
use crate::model::room::Room;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CLASSIC_BOARD: &str = include_str!("../../assets/classic.json");
const CLASSIC_LABEL: &str = "<classic>";
const INLINE_LABEL: &str = "<inline>";

/// Fewest characters a board must offer; a game needs at least three seats.
pub const MIN_CHARACTERS: usize = 3;

/// Static game description: characters, rooms, weapons and the cell grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub players: Vec<CharacterConfig>,
    pub rooms: Vec<RoomConfig>,
    pub weapons: Vec<String>,
    pub game_field: FieldConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterConfig {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    pub name: String,
    pub position: Position,
    pub doors: Vec<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_corridor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub game_field_width: usize,
    pub game_field_height: usize,
    pub game_field: Vec<String>,
}

/// Where a configuration comes from when a game is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Classic,
    Path(PathBuf),
    Json(String),
}

impl ConfigSource {
    pub fn load(&self) -> Result<GameConfig, ConfigError> {
        match self {
            ConfigSource::Classic => GameConfig::classic(),
            ConfigSource::Path(path) => GameConfig::from_path(path),
            ConfigSource::Json(json) => GameConfig::from_json(json),
        }
    }
}

/// Everything the engine needs from a validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDefinition {
    pub board: Board,
    pub deck: Deck,
    pub characters: Vec<Character>,
}

impl GameConfig {
    /// Load configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let cfg: GameConfig =
            serde_json::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::parse(json, INLINE_LABEL)
    }

    /// The bundled nine-room board.
    pub fn classic() -> Result<Self, ConfigError> {
        Self::parse(CLASSIC_BOARD, CLASSIC_LABEL)
    }

    fn parse(json: &str, label: &str) -> Result<Self, ConfigError> {
        let path = PathBuf::from(label);
        let cfg: GameConfig = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            source,
            path: path.clone(),
        })?;
        cfg.validate()
            .map_err(|source| ConfigError::Invalid { path, source })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.players.len() < MIN_CHARACTERS {
            return Err(invalid(
                "players",
                format!("at least {MIN_CHARACTERS} characters are required"),
            ));
        }
        if self.rooms.is_empty() {
            return Err(invalid("rooms", "at least one room is required"));
        }
        if self.weapons.is_empty() {
            return Err(invalid("weapons", "at least one weapon is required"));
        }
        unique_names("players", self.players.iter().map(|c| c.name.as_str()))?;
        unique_names("rooms", self.rooms.iter().map(|r| r.name.as_str()))?;
        unique_names("weapons", self.weapons.iter().map(String::as_str))?;

        let board = self.board()?;
        for (index, room) in self.rooms.iter().enumerate() {
            if board.room_at(room.position) != Some(index) {
                return Err(invalid(
                    format!("rooms[{}].position", room.name),
                    format!("center {} is not a cell of this room", room.position),
                ));
            }
            if room.doors.is_empty() {
                return Err(invalid(
                    format!("rooms[{}].doors", room.name),
                    "a room needs at least one door",
                ));
            }
            if let Some(door) = room.doors.iter().find(|door| !board.is_corridor(**door)) {
                return Err(invalid(
                    format!("rooms[{}].doors", room.name),
                    format!("door {door} is not a corridor cell"),
                ));
            }
            if let Some(target) = &room.secret_corridor {
                if target == &room.name {
                    return Err(invalid(
                        format!("rooms[{}].secretCorridor", room.name),
                        "a secret passage cannot lead back to its own room",
                    ));
                }
                if !self.rooms.iter().any(|candidate| &candidate.name == target) {
                    return Err(invalid(
                        format!("rooms[{}].secretCorridor", room.name),
                        format!("unknown room '{target}'"),
                    ));
                }
            }
        }

        for character in &self.players {
            match board.cell(character.position) {
                None | Some(Cell::Wall) => {
                    return Err(invalid(
                        format!("players[{}].position", character.name),
                        format!("start {} is outside the board or in a wall", character.position),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Builds the board, the deck (characters, weapons, rooms) and the characters at their starts.
    pub fn build(&self) -> Result<GameDefinition, ValidationError> {
        self.validate()?;
        let board = self.board()?;
        let deck = Deck::new(
            self.players.iter().map(|c| c.name.clone()).collect(),
            self.weapons.clone(),
            self.rooms.iter().map(|r| r.name.clone()).collect(),
        );
        let characters = self
            .players
            .iter()
            .map(|c| Character::new(c.name.clone(), c.position))
            .collect();
        Ok(GameDefinition {
            board,
            deck,
            characters,
        })
    }

    fn board(&self) -> Result<Board, ValidationError> {
        let rooms = self
            .rooms
            .iter()
            .map(|room| {
                let built = Room::new(room.name.clone(), room.position, room.doors.clone());
                match room
                    .secret_corridor
                    .as_ref()
                    .and_then(|target| self.rooms.iter().position(|r| &r.name == target))
                {
                    Some(target) => built.with_secret_passage(target),
                    None => built,
                }
            })
            .collect();
        let field = &self.game_field;
        Board::from_rows(
            field.game_field_width,
            field.game_field_height,
            &field.game_field,
            rooms,
        )
        .map_err(|err| invalid("gameField", err.to_string()))
    }
}

fn unique_names<'a>(
    field: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(invalid(field, "names must not be empty"));
        }
        if !seen.insert(name) {
            return Err(invalid(field, format!("'{name}' is defined more than once")));
        }
    }
    Ok(())
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.into(),
        message: message.into(),
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
