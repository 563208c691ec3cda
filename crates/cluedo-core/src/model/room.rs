use crate::model::position::Position;

/// A room on the board. Players inside a room always stand on its center cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    name: String,
    center: Position,
    doors: Vec<Position>,
    secret_passage: Option<usize>,
}

impl Room {
    pub fn new(name: impl Into<String>, center: Position, doors: Vec<Position>) -> Self {
        Self {
            name: name.into(),
            center,
            doors,
            secret_passage: None,
        }
    }

    pub fn with_secret_passage(mut self, target: usize) -> Self {
        self.secret_passage = Some(target);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn center(&self) -> Position {
        self.center
    }

    /// Corridor cells in front of the room, in configuration order.
    pub fn doors(&self) -> &[Position] {
        &self.doors
    }

    pub fn has_door(&self, pos: Position) -> bool {
        self.doors.contains(&pos)
    }

    /// Index of the room a secret passage leads to.
    pub fn secret_passage(&self) -> Option<usize> {
        self.secret_passage
    }
}
