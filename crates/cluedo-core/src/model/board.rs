use crate::model::position::Position;
use crate::model::room::Room;
use thiserror::Error;

const WALL_SYMBOL: char = '#';
const CORRIDOR_SYMBOL: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Corridor,
    /// Index into the board's room list.
    Room(usize),
}

impl Cell {
    pub const fn is_corridor(self) -> bool {
        matches!(self, Cell::Corridor)
    }

    pub const fn room(self) -> Option<usize> {
        match self {
            Cell::Room(index) => Some(index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected {expected} rows but found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown symbol {symbol:?} at {position}")]
    UnknownSymbol { symbol: char, position: Position },
    #[error("symbol {symbol:?} at {position} names room {index} but only {rooms} rooms exist")]
    UnknownRoom {
        symbol: char,
        position: Position,
        index: usize,
        rooms: usize,
    },
}

/// Static board: the cell grid plus the rooms it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    rooms: Vec<Room>,
}

impl Board {
    /// Parses `rows` where a blank is corridor, `#` is wall and a base-36 digit indexes `rooms`.
    pub fn from_rows<S: AsRef<str>>(
        width: usize,
        height: usize,
        rows: &[S],
        rooms: Vec<Room>,
    ) -> Result<Self, BoardError> {
        if rows.len() != height {
            return Err(BoardError::RowCount {
                expected: height,
                found: rows.len(),
            });
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let symbols: Vec<char> = row.as_ref().chars().collect();
            if symbols.len() != width {
                return Err(BoardError::RowWidth {
                    row: y,
                    expected: width,
                    found: symbols.len(),
                });
            }
            for (x, symbol) in symbols.into_iter().enumerate() {
                let position = Position::new(x as i32, y as i32);
                let cell = match symbol {
                    CORRIDOR_SYMBOL => Cell::Corridor,
                    WALL_SYMBOL => Cell::Wall,
                    other => {
                        let index = other
                            .to_digit(36)
                            .ok_or(BoardError::UnknownSymbol {
                                symbol: other,
                                position,
                            })? as usize;
                        if index >= rooms.len() {
                            return Err(BoardError::UnknownRoom {
                                symbol: other,
                                position,
                                index,
                                rooms: rooms.len(),
                            });
                        }
                        Cell::Room(index)
                    }
                };
                cells.push(cell);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
            rooms,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// `None` for coordinates outside the grid.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells
            .get(pos.y as usize * self.width + pos.x as usize)
            .copied()
    }

    pub fn is_corridor(&self, pos: Position) -> bool {
        matches!(self.cell(pos), Some(Cell::Corridor))
    }

    pub fn room_at(&self, pos: Position) -> Option<usize> {
        self.cell(pos).and_then(Cell::room)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    pub fn room_by_name(&self, name: &str) -> Option<usize> {
        self.rooms.iter().position(|room| room.name() == name)
    }

    /// Room whose door list contains `door`.
    pub fn room_with_door(&self, door: Position) -> Option<usize> {
        self.rooms.iter().position(|room| room.has_door(door))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Position::new(x as i32, y as i32))
        })
    }
}
