use crate::model::board::Board;
use crate::model::position::Position;
use crate::path::{Pathfinder, PositionSet};

/// Legal-move computation for one mover against a fixed occupancy.
///
/// Corridor transit is blocked only by other players' figures. Doors count as open only while no
/// other character at all stands on them.
pub struct MoveRules<'a> {
    finder: Pathfinder<'a>,
    position: Position,
    occupied: PositionSet,
}

impl<'a> MoveRules<'a> {
    pub fn new(
        board: &'a Board,
        position: Position,
        other_players: PositionSet,
        other_characters: PositionSet,
    ) -> Self {
        Self {
            finder: Pathfinder::new(board, other_players),
            position,
            occupied: other_characters,
        }
    }

    pub fn board(&self) -> &'a Board {
        self.finder.board()
    }

    pub fn pathfinder(&self) -> &Pathfinder<'a> {
        &self.finder
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn current_room(&self) -> Option<usize> {
        self.board().room_at(self.position)
    }

    /// Start cells for corridor movement and the steps left once standing on them. Leaving a room
    /// spends one step to reach a door.
    fn start(&self, steps: i32) -> (PositionSet, i32) {
        match self.current_room().and_then(|room| self.board().room(room)) {
            Some(room) => {
                let doors = room
                    .doors()
                    .iter()
                    .copied()
                    .filter(|door| !self.finder.is_blocked(*door))
                    .collect();
                (doors, steps - 1)
            }
            None => (PositionSet::from([self.position]), steps),
        }
    }

    pub fn corridor_moves(&self, steps: i32, exact: bool) -> PositionSet {
        let (start, steps) = self.start(steps);
        self.finder.reachable_set(&start, steps, exact)
    }

    pub fn is_corridor_reachable(&self, target: Position, steps: i32, exact: bool) -> bool {
        self.corridor_moves(steps, exact).contains(&target)
    }

    /// True through a secret passage from the current room regardless of `steps`, otherwise when any
    /// door of `room` is corridor-reachable keeping one step for the threshold.
    pub fn room_is_reachable(&self, room: usize, steps: i32) -> bool {
        let secret = self
            .current_room()
            .and_then(|current| self.board().room(current))
            .and_then(|current| current.secret_passage());
        if secret == Some(room) {
            return true;
        }
        let Some(target) = self.board().room(room) else {
            return false;
        };
        let reachable = self.corridor_moves(steps - 1, false);
        target.doors().iter().any(|door| reachable.contains(door))
    }

    /// Exact-distance corridor cells plus the center of every other room in reach.
    pub fn valid_moves(&self, dice: u8) -> PositionSet {
        let steps = i32::from(dice);
        let mut moves = self.corridor_moves(steps, true);
        let current = self.current_room();
        for (index, room) in self.board().rooms().iter().enumerate() {
            if Some(index) != current && self.room_is_reachable(index, steps) {
                moves.insert(room.center());
            }
        }
        moves
    }

    pub fn can_move(&self, dice: u8) -> bool {
        !self.valid_moves(dice).is_empty()
    }

    /// Doors of `room` no other character stands on.
    pub fn open_doors(&self, room: usize) -> PositionSet {
        self.board()
            .room(room)
            .map(|room| {
                room.doors()
                    .iter()
                    .copied()
                    .filter(|door| !self.occupied.contains(door))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Shortest corridor walk towards any cell of `destinations`, listing only the cells stepped on.
    ///
    /// From inside a room every open door of that room is tried as the first step; from the
    /// corridor the mover's own cell is dropped from the walk.
    pub fn route(&self, destinations: &PositionSet) -> Option<Vec<Position>> {
        match self.current_room() {
            Some(room) => self
                .open_doors(room)
                .into_iter()
                .filter_map(|door| self.finder.shortest_path(door, destinations))
                .min_by_key(Vec::len),
            None => self
                .finder
                .shortest_path(self.position, destinations)
                .map(|mut path| {
                    path.remove(0);
                    path
                }),
        }
    }

    /// Walk to the nearest open door of `room`.
    pub fn path_to_room(&self, room: usize) -> Option<Vec<Position>> {
        self.route(&self.open_doors(room))
    }

    /// Walk to whichever of `rooms` has the nearest open door, together with that room.
    pub fn nearest_room_path(&self, rooms: &[usize]) -> Option<(usize, Vec<Position>)> {
        let doors: PositionSet = rooms.iter().flat_map(|room| self.open_doors(*room)).collect();
        let path = self.route(&doors)?;
        let end = path.last().copied().unwrap_or(self.position);
        let room = rooms.iter().copied().find(|room| {
            self.board()
                .room(*room)
                .is_some_and(|candidate| candidate.has_door(end))
        })?;
        Some((room, path))
    }
}

#[cfg(test)]
mod tests {
    use super::MoveRules;
    use crate::model::board::Board;
    use crate::model::position::Position;
    use crate::model::room::Room;
    use crate::path::PositionSet;

    fn set(cells: &[(i32, i32)]) -> PositionSet {
        cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    fn single_room_board() -> Board {
        let rooms = vec![Room::new("Den", Position::new(0, 0), vec![Position::new(2, 1)])];
        Board::from_rows(3, 3, &["0  ", "   ", "   "], rooms).expect("board")
    }

    /// Two rooms in opposite corners joined by a secret passage, one corridor between them.
    fn two_room_board() -> Board {
        let rooms = vec![
            Room::new("Den", Position::new(0, 0), vec![Position::new(2, 0), Position::new(0, 2)])
                .with_secret_passage(1),
            Room::new("Attic", Position::new(6, 4), vec![Position::new(4, 4)]),
        ];
        Board::from_rows(
            7,
            5,
            &["00     ", "00     ", "       ", "     11", "     11"],
            rooms,
        )
        .expect("board")
    }

    #[test]
    fn leaving_a_room_spends_a_step_on_the_door() {
        let board = single_room_board();
        let rules = MoveRules::new(&board, Position::new(0, 0), PositionSet::new(), PositionSet::new());
        assert_eq!(rules.valid_moves(2), set(&[(2, 0), (1, 1), (2, 2)]));
        assert_eq!(rules.corridor_moves(1, true), set(&[(2, 1)]));
    }

    #[test]
    fn secret_passage_ignores_dice() {
        let board = two_room_board();
        let rules = MoveRules::new(&board, Position::new(0, 0), PositionSet::new(), PositionSet::new());
        assert!(rules.room_is_reachable(1, 1));
        assert!(rules.valid_moves(1).contains(&Position::new(6, 4)));
        assert!(!rules.valid_moves(1).contains(&Position::new(0, 0)));
    }

    #[test]
    fn room_entry_needs_one_step_past_the_door() {
        let board = two_room_board();
        // from (4, 2) the Attic door at (4, 4) is two steps away
        let rules = MoveRules::new(&board, Position::new(4, 2), PositionSet::new(), PositionSet::new());
        assert!(!rules.room_is_reachable(1, 2));
        assert!(rules.room_is_reachable(1, 3));
        assert!(rules.room_is_reachable(1, 6));
    }

    #[test]
    fn other_players_block_doors_and_transit() {
        let board = single_room_board();
        let blocked = set(&[(2, 1)]);
        let rules = MoveRules::new(&board, Position::new(0, 0), blocked.clone(), blocked);
        assert!(rules.valid_moves(3).is_empty());
        assert!(!rules.can_move(3));
    }

    #[test]
    fn non_player_characters_close_doors_but_not_corridors() {
        let board = two_room_board();
        let rules = MoveRules::new(
            &board,
            Position::new(2, 2),
            PositionSet::new(),
            set(&[(2, 0)]),
        );
        assert_eq!(rules.open_doors(0), set(&[(0, 2)]));
        assert!(rules.is_corridor_reachable(Position::new(2, 0), 2, true));
    }

    #[test]
    fn route_from_corridor_drops_the_start_cell() {
        let board = two_room_board();
        let rules = MoveRules::new(&board, Position::new(4, 2), PositionSet::new(), PositionSet::new());
        let path = rules.path_to_room(1).expect("path");
        assert_eq!(path, vec![Position::new(4, 3), Position::new(4, 4)]);
    }

    #[test]
    fn route_from_room_starts_on_the_best_door() {
        let board = two_room_board();
        let rules = MoveRules::new(&board, Position::new(0, 0), PositionSet::new(), PositionSet::new());
        let path = rules.path_to_room(1).expect("path");
        assert_eq!(path.len(), 7);
        assert_eq!(path.last(), Some(&Position::new(4, 4)));
        assert!(path[0] == Position::new(2, 0) || path[0] == Position::new(0, 2));
    }

    #[test]
    fn nearest_room_reports_the_target() {
        let board = two_room_board();
        let rules = MoveRules::new(&board, Position::new(2, 2), PositionSet::new(), PositionSet::new());
        let (room, path) = rules.nearest_room_path(&[0, 1]).expect("path");
        assert_eq!(room, 0);
        assert_eq!(path.len(), 2);
        assert!(rules.nearest_room_path(&[]).is_none());
    }
}
