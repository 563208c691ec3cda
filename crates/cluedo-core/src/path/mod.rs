//! Breadth-first movement over corridor cells.
//!
//! Only in-bounds corridor cells are walkable. Cells listed as blocked (other players' figures)
//! can neither be crossed nor entered. Position sets are ordered so that every search is
//! deterministic for a given board and occupancy.

use crate::model::board::Board;
use crate::model::position::Position;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

pub type PositionSet = BTreeSet<Position>;

pub struct Pathfinder<'a> {
    board: &'a Board,
    blocked: PositionSet,
}

impl<'a> Pathfinder<'a> {
    pub fn new(board: &'a Board, blocked: PositionSet) -> Self {
        Self { board, blocked }
    }

    pub fn board(&self) -> &'a Board {
        self.board
    }

    pub fn is_blocked(&self, pos: Position) -> bool {
        self.blocked.contains(&pos)
    }

    /// Walkable cells one step away from `pos`.
    pub fn neighbours(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbours(1)
            .into_iter()
            .filter(move |next| self.board.is_corridor(*next) && !self.blocked.contains(next))
    }

    /// Every walkable cell one step away from any cell in `from`.
    pub fn step(&self, from: &PositionSet) -> PositionSet {
        from.iter().flat_map(|pos| self.neighbours(*pos)).collect()
    }

    /// Cells reachable from `start` in up to `steps` moves, or in exactly `steps` moves when `exact`.
    ///
    /// The exact variant drops the previous frontier after every step, so a cell survives only if
    /// it was reached by the latest expansion. Non-positive `steps` return the start set itself.
    pub fn reachable_set(&self, start: &PositionSet, steps: i32, exact: bool) -> PositionSet {
        let mut working = start.clone();
        let mut last_step = working.clone();
        for _ in 0..steps.max(0) {
            let next = self.step(&working);
            working.extend(next);
            if exact {
                working.retain(|pos| !last_step.contains(pos));
                last_step = working.clone();
            }
        }
        working
    }

    pub fn is_reachable(&self, start: &PositionSet, target: Position, steps: i32, exact: bool) -> bool {
        self.reachable_set(start, steps, exact).contains(&target)
    }

    /// Shortest walk from `start` to the nearest cell of `destinations`, including `start`.
    ///
    /// `start` itself need not be walkable (doors in front of the mover's room are valid starts).
    pub fn shortest_path(&self, start: Position, destinations: &PositionSet) -> Option<Vec<Position>> {
        if destinations.is_empty() {
            return None;
        }

        let mut open = VecDeque::from([start]);
        let mut came_from: BTreeMap<Position, Option<Position>> = BTreeMap::new();
        came_from.insert(start, None);

        while let Some(current) = open.pop_front() {
            if destinations.contains(&current) {
                let mut path = vec![current];
                let mut cursor = came_from.get(&current).copied().flatten();
                while let Some(previous) = cursor {
                    path.push(previous);
                    cursor = came_from.get(&previous).copied().flatten();
                }
                path.reverse();
                return Some(path);
            }
            for next in self.neighbours(current) {
                if !came_from.contains_key(&next) {
                    came_from.insert(next, Some(current));
                    open.push_back(next);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::{Pathfinder, PositionSet};
    use crate::model::board::Board;
    use crate::model::position::Position;

    fn board(rows: &[&str]) -> Board {
        Board::from_rows(rows[0].len(), rows.len(), rows, Vec::new()).expect("board")
    }

    fn set(cells: &[(i32, i32)]) -> PositionSet {
        cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn step_filters_walls_and_bounds() {
        let board = board(&["   ", "###", "   "]);
        let finder = Pathfinder::new(&board, PositionSet::new());
        assert_eq!(finder.step(&set(&[(0, 0)])), set(&[(1, 0)]));
    }

    #[test]
    fn exact_reachability_on_open_row() {
        let board = board(&["     "]);
        let finder = Pathfinder::new(&board, PositionSet::new());
        let exact = finder.reachable_set(&set(&[(0, 0)]), 2, true);
        assert_eq!(exact, set(&[(0, 0), (2, 0)]));
        let upto = finder.reachable_set(&set(&[(0, 0)]), 2, false);
        assert_eq!(upto, set(&[(0, 0), (1, 0), (2, 0)]));
    }

    #[test]
    fn exact_reachability_can_return_to_start_parity() {
        let board = board(&["   ", "   "]);
        let finder = Pathfinder::new(&board, PositionSet::new());
        let exact = finder.reachable_set(&set(&[(0, 0)]), 2, true);
        assert!(exact.contains(&Position::new(0, 0)));
        assert!(exact.contains(&Position::new(1, 1)));
        assert!(exact.contains(&Position::new(2, 0)));
        assert!(!exact.contains(&Position::new(1, 0)));
    }

    #[test]
    fn walls_block_transit() {
        let board = board(&["   ", "###", "   "]);
        let finder = Pathfinder::new(&board, PositionSet::new());
        assert!(!finder.is_reachable(&set(&[(0, 0)]), Position::new(0, 2), 6, false));
    }

    #[test]
    fn corner_wall_prevents_odd_exact_distance() {
        let board = board(&["  ", "# "]);
        let finder = Pathfinder::new(&board, PositionSet::new());
        assert!(!finder.is_reachable(&set(&[(0, 0)]), Position::new(1, 1), 3, true));
        assert!(finder.is_reachable(&set(&[(0, 0)]), Position::new(1, 1), 2, true));
    }

    #[test]
    fn blocked_cells_are_not_entered() {
        let board = board(&["   ", "   ", "   "]);
        let finder = Pathfinder::new(&board, set(&[(1, 0), (1, 1), (1, 2)]));
        assert!(!finder.is_reachable(&set(&[(0, 0)]), Position::new(2, 0), 8, false));
        assert!(finder.shortest_path(Position::new(0, 0), &set(&[(2, 2)])).is_none());
    }

    #[test]
    fn shortest_path_includes_start_and_is_minimal() {
        let board = board(&["     ", " ### ", "     "]);
        let finder = Pathfinder::new(&board, PositionSet::new());
        let path = finder
            .shortest_path(Position::new(0, 0), &set(&[(4, 2)]))
            .expect("path");
        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(4, 2)));
        assert_eq!(path.len(), 7);
        for pair in path.windows(2) {
            let dx = (pair[0].x - pair[1].x).abs();
            let dy = (pair[0].y - pair[1].y).abs();
            assert_eq!(dx + dy, 1);
            assert!(board.is_corridor(pair[1]));
        }
    }

    #[test]
    fn shortest_path_detours_around_players() {
        let board = board(&["   ", "   ", "   "]);
        let finder = Pathfinder::new(&board, set(&[(1, 0)]));
        let path = finder
            .shortest_path(Position::new(0, 0), &set(&[(2, 0)]))
            .expect("path");
        assert_eq!(path.len(), 5);
        assert!(!path.contains(&Position::new(1, 0)));
    }

    #[test]
    fn shortest_path_without_destinations_is_none() {
        let board = board(&["  "]);
        let finder = Pathfinder::new(&board, PositionSet::new());
        assert!(finder.shortest_path(Position::new(0, 0), &PositionSet::new()).is_none());
        let path = finder
            .shortest_path(Position::new(0, 0), &set(&[(0, 0)]))
            .expect("trivial path");
        assert_eq!(path, vec![Position::new(0, 0)]);
    }
}
