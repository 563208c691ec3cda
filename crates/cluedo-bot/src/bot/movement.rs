use cluedo_core::game::strategy::TableView;
use cluedo_core::model::position::Position;
use cluedo_core::model::room::Room;
use rand::RngCore;
use rand::seq::SliceRandom;
use tracing::{Level, event};

/// Walks towards the nearest open room other than the current one, corridors only.
///
/// Without any route to an open room a random other room becomes the target. The chosen cell is
/// pulled back along the route until it is a legal move; `None` means stay.
pub fn corridor_move(
    table: &TableView<'_>,
    seat: usize,
    open_rooms: &[usize],
    dice: u8,
    rng: &mut dyn RngCore,
) -> Option<Position> {
    let board = table.board();
    let rules = table.move_rules(seat);
    let current = rules.current_room();
    let targets: Vec<usize> = open_rooms
        .iter()
        .copied()
        .filter(|room| Some(*room) != current)
        .collect();

    let (room, path) = match rules.nearest_room_path(&targets) {
        Some(found) => found,
        None => {
            let others: Vec<usize> = (0..board.rooms().len())
                .filter(|room| Some(*room) != current)
                .collect();
            let room = *others.choose(rng)?;
            (room, rules.path_to_room(room)?)
        }
    };

    let steps = usize::from(dice);
    let target = if steps > path.len() {
        board.room(room).map(Room::center)?
    } else {
        path[steps.checked_sub(1)?]
    };

    let legal = rules.valid_moves(dice);
    let chosen = if legal.contains(&target) {
        Some(target)
    } else {
        path[..steps.min(path.len())]
            .iter()
            .rev()
            .find(|cell| legal.contains(*cell))
            .copied()
    };
    log_move(seat, room, path.len(), dice, chosen);
    chosen
}

/// Takes the current room's secret passage when it leads to an open room, otherwise walks.
pub fn passage_or_corridor_move(
    table: &TableView<'_>,
    seat: usize,
    open_rooms: &[usize],
    dice: u8,
    rng: &mut dyn RngCore,
) -> Option<Position> {
    let board = table.board();
    let passage = table
        .seat_room(seat)
        .and_then(|room| board.room(room))
        .and_then(Room::secret_passage)
        .filter(|target| open_rooms.contains(target));
    if let Some(target) = passage {
        let center = board.room(target).map(Room::center);
        if center.is_some() {
            log_move(seat, target, 0, dice, center);
            return center;
        }
    }
    corridor_move(table, seat, open_rooms, dice, rng)
}

fn log_move(seat: usize, room: usize, distance: usize, dice: u8, chosen: Option<Position>) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let chosen = chosen
        .map(|position| position.to_string())
        .unwrap_or_else(|| "stay".to_string());
    event!(
        target: "cluedo_bot::movement",
        Level::DEBUG,
        seat,
        room,
        distance,
        dice,
        chosen = %chosen,
    );
}

#[cfg(test)]
mod tests {
    use super::{corridor_move, passage_or_corridor_move};
    use cluedo_core::game::strategy::TableView;
    use cluedo_core::model::board::Board;
    use cluedo_core::model::deck::Deck;
    use cluedo_core::model::position::Position;
    use cluedo_core::model::room::Room;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    // Den (0,0) with door (2,0) and a passage to the Attic (4,0), door (4,1)
    fn board() -> Board {
        let rooms = vec![
            Room::new("Den", Position::new(0, 0), vec![Position::new(2, 0)]).with_secret_passage(1),
            Room::new("Attic", Position::new(4, 0), vec![Position::new(4, 1)]),
        ];
        Board::from_rows(5, 5, &["00 11", "0    ", "     ", " ### ", "     "], rooms).expect("board")
    }

    fn deck() -> Deck {
        Deck::new(
            vec!["Red".into(), "Blue".into(), "Green".into()],
            vec!["Rope".into()],
            vec!["Den".into(), "Attic".into()],
        )
    }

    #[test]
    fn short_roll_stops_on_the_route() {
        let board = board();
        let deck = deck();
        // Red at (2,4), route to the Attic door (4,1) is five steps
        let positions = vec![Position::new(2, 4), Position::new(0, 0), Position::new(0, 0)];
        let table = TableView::new(&board, &deck, positions, vec![0, 1, 2]);
        let mut rng = StdRng::seed_from_u64(1);

        let step = corridor_move(&table, 0, &[1], 2, &mut rng).expect("move");
        assert!(table.move_rules(0).valid_moves(2).contains(&step));
        assert_eq!(table.board().room_at(step), None);

        let arrive = corridor_move(&table, 0, &[1], 6, &mut rng).expect("move");
        assert_eq!(arrive, Position::new(4, 0));
    }

    #[test]
    fn passage_beats_walking_only_for_open_rooms() {
        let board = board();
        let deck = deck();
        let positions = vec![Position::new(0, 0), Position::new(2, 4), Position::new(0, 4)];
        let table = TableView::new(&board, &deck, positions, vec![0, 1, 2]);
        let mut rng = StdRng::seed_from_u64(2);

        assert_eq!(
            passage_or_corridor_move(&table, 0, &[1], 1, &mut rng),
            Some(Position::new(4, 0))
        );
        // nothing open elsewhere: a random other room, walked towards on foot
        let walked = passage_or_corridor_move(&table, 0, &[0], 1, &mut rng).expect("move");
        assert_eq!(walked, Position::new(2, 0));
    }
}
