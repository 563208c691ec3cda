//! The three computer-player strengths. All of them share the open-card bookkeeping in
//! [`crate::bot`]; they differ in movement, in which cards they name and in which card they show.

mod normal;
mod smart;
mod stupid;

pub use normal::NormalStrategy;
pub use smart::SmartStrategy;
pub use stupid::StupidStrategy;

use cluedo_core::model::player::Difficulty;
use cluedo_core::model::triple::CardTriple;
use tracing::{Level, event};

fn log_suspicion(difficulty: Difficulty, seat: usize, suspicion: &CardTriple, reason: &str) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    event!(
        target: "cluedo_bot::suspicion",
        Level::DEBUG,
        seat,
        difficulty = %difficulty,
        suspicion = %suspicion,
        reason,
    );
}
