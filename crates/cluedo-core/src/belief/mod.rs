//! Hard-constraint card ownership inference used by the strongest computer opponent.
//!
//! This module is composed of:
//! - `matrix`: the tri-state ownership grid (`BeliefMatrix`) and its row-closure rule.
//! - `history`: the log of witnessed suspicions (`WitnessedSuspicion`, `Response`).
//! - `deduction`: note updates driven by a witnessed suspicion and the single-sweep history replay.

mod deduction;
mod history;
mod matrix;

pub use deduction::{attribute_remaining_card, deduce, note_non_responders};
pub use history::{Response, WitnessedSuspicion};
pub use matrix::{BeliefMatrix, Knowledge};
