//! Turn orchestration for a game of deduction.
//!
//! This module is composed of:
//! - `config`: the static board/deck description and its validation.
//! - `moves`: legal-move computation for the seat whose turn it is.
//! - `strategy`: the seam computer players plug into (`AiStrategy`, `StrategyFactory`).
//! - `port`: the presentation boundary used for human decisions and notifications.
//! - `setup`: seat selection and launcher outcomes.
//! - `engine`: the turn state machine with suspicion and accusation resolution.
//! - `serialization`: the save-state contract.
//! - `error`: invariant and load failures.

pub mod config;
pub mod engine;
pub mod error;
pub mod moves;
pub mod port;
pub mod serialization;
pub mod setup;
pub mod strategy;
