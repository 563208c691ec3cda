//! Headless tournament harness for the computer players.
//!
//! This crate is composed of:
//! - `config`: the YAML run description and its validation.
//! - `logging`: JSON telemetry through a non-blocking file writer.
//! - `tournament`: the game loop, JSONL rows and the Markdown standings.

pub mod config;
pub mod logging;
pub mod tournament;
