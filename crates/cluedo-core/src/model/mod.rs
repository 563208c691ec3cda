pub mod board;
pub mod card;
pub mod deck;
pub mod notes;
pub mod player;
pub mod position;
pub mod room;
pub mod triple;
