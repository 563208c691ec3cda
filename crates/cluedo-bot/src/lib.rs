pub mod bot;
pub mod policy;

pub use bot::{BotFactory, OpenCards};
pub use policy::{NormalStrategy, SmartStrategy, StupidStrategy};
