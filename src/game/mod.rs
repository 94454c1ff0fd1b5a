mod context;
mod game;
mod time;
pub use context::*;
pub use game::*;
pub use time::*;
