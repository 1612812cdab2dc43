pub mod config;
pub mod core;
pub mod records;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use core::{GameEngine, GameState, SessionRecord, Theme};
pub use records::{ResultsLog, Summary};
pub use ui::GameInterface;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
