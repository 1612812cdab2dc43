pub mod engine;
pub mod entities;
pub mod events;
pub mod game_state;
pub mod geometry;
pub mod session;
pub mod theme;

pub use engine::{GameEngine, Rules};
pub use entities::{Obstacle, Runner};
pub use events::{CompositeEventHandler, EventLogger, GameEvent, GameEventHandler};
pub use game_state::{GamePhase, GameState, Input, Round};
pub use geometry::Rect;
pub use session::{LevelingRule, Session, SessionRecord, SessionRules};
pub use theme::{AssetTable, Theme, ThemeAssets};
