pub mod audio;
pub mod components;
pub mod game_loop;
pub mod interface;
pub mod menu;
pub mod screen;
pub mod terminal;
pub mod theme;

pub use audio::{AudioManager, BoxedAudio, SoundEffect};
pub use components::Display;
pub use game_loop::GameLoop;
pub use interface::GameInterface;
pub use screen::{compose, Canvas, Viewport};
pub use terminal::{Command, TerminalSession};
pub use theme::StyleSheet;
