use dialoguer::Select;

use crate::utils::{GameError, GameResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuChoice {
    Play,
    Statistics,
    Exit,
}

impl MainMenuChoice {
    pub const ALL: [MainMenuChoice; 3] = [MainMenuChoice::Play, MainMenuChoice::Statistics, MainMenuChoice::Exit];

    pub fn label(self) -> &'static str {
        match self {
            MainMenuChoice::Play => "🎮 Play Game",
            MainMenuChoice::Statistics => "📊 Statistics",
            MainMenuChoice::Exit => "🚪 Exit",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

pub fn prompt_main_menu() -> GameResult<MainMenuChoice> {
    let labels: Vec<&str> = MainMenuChoice::ALL.iter().map(|choice| choice.label()).collect();

    let selection = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| GameError::terminal(format!("Menu selection error: {}", e)))?;

    MainMenuChoice::from_index(selection)
        .ok_or_else(|| GameError::terminal(format!("Unknown menu entry {}", selection)))
}
