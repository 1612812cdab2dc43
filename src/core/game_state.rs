use serde::{Deserialize, Serialize};

use crate::core::entities::{Obstacle, Runner};
use crate::core::session::{Session, SessionRecord, SessionRules};
use crate::core::theme::{Theme, ThemeAssets};

/// Coarse state tag, used by presentation and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Selecting,
    Starting,
    Playing,
    GameOver,
}

/// Inputs that drive the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    SelectTheme(Theme),
    Jump,
}

/// Entities and counters for one play-through.
#[derive(Debug, Clone)]
pub struct Round {
    pub theme: Theme,
    pub runner: Runner,
    pub obstacle: Obstacle,
    pub session: Session,
}

impl Round {
    pub fn new(assets: &ThemeAssets, rules: &SessionRules) -> Self {
        Self {
            theme: assets.theme,
            runner: Runner::new(assets),
            obstacle: Obstacle::new(assets),
            session: Session::new(rules),
        }
    }
}

#[derive(Debug, Clone)]
pub enum GameState {
    Selecting,
    Starting(Round),
    Playing(Round),
    GameOver { round: Round, record: SessionRecord },
}

impl GameState {
    pub fn phase(&self) -> GamePhase {
        match self {
            GameState::Selecting => GamePhase::Selecting,
            GameState::Starting(_) => GamePhase::Starting,
            GameState::Playing(_) => GamePhase::Playing,
            GameState::GameOver { .. } => GamePhase::GameOver,
        }
    }

    pub fn round(&self) -> Option<&Round> {
        match self {
            GameState::Selecting => None,
            GameState::Starting(round) | GameState::Playing(round) => Some(round),
            GameState::GameOver { round, .. } => Some(round),
        }
    }

    pub fn round_mut(&mut self) -> Option<&mut Round> {
        match self {
            GameState::Selecting => None,
            GameState::Starting(round) | GameState::Playing(round) => Some(round),
            GameState::GameOver { round, .. } => Some(round),
        }
    }

    pub fn theme(&self) -> Option<Theme> {
        self.round().map(|round| round.theme)
    }

    pub fn last_record(&self) -> Option<&SessionRecord> {
        match self {
            GameState::GameOver { record, .. } => Some(record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::AssetTable;

    #[test]
    fn test_round_creation() {
        let table = AssetTable::load(800, 600).unwrap();
        let round = Round::new(&table[Theme::RescuingG], &SessionRules::default());

        assert_eq!(round.theme, Theme::RescuingG);
        assert_eq!(round.runner.theme, Theme::RescuingG);
        assert_eq!(round.obstacle.x, 700.0);
        assert_eq!(round.session.score, 0);
    }

    #[test]
    fn test_phase_and_round_access() {
        let table = AssetTable::load(800, 600).unwrap();
        let round = Round::new(&table[Theme::EscapingF], &SessionRules::default());

        let selecting = GameState::Selecting;
        assert_eq!(selecting.phase(), GamePhase::Selecting);
        assert!(selecting.round().is_none());
        assert!(selecting.theme().is_none());

        let mut playing = GameState::Playing(round);
        assert_eq!(playing.phase(), GamePhase::Playing);
        assert_eq!(playing.theme(), Some(Theme::EscapingF));
        playing.round_mut().unwrap().session.score = 4;
        assert_eq!(playing.round().unwrap().session.score, 4);
        assert!(playing.last_record().is_none());
    }
}
