use std::time::Instant;
use tracing::{debug, info};

use crate::core::game_state::{GamePhase, GameState, Input, Round};
use crate::core::geometry::Rect;
use crate::core::session::{ScoreChange, SessionRecord, SessionRules};
use crate::core::theme::{AssetTable, Theme};
use crate::core::GameEvent;

/// Physics and scoring constants for the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    pub session: SessionRules,
    pub screen_width: u32,
    pub screen_height: u32,
    pub jump_velocity: f32,
    /// Pixels the runner's feet must sink below the obstacle top to count as a landing.
    pub on_top_margin: i32,
    /// Frames between running animation steps.
    pub animation_period: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            session: SessionRules::default(),
            screen_width: 800,
            screen_height: 600,
            jump_velocity: -16.0,
            on_top_margin: 20,
            animation_period: 10,
        }
    }
}

enum FrameOutcome {
    Continue(Vec<GameEvent>),
    Collision(SessionRecord),
}

pub struct GameEngine {
    rules: Rules,
    assets: AssetTable,
    state: GameState,
}

impl GameEngine {
    pub fn new(rules: Rules, assets: AssetTable) -> Self {
        Self {
            rules,
            assets,
            state: GameState::Selecting,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn assets(&self) -> &AssetTable {
        &self.assets
    }

    pub fn theme(&self) -> Option<Theme> {
        self.state.theme()
    }

    /// Applies one input to the state machine and reports what happened.
    pub fn handle_input(&mut self, input: Input, now: Instant) -> Vec<GameEvent> {
        let state = std::mem::replace(&mut self.state, GameState::Selecting);
        let (next, events) = self.transition(state, input, now);
        self.state = next;
        events
    }

    fn transition(&self, state: GameState, input: Input, now: Instant) -> (GameState, Vec<GameEvent>) {
        match (state, input) {
            (GameState::Selecting, Input::SelectTheme(theme)) => {
                info!("Theme selected: {}", theme);
                let round = self.new_round(theme);
                (GameState::Starting(round), vec![GameEvent::ThemeSelected { theme }])
            }
            (GameState::Selecting, Input::Jump) => (GameState::Selecting, Vec::new()),
            (GameState::Starting(mut round), Input::Jump) => {
                round.session.start(now);
                info!("Run started ({}, session {})", round.theme, round.session.id);
                let event = GameEvent::RunStarted {
                    session_id: round.session.id,
                    theme: round.theme,
                };
                (GameState::Playing(round), vec![event])
            }
            (GameState::Playing(mut round), Input::Jump) => {
                round.session.jumps += 1;
                let accepted = round.runner.jump(self.rules.jump_velocity);
                let event = GameEvent::Jumped {
                    accepted,
                    total: round.session.jumps,
                };
                (GameState::Playing(round), vec![event])
            }
            (GameState::GameOver { round, .. }, Input::Jump) => {
                info!("Restarting game ({})", round.theme);
                let theme = round.theme;
                (GameState::Starting(self.new_round(theme)), vec![GameEvent::Reset { theme }])
            }
            (state @ (GameState::Starting(_) | GameState::Playing(_) | GameState::GameOver { .. }), Input::SelectTheme(_)) => {
                (state, Vec::new())
            }
        }
    }

    /// Advances the simulation by one frame. Only the playing state moves.
    pub fn update(&mut self, now: Instant) -> Vec<GameEvent> {
        let rules = self.rules;

        let outcome = {
            let GameState::Playing(round) = &mut self.state else {
                return Vec::new();
            };

            round
                .obstacle
                .update(round.session.level, round.session.speed, rules.screen_width);
            round.runner.update(round.session.gravity, rules.animation_period);

            let runner = round.runner.rect();
            let obstacle = round.obstacle.rect();

            if runner.overlaps(&obstacle) {
                FrameOutcome::Collision(round.session.record(round.theme, now))
            } else {
                let cleared = landed_on_top(&runner, &obstacle, rules.on_top_margin)
                    || obstacle.right() < runner.left();
                let events = match round.session.observe_clearance(cleared, &rules.session) {
                    Some(ScoreChange::Point { score }) => {
                        debug!("Score increased to {}", score);
                        vec![GameEvent::Scored { score }]
                    }
                    Some(ScoreChange::LevelUp { score, level, speed }) => {
                        info!("Level up: level {} speed {}", level, speed);
                        vec![GameEvent::Scored { score }, GameEvent::LevelUp { level, speed }]
                    }
                    None => Vec::new(),
                };
                FrameOutcome::Continue(events)
            }
        };

        match outcome {
            FrameOutcome::Continue(events) => events,
            FrameOutcome::Collision(record) => {
                info!(
                    "Game over: score {} level {} after {:.2}s",
                    record.score, record.level, record.time_played
                );
                let state = std::mem::replace(&mut self.state, GameState::Selecting);
                if let GameState::Playing(round) = state {
                    self.state = GameState::GameOver {
                        round,
                        record: record.clone(),
                    };
                }
                vec![GameEvent::GameOver { record }]
            }
        }
    }

    fn new_round(&self, theme: Theme) -> Round {
        Round::new(&self.assets[theme], &self.rules.session)
    }
}

/// Runner feet below the obstacle top (by more than `margin`) while the
/// horizontal ranges overlap.
pub fn landed_on_top(runner: &Rect, obstacle: &Rect, margin: i32) -> bool {
    obstacle.top() + margin < runner.bottom() && runner.overlaps_horizontally(obstacle)
}
