use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::core::theme::Theme;

/// When a score increment also raises the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelingRule {
    /// `score % 10 == 1`, except for the first point.
    #[default]
    Observed,
    /// Every tenth point.
    EveryTen,
}

impl LevelingRule {
    pub fn levels_up(self, score: u32) -> bool {
        match self {
            LevelingRule::Observed => score % 10 == 1 && score != 1,
            LevelingRule::EveryTen => score != 0 && score % 10 == 0,
        }
    }
}

/// Starting values and per-level increments for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionRules {
    pub start_level: u32,
    pub start_speed: u32,
    pub gravity: f32,
    pub gravity_step: f32,
    pub leveling: LevelingRule,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            start_level: 1,
            start_speed: 5,
            gravity: 0.4,
            gravity_step: 0.1,
            leveling: LevelingRule::Observed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreChange {
    Point { score: u32 },
    LevelUp { score: u32, level: u32, speed: u32 },
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub score: u32,
    pub level: u32,
    pub jumps: u32,
    pub speed: u32,
    pub gravity: f32,
    has_passed: bool,
    started_at: Option<Instant>,
}

impl Session {
    pub fn new(rules: &SessionRules) -> Self {
        Self {
            id: Uuid::new_v4(),
            score: 0,
            level: rules.start_level,
            jumps: 0,
            speed: rules.start_speed,
            gravity: rules.gravity,
            has_passed: false,
            started_at: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    pub fn has_passed(&self) -> bool {
        self.has_passed
    }

    /// Feeds this frame's "obstacle cleared" condition through the has-passed
    /// debounce. A point is awarded only on the frame the condition turns true.
    pub fn observe_clearance(&mut self, cleared: bool, rules: &SessionRules) -> Option<ScoreChange> {
        if !cleared {
            self.has_passed = false;
            return None;
        }
        if self.has_passed {
            return None;
        }

        self.has_passed = true;
        self.score += 1;

        if rules.leveling.levels_up(self.score) {
            self.level += 1;
            self.speed += 1;
            self.gravity += rules.gravity_step;
            return Some(ScoreChange::LevelUp {
                score: self.score,
                level: self.level,
                speed: self.speed,
            });
        }

        Some(ScoreChange::Point { score: self.score })
    }

    pub fn record(&self, theme: Theme, now: Instant) -> SessionRecord {
        SessionRecord {
            total_jump: self.jumps,
            score: self.score,
            level: self.level,
            time_played: round_to_hundredths(self.elapsed(now).as_secs_f64()),
            final_speed: self.speed,
            theme,
        }
    }
}

/// One row of the results log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub total_jump: u32,
    pub score: u32,
    pub level: u32,
    /// Seconds, rounded to two decimals.
    pub time_played: f64,
    pub final_speed: u32,
    pub theme: Theme,
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_times(session: &mut Session, rules: &SessionRules, points: u32) {
        for _ in 0..points {
            session.observe_clearance(true, rules);
            session.observe_clearance(false, rules);
        }
    }

    #[test]
    fn test_initial_values() {
        let session = Session::new(&SessionRules::default());
        assert_eq!(session.jumps, 0);
        assert_eq!(session.score, 0);
        assert_eq!(session.level, 1);
        assert_eq!(session.speed, 5);
        assert_eq!(session.gravity, 0.4);
        assert!(!session.has_passed());
    }

    #[test]
    fn test_debounce_scores_once_per_clearance() {
        let rules = SessionRules::default();
        let mut session = Session::new(&rules);

        assert_eq!(session.observe_clearance(true, &rules), Some(ScoreChange::Point { score: 1 }));
        for _ in 0..20 {
            assert_eq!(session.observe_clearance(true, &rules), None);
        }
        assert_eq!(session.score, 1);

        assert_eq!(session.observe_clearance(false, &rules), None);
        assert!(!session.has_passed());
        assert_eq!(session.observe_clearance(true, &rules), Some(ScoreChange::Point { score: 2 }));
    }

    #[test]
    fn test_observed_rule_levels_up_on_eleventh_point() {
        let rules = SessionRules::default();
        let mut session = Session::new(&rules);

        score_times(&mut session, &rules, 10);
        assert_eq!((session.level, session.speed), (1, 5));

        score_times(&mut session, &rules, 1);
        assert_eq!((session.score, session.level, session.speed), (11, 2, 6));
        assert!((session.gravity - 0.5).abs() < 1e-6);

        score_times(&mut session, &rules, 10);
        assert_eq!((session.score, session.level, session.speed), (21, 3, 7));
    }

    #[test]
    fn test_every_ten_rule_levels_up_on_tenth_point() {
        let rules = SessionRules {
            leveling: LevelingRule::EveryTen,
            ..SessionRules::default()
        };
        let mut session = Session::new(&rules);

        score_times(&mut session, &rules, 9);
        assert_eq!(session.level, 1);
        score_times(&mut session, &rules, 1);
        assert_eq!((session.score, session.level, session.speed), (10, 2, 6));
    }

    #[test]
    fn test_leveling_rule_table() {
        assert!(!LevelingRule::Observed.levels_up(1));
        assert!(LevelingRule::Observed.levels_up(11));
        assert!(!LevelingRule::Observed.levels_up(10));
        assert!(!LevelingRule::EveryTen.levels_up(0));
        assert!(LevelingRule::EveryTen.levels_up(20));
    }

    #[test]
    fn test_record_rounds_elapsed_time() {
        let rules = SessionRules::default();
        let mut session = Session::new(&rules);
        let start = Instant::now();
        session.start(start);
        session.jumps = 7;

        let record = session.record(Theme::EscapingT, start + Duration::from_millis(12_346));
        assert_eq!(record.total_jump, 7);
        assert_eq!(record.time_played, 12.35);
        assert_eq!(record.final_speed, 5);
        assert_eq!(record.theme, Theme::EscapingT);
    }

    #[test]
    fn test_elapsed_before_start_is_zero() {
        let session = Session::new(&SessionRules::default());
        assert_eq!(session.elapsed(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_round_to_hundredths() {
        assert_eq!(round_to_hundredths(3.14159), 3.14);
        assert_eq!(round_to_hundredths(2.0), 2.0);
        assert_eq!(round_to_hundredths(0.126), 0.13);
    }
}
