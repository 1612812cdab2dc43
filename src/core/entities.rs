use serde::{Deserialize, Serialize};

use crate::core::geometry::Rect;
use crate::core::theme::{Size, Theme, ThemeAssets};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    pub x: f32,
    pub y: f32,
    pub ground_y: f32,
    pub velocity: f32,
    pub is_jumping: bool,
    pub frame_index: usize,
    pub frame_count: u64,
    pub size: Size,
    pub theme: Theme,
    frames: usize,
}

impl Runner {
    pub fn new(assets: &ThemeAssets) -> Self {
        let (x, y) = assets.runner_spawn;
        Self {
            x,
            y,
            ground_y: y,
            velocity: 0.0,
            is_jumping: false,
            frame_index: 0,
            frame_count: 0,
            size: assets.runner_size,
            theme: assets.theme,
            frames: assets.run_frames.len().max(1),
        }
    }

    /// Starts a jump. Returns false when already airborne.
    pub fn jump(&mut self, velocity: f32) -> bool {
        if self.is_jumping {
            return false;
        }
        self.is_jumping = true;
        self.velocity = velocity;
        true
    }

    /// Advances animation and, while airborne, the jump arc by one frame.
    pub fn update(&mut self, gravity: f32, animation_period: u64) {
        self.frame_count += 1;

        if !self.is_jumping {
            if animation_period > 0 && self.frame_count % animation_period == 0 {
                self.frame_index = (self.frame_index + 1) % self.frames;
            }
            return;
        }

        self.y += self.velocity;
        self.velocity += gravity;

        if self.y >= self.ground_y {
            self.y = self.ground_y;
            self.is_jumping = false;
            self.velocity = 0.0;
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.x, self.y, self.size.width, self.size.height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub size: Size,
    pub theme: Theme,
    /// Set on the frame the obstacle wrapped back to the right edge.
    pub wrapped: bool,
}

impl Obstacle {
    pub fn new(assets: &ThemeAssets) -> Self {
        let (x, y) = assets.obstacle_spawn;
        Self {
            x,
            y,
            size: assets.obstacle_size,
            theme: assets.theme,
            wrapped: false,
        }
    }

    pub fn update(&mut self, level: u32, speed: u32, screen_width: u32) {
        self.x -= (speed + level) as f32;
        self.wrapped = self.x < -(self.size.width as f32);
        if self.wrapped {
            self.x = screen_width as f32;
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.x, self.y, self.size.width, self.size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::AssetTable;
    use proptest::prelude::*;

    fn assets(theme: Theme) -> ThemeAssets {
        *AssetTable::load(800, 600).unwrap().get(theme)
    }

    #[test]
    fn test_runner_spawns_at_theme_coordinates() {
        let runner = Runner::new(&assets(Theme::EscapingT));
        assert_eq!((runner.x, runner.y), (20.0, 260.0));
        assert_eq!(runner.ground_y, 260.0);
        assert!(!runner.is_jumping);
    }

    #[test]
    fn test_no_double_jump() {
        let mut runner = Runner::new(&assets(Theme::EscapingF));
        assert!(runner.jump(-16.0));
        runner.update(0.4, 10);
        let velocity = runner.velocity;
        assert!(!runner.jump(-16.0));
        assert_eq!(runner.velocity, velocity);
    }

    #[test]
    fn test_jump_lands_and_resets() {
        let mut runner = Runner::new(&assets(Theme::EscapingF));
        runner.jump(-16.0);
        for _ in 0..200 {
            runner.update(0.4, 10);
        }
        assert!(!runner.is_jumping);
        assert_eq!(runner.y, runner.ground_y);
        assert_eq!(runner.velocity, 0.0);
        assert!(runner.jump(-16.0));
    }

    #[test]
    fn test_running_animation_cycles_frames() {
        let mut runner = Runner::new(&assets(Theme::EscapingF));
        for _ in 0..10 {
            runner.update(0.4, 10);
        }
        assert_eq!(runner.frame_index, 1);
        for _ in 0..10 {
            runner.update(0.4, 10);
        }
        assert_eq!(runner.frame_index, 0);

        let mut ghost = Runner::new(&assets(Theme::RescuingG));
        for _ in 0..30 {
            ghost.update(0.4, 10);
        }
        assert_eq!(ghost.frame_index, 0);
    }

    #[test]
    fn test_obstacle_wraps_to_screen_width() {
        let mut obstacle = Obstacle::new(&assets(Theme::EscapingF));
        let width = obstacle.size.width as f32;
        obstacle.x = 6.0 - width;

        // Exactly one width off screen still counts as visible.
        obstacle.update(1, 5, 800);
        assert!(!obstacle.wrapped);
        assert_eq!(obstacle.x, -width);

        obstacle.update(1, 5, 800);
        assert!(obstacle.wrapped);
        assert_eq!(obstacle.x, 800.0);

        obstacle.update(1, 5, 800);
        assert!(!obstacle.wrapped);
        assert_eq!(obstacle.x, 794.0);
    }

    proptest! {
        #[test]
        fn jump_arc_is_single_parabola(gravity in 0.1f32..2.0, spawn in 0usize..3) {
            let mut runner = Runner::new(&assets(Theme::ALL[spawn]));
            runner.jump(-16.0);

            let mut previous = runner.y;
            let mut descending = false;
            while runner.is_jumping {
                runner.update(gravity, 10);
                prop_assert!(runner.y <= runner.ground_y);
                if runner.y > previous {
                    descending = true;
                } else if descending {
                    prop_assert!(runner.y >= previous, "rose again after descending");
                }
                previous = runner.y;
            }
            prop_assert_eq!(runner.y, runner.ground_y);
        }

        #[test]
        fn obstacle_moves_by_speed_plus_level(speed in 1u32..30, level in 1u32..30, frames in 1usize..400) {
            let mut obstacle = Obstacle::new(&assets(Theme::EscapingF));
            let step = (speed + level) as f32;
            for _ in 0..frames {
                let before = obstacle.x;
                obstacle.update(level, speed, 800);
                if obstacle.wrapped {
                    prop_assert!(before - step < -(obstacle.size.width as f32));
                    prop_assert_eq!(obstacle.x, 800.0);
                } else {
                    prop_assert_eq!(obstacle.x, before - step);
                }
            }
        }
    }
}
