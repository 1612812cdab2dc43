//! Game themes and their asset table.
//!
//! Every theme owns one [`ThemeAssets`] entry. The table is an array indexed
//! by [`Theme::index`], so a lookup can never miss once the table has been
//! validated by [`AssetTable::load`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::utils::{GameError, GameResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "Escaping F")]
    EscapingF,
    #[serde(rename = "Escaping T")]
    EscapingT,
    #[serde(rename = "Rescuing G")]
    RescuingG,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::EscapingF, Theme::EscapingT, Theme::RescuingG];

    pub fn index(self) -> usize {
        match self {
            Theme::EscapingF => 0,
            Theme::EscapingT => 1,
            Theme::RescuingG => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Theme> {
        Self::ALL.get(index).copied()
    }

    /// Stable id written to the results log.
    pub fn id(self) -> &'static str {
        match self {
            Theme::EscapingF => "Escaping F",
            Theme::EscapingT => "Escaping T",
            Theme::RescuingG => "Rescuing G",
        }
    }

    /// Accepts the log id (case-insensitive) or a 1-based menu number.
    pub fn from_id(id: &str) -> GameResult<Theme> {
        let wanted = id.trim();
        if let Ok(number) = wanted.parse::<usize>() {
            return number
                .checked_sub(1)
                .and_then(Theme::from_index)
                .ok_or_else(|| GameError::theme(wanted));
        }

        Self::ALL
            .into_iter()
            .find(|theme| theme.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GameError::theme(wanted))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Theme {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::from_id(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Width and height of a sprite in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub sky: Rgb,
    pub ground: Rgb,
    pub runner: Rgb,
    pub obstacle: Rgb,
    pub text: Rgb,
}

/// Everything a theme binds: spawn points, sprite sizes, glyphs, colors and
/// narrative text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeAssets {
    pub theme: Theme,
    pub starting_text: &'static str,
    pub ending_text: &'static str,
    pub runner_spawn: (f32, f32),
    pub runner_size: Size,
    pub obstacle_spawn: (f32, f32),
    pub obstacle_size: Size,
    /// Glyphs cycled while the runner is on the ground. Every glyph is
    /// printable ASCII so it fills exactly one terminal cell.
    pub run_frames: &'static [char],
    pub jump_glyph: char,
    pub obstacle_glyph: char,
    pub palette: Palette,
}

const BUILTIN_ASSETS: [ThemeAssets; 3] = [
    ThemeAssets {
        theme: Theme::EscapingF,
        starting_text: "Escaping F Grade With Me",
        ending_text: "Sorry, it not enough to pass the exam!",
        runner_spawn: (20.0, 220.0),
        runner_size: Size::new(64, 100),
        obstacle_spawn: (700.0, 260.0),
        obstacle_size: Size::new(56, 60),
        run_frames: &['@', '&'],
        jump_glyph: '^',
        obstacle_glyph: 'F',
        palette: Palette {
            sky: Rgb(135, 206, 235),
            ground: Rgb(110, 80, 50),
            runner: Rgb(30, 30, 120),
            obstacle: Rgb(200, 40, 40),
            text: Rgb(0, 0, 0),
        },
    },
    ThemeAssets {
        theme: Theme::EscapingT,
        starting_text: "Escaping time with me",
        ending_text: "There is no time left!",
        runner_spawn: (20.0, 260.0),
        runner_size: Size::new(64, 100),
        obstacle_spawn: (700.0, 330.0),
        obstacle_size: Size::new(56, 30),
        run_frames: &['@', '&'],
        jump_glyph: '^',
        obstacle_glyph: 'T',
        palette: Palette {
            sky: Rgb(250, 220, 170),
            ground: Rgb(120, 90, 60),
            runner: Rgb(40, 40, 40),
            obstacle: Rgb(180, 120, 20),
            text: Rgb(0, 0, 0),
        },
    },
    ThemeAssets {
        theme: Theme::RescuingG,
        starting_text: "Escaping trap with me",
        ending_text: "You got trapped!",
        runner_spawn: (20.0, 220.0),
        runner_size: Size::new(70, 80),
        obstacle_spawn: (700.0, 240.0),
        obstacle_size: Size::new(56, 60),
        run_frames: &['%'],
        jump_glyph: '%',
        obstacle_glyph: '#',
        palette: Palette {
            sky: Rgb(40, 30, 60),
            ground: Rgb(70, 60, 90),
            runner: Rgb(230, 230, 250),
            obstacle: Rgb(120, 200, 120),
            text: Rgb(200, 255, 255),
        },
    },
];

#[derive(Debug, Clone)]
pub struct AssetTable {
    entries: [ThemeAssets; 3],
}

impl AssetTable {
    /// Loads the built-in table and validates it against the canvas size.
    pub fn load(screen_width: u32, screen_height: u32) -> GameResult<Self> {
        Self::from_entries(BUILTIN_ASSETS, screen_width, screen_height)
    }

    pub fn from_entries(entries: [ThemeAssets; 3], screen_width: u32, screen_height: u32) -> GameResult<Self> {
        for (index, assets) in entries.iter().enumerate() {
            validate_entry(index, assets, screen_width as f32, screen_height as f32)?;
        }
        Ok(Self { entries })
    }

    pub fn get(&self, theme: Theme) -> &ThemeAssets {
        &self.entries[theme.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThemeAssets> {
        self.entries.iter()
    }
}

impl Index<Theme> for AssetTable {
    type Output = ThemeAssets;

    fn index(&self, theme: Theme) -> &Self::Output {
        self.get(theme)
    }
}

fn validate_entry(index: usize, assets: &ThemeAssets, width: f32, height: f32) -> GameResult<()> {
    let id = assets.theme.id();

    if assets.theme.index() != index {
        return Err(GameError::asset(format!("entry {} is bound to theme '{}'", index, id)));
    }
    if assets.run_frames.is_empty() {
        return Err(GameError::asset(format!("theme '{}' has no running frames", id)));
    }
    let mut glyphs = assets.run_frames.iter().chain([&assets.jump_glyph, &assets.obstacle_glyph]);
    if let Some(glyph) = glyphs.find(|g| !g.is_ascii_graphic()) {
        return Err(GameError::asset(format!(
            "theme '{}' glyph {:?} is not a single-cell ASCII character",
            id, glyph
        )));
    }

    let sprites = [
        ("runner", assets.runner_spawn, assets.runner_size),
        ("obstacle", assets.obstacle_spawn, assets.obstacle_size),
    ];
    for (name, (x, y), size) in sprites {
        if size.width == 0 || size.height == 0 {
            return Err(GameError::asset(format!("theme '{}' {} has an empty sprite", id, name)));
        }
        if x < 0.0 || y < 0.0 || x + size.width as f32 > width || y + size.height as f32 > height {
            return Err(GameError::asset(format!(
                "theme '{}' {} spawns outside the {}x{} canvas",
                id, name, width, height
            )));
        }
    }

    let runner_right = assets.runner_spawn.0 + assets.runner_size.width as f32;
    if assets.obstacle_spawn.0 <= runner_right {
        return Err(GameError::asset(format!(
            "theme '{}' obstacle spawns on top of the runner",
            id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_ids_round_trip() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_id(theme.id()).unwrap(), theme);
            assert_eq!(Theme::from_index(theme.index()), Some(theme));
        }
    }

    #[test]
    fn test_theme_from_menu_number_and_case() {
        assert_eq!(Theme::from_id("1").unwrap(), Theme::EscapingF);
        assert_eq!(Theme::from_id("3").unwrap(), Theme::RescuingG);
        assert_eq!("escaping t".parse::<Theme>().unwrap(), Theme::EscapingT);
        assert!(Theme::from_id("0").is_err());
        assert!(Theme::from_id("4").is_err());
        assert!(Theme::from_id("Escaping Z").is_err());
    }

    #[test]
    fn test_theme_serializes_as_id() {
        let json = serde_json::to_string(&Theme::RescuingG).unwrap();
        assert_eq!(json, "\"Rescuing G\"");
    }

    #[test]
    fn test_builtin_table_is_valid() {
        let table = AssetTable::load(800, 600).unwrap();
        for theme in Theme::ALL {
            assert_eq!(table[theme].theme, theme);
        }
        assert_eq!(table[Theme::EscapingT].runner_spawn, (20.0, 260.0));
        assert_eq!(table[Theme::RescuingG].obstacle_spawn, (700.0, 240.0));
        assert_eq!(table.iter().count(), 3);
    }

    #[test]
    fn test_ground_lines_up_per_theme() {
        let table = AssetTable::load(800, 600).unwrap();
        for assets in table.iter() {
            let runner_bottom = assets.runner_spawn.1 + assets.runner_size.height as f32;
            let obstacle_bottom = assets.obstacle_spawn.1 + assets.obstacle_size.height as f32;
            assert_eq!(runner_bottom, obstacle_bottom, "{}", assets.theme);
        }
    }

    #[test]
    fn test_validation_rejects_small_canvas() {
        assert!(matches!(AssetTable::load(600, 600), Err(GameError::Asset { .. })));
    }

    #[test]
    fn test_validation_rejects_misordered_entries() {
        let mut entries = BUILTIN_ASSETS;
        entries.swap(0, 1);
        assert!(AssetTable::from_entries(entries, 800, 600).is_err());
    }

    #[test]
    fn test_validation_rejects_wide_glyphs() {
        for glyph in ['◷', '█', ' '] {
            let mut entries = BUILTIN_ASSETS;
            entries[1].obstacle_glyph = glyph;
            assert!(
                matches!(AssetTable::from_entries(entries, 800, 600), Err(GameError::Asset { .. })),
                "{:?} accepted",
                glyph
            );
        }
    }

    #[test]
    fn test_validation_rejects_missing_frames() {
        let mut entries = BUILTIN_ASSETS;
        entries[2].run_frames = &[];
        assert!(AssetTable::from_entries(entries, 800, 600).is_err());
    }
}
