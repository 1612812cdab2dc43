use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{LevelingRule, Rules, SessionRules};
use crate::ui::screen::{MIN_COLUMNS, MIN_ROWS};
use crate::utils::{GameError, GameResult};

/// Prefix for environment overrides, e.g. `RUNNER__GAME__FPS=30`.
pub const ENV_PREFIX: &str = "RUNNER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub game: GameConfig,
    pub ui: UiConfig,
    pub audio: AudioConfig,
    pub paths: PathConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub fps: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub start_speed: u32,
    pub start_level: u32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub gravity_step: f32,
    pub on_top_margin: i32,
    pub animation_period: u64,
    pub leveling: LevelingRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Terminal cells the 800x600 canvas is scaled onto.
    pub columns: u16,
    pub rows: u16,
    pub accent: String,
    pub show_hud: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Ring the terminal bell for sound cues.
    pub bell: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub results_file: PathBuf,
    pub logs_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub log_to_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig {
                fps: 60,
                screen_width: 800,
                screen_height: 600,
                start_speed: 5,
                start_level: 1,
                jump_velocity: -16.0,
                gravity: 0.4,
                gravity_step: 0.1,
                on_top_margin: 20,
                animation_period: 10,
                leveling: LevelingRule::Observed,
            },
            ui: UiConfig {
                columns: 80,
                rows: 30,
                accent: "cyan".to_string(),
                show_hud: true,
            },
            audio: AudioConfig {
                enabled: true,
                bell: true,
            },
            paths: PathConfig {
                results_file: PathBuf::from("game_results.csv"),
                logs_dir: PathBuf::from("./logs"),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                log_to_file: true,
            },
        }
    }
}

impl GameConfig {
    pub fn rules(&self) -> Rules {
        Rules {
            session: SessionRules {
                start_level: self.start_level,
                start_speed: self.start_speed,
                gravity: self.gravity,
                gravity_step: self.gravity_step,
                leveling: self.leveling,
            },
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            jump_velocity: self.jump_velocity,
            on_top_margin: self.on_top_margin,
            animation_period: self.animation_period,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

impl Config {
    /// Reads a TOML config, writing the defaults there first when the file is absent.
    pub fn from_file<P: AsRef<Path>>(path: P) -> GameResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let defaults = Self::default();
            defaults.save_to_file(path)?;
            return Ok(defaults);
        }

        let raw = std::fs::read_to_string(path).map_err(|e| io_failure("read", path, e))?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> GameResult<()> {
        let path = path.as_ref();
        if let Some(dir) = non_empty_parent(path) {
            std::fs::create_dir_all(dir).map_err(|e| io_failure("create", dir, e))?;
        }

        let rendered = toml::to_string_pretty(self)
            .map_err(|e| GameError::configuration(format!("cannot render config as TOML: {e}")))?;
        std::fs::write(path, rendered).map_err(|e| io_failure("write", path, e))
    }

    /// Defaults, then the optional TOML file, then `RUNNER__SECTION__KEY` variables.
    pub fn load(path: Option<&Path>) -> GameResult<Self> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_logs_dir(&self) -> &Path {
        &self.paths.logs_dir
    }

    pub fn get_results_file(&self) -> &Path {
        &self.paths.results_file
    }

    pub fn ensure_directories(&self) -> GameResult<()> {
        let logs = Some(self.paths.logs_dir.as_path());
        for dir in [logs, non_empty_parent(&self.paths.results_file)].into_iter().flatten() {
            std::fs::create_dir_all(dir).map_err(|e| io_failure("create", dir, e))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> GameResult<()> {
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => return Err(GameError::configuration("Invalid logging level")),
        }

        if self.paths.results_file.as_os_str().is_empty() {
            return Err(GameError::configuration("Results file path cannot be empty"));
        }

        let game = &self.game;
        if game.fps == 0 || game.fps > 240 {
            return Err(GameError::configuration("FPS must be between 1 and 240"));
        }
        if game.screen_width == 0 || game.screen_height == 0 {
            return Err(GameError::configuration("Screen dimensions must be greater than 0"));
        }
        if game.start_level == 0 {
            return Err(GameError::configuration("Start level must be at least 1"));
        }
        if game.jump_velocity >= 0.0 {
            return Err(GameError::configuration("Jump velocity must be negative (upwards)"));
        }
        if game.gravity <= 0.0 || game.gravity_step < 0.0 {
            return Err(GameError::configuration("Gravity must be positive and its step non-negative"));
        }
        if game.animation_period == 0 {
            return Err(GameError::configuration("Animation period must be greater than 0"));
        }
        if self.ui.columns < MIN_COLUMNS || self.ui.rows < MIN_ROWS {
            return Err(GameError::configuration(format!(
                "Terminal grid must be at least {}x{}",
                MIN_COLUMNS, MIN_ROWS
            )));
        }

        Ok(())
    }

    pub fn merge_with_cli(&mut self, cli_config: CliConfig) {
        if let Some(results_file) = cli_config.results_file {
            self.paths.results_file = results_file;
        }
        if let Some(log_level) = cli_config.log_level {
            self.logging.level = log_level;
        }
        if cli_config.debug {
            self.logging.level = "debug".to_string();
        }
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

fn io_failure(action: &str, path: &Path, err: std::io::Error) -> GameError {
    GameError::configuration(format!("cannot {action} {}: {err}", path.display()))
}

/// Overrides taken from command-line flags, applied after the layered load.
#[derive(Debug, Default)]
pub struct CliConfig {
    pub results_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub debug: bool,
}
