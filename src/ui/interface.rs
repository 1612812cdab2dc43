use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::{AssetTable, CompositeEventHandler, EventLogger, GameEngine, Input, Theme};
use crate::records::{ResultsLog, Summary};
use crate::ui::audio::BoxedAudio;
use crate::ui::game_loop::GameLoop;
use crate::ui::menu::{prompt_main_menu, MainMenuChoice};
use crate::ui::screen::Viewport;
use crate::ui::terminal::{terminal_size, Command, TerminalSession};
use crate::ui::{Display, StyleSheet};
use crate::utils::{GameError, GameResult};

/// Application shell: main menu, game runs and the statistics page.
pub struct GameInterface {
    assets: AssetTable,
    results: ResultsLog,
    display: Display,
    config: Config,
}

impl GameInterface {
    pub fn new(config: Config) -> GameResult<Self> {
        info!("Initializing game interface");

        config.ensure_directories()?;
        let assets = AssetTable::load(config.game.screen_width, config.game.screen_height)?;
        let display = Display::new(StyleSheet::new(&config.ui.accent), config.ui.columns as usize);

        Ok(Self {
            assets,
            results: ResultsLog::new(config.get_results_file()),
            display,
            config,
        })
    }

    pub async fn run(&mut self) -> GameResult<()> {
        info!("Starting game interface");

        loop {
            self.display.clear_screen().ok();
            self.show_game_title()?;

            let choice = match prompt_main_menu() {
                Ok(choice) => choice,
                Err(e) => {
                    error!("Main menu error: {}", e);
                    return Err(e);
                }
            };

            let result = match choice {
                MainMenuChoice::Play => self.play(None).await,
                MainMenuChoice::Statistics => self.statistics_page().await,
                MainMenuChoice::Exit => break,
            };

            if let Err(e) = result {
                error!("{:?} failed: {}", choice, e);
                self.display.show_error(&format!("An error occurred: {}", e)).ok();
                self.display.wait_for_enter().ok();
            }
        }

        self.display.show_message("Thank you for playing!", "success").ok();
        Ok(())
    }

    fn show_game_title(&self) -> GameResult<()> {
        self.display.show_title("🏃 Running to Reality")?;
        self.display.show_message(&format!("Version {}", crate::VERSION), "info")?;
        self.display
            .show_message(&format!("Results are saved to {}", self.results.path().display()), "info")?;
        println!();
        Ok(())
    }

    /// Plays in the terminal until the player quits. With `theme` set the
    /// in-game theme menu is skipped.
    pub async fn play(&mut self, theme: Option<Theme>) -> GameResult<()> {
        self.results.ensure_header().await?;

        let game_config = &self.config.game;
        let engine = GameEngine::new(game_config.rules(), self.assets.clone());

        let mut handlers = CompositeEventHandler::new();
        handlers.add_handler(EventLogger);

        let viewport = Viewport::new(
            self.config.ui.columns,
            self.config.ui.rows,
            game_config.screen_width,
            game_config.screen_height,
        );
        let mut game = GameLoop::new(
            engine,
            handlers,
            ResultsLog::new(self.results.path()),
            viewport,
            game_config.frame_duration(),
        )
        .with_hud(self.config.ui.show_hud)
        .with_audio(BoxedAudio::stdout(self.config.audio.enabled, self.config.audio.bell));

        game.fit_viewport(terminal_size()?)?;

        if let Some(theme) = theme {
            game.step(&[Command::Input(Input::SelectTheme(theme))], Instant::now())
                .await?;
        }

        let mut terminal = TerminalSession::enter()?;
        let outcome = game.run(&mut terminal).await;
        terminal.restore()?;
        let completed = outcome?;

        self.display.clear_screen().ok();
        match completed.last() {
            Some(record) => {
                self.display
                    .show_success(&format!("{} game(s) recorded this session.", completed.len()))?;
                self.display.show_record(record)?;
            }
            None => self.display.show_warning("No game was finished.")?,
        }
        self.display.wait_for_enter()?;
        Ok(())
    }

    async fn statistics_page(&mut self) -> GameResult<()> {
        self.display.clear_screen().ok();
        self.display.show_title("📊 Game Statistics")?;

        let summary = self.load_summary().await?;
        self.display.show_summary(&summary)?;
        println!();
        self.display.wait_for_enter()?;
        Ok(())
    }

    async fn load_summary(&self) -> GameResult<Summary> {
        let records = self.results.load_records().await?;
        if records.is_empty() {
            warn!("No results found in {:?}", self.results.path());
        }
        Ok(Summary::from_records(&records))
    }

    /// Prints the statistics summary without entering the menu.
    pub async fn print_statistics(&self, json: bool) -> GameResult<()> {
        let summary = self.load_summary().await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&summary).map_err(GameError::from)?);
        } else {
            self.display.show_summary(&summary)?;
        }
        Ok(())
    }
}
