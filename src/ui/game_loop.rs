use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{field, info, info_span, warn, Instrument, Span};

use crate::core::{CompositeEventHandler, GameEngine, GameEvent, GameEventHandler, SessionRecord};
use crate::records::ResultsLog;
use crate::ui::audio::BoxedAudio;
use crate::ui::screen::{compose, draw_mute_badge, Viewport};
use crate::ui::terminal::{Command, TerminalSession};
use crate::utils::GameResult;

/// Result of one loop iteration.
#[derive(Debug, Default)]
pub struct StepOutcome {
    pub quit: bool,
    pub completed: Vec<SessionRecord>,
}

pub struct GameLoop {
    engine: GameEngine,
    handlers: CompositeEventHandler,
    audio: Option<BoxedAudio>,
    results: ResultsLog,
    /// Configured grid; `viewport` is this shrunk to the current terminal.
    preferred: Viewport,
    viewport: Viewport,
    hud: bool,
    frame: Duration,
}

impl GameLoop {
    pub fn new(
        engine: GameEngine,
        handlers: CompositeEventHandler,
        results: ResultsLog,
        viewport: Viewport,
        frame: Duration,
    ) -> Self {
        Self {
            engine,
            handlers,
            audio: None,
            results,
            preferred: viewport,
            viewport,
            hud: true,
            frame,
        }
    }

    pub fn with_hud(mut self, hud: bool) -> Self {
        self.hud = hud;
        self
    }

    /// Sound cues follow the other handlers and can be muted from the keyboard.
    pub fn with_audio(mut self, audio: BoxedAudio) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Fits the grid to a `(columns, rows)` terminal, failing when it is too small to play in.
    pub fn fit_viewport(&mut self, terminal: (u16, u16)) -> GameResult<()> {
        self.viewport = self.preferred.fit_to(terminal)?;
        Ok(())
    }

    fn resize(&mut self, terminal: (u16, u16)) {
        self.viewport = match self.preferred.fit_to(terminal) {
            Ok(viewport) => viewport,
            Err(e) => {
                warn!("{}", e);
                self.preferred.clamped_to(terminal)
            }
        };
        info!(columns = self.viewport.columns, rows = self.viewport.rows, "Viewport resized");
    }

    pub fn is_muted(&self) -> bool {
        self.audio.as_ref().is_some_and(|audio| audio.is_muted())
    }

    /// Runs until the player quits. Returns every session completed meanwhile.
    pub async fn run(&mut self, terminal: &mut TerminalSession) -> GameResult<Vec<SessionRecord>> {
        let mut ticker = interval(self.frame.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut completed = Vec::new();
        loop {
            let commands = terminal.poll_commands(&self.viewport)?;
            let outcome = self.step(&commands, Instant::now()).await?;
            completed.extend(outcome.completed);
            if outcome.quit {
                info!(sessions = completed.len(), "Leaving game loop");
                break;
            }

            let mut canvas = compose(&self.engine, &self.viewport, self.hud);
            if self.is_muted() {
                draw_mute_badge(&mut canvas);
            }
            terminal.present(&canvas)?;
            ticker.tick().await;
        }

        Ok(completed)
    }

    /// Applies `commands`, advances one frame, dispatches the resulting events
    /// and appends finished sessions to the results log.
    pub async fn step(&mut self, commands: &[Command], now: Instant) -> GameResult<StepOutcome> {
        let span = self.session_span();
        let mut outcome = StepOutcome::default();

        let events = span.in_scope(|| {
            let mut events = Vec::new();
            for command in commands {
                match command {
                    Command::Quit => {
                        outcome.quit = true;
                        return events;
                    }
                    Command::Input(input) => events.extend(self.engine.handle_input(*input, now)),
                    Command::Resize { columns, rows } => self.resize((*columns, *rows)),
                    Command::ToggleMute => {
                        if let Some(audio) = self.audio.as_mut() {
                            let muted = audio.toggle_muted();
                            info!(muted, "Sound cues toggled");
                        }
                    }
                }
            }
            events.extend(self.engine.update(now));
            events
        });

        for event in &events {
            span.in_scope(|| {
                self.handlers.handle_event(event);
                if let Some(audio) = self.audio.as_mut() {
                    audio.handle_event(event);
                }
            });
            if let GameEvent::GameOver { record } = event {
                self.results.append(record).instrument(span.clone()).await?;
                outcome.completed.push(record.clone());
            }
        }

        Ok(outcome)
    }

    fn session_span(&self) -> Span {
        match self.engine.state().round() {
            Some(round) => info_span!("session", id = %round.session.id, theme = %round.theme),
            None => info_span!("session", id = field::Empty, theme = field::Empty),
        }
    }
}
