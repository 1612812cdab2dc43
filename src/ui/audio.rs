use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, trace};

use crate::core::{GameEvent, GameEventHandler};

/// Sound cues the game emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Run begins
    Start,
    /// Space pressed while playing
    Jump,
    /// Runner hit the obstacle
    GameOver,
}

impl SoundEffect {
    /// Sine tone this cue stands for: frequency in Hz and length.
    pub fn tone(self) -> (u32, Duration) {
        match self {
            SoundEffect::Start => (1200, Duration::from_millis(150)),
            SoundEffect::Jump => (500, Duration::from_millis(150)),
            SoundEffect::GameOver => (200, Duration::from_millis(1000)),
        }
    }

    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::RunStarted { .. } => Some(SoundEffect::Start),
            GameEvent::Jumped { .. } => Some(SoundEffect::Jump),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

/// Plays cues on the terminal bell. Built once by the shell and handed to
/// the game loop, which feeds it events and mute toggles.
pub struct AudioManager<W: Write> {
    out: W,
    enabled: bool,
    bell: bool,
    muted: bool,
}

/// Audio manager writing to any sink, as held by the game loop.
pub type BoxedAudio = AudioManager<Box<dyn Write>>;

impl BoxedAudio {
    pub fn stdout(enabled: bool, bell: bool) -> Self {
        Self::new(Box::new(io::stdout()), enabled, bell)
    }
}

impl<W: Write> AudioManager<W> {
    pub fn new(out: W, enabled: bool, bell: bool) -> Self {
        Self {
            out,
            enabled,
            bell,
            muted: false,
        }
    }

    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn play(&mut self, effect: SoundEffect) {
        if !self.enabled || self.muted {
            return;
        }

        let (frequency, length) = effect.tone();
        trace!(?effect, frequency, ?length, "sound cue");

        if self.bell {
            if let Err(e) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
                debug!("Bell write failed: {}", e);
            }
        }
    }
}

impl<W: Write> GameEventHandler for AudioManager<W> {
    fn handle_event(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}
