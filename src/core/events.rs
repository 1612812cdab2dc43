use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::session::SessionRecord;
use crate::core::theme::Theme;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ThemeSelected { theme: Theme },
    RunStarted { session_id: Uuid, theme: Theme },
    Jumped { accepted: bool, total: u32 },
    Scored { score: u32 },
    LevelUp { level: u32, speed: u32 },
    GameOver { record: SessionRecord },
    Reset { theme: Theme },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::ThemeSelected { .. } => "theme_selected",
            GameEvent::RunStarted { .. } => "run_started",
            GameEvent::Jumped { .. } => "jumped",
            GameEvent::Scored { .. } => "scored",
            GameEvent::LevelUp { .. } => "level_up",
            GameEvent::GameOver { .. } => "game_over",
            GameEvent::Reset { .. } => "reset",
        }
    }
}

pub trait GameEventHandler {
    fn handle_event(&mut self, event: &GameEvent);
}

/// Traces every event: frequent ones at debug, the rest at info.
#[derive(Debug, Default)]
pub struct EventLogger;

impl GameEventHandler for EventLogger {
    fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Jumped { .. } | GameEvent::Scored { .. } => debug!(kind = event.name(), ?event),
            _ => info!(kind = event.name(), ?event),
        }
    }
}

/// Fans each event out to every registered handler, in registration order.
pub struct CompositeEventHandler {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl CompositeEventHandler {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler<H: GameEventHandler + 'static>(&mut self, handler: H) {
        self.handlers.push(Box::new(handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for CompositeEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventHandler for CompositeEventHandler {
    fn handle_event(&mut self, event: &GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Counter(Rc<RefCell<usize>>);

    impl GameEventHandler for Counter {
        fn handle_event(&mut self, _event: &GameEvent) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_event_names() {
        assert_eq!(GameEvent::Scored { score: 1 }.name(), "scored");
        assert_eq!(GameEvent::Reset { theme: Theme::EscapingF }.name(), "reset");
    }

    #[test]
    fn test_composite_event_handler() {
        let hits = Rc::new(RefCell::new(0));
        let mut composite = CompositeEventHandler::new();
        composite.add_handler(Counter(hits.clone()));
        composite.add_handler(Counter(hits.clone()));
        assert_eq!(composite.len(), 2);

        composite.handle_event(&GameEvent::Scored { score: 1 });
        assert_eq!(*hits.borrow(), 2);
    }
}
