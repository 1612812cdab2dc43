use crossterm::{
    cursor::{self, MoveTo},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io::{self, BufWriter, Stdout, Write};
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::theme::Rgb;
use crate::core::{Input, Theme};
use crate::ui::screen::{Canvas, Cell, Viewport};
use crate::utils::{GameError, GameResult};

/// What a terminal event means to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Input(Input),
    ToggleMute,
    Resize { columns: u16, rows: u16 },
    Quit,
}

/// Translates a raw terminal event. Key releases and repeats are ignored.
pub fn map_event(event: &Event, viewport: &Viewport) -> Option<Command> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            row,
            ..
        }) => viewport
            .theme_at_row(*row)
            .map(|theme| Command::Input(Input::SelectTheme(theme))),
        Event::Resize(columns, rows) => Some(Command::Resize {
            columns: *columns,
            rows: *rows,
        }),
        _ => None,
    }
}

/// Current terminal size as `(columns, rows)`.
pub fn terminal_size() -> GameResult<(u16, u16)> {
    terminal::size().map_err(|e| GameError::terminal(format!("Failed to read terminal size: {}", e)))
}

fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char(' ') => Some(Command::Input(Input::Jump)),
        KeyCode::Char('m') => Some(Command::ToggleMute),
        KeyCode::Char(digit @ '1'..='3') => {
            let index = digit as usize - '1' as usize;
            Theme::from_index(index).map(|theme| Command::Input(Input::SelectTheme(theme)))
        }
        _ => None,
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Owns the terminal while a game runs: raw mode, alternate screen, hidden
/// cursor and mouse capture. Everything is restored on drop.
pub struct TerminalSession {
    writer: BufWriter<Stdout>,
    previous: Option<Canvas>,
    restored: bool,
}

impl TerminalSession {
    pub fn enter() -> GameResult<Self> {
        terminal::enable_raw_mode().map_err(|e| GameError::terminal(format!("Failed to enable raw mode: {}", e)))?;

        let mut writer = BufWriter::with_capacity(16384, io::stdout());
        let setup = execute!(
            writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture,
            Clear(ClearType::All)
        );
        if let Err(e) = setup {
            let _ = terminal::disable_raw_mode();
            return Err(GameError::terminal(format!("Failed to prepare terminal: {}", e)));
        }

        debug!("Terminal session entered");
        Ok(Self {
            writer,
            previous: None,
            restored: false,
        })
    }

    /// Drains every pending terminal event without blocking.
    pub fn poll_commands(&self, viewport: &Viewport) -> GameResult<Vec<Command>> {
        let mut commands = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Some(command) = map_event(&event::read()?, viewport) {
                commands.push(command);
            }
        }
        Ok(commands)
    }

    /// Draws `canvas`, emitting only the cells that changed since the last frame.
    pub fn present(&mut self, canvas: &Canvas) -> GameResult<()> {
        let previous = self.previous.take();
        let full_repaint = previous
            .as_ref()
            .map_or(true, |prev| prev.columns() != canvas.columns() || prev.rows() != canvas.rows());

        if full_repaint {
            queue!(self.writer, ResetColor, Clear(ClearType::All))?;
        }

        let mut last_style: Option<(Rgb, Rgb, bool)> = None;
        for row in 0..canvas.rows() {
            let previous_row = previous.as_ref().filter(|_| !full_repaint).map(|p| p.row_cells(row));
            let mut cursor_at: Option<u16> = None;

            for (col, cell) in canvas.row_cells(row).iter().enumerate() {
                let col = col as u16;
                if previous_row.is_some_and(|prev| prev[col as usize] == *cell) {
                    continue;
                }

                if cursor_at != Some(col) {
                    queue!(self.writer, MoveTo(col, row))?;
                }
                self.queue_style(cell, &mut last_style)?;
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some(col + 1);
            }
        }

        self.writer.flush()?;
        self.previous = Some(canvas.clone());
        Ok(())
    }

    fn queue_style(&mut self, cell: &Cell, last: &mut Option<(Rgb, Rgb, bool)>) -> io::Result<()> {
        let style = (cell.fg, cell.bg, cell.bold);
        if *last == Some(style) {
            return Ok(());
        }
        let attribute = if cell.bold { Attribute::Bold } else { Attribute::NormalIntensity };
        queue!(
            self.writer,
            SetAttribute(attribute),
            SetForegroundColor(color(cell.fg)),
            SetBackgroundColor(color(cell.bg))
        )?;
        *last = Some(style);
        Ok(())
    }

    pub fn restore(&mut self) -> GameResult<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        execute!(
            self.writer,
            ResetColor,
            SetAttribute(Attribute::Reset),
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        debug!("Terminal restored");
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}
