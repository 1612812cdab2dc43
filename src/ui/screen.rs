use crate::core::theme::{Rgb, ThemeAssets};
use crate::core::{GameEngine, GameState, Rect, Round, Theme};
use crate::utils::{GameError, GameResult};

pub const GAME_TITLE: &str = "Running to Reality";
pub const START_PROMPT: &str = "Press Space Bar to Begin the journey!";
pub const RESTART_PROMPT: &str = "Press Space bar to restart";
pub const MUTED_BADGE: &str = "[muted]";

const MENU_BACKGROUND: Rgb = Rgb(20, 20, 30);
const MENU_TEXT: Rgb = Rgb(230, 230, 230);
const OVERLAY: Rgb = Rgb(255, 255, 255);
const OVERLAY_TEXT: Rgb = Rgb(0, 0, 0);

/// Smallest terminal grid the game screens stay legible on.
pub const MIN_COLUMNS: u16 = 40;
pub const MIN_ROWS: u16 = 15;

/// Canvas y of the first theme button; the others follow every `MENU_SPACING` pixels.
const MENU_TOP: f32 = 240.0;
const MENU_SPACING: f32 = 80.0;

/// Maps the logical pixel canvas onto a grid of terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub columns: u16,
    pub rows: u16,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(columns: u16, rows: u16, width: u32, height: u32) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// This grid, shrunk where a terminal of `(columns, rows)` is smaller.
    pub fn clamped_to(&self, terminal: (u16, u16)) -> Self {
        Self::new(
            self.columns.min(terminal.0),
            self.rows.min(terminal.1),
            self.width,
            self.height,
        )
    }

    /// Like `clamped_to`, but refuses terminals below the minimum grid.
    pub fn fit_to(&self, terminal: (u16, u16)) -> GameResult<Self> {
        let (columns, rows) = terminal;
        if columns < MIN_COLUMNS || rows < MIN_ROWS {
            return Err(GameError::terminal(format!(
                "terminal is {}x{} but the game needs at least {}x{}",
                columns, rows, MIN_COLUMNS, MIN_ROWS
            )));
        }
        Ok(self.clamped_to(terminal))
    }

    pub fn column_of(&self, x: f32) -> i32 {
        (x * self.columns as f32 / self.width as f32).floor() as i32
    }

    pub fn row_of(&self, y: f32) -> i32 {
        (y * self.rows as f32 / self.height as f32).floor() as i32
    }

    /// Cells covered by `rect`, as `(col, row, end_col, end_row)` with exclusive ends.
    /// A non-empty rect always covers at least one cell.
    pub fn span(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let col = self.column_of(rect.left() as f32);
        let row = self.row_of(rect.top() as f32);
        let end_col = self.column_of(rect.right() as f32).max(col + 1);
        let end_row = self.row_of(rect.bottom() as f32).max(row + 1);
        (col, row, end_col, end_row)
    }

    pub fn menu_row(&self, theme: Theme) -> i32 {
        self.row_of(MENU_TOP + MENU_SPACING * theme.index() as f32)
    }

    /// Theme whose menu button occupies terminal row `row`.
    pub fn theme_at_row(&self, row: u16) -> Option<Theme> {
        Theme::ALL
            .iter()
            .copied()
            .find(|&theme| self.menu_row(theme) == row as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
}

impl Cell {
    pub fn blank(bg: Rgb) -> Self {
        Self {
            ch: ' ',
            fg: bg,
            bg,
            bold: false,
        }
    }
}

/// A frame's worth of terminal cells, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    columns: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(columns: u16, rows: u16, fill: Cell) -> Self {
        Self {
            columns,
            rows,
            cells: vec![fill; columns as usize * rows as usize],
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.columns as i32 || row >= self.rows as i32 {
            return None;
        }
        Some(row as usize * self.columns as usize + col as usize)
    }

    pub fn get(&self, col: i32, row: i32) -> Option<&Cell> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    /// Writes a cell; positions outside the grid are clipped.
    pub fn set(&mut self, col: i32, row: i32, cell: Cell) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = cell;
        }
    }

    pub fn fill_area(&mut self, (col, row, end_col, end_row): (i32, i32, i32, i32), cell: Cell) {
        for r in row..end_row {
            for c in col..end_col {
                self.set(c, r, cell);
            }
        }
    }

    pub fn put_text(&mut self, col: i32, row: i32, text: &str, fg: Rgb, bg: Rgb, bold: bool) {
        for (offset, ch) in text.chars().enumerate() {
            self.set(col + offset as i32, row, Cell { ch, fg, bg, bold });
        }
    }

    pub fn put_centered(&mut self, row: i32, text: &str, fg: Rgb, bg: Rgb, bold: bool) {
        let len = text.chars().count() as i32;
        let col = (self.columns as i32 - len) / 2;
        self.put_text(col, row, text, fg, bg, bold);
    }

    pub fn row_text(&self, row: i32) -> String {
        (0..self.columns as i32)
            .filter_map(|col| self.get(col, row))
            .map(|cell| cell.ch)
            .collect()
    }

    pub fn row_cells(&self, row: u16) -> &[Cell] {
        let start = row as usize * self.columns as usize;
        &self.cells[start..start + self.columns as usize]
    }
}

/// Draws the engine's current state.
pub fn compose(engine: &GameEngine, viewport: &Viewport, hud: bool) -> Canvas {
    match engine.state() {
        GameState::Selecting => compose_menu(viewport),
        GameState::Starting(round) => {
            let assets = engine.assets().get(round.theme);
            let mut canvas = compose_scene(round, assets, viewport);
            let lines = [assets.starting_text, START_PROMPT];
            overlay(&mut canvas, viewport, &lines);
            canvas
        }
        GameState::Playing(round) => {
            let assets = engine.assets().get(round.theme);
            let mut canvas = compose_scene(round, assets, viewport);
            if hud {
                draw_hud(&mut canvas, round, assets, viewport);
            }
            canvas
        }
        GameState::GameOver { round, record } => {
            let assets = engine.assets().get(round.theme);
            let mut canvas = compose_scene(round, assets, viewport);
            let score_line = format!("Your total score is {}", record.score);
            let lines = [score_line.as_str(), assets.ending_text, RESTART_PROMPT];
            overlay(&mut canvas, viewport, &lines);
            canvas
        }
    }
}

/// Marks the top-right corner while sound cues are muted.
pub fn draw_mute_badge(canvas: &mut Canvas) {
    let col = canvas.columns() as i32 - MUTED_BADGE.chars().count() as i32;
    canvas.put_text(col, 0, MUTED_BADGE, OVERLAY_TEXT, OVERLAY, true);
}

fn compose_menu(viewport: &Viewport) -> Canvas {
    let mut canvas = Canvas::new(viewport.columns, viewport.rows, Cell::blank(MENU_BACKGROUND));

    canvas.put_centered(viewport.row_of(120.0), GAME_TITLE, MENU_TEXT, MENU_BACKGROUND, true);
    canvas.put_centered(
        viewport.row_of(180.0),
        "Choose your theme (1-3 or click)",
        MENU_TEXT,
        MENU_BACKGROUND,
        false,
    );

    for theme in Theme::ALL {
        let label = format!("[{}] {}", theme.index() + 1, theme.id());
        canvas.put_centered(viewport.menu_row(theme), &label, MENU_TEXT, MENU_BACKGROUND, true);
    }

    canvas
}

fn compose_scene(round: &Round, assets: &ThemeAssets, viewport: &Viewport) -> Canvas {
    let palette = assets.palette;
    let mut canvas = Canvas::new(viewport.columns, viewport.rows, Cell::blank(palette.sky));

    let ground_top = round.runner.ground_y + round.runner.size.height as f32;
    let ground = (0, viewport.row_of(ground_top), viewport.columns as i32, viewport.rows as i32);
    canvas.fill_area(ground, Cell::blank(palette.ground));

    let obstacle = Cell {
        ch: assets.obstacle_glyph,
        fg: palette.obstacle,
        bg: palette.sky,
        bold: true,
    };
    canvas.fill_area(viewport.span(&round.obstacle.rect()), obstacle);

    let runner = Cell {
        ch: runner_glyph(round, assets),
        fg: palette.runner,
        bg: palette.sky,
        bold: false,
    };
    canvas.fill_area(viewport.span(&round.runner.rect()), runner);

    canvas
}

fn runner_glyph(round: &Round, assets: &ThemeAssets) -> char {
    if round.runner.is_jumping {
        return assets.jump_glyph;
    }
    assets
        .run_frames
        .get(round.runner.frame_index % assets.run_frames.len().max(1))
        .copied()
        .unwrap_or(assets.jump_glyph)
}

fn draw_hud(canvas: &mut Canvas, round: &Round, assets: &ThemeAssets, viewport: &Viewport) {
    let col = viewport.column_of(10.0);
    let text = assets.palette.text;
    let sky = assets.palette.sky;
    canvas.put_text(col, viewport.row_of(10.0), &format!("Score: {}", round.session.score), text, sky, true);
    canvas.put_text(col, viewport.row_of(40.0), &format!("Level: {}", round.session.level), text, sky, true);
}

/// Centered text lines 60px apart around the middle of the canvas, on a white band.
fn overlay(canvas: &mut Canvas, viewport: &Viewport, lines: &[&str]) {
    let middle = viewport.height as f32 / 2.0;
    for (i, line) in lines.iter().enumerate() {
        let y = middle - 60.0 + 60.0 * i as f32;
        let row = viewport.row_of(y);
        canvas.fill_area((0, row, viewport.columns as i32, row + 1), Cell::blank(OVERLAY));
        canvas.put_centered(row, line, OVERLAY_TEXT, OVERLAY, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AssetTable, Input, Rules};
    use std::time::Instant;

    fn engine() -> GameEngine {
        GameEngine::new(Rules::default(), AssetTable::load(800, 600).unwrap())
    }

    fn viewport() -> Viewport {
        Viewport::new(80, 30, 800, 600)
    }

    fn find_row(canvas: &Canvas, needle: &str) -> Option<i32> {
        (0..canvas.rows() as i32).find(|&row| canvas.row_text(row).contains(needle))
    }

    #[test]
    fn test_pixel_to_cell_mapping() {
        let vp = viewport();
        assert_eq!(vp.column_of(0.0), 0);
        assert_eq!(vp.column_of(799.0), 79);
        assert_eq!(vp.row_of(20.0), 1);
        assert_eq!(vp.column_of(-56.0), -6);

        let span = vp.span(&Rect::new(20, 220, 64, 100));
        assert_eq!(span, (2, 11, 8, 16));
    }

    #[test]
    fn test_small_rect_covers_a_cell() {
        let vp = viewport();
        let (col, row, end_col, end_row) = vp.span(&Rect::new(3, 3, 2, 2));
        assert_eq!((end_col - col, end_row - row), (1, 1));
    }

    #[test]
    fn test_menu_rows_resolve_to_themes() {
        let vp = viewport();
        for theme in Theme::ALL {
            let row = vp.menu_row(theme) as u16;
            assert_eq!(vp.theme_at_row(row), Some(theme));
        }
        assert_eq!(vp.theme_at_row(0), None);
    }

    #[test]
    fn test_viewport_fits_terminal() {
        let vp = viewport();

        assert_eq!(vp.fit_to((200, 60)).unwrap(), vp);

        let small = vp.fit_to((60, 20)).unwrap();
        assert_eq!((small.columns, small.rows), (60, 20));
        assert_eq!(small.theme_at_row(small.menu_row(Theme::RescuingG) as u16), Some(Theme::RescuingG));
        assert_eq!(small.menu_row(Theme::EscapingF), 8);

        assert!(matches!(vp.fit_to((39, 30)), Err(GameError::Terminal { .. })));
        assert!(matches!(vp.fit_to((80, 14)), Err(GameError::Terminal { .. })));
        assert_eq!(vp.clamped_to((20, 10)).columns, 20);
    }

    #[test]
    fn test_mute_badge_sits_top_right() {
        let mut canvas = Canvas::new(20, 3, Cell::blank(Rgb(0, 0, 0)));
        draw_mute_badge(&mut canvas);

        assert!(canvas.row_text(0).ends_with(MUTED_BADGE));
        assert_eq!(canvas.get(19, 0).map(|cell| cell.bg), Some(OVERLAY));
        assert_eq!(canvas.row_text(1).trim(), "");
    }

    #[test]
    fn test_canvas_clips_writes() {
        let mut canvas = Canvas::new(4, 2, Cell::blank(Rgb(0, 0, 0)));
        canvas.put_text(2, 0, "abcd", Rgb(1, 1, 1), Rgb(0, 0, 0), false);
        canvas.set(-1, 5, Cell::blank(Rgb(9, 9, 9)));
        assert_eq!(canvas.row_text(0), "  ab");
        assert_eq!(canvas.row_cells(1).len(), 4);
    }

    #[test]
    fn test_selecting_screen_lists_themes() {
        let canvas = compose(&engine(), &viewport(), true);
        assert!(find_row(&canvas, GAME_TITLE).is_some());
        for theme in Theme::ALL {
            let row = find_row(&canvas, theme.id()).unwrap();
            assert_eq!(viewport().theme_at_row(row as u16), Some(theme));
        }
    }

    #[test]
    fn test_starting_and_playing_screens() {
        let mut engine = engine();
        let now = Instant::now();
        engine.handle_input(Input::SelectTheme(Theme::EscapingT), now);

        let canvas = compose(&engine, &viewport(), true);
        assert!(find_row(&canvas, "Escaping time with me").is_some());
        assert!(find_row(&canvas, START_PROMPT).is_some());

        engine.handle_input(Input::Jump, now);
        let canvas = compose(&engine, &viewport(), true);
        assert_eq!(find_row(&canvas, "Score: 0"), Some(0));
        assert_eq!(find_row(&canvas, "Level: 1"), Some(2));

        let obstacle = canvas.get(70, 16).unwrap();
        assert_eq!(obstacle.ch, 'T');

        let quiet = compose(&engine, &viewport(), false);
        assert!(find_row(&quiet, "Score:").is_none());
    }

    #[test]
    fn test_game_over_screen() {
        let mut engine = engine();
        let now = Instant::now();
        engine.handle_input(Input::SelectTheme(Theme::RescuingG), now);
        engine.handle_input(Input::Jump, now);
        for _ in 0..400 {
            engine.update(now);
        }

        let canvas = compose(&engine, &viewport(), true);
        assert!(find_row(&canvas, "Your total score is 0").is_some());
        assert!(find_row(&canvas, "You got trapped!").is_some());
        assert!(find_row(&canvas, RESTART_PROMPT).is_some());
    }
}
