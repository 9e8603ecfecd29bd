// Game screen
// Owns the grid for one session: cursor movement, lazy mine placement, reveal/flag and the timer

use crossterm::event::KeyCode;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::xtm_context::{center_rect, wrap_next, wrap_prev, RenderContext, Theme, UiEvent};
use crate::xtm_difficulty::Difficulty;
use crate::xtm_grid::{Grid, RevealOutcome};
use crate::xtm_lang::{fill, Lang};

/// Without input, the board is not redrawn more often than this
pub const REDRAW_SUPPRESS: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won { new_best: bool },
    Lost { at: (usize, usize) }, // exploded cell
}

#[derive(Debug)]
pub struct GameContext {
    grid: Grid,
    difficulty: Difficulty,
    preset_index: usize, // picker entry this game was started from
    cursor: (usize, usize),
    state: GameState,
    begin_time: Option<Instant>,
    end_time: Option<Instant>,
    last_redraw: Instant,
    confirm_quit: bool,
    pub needs_redraw: bool,
}

impl GameContext {
    /// New game; mines are placed on the first reveal
    pub fn new(difficulty: Difficulty, preset_index: usize) -> Self {
        let mut difficulty = difficulty;
        difficulty.ensure_mines_limit();
        let grid = Grid::new(difficulty.width, difficulty.height);
        Self::with_grid(difficulty, preset_index, grid)
    }

    /// Game on a prepared grid. A grid that already holds mines skips lazy placement.
    pub fn with_grid(difficulty: Difficulty, preset_index: usize, grid: Grid) -> Self {
        GameContext {
            grid,
            difficulty,
            preset_index,
            cursor: (0, 0),
            state: GameState::Playing,
            begin_time: None,
            end_time: None,
            last_redraw: Instant::now(),
            confirm_quit: false,
            needs_redraw: true,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state != GameState::Playing
    }

    pub fn is_confirming_quit(&self) -> bool {
        self.confirm_quit
    }

    /// Seconds since the first reveal, frozen once the game is over
    pub fn elapsed_secs(&self) -> u64 {
        match (self.begin_time, self.end_time) {
            (Some(t0), Some(t1)) => t1.duration_since(t0).as_secs(),
            (Some(t0), None) => t0.elapsed().as_secs(),
            _ => 0,
        }
    }

    pub fn min_size(&self) -> (u16, u16) {
        let w = (self.grid.width() * 2 + 2) as u16;
        let h = (self.grid.height() + 2) as u16 + 5;
        (w.max(64), h)
    }

    pub fn update(&mut self, rctx: &mut RenderContext, event: &UiEvent) {
        match event {
            UiEvent::None => {
                let timer_running = self.begin_time.is_some() && !self.is_over();
                if timer_running && self.last_redraw.elapsed() >= REDRAW_SUPPRESS {
                    self.needs_redraw = true;
                }
            }
            UiEvent::RedrawAll => {
                self.needs_redraw = false;
                self.last_redraw = Instant::now();
            }
            UiEvent::Interrupt => {
                debug!(state = ?self.state, "game interrupted");
            }
            UiEvent::Keyboard(code) => {
                self.handle_key(rctx, *code);
                self.needs_redraw = true;
            }
        }
    }

    fn handle_key(&mut self, rctx: &mut RenderContext, code: KeyCode) {
        if self.confirm_quit {
            self.confirm_quit = false;
            if matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                rctx.pop_context();
            }
            return;
        }
        // a finished game only honors quit
        if self.is_over() {
            if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q')) {
                rctx.pop_context();
            }
            return;
        }

        let (w, h) = (self.grid.width(), self.grid.height());
        let (x, y) = self.cursor;
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                self.cursor.1 = wrap_prev(y, 0, h - 1)
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                self.cursor.1 = wrap_next(y, 0, h - 1)
            }
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.cursor.0 = wrap_prev(x, 0, w - 1)
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                self.cursor.0 = wrap_next(x, 0, w - 1)
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.reveal_at_cursor(rctx),
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.grid.toggle_flag(x, y);
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.restart();
                rctx.request_clear();
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                if self.begin_time.is_some() {
                    self.confirm_quit = true;
                } else {
                    rctx.pop_context();
                }
            }
            _ => {}
        }
    }

    fn reveal_at_cursor(&mut self, rctx: &mut RenderContext) {
        if self.is_over() {
            return;
        }
        let (x, y) = self.cursor;

        if !self.grid.mines_placed() {
            if let Err(e) = self
                .grid
                .place_mines(self.difficulty.mine_count, Some((x, y)))
            {
                error!(%e, "could not place mines");
                return;
            }
        }
        if self.begin_time.is_none() {
            self.begin_time = Some(Instant::now());
        }

        match self.grid.reveal(x, y) {
            RevealOutcome::Exploded => {
                self.finish(GameState::Lost { at: (x, y) });
                rctx.stats.record_loss();
                info!(x, y, secs = self.elapsed_secs(), "game lost");
            }
            RevealOutcome::HasFlag => {}
            RevealOutcome::Opened | RevealOutcome::NoOp => {
                if self.grid.is_won() {
                    self.finish(GameState::Won { new_best: false });
                    let secs = self.elapsed_secs();
                    let new_best = rctx.stats.record_win(self.preset_index, secs);
                    self.state = GameState::Won { new_best };
                    info!(secs, new_best, "game won");
                }
            }
        }
    }

    fn finish(&mut self, state: GameState) {
        self.state = state;
        self.end_time = Some(Instant::now());
    }

    /// Fresh board with the same difficulty, only while still playing
    fn restart(&mut self) {
        debug!("restarting game");
        self.grid.reset(self.difficulty.width, self.difficulty.height);
        self.cursor = (0, 0);
        self.state = GameState::Playing;
        self.begin_time = None;
        self.end_time = None;
        self.confirm_quit = false;
    }

    fn cell_glyph(&self, x: usize, y: usize, ascii: bool, lang: &Lang) -> String {
        let cell = self.grid.cell(x, y);
        let show_mine = cell.is_mine && matches!(self.state, GameState::Lost { .. });
        let glyph = if cell.has_flag {
            if ascii { "F" } else { "⚑" }
        } else if show_mine {
            if ascii { "*" } else { "☼" }
        } else if cell.is_opened && cell.adjacent_mine_count > 0 {
            let n = usize::from(cell.adjacent_mine_count);
            return lang.assets.numerals[n - 1].to_string();
        } else {
            " "
        };
        format!(" {}", glyph)
    }

    pub fn draw<B: Backend>(&self, f: &mut Frame<B>, theme: &Theme) {
        let a = &theme.lang.assets;
        let p = &theme.palette;
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Min(self.grid.height() as u16 + 2),
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(size);

        // board
        let mut lines = Vec::with_capacity(self.grid.height());
        for y in 0..self.grid.height() {
            let mut spans = Vec::with_capacity(self.grid.width());
            for x in 0..self.grid.width() {
                let cell = self.grid.cell(x, y);
                let selected = self.cursor == (x, y);
                let mut style =
                    p.cell_style(cell.is_opened, selected, cell.adjacent_mine_count);
                if cell.has_flag {
                    style = style.fg(p.flag_fg);
                }
                if let GameState::Lost { at } = self.state {
                    if cell.is_mine {
                        style = style.fg(p.mine_fg);
                    }
                    if at == (x, y) {
                        style = style.bg(p.exploded_bg);
                    }
                }
                spans.push(Span::styled(
                    self.cell_glyph(x, y, theme.ascii_icons, &theme.lang),
                    style,
                ));
            }
            lines.push(Spans::from(spans));
        }
        let title = format!(
            " {} {}x{} ",
            theme.lang.diff_name(self.preset_index),
            self.grid.width(),
            self.grid.height()
        );
        let board_area = center_rect(
            (self.grid.width() * 2 + 2) as u16,
            self.grid.height() as u16 + 2,
            chunks[0],
        );
        let board = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center),
        );
        f.render_widget(board, board_area);

        // status: mines / flags / left and the timer
        let mines = self.difficulty.mine_count;
        let flags = self.grid.flag_count();
        let left = mines as isize - flags as isize;
        let status = format!(
            "{}   {}",
            fill(a.status_fmt, &[&mines, &flags, &left]),
            theme.lang.format_duration(self.elapsed_secs())
        );
        f.render_widget(
            Paragraph::new(Span::raw(status)).alignment(Alignment::Center),
            chunks[1],
        );

        // outcome or quit prompt
        let message = if self.confirm_quit {
            Some(Span::styled(a.confirm_quit, p.highlight()))
        } else {
            match self.state {
                GameState::Playing => None,
                GameState::Won { .. } => Some(Span::styled(
                    a.win_message,
                    Style::default().fg(p.numbers[1]).add_modifier(Modifier::BOLD),
                )),
                GameState::Lost { .. } => Some(Span::styled(
                    a.loss_message,
                    Style::default().fg(p.flag_fg).add_modifier(Modifier::BOLD),
                )),
            }
        };
        if let Some(message) = message {
            f.render_widget(
                Paragraph::new(message).alignment(Alignment::Center),
                chunks[2],
            );
        }

        let hint = if self.is_over() { a.game_over_hint } else { a.game_hint };
        f.render_widget(
            Paragraph::new(Span::styled(hint, p.key())).alignment(Alignment::Center),
            chunks[3],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened(mines: &[(usize, usize)], at: (usize, usize)) -> GameContext {
        let mut grid = Grid::from_mines(3, 3, mines);
        grid.reveal(at.0, at.1);
        GameContext::with_grid(Difficulty::new(3, 3, 0), 3, grid)
    }

    #[test]
    fn numbers_follow_the_language() {
        let g = opened(&[(0, 0), (2, 0), (0, 2)], (1, 1));
        assert_eq!(g.cell_glyph(1, 1, false, &Lang::new("en")), " 3");
        assert_eq!(g.cell_glyph(1, 1, false, &Lang::new("zh")), "三");
        assert_eq!(g.cell_glyph(2, 2, false, &Lang::new("zh")), "  ");
    }

    #[test]
    fn flags_and_mines_use_ascii_fallback() {
        let mut grid = Grid::from_mines(3, 3, &[(0, 0)]);
        grid.toggle_flag(0, 1);
        grid.reveal(2, 2);
        let mut g = GameContext::with_grid(Difficulty::new(3, 3, 0), 3, grid);
        assert_eq!(g.cell_glyph(0, 1, true, &Lang::new("en")), " F");
        assert_eq!(g.cell_glyph(0, 1, false, &Lang::new("en")), " ⚑");
        g.state = GameState::Lost { at: (0, 0) };
        assert_eq!(g.cell_glyph(0, 0, true, &Lang::new("en")), " *");
    }
}
