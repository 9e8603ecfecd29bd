// Screen stack driving the UI state machine
// Each screen (menu, difficulty picker, game) is a Context; only the top one receives input

use crossterm::event::KeyCode;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::xtm_color::Palette;
use crate::xtm_lang::{fill, Lang};
use crate::xtm_menu::MenuContext;
use crate::xtm_picker::DifficultyContext;
use crate::xtm_play::GameContext;

/// Input delivered to the active context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    None,              // tick passed without a key
    Keyboard(KeyCode), // key press
    Interrupt,         // Ctrl-C, pops the active context afterwards
    RedrawAll,         // synthetic, the context is about to be drawn
}

/// Wins, losses and best times of the running session. Never saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub won: u32,
    pub lost: u32,
    best: [Option<u64>; 3], // per preset, Custom is not tracked
}

impl SessionStats {
    /// Count a win; returns true when it set a new best time for the preset
    pub fn record_win(&mut self, preset_index: usize, secs: u64) -> bool {
        self.won += 1;
        match self.best.get_mut(preset_index) {
            Some(best) if best.map_or(true, |b| secs < b) => {
                *best = Some(secs);
                true
            }
            _ => false,
        }
    }

    pub fn record_loss(&mut self) {
        self.lost += 1;
    }

    pub fn best(&self, preset_index: usize) -> Option<u64> {
        self.best.get(preset_index).copied().flatten()
    }
}

enum StackOp {
    Push(Context),
    Pop,
}

/// Per-iteration handle given to the active context.
/// Stack changes are queued and applied once the context's update returns.
pub struct RenderContext<'a> {
    ops: Vec<StackOp>,
    clear_requested: bool,
    pub stats: &'a mut SessionStats,
}

impl<'a> RenderContext<'a> {
    fn new(stats: &'a mut SessionStats) -> Self {
        RenderContext {
            ops: Vec::new(),
            clear_requested: false,
            stats,
        }
    }

    pub fn push_context(&mut self, ctx: Context) {
        self.request_clear();
        self.ops.push(StackOp::Push(ctx));
    }

    pub fn pop_context(&mut self) {
        self.request_clear();
        self.ops.push(StackOp::Pop);
    }

    pub fn request_clear(&mut self) {
        self.clear_requested = true;
    }

    pub fn is_clear_requested(&self) -> bool {
        self.clear_requested
    }
}

/// Shared rendering resources
pub struct Theme {
    pub lang: Lang,
    pub palette: Palette,
    pub ascii_icons: bool,
}

/// One interactive screen
#[derive(Debug)]
pub enum Context {
    Menu(MenuContext),
    DifficultyPicker(DifficultyContext),
    Game(GameContext),
}

impl Context {
    pub fn update(&mut self, rctx: &mut RenderContext, event: &UiEvent) {
        match self {
            Context::Menu(c) => c.update(rctx, event),
            Context::DifficultyPicker(c) => c.update(rctx, event),
            Context::Game(c) => c.update(rctx, event),
        }
    }

    pub fn needs_redraw(&self) -> bool {
        match self {
            Context::Menu(c) => c.needs_redraw,
            Context::DifficultyPicker(c) => c.needs_redraw,
            Context::Game(c) => c.needs_redraw,
        }
    }

    pub fn mark_redraw(&mut self) {
        match self {
            Context::Menu(c) => c.needs_redraw = true,
            Context::DifficultyPicker(c) => c.needs_redraw = true,
            Context::Game(c) => c.needs_redraw = true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Context::Menu(_) => "menu",
            Context::DifficultyPicker(_) => "difficulty",
            Context::Game(_) => "game",
        }
    }

    /// Smallest terminal (width, height) the screen can be laid out in
    pub fn min_size(&self) -> (u16, u16) {
        match self {
            Context::Menu(_) => (40, 12),
            Context::DifficultyPicker(_) => (50, 20),
            Context::Game(c) => c.min_size(),
        }
    }

    pub fn draw<B: Backend>(&self, f: &mut Frame<B>, theme: &Theme, stats: &SessionStats) {
        match self {
            Context::Menu(c) => c.draw(f, theme, stats),
            Context::DifficultyPicker(c) => c.draw(f, theme, stats),
            Context::Game(c) => c.draw(f, theme),
        }
    }

    pub fn as_game(&self) -> Option<&GameContext> {
        match self {
            Context::Game(c) => Some(c),
            _ => None,
        }
    }
}

/// Owns the screens. The last element is the active one; popping destroys it.
#[derive(Debug, Default)]
pub struct ContextStack {
    stack: Vec<Context>,
    stats: SessionStats,
}

impl ContextStack {
    pub fn new(root: Context) -> Self {
        ContextStack {
            stack: vec![root],
            stats: SessionStats::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> Option<&Context> {
        self.stack.last()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Names of the stacked screens, bottom first
    pub fn names(&self) -> Vec<&'static str> {
        self.stack.iter().map(Context::name).collect()
    }

    pub fn needs_redraw(&self) -> bool {
        self.top().is_some_and(Context::needs_redraw)
    }

    /// Force the active screen to be drawn again (after a clear or resize)
    pub fn request_redraw(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            top.mark_redraw();
        }
    }

    /// Deliver one event to the active screen and apply the stack changes it
    /// asked for. `Interrupt` always pops the active screen afterwards.
    /// Returns true when the screen should be cleared before the next draw.
    pub fn dispatch(&mut self, event: UiEvent) -> bool {
        let Some(top) = self.stack.last_mut() else {
            return false;
        };
        let mut rctx = RenderContext::new(&mut self.stats);
        top.update(&mut rctx, &event);
        if event == UiEvent::Interrupt {
            rctx.pop_context();
        }

        let clear = rctx.is_clear_requested();
        let ops = rctx.ops;
        for op in ops {
            self.apply(op);
        }
        clear
    }

    fn apply(&mut self, op: StackOp) {
        match op {
            StackOp::Push(ctx) => {
                debug!(context = ctx.name(), depth = self.stack.len() + 1, "push context");
                self.stack.push(ctx);
            }
            StackOp::Pop => {
                if let Some(ctx) = self.stack.pop() {
                    debug!(context = ctx.name(), depth = self.stack.len(), "pop context");
                }
                if let Some(top) = self.stack.last_mut() {
                    top.mark_redraw();
                }
            }
        }
    }

    /// Draw the active screen, or a resize notice when it does not fit
    pub fn draw<B: Backend>(&self, f: &mut Frame<B>, theme: &Theme) {
        let Some(top) = self.top() else {
            return;
        };
        let size = f.size();
        let (min_w, min_h) = top.min_size();
        if size.width < min_w || size.height < min_h {
            draw_too_small(f, theme, size, (min_w, min_h));
            return;
        }
        top.draw(f, theme, &self.stats);
    }
}

fn draw_too_small<B: Backend>(f: &mut Frame<B>, theme: &Theme, size: Rect, min: (u16, u16)) {
    let a = &theme.lang.assets;
    let line2 = fill(a.tsmsg_line2, &[&min.0, &min.1]);
    let text_w = a.tsmsg_line1.width().max(line2.as_str().width()) as u16;
    let lines = vec![
        Spans::from(Span::raw(a.tsmsg_line1)),
        Spans::from(Span::raw(line2)),
    ];
    let warn = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(a.tsmsg_title))
        .alignment(Alignment::Center);
    f.render_widget(Clear, size);
    let w = (text_w + 4).min(size.width);
    let h = 4u16.min(size.height);
    f.render_widget(warn, center_rect(w, h, size));
}

pub fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    let x = r.x + (r.width - width) / 2;
    let y = r.y + (r.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Step forward through `min..=max`, jumping back to `min` past the end
pub fn wrap_next(value: usize, min: usize, max: usize) -> usize {
    if value >= max { min } else { value + 1 }
}

/// Step backward through `min..=max`, jumping to `max` past the start
pub fn wrap_prev(value: usize, min: usize, max: usize) -> usize {
    if value <= min { max } else { value - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_steps() {
        assert_eq!(wrap_next(3, 0, 3), 0);
        assert_eq!(wrap_next(1, 0, 3), 2);
        assert_eq!(wrap_prev(0, 0, 3), 3);
        assert_eq!(wrap_prev(4, 4, 128), 128);
        assert_eq!(wrap_next(128, 4, 128), 4);
    }

    #[test]
    fn session_stats_track_best_per_preset() {
        let mut s = SessionStats::default();
        assert!(s.record_win(0, 40));
        assert!(!s.record_win(0, 55));
        assert!(s.record_win(0, 31));
        assert!(!s.record_win(3, 10));
        s.record_loss();
        assert_eq!((s.won, s.lost), (4, 1));
        assert_eq!(s.best(0), Some(31));
        assert_eq!(s.best(1), None);
        assert_eq!(s.best(3), None);
    }
}
