// Main menu screen
// "Start game" opens the difficulty picker, "Quit" empties the stack

use crossterm::event::KeyCode;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::xtm_context::{center_rect, Context, RenderContext, SessionStats, Theme, UiEvent};
use crate::xtm_difficulty::Difficulty;
use crate::xtm_lang::fill;
use crate::xtm_picker::DifficultyContext;

const ENTRY_START: usize = 0;
const ENTRY_QUIT: usize = 1;

#[derive(Debug)]
pub struct MenuContext {
    index: usize,
    custom: Difficulty,   // seeds the picker's custom slot
    picker_start: usize,  // entry the picker opens on
    pub needs_redraw: bool,
}

impl MenuContext {
    pub fn new(custom: Difficulty, picker_start: usize) -> Self {
        MenuContext {
            index: ENTRY_START,
            custom,
            picker_start,
            needs_redraw: true,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn update(&mut self, rctx: &mut RenderContext, event: &UiEvent) {
        match event {
            UiEvent::RedrawAll => self.needs_redraw = false,
            UiEvent::Keyboard(code) => {
                match code {
                    KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                        if self.index > ENTRY_START {
                            self.index -= 1;
                        }
                    }
                    KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                        if self.index < ENTRY_QUIT {
                            self.index += 1;
                        }
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => self.enter(rctx),
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => rctx.pop_context(),
                    _ => return,
                }
                self.needs_redraw = true;
            }
            UiEvent::None | UiEvent::Interrupt => {}
        }
    }

    fn enter(&mut self, rctx: &mut RenderContext) {
        match self.index {
            ENTRY_START => rctx.push_context(Context::DifficultyPicker(DifficultyContext::new(
                self.custom,
                self.picker_start,
            ))),
            _ => rctx.pop_context(),
        }
    }

    pub fn draw<B: Backend>(&self, f: &mut Frame<B>, theme: &Theme, stats: &SessionStats) {
        let a = &theme.lang.assets;
        let size = f.size();

        let entries = [a.menu_start, a.menu_quit];
        let mut lines = vec![
            Spans::from(Span::styled(
                a.app_title,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::from(""),
        ];
        for (i, label) in entries.iter().enumerate() {
            let style = if i == self.index {
                theme.palette.highlight()
            } else {
                Style::default()
            };
            lines.push(Spans::from(Span::styled(format!("  {}  ", label), style)));
            lines.push(Spans::from(""));
        }
        if stats.won + stats.lost > 0 {
            lines.push(Spans::from(fill(a.session_fmt, &[&stats.won, &stats.lost])));
        }

        let body = Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(body, center_rect(36, 10, size));

        let hint = Paragraph::new(Span::styled(a.menu_hint, theme.palette.key()))
            .alignment(Alignment::Center);
        let hint_area = Rect::new(size.x, size.bottom().saturating_sub(1), size.width, 1);
        f.render_widget(hint, hint_area);
    }
}
