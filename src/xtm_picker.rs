// Difficulty picker screen
// Cycles through the presets and an editable custom slot, then starts a game on top of itself

use crossterm::event::KeyCode;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tracing::{error, info};
use unicode_width::UnicodeWidthStr;

use crate::xtm_context::{
    center_rect, wrap_next, wrap_prev, Context, RenderContext, SessionStats, Theme, UiEvent,
};
use crate::xtm_difficulty::{
    Difficulty, DifficultyField, Preset, CUSTOM_SIDE_MAX, CUSTOM_SIDE_MIN, PRESET_COUNT,
};
use crate::xtm_lang::fill;
use crate::xtm_play::GameContext;

const CUSTOM_SLOT: usize = PRESET_COUNT - 1;
const LAST_FIELD: usize = DifficultyField::ALL.len() - 1;

#[derive(Debug)]
pub struct DifficultyContext {
    index: usize,        // selected preset, CUSTOM_SLOT for custom
    custom_index: usize, // field under the cursor in the custom slot
    custom: Difficulty,
    pub needs_redraw: bool,
}

impl DifficultyContext {
    /// `custom` seeds the custom slot; its sides are brought into the editable range
    pub fn new(custom: Difficulty, start_index: usize) -> Self {
        let custom = Difficulty::new(
            custom.width.clamp(CUSTOM_SIDE_MIN, CUSTOM_SIDE_MAX),
            custom.height.clamp(CUSTOM_SIDE_MIN, CUSTOM_SIDE_MAX),
            custom.mine_count,
        );
        DifficultyContext {
            index: start_index.min(CUSTOM_SLOT),
            custom_index: 0,
            custom,
            needs_redraw: true,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn custom_index(&self) -> usize {
        self.custom_index
    }

    pub fn custom(&self) -> Difficulty {
        self.custom
    }

    /// Preset currently selected, with the custom values when on the custom slot
    pub fn selected(&self) -> Preset {
        Preset::from_index(self.index, self.custom)
    }

    fn on_custom(&self) -> bool {
        self.selected().is_custom()
    }

    pub fn update(&mut self, rctx: &mut RenderContext, event: &UiEvent) {
        match event {
            UiEvent::RedrawAll => self.needs_redraw = false,
            UiEvent::Keyboard(code) => {
                match code {
                    KeyCode::Tab => self.index = wrap_next(self.index, 0, CUSTOM_SLOT),
                    KeyCode::BackTab => self.index = wrap_prev(self.index, 0, CUSTOM_SLOT),
                    KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                        if self.on_custom() {
                            self.custom_index = wrap_prev(self.custom_index, 0, LAST_FIELD);
                        } else {
                            self.index = wrap_prev(self.index, 0, CUSTOM_SLOT);
                        }
                    }
                    KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                        if self.on_custom() {
                            self.custom_index = wrap_next(self.custom_index, 0, LAST_FIELD);
                        } else {
                            self.index = wrap_next(self.index, 0, CUSTOM_SLOT);
                        }
                    }
                    KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                        if self.on_custom() {
                            self.adjust(false);
                        }
                    }
                    KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                        if self.on_custom() {
                            self.adjust(true);
                        }
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => self.confirm(rctx),
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => rctx.pop_context(),
                    _ => return,
                }
                self.needs_redraw = true;
            }
            UiEvent::None | UiEvent::Interrupt => {}
        }
    }

    /// Step the selected custom field with wrap-around, then re-clamp the mines
    fn adjust(&mut self, forward: bool) {
        let (min, max) = match DifficultyField::ALL.get(self.custom_index) {
            Some(DifficultyField::Mines) => (1, self.custom.possible_max_mines().max(1)),
            _ => (CUSTOM_SIDE_MIN, CUSTOM_SIDE_MAX),
        };
        match self.custom.field_mut(self.custom_index) {
            Ok(value) => {
                *value = if forward {
                    wrap_next(*value, min, max)
                } else {
                    wrap_prev(*value, min, max)
                };
            }
            Err(e) => {
                error!(%e, "custom field cursor out of range");
                return;
            }
        }
        self.custom.ensure_mines_limit();
    }

    /// Start a game above this screen; quitting it comes back here
    fn confirm(&self, rctx: &mut RenderContext) {
        let preset = self.selected();
        let d = preset.params();
        info!(
            preset = preset.name(),
            width = d.width,
            height = d.height,
            mines = d.mine_count,
            "starting game"
        );
        rctx.push_context(Context::Game(GameContext::new(d, preset.to_index())));
    }

    pub fn draw<B: Backend>(&self, f: &mut Frame<B>, theme: &Theme, stats: &SessionStats) {
        let a = &theme.lang.assets;
        let size = f.size();
        let area = center_rect(48, 14, size);
        f.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .title(a.picker_title)
                .title_alignment(Alignment::Center),
            area,
        );
        let inner = Rect::new(
            area.x + 1,
            area.y + 1,
            area.width.saturating_sub(2),
            area.height.saturating_sub(2),
        );
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(16), Constraint::Min(20)].as_ref())
            .split(inner);

        // preset list
        let mut names = vec![Spans::from("")];
        for i in 0..PRESET_COUNT {
            let style = if i == self.index {
                theme.palette.highlight()
            } else {
                Style::default()
            };
            names.push(Spans::from(Span::styled(
                format!(" {} ", theme.lang.diff_name(i)),
                style,
            )));
            names.push(Spans::from(""));
        }
        f.render_widget(Paragraph::new(Text::from(names)), cols[0]);

        // fields of the selected difficulty, editable on the custom slot
        let d = self.selected().params();
        let labels = theme.lang.field_names();
        let label_max = labels.iter().map(|s| s.width()).max().unwrap_or(0);
        let mut fields = vec![Spans::from("")];
        for (i, label) in labels.iter().enumerate() {
            let value = d.field(i).unwrap_or_default();
            let editing = self.on_custom() && i == self.custom_index;
            let text = if self.on_custom() {
                format!("<- {} ->", value)
            } else {
                value.to_string()
            };
            let style = if editing {
                theme.palette.highlight()
            } else {
                Style::default()
            };
            fields.push(Spans::from(vec![
                Span::raw(format!(
                    "{}:{} ",
                    label,
                    " ".repeat(label_max.saturating_sub(label.width()))
                )),
                Span::styled(text, style),
            ]));
            fields.push(Spans::from(""));
        }
        if let Some(best) = stats.best(self.index) {
            fields.push(Spans::from(fill(
                a.picker_best_fmt,
                &[&theme.lang.format_duration(best)],
            )));
        }
        f.render_widget(Paragraph::new(Text::from(fields)), cols[1]);

        let hints = vec![
            Spans::from(Span::styled(a.picker_hint_tab, theme.palette.key())),
            Spans::from(Span::styled(a.picker_hint_adjust, theme.palette.key())),
            Spans::from(Span::styled(a.picker_hint_enter, theme.palette.key())),
        ];
        let hint_area = Rect::new(
            area.x,
            (area.y + area.height).min(size.bottom().saturating_sub(3)),
            area.width,
            3.min(size.height),
        );
        f.render_widget(
            Paragraph::new(Text::from(hints)).alignment(Alignment::Center),
            hint_area,
        );
    }
}
