// Terminal setup and the main event loop
// Reads one key at a time, feeds it to the active screen and redraws only when asked to

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::error::Error;
use std::io;
use std::time::Duration;
use tracing::{debug, info};

use crate::xtm_color::Palette;
use crate::xtm_config::Settings;
use crate::xtm_context::{Context, ContextStack, Theme, UiEvent};
use crate::xtm_lang::Lang;
use crate::xtm_menu::MenuContext;

/// Longest wait for a key before the active screen gets a `UiEvent::None`
pub const TICK_RATE: Duration = Duration::from_millis(200);

pub fn run(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let language = if settings.language.is_empty() {
        Lang::system_code()
    } else {
        settings.language.clone()
    };
    let theme = Theme {
        lang: Lang::new(&language),
        palette: Palette::detect(),
        ascii_icons: settings.ascii_icons,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut stack = ContextStack::new(Context::Menu(MenuContext::new(
        settings.custom,
        settings.start_index,
    )));
    let result = event_loop(&mut terminal, &mut stack, &theme, next_event);

    // Always try to restore terminal state.
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen, cursor::Show);
    let _ = terminal.show_cursor();
    info!(won = stack.stats().won, lost = stack.stats().lost, "session ended");
    result
}

/// Runs until the stack is empty. A clear requested by a screen, or a change
/// of terminal size, clears the whole screen and redraws the active screen.
/// `next` blocks for at most the given duration and yields one event.
pub fn event_loop<B, F>(
    terminal: &mut Terminal<B>,
    stack: &mut ContextStack,
    theme: &Theme,
    mut next: F,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    F: FnMut(Duration) -> io::Result<UiEvent>,
{
    let mut last_size: Option<Rect> = None;
    let mut need_clear = false;

    while !stack.is_empty() {
        let size = terminal.size()?;
        if last_size != Some(size) {
            debug!(width = size.width, height = size.height, "terminal resized");
            last_size = Some(size);
            need_clear = true;
        }
        if need_clear {
            terminal.clear()?;
            stack.request_redraw();
        }

        if stack.needs_redraw() {
            // RedrawAll only drops the redraw flag; screens never push, pop or clear on it
            let cleared = stack.dispatch(UiEvent::RedrawAll);
            debug_assert!(!cleared, "RedrawAll must not change the stack");
            terminal.draw(|f| stack.draw(f, theme))?;
        }

        let event = next(TICK_RATE)?;
        need_clear = stack.dispatch(event);
    }
    Ok(())
}

/// Wait up to `timeout` for one input event
pub fn next_event(timeout: Duration) -> io::Result<UiEvent> {
    if !event::poll(timeout)? {
        return Ok(UiEvent::None);
    }
    Ok(translate(event::read()?))
}

/// Map a terminal event onto the UI events the screens understand.
/// Only key presses count; Ctrl-C becomes an interrupt.
pub fn translate(ev: Event) -> UiEvent {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => {
            let ctrl_c = modifiers.contains(KeyModifiers::CONTROL)
                && matches!(code, KeyCode::Char('c') | KeyCode::Char('C'));
            if ctrl_c {
                UiEvent::Interrupt
            } else {
                UiEvent::Keyboard(code)
            }
        }
        _ => UiEvent::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn ctrl_c_is_an_interrupt() {
        let ev = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(translate(ev), UiEvent::Interrupt);
    }

    #[test]
    fn plain_keys_pass_through() {
        let ev = key(KeyCode::Char('c'), KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(translate(ev), UiEvent::Keyboard(KeyCode::Char('c')));
        let ev = key(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(translate(ev), UiEvent::Keyboard(KeyCode::Left));
    }

    #[test]
    fn releases_and_resizes_are_ignored() {
        let ev = key(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(translate(ev), UiEvent::None);
        assert_eq!(translate(Event::Resize(80, 24)), UiEvent::None);
    }
}
