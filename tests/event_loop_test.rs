use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::KeyCode;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use xtmines::xtm_color::Palette;
use xtmines::xtm_context::{Context, ContextStack, Theme, UiEvent};
use xtmines::xtm_difficulty::Difficulty;
use xtmines::xtm_grid::Grid;
use xtmines::xtm_lang::Lang;
use xtmines::xtm_menu::MenuContext;
use xtmines::xtm_play::GameContext;
use xtmines::xtm_ui::event_loop;

fn theme() -> Theme {
    Theme {
        lang: Lang::new("en"),
        palette: Palette::detect(),
        ascii_icons: true,
    }
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(&buffer.get(x, y).symbol);
        }
        out.push('\n');
    }
    out
}

/// Feeds the scripted events, then interrupts until the stack is empty
fn scripted(events: Vec<UiEvent>) -> impl FnMut(Duration) -> io::Result<UiEvent> {
    let mut queue = VecDeque::from(events);
    move |_| Ok(queue.pop_front().unwrap_or(UiEvent::Interrupt))
}

fn key(code: KeyCode) -> UiEvent {
    UiEvent::Keyboard(code)
}

fn game_stack(width: usize, height: usize, mines: &[(usize, usize)]) -> ContextStack {
    let grid = Grid::from_mines(width, height, mines);
    let d = Difficulty::new(width, height, mines.len());
    ContextStack::new(Context::Game(GameContext::with_grid(d, 3, grid)))
}

#[test]
fn scripted_session_runs_to_completion() {
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    let mut stack = ContextStack::new(Context::Menu(MenuContext::new(
        Difficulty::new(20, 12, 40),
        0,
    )));
    let mut feed = scripted(vec![
        key(KeyCode::Enter),     // picker
        key(KeyCode::Enter),     // beginner game
        key(KeyCode::Down),
        UiEvent::None,
        key(KeyCode::Char('q')), // nothing revealed, leaves at once
        key(KeyCode::Esc),       // back to the menu
        key(KeyCode::Down),
        key(KeyCode::Enter),     // quit
    ]);
    let mut consumed = 0;
    event_loop(&mut terminal, &mut stack, &theme(), |t| {
        consumed += 1;
        feed(t)
    })
    .unwrap();

    assert!(stack.is_empty());
    assert_eq!(consumed, 8, "the quit entry ends the loop without an interrupt");
}

#[test]
fn menu_is_drawn_on_first_pass() {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut stack = ContextStack::new(Context::Menu(MenuContext::new(Difficulty::default(), 0)));
    event_loop(&mut terminal, &mut stack, &theme(), |_| Ok(UiEvent::Interrupt)).unwrap();

    let text = screen_text(&terminal);
    assert!(text.contains("Minesweeper"));
    assert!(text.contains("Start game"));
}

#[test]
fn small_terminal_shows_resize_notice() {
    let mut terminal = Terminal::new(TestBackend::new(50, 12)).unwrap();
    let mut stack = game_stack(30, 16, &[(0, 0)]);
    event_loop(&mut terminal, &mut stack, &theme(), |_| Ok(UiEvent::Interrupt)).unwrap();

    let text = screen_text(&terminal);
    assert!(text.contains("Terminal too small"));
    assert!(text.contains("64 x 23"));
}

#[test]
fn lost_board_reveals_mines() {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut stack = game_stack(4, 4, &[(0, 0), (3, 3)]);
    let feed = scripted(vec![key(KeyCode::Char(' ')), UiEvent::None]);
    event_loop(&mut terminal, &mut stack, &theme(), feed).unwrap();

    let text = screen_text(&terminal);
    assert!(text.contains(" *"), "mines are shown after an explosion:\n{}", text);
    assert!(text.contains("Boom!"), "loss message is shown:\n{}", text);
}

#[test]
fn event_source_errors_stop_the_loop() {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut stack = ContextStack::new(Context::Menu(MenuContext::new(Difficulty::default(), 0)));
    let result = event_loop(&mut terminal, &mut stack, &theme(), |_| {
        Err(io::Error::new(io::ErrorKind::Other, "input closed"))
    });
    assert!(result.is_err());
    assert_eq!(stack.len(), 1);
}

#[test]
fn popped_screen_is_cleared_before_redraw() {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut stack = ContextStack::new(Context::Menu(MenuContext::new(Difficulty::default(), 0)));
    let feed = scripted(vec![key(KeyCode::Enter), UiEvent::None, key(KeyCode::Esc)]);
    event_loop(&mut terminal, &mut stack, &theme(), feed).unwrap();

    let text = screen_text(&terminal);
    assert!(text.contains("Start game"), "menu is redrawn:\n{}", text);
    assert!(!text.contains("Tab: switch difficulty"), "picker is gone:\n{}", text);
}
