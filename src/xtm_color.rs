// Terminal color handling
// Matches ANSI colors to the terminal's capabilities and builds the per-cell palette

use ratatui::style::{Color, Modifier, Style};
use term_color_support::ColorSupport;

/// Extends Ratatui's Color so the same palette looks alike across terminals.
pub trait WTMatch {
    /// Upgrade a basic ANSI color to an RGB or 256-index equivalent when the
    /// terminal supports it, using the Windows Terminal "Campbell" scheme.
    fn wtmatch(self) -> Color;
}

impl WTMatch for Color {
    fn wtmatch(self) -> Color {
        let Some((rgb, index256)) = campbell(self) else {
            return self;
        };
        let support = ColorSupport::stdout();
        if support.has_16m {
            Color::Rgb(rgb.0, rgb.1, rgb.2)
        } else if support.has_256 {
            Color::Indexed(index256)
        } else {
            self
        }
    }
}

/// ((R, G, B), ANSI 256 index) for the 16 basic colors
fn campbell(c: Color) -> Option<((u8, u8, u8), u8)> {
    Some(match c {
        Color::Black => ((12, 12, 12), 232),
        Color::Red => ((197, 15, 31), 160),
        Color::Green => ((19, 161, 14), 28),
        Color::Yellow => ((193, 156, 0), 178),
        Color::Blue => ((0, 55, 218), 20),
        Color::Magenta => ((136, 23, 152), 90),
        Color::Cyan => ((58, 150, 221), 38),
        Color::Gray => ((204, 204, 204), 250),
        Color::DarkGray => ((118, 118, 118), 243),
        Color::LightRed => ((231, 72, 86), 203),
        Color::LightGreen => ((22, 198, 12), 46),
        Color::LightYellow => ((249, 241, 165), 229),
        Color::LightBlue => ((59, 120, 255), 63),
        Color::LightMagenta => ((180, 0, 158), 163),
        Color::LightCyan => ((97, 214, 214), 116),
        Color::White => ((242, 242, 242), 255),
        _ => return None,
    })
}

/// Resolved colors for the minefield and the menus.
/// Built once per run since color detection queries the terminal.
#[derive(Debug, Clone)]
pub struct Palette {
    pub unopened_bg: Color,
    pub unopened_selected_bg: Color,
    pub opened_bg: Color,
    pub opened_selected_bg: Color,
    pub closed_fg: Color,
    pub flag_fg: Color,
    pub mine_fg: Color,
    pub exploded_bg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub key_fg: Color,
    pub numbers: [Color; 8], // foreground for adjacency 1..=8
}

impl Palette {
    pub fn detect() -> Self {
        Palette {
            unopened_bg: Color::Gray.wtmatch(),
            unopened_selected_bg: Color::LightBlue.wtmatch(),
            opened_bg: Color::DarkGray.wtmatch(),
            opened_selected_bg: Color::Cyan.wtmatch(),
            closed_fg: Color::Black.wtmatch(),
            flag_fg: Color::Red.wtmatch(),
            mine_fg: Color::Black.wtmatch(),
            exploded_bg: Color::Red.wtmatch(),
            highlight_bg: Color::LightBlue.wtmatch(),
            highlight_fg: Color::Black.wtmatch(),
            key_fg: Color::Yellow.wtmatch(),
            numbers: [
                Color::Blue.wtmatch(),
                Color::Green.wtmatch(),
                Color::LightRed.wtmatch(),
                Color::Magenta.wtmatch(),
                Color::Red.wtmatch(),
                Color::LightCyan.wtmatch(),
                Color::Black.wtmatch(),
                Color::White.wtmatch(),
            ],
        }
    }

    /// Style for a board cell: background from opened x selected, foreground
    /// from the adjacency count when the cell is open
    pub fn cell_style(&self, opened: bool, selected: bool, adjacent: u8) -> Style {
        let bg = match (opened, selected) {
            (false, false) => self.unopened_bg,
            (false, true) => self.unopened_selected_bg,
            (true, false) => self.opened_bg,
            (true, true) => self.opened_selected_bg,
        };
        let fg = match adjacent {
            1..=8 if opened => self.numbers[adjacent as usize - 1],
            _ => self.closed_fg,
        };
        let style = Style::default().fg(fg).bg(bg);
        if opened && adjacent > 0 {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Style for the focused entry of a menu or picker
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key(&self) -> Style {
        Style::default().fg(self.key_fg).add_modifier(Modifier::BOLD)
    }
}
