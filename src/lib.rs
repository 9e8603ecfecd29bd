// Terminal Minesweeper library
// The binary wires these modules together; tests drive them without a terminal

pub mod xtm_color;      // Terminal-aware colors and the cell palette
pub mod xtm_config;     // Config file and command-line options
pub mod xtm_context;    // Screen stack and event dispatch
pub mod xtm_difficulty; // Board sizes, presets and mine limits
pub mod xtm_grid;       // Mine placement and flood-fill reveal
pub mod xtm_lang;       // Multi-language string resources
pub mod xtm_log;        // Optional file logging
pub mod xtm_menu;       // Main menu screen
pub mod xtm_picker;     // Difficulty picker screen
pub mod xtm_play;       // Game screen
pub mod xtm_ui;         // Terminal setup and the event loop
