// Entry point for the Minesweeper TUI application
// Resolves configuration, starts logging, and launches the screen stack

use std::error::Error;
use std::path::PathBuf;

use xtmines::xtm_config::{load_config, CliArgs, Config, Settings, USAGE};
use xtmines::xtm_log;
use xtmines::xtm_ui::run as run_ui;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = CliArgs::parse(std::env::args().skip(1))?;
    if cli.help {
        println!("{}", USAGE);
        return Ok(());
    }

    // A broken config file is not fatal; fall back to defaults and report it once logging is up
    let (cfg, cfg_err) = match load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let env_log = std::env::var_os("XTMINES_LOG").map(PathBuf::from);
    let settings = Settings::resolve(&cfg, &cli, env_log);

    xtm_log::init(settings.log_file.as_deref(), &settings.log_level)?;
    if let Some(e) = cfg_err {
        tracing::warn!(%e, "using default configuration");
    }
    tracing::info!(
        custom = ?settings.custom,
        start_index = settings.start_index,
        language = %settings.language,
        "starting"
    );

    run_ui(&settings)
}
