// Diagnostics logging
// The terminal belongs to the UI, so events only go to a file and only when one is configured

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

/// Parse a level name, falling back to INFO for anything unrecognized
pub fn parse_level(name: &str) -> Level {
    name.trim().parse::<Level>().unwrap_or(Level::INFO)
}

/// Install a global subscriber appending to `path`. Without a path nothing
/// is installed and tracing macros stay no-ops. Returns whether logging is on.
pub fn init(path: Option<&Path>, level: &str) -> Result<bool, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_max_level(parse_level(level))
        .try_init()
        .map_err(|e| e as Box<dyn Error>)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn no_path_means_no_subscriber() {
        assert!(!init(None, "trace").unwrap());
    }

    #[test]
    fn file_subscriber_installs_once() {
        let path = std::env::temp_dir().join(format!("xtmines-log-{}.log", std::process::id()));
        assert!(init(Some(&path), "debug").unwrap());
        tracing::info!("log file test");
        assert!(path.exists());

        // a global subscriber is already set, the second one is reported
        assert!(init(Some(&path), "debug").is_err());
        let _ = std::fs::remove_file(&path);
    }
}
