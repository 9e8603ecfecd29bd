// Startup configuration
// Reads the optional TOML config file and command-line overrides; nothing is ever written back

use directories::ProjectDirs;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::xtm_difficulty::{Difficulty, CUSTOM_SIDE_MAX, CUSTOM_SIDE_MIN, PRESET_COUNT};

pub const USAGE: &str = "\
Usage: xtmines [OPTIONS]

Options:
  -s, --size <WxH|N>   custom board size, 4 to 128 per side, e.g. 28x20 or 12
  -m, --mines <N>      custom mine count
  -r, --ratio <F>      custom mine density between 0 and 1
  -l, --lang <CODE>    interface language (en, zh)
      --log <FILE>     append diagnostics to FILE
  -h, --help           print this help

A size, mine count or ratio preselects the Custom difficulty.
Config file keys: custom_w, custom_h, custom_n, ascii_icons, language, log_file, log_level";

#[derive(Debug)]
pub enum ConfigError {
    MissingValue(String),
    InvalidValue { option: String, value: String },
    UnknownOption(String),
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingValue(opt) => write!(f, "option {} needs a value", opt),
            ConfigError::InvalidValue { option, value } => {
                write!(f, "invalid value {:?} for option {}", value, option)
            }
            ConfigError::UnknownOption(opt) => write!(f, "unrecognized option {}", opt),
            ConfigError::Read { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "cannot parse {}: {}", path.display(), source)
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// User preferences loaded from the config file
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    // Custom difficulty defaults
    pub custom_w: usize,
    pub custom_h: usize,
    pub custom_n: usize,

    pub ascii_icons: bool,          // Use ASCII fallback icons
    pub language: String,           // "en", "zh" or empty for the system locale
    pub log_file: Option<PathBuf>,  // Diagnostics log, disabled when unset
    pub log_level: String,          // tracing level name
}

impl Default for Config {
    fn default() -> Self {
        Config {
            custom_w: 8,
            custom_h: 8,
            custom_n: 8,
            ascii_icons: false,
            language: String::new(),
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

/// Get the configuration file path
/// Uses the platform config directory (e.g., ~/.config/xtmines/xtmines.toml on Linux)
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "xtmines", "xtmines").map(|proj| proj.config_dir().join("xtmines.toml"))
}

/// Load the configuration file. A missing file yields the defaults.
pub fn load_config() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) if path.exists() => {
            let s = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            parse_config(&s).map_err(|source| ConfigError::Parse { path, source })
        }
        _ => Ok(Config::default()),
    }
}

pub fn parse_config(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Command-line overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub size: Option<(usize, usize)>,
    pub mines: Option<usize>,
    pub ratio: Option<f64>,
    pub lang: Option<String>,
    pub log_file: Option<PathBuf>,
    pub help: bool,
}

impl CliArgs {
    /// Parse arguments, program name excluded
    pub fn parse<I>(args: I) -> Result<CliArgs, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cli = CliArgs::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let (opt, inline) = match arg.split_once('=') {
                Some((o, v)) if o.starts_with("--") => (o.to_string(), Some(v.to_string())),
                _ => (arg, None),
            };
            if matches!(opt.as_str(), "-h" | "--help") {
                cli.help = true;
                continue;
            }
            let value = match inline.or_else(|| args.next()) {
                Some(v) => v,
                None if is_known(&opt) => return Err(ConfigError::MissingValue(opt)),
                None => return Err(ConfigError::UnknownOption(opt)),
            };
            let invalid = || ConfigError::InvalidValue {
                option: opt.clone(),
                value: value.clone(),
            };
            match opt.as_str() {
                "-s" | "--size" => cli.size = Some(parse_size(&value).ok_or_else(invalid)?),
                "-m" | "--mines" => cli.mines = Some(value.parse().map_err(|_| invalid())?),
                "-r" | "--ratio" => {
                    let r: f64 = value.parse().map_err(|_| invalid())?;
                    if !(0.0..=1.0).contains(&r) {
                        return Err(invalid());
                    }
                    cli.ratio = Some(r);
                }
                "-l" | "--lang" => cli.lang = Some(value),
                "--log" => cli.log_file = Some(PathBuf::from(value)),
                _ => return Err(ConfigError::UnknownOption(opt)),
            }
        }
        Ok(cli)
    }

    fn overrides_difficulty(&self) -> bool {
        self.size.is_some() || self.mines.is_some() || self.ratio.is_some()
    }
}

fn is_known(opt: &str) -> bool {
    matches!(
        opt,
        "-s" | "--size" | "-m" | "--mines" | "-r" | "--ratio" | "-l" | "--lang" | "--log"
    )
}

/// "28x20" or a single side length for a square board, each side in 4..=128
fn parse_size(s: &str) -> Option<(usize, usize)> {
    let (w, h) = match s.split_once(['x', 'X']) {
        Some((w, h)) => (w.trim().parse().ok()?, h.trim().parse().ok()?),
        None => {
            let n = s.trim().parse().ok()?;
            (n, n)
        }
    };
    let side = CUSTOM_SIDE_MIN..=CUSTOM_SIDE_MAX;
    (side.contains(&w) && side.contains(&h)).then_some((w, h))
}

/// Configuration after merging the file, the command line and the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub custom: Difficulty,
    pub start_index: usize, // picker entry selected when it opens
    pub ascii_icons: bool,
    pub language: String,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Settings {
    /// Command line wins over the environment log path, which wins over the file
    pub fn resolve(cfg: &Config, cli: &CliArgs, env_log: Option<PathBuf>) -> Settings {
        let (w, h) = cli.size.unwrap_or((
            cfg.custom_w.clamp(CUSTOM_SIDE_MIN, CUSTOM_SIDE_MAX),
            cfg.custom_h.clamp(CUSTOM_SIDE_MIN, CUSTOM_SIDE_MAX),
        ));
        let custom = match (cli.mines, cli.ratio) {
            (Some(n), _) => Difficulty::new(w, h, n),
            (None, Some(r)) => Difficulty::from_ratio(w, h, r),
            (None, None) => Difficulty::new(w, h, cfg.custom_n),
        };
        let language = cli
            .lang
            .clone()
            .or_else(|| (!cfg.language.is_empty()).then(|| cfg.language.clone()))
            .unwrap_or_default();

        Settings {
            custom,
            start_index: if cli.overrides_difficulty() { PRESET_COUNT - 1 } else { 0 },
            ascii_icons: cfg.ascii_icons,
            language,
            log_file: cli.log_file.clone().or(env_log).or_else(|| cfg.log_file.clone()),
            log_level: cfg.log_level.clone(),
        }
    }
}
