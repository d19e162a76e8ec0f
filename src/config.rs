/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or incomplete. A file
/// that exists but cannot be read or parsed also falls back to defaults;
/// the error is handed back so it can be logged once logging is up.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub levels_dir: PathBuf,
    pub frame: Duration,
    pub log: LogConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    /// `None` disables logging.
    pub file: Option<PathBuf>,
    /// `EnvFilter` directive; `RUST_LOG` overrides it.
    pub filter: String,
}

/// Button names per command, as understood by `ui::gamepad`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GamepadConfig {
    pub undo: Vec<String>,
    pub restart: Vec<String>,
    pub next: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid config: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    log: TomlLog,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_filter")]
    filter: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_undo")]
    undo: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_next")]
    next: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_levels_dir() -> String { "levels".into() }
fn default_frame_ms() -> u64 { 16 }
fn default_log_file() -> String { "trophy-sokoban.log".into() }
fn default_log_filter() -> String { "info".into() }

fn default_undo() -> Vec<String> { vec!["B".into(), "L1".into()] }
fn default_restart() -> Vec<String> { vec!["Y".into()] }
fn default_next() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            undo: default_undo(),
            restart: default_restart(),
            next: default_next(),
            quit: default_quit(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> (Self, Option<ConfigError>) {
        let search_dirs = candidate_dirs();
        let (toml_cfg, err) = match load_toml(&search_dirs) {
            Ok(cfg) => (cfg, None),
            Err(e) => (TomlConfig::default(), Some(e)),
        };
        (Self::resolve(toml_cfg, &search_dirs), err)
    }

    fn resolve(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        GameConfig {
            levels_dir: resolve_levels_dir(&toml_cfg.general.levels_dir, search_dirs),
            frame: Duration::from_millis(toml_cfg.general.frame_ms.max(1)),
            log: LogConfig {
                file: match toml_cfg.log.file.trim() {
                    "" => None,
                    f => Some(PathBuf::from(f)),
                },
                filter: toml_cfg.log.filter,
            },
            gamepad: GamepadConfig {
                undo: toml_cfg.gamepad.undo,
                restart: toml_cfg.gamepad.restart,
                next: toml_cfg.gamepad.next,
                quit: toml_cfg.gamepad.quit,
            },
        }
    }
}

/// Absolute paths are taken as-is; relative ones are looked up in the
/// candidate dirs and default to CWD-relative.
fn resolve_levels_dir(dir: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = PathBuf::from(dir);
    if path.is_absolute() {
        return path;
    }
    search_dirs
        .iter()
        .map(|d| d.join(dir))
        .find(|p| p.is_dir())
        .unwrap_or(path)
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable (symlinks resolved)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First `config.toml` found wins. None found → defaults.
fn load_toml(search_dirs: &[PathBuf]) -> Result<TomlConfig, ConfigError> {
    match search_dirs.iter().map(|d| d.join("config.toml")).find(|p| p.exists()) {
        Some(path) => read_toml(&path),
        None => Ok(TomlConfig::default()),
    }
}

fn read_toml(path: &Path) -> Result<TomlConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<TomlConfig>(&text).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}
