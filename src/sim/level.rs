/// Level loader.
///
/// ## Sources (priority order):
///   1. `levels/` directory (individual `.txt` files, sorted by file name)
///   2. Built-in embedded levels
///
/// ## Level format (`.txt`):
///   ```
///   # Level Name
///   <base rows>
///   ---
///   <dynamic rows>
///   ```
///
/// The name line is optional (the file stem is used instead). Blank
/// lines around either block are ignored. Both blocks must describe
/// rectangles of the same shape.
///
/// ## Cell legend:
///   'W' = Wall          'C' = Crate          'I' = Ice
///   'H' = Hole          '_' = Blank
///   'Y' 'G' 'B' 'R' = Target (yellow/green/blue/red)
///   'y' 'g' 'b' 'r' = Trophy of the same color
///   '>' '<' '^' 'v' = Player facing right/left/up/down

use std::path::Path;

use tracing::{info, warn};

use crate::config::GameConfig;
use crate::error::{BoardError, LevelError};
use crate::sim::board::Board;

const SEPARATOR: &str = "---";

/// Runtime level data (owned strings, loaded from file or embedded).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelDef {
    pub name: String,
    pub base: String,
    pub dynamic: String,
}

impl LevelDef {
    /// A fresh board for this level.
    pub fn board(&self) -> Result<Board, BoardError> {
        Board::new(&self.base, &self.dynamic)
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Every playable level: the configured directory if it yields any,
/// otherwise the embedded set.
pub fn load_levels(config: &GameConfig) -> Vec<LevelDef> {
    let dir = &config.levels_dir;
    if dir.is_dir() {
        match load_from_directory(dir) {
            Ok(levels) if !levels.is_empty() => {
                info!(dir = %dir.display(), count = levels.len(), "levels loaded");
                return levels;
            }
            Ok(_) => warn!(dir = %dir.display(), "no playable levels found"),
            Err(e) => warn!("{e}"),
        }
    }
    let levels = embedded_levels();
    info!(count = levels.len(), "using built-in levels");
    levels
}

/// Parse a single level from text content. `fallback_name` names the
/// level when the text has no `# Name` line.
pub fn parse_level(fallback_name: &str, content: &str) -> Result<LevelDef, LevelError> {
    let mut name: Option<String> = None;
    let mut blocks: [Vec<&str>; 2] = [vec![], vec![]];
    let mut section = 0;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed == SEPARATOR {
            section += 1;
            if section > 1 {
                return Err(format_error(&name, fallback_name, "more than one `---` separator"));
            }
            continue;
        }
        if let Some(title) = trimmed.strip_prefix('#') {
            if section == 0 && blocks[0].is_empty() && name.is_none() {
                name = Some(title.trim().to_string());
                continue;
            }
            return Err(format_error(&name, fallback_name, "`#` is only allowed on the name line"));
        }
        if trimmed.is_empty() {
            continue;
        }
        blocks[section].push(trimmed);
    }

    if section == 0 {
        return Err(format_error(&name, fallback_name, "missing `---` between base and dynamic layers"));
    }

    let name = name.filter(|n| !n.is_empty()).unwrap_or_else(|| fallback_name.to_string());
    let [base, dynamic] = blocks;
    let def = LevelDef {
        name,
        base: base.join("\n"),
        dynamic: dynamic.join("\n"),
    };

    // Validate up front so a broken file is rejected at load time.
    def.board().map_err(|source| LevelError::Board {
        name: def.name.clone(),
        source,
    })?;
    Ok(def)
}

fn format_error(name: &Option<String>, fallback: &str, reason: &str) -> LevelError {
    LevelError::Format {
        name: name.clone().unwrap_or_else(|| fallback.to_string()),
        reason: reason.to_string(),
    }
}

// ══════════════════════════════════════════════════════════════
// Directory loading (individual .txt files)
// ══════════════════════════════════════════════════════════════

/// Every `*.txt` level in `dir`, sorted by file name. Files that fail to
/// read or parse are skipped with a warning.
pub fn load_from_directory(dir: &Path) -> Result<Vec<LevelDef>, LevelError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LevelError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |e| e == "txt"))
        .collect();
    paths.sort();

    let mut levels = vec![];
    for path in paths {
        let stem = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let parsed = std::fs::read_to_string(&path)
            .map_err(|source| LevelError::Io { path: path.clone(), source })
            .and_then(|content| parse_level(&stem, &content));
        match parsed {
            Ok(def) => levels.push(def),
            Err(e) => warn!(file = %path.display(), "skipping level: {e}"),
        }
    }

    Ok(levels)
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels
// ══════════════════════════════════════════════════════════════

pub fn embedded_levels() -> Vec<LevelDef> {
    vec![
        make_embedded("Hole in One", &[
            "_______",
            "_____Y_",
            "_______",
        ], &[
            "WWWWWWW",
            "W>CHy_W",
            "WWWWWWW",
        ]),
        make_embedded("Four Colors", &[
            "________",
            "___R____",
            "________",
            "_B____Y_",
            "________",
            "___G____",
            "________",
        ], &[
            "__WWW___",
            "__W_WW__",
            "WWWr_WWW",
            "W_b>y__W",
            "WW_gWWWW",
            "_WW_W___",
            "__WWW___",
        ]),
        make_embedded("Thin Ice", &[
            "_________",
            "___III_R_",
            "_________",
            "_________",
            "_________",
        ], &[
            "WWWWWWWWW",
            "W>r___H_W",
            "W_C_____W",
            "W_______W",
            "WWWWWWWWW",
        ]),
    ]
}

fn make_embedded(name: &str, base: &[&str], dynamic: &[&str]) -> LevelDef {
    LevelDef {
        name: name.to_string(),
        base: base.join("\n"),
        dynamic: dynamic.join("\n"),
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
