// Configuration loading and parsing (config/card.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the single configuration file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "card.toml";

/// Upper bound for any per-panel rounding setting.
const MAX_DIGITS: usize = 6;

/// Upper bound for `data.header_row`; real exports put the header in the
/// first couple of rows.
const MAX_HEADER_ROW: usize = 64;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory every relative path in the file is resolved against.
    pub base_dir: PathBuf,
    pub team: TeamConfig,
    pub data: DataConfig,
    pub images: ImageConfig,
    pub export: ExportConfig,
    pub display: DisplayConfig,
    /// Per-player profile overrides keyed by full name ("First Last").
    pub players: HashMap<String, PlayerOverride>,
}

// ---------------------------------------------------------------------------
// card.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire card.toml file.
#[derive(Debug, Clone, Deserialize)]
struct CardFile {
    #[serde(default)]
    team: TeamConfig,
    data: DataConfig,
    images: ImageConfig,
    #[serde(default)]
    export: ExportConfig,
    #[serde(default)]
    display: DisplayConfig,
    #[serde(default)]
    players: HashMap<String, PlayerOverride>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    #[serde(default = "default_school")]
    pub school: String,
    #[serde(default = "default_grade")]
    pub default_grade: String,
}

impl Default for TeamConfig {
    fn default() -> Self {
        TeamConfig {
            school: default_school(),
            default_grade: default_grade(),
        }
    }
}

fn default_school() -> String {
    "Cushing Academy".to_string()
}

fn default_grade() -> String {
    "-".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub season_csv: String,
    #[serde(default = "default_header_row")]
    pub header_row: usize,
}

fn default_header_row() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    pub player_photo: String,
    pub spray_chart: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            dir: ".".to_string(),
        }
    }
}

/// Rounding digits for each stat panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub key_stats: usize,
    pub batting: usize,
    pub pitching: usize,
    pub fielding: usize,
    pub production: usize,
    pub pitching_detail: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            key_stats: 3,
            batting: 3,
            pitching: 2,
            fielding: 3,
            production: 0,
            pitching_detail: 2,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerOverride {
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl Config {
    /// Resolve a configured path against `base_dir` unless it is absolute.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    pub fn season_csv_path(&self) -> PathBuf {
        self.resolve_path(&self.data.season_csv)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.resolve_path(&self.export.dir)
    }

    pub fn spray_chart_path(&self) -> PathBuf {
        self.resolve_path(&self.images.spray_chart)
    }

    /// Photo for a player: their override if set, else the shared default.
    pub fn photo_for(&self, player_name: &str) -> PathBuf {
        let configured = self
            .players
            .get(player_name)
            .and_then(|o| o.photo.as_deref())
            .unwrap_or(&self.images.player_photo);
        self.resolve_path(configured)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/card.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    parse_config(&text, &path, base_dir)
}

/// Parse card.toml text. `path` is only used for error reporting.
fn parse_config(text: &str, path: &Path, base_dir: &Path) -> Result<Config, ConfigError> {
    let file: CardFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = Config {
        base_dir: base_dir.to_path_buf(),
        team: file.team,
        data: file.data,
        images: file.images,
        export: file.export,
        display: file.display,
        players: file.players,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/card.toml` from `defaults/card.toml` when the former is
/// missing. Returns the path written, or `None` when an existing config is
/// kept. An existing file is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let content = match std::fs::read(&source) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "no {CONFIG_FILE} under config/ or defaults/ in {}; \
                     run from the project root or pass --base-dir",
                    base_dir.display()
                ),
            });
        }
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to read {}: {e}", source.display()),
            });
        }
    };

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }

    // create_new: a config written concurrently wins over the defaults.
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            });
        }
    };
    std::io::Write::write_all(&mut dest, &content).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    })?;

    Ok(Some(target))
}

/// Convenience wrapper: seeds the config from defaults, then loads the config
/// relative to `base_dir`.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.season_csv.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.season_csv".into(),
            message: "must not be empty".into(),
        });
    }

    if config.data.header_row > MAX_HEADER_ROW {
        return Err(ConfigError::ValidationError {
            field: "data.header_row".into(),
            message: format!(
                "must be at most {MAX_HEADER_ROW}, got {}",
                config.data.header_row
            ),
        });
    }

    let d = &config.display;
    let digit_fields: &[(&str, usize)] = &[
        ("display.key_stats", d.key_stats),
        ("display.batting", d.batting),
        ("display.pitching", d.pitching),
        ("display.fielding", d.fielding),
        ("display.production", d.production),
        ("display.pitching_detail", d.pitching_detail),
    ];
    for (name, val) in digit_fields {
        if *val > MAX_DIGITS {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be at most {MAX_DIGITS}, got {val}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
