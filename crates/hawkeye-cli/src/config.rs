//! Configuration Vault – reads/writes `~/.hawkeye/config.toml`.

use hawkeye_mapping::MapConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted user configuration stored in `~/.hawkeye/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// State tag every cell of a fresh map starts with.
    #[serde(default = "default_base_state")]
    pub base_state: String,

    /// Glyph printed by `/show` for cells that were never written.
    #[serde(default = "default_empty_glyph")]
    pub empty_glyph: char,

    /// Map dimensions, origins and starting pose.
    #[serde(default)]
    pub map: MapConfig,
}

fn default_base_state() -> String {
    ".".to_string()
}
fn default_empty_glyph() -> char {
    '?'
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_state: default_base_state(),
            empty_glyph: default_empty_glyph(),
            map: MapConfig::default(),
        }
    }
}

/// Return the path to `~/.hawkeye/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".hawkeye").join("config.toml")
}

/// Load the config from disk with `HAWKEYE_*` overrides applied.  Returns
/// `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    let mut cfg = load_from(&config_path())?;
    if let Some(cfg) = cfg.as_mut() {
        apply_env_overrides(cfg);
    }
    Ok(cfg)
}

/// Load the config from a specific path, without environment overrides.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    toml::from_str(&raw)
        .map(Some)
        .map_err(|e| format!("Failed to parse config: {}", e))
}

/// Apply `HAWKEYE_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `HAWKEYE_GLOBAL_WIDTH` | `map.global_width` |
/// | `HAWKEYE_GLOBAL_HEIGHT` | `map.global_height` |
/// | `HAWKEYE_LOCAL_WIDTH` | `map.local_width` |
/// | `HAWKEYE_LOCAL_HEIGHT` | `map.local_height` |
/// | `HAWKEYE_BASE_STATE` | `base_state` |
///
/// Values that do not parse as a size are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    let sizes = [
        ("HAWKEYE_GLOBAL_WIDTH", &mut cfg.map.global_width),
        ("HAWKEYE_GLOBAL_HEIGHT", &mut cfg.map.global_height),
        ("HAWKEYE_LOCAL_WIDTH", &mut cfg.map.local_width),
        ("HAWKEYE_LOCAL_HEIGHT", &mut cfg.map.local_height),
    ];
    for (var, field) in sizes {
        if let Ok(v) = std::env::var(var)
            && let Ok(n) = v.trim().parse::<usize>()
        {
            *field = n;
        }
    }
    if let Ok(v) = std::env::var("HAWKEYE_BASE_STATE") {
        cfg.base_state = v;
    }
}

/// Save the config to disk, creating `~/.hawkeye/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // Owner-only directory (rwx------) on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    // Owner-only file (rw-------) on Unix.
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| f.write_all(raw.as_bytes()))
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
