//! Configuration file – `tankview.toml` in the working directory by
//! default, overridable via `TANKVIEW_CONFIG`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// WebSocket endpoint of the tank simulation server.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Opaque greeting sent once right after the handshake.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Path of the static SVG process diagram.
    #[serde(default = "default_diagram_path")]
    pub diagram_path: PathBuf,

    /// Path the rendered diagram is written to after each frame.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_server_url() -> String {
    "ws://localhost:7799".to_string()
}
fn default_greeting() -> String {
    tankview_client::connection::DEFAULT_GREETING.to_string()
}
fn default_diagram_path() -> PathBuf {
    PathBuf::from("diagram.svg")
}
fn default_output_path() -> PathBuf {
    PathBuf::from("live.svg")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            greeting: default_greeting(),
            diagram_path: default_diagram_path(),
            output_path: default_output_path(),
        }
    }
}

/// Return the config path: `$TANKVIEW_CONFIG` or `./tankview.toml`.
pub fn config_path() -> PathBuf {
    std::env::var("TANKVIEW_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("tankview.toml"))
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config = toml::from_str(&raw)
        .map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `TANKVIEW_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `TANKVIEW_SERVER_URL` | `server_url` |
/// | `TANKVIEW_DIAGRAM` | `diagram_path` |
/// | `TANKVIEW_OUTPUT` | `output_path` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("TANKVIEW_SERVER_URL") {
        cfg.server_url = v;
    }
    if let Ok(v) = std::env::var("TANKVIEW_DIAGRAM") {
        cfg.diagram_path = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("TANKVIEW_OUTPUT") {
        cfg.output_path = PathBuf::from(v);
    }
}

/// Save the config to disk at the default path.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path, creating parent directories as
/// needed.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
