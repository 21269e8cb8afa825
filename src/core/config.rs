//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.eeon/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::emoji::EmojiLimit;
use crate::core::prompt::InstructionTemplate;
use crate::inference::providers::gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::visitors::geo::DEFAULT_GEO_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EeonConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub visitors: VisitorsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub emoji_limit: Option<EmojiLimit>,
    pub instruction_template: Option<String>,
    pub instruction_template_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VisitorsConfig {
    pub database_url: Option<String>,
    pub geo_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
/// Used by `eeon serve` when no database is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://eeon.db?mode=rwc";

// ============================================================================
// Resolved Config (concrete values, Options only where absence means "off")
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub emoji_limit: EmojiLimit,
    pub instruction_template: InstructionTemplate,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    /// `None` disables visitor logging in the chat front-ends.
    pub database_url: Option<String>,
    pub geo_base_url: String,
    pub host: String,
    pub port: u16,
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub emoji_limit: Option<EmojiLimit>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.eeon`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".eeon"))
}

/// Returns the path to `~/.eeon/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.eeon/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `EeonConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<EeonConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(EeonConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(EeonConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<EeonConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: EeonConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config.general);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# eeon Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# emoji_limit = 4                          # 1..=10, larger values are clamped
# instruction_template = "... {emoji_limit} ..."
# instruction_template_file = "prompt.txt" # Path relative to ~/.eeon/

# [gemini]
# api_key = "..."                          # Or set GEMINI_API_KEY env var
# base_url = "https://generativelanguage.googleapis.com/v1"
# model = "gemini-pro"

# [visitors]
# database_url = "sqlite://eeon.db?mode=rwc"  # Or set DATABASE_URL env var
# geo_base_url = "https://ipapi.co"

# [server]
# host = "127.0.0.1"
# port = 3000
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &EeonConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env<F>(config: &EeonConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Blank env vars count as unset
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    // Emoji limit: CLI → config → default
    let emoji_limit = cli
        .emoji_limit
        .or(config.general.emoji_limit)
        .unwrap_or_default();

    let instruction_template = resolve_instruction_template(config, config_dir().as_deref());

    // Gemini: env → config → default
    let gemini_api_key = env("GEMINI_API_KEY").or_else(|| config.gemini.api_key.clone());
    let gemini_base_url = env("GEMINI_BASE_URL")
        .or_else(|| config.gemini.base_url.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());
    let gemini_model = env("GEMINI_MODEL")
        .or_else(|| config.gemini.model.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

    // Visitors: env → config (→ default for geo)
    let database_url = env("DATABASE_URL").or_else(|| config.visitors.database_url.clone());
    let geo_base_url = env("EEON_GEO_BASE_URL")
        .or_else(|| config.visitors.geo_base_url.clone())
        .unwrap_or_else(|| DEFAULT_GEO_BASE_URL.to_string());

    // Server: CLI → env → config → default
    let host = cli
        .host
        .clone()
        .or_else(|| env("EEON_HOST"))
        .or_else(|| config.server.host.clone())
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = cli
        .port
        .or_else(|| match env("EEON_PORT").map(|p| p.trim().parse::<u16>()) {
            Some(Ok(port)) => Some(port),
            Some(Err(e)) => {
                warn!("Ignoring invalid EEON_PORT: {}", e);
                None
            }
            None => None,
        })
        .or(config.server.port)
        .unwrap_or(DEFAULT_PORT);

    ResolvedConfig {
        emoji_limit,
        instruction_template,
        gemini_api_key,
        gemini_base_url,
        gemini_model,
        database_url,
        geo_base_url,
        host,
        port,
    }
}

/// Resolves the instruction template: inline wins over file, both win over default.
fn resolve_instruction_template(config: &EeonConfig, base_dir: Option<&Path>) -> InstructionTemplate {
    if let Some(ref template) = config.general.instruction_template {
        return InstructionTemplate::new(template.clone());
    }

    // Try loading from instruction_template_file (relative to ~/.eeon/)
    if let Some(ref file) = config.general.instruction_template_file
        && let Some(dir) = base_dir
    {
        let template_path = dir.join(file);
        match fs::read_to_string(&template_path) {
            Ok(contents) => {
                if !contents.trim().is_empty() {
                    info!("Loaded instruction template from {}", template_path.display());
                    return InstructionTemplate::new(contents);
                }
                warn!("Instruction template file is empty: {}", template_path.display());
            }
            Err(e) => {
                warn!(
                    "Failed to read instruction template file {}: {}",
                    template_path.display(),
                    e
                );
            }
        }
    }

    InstructionTemplate::default()
}
