//! Configuration management for kako.
//!
//! Parses `kako.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.base_url`
//! - `site.remote_board_url`
//! - `tripcode.secure_salt`

mod expand;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use kako_renderer::autolink::LinkifyMode;
use kako_renderer::{Board, BoardCollection, DEFAULT_REMOTE_BOARD_URL, RenderOptions};
use kako_tripcode::{SaltError, SecureSalt};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "kako.toml";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site base URL.
    pub base_url: Option<String>,
    /// Override fragment-only backlinks.
    pub backlinks_hash_only: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub render: RenderConfig,
    tripcode: TripcodeConfigRaw,
    /// Boards the archive carries.
    pub boards: Vec<Board>,
    /// Country code to display name.
    pub countries: HashMap<String, String>,

    /// Decoded secure tripcode salt (set after loading).
    #[serde(skip)]
    pub secure_salt: SecureSalt,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            render: RenderConfig::default(),
            tripcode: TripcodeConfigRaw::default(),
            boards: Vec::new(),
            countries: HashMap::new(),
            secure_salt: SecureSalt::empty(),
            config_path: None,
        }
    }
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefix of every generated link. Empty for root-relative links.
    pub base_url: String,
    /// Site that quotes of boards not in `[[boards]]` point at.
    pub remote_board_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            remote_board_url: DEFAULT_REMOTE_BOARD_URL.to_owned(),
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Route of thread links.
    pub controller_method: String,
    /// Link same-page posts by fragment only.
    pub backlinks_hash_only: bool,
    /// Open autolinked URLs in a new tab.
    pub link_target_blank: bool,
    /// What the autolinker links: `url`, `email` or `both`.
    pub linkify: LinkifyMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            controller_method: options.controller_method,
            backlinks_hash_only: options.backlinks_hash_only,
            link_target_blank: options.link_target_blank,
            linkify: options.linkify,
        }
    }
}

/// Raw tripcode configuration as parsed from TOML (salt still encoded).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TripcodeConfigRaw {
    secure_salt: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.base_url`").
        field: String,
        /// Error message (e.g., "${`KAKO_SECURE_SALT`} not set").
        message: String,
    },
    /// Secure salt is not valid base64.
    #[error("Invalid tripcode.secure_salt: {0}")]
    Salt(#[from] SaltError),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `kako.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied after loading, taking precedence over
    /// config file values.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate_site()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_url) = &settings.base_url {
            self.site.base_url.clone_from(base_url);
        }
        if let Some(hash_only) = settings.backlinks_hash_only {
            self.render.backlinks_hash_only = hash_only;
        }
    }

    /// Search for the config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.secure_salt = SecureSalt::from_base64(&config.tripcode.secure_salt)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        require_non_empty(&self.render.controller_method, "render.controller_method")?;
        self.validate_boards()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        // Empty base URL gives root-relative links
        if !self.site.base_url.is_empty() {
            require_http_url(&self.site.base_url, "site.base_url")?;
        }
        require_non_empty(&self.site.remote_board_url, "site.remote_board_url")?;
        Ok(())
    }

    fn validate_boards(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for board in &self.boards {
            require_non_empty(&board.shortname, "boards.shortname")?;
            if !board
                .shortname
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(ConfigError::Validation(format!(
                    "boards.shortname must contain only letters, digits and underscores: {}",
                    board.shortname
                )));
            }
            if !seen.insert(board.shortname.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate board: {}",
                    board.shortname
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.base_url = expand::expand_env(&self.site.base_url, "site.base_url")?;
        self.site.remote_board_url =
            expand::expand_env(&self.site.remote_board_url, "site.remote_board_url")?;
        self.tripcode.secure_salt =
            expand::expand_env(&self.tripcode.secure_salt, "tripcode.secure_salt")?;
        Ok(())
    }

    /// Rendering options for the renderer.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            controller_method: self.render.controller_method.clone(),
            backlinks_hash_only: self.render.backlinks_hash_only,
            link_target_blank: self.render.link_target_blank,
            linkify: self.render.linkify,
            remote_board_url: self.site.remote_board_url.clone(),
        }
    }

    /// Board lookup built from `[[boards]]`.
    #[must_use]
    pub fn board_collection(&self) -> BoardCollection {
        self.boards.iter().cloned().collect()
    }

    /// Country names keyed by upper-cased code.
    #[must_use]
    pub fn country_names(&self) -> HashMap<String, String> {
        self.countries
            .iter()
            .map(|(code, name)| (code.to_uppercase(), name.clone()))
            .collect()
    }
}
