//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.unilist/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::card::{CardVariant, DEFAULT_ELEVATION};
use crate::core::search::{DEFAULT_DEBOUNCE, SearchOptions};
use crate::core::theme::{ColorScheme, ThemeColorOverrides, ThemeType};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UnilistConfig {
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub card: CardConfigFile,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PaginationConfig {
    pub page_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchConfig {
    pub fields: Option<Vec<String>>,
    pub debounce_ms: Option<u64>,
    pub case_sensitive: Option<bool>,
    pub highlight: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ThemeConfig {
    pub kind: Option<ThemeType>,
    pub scheme: Option<ColorScheme>,
    #[serde(default)]
    pub colors: ThemeColorOverrides,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CardConfigFile {
    pub variant: Option<CardVariant>,
    pub elevation: Option<u8>,
    pub title_field: Option<String>,
    pub subtitle_field: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_TITLE_FIELD: &str = "title";
pub const DEFAULT_SUBTITLE_FIELD: &str = "subtitle";

// ============================================================================
// CLI Overrides
// ============================================================================

/// Values given on the command line. `None` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub page_size: Option<usize>,
    pub fields: Option<Vec<String>>,
    pub theme: Option<ThemeType>,
    pub scheme: Option<ColorScheme>,
    pub card: Option<CardVariant>,
    pub highlight: bool,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub page_size: usize,
    pub search: SearchOptions,
    pub theme: ThemeType,
    pub scheme: ColorScheme,
    pub custom_colors: ThemeColorOverrides,
    pub card_variant: CardVariant,
    pub elevation: u8,
    pub title_field: String,
    pub subtitle_field: String,
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

/// Returns the path to `~/.unilist/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".unilist").join("config.toml"))
}

/// Load config from `~/.unilist/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `UnilistConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<UnilistConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(UnilistConfig::default());
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(UnilistConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<UnilistConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r##"# Unilist Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [pagination]
# page_size = 20                     # Or set UNILIST_PAGE_SIZE

# [search]
# fields = ["title", "subtitle"]
# debounce_ms = 300                  # Or set UNILIST_DEBOUNCE_MS
# case_sensitive = false
# highlight = true

# [theme]
# kind = "dark"                      # "light", "dark", "auto", "custom" (or UNILIST_THEME)
# scheme = "purple"                  # "blue", "green", "purple", "orange", "red"

# [theme.colors]                     # Any subset; makes the theme "custom"
# primary = "#FF2D55"

# [card]
# variant = "outlined"               # "elevated", "outlined", "filled", "gradient", "glass"
# elevation = 5
# title_field = "title"
# subtitle_field = "subtitle"
"##;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &UnilistConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &UnilistConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Page size: CLI → env → config → default
    let page_size = cli
        .page_size
        .or_else(|| parse_env(&env, "UNILIST_PAGE_SIZE"))
        .or(config.pagination.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .max(1);

    // Debounce: env → config → default
    let debounce = parse_env::<u64>(&env, "UNILIST_DEBOUNCE_MS")
        .or(config.search.debounce_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_DEBOUNCE);

    // Theme: CLI → env → config → default
    let theme = cli
        .theme
        .or_else(|| parse_env(&env, "UNILIST_THEME"))
        .or(config.theme.kind)
        .unwrap_or_default();

    let fields = cli
        .fields
        .clone()
        .or_else(|| config.search.fields.clone())
        .unwrap_or_else(|| vec![DEFAULT_TITLE_FIELD.to_string(), DEFAULT_SUBTITLE_FIELD.to_string()]);

    let search = SearchOptions {
        fields,
        case_sensitive: config.search.case_sensitive.unwrap_or(false),
        highlight: cli.highlight || config.search.highlight.unwrap_or(false),
        debounce,
        ..SearchOptions::default()
    };

    ResolvedConfig {
        page_size,
        search,
        theme,
        scheme: cli.scheme.or(config.theme.scheme).unwrap_or_default(),
        custom_colors: config.theme.colors.clone(),
        card_variant: cli.card.or(config.card.variant).unwrap_or_default(),
        elevation: config.card.elevation.unwrap_or(DEFAULT_ELEVATION),
        title_field: config
            .card
            .title_field
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE_FIELD.to_string()),
        subtitle_field: config
            .card
            .subtitle_field
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBTITLE_FIELD.to_string()),
    }
}

/// Reads and parses an env var, ignoring (with a warning) values that don't parse.
fn parse_env<T: std::str::FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::HexColor;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = UnilistConfig::default();
        assert!(config.pagination.page_size.is_none());
        assert!(config.theme.colors.is_empty());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&UnilistConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(resolved.search.debounce, DEFAULT_DEBOUNCE);
        assert_eq!(resolved.search.fields, vec!["title", "subtitle"]);
        assert!(!resolved.search.highlight);
        assert_eq!(resolved.theme, ThemeType::Light);
        assert_eq!(resolved.card_variant, CardVariant::Elevated);
        assert_eq!(resolved.elevation, DEFAULT_ELEVATION);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = parse_config(
            r#"
[pagination]
page_size = 5

[search]
fields = ["name"]
debounce_ms = 50
case_sensitive = true
highlight = true

[theme]
kind = "dark"
scheme = "orange"

[card]
variant = "glass"
elevation = 2
title_field = "name"
"#,
        )
        .unwrap();
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.page_size, 5);
        assert_eq!(resolved.search.fields, vec!["name"]);
        assert_eq!(resolved.search.debounce, Duration::from_millis(50));
        assert!(resolved.search.case_sensitive);
        assert!(resolved.search.highlight);
        assert_eq!(resolved.theme, ThemeType::Dark);
        assert_eq!(resolved.scheme, ColorScheme::Orange);
        assert_eq!(resolved.card_variant, CardVariant::Glass);
        assert_eq!(resolved.elevation, 2);
        assert_eq!(resolved.title_field, "name");
        assert_eq!(resolved.subtitle_field, DEFAULT_SUBTITLE_FIELD);
    }

    #[test]
    fn test_env_overrides_config_and_cli_overrides_env() {
        let config = parse_config("[pagination]\npage_size = 5\n[theme]\nkind = \"light\"").unwrap();
        let env = |key: &str| match key {
            "UNILIST_PAGE_SIZE" => Some("7".to_string()),
            "UNILIST_THEME" => Some("dark".to_string()),
            "UNILIST_DEBOUNCE_MS" => Some("10".to_string()),
            _ => None,
        };

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.page_size, 7);
        assert_eq!(resolved.theme, ThemeType::Dark);
        assert_eq!(resolved.search.debounce, Duration::from_millis(10));

        let cli = CliOverrides {
            page_size: Some(9),
            theme: Some(ThemeType::Auto),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.page_size, 9);
        assert_eq!(resolved.theme, ThemeType::Auto);
    }

    #[test]
    fn test_invalid_env_value_is_ignored() {
        let env = |key: &str| (key == "UNILIST_PAGE_SIZE").then(|| "lots".to_string());
        let resolved = resolve_with_env(&UnilistConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_zero_page_size_is_raised_to_one() {
        let cli = CliOverrides {
            page_size: Some(0),
            ..Default::default()
        };
        let resolved = resolve_with_env(&UnilistConfig::default(), &cli, no_env);
        assert_eq!(resolved.page_size, 1);
    }

    #[test]
    fn test_cli_highlight_flag_turns_highlighting_on() {
        let cli = CliOverrides {
            highlight: true,
            fields: Some(vec!["name".to_string()]),
            ..Default::default()
        };
        let resolved = resolve_with_env(&UnilistConfig::default(), &cli, no_env);
        assert!(resolved.search.highlight);
        assert_eq!(resolved.search.fields, vec!["name"]);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let config = parse_config("[theme.colors]\nprimary = \"#FF2D55\"\n").unwrap();
        assert_eq!(config.theme.colors.primary, Some(HexColor::rgb(0xFF, 0x2D, 0x55)));
        assert!(config.theme.kind.is_none());
        assert!(config.search.fields.is_none());
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = parse_config("[pagination]\npage_size = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("config parse error"));
    }
}
