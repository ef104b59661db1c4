use super::types::*;
use crate::error_handling::types::ConfigError;
use clap::Parser;
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration structure that defines all runtime parameters.
///
/// This structure holds the complete configuration of the bridge server: the web endpoint, the
/// URL mount of the bundled client scripts, the session namespacing scheme and the limits applied
/// to sessions and pending retrieves. It uses the `clap` and `serde` derive macros for
/// respectively command-line and TOML file parsing; both sources share the same defaults.
///
/// # Examples
///
/// ```no_run
/// use xlocalstore::configuration::config::Config;
///
/// // Parse configuration from the command line, following `--config-file` if present
/// let config = Config::load().unwrap();
/// println!("Binding to: {}:{}", config.bind_address, config.port);
/// ```
///
/// # Fields Overview
///
/// - `config_file`: optional TOML file overriding every other command-line value
/// - `bind_address`: IP address of the web server
/// - `port`: TCP port of the web server
/// - `asset_mount`: URL path segment under which the client scripts are served
/// - `namespace_tag`: fixed tag in front of every session prefix
/// - `prefix_length`: number of random characters in a session prefix
/// - `retrieve_timeout_ms`: upper bound on waiting for a retrieve reply
/// - `max_sessions`: limit on concurrent websocket sessions
/// - `app_name`: application name forwarded to the client to scope its storage
#[derive(Parser, Debug, Clone, Deserialize)]
#[command(name = "xlocalstore")]
#[command(about = "Server-side bridge to browser local storage")]
#[serde(default)]
pub struct Config {
    /// Path to a TOML configuration file.
    ///
    /// When set, the file is read and replaces the values given on the command line.
    ///
    /// # Command Line
    /// Use `--config-file <PATH>` or the `XLOCALSTORE_CONFIG` environment variable
    #[arg(long, env = "XLOCALSTORE_CONFIG")]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// Network address to bind the web server to.
    #[arg(long, default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: String,

    /// Port number of the web server.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// URL path segment serving the bundled client scripts.
    ///
    /// Must be a single non-empty segment, without slashes.
    #[arg(long, default_value = DEFAULT_ASSET_MOUNT)]
    pub asset_mount: String,

    /// Tag placed in front of every generated session prefix.
    #[arg(long, default_value = DEFAULT_NAMESPACE_TAG)]
    pub namespace_tag: String,

    /// Length of the random part of a session prefix.
    #[arg(long, default_value_t = DEFAULT_PREFIX_LENGTH)]
    pub prefix_length: usize,

    /// Maximum wait for a retrieve reply, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_RETRIEVE_TIMEOUT_MS)]
    pub retrieve_timeout_ms: u64,

    /// Maximum number of concurrent sessions allowed
    ///
    /// When this limit is reached, new websocket connections are refused.
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,

    /// Application name the client uses to scope its storage instance.
    #[arg(long, default_value = DEFAULT_APP_NAME)]
    pub app_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_file: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            asset_mount: DEFAULT_ASSET_MOUNT.to_string(),
            namespace_tag: DEFAULT_NAMESPACE_TAG.to_string(),
            prefix_length: DEFAULT_PREFIX_LENGTH,
            retrieve_timeout_ms: DEFAULT_RETRIEVE_TIMEOUT_MS,
            max_sessions: DEFAULT_MAX_SESSIONS,
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}

impl Config {
    /// Parses the command line and, if `--config-file` is given, loads that file instead.
    ///
    ///
    /// When the command-line arguments cannot be parsed, `clap` prints a usage message and exits
    /// the process. Use [`Config::load_from`] to get a [`ConfigError::ArgsError`] instead.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(Config::parse())
    }

    /// Same as [`Config::load`] but from an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let parsed =
            Config::try_parse_from(args).map_err(|e| ConfigError::ArgsError(e.to_string()))?;
        Self::resolve(parsed)
    }

    fn resolve(parsed: Config) -> Result<Self, ConfigError> {
        match parsed.config_file.clone() {
            Some(path) => Self::from_file(&path),
            None => {
                parsed.validate()?;
                debug!("Configuration taken from command line");
                Ok(parsed)
            }
        }
    }

    /// Reads and validates a TOML configuration file.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Config =
            toml::from_str(&raw).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        config.config_file = Some(path.to_path_buf());
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Checks every field against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::BadIPFormatting(format!("{}: {}", self.bind_address, e)))?;

        if !(MIN_PREFIX_LENGTH..=MAX_PREFIX_LENGTH).contains(&self.prefix_length) {
            return Err(ConfigError::NotInRange(format!(
                "prefix_length must be within {}..={}, got {}",
                MIN_PREFIX_LENGTH, MAX_PREFIX_LENGTH, self.prefix_length
            )));
        }

        if self.max_sessions == 0 {
            return Err(ConfigError::NotInRange(
                "max_sessions must be at least 1".to_string(),
            ));
        }

        let tag = Regex::new(NAMESPACE_TAG_PATTERN)
            .map_err(|e| ConfigError::InvalidNamespaceTag(e.to_string()))?;
        if !tag.is_match(&self.namespace_tag) {
            return Err(ConfigError::InvalidNamespaceTag(self.namespace_tag.clone()));
        }

        if self.asset_mount.is_empty() || self.asset_mount.contains('/') {
            return Err(ConfigError::InvalidMount(self.asset_mount.clone()));
        }

        Ok(())
    }

    pub fn prefix_policy(&self) -> PrefixPolicy {
        PrefixPolicy {
            namespace_tag: self.namespace_tag.clone(),
            length: self.prefix_length,
        }
    }

    pub fn retrieve_timeout(&self) -> Duration {
        Duration::from_millis(self.retrieve_timeout_ms)
    }
}
