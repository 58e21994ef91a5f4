//! Tunables for the attribute parsers and for logging.
//!
//! Everything has a compiled-in default that matches stock xinetd. A TOML
//! file can override single values:
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [parser]
//! log_extra_min = 4096
//! default_syslog_level = "notice"
//! ```

use std::path::{Path, PathBuf};

use log::trace;
use serde::Deserialize;

use crate::nvlists::{SYSLOG_LEVELS, find_value};

/// Lower bound of the slack added to a file log's soft limit when no hard
/// limit is given.
pub const LOG_EXTRA_MIN: u64 = 5 * 1024;
/// Upper bound of that slack.
pub const LOG_EXTRA_MAX: u64 = 20 * 1024;
pub const DEFAULT_SERVICE_SYSLOG_LEVEL: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("unknown syslog level in config: {0}")]
    UnknownSyslogLevel(String),
    #[error("log_extra_min ({min}) is larger than log_extra_max ({max})")]
    ExtraRange { min: u64, max: u64 },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_to_stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            log_to_stdout: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    pub log_extra_min: u64,
    pub log_extra_max: u64,
    /// Syslog level used by `log_type = SYSLOG <facility>` without a level.
    pub default_syslog_level: String,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            log_extra_min: LOG_EXTRA_MIN,
            log_extra_max: LOG_EXTRA_MAX,
            default_syslog_level: DEFAULT_SERVICE_SYSLOG_LEVEL.to_owned(),
        }
    }
}

impl ParserSettings {
    /// The numeric value of `default_syslog_level`. Validated on load, so a
    /// miss only happens for hand-built settings.
    #[must_use]
    pub fn default_syslog_level(&self) -> libc::c_int {
        find_value(SYSLOG_LEVELS, &self.default_syslog_level).unwrap_or(libc::LOG_INFO)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if find_value(SYSLOG_LEVELS, &self.default_syslog_level).is_none() {
            return Err(ConfigError::UnknownSyslogLevel(
                self.default_syslog_level.clone(),
            ));
        }
        if self.log_extra_min > self.log_extra_max {
            return Err(ConfigError::ExtraRange {
                min: self.log_extra_min,
                max: self.log_extra_max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    logging: LoggingConfig,
    parser: ParserSettings,
}

pub fn parse_config(content: &str, path: &Path) -> Result<(LoggingConfig, ParserSettings), ConfigError> {
    let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })?;
    file.parser.validate()?;
    Ok((file.logging, file.parser))
}

/// Load the tunables from `path`, or return the defaults if no path is given.
pub fn load_config(path: Option<&Path>) -> Result<(LoggingConfig, ParserSettings), ConfigError> {
    let Some(path) = path else {
        trace!("No config file given, using compiled-in defaults");
        return Ok((LoggingConfig::default(), ParserSettings::default()));
    };
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse_config(&content, path)
}
