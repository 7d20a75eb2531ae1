//! crates/logging/src/config.rs
//! Logger configuration and `LIT_LOG` directive parsing.

use std::borrow::Cow;

use super::error::ConfigError;
use super::prefix::PrefixTable;
use super::presentation::Presentation;
use super::severity::Severity;

/// Prefix placed before the level tag when none is configured.
pub const DEFAULT_PREFIX: &str = "LIT";

/// Environment variable read by [`LoggerConfig::from_env`].
pub const ENV_VAR: &str = "LIT_LOG";

/// Every setting of a [`Logger`](crate::Logger) except its sink.
///
/// Directive strings are comma-separated `key=value` tokens:
///
/// | Directive                | Effect                                          |
/// |--------------------------|-------------------------------------------------|
/// | `level=<severity>`       | sets the threshold (`threshold=` is an alias)   |
/// | `prefix=<text>`          | sets the prefix, which may be empty             |
/// | `timestamps=on\|off`     | selects [`Presentation`]                        |
/// | `custom-prefixes=on\|off`| enables or disables the prefix table            |
/// | `prefix.<severity>=<text>` | registers a tag and enables custom prefixes   |
///
/// # Examples
///
/// ```
/// use logging::{LoggerConfig, Presentation, Severity};
///
/// let config = LoggerConfig::from_directives("level=info, prefix=APP, timestamps=off").unwrap();
/// assert_eq!(config.threshold, Severity::Informational);
/// assert_eq!(config.prefix, "APP");
/// assert_eq!(config.presentation, Presentation::Plain);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoggerConfig {
    /// Text placed before the level tag inside the brackets.
    pub prefix: String,
    /// Least severe level that is still emitted.
    pub threshold: Severity,
    /// Whether lines start with a timestamp.
    pub presentation: Presentation,
    /// Whether [`LoggerConfig::prefixes`] is consulted for level tags.
    pub custom_prefixes: bool,
    /// Custom level tags.
    pub prefixes: PrefixTable,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            threshold: Severity::default(),
            presentation: Presentation::default(),
            custom_prefixes: false,
            prefixes: PrefixTable::new(),
        }
    }
}

impl LoggerConfig {
    /// Builds a configuration from the defaults plus a directive list.
    pub fn from_directives(list: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_directives(list)?;
        Ok(config)
    }

    /// Builds a configuration from the value `lookup` returns for [`ENV_VAR`].
    ///
    /// An absent variable yields the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(ENV_VAR) {
            Some(list) => Self::from_directives(&list),
            None => Ok(Self::default()),
        }
    }

    /// Builds a configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies every comma-separated directive in `list`; empty tokens are skipped.
    ///
    /// Directives before a failing token stay applied.
    pub fn apply_directives(&mut self, list: &str) -> Result<(), ConfigError> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_directive(token))
    }

    /// Applies a single `key=value` directive.
    pub fn apply_directive(&mut self, token: &str) -> Result<(), ConfigError> {
        let Some((key, value)) = token.split_once('=') else {
            let key = token.trim();
            return Err(if is_known_key(key) {
                ConfigError::MissingValue { key: key.to_owned() }
            } else {
                ConfigError::UnknownDirective { key: key.to_owned() }
            });
        };
        let key = key.trim();
        let value = value.trim();

        match key.to_ascii_lowercase().as_str() {
            "level" | "threshold" => self.threshold = value.parse()?,
            "prefix" => self.prefix = value.to_owned(),
            "timestamps" => self.presentation = Presentation::from(parse_switch(key, value)?),
            "custom-prefixes" => self.custom_prefixes = parse_switch(key, value)?,
            lowered => {
                let Some(name) = lowered.strip_prefix("prefix.") else {
                    return Err(ConfigError::UnknownDirective { key: key.to_owned() });
                };
                let severity: Severity = name.parse()?;
                self.prefixes.set(severity, Cow::Owned(value.to_owned()));
                self.custom_prefixes = true;
            }
        }
        Ok(())
    }

    /// Returns the level tag rendered for `severity`.
    #[must_use]
    pub fn tag(&self, severity: Severity) -> &str {
        level_tag(self.custom_prefixes, &self.prefixes, severity)
    }
}

/// Picks the level tag: the table entry when custom tags are on, the rank otherwise.
pub(crate) fn level_tag(custom_prefixes: bool, prefixes: &PrefixTable, severity: Severity) -> &str {
    if custom_prefixes {
        prefixes.tag(severity)
    } else {
        severity.rank_str()
    }
}

fn is_known_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    matches!(
        key.as_str(),
        "level" | "threshold" | "prefix" | "timestamps" | "custom-prefixes"
    ) || key.starts_with("prefix.")
}

fn parse_switch(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidSwitch {
            key: key.to_owned(),
            value: value.to_owned(),
        }),
    }
}
