//! crates/logging/src/severity.rs
//! Severity levels and threshold comparison.

use std::fmt;
use std::str::FromStr;

/// Severity of a log line.
///
/// The variants are ordered by rank: a lower rank is more severe. A line is
/// emitted when its rank is less than or equal to the logger's threshold
/// rank, so [`Severity::Error`] is the least permissive threshold and
/// [`Severity::Debug`] the most permissive.
///
/// # Examples
///
/// ```
/// use logging::Severity;
///
/// assert!(Severity::Error < Severity::Debug);
/// assert!(Severity::Warning.permits_under(Severity::Informational));
/// assert!(!Severity::Debug.permits_under(Severity::Informational));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Severity {
    /// Unrecoverable errors that abort the current scope of work.
    #[default]
    Error = 0,
    /// Non-critical errors that do not require aborting the current scope.
    Warning = 1,
    /// Non-error informational output.
    Informational = 2,
    /// Verbose debugging output.
    Debug = 3,
}

impl Severity {
    /// Every severity in ascending rank order.
    pub const ALL: [Self; 4] = [Self::Error, Self::Warning, Self::Informational, Self::Debug];

    /// Returns the numeric rank of the severity.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Returns the severity with the given rank, if any.
    #[must_use]
    pub const fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            0 => Some(Self::Error),
            1 => Some(Self::Warning),
            2 => Some(Self::Informational),
            3 => Some(Self::Debug),
            _ => None,
        }
    }

    /// Returns the rank rendered as a decimal string, used as the default tag.
    #[must_use]
    pub const fn rank_str(self) -> &'static str {
        match self {
            Self::Error => "0",
            Self::Warning => "1",
            Self::Informational => "2",
            Self::Debug => "3",
        }
    }

    /// Returns the lowercase label of the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Informational => "info",
            Self::Debug => "debug",
        }
    }

    /// Reports whether a line of this severity passes the given threshold.
    #[must_use]
    pub const fn permits_under(self, threshold: Self) -> bool {
        self.rank() <= threshold.rank()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Severity`] from text or a rank fails.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unrecognised log severity `{input}`")]
pub struct ParseSeverityError {
    input: String,
}

impl ParseSeverityError {
    /// Returns the rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "error" | "err" | "0" => Ok(Self::Error),
            "warning" | "warn" | "1" => Ok(Self::Warning),
            "info" | "informational" | "2" => Ok(Self::Informational),
            "debug" | "3" => Ok(Self::Debug),
            _ => Err(ParseSeverityError {
                input: input.to_owned(),
            }),
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = ParseSeverityError;

    fn try_from(rank: u8) -> Result<Self, ParseSeverityError> {
        Self::from_rank(rank).ok_or_else(|| ParseSeverityError {
            input: rank.to_string(),
        })
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.rank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_declaration_order() {
        let ranks: Vec<u8> = Severity::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn from_rank_round_trips_every_severity() {
        for severity in Severity::ALL {
            assert_eq!(Severity::from_rank(severity.rank()), Some(severity));
        }
        assert_eq!(Severity::from_rank(4), None);
    }

    #[test]
    fn rank_str_matches_rank() {
        for severity in Severity::ALL {
            assert_eq!(severity.rank_str(), severity.rank().to_string());
        }
    }

    #[test]
    fn threshold_admits_equal_and_more_severe() {
        assert!(Severity::Error.permits_under(Severity::Error));
        assert!(!Severity::Warning.permits_under(Severity::Error));
        assert!(Severity::Informational.permits_under(Severity::Informational));
        assert!(!Severity::Debug.permits_under(Severity::Informational));
        for severity in Severity::ALL {
            assert!(severity.permits_under(Severity::Debug));
        }
    }

    #[test]
    fn parses_names_aliases_and_digits() {
        assert_eq!("error".parse(), Ok(Severity::Error));
        assert_eq!("WARN".parse(), Ok(Severity::Warning));
        assert_eq!(" informational ".parse(), Ok(Severity::Informational));
        assert_eq!("3".parse(), Ok(Severity::Debug));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = "verbose".parse::<Severity>().unwrap_err();
        assert_eq!(err.input(), "verbose");
        assert_eq!(err.to_string(), "unrecognised log severity `verbose`");
    }

    #[test]
    fn try_from_rejects_out_of_range_rank() {
        assert_eq!(Severity::try_from(2), Ok(Severity::Informational));
        assert!(Severity::try_from(9).is_err());
    }

    #[test]
    fn default_is_least_permissive() {
        assert_eq!(Severity::default(), Severity::Error);
    }

    #[test]
    fn display_uses_lowercase_label() {
        assert_eq!(Severity::Informational.to_string(), "info");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
