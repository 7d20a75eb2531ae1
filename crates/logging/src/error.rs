//! crates/logging/src/error.rs
//! Errors raised while parsing logger configuration.

use crate::severity::ParseSeverityError;

/// Error returned when a configuration directive cannot be applied.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The directive key is not recognised.
    #[error("unknown logging directive `{key}`")]
    UnknownDirective {
        /// Key as written by the user.
        key: String,
    },
    /// The directive has no `=value` part.
    #[error("logging directive `{key}` requires a value")]
    MissingValue {
        /// Key of the incomplete directive.
        key: String,
    },
    /// An on/off directive received something other than a switch value.
    #[error("invalid value `{value}` for logging directive `{key}`; expected on or off")]
    InvalidSwitch {
        /// Key of the directive.
        key: String,
        /// Rejected value.
        value: String,
    },
    /// A severity name or rank did not parse.
    #[error(transparent)]
    Severity(#[from] ParseSeverityError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    #[test]
    fn messages_name_the_directive() {
        let err = ConfigError::UnknownDirective { key: "colour".into() };
        assert_eq!(err.to_string(), "unknown logging directive `colour`");

        let err = ConfigError::InvalidSwitch {
            key: "timestamps".into(),
            value: "maybe".into(),
        };
        assert!(err.to_string().contains("`maybe`"));
    }

    #[test]
    fn severity_errors_are_transparent() {
        let parse = "loud".parse::<Severity>().unwrap_err();
        let err = ConfigError::from(parse.clone());
        assert_eq!(err.to_string(), parse.to_string());
    }
}
