//! Property tests for the printf-style formatter.
//!
//! Formatting is total: any template with any argument list renders a string
//! without panicking, and text outside directives passes through verbatim.

use logging::{Arg, sprintf};
use proptest::prelude::*;

fn any_arg() -> impl Strategy<Value = ArgValue> {
    prop_oneof![
        any::<i64>().prop_map(ArgValue::Int),
        any::<u64>().prop_map(ArgValue::Uint),
        any::<f64>().prop_map(ArgValue::Float),
        "[ -~]{0,16}".prop_map(ArgValue::Str),
        any::<bool>().prop_map(ArgValue::Bool),
        any::<char>().prop_map(ArgValue::Char),
    ]
}

/// Owned stand-in for [`Arg`] so strategies can generate string values.
#[derive(Clone, Debug)]
enum ArgValue {
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    Bool(bool),
    Char(char),
}

impl ArgValue {
    fn as_arg(&self) -> Arg<'_> {
        match self {
            Self::Int(value) => Arg::Int(i128::from(*value)),
            Self::Uint(value) => Arg::Uint(u128::from(*value)),
            Self::Float(value) => Arg::Float(*value),
            Self::Str(value) => Arg::Str(value),
            Self::Bool(value) => Arg::Bool(*value),
            Self::Char(value) => Arg::Char(*value),
        }
    }
}

proptest! {
    /// Property: arbitrary templates and arguments never panic.
    #[test]
    fn formatting_is_total(
        template in "[ -~]{0,40}",
        values in prop::collection::vec(any_arg(), 0..6),
    ) {
        let args: Vec<Arg<'_>> = values.iter().map(ArgValue::as_arg).collect();
        let _ = sprintf(&template, &args);
    }

    /// Property: templates without `%` render unchanged when no arguments are given.
    #[test]
    fn literal_templates_pass_through(template in "[^%]{0,64}") {
        prop_assert_eq!(sprintf(&template, &[]), template);
    }

    /// Property: `%d` renders signed integers like `Display`.
    #[test]
    fn decimal_matches_display(value in any::<i64>()) {
        prop_assert_eq!(sprintf("%d", &[Arg::Int(i128::from(value))]), value.to_string());
    }

    /// Property: `%x` renders unsigned integers like `LowerHex`.
    #[test]
    fn hex_matches_lower_hex(value in any::<u64>()) {
        prop_assert_eq!(sprintf("%x", &[Arg::Uint(u128::from(value))]), format!("{value:x}"));
    }

    /// Property: `%s` reproduces any string argument.
    #[test]
    fn string_verb_reproduces_argument(value in ".{0,32}") {
        prop_assert_eq!(sprintf("%s", &[Arg::Str(&value)]), value);
    }
}
