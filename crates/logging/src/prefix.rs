//! crates/logging/src/prefix.rs
//! Per-severity display strings for the bracketed tag.

use std::borrow::Cow;

use super::severity::Severity;

/// Optional custom display strings keyed by [`Severity`].
///
/// Severities without an entry fall back to their numeric rank, so an empty
/// table renders exactly like a logger with custom prefixes disabled.
///
/// # Examples
///
/// ```
/// use logging::{PrefixTable, Severity};
///
/// let table = PrefixTable::new().with(Severity::Error, "FATAL");
/// assert_eq!(table.tag(Severity::Error), "FATAL");
/// assert_eq!(table.tag(Severity::Debug), "3");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixTable {
    entries: [Option<Cow<'static, str>>; 4],
}

impl PrefixTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: [None, None, None, None],
        }
    }

    /// Returns the table with `tag` registered for `severity`.
    #[must_use]
    pub fn with(mut self, severity: Severity, tag: impl Into<Cow<'static, str>>) -> Self {
        self.set(severity, tag);
        self
    }

    /// Registers `tag` for `severity`, returning the previous entry.
    pub fn set(
        &mut self,
        severity: Severity,
        tag: impl Into<Cow<'static, str>>,
    ) -> Option<Cow<'static, str>> {
        self.entries[usize::from(severity.rank())].replace(tag.into())
    }

    /// Removes the entry for `severity`, returning it.
    pub fn clear(&mut self, severity: Severity) -> Option<Cow<'static, str>> {
        self.entries[usize::from(severity.rank())].take()
    }

    /// Returns the custom entry for `severity`, if one is registered.
    #[must_use]
    pub fn get(&self, severity: Severity) -> Option<&str> {
        self.entries[usize::from(severity.rank())].as_deref()
    }

    /// Returns the display string for `severity`.
    #[must_use]
    pub fn tag(&self, severity: Severity) -> &str {
        self.get(severity).unwrap_or(severity.rank_str())
    }

    /// Reports whether no severity has a custom entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }
}
