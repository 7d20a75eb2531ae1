//! crates/logging/src/presentation.rs
//! Line presentation: timestamped or plain.

/// Controls whether each emitted line starts with a local-time timestamp.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Presentation {
    /// Prefix every line with `YYYY-MM-DD HH:MM:SS` and a space.
    #[default]
    Timestamped,
    /// Start every line directly with the bracketed tag.
    Plain,
}

impl Presentation {
    /// Reports whether lines carry a timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::Presentation;
    ///
    /// assert!(Presentation::Timestamped.includes_timestamp());
    /// assert!(!Presentation::Plain.includes_timestamp());
    /// ```
    #[must_use]
    pub const fn includes_timestamp(self) -> bool {
        matches!(self, Self::Timestamped)
    }
}

impl From<bool> for Presentation {
    /// `true` selects [`Presentation::Timestamped`], `false` selects [`Presentation::Plain`].
    fn from(timestamps: bool) -> Self {
        if timestamps {
            Self::Timestamped
        } else {
            Self::Plain
        }
    }
}

impl From<Presentation> for bool {
    fn from(presentation: Presentation) -> Self {
        presentation.includes_timestamp()
    }
}
