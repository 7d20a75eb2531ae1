//! crates/logging/src/guard.rs
//! Scoped threshold override.

use crate::logger::Logger;
use crate::severity::Severity;

/// RAII guard that temporarily overrides a [`Logger`]'s threshold.
///
/// Instances are created by [`Logger::scoped_threshold`]. Dropping the guard
/// restores the threshold that was in effect before the override. The guard
/// dereferences to the logger so calls can be issued through it.
#[must_use = "dropping the guard immediately restores the previous threshold"]
pub struct ThresholdGuard<'a> {
    logger: &'a Logger,
    previous: Severity,
    restore: bool,
}

impl<'a> ThresholdGuard<'a> {
    pub(crate) const fn new(logger: &'a Logger, previous: Severity) -> Self {
        Self {
            logger,
            previous,
            restore: true,
        }
    }

    /// Returns the threshold that will be restored when the guard is dropped.
    #[must_use]
    pub const fn previous_threshold(&self) -> Severity {
        self.previous
    }

    /// Consumes the guard without restoring the previous threshold.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::{Logger, Severity};
    ///
    /// let logger = Logger::builder().sink(std::io::sink()).build();
    /// logger.scoped_threshold(Severity::Debug).persist();
    /// assert_eq!(logger.threshold(), Severity::Debug);
    /// ```
    pub fn persist(mut self) -> &'a Logger {
        self.restore = false;
        self.logger
    }
}

impl Drop for ThresholdGuard<'_> {
    fn drop(&mut self) {
        if self.restore {
            self.logger.set_threshold(self.previous);
        }
    }
}

impl std::ops::Deref for ThresholdGuard<'_> {
    type Target = Logger;

    fn deref(&self) -> &Self::Target {
        self.logger
    }
}

impl std::fmt::Debug for ThresholdGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThresholdGuard")
            .field("previous", &self.previous)
            .field("restore", &self.restore)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_logger() -> Logger {
        Logger::builder().sink(std::io::sink()).build()
    }

    #[test]
    fn previous_threshold_returns_stored_value() {
        let logger = quiet_logger();
        let guard = logger.scoped_threshold(Severity::Debug);
        assert_eq!(guard.previous_threshold(), Severity::Error);
    }

    #[test]
    fn drop_restores_previous_threshold() {
        let logger = quiet_logger();
        logger.set_threshold(Severity::Warning);
        {
            let guard = logger.scoped_threshold(Severity::Debug);
            assert_eq!(guard.threshold(), Severity::Debug);
        }
        assert_eq!(logger.threshold(), Severity::Warning);
    }

    #[test]
    fn nested_guards_unwind_in_order() {
        let logger = quiet_logger();
        {
            let _outer = logger.scoped_threshold(Severity::Informational);
            {
                let _inner = logger.scoped_threshold(Severity::Debug);
                assert_eq!(logger.threshold(), Severity::Debug);
            }
            assert_eq!(logger.threshold(), Severity::Informational);
        }
        assert_eq!(logger.threshold(), Severity::Error);
    }

    #[test]
    fn persist_keeps_override() {
        let logger = quiet_logger();
        let same = logger.scoped_threshold(Severity::Warning).persist();
        assert!(std::ptr::eq(same, &logger));
        assert_eq!(logger.threshold(), Severity::Warning);
    }
}
