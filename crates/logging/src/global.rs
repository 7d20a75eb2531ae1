//! crates/logging/src/global.rs
//! Process-wide default logger and its free-function entry points.

use std::sync::OnceLock;

use crate::logger::{Logger, keep_frame};
use crate::printf::Arg;
use crate::severity::Severity;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Returns the process-wide logger, creating it with default settings on first use.
///
/// The default instance writes to standard error with threshold
/// [`Severity::Error`]. Reconfigure it through the returned reference, or
/// replace it before first use with [`install_global`].
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(Logger::new)
}

/// Installs `logger` as the process-wide logger.
///
/// Fails and hands the logger back when the global instance already exists,
/// either from an earlier install or from a call to [`global`].
pub fn install_global(logger: Logger) -> Result<&'static Logger, Logger> {
    GLOBAL.set(logger)?;
    Ok(global())
}

/// Logs at [`Severity::Error`] through the global logger, naming the caller.
#[inline(never)]
#[track_caller]
pub fn error(template: &str, args: &[Arg<'_>]) {
    global().log_from_wrapper(Severity::Error, template, args);
    keep_frame();
}

/// Logs at [`Severity::Warning`] through the global logger, naming the caller.
#[inline(never)]
#[track_caller]
pub fn warn(template: &str, args: &[Arg<'_>]) {
    global().log_from_wrapper(Severity::Warning, template, args);
    keep_frame();
}

/// Logs at [`Severity::Informational`] through the global logger, naming the caller.
#[inline(never)]
#[track_caller]
pub fn info(template: &str, args: &[Arg<'_>]) {
    global().log_from_wrapper(Severity::Informational, template, args);
    keep_frame();
}

/// Logs at [`Severity::Debug`] through the global logger, naming the caller.
#[inline(never)]
#[track_caller]
pub fn debug(template: &str, args: &[Arg<'_>]) {
    global().log_from_wrapper(Severity::Debug, template, args);
    keep_frame();
}
