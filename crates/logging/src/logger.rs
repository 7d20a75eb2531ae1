//! crates/logging/src/logger.rs
//! The leveled line logger.

use std::borrow::Cow;
use std::cell::Cell;
use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::panic::Location;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::caller::{self, CallSite};
use crate::config::{self, LoggerConfig};
use crate::error::ConfigError;
use crate::guard::ThresholdGuard;
use crate::prefix::PrefixTable;
use crate::presentation::Presentation;
use crate::printf::{self, Arg};
use crate::severity::Severity;
use crate::timestamp::Timestamp;

/// Stack depth used by the fixed-severity entry points: the frame that
/// called [`Logger::error`] and friends.
pub const WRAPPER_CALLDEPTH: usize = 2;

/// Scratch buffers that grow beyond this capacity are released after use.
const SCRATCH_RETAIN: usize = 64 * 1024;

thread_local! {
    static SCRATCH: Cell<String> = const { Cell::new(String::new()) };
}

/// Boxed sink owned by a [`Logger`].
pub type BoxedSink = Box<dyn Write + Send>;

struct Tags {
    prefix: String,
    custom_prefixes: bool,
    prefixes: PrefixTable,
}

impl Tags {
    fn push_tag(&self, line: &mut String, severity: Severity) {
        line.push_str(&self.prefix);
        line.push_str(config::level_tag(self.custom_prefixes, &self.prefixes, severity));
    }
}

/// A leveled line logger writing `[{prefix}{level}] {file}:{line}:{function}() {message}`.
///
/// Every setting can be changed through `&self` at any time; changes apply to
/// the next call. The threshold lives in an atomic so suppressed calls cost a
/// single load. The sink is serialised by a mutex and each admitted call
/// performs exactly one `write_all` of a fully assembled line.
///
/// # Examples
///
/// ```
/// use logging::{Arg, Logger, Presentation, Severity};
/// use logging_sink::MemorySink;
///
/// let sink = MemorySink::default();
/// let logger = Logger::builder()
///     .threshold(Severity::Informational)
///     .presentation(Presentation::Plain)
///     .sink(sink.clone())
///     .build();
///
/// logger.info("listening on port %d", &[Arg::Int(8080)]);
/// logger.debug("suppressed", &[]);
///
/// let lines = sink.lines();
/// assert_eq!(lines.len(), 1);
/// assert!(lines[0].starts_with("[LIT2] "));
/// assert!(lines[0].ends_with("() listening on port 8080"));
/// ```
pub struct Logger {
    threshold: AtomicU8,
    timestamps: AtomicBool,
    tags: RwLock<Tags>,
    sink: Mutex<BoxedSink>,
    failed_writes: AtomicU64,
}

impl Logger {
    /// Creates a logger with default settings writing to standard error.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default(), io::stderr())
    }

    /// Creates a logger from `config` writing to `sink`.
    #[must_use]
    pub fn with_config<W>(config: LoggerConfig, sink: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::from_parts(config, Box::new(sink))
    }

    /// Creates a stderr logger configured from the `LIT_LOG` environment variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::with_config(LoggerConfig::from_env()?, io::stderr()))
    }

    /// Starts building a logger from the default configuration.
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    fn from_parts(config: LoggerConfig, sink: BoxedSink) -> Self {
        let LoggerConfig {
            prefix,
            threshold,
            presentation,
            custom_prefixes,
            prefixes,
        } = config;
        Self {
            threshold: AtomicU8::new(threshold.rank()),
            timestamps: AtomicBool::new(presentation.includes_timestamp()),
            tags: RwLock::new(Tags {
                prefix,
                custom_prefixes,
                prefixes,
            }),
            sink: Mutex::new(sink),
            failed_writes: AtomicU64::new(0),
        }
    }

    /// Returns the current threshold.
    #[must_use]
    pub fn threshold(&self) -> Severity {
        Severity::from_rank(self.threshold.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Sets the threshold, returning the previous one.
    pub fn set_threshold(&self, threshold: Severity) -> Severity {
        let previous = self.threshold.swap(threshold.rank(), Ordering::Relaxed);
        Severity::from_rank(previous).unwrap_or_default()
    }

    /// Overrides the threshold until the returned guard is dropped.
    pub fn scoped_threshold(&self, threshold: Severity) -> ThresholdGuard<'_> {
        let previous = self.set_threshold(threshold);
        ThresholdGuard::new(self, previous)
    }

    /// Reports whether a line of `severity` would currently be emitted.
    #[inline]
    #[must_use]
    pub fn enabled(&self, severity: Severity) -> bool {
        severity.rank() <= self.threshold.load(Ordering::Relaxed)
    }

    /// Returns the current presentation.
    #[must_use]
    pub fn presentation(&self) -> Presentation {
        Presentation::from(self.timestamps.load(Ordering::Relaxed))
    }

    /// Selects timestamped or plain lines.
    pub fn set_presentation(&self, presentation: Presentation) {
        self.timestamps
            .store(presentation.includes_timestamp(), Ordering::Relaxed);
    }

    /// Returns the prefix placed before the level tag.
    #[must_use]
    pub fn prefix(&self) -> String {
        self.read_tags().prefix.clone()
    }

    /// Replaces the prefix; an empty prefix is allowed.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.write_tags().prefix = prefix.into();
    }

    /// Reports whether custom level tags are enabled.
    #[must_use]
    pub fn custom_prefixes(&self) -> bool {
        self.read_tags().custom_prefixes
    }

    /// Enables or disables custom level tags without touching the table.
    pub fn set_custom_prefixes(&self, enabled: bool) {
        self.write_tags().custom_prefixes = enabled;
    }

    /// Returns the custom tag registered for `severity`, if any.
    #[must_use]
    pub fn prefix_for(&self, severity: Severity) -> Option<String> {
        self.read_tags().prefixes.get(severity).map(str::to_owned)
    }

    /// Registers a custom tag for `severity` and enables custom tags.
    ///
    /// Returns the previously registered tag.
    pub fn set_prefix_for(
        &self,
        severity: Severity,
        tag: impl Into<Cow<'static, str>>,
    ) -> Option<Cow<'static, str>> {
        let mut tags = self.write_tags();
        tags.custom_prefixes = true;
        tags.prefixes.set(severity, tag)
    }

    /// Removes the custom tag for `severity`, returning it.
    pub fn clear_prefix_for(&self, severity: Severity) -> Option<Cow<'static, str>> {
        self.write_tags().prefixes.clear(severity)
    }

    /// Returns a snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> LoggerConfig {
        let tags = self.read_tags();
        LoggerConfig {
            prefix: tags.prefix.clone(),
            threshold: self.threshold(),
            presentation: self.presentation(),
            custom_prefixes: tags.custom_prefixes,
            prefixes: tags.prefixes.clone(),
        }
    }

    /// Replaces every setting with the values in `config`; the sink is kept.
    pub fn reconfigure(&self, config: &LoggerConfig) {
        {
            let mut tags = self.write_tags();
            tags.prefix.clone_from(&config.prefix);
            tags.custom_prefixes = config.custom_prefixes;
            tags.prefixes.clone_from(&config.prefixes);
        }
        self.set_presentation(config.presentation);
        self.set_threshold(config.threshold);
    }

    /// Replaces the sink, returning the previous one.
    pub fn set_sink<W>(&self, sink: W) -> BoxedSink
    where
        W: Write + Send + 'static,
    {
        std::mem::replace(&mut *self.lock_sink(), Box::new(sink))
    }

    /// Returns how many lines were dropped because the sink rejected them.
    #[must_use]
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    /// Logs at [`Severity::Error`], naming the caller of this method.
    #[inline(never)]
    #[track_caller]
    pub fn error(&self, template: &str, args: &[Arg<'_>]) {
        self.log_from_wrapper(Severity::Error, template, args);
        keep_frame();
    }

    /// Logs at [`Severity::Warning`], naming the caller of this method.
    #[inline(never)]
    #[track_caller]
    pub fn warn(&self, template: &str, args: &[Arg<'_>]) {
        self.log_from_wrapper(Severity::Warning, template, args);
        keep_frame();
    }

    /// Logs at [`Severity::Informational`], naming the caller of this method.
    #[inline(never)]
    #[track_caller]
    pub fn info(&self, template: &str, args: &[Arg<'_>]) {
        self.log_from_wrapper(Severity::Informational, template, args);
        keep_frame();
    }

    /// Logs at [`Severity::Debug`], naming the caller of this method.
    #[inline(never)]
    #[track_caller]
    pub fn debug(&self, template: &str, args: &[Arg<'_>]) {
        self.log_from_wrapper(Severity::Debug, template, args);
        keep_frame();
    }

    /// Logs to `out` instead of the logger's sink, resolving the caller `calldepth` frames up.
    ///
    /// Depth `0` names `log_at` itself, `1` its caller, `2` the caller's
    /// caller. Wrappers around `log_at` pass one more than their own nesting
    /// so the line names the wrapper's caller. A depth beyond the stack
    /// renders `???:0:???()`.
    ///
    /// The threshold check comes first; suppressed calls touch neither the
    /// clock, the stack, nor `out`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::{Arg, Logger, Presentation, Severity};
    ///
    /// let logger = Logger::builder().presentation(Presentation::Plain).sink(std::io::sink()).build();
    /// let mut out = Vec::new();
    /// logger.log_at(&mut out, Severity::Error, 1, "code %d", &[Arg::Int(7)]);
    /// let line = String::from_utf8(out).unwrap();
    /// assert!(line.starts_with("[LIT0] "));
    /// assert!(line.ends_with(" code 7\n"));
    /// ```
    #[inline(never)]
    pub fn log_at<W>(
        &self,
        out: &mut W,
        severity: Severity,
        calldepth: usize,
        template: &str,
        args: &[Arg<'_>],
    ) where
        W: Write + ?Sized,
    {
        if !self.enabled(severity) {
            return;
        }
        let timestamp = self.capture_timestamp();
        let site = caller::resolve(calldepth);
        let line = self.render(timestamp, severity, &site, template, args);
        self.record(out.write_all(line.as_bytes()));
        return_scratch(line);
    }

    /// Logs to the logger's sink with an already captured call site.
    ///
    /// The logging macros route through this method; no stack inspection
    /// takes place.
    pub fn log_site(&self, severity: Severity, site: &CallSite, template: &str, args: &[Arg<'_>]) {
        if !self.enabled(severity) {
            return;
        }
        let timestamp = self.capture_timestamp();
        self.emit(timestamp, severity, site, template, args);
    }

    /// Entry used by fixed-depth wrappers; names the wrapper's caller.
    ///
    /// File and line come from the `#[track_caller]` location, the function
    /// name from the frame [`WRAPPER_CALLDEPTH`] levels up.
    #[inline(never)]
    #[track_caller]
    pub(crate) fn log_from_wrapper(&self, severity: Severity, template: &str, args: &[Arg<'_>]) {
        if !self.enabled(severity) {
            return;
        }
        let location = Location::caller();
        let timestamp = self.capture_timestamp();
        let site = caller::resolve(WRAPPER_CALLDEPTH).at_location(location);
        self.emit(timestamp, severity, &site, template, args);
    }

    fn emit(
        &self,
        timestamp: Option<Timestamp>,
        severity: Severity,
        site: &CallSite,
        template: &str,
        args: &[Arg<'_>],
    ) {
        let line = self.render(timestamp, severity, site, template, args);
        let result = self.lock_sink().write_all(line.as_bytes());
        self.record(result);
        return_scratch(line);
    }

    fn capture_timestamp(&self) -> Option<Timestamp> {
        self.timestamps
            .load(Ordering::Relaxed)
            .then(Timestamp::now)
    }

    fn render(
        &self,
        timestamp: Option<Timestamp>,
        severity: Severity,
        site: &CallSite,
        template: &str,
        args: &[Arg<'_>],
    ) -> String {
        let mut line = take_scratch();
        if let Some(timestamp) = timestamp {
            let _ = write!(line, "{timestamp} ");
        }
        line.push('[');
        self.read_tags().push_tag(&mut line, severity);
        let _ = write!(line, "] {site} ");
        printf::format_into(&mut line, template, args);
        line.push('\n');
        line
    }

    fn record(&self, result: io::Result<()>) {
        if let Err(error) = result {
            let failures = self.failed_writes.fetch_add(1, Ordering::Relaxed) + 1;
            report_write_failure(&error, failures);
        }
    }

    fn read_tags(&self) -> RwLockReadGuard<'_, Tags> {
        self.tags.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tags(&self) -> RwLockWriteGuard<'_, Tags> {
        self.tags.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_sink(&self) -> MutexGuard<'_, BoxedSink> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold())
            .field("presentation", &self.presentation())
            .field("prefix", &self.read_tags().prefix)
            .field("failed_writes", &self.failed_writes())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Logger`].
///
/// Starts from [`LoggerConfig::default`] and standard error.
#[derive(Default)]
#[must_use]
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<BoxedSink>,
}

impl LoggerBuilder {
    /// Replaces every setting with `config`.
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    /// Sets the threshold.
    pub fn threshold(mut self, threshold: Severity) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Sets the presentation.
    pub fn presentation(mut self, presentation: Presentation) -> Self {
        self.config.presentation = presentation;
        self
    }

    /// Enables or disables custom level tags.
    pub fn custom_prefixes(mut self, enabled: bool) -> Self {
        self.config.custom_prefixes = enabled;
        self
    }

    /// Registers a custom tag for `severity` and enables custom tags.
    pub fn prefix_for(mut self, severity: Severity, tag: impl Into<Cow<'static, str>>) -> Self {
        self.config.prefixes.set(severity, tag);
        self.config.custom_prefixes = true;
        self
    }

    /// Sets the sink.
    pub fn sink<W>(mut self, sink: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Builds the logger.
    #[must_use]
    pub fn build(self) -> Logger {
        let sink = self.sink.unwrap_or_else(|| Box::new(io::stderr()));
        Logger::from_parts(self.config, sink)
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("config", &self.config)
            .field("custom_sink", &self.sink.is_some())
            .finish()
    }
}

/// Keeps a wrapper's call out of tail position so its frame stays on the stack.
#[inline(never)]
pub(crate) fn keep_frame() {
    std::hint::black_box(());
}

fn take_scratch() -> String {
    SCRATCH.try_with(Cell::take).unwrap_or_default()
}

fn return_scratch(mut line: String) {
    if line.capacity() > SCRATCH_RETAIN {
        return;
    }
    line.clear();
    let _ = SCRATCH.try_with(|slot| slot.set(line));
}

#[cfg(feature = "tracing")]
fn report_write_failure(error: &io::Error, failures: u64) {
    tracing::warn!(
        target: "lit::sink",
        %error,
        failures,
        "dropped log line after sink write failure"
    );
}

#[cfg(not(feature = "tracing"))]
fn report_write_failure(_error: &io::Error, _failures: u64) {}

#[cfg(test)]
mod tests;
