#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` is a leveled, caller-aware line logger. Each admitted call
//! writes one line naming the source file, line, and function that issued
//! it:
//!
//! ```text
//! 2024-05-01 09:30:00 [LIT0] server.rs:88:accept() connection refused: 111
//! ```
//!
//! Messages use printf-style templates (`%d`, `%s`, `%v`, `%x`, `%.2f`, ...)
//! rendered by [`printf`]. Mismatched, missing, or extra arguments never fail;
//! they render diagnostic tokens such as `%!d(string=x)` into the line.
//!
//! # Design
//!
//! - [`Severity`] ranks lines from [`Severity::Error`] (0) to
//!   [`Severity::Debug`] (3). A line is emitted when its rank is at most the
//!   threshold's rank.
//! - [`Logger`] owns the configuration and an opaque [`std::io::Write`] sink.
//!   The threshold is an atomic, the tag settings sit behind a read-write lock
//!   and the sink behind a mutex.
//! - Caller information comes from two paths: the [`error!`], [`warn!`],
//!   [`info!`], [`debug!`], and [`log!`] macros capture it at compile time,
//!   while [`Logger::error`] and friends, the free functions, and
//!   [`Logger::log_at`] walk the stack at run time via [`caller::resolve`].
//!   The fixed-severity entry points are `#[track_caller]`, so their file and
//!   line never depend on debuginfo; only the function name does.
//! - [`LoggerConfig`] can be built from `LIT_LOG` directives such as
//!   `level=debug,timestamps=off,prefix.error=FATAL`.
//!
//! # Invariants
//!
//! - Suppressed calls do no work beyond one atomic load: no clock read, no
//!   stack walk, no formatting, no write.
//! - Every admitted call performs exactly one `write_all` of a complete line
//!   ending in a single `\n`.
//! - Per-thread scratch buffers are reused and released once they exceed
//!   64 KiB.
//!
//! # Errors
//!
//! Logging calls never return errors. Sink failures are counted by
//! [`Logger::failed_writes`] and, with the default `tracing` feature,
//! reported as `tracing` warnings with target `lit::sink`. Only
//! configuration parsing is fallible ([`ConfigError`], [`ParseSeverityError`]).
//!
//! # Examples
//!
//! ```
//! use logging::{Logger, Presentation, Severity};
//! use logging_sink::MemorySink;
//!
//! let sink = MemorySink::default();
//! let logger = Logger::builder()
//!     .threshold(Severity::Informational)
//!     .presentation(Presentation::Plain)
//!     .sink(sink.clone())
//!     .build();
//!
//! fn serve(logger: &Logger) {
//!     logging::info!(logger: logger, "listening on %s:%d", "0.0.0.0", 8080);
//!     logging::debug!(logger: logger, "not shown");
//! }
//! serve(&logger);
//!
//! assert_eq!(sink.lines().len(), 1);
//! assert!(sink.lines()[0].ends_with(":serve() listening on 0.0.0.0:8080"));
//! ```
//!
//! # See also
//!
//! - `logging-sink` for shared, in-memory, and counting sinks.

pub mod caller;
mod config;
mod error;
mod global;
mod guard;
mod logger;
mod macros;
mod prefix;
mod presentation;
pub mod printf;
mod severity;
mod timestamp;

pub use caller::CallSite;
pub use config::{DEFAULT_PREFIX, ENV_VAR, LoggerConfig};
pub use error::ConfigError;
pub use global::{debug, error, global, info, install_global, warn};
pub use guard::ThresholdGuard;
pub use logger::{BoxedSink, Logger, LoggerBuilder, WRAPPER_CALLDEPTH};
pub use prefix::PrefixTable;
pub use presentation::Presentation;
pub use printf::{Arg, ToArg, format_into, sprintf};
pub use severity::{ParseSeverityError, Severity};
pub use timestamp::{TIMESTAMP_WIDTH, Timestamp};
