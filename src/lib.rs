#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `lit` is the facade crate of the workspace. It re-exports the
//! [`logging`] crate, a leveled logger that names the calling file, line, and
//! function on every line, together with the sink adapters from
//! [`logging_sink`].
//!
//! # Examples
//!
//! Log through the process-wide logger with compile-time call-site capture:
//!
//! ```
//! lit::global().set_sink(std::io::sink());
//! lit::error!("cannot open %s: %v", "/etc/app.toml", "permission denied");
//! ```
//!
//! Or configure a dedicated instance from `LIT_LOG`-style directives:
//!
//! ```
//! use lit::{Logger, LoggerConfig, MemorySink};
//!
//! let config = LoggerConfig::from_directives("level=info,timestamps=off,prefix=").unwrap();
//! let sink = MemorySink::default();
//! let logger = Logger::with_config(config, sink.clone());
//! lit::info!(logger: &logger, "ready");
//! assert!(sink.contents().starts_with("[2] "));
//! ```

pub use logging::*;
pub use logging_sink::{CountingSink, MemorySink, SharedSink, WriteCounter};

pub use logging;
pub use logging_sink;
