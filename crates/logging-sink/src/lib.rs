#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides [`std::io::Write`] adapters for line-oriented
//! loggers that assemble each line in full and hand it over with a single
//! `write_all` call.
//!
//! # Design
//!
//! - [`SharedSink`] is a cloneable handle over `Arc<Mutex<W>>`. Each
//!   `write_all` holds the lock for the whole buffer, so several loggers or
//!   threads writing through clones of one handle interleave only at line
//!   boundaries.
//! - [`MemorySink`] is a [`SharedSink`] over `Vec<u8>` with helpers for
//!   inspecting captured output.
//! - [`CountingSink`] forwards to any writer and exposes a [`WriteCounter`]
//!   that keeps observing the counts after the sink has been moved.
//!
//! # Invariants
//!
//! - A poisoned lock never turns into a panic; the writer is recovered.
//! - [`CountingSink`] counts one call per `write_all`, however many partial
//!   writes the inner writer performs.
//!
//! # Errors
//!
//! Writes surface the [`std::io::Error`] values of the wrapped writer
//! unchanged.
//!
//! # Examples
//!
//! ```
//! use std::io::Write;
//! use logging_sink::{CountingSink, MemorySink};
//!
//! let memory = MemorySink::default();
//! let mut counting = CountingSink::new(memory.clone());
//! let counter = counting.counter();
//!
//! counting.write_all(b"[LIT0] main.rs:3:main() ready\n")?;
//! assert_eq!(memory.lines(), ["[LIT0] main.rs:3:main() ready"]);
//! assert_eq!(counter.calls(), 1);
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! # See also
//!
//! - `logging` for the logger that writes into these sinks.

mod counting;
mod shared;

pub use counting::{CountingSink, WriteCounter};
pub use shared::{MemorySink, SharedSink};
