//! crates/logging-sink/src/counting.rs
//! Writer adapter that counts calls and bytes.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
struct Counts {
    calls: AtomicU64,
    bytes: AtomicU64,
}

/// Shared view of the counts recorded by a [`CountingSink`].
///
/// The handle stays valid after the sink itself has been moved into a logger.
#[derive(Clone, Debug, Default)]
pub struct WriteCounter {
    counts: Arc<Counts>,
}

impl WriteCounter {
    /// Returns the number of `write` and `write_all` calls, successful or not.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.counts.calls.load(Ordering::Relaxed)
    }

    /// Returns the number of bytes the inner writer accepted.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.counts.bytes.load(Ordering::Relaxed)
    }

    /// Resets both counts to zero.
    pub fn reset(&self) {
        self.counts.calls.store(0, Ordering::Relaxed);
        self.counts.bytes.store(0, Ordering::Relaxed);
    }

    fn record(&self, bytes: usize) {
        self.counts
            .bytes
            .fetch_add(u64::try_from(bytes).unwrap_or(u64::MAX), Ordering::Relaxed);
    }

    fn attempt(&self) {
        self.counts.calls.fetch_add(1, Ordering::Relaxed);
    }
}

/// Forwards writes to `W` while counting them.
///
/// A `write_all` counts as one call regardless of how many partial writes the
/// inner writer needs.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use logging_sink::CountingSink;
///
/// let mut sink = CountingSink::new(Vec::new());
/// let counter = sink.counter();
/// sink.write_all(b"hello\n")?;
/// assert_eq!((counter.calls(), counter.bytes()), (1, 6));
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct CountingSink<W> {
    inner: W,
    counter: WriteCounter,
}

impl<W> CountingSink<W> {
    /// Wraps `inner` with fresh counts.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            counter: WriteCounter::default(),
        }
    }

    /// Returns a handle observing this sink's counts.
    #[must_use]
    pub fn counter(&self) -> WriteCounter {
        self.counter.clone()
    }

    /// Returns a reference to the inner writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Returns the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.counter.attempt();
        let written = self.inner.write(buf)?;
        self.counter.record(written);
        Ok(written)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.counter.attempt();
        self.inner.write_all(buf)?;
        self.counter.record(buf.len());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
