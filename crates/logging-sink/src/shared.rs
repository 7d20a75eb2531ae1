//! crates/logging-sink/src/shared.rs
//! Mutex-serialised sink handles and the in-memory capture sink.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle to a writer shared behind a mutex.
///
/// Every [`write_all`](Write::write_all) call holds the lock for the whole
/// buffer, so loggers that assemble complete lines before writing never
/// interleave below line granularity, even when several loggers or threads
/// share the same handle. A poisoned lock is recovered rather than
/// propagated.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use logging_sink::SharedSink;
///
/// let sink = SharedSink::new(Vec::new());
/// let mut handle = sink.clone();
/// handle.write_all(b"one\n")?;
/// assert_eq!(sink.with_writer(|buffer| buffer.len()), 4);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct SharedSink<W> {
    inner: Arc<Mutex<W>>,
}

/// In-memory sink capturing everything written to it.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use logging_sink::MemorySink;
///
/// let sink = MemorySink::default();
/// sink.clone().write_all(b"first\nsecond\n")?;
/// assert_eq!(sink.lines(), ["first", "second"]);
/// # Ok::<(), std::io::Error>(())
/// ```
pub type MemorySink = SharedSink<Vec<u8>>;

impl<W> SharedSink<W> {
    /// Wraps `writer` in a new shared handle.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    /// Runs `f` with exclusive access to the underlying writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.lock())
    }

    /// Returns the number of live handles sharing the writer.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Returns the writer when this is the last handle, or the handle otherwise.
    pub fn try_into_inner(self) -> Result<W, Self> {
        Arc::try_unwrap(self.inner)
            .map(|mutex| mutex.into_inner().unwrap_or_else(PoisonError::into_inner))
            .map_err(|inner| Self { inner })
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemorySink {
    /// Returns the captured bytes decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Returns the captured output split into lines without terminators.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    /// Returns the number of captured bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Reports whether nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes and returns everything captured so far.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.lock())
    }
}

impl<W> Clone for SharedSink<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: Default> Default for SharedSink<W> {
    fn default() -> Self {
        Self::new(W::default())
    }
}

impl<W: Write> Write for SharedSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl<W: fmt::Debug> fmt::Debug for SharedSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSink")
            .field("writer", &*self.lock())
            .finish()
    }
}
