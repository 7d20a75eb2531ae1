//! crates/logging/src/caller.rs
//! Call-site capture and stack-depth caller resolution.
//!
//! Two paths produce a [`CallSite`]:
//!
//! - [`call_site!`](crate::call_site) records `file!()`, `line!()` and the
//!   enclosing function path at compile time. The logging macros use it.
//! - [`resolve`] captures the current backtrace and picks the frame
//!   `depth` levels above its caller. [`Logger::log_at`](crate::Logger::log_at)
//!   and the fixed-depth wrappers use it. Resolution degrades to
//!   [`CallSite::UNKNOWN`] when symbols are unavailable or the stack is
//!   shallower than requested.
//!
//! The fixed-depth wrappers are `#[track_caller]`: their file and line come
//! from [`Location::caller`] and only the function name is read from the
//! backtrace.
//!
//! Backtrace symbol names differ by debuginfo level. Full debuginfo yields
//! paths such as `logging::caller::resolve`, while `line-tables-only` builds
//! report the bare name `resolve`. The resolver's own frame is recognised in
//! both forms.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Placeholder rendered for an unresolved file or function.
pub const UNKNOWN_MARKER: &str = "???";

/// Suffix of the resolver's own symbol; frames are counted from just above it.
const RESOLVER_SYMBOL: &str = "caller::resolve";

/// Simple name of the resolver, as reported without full debuginfo.
const RESOLVER_NAME: &str = "resolve";

/// Source file of the resolver.
const RESOLVER_FILE: &str = "caller.rs";

/// Name of the marker function the capture macro plants in the caller.
const MARKER_FN: &str = "__lit_marker";

/// Source location of a logging call: file basename, line, and simple function name.
///
/// # Examples
///
/// ```
/// use logging::CallSite;
///
/// let site = CallSite::new("src/net/server.rs", 42, "app::net::Server::accept");
/// assert_eq!(site.file(), "server.rs");
/// assert_eq!(site.function(), "accept");
/// assert_eq!(site.to_string(), "server.rs:42:accept()");
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CallSite {
    file: Cow<'static, str>,
    line: u32,
    function: Cow<'static, str>,
}

impl CallSite {
    /// Site used when the caller cannot be determined.
    pub const UNKNOWN: Self = Self {
        file: Cow::Borrowed(UNKNOWN_MARKER),
        line: 0,
        function: Cow::Borrowed(UNKNOWN_MARKER),
    };

    /// Creates a site from a source path, line, and function path.
    ///
    /// The path is reduced to its basename and the function path to its last
    /// segment, without generic arguments, closure markers, or symbol hashes.
    #[must_use]
    pub fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file: Cow::Borrowed(non_empty(basename(file))),
            line,
            function: Cow::Borrowed(non_empty(simple_name(function))),
        }
    }

    /// Creates a site from owned strings, normalising them like [`CallSite::new`].
    #[must_use]
    pub fn from_owned(file: &str, line: u32, function: &str) -> Self {
        Self {
            file: Cow::Owned(non_empty(basename(file)).to_owned()),
            line,
            function: Cow::Owned(non_empty(simple_name(function)).to_owned()),
        }
    }

    /// Replaces the file and line with a `#[track_caller]` location, keeping the function.
    #[must_use]
    pub fn at_location(self, location: &'static Location<'static>) -> Self {
        Self {
            file: Cow::Borrowed(non_empty(basename(location.file()))),
            line: location.line(),
            function: self.function,
        }
    }

    /// Returns the file basename.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the line number, `0` when unknown.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the simple function name.
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Reports whether neither file nor function could be resolved.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.file == UNKNOWN_MARKER && self.function == UNKNOWN_MARKER
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}()", self.file, self.line, self.function)
    }
}

const fn non_empty(text: &str) -> &str {
    if text.is_empty() { UNKNOWN_MARKER } else { text }
}

/// Strips directories from `path`, accepting both separators.
#[must_use]
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Reduces a function path to its simple name.
///
/// Trailing closure and async-block segments, a legacy symbol hash, and
/// generic arguments are dropped before taking the last `::` segment.
#[must_use]
pub fn simple_name(path: &str) -> &str {
    let mut segments = split_path(path);
    while let Some(last) = segments.last() {
        let skip = last.starts_with("{{")
            || last.starts_with('<')
            || last.is_empty()
            || is_symbol_hash(last);
        if !skip || segments.len() == 1 {
            break;
        }
        segments.pop();
    }
    let last = segments.last().copied().unwrap_or(path);
    match last.find('<') {
        Some(0) | None => last,
        Some(end) => &last[..end],
    }
}

/// Returns the function path enclosing the marker planted by [`call_site!`](crate::call_site).
#[doc(hidden)]
#[must_use]
pub fn enclosing_function(marker_path: &'static str) -> &'static str {
    marker_path
        .strip_suffix(MARKER_FN)
        .and_then(|path| path.strip_suffix("::"))
        .unwrap_or(marker_path)
}

fn is_symbol_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Splits on `::` separators that are not nested inside `<...>`.
fn split_path(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(index + 1) == Some(&b':') => {
                segments.push(&path[start..index]);
                index += 2;
                start = index;
                continue;
            }
            _ => {}
        }
        index += 1;
    }
    segments.push(&path[start..]);
    segments
}

/// One symbol from a rendered backtrace.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    /// Demangled symbol name.
    pub function: String,
    /// Source file, when debug info is available.
    pub file: Option<String>,
    /// Source line, when debug info is available.
    pub line: Option<u32>,
}

impl Frame {
    fn to_call_site(&self) -> CallSite {
        let function = match self.function.as_str() {
            "<unknown>" => UNKNOWN_MARKER,
            name => name,
        };
        CallSite::from_owned(
            self.file.as_deref().unwrap_or(UNKNOWN_MARKER),
            self.line.unwrap_or(0),
            function,
        )
    }
}

/// Parses the textual rendering of a [`Backtrace`] into frames, outermost last.
///
/// Each symbol line (`  3: path::to::function`, or an unnumbered inlined
/// symbol) starts a frame; a following `at file:line:column` line attaches a
/// location to it.
#[must_use]
pub fn parse_frames(rendered: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for raw in rendered.lines() {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        if let Some(location) = text.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                let (file, line) = parse_location(location);
                frame.file = Some(file.to_owned());
                frame.line = line;
            }
            continue;
        }
        let function = match text.split_once(": ") {
            Some((index, name)) if index.bytes().all(|b| b.is_ascii_digit()) => name,
            _ => text,
        };
        frames.push(Frame {
            function: function.trim().to_owned(),
            file: None,
            line: None,
        });
    }
    frames
}

fn parse_location(location: &str) -> (&str, Option<u32>) {
    let location = location.trim();
    let Some((head, last)) = location.rsplit_once(':') else {
        return (location, None);
    };
    if let Some((file, line)) = head.rsplit_once(':') {
        if let Ok(line) = line.parse() {
            return (file, Some(line));
        }
    }
    match last.parse() {
        Ok(line) => (head, Some(line)),
        Err(_) => (location, None),
    }
}

/// Resolves the frame `depth` levels above the caller of this function.
///
/// Depth `0` names the function that called `resolve`, `1` its caller, and
/// so on. Returns [`CallSite::UNKNOWN`] when the backtrace cannot be captured,
/// carries no symbols, or is shallower than requested.
#[inline(never)]
#[must_use]
pub fn resolve(depth: usize) -> CallSite {
    let trace = Backtrace::force_capture();
    if trace.status() != BacktraceStatus::Captured {
        return CallSite::UNKNOWN;
    }
    let rendered = trace.to_string();
    let site = select_frame(&parse_frames(&rendered), depth);
    std::hint::black_box(site)
}

fn select_frame(frames: &[Frame], depth: usize) -> CallSite {
    let Some(anchor) = frames.iter().position(is_resolver_frame) else {
        return CallSite::UNKNOWN;
    };
    anchor
        .checked_add(1)
        .and_then(|first| first.checked_add(depth))
        .and_then(|index| frames.get(index))
        .map_or(CallSite::UNKNOWN, Frame::to_call_site)
}

fn is_resolver_frame(frame: &Frame) -> bool {
    let symbol = strip_hash(&frame.function);
    if symbol.ends_with(RESOLVER_SYMBOL) {
        return true;
    }
    simple_name(symbol) == RESOLVER_NAME
        && frame
            .file
            .as_deref()
            .is_some_and(|file| basename(file) == RESOLVER_FILE)
}

fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::") {
        Some((head, tail)) if is_symbol_hash(tail) => head,
        _ => symbol,
    }
}
