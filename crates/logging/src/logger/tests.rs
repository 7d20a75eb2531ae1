use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use logging_sink::{CountingSink, MemorySink};

use super::*;

fn plain_logger(sink: &MemorySink) -> Logger {
    Logger::builder()
        .presentation(Presentation::Plain)
        .threshold(Severity::Debug)
        .sink(sink.clone())
        .build()
}

fn site() -> CallSite {
    CallSite::new("src/server.rs", 12, "app::server::accept")
}

struct FailingSink {
    attempts: Arc<AtomicUsize>,
}

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// Line layout
// ============================================================================

#[test]
fn plain_line_layout() {
    let sink = MemorySink::default();
    let logger = plain_logger(&sink);
    logger.log_site(Severity::Warning, &site(), "disk %d%% full", &[Arg::Int(91)]);
    assert_eq!(sink.contents(), "[LIT1] server.rs:12:accept() disk 91% full\n");
}

#[test]
fn timestamped_line_starts_with_local_time() {
    let sink = MemorySink::default();
    let logger = Logger::builder().sink(sink.clone()).build();
    logger.log_site(Severity::Error, &site(), "boom", &[]);

    let line = sink.contents();
    let (stamp, rest) = line.split_at(crate::timestamp::TIMESTAMP_WIDTH);
    assert!(stamp.bytes().all(|b| b.is_ascii_digit() || b"-: ".contains(&b)));
    assert_eq!(rest, " [LIT0] server.rs:12:accept() boom\n");
}

#[test]
fn empty_prefix_and_custom_tags() {
    let sink = MemorySink::default();
    let logger = plain_logger(&sink);
    logger.set_prefix("");
    logger.set_prefix_for(Severity::Informational, "INFO");
    logger.log_site(Severity::Informational, &site(), "up", &[]);
    logger.log_site(Severity::Debug, &site(), "detail", &[]);
    assert_eq!(
        sink.lines(),
        vec![
            "[INFO] server.rs:12:accept() up".to_owned(),
            "[3] server.rs:12:accept() detail".to_owned(),
        ]
    );
}

#[test]
fn disabling_custom_prefixes_restores_ranks() {
    let sink = MemorySink::default();
    let logger = plain_logger(&sink);
    logger.set_prefix_for(Severity::Error, "E");
    logger.set_custom_prefixes(false);
    logger.log_site(Severity::Error, &site(), "x", &[]);
    assert!(sink.contents().starts_with("[LIT0] "));
    assert_eq!(logger.prefix_for(Severity::Error).as_deref(), Some("E"));
}

#[test]
fn formatting_fallbacks_reach_the_sink() {
    let sink = MemorySink::default();
    let logger = plain_logger(&sink);
    logger.log_site(Severity::Error, &site(), "bad %d", &[Arg::Str("x")]);
    logger.log_site(Severity::Error, &site(), "%s", &[]);
    let lines = sink.lines();
    assert!(lines[0].ends_with(" bad %!d(string=x)"));
    assert!(lines[1].ends_with(" %!s(MISSING)"));
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn suppressed_calls_never_write() {
    let counting = CountingSink::new(io::sink());
    let counter = counting.counter();
    let logger = Logger::builder().sink(counting).build();

    logger.log_site(Severity::Debug, &site(), "hidden", &[]);
    logger.warn("hidden", &[]);
    let mut out = Vec::new();
    logger.log_at(&mut out, Severity::Informational, 1, "hidden", &[]);

    assert_eq!(counter.calls(), 0);
    assert!(out.is_empty());
}

#[test]
fn threshold_changes_apply_to_next_call() {
    let sink = MemorySink::default();
    let logger = plain_logger(&sink);
    assert_eq!(logger.set_threshold(Severity::Error), Severity::Debug);
    logger.log_site(Severity::Warning, &site(), "dropped", &[]);
    logger.set_threshold(Severity::Warning);
    logger.log_site(Severity::Warning, &site(), "kept", &[]);
    assert_eq!(sink.lines().len(), 1);
    assert!(logger.enabled(Severity::Warning));
    assert!(!logger.enabled(Severity::Informational));
}

// ============================================================================
// Caller resolution
// ============================================================================

#[inline(never)]
fn log_through_wrapper(logger: &Logger) -> u32 {
    let line = line!() + 1;
    logger.error("from wrapper", &[]);
    std::hint::black_box(line)
}

#[test]
fn wrapper_names_its_caller() {
    let sink = MemorySink::default();
    let logger = plain_logger(&sink);
    let line_number = log_through_wrapper(&logger);

    let line = sink.contents();
    let expected = format!("[LIT0] tests.rs:{line_number}:log_through_wrapper() from wrapper\n");
    assert_eq!(line, expected);
}

#[inline(never)]
fn log_at_every_severity(logger: &Logger) -> u32 {
    let first = line!() + 1;
    logger.error("e", &[]);
    logger.warn("w", &[]);
    logger.info("i", &[]);
    logger.debug("d", &[]);
    std::hint::black_box(first)
}

#[test]
fn every_wrapper_renders_a_complete_call_site() {
    let sink = MemorySink::default();
    let logger = plain_logger(&sink);
    let first = log_at_every_severity(&logger);

    let lines = sink.lines();
    assert_eq!(lines.len(), 4);
    for (offset, (line, tail)) in lines.iter().zip(["0] ", "1] ", "2] ", "3] "]).enumerate() {
        let line_number = first + u32::try_from(offset).unwrap();
        let site = format!("tests.rs:{line_number}:log_at_every_severity() ");
        assert!(line.contains(tail), "{line}");
        assert!(line.contains(&site), "{line}");
    }
}

#[inline(never)]
fn log_at_depth(logger: &Logger, out: &mut Vec<u8>, depth: usize) {
    logger.log_at(out, Severity::Error, depth, "probe", &[]);
    std::hint::black_box(());
}

/// Splits `[tag] file:line:function() message` into its call-site parts.
fn call_site_parts(line: &str) -> (&str, u32, &str) {
    let site = line.split_once("] ").unwrap().1.split_once("() ").unwrap().0;
    let (file, rest) = site.split_once(':').unwrap();
    let (line_number, function) = rest.split_once(':').unwrap();
    (file, line_number.parse().unwrap(), function)
}

#[test]
fn log_at_depth_zero_names_itself_and_one_names_caller() {
    let logger = Logger::builder().presentation(Presentation::Plain).build();

    let mut out = Vec::new();
    log_at_depth(&logger, &mut out, 0);
    let line = String::from_utf8(out).unwrap();
    let (file, line_number, function) = call_site_parts(&line);
    assert_eq!((file, function), ("logger.rs", "log_at"), "{line}");
    assert!(line_number > 0, "{line}");

    let mut out = Vec::new();
    log_at_depth(&logger, &mut out, 1);
    let line = String::from_utf8(out).unwrap();
    let (file, line_number, function) = call_site_parts(&line);
    assert_eq!((file, function), ("tests.rs", "log_at_depth"), "{line}");
    assert!(line_number > 0, "{line}");
}

#[test]
fn log_at_beyond_stack_renders_unknown_site() {
    let logger = Logger::builder().presentation(Presentation::Plain).build();
    let mut out = Vec::new();
    logger.log_at(&mut out, Severity::Error, 100_000, "deep", &[]);
    assert_eq!(String::from_utf8(out).unwrap(), "[LIT0] ???:0:???() deep\n");
}

// ============================================================================
// Sink handling
// ============================================================================

#[test]
fn each_line_is_a_single_write_all() {
    let counting = CountingSink::new(Vec::new());
    let counter = counting.counter();
    let logger = Logger::builder()
        .presentation(Presentation::Plain)
        .sink(counting)
        .build();
    logger.log_site(Severity::Error, &site(), "%s=%d", &[Arg::Str("a"), Arg::Int(1)]);
    assert_eq!(counter.calls(), 1);
    assert_eq!(counter.bytes(), "[LIT0] server.rs:12:accept() a=1\n".len() as u64);
}

#[test]
fn failing_sink_is_swallowed_and_counted() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let logger = Logger::builder()
        .sink(FailingSink {
            attempts: Arc::clone(&attempts),
        })
        .build();
    logger.log_site(Severity::Error, &site(), "one", &[]);
    logger.error("two", &[]);
    assert_eq!(logger.failed_writes(), 2);
    assert_eq!(attempts.load(Ordering::Relaxed), 2);
}

#[test]
fn set_sink_returns_previous_sink() {
    let first = MemorySink::default();
    let second = MemorySink::default();
    let logger = plain_logger(&first);
    logger.log_site(Severity::Error, &site(), "a", &[]);

    let mut previous = logger.set_sink(second.clone());
    logger.log_site(Severity::Error, &site(), "b", &[]);
    previous.write_all(b"direct\n").unwrap();

    assert_eq!(first.lines().len(), 2);
    assert_eq!(second.lines().len(), 1);
    assert!(second.contents().ends_with(" b\n"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn new_logger_uses_documented_defaults() {
    let logger = Logger::new();
    assert_eq!(logger.config(), LoggerConfig::default());
}

#[test]
fn reconfigure_round_trips_through_config() {
    let logger = Logger::builder().sink(io::sink()).build();
    let config = LoggerConfig::from_directives(
        "level=info,prefix=SVC,timestamps=off,prefix.error=FATAL",
    )
    .unwrap();
    logger.reconfigure(&config);
    assert_eq!(logger.config(), config);
    assert_eq!(logger.threshold(), Severity::Informational);
    assert_eq!(logger.presentation(), Presentation::Plain);
    assert!(logger.custom_prefixes());
}

#[test]
fn builder_prefix_for_enables_custom_tags() {
    let sink = MemorySink::default();
    let logger = Logger::builder()
        .prefix("")
        .prefix_for(Severity::Error, "ERR")
        .presentation(Presentation::Plain)
        .sink(sink.clone())
        .build();
    logger.log_site(Severity::Error, &site(), "x", &[]);
    assert!(sink.contents().starts_with("[ERR] "));
    assert_eq!(logger.clear_prefix_for(Severity::Error).as_deref(), Some("ERR"));
}

#[test]
fn rendered_tags_match_config_tags() {
    let sink = MemorySink::default();
    let logger = plain_logger(&sink);
    logger.set_prefix("");
    logger.set_prefix_for(Severity::Warning, "WARN");

    for custom in [true, false] {
        logger.set_custom_prefixes(custom);
        let config = logger.config();
        for severity in Severity::ALL {
            sink.take();
            logger.log_site(severity, &site(), "x", &[]);
            let expected = format!("[{}] ", config.tag(severity));
            assert!(sink.contents().starts_with(&expected), "{}", sink.contents());
        }
    }
}

// ============================================================================
// Scratch buffers
// ============================================================================

struct Reentrant<'a> {
    logger: &'a Logger,
}

impl fmt::Display for Reentrant<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.logger.log_site(Severity::Debug, &site(), "inner", &[]);
        f.write_str("outer-value")
    }
}

#[test]
fn reentrant_logging_uses_fresh_buffer() {
    let sink = MemorySink::default();
    let logger = plain_logger(&sink);
    let value = Reentrant { logger: &logger };
    logger.log_site(Severity::Error, &site(), "%v", &[Arg::display(&value)]);
    assert_eq!(
        sink.lines(),
        vec![
            "[LIT3] server.rs:12:accept() inner".to_owned(),
            "[LIT0] server.rs:12:accept() outer-value".to_owned(),
        ]
    );
}

#[test]
fn oversized_scratch_buffer_is_released() {
    let logger = Logger::builder()
        .presentation(Presentation::Plain)
        .sink(io::sink())
        .build();
    let big = "x".repeat(SCRATCH_RETAIN * 2);
    logger.log_site(Severity::Error, &site(), "%s", &[Arg::Str(&big)]);

    let retained = SCRATCH.with(|slot| {
        let buffer = slot.take();
        let capacity = buffer.capacity();
        slot.set(buffer);
        capacity
    });
    assert!(retained <= SCRATCH_RETAIN);
}
