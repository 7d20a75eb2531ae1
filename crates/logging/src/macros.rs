//! crates/logging/src/macros.rs
//! Logging macros with compile-time call-site capture.
//!
//! The macros record `file!()`, `line!()`, and the enclosing function at the
//! invocation site and route through [`Logger::log_site`](crate::Logger::log_site),
//! so no stack inspection happens at run time. Arguments are converted with
//! [`ToArg`](crate::printf::ToArg) and are only evaluated when the severity
//! passes the threshold.
//!
//! Each macro accepts an optional leading `logger: <expr>` naming the
//! instance to use; without it the [global](crate::global()) logger is used.

/// Captures the current call site as a [`CallSite`](crate::CallSite).
///
/// # Examples
///
/// ```
/// fn handler() -> logging::CallSite {
///     logging::call_site!()
/// }
///
/// let site = handler();
/// assert_eq!(site.function(), "handler");
/// assert!(site.line() > 0);
/// ```
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(
            ::std::file!(),
            ::std::line!(),
            $crate::caller::enclosing_function({
                fn __lit_marker() {}
                ::std::any::type_name_of_val(&__lit_marker)
            }),
        )
    };
}

/// Logs at an explicit [`Severity`](crate::Severity).
///
/// # Examples
///
/// ```
/// use logging::{Logger, Presentation, Severity};
/// use logging_sink::MemorySink;
///
/// let sink = MemorySink::default();
/// let logger = Logger::builder().presentation(Presentation::Plain).sink(sink.clone()).build();
/// logging::log!(logger: &logger, Severity::Error, "%d items", 3);
/// assert!(sink.contents().ends_with("() 3 items\n"));
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $severity:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger: &$crate::Logger = $logger;
        let severity: $crate::Severity = $severity;
        if logger.enabled(severity) {
            logger.log_site(
                severity,
                &$crate::call_site!(),
                $template,
                &[$($crate::printf::ToArg::to_arg(&$arg)),*],
            );
        }
    }};
    ($severity:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!(logger: $crate::global(), $severity, $template $(, $arg)*)
    };
}

/// Logs at [`Severity::Error`](crate::Severity::Error).
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!(logger: $logger, $crate::Severity::Error, $template $(, $arg)*)
    };
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!(logger: $crate::global(), $crate::Severity::Error, $template $(, $arg)*)
    };
}

/// Logs at [`Severity::Warning`](crate::Severity::Warning).
#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!(logger: $logger, $crate::Severity::Warning, $template $(, $arg)*)
    };
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!(logger: $crate::global(), $crate::Severity::Warning, $template $(, $arg)*)
    };
}

/// Logs at [`Severity::Informational`](crate::Severity::Informational).
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!(logger: $logger, $crate::Severity::Informational, $template $(, $arg)*)
    };
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!(logger: $crate::global(), $crate::Severity::Informational, $template $(, $arg)*)
    };
}

/// Logs at [`Severity::Debug`](crate::Severity::Debug).
#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!(logger: $logger, $crate::Severity::Debug, $template $(, $arg)*)
    };
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!(logger: $crate::global(), $crate::Severity::Debug, $template $(, $arg)*)
    };
}
