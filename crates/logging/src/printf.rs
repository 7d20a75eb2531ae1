//! crates/logging/src/printf.rs
//! printf-style template interpolation with best-effort fallbacks.
//!
//! Templates use `%[flags][width][.precision]verb` directives. A mismatch
//! between the template and its arguments never fails: missing, excess, or
//! mistyped arguments are rendered as diagnostic tokens inside the output so
//! the log line still reaches the sink.
//!
//! | Situation                | Rendering                     |
//! |--------------------------|-------------------------------|
//! | missing argument         | `%!d(MISSING)`                |
//! | verb not valid for value | `%!d(string=hello)`           |
//! | excess arguments         | `%!(EXTRA int=1, string=x)`   |
//! | trailing lone `%`        | `%!(NOVERB)`                  |
//! | bad `*` width/precision  | `%!(BADWIDTH)` / `%!(BADPREC)`|
//!
//! # Examples
//!
//! ```
//! use logging::printf::{Arg, sprintf};
//!
//! assert_eq!(sprintf("bad %d", &[Arg::Int(5)]), "bad 5");
//! assert_eq!(sprintf("%-5s|%05.1f", &[Arg::Str("ab"), Arg::Float(3.14159)]), "ab   |003.1");
//! assert_eq!(sprintf("%s", &[]), "%!s(MISSING)");
//! ```

use std::borrow::Cow;
use std::fmt::{self, Write as _};

/// A single value interpolated into a template.
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    /// Signed integer.
    Int(i128),
    /// Unsigned integer.
    Uint(u128),
    /// Floating point number.
    Float(f64),
    /// Borrowed string.
    Str(&'a str),
    /// Boolean.
    Bool(bool),
    /// Unicode scalar value.
    Char(char),
    /// Any value rendered through its [`fmt::Display`] implementation.
    Display(&'a dyn fmt::Display),
}

impl<'a> Arg<'a> {
    /// Wraps a [`fmt::Display`] value.
    #[must_use]
    pub fn display(value: &'a dyn fmt::Display) -> Self {
        Self::Display(value)
    }

    /// Returns the type label used in diagnostic tokens and by `%T`.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float64",
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::Display(_) => "value",
        }
    }

    const fn as_int(&self) -> Option<i128> {
        match *self {
            Self::Int(value) => Some(value),
            Self::Uint(value) if value <= i128::MAX as u128 => Some(value as i128),
            _ => None,
        }
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Self::Uint(value) => f.debug_tuple("Uint").field(value).finish(),
            Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Self::Str(value) => f.debug_tuple("Str").field(value).finish(),
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Char(value) => f.debug_tuple("Char").field(value).finish(),
            Self::Display(value) => f.debug_tuple("Display").field(&value.to_string()).finish(),
        }
    }
}

/// Conversion into an [`Arg`], implemented for primitives and strings.
///
/// The logging macros call [`ToArg::to_arg`] on every argument, so any type
/// implementing this trait can be passed to them directly.
pub trait ToArg {
    /// Borrows `self` as an interpolation value.
    fn to_arg(&self) -> Arg<'_>;
}

macro_rules! impl_to_arg_signed {
    ($($ty:ty),*) => {
        $(impl ToArg for $ty {
            fn to_arg(&self) -> Arg<'_> {
                Arg::Int(*self as i128)
            }
        })*
    };
}

macro_rules! impl_to_arg_unsigned {
    ($($ty:ty),*) => {
        $(impl ToArg for $ty {
            fn to_arg(&self) -> Arg<'_> {
                Arg::Uint(*self as u128)
            }
        })*
    };
}

impl_to_arg_signed!(i8, i16, i32, i64, i128, isize);
impl_to_arg_unsigned!(u8, u16, u32, u64, u128, usize);

impl ToArg for f32 {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Float(f64::from(*self))
    }
}

impl ToArg for f64 {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Float(*self)
    }
}

impl ToArg for bool {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Bool(*self)
    }
}

impl ToArg for char {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Char(*self)
    }
}

impl ToArg for str {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(self)
    }
}

impl ToArg for String {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(self)
    }
}

impl ToArg for Cow<'_, str> {
    fn to_arg(&self) -> Arg<'_> {
        Arg::Str(self)
    }
}

impl ToArg for Arg<'_> {
    fn to_arg(&self) -> Arg<'_> {
        *self
    }
}

impl<T: ToArg + ?Sized> ToArg for &T {
    fn to_arg(&self) -> Arg<'_> {
        (**self).to_arg()
    }
}

impl<T: ToArg + ?Sized> ToArg for &mut T {
    fn to_arg(&self) -> Arg<'_> {
        (**self).to_arg()
    }
}

impl<T: ToArg + ?Sized> ToArg for Box<T> {
    fn to_arg(&self) -> Arg<'_> {
        (**self).to_arg()
    }
}

/// Interpolates `args` into `template`, returning a new string.
#[must_use]
pub fn sprintf(template: &str, args: &[Arg<'_>]) -> String {
    let mut out = String::with_capacity(template.len() + 8 * args.len());
    format_into(&mut out, template, args);
    out
}

/// Interpolates `args` into `template`, appending to `out`.
pub fn format_into(out: &mut String, template: &str, args: &[Arg<'_>]) {
    let mut cursor = Cursor { args, next: 0 };
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        rest = directive(out, &rest[pos + 1..], &mut cursor);
    }
    out.push_str(rest);

    if cursor.next < args.len() {
        out.push_str("%!(EXTRA ");
        for (index, arg) in args[cursor.next..].iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            out.push_str(arg.type_name());
            out.push('=');
            write_value(out, arg);
        }
        out.push(')');
    }
}

struct Cursor<'s, 'a> {
    args: &'s [Arg<'a>],
    next: usize,
}

impl<'a> Cursor<'_, 'a> {
    fn take(&mut self) -> Option<Arg<'a>> {
        let arg = self.args.get(self.next).copied();
        if arg.is_some() {
            self.next += 1;
        }
        arg
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Spec {
    minus: bool,
    plus: bool,
    space: bool,
    zero: bool,
    sharp: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Parses one directive following a `%` and renders it; returns the unparsed tail.
fn directive<'t>(out: &mut String, mut rest: &'t str, cursor: &mut Cursor<'_, '_>) -> &'t str {
    let mut spec = Spec::default();

    loop {
        match rest.as_bytes().first() {
            Some(b'-') => {
                spec.minus = true;
                spec.zero = false;
            }
            Some(b'+') => spec.plus = true,
            Some(b' ') => spec.space = true,
            Some(b'0') => spec.zero = !spec.minus,
            Some(b'#') => spec.sharp = true,
            _ => break,
        }
        rest = &rest[1..];
    }

    if let Some(tail) = rest.strip_prefix('*') {
        rest = tail;
        match cursor.take().and_then(|arg| arg.as_int()) {
            Some(width) if width.unsigned_abs() <= NUMBER_LIMIT as u128 => {
                if width < 0 {
                    spec.minus = true;
                    spec.zero = false;
                }
                spec.width = usize::try_from(width.unsigned_abs()).ok();
            }
            _ => out.push_str("%!(BADWIDTH)"),
        }
    } else {
        let (width, tail) = leading_number(rest);
        spec.width = width;
        rest = tail;
    }

    if let Some(tail) = rest.strip_prefix('.') {
        rest = tail;
        if let Some(tail) = rest.strip_prefix('*') {
            rest = tail;
            match cursor.take().and_then(|arg| arg.as_int()) {
                Some(precision) if precision > NUMBER_LIMIT as i128 => out.push_str("%!(BADPREC)"),
                Some(precision) if precision >= 0 => {
                    spec.precision = usize::try_from(precision).ok();
                }
                Some(_) => spec.precision = None,
                None => out.push_str("%!(BADPREC)"),
            }
        } else {
            let (precision, tail) = leading_number(rest);
            spec.precision = Some(precision.unwrap_or(0));
            rest = tail;
        }
    }

    let Some(verb) = rest.chars().next() else {
        out.push_str("%!(NOVERB)");
        return rest;
    };
    rest = &rest[verb.len_utf8()..];

    if verb == '%' {
        out.push('%');
        return rest;
    }

    match cursor.take() {
        Some(arg) => render(out, &spec, verb, &arg),
        None => {
            out.push_str("%!");
            out.push(verb);
            out.push_str("(MISSING)");
        }
    }
    rest
}

/// Literal widths above this are ignored and `*` values above it are rejected.
const NUMBER_LIMIT: usize = 1_000_000;

fn leading_number(text: &str) -> (Option<usize>, &str) {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return (None, text);
    }
    let value = text[..digits]
        .parse()
        .ok()
        .filter(|value| *value <= NUMBER_LIMIT);
    (value, &text[digits..])
}

fn render(out: &mut String, spec: &Spec, verb: char, arg: &Arg<'_>) {
    match (verb, *arg) {
        ('T', _) => pad(out, spec, arg.type_name()),
        ('v' | 'd', Arg::Int(value)) => integer(out, spec, value < 0, value.unsigned_abs(), 10, false),
        ('v' | 'd', Arg::Uint(value)) => integer(out, spec, false, value, 10, false),
        ('d', Arg::Char(value)) => integer(out, spec, false, u128::from(u32::from(value)), 10, false),
        ('b' | 'o' | 'x' | 'X', Arg::Int(value)) => {
            integer(out, spec, value < 0, value.unsigned_abs(), radix(verb), verb == 'X');
        }
        ('b' | 'o' | 'x' | 'X', Arg::Uint(value)) => {
            integer(out, spec, false, value, radix(verb), verb == 'X');
        }
        ('b' | 'o' | 'x' | 'X', Arg::Char(value)) => {
            integer(out, spec, false, u128::from(u32::from(value)), radix(verb), verb == 'X');
        }
        ('c', Arg::Int(_) | Arg::Uint(_) | Arg::Char(_)) => {
            let mut buf = [0u8; 4];
            pad(out, spec, code_point(arg).encode_utf8(&mut buf));
        }
        ('U', Arg::Int(_) | Arg::Uint(_) | Arg::Char(_)) => {
            let text = format!("U+{:04X}", u32::from(code_point(arg)));
            pad(out, spec, &text);
        }
        ('q', Arg::Int(_) | Arg::Uint(_) | Arg::Char(_)) => {
            let text = format!("{:?}", code_point(arg));
            pad(out, spec, &text);
        }
        ('v' | 'e' | 'E' | 'f' | 'F' | 'g' | 'G', Arg::Float(value)) => float(out, spec, verb, value),
        ('v' | 's', Arg::Str(value)) => string(out, spec, value),
        ('v' | 's', Arg::Char(value)) => {
            let mut buf = [0u8; 4];
            string(out, spec, value.encode_utf8(&mut buf));
        }
        ('v' | 's', Arg::Display(value)) => {
            if spec.width.is_none() && spec.precision.is_none() {
                let _ = write!(out, "{value}");
            } else {
                string(out, spec, &value.to_string());
            }
        }
        ('q', Arg::Str(value)) => string(out, spec, &format!("{value:?}")),
        ('q', Arg::Display(value)) => string(out, spec, &format!("{:?}", value.to_string())),
        ('x' | 'X', Arg::Str(value)) => hex_bytes(out, spec, value.as_bytes(), verb == 'X'),
        ('x' | 'X', Arg::Display(value)) => {
            hex_bytes(out, spec, value.to_string().as_bytes(), verb == 'X');
        }
        ('v' | 't', Arg::Bool(value)) => pad(out, spec, if value { "true" } else { "false" }),
        _ => {
            out.push_str("%!");
            out.push(verb);
            out.push('(');
            out.push_str(arg.type_name());
            out.push('=');
            write_value(out, arg);
            out.push(')');
        }
    }
}

const fn radix(verb: char) -> u32 {
    match verb {
        'b' => 2,
        'o' => 8,
        'x' | 'X' => 16,
        _ => 10,
    }
}

fn code_point(arg: &Arg<'_>) -> char {
    match *arg {
        Arg::Char(value) => value,
        Arg::Int(value) => u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER),
        Arg::Uint(value) => u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER),
        _ => char::REPLACEMENT_CHARACTER,
    }
}

/// Renders `arg` the way `%v` would with no flags.
fn write_value(out: &mut String, arg: &Arg<'_>) {
    render(out, &Spec::default(), 'v', arg);
}

fn pad(out: &mut String, spec: &Spec, body: &str) {
    let fill = spec
        .width
        .map_or(0, |width| width.saturating_sub(body.chars().count()));
    if spec.minus {
        out.push_str(body);
        push_repeated(out, ' ', fill);
    } else {
        push_repeated(out, ' ', fill);
        out.push_str(body);
    }
}

fn push_repeated(out: &mut String, ch: char, count: usize) {
    out.extend(std::iter::repeat_n(ch, count));
}

fn string(out: &mut String, spec: &Spec, value: &str) {
    let body = match spec.precision {
        Some(limit) => match value.char_indices().nth(limit) {
            Some((end, _)) => &value[..end],
            None => value,
        },
        None => value,
    };
    pad(out, spec, body);
}

fn hex_bytes(out: &mut String, spec: &Spec, bytes: &[u8], upper: bool) {
    let mut body = String::with_capacity(bytes.len() * 2 + 2);
    if spec.sharp {
        body.push_str(if upper { "0X" } else { "0x" });
    }
    for byte in bytes {
        if upper {
            let _ = write!(body, "{byte:02X}");
        } else {
            let _ = write!(body, "{byte:02x}");
        }
    }
    pad(out, spec, &body);
}

const fn sign(spec: &Spec, negative: bool) -> &'static str {
    if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    }
}

/// Writes `sign`, `prefix`, and `digits`, zero-filling between them when requested.
fn numeric(out: &mut String, spec: &Spec, sign: &str, prefix: &str, digits: &str, zero_fill: bool) {
    if zero_fill && !spec.minus {
        if let Some(width) = spec.width {
            let used = sign.len() + prefix.len() + digits.chars().count();
            out.push_str(sign);
            out.push_str(prefix);
            push_repeated(out, '0', width.saturating_sub(used));
            out.push_str(digits);
            return;
        }
    }
    let body = format!("{sign}{prefix}{digits}");
    pad(out, spec, &body);
}

fn integer(out: &mut String, spec: &Spec, negative: bool, magnitude: u128, radix: u32, upper: bool) {
    let mut digits = match (radix, upper) {
        (2, _) => format!("{magnitude:b}"),
        (8, _) => format!("{magnitude:o}"),
        (16, false) => format!("{magnitude:x}"),
        (16, true) => format!("{magnitude:X}"),
        _ => magnitude.to_string(),
    };

    if let Some(precision) = spec.precision {
        if precision == 0 && magnitude == 0 {
            digits.clear();
        } else if digits.len() < precision {
            digits.insert_str(0, &"0".repeat(precision - digits.len()));
        }
    }

    let prefix = if spec.sharp {
        match (radix, upper) {
            (2, _) => "0b",
            (8, _) if !digits.starts_with('0') => "0",
            (16, false) => "0x",
            (16, true) => "0X",
            _ => "",
        }
    } else {
        ""
    };

    let zero_fill = spec.zero && spec.precision.is_none();
    numeric(out, spec, sign(spec, negative), prefix, &digits, zero_fill);
}

fn float(out: &mut String, spec: &Spec, verb: char, value: f64) {
    if value.is_nan() {
        let text = if spec.plus { "+NaN" } else { "NaN" };
        pad(out, spec, text);
        return;
    }
    let negative = value.is_sign_negative();
    if value.is_infinite() {
        let text = format!("{}Inf", if negative { "-" } else if spec.plus { "+" } else { "" });
        pad(out, spec, &text);
        return;
    }

    let magnitude = value.abs();
    let upper = verb.is_ascii_uppercase();
    let digits = match verb {
        'f' | 'F' => format!("{:.*}", spec.precision.unwrap_or(6), magnitude),
        'e' | 'E' => exponent_form(&format!("{:.*e}", spec.precision.unwrap_or(6), magnitude), upper),
        _ => general(magnitude, spec.precision, spec.sharp, upper),
    };
    numeric(out, spec, sign(spec, negative), "", &digits, spec.zero);
}

/// Shortest (or `precision` significant digit) rendering, switching to
/// exponent form for very large or very small magnitudes.
fn general(magnitude: f64, precision: Option<usize>, keep_zeros: bool, upper: bool) -> String {
    let (scientific, limit) = match precision {
        Some(precision) => {
            let significant = precision.max(1);
            (format!("{:.*e}", significant - 1, magnitude), significant)
        }
        None => (format!("{magnitude:e}"), 21),
    };
    let exponent = scientific
        .rsplit_once('e')
        .and_then(|(_, exp)| exp.parse::<i64>().ok())
        .unwrap_or(0);

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    if exponent < -4 || exponent >= limit {
        let text = exponent_form(&scientific, upper);
        if keep_zeros || precision.is_none() {
            return text;
        }
        return match text.split_once(['e', 'E']) {
            Some((mantissa, exp)) => {
                let marker = if upper { 'E' } else { 'e' };
                format!("{}{marker}{exp}", trim_fraction(mantissa))
            }
            None => text,
        };
    }

    match precision {
        Some(_) => {
            let decimals = usize::try_from(limit - 1 - exponent).unwrap_or(0);
            let text = format!("{magnitude:.decimals$}");
            if keep_zeros {
                text
            } else {
                trim_fraction(&text).to_owned()
            }
        }
        None => magnitude.to_string(),
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Rewrites Rust's `1.5e3` exponent notation as `1.5e+03`.
fn exponent_form(text: &str, upper: bool) -> String {
    let Some((mantissa, exp)) = text.split_once('e') else {
        return text.to_owned();
    };
    let exp: i64 = exp.parse().unwrap_or(0);
    let marker = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{marker}{sign}{:02}", exp.unsigned_abs())
}
