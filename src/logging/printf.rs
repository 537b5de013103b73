//! Runtime printf-style formatting for `logf!` and `check_f!` call sites.
//!
//! Format strings are only known at run time, so a conversion that does not
//! match its argument is reported as a [`PrintfError`] instead of a compile
//! error. The record builder turns that error into an annotation.
use std::fmt::Write as _;

use crate::error::PrintfError;

/// Upper bound, in characters, on a single printf-style message.
pub const MAX_MESSAGE_SIZE: usize = 2048;

/// Appended to messages cut at [`MAX_MESSAGE_SIZE`].
pub const TRUNCATED_WARNING_TEXT: &str = "[...truncated...]";

/// One argument of a printf-style call.
#[derive(Debug, Clone, PartialEq)]
pub enum FmtArg {
    /// Signed integer (`%d`, `%i`, also accepted by `%u`/`%x`/`%o`/`%c`).
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point (`%f`, `%e`, `%g`).
    Float(f64),
    /// Character (`%c`).
    Char(char),
    /// String (`%s`).
    Str(String),
}

macro_rules! from_lossless {
    ($variant:ident($target:ty): $($t:ty),+) => {
        $(
            impl From<$t> for FmtArg {
                fn from(v: $t) -> Self {
                    Self::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

from_lossless!(Int(i64): i8, i16, i32, i64);
from_lossless!(UInt(u64): u8, u16, u32, u64);
from_lossless!(Float(f64): f32, f64);

impl From<isize> for FmtArg {
    fn from(v: isize) -> Self {
        Self::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<usize> for FmtArg {
    fn from(v: usize) -> Self {
        Self::UInt(u64::try_from(v).unwrap_or(u64::MAX))
    }
}

impl From<char> for FmtArg {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<&str> for FmtArg {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for FmtArg {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&String> for FmtArg {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

/// A parsed `%[flags][width][.precision][length]conversion`.
#[derive(Debug, Default, Clone, Copy)]
#[allow(clippy::struct_excessive_bools)]
struct Spec {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alt: bool,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

/// Expand `format` with `args` the way C's `snprintf` would.
///
/// Supported conversions: `d i u x X o c s f F e E g G` and `%%`, with the
/// `- + space 0 #` flags, width, precision and ignored length modifiers.
/// Surplus arguments are ignored.
///
/// # Errors
///
/// Returns a [`PrintfError`] for an incomplete or unknown conversion, a width
/// or precision above [`MAX_MESSAGE_SIZE`], too few arguments, or an argument
/// whose type does not fit its conversion.
pub fn sprintf(format: &str, args: &[FmtArg]) -> Result<String, PrintfError> {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.char_indices().peekable();
    let mut next_arg = 0usize;

    while let Some((pos, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.next_if(|&(_, c)| c == '%').is_some() {
            out.push('%');
            continue;
        }

        let mut spec = Spec::default();
        while let Some((_, flag)) = chars.next_if(|&(_, c)| "-+ 0#".contains(c)) {
            match flag {
                '-' => spec.left = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '0' => spec.zero = true,
                _ => spec.alt = true,
            }
        }
        spec.width = take_number(&mut chars);
        if chars.next_if(|&(_, c)| c == '.').is_some() {
            spec.precision = Some(take_number(&mut chars));
        }
        if spec.width > MAX_MESSAGE_SIZE || spec.precision.is_some_and(|p| p > MAX_MESSAGE_SIZE) {
            return Err(PrintfError::FieldTooWide(pos));
        }
        while chars.next_if(|&(_, c)| "hlLqjzt".contains(c)).is_some() {}

        let (_, conversion) = chars.next().ok_or(PrintfError::Incomplete(pos))?;
        spec.conversion = conversion;
        if !"diuxXocsfFeEgG".contains(conversion) {
            return Err(PrintfError::UnknownConversion(conversion));
        }

        let arg = args
            .get(next_arg)
            .ok_or(PrintfError::MissingArgument(next_arg))?;
        let rendered = render(&spec, arg).ok_or(PrintfError::Mismatch {
            index: next_arg,
            conversion,
        })?;
        out.push_str(&rendered);
        next_arg += 1;
    }
    Ok(out)
}

/// Cut `text` to [`MAX_MESSAGE_SIZE`] characters, marking the cut.
#[must_use]
pub fn bounded(text: &str) -> String {
    match text.char_indices().nth(MAX_MESSAGE_SIZE) {
        Some((cut, _)) => {
            let mut kept = text.get(..cut).unwrap_or(text).to_string();
            kept.push_str(TRUNCATED_WARNING_TEXT);
            kept
        }
        None => text.to_string(),
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> usize {
    let mut n = 0usize;
    while let Some((_, d)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
        let digit = d.to_digit(10).map_or(0, |d| d as usize);
        n = n.saturating_mul(10).saturating_add(digit);
    }
    n
}

/// Render one argument, or `None` when it does not fit the conversion.
fn render(spec: &Spec, arg: &FmtArg) -> Option<String> {
    match spec.conversion {
        'd' | 'i' => {
            let v = match *arg {
                FmtArg::Int(v) => i128::from(v),
                FmtArg::UInt(v) => i128::from(v),
                _ => return None,
            };
            let digits = integer_digits(v.unsigned_abs(), 10, false, spec.precision);
            Some(pad(spec, sign_of(spec, v < 0), &digits, true))
        }
        'u' | 'x' | 'X' | 'o' => {
            #[allow(clippy::cast_sign_loss)]
            let v = match *arg {
                FmtArg::UInt(v) => v,
                FmtArg::Int(v) => v as u64,
                _ => return None,
            };
            let (radix, upper) = match spec.conversion {
                'x' => (16, false),
                'X' => (16, true),
                'o' => (8, false),
                _ => (10, false),
            };
            let mut digits = integer_digits(u128::from(v), radix, upper, spec.precision);
            let prefix = match spec.conversion {
                'x' if spec.alt && v != 0 => "0x",
                'X' if spec.alt && v != 0 => "0X",
                _ => "",
            };
            if spec.conversion == 'o' && spec.alt && !digits.starts_with('0') {
                digits.insert(0, '0');
            }
            Some(pad(spec, prefix, &digits, true))
        }
        'c' => {
            let c = match *arg {
                FmtArg::Char(c) => c,
                FmtArg::Int(v) => u32::try_from(v).ok().and_then(char::from_u32)?,
                FmtArg::UInt(v) => u32::try_from(v).ok().and_then(char::from_u32)?,
                _ => return None,
            };
            Some(pad(spec, "", &c.to_string(), false))
        }
        's' => {
            let FmtArg::Str(s) = arg else {
                return None;
            };
            let body: String = match spec.precision {
                Some(p) => s.chars().take(p).collect(),
                None => s.clone(),
            };
            Some(pad(spec, "", &body, false))
        }
        _ => {
            let FmtArg::Float(v) = *arg else {
                return None;
            };
            Some(render_float(spec, v))
        }
    }
}

const fn sign_of(spec: &Spec, negative: bool) -> &'static str {
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

fn integer_digits(v: u128, radix: u32, upper: bool, precision: Option<usize>) -> String {
    if v == 0 && precision == Some(0) {
        return String::new();
    }
    let mut digits = match (radix, upper) {
        (16, false) => format!("{v:x}"),
        (16, true) => format!("{v:X}"),
        (8, _) => format!("{v:o}"),
        _ => v.to_string(),
    };
    if let Some(p) = precision
        && digits.len() < p
    {
        digits.insert_str(0, &"0".repeat(p - digits.len()));
    }
    digits
}

/// Apply width, alignment and zero padding around `prefix` + `body`.
fn pad(spec: &Spec, prefix: &str, body: &str, numeric: bool) -> String {
    let len = prefix.chars().count() + body.chars().count();
    let fill = spec.width.saturating_sub(len);
    let mut out = String::with_capacity(len + fill);
    if spec.left {
        out.push_str(prefix);
        out.push_str(body);
        out.push_str(&" ".repeat(fill));
    } else if spec.zero && numeric && (spec.precision.is_none() || !is_integer(spec)) {
        out.push_str(prefix);
        out.push_str(&"0".repeat(fill));
        out.push_str(body);
    } else {
        out.push_str(&" ".repeat(fill));
        out.push_str(prefix);
        out.push_str(body);
    }
    out
}

const fn is_integer(spec: &Spec) -> bool {
    matches!(spec.conversion, 'd' | 'i' | 'u' | 'x' | 'X' | 'o')
}

fn render_float(spec: &Spec, v: f64) -> String {
    let upper = spec.conversion.is_ascii_uppercase();
    let sign = sign_of(spec, v.is_sign_negative() && !v.is_nan());
    if !v.is_finite() {
        let word = if v.is_nan() { "nan" } else { "inf" };
        let word = if upper {
            word.to_ascii_uppercase()
        } else {
            word.to_string()
        };
        return pad(spec, sign, &word, false);
    }

    let magnitude = v.abs();
    let precision = spec.precision.unwrap_or(6);
    let body = match spec.conversion.to_ascii_lowercase() {
        'f' => fixed(magnitude, precision, spec.alt),
        'e' => exponent(magnitude, precision, spec.alt),
        _ => general(magnitude, precision, spec.alt),
    };
    let body = if upper {
        body.to_ascii_uppercase()
    } else {
        body
    };
    pad(spec, sign, &body, true)
}

fn fixed(v: f64, precision: usize, alt: bool) -> String {
    let mut s = format!("{v:.precision$}");
    if alt && precision == 0 {
        s.push('.');
    }
    s
}

/// `d.ddde±XX`, with at least two exponent digits like C.
fn exponent(v: f64, precision: usize, alt: bool) -> String {
    let (mantissa, exp) = split_exponent(v, precision);
    let mut s = mantissa;
    if alt && precision == 0 {
        s.push('.');
    }
    let sign = if exp < 0 { '-' } else { '+' };
    let _ = write!(s, "e{sign}{:02}", exp.unsigned_abs());
    s
}

fn split_exponent(v: f64, precision: usize) -> (String, i32) {
    let rust = format!("{v:.precision$e}");
    match rust.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), exp.parse().unwrap_or(0)),
        None => (rust, 0),
    }
}

fn general(v: f64, precision: usize, alt: bool) -> String {
    let p = precision.max(1);
    let (_, x) = if v == 0.0 {
        (String::new(), 0)
    } else {
        split_exponent(v, p - 1)
    };
    let p_i = i32::try_from(p).unwrap_or(i32::MAX);
    let s = if x >= -4 && x < p_i {
        let decimals = usize::try_from(p_i - 1 - x).unwrap_or(0);
        fixed(v, decimals, alt)
    } else {
        exponent(v, p - 1, alt)
    };
    if alt {
        return s;
    }
    match s.split_once('e') {
        Some((mantissa, exp)) => format!("{}e{exp}", strip_fraction_zeros(mantissa)),
        None => strip_fraction_zeros(&s).to_string(),
    }
}

fn strip_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
