//! Positional (printf-style) message formatting.
//!
//! Supports the conversions translators actually put into templates:
//! `%s`, `%d`, `%u`, `%f`/`%F`, `%e`/`%E`, `%x`/`%X`, `%o`, `%b`, `%c` and
//! the `%%` escape, together with argument numbers (`%2$s`), the `-`, `+`,
//! `0`, space and `'c` (custom padding) flags, width and precision.
//!
//! Width and precision are capped at 65535; larger values are rejected.
//!
//! Unlike the lenient C-family implementations, argument count mismatches
//! are reported as errors in both directions.

use crate::i18n::error::FormatError;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

type Chars<'a> = Peekable<CharIndices<'a>>;

/// Largest accepted width or precision.
const MAX_FIELD: usize = u16::MAX as usize;

/// A single positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    Str(String),
    Int(i64),
    Float(f64),
}

impl FormatArg {
    fn to_int(&self, position: usize, conversion: char) -> Result<i64, FormatError> {
        match self {
            FormatArg::Int(n) => Ok(*n),
            FormatArg::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
            FormatArg::Str(s) => {
                let trimmed = s.trim();
                if let Ok(n) = trimmed.parse::<i64>() {
                    return Ok(n);
                }
                match trimmed.parse::<f64>() {
                    Ok(v) if v.is_finite() => Ok(v.trunc() as i64),
                    _ => Err(self.incompatible(position, conversion)),
                }
            }
            FormatArg::Float(_) => Err(self.incompatible(position, conversion)),
        }
    }

    fn to_float(&self, position: usize, conversion: char) -> Result<f64, FormatError> {
        match self {
            FormatArg::Int(n) => Ok(*n as f64),
            FormatArg::Float(v) => Ok(*v),
            FormatArg::Str(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| self.incompatible(position, conversion)),
        }
    }

    fn incompatible(&self, position: usize, conversion: char) -> FormatError {
        FormatError::IncompatibleArgument {
            position,
            conversion,
            value: self.to_string(),
        }
    }
}

impl fmt::Display for FormatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatArg::Str(s) => f.write_str(s),
            FormatArg::Int(n) => write!(f, "{}", n),
            FormatArg::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FormatArg {
    fn from(value: &str) -> Self {
        FormatArg::Str(value.to_string())
    }
}

impl From<String> for FormatArg {
    fn from(value: String) -> Self {
        FormatArg::Str(value)
    }
}

impl From<i64> for FormatArg {
    fn from(value: i64) -> Self {
        FormatArg::Int(value)
    }
}

impl From<i32> for FormatArg {
    fn from(value: i32) -> Self {
        FormatArg::Int(value.into())
    }
}

impl From<u32> for FormatArg {
    fn from(value: u32) -> Self {
        FormatArg::Int(value.into())
    }
}

impl From<usize> for FormatArg {
    fn from(value: usize) -> Self {
        FormatArg::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for FormatArg {
    fn from(value: f64) -> Self {
        FormatArg::Float(value)
    }
}

impl From<f32> for FormatArg {
    fn from(value: f32) -> Self {
        FormatArg::Float(value.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Str,
    Int,
    Unsigned,
    Float,
    Exp { upper: bool },
    Hex { upper: bool },
    Octal,
    Binary,
    Char,
}

impl Conversion {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            's' => Conversion::Str,
            'd' => Conversion::Int,
            'u' => Conversion::Unsigned,
            'f' | 'F' => Conversion::Float,
            'e' => Conversion::Exp { upper: false },
            'E' => Conversion::Exp { upper: true },
            'x' => Conversion::Hex { upper: false },
            'X' => Conversion::Hex { upper: true },
            'o' => Conversion::Octal,
            'b' => Conversion::Binary,
            'c' => Conversion::Char,
            _ => return None,
        })
    }
}

/// One parsed `%...` directive.
#[derive(Debug)]
struct Specifier {
    argnum: Option<usize>,
    left_align: bool,
    plus_sign: bool,
    pad: char,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
    conversion_char: char,
}

impl Specifier {
    /// Parse the directive following a `%` found at byte `offset`.
    fn parse(chars: &mut Chars<'_>, offset: usize) -> Result<Self, FormatError> {
        let mut argnum = None;
        let mut lookahead = chars.clone();
        if let Some(n) = take_number(&mut lookahead) {
            if let Some(&(_, '$')) = lookahead.peek() {
                lookahead.next();
                if n == 0 {
                    return Err(FormatError::ZeroArgumentNumber { offset });
                }
                argnum = Some(n);
                *chars = lookahead;
            }
        }

        let mut left_align = false;
        let mut plus_sign = false;
        let mut pad = ' ';
        loop {
            match chars.peek().map(|&(_, c)| c) {
                Some('-') => left_align = true,
                Some('+') => plus_sign = true,
                Some('0') => pad = '0',
                Some(' ') => pad = ' ',
                Some('\'') => {
                    chars.next();
                    pad = chars
                        .peek()
                        .map(|&(_, c)| c)
                        .ok_or(FormatError::IncompleteSpecifier { offset })?;
                }
                _ => break,
            }
            chars.next();
        }

        let width = take_number(chars).unwrap_or(0);
        let precision = match chars.peek() {
            Some(&(_, '.')) => {
                chars.next();
                Some(take_number(chars).unwrap_or(0))
            }
            _ => None,
        };
        if width > MAX_FIELD || precision.is_some_and(|p| p > MAX_FIELD) {
            return Err(FormatError::SpecifierOutOfRange {
                offset,
                max: MAX_FIELD,
            });
        }

        let (conv_offset, conversion_char) = chars
            .next()
            .ok_or(FormatError::IncompleteSpecifier { offset })?;
        let conversion =
            Conversion::from_char(conversion_char).ok_or(FormatError::UnknownConversion {
                conversion: conversion_char,
                offset: conv_offset,
            })?;

        Ok(Specifier {
            argnum,
            left_align,
            plus_sign,
            pad,
            width,
            precision,
            conversion,
            conversion_char,
        })
    }

    /// Render `arg` (1-based `position`) according to this directive.
    fn render(&self, arg: &FormatArg, position: usize) -> Result<String, FormatError> {
        let conv = self.conversion_char;
        let rendered = match self.conversion {
            Conversion::Str => {
                let text = arg.to_string();
                let text: String = match self.precision {
                    Some(p) => text.chars().take(p).collect(),
                    None => text,
                };
                self.pad_number("", &text)
            }
            Conversion::Int => {
                let n = arg.to_int(position, conv)?;
                self.pad_number(self.sign(n < 0), &n.unsigned_abs().to_string())
            }
            Conversion::Unsigned => {
                let n = arg.to_int(position, conv)? as u64;
                self.pad_number("", &n.to_string())
            }
            Conversion::Float => {
                let v = arg.to_float(position, conv)?;
                let body = format!("{:.*}", self.precision.unwrap_or(6), v.abs());
                self.pad_number(self.sign(v < 0.0), &body)
            }
            Conversion::Exp { upper } => {
                let v = arg.to_float(position, conv)?;
                let body = exponent_notation(v.abs(), self.precision.unwrap_or(6), upper);
                self.pad_number(self.sign(v < 0.0), &body)
            }
            Conversion::Hex { upper } => {
                let n = arg.to_int(position, conv)? as u64;
                let body = if upper {
                    format!("{:X}", n)
                } else {
                    format!("{:x}", n)
                };
                self.pad_number("", &body)
            }
            Conversion::Octal => {
                let n = arg.to_int(position, conv)? as u64;
                self.pad_number("", &format!("{:o}", n))
            }
            Conversion::Binary => {
                let n = arg.to_int(position, conv)? as u64;
                self.pad_number("", &format!("{:b}", n))
            }
            Conversion::Char => {
                let n = arg.to_int(position, conv)?;
                let c = u32::try_from(n)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| arg.incompatible(position, conv))?;
                self.pad_number("", &c.to_string())
            }
        };
        Ok(rendered)
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus_sign {
            "+"
        } else {
            ""
        }
    }

    /// Apply width and padding; zero padding goes between sign and digits.
    fn pad_number(&self, sign: &str, body: &str) -> String {
        let len = sign.chars().count() + body.chars().count();
        if self.width <= len {
            return format!("{}{}", sign, body);
        }
        let fill = self.width - len;
        if self.left_align {
            let pad = if self.pad == '0' { ' ' } else { self.pad };
            format!("{}{}{}", sign, body, repeat(pad, fill))
        } else if self.pad == '0' {
            format!("{}{}{}", sign, repeat('0', fill), body)
        } else {
            format!("{}{}{}", repeat(self.pad, fill), sign, body)
        }
    }
}

fn repeat(c: char, count: usize) -> String {
    std::iter::repeat(c).take(count).collect()
}

fn take_number(chars: &mut Chars<'_>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(&(_, c)) = chars.peek() {
        let Some(digit) = c.to_digit(10) else {
            break;
        };
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit as usize),
        );
        chars.next();
    }
    value
}

/// `1.234500e+3` style: explicit exponent sign, no exponent zero padding.
fn exponent_notation(value: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, value);
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let marker = if upper { 'E' } else { 'e' };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}{}{}{}", mantissa, marker, sign, exponent.unsigned_abs())
}

/// Format `template` with positional `args`.
///
/// Every supplied argument must be consumed by the template; a directive
/// referencing an argument past the end of `args` is an error as well.
pub fn sprintf(template: &str, args: &[FormatArg]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    let mut next_arg = 0;
    let mut used = 0;

    while let Some((offset, ch)) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        if let Some(&(_, '%')) = chars.peek() {
            chars.next();
            out.push('%');
            continue;
        }

        let specifier = Specifier::parse(&mut chars, offset)?;
        let index = match specifier.argnum {
            Some(n) => n - 1,
            None => {
                next_arg += 1;
                next_arg - 1
            }
        };
        let arg = args.get(index).ok_or(FormatError::MissingArgument {
            position: index + 1,
            supplied: args.len(),
        })?;
        used = used.max(index + 1);
        out.push_str(&specifier.render(arg, index + 1)?);
    }

    if used < args.len() {
        return Err(FormatError::UnusedArguments {
            used,
            supplied: args.len(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(template: &str, args: &[FormatArg]) -> String {
        sprintf(template, args).unwrap()
    }

    // ==================== Basic Conversion Tests ====================

    #[test]
    fn test_integer_conversion() {
        assert_eq!(fmt("%d items", &[5.into()]), "5 items");
        assert_eq!(fmt("%d", &[(-42).into()]), "-42");
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!(
            fmt("%s has %d new messages", &["Ann".into(), 3.into()]),
            "Ann has 3 new messages"
        );
    }

    #[test]
    fn test_percent_escape() {
        assert_eq!(fmt("100%%", &[]), "100%");
        assert_eq!(fmt("%d%% done", &[40.into()]), "40% done");
    }

    #[test]
    fn test_float_default_and_precision() {
        assert_eq!(fmt("%f", &[1.5.into()]), "1.500000");
        assert_eq!(fmt("%.2f EUR", &[4.56789.into()]), "4.57 EUR");
        assert_eq!(fmt("%.0f", &[2.0.into()]), "2");
    }

    #[test]
    fn test_exponent_notation() {
        assert_eq!(fmt("%e", &[1234.5.into()]), "1.234500e+3");
        assert_eq!(fmt("%.2E", &[0.00123.into()]), "1.23E-3");
    }

    #[test]
    fn test_radix_conversions() {
        assert_eq!(fmt("%x", &[255.into()]), "ff");
        assert_eq!(fmt("%X", &[255.into()]), "FF");
        assert_eq!(fmt("%o", &[8.into()]), "10");
        assert_eq!(fmt("%b", &[5.into()]), "101");
    }

    #[test]
    fn test_unsigned_of_negative_wraps() {
        assert_eq!(fmt("%u", &[(-1).into()]), "18446744073709551615");
    }

    #[test]
    fn test_char_conversion() {
        assert_eq!(fmt("%c%c", &[72.into(), 105.into()]), "Hi");
    }

    #[test]
    fn test_char_conversion_honours_width() {
        assert_eq!(fmt("[%3c]", &[65.into()]), "[  A]");
        assert_eq!(fmt("[%-3c]", &[65.into()]), "[A  ]");
    }

    #[test]
    fn test_display_of_float_argument_in_string_slot() {
        assert_eq!(fmt("%s", &[2.5.into()]), "2.5");
    }

    // ==================== Flags, Width, Precision ====================

    #[test]
    fn test_zero_padding_keeps_sign_in_front() {
        assert_eq!(fmt("%05d", &[42.into()]), "00042");
        assert_eq!(fmt("%05d", &[(-42).into()]), "-0042");
        assert_eq!(fmt("%06.2f", &[4.56789.into()]), "004.57");
    }

    #[test]
    fn test_plus_flag() {
        assert_eq!(fmt("%+d", &[7.into()]), "+7");
        assert_eq!(fmt("%+d", &[(-7).into()]), "-7");
    }

    #[test]
    fn test_width_and_alignment() {
        assert_eq!(fmt("[%5s]", &["ab".into()]), "[   ab]");
        assert_eq!(fmt("[%-5s]", &["ab".into()]), "[ab   ]");
        assert_eq!(fmt("[%-05d]", &[3.into()]), "[3    ]");
    }

    #[test]
    fn test_custom_padding_character() {
        assert_eq!(fmt("%'*8s", &["abc".into()]), "*****abc");
        assert_eq!(fmt("%'.10d", &[42.into()]), "........42");
    }

    #[test]
    fn test_string_precision_truncates() {
        assert_eq!(fmt("%.3s", &["abcdef".into()]), "abc");
        assert_eq!(fmt("%.2s", &["čšžý".into()]), "čš");
    }

    #[test]
    fn test_argument_numbers() {
        assert_eq!(
            fmt("%2$s before %1$s", &["first".into(), "second".into()]),
            "second before first"
        );
        assert_eq!(fmt("%1$s and %1$s", &["echo".into()]), "echo and echo");
    }

    // ==================== Argument Coercion ====================

    #[test]
    fn test_numeric_string_accepted_for_integer() {
        assert_eq!(fmt("%d", &["12".into()]), "12");
        assert_eq!(fmt("%d", &[" 7.9 ".into()]), "7");
    }

    #[test]
    fn test_float_truncated_for_integer() {
        assert_eq!(fmt("%d", &[9.99.into()]), "9");
    }

    #[test]
    fn test_integer_accepted_for_float() {
        assert_eq!(fmt("%.1f", &[3.into()]), "3.0");
    }

    // ==================== Error Tests ====================

    #[test]
    fn test_too_few_arguments() {
        let err = sprintf("%s and %s", &["one".into()]).unwrap_err();
        assert_eq!(
            err,
            FormatError::MissingArgument {
                position: 2,
                supplied: 1
            }
        );
    }

    #[test]
    fn test_too_many_arguments() {
        let err = sprintf("%s", &["one".into(), "two".into()]).unwrap_err();
        assert_eq!(
            err,
            FormatError::UnusedArguments {
                used: 1,
                supplied: 2
            }
        );
    }

    #[test]
    fn test_arguments_without_directives() {
        let err = sprintf("plain text", &[1.into()]).unwrap_err();
        assert!(matches!(err, FormatError::UnusedArguments { used: 0, .. }));
    }

    #[test]
    fn test_non_numeric_string_for_integer() {
        let err = sprintf("%d items", &["many".into()]).unwrap_err();
        assert_eq!(
            err,
            FormatError::IncompatibleArgument {
                position: 1,
                conversion: 'd',
                value: "many".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_conversion() {
        let err = sprintf("%y", &[1.into()]).unwrap_err();
        assert_eq!(
            err,
            FormatError::UnknownConversion {
                conversion: 'y',
                offset: 1
            }
        );
    }

    #[test]
    fn test_trailing_percent_is_incomplete() {
        let err = sprintf("50%", &[]).unwrap_err();
        assert_eq!(err, FormatError::IncompleteSpecifier { offset: 2 });
    }

    #[test]
    fn test_zero_argument_number() {
        let err = sprintf("%0$s", &["x".into()]).unwrap_err();
        assert_eq!(err, FormatError::ZeroArgumentNumber { offset: 0 });
    }

    #[test]
    fn test_invalid_code_point_for_char() {
        let err = sprintf("%c", &[(-1).into()]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::IncompatibleArgument { conversion: 'c', .. }
        ));
    }

    #[test]
    fn test_huge_precision_is_rejected() {
        let err = sprintf("%.70000f EUR", &[1.5.into()]).unwrap_err();
        assert_eq!(
            err,
            FormatError::SpecifierOutOfRange {
                offset: 0,
                max: 65535
            }
        );
        assert!(sprintf("%.70000e", &[1.5.into()]).is_err());
    }

    #[test]
    fn test_huge_width_is_rejected() {
        let err = sprintf("%99999999999999999999s", &["a".into()]).unwrap_err();
        assert!(matches!(err, FormatError::SpecifierOutOfRange { offset: 0, .. }));
        assert!(sprintf("x %70000d", &[1.into()]).is_err());
    }

    #[test]
    fn test_largest_field_accepted() {
        let out = fmt("%65535s", &["a".into()]);
        assert_eq!(out.len(), 65535);
        assert!(out.ends_with('a'));
    }
}
