//! Conversion of raw argument text into the typed destinations of `ArgType`.

use crate::{ArgType, Error, Expected, Limit, OptionName, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    Format,
    Range(Limit),
}

/// Split an optional leading sign; the rest must be a non-empty run of
/// ASCII digits. Callers handle empty text, which reads as zero.
fn signed_digits(text: &str) -> std::result::Result<bool, Rejection> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Rejection::Format);
    }
    Ok(negative)
}

pub(crate) fn parse_uint(text: &str) -> std::result::Result<u64, Rejection> {
    if text.is_empty() {
        return Ok(0);
    }
    if signed_digits(text)? {
        return Err(Rejection::Format);
    }
    text.parse().map_err(|_| Rejection::Range(Limit::TooLarge))
}

pub(crate) fn parse_int(text: &str) -> std::result::Result<i64, Rejection> {
    if text.is_empty() {
        return Ok(0);
    }
    let negative = signed_digits(text)?;
    text.parse().map_err(|_| {
        Rejection::Range(if negative {
            Limit::TooSmall
        } else {
            Limit::TooLarge
        })
    })
}

fn spells_infinity(text: &str) -> bool {
    let body = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    body.eq_ignore_ascii_case("inf") || body.eq_ignore_ascii_case("infinity")
}

fn has_nonzero_mantissa(text: &str) -> bool {
    text.split(|c: char| c == 'e' || c == 'E')
        .next()
        .unwrap_or_default()
        .bytes()
        .any(|b| matches!(b, b'1'..=b'9'))
}

pub(crate) fn parse_float(text: &str) -> std::result::Result<f64, Rejection> {
    if text.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = text.parse().map_err(|_| Rejection::Format)?;
    if value.is_infinite() && !spells_infinity(text) {
        return Err(Rejection::Range(if value > 0.0 {
            Limit::TooLarge
        } else {
            Limit::TooSmall
        }));
    }
    if value == 0.0 && has_nonzero_mantissa(text) {
        return Err(Rejection::Range(Limit::Underflow));
    }
    Ok(value)
}

fn checked<T>(
    parsed: std::result::Result<T, Rejection>,
    argument: &str,
    option: &OptionName,
    expected: Expected,
) -> Result<T> {
    parsed.map_err(|rejection| match rejection {
        Rejection::Format => Error::InvalidFormat {
            argument: argument.to_string(),
            option: option.clone(),
            expected,
        },
        Rejection::Range(limit) => Error::OutOfRange {
            argument: argument.to_string(),
            option: option.clone(),
            limit,
        },
    })
}

impl<'a> ArgType<'_, 'a> {
    /// Apply an option that takes no argument.
    pub(crate) fn apply_flag(&self, option: &OptionName) -> Result<()> {
        match self {
            ArgType::Bool(cell) => cell.set(true),
            ArgType::NegatedBool(cell) => cell.set(false),
            ArgType::CallbackNoArg(func) => {
                func(None, option).map_err(Error::CallbackRejected)?;
            }
            _ => {
                return Err(Error::Bug {
                    kind: self.kind_name(),
                    option: option.clone(),
                })
            }
        }
        Ok(())
    }

    /// Convert `value` and store it. The destination is left untouched when
    /// conversion fails.
    pub(crate) fn apply_value(&self, value: &'a str, option: &OptionName) -> Result<()> {
        match self {
            ArgType::String(cell) => cell.set(Some(value)),
            ArgType::Int(cell) => {
                cell.set(checked(parse_int(value), value, option, Expected::Integer)?)
            }
            ArgType::UInt(cell) => cell.set(checked(
                parse_uint(value),
                value,
                option,
                Expected::UnsignedInteger,
            )?),
            ArgType::Float(cell) => {
                cell.set(checked(parse_float(value), value, option, Expected::Float)?)
            }
            ArgType::Callback(func) => {
                func(Some(value), option).map_err(Error::CallbackRejected)?;
            }
            ArgType::Bool(_) | ArgType::NegatedBool(_) | ArgType::CallbackNoArg(_) => {
                return Err(Error::Bug {
                    kind: self.kind_name(),
                    option: option.clone(),
                })
            }
        }
        Ok(())
    }
}
