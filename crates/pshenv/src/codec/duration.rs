//! Signed elapsed time with the platform's compact text form.
//!
//! Route cache settings carry values such as `"3m0s"` or `"-1s"`, so the
//! value is a signed count of nanoseconds rather than a [`std::time::Duration`].

use std::fmt;
use std::str::FromStr;

use super::{CodecError, TextCodec, serde_via_text};

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// Largest magnitude a negative duration may have (`|i64::MIN|`).
const NEG_LIMIT: u64 = 1 << 63;

/// A signed span of time with nanosecond resolution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

impl Duration {
    /// The zero duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration from a nanosecond count.
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Creates a duration from whole seconds, saturating on overflow.
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(SECOND as i64))
    }

    /// Returns the nanosecond count.
    #[must_use]
    pub const fn as_nanos(&self) -> i64 {
        self.0
    }

    /// Returns `true` for spans shorter than zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Converts from a standard duration, or `None` when it does not fit.
    #[must_use]
    pub fn from_std(duration: std::time::Duration) -> Option<Self> {
        i64::try_from(duration.as_nanos()).ok().map(Self)
    }

    /// Converts to a standard duration, or `None` when negative.
    #[must_use]
    pub fn as_std(&self) -> Option<std::time::Duration> {
        u64::try_from(self.0).ok().map(std::time::Duration::from_nanos)
    }

    fn parse(text: &str) -> Result<Self, CodecError> {
        let invalid = || CodecError::duration(text, "invalid duration");

        let mut rest = text;
        let mut negative = false;
        if let Some(first) = rest.chars().next()
            && (first == '-' || first == '+')
        {
            negative = first == '-';
            rest = &rest[1..];
        }

        if rest == "0" {
            return Ok(Self::ZERO);
        }
        if rest.is_empty() {
            return Err(invalid());
        }

        let mut total: u64 = 0;
        while !rest.is_empty() {
            let first = rest.as_bytes()[0];
            if !(first == b'.' || first.is_ascii_digit()) {
                return Err(invalid());
            }

            let before = rest.len();
            let (whole, after) = leading_int(rest).ok_or_else(invalid)?;
            rest = after;
            let has_whole = before != rest.len();

            let mut fraction = 0u64;
            let mut scale = 1f64;
            let mut has_fraction = false;
            if let Some(after_dot) = rest.strip_prefix('.') {
                let before = after_dot.len();
                let (f, s, after) = leading_fraction(after_dot);
                fraction = f;
                scale = s;
                rest = after;
                has_fraction = before != rest.len();
            }

            if !has_whole && !has_fraction {
                return Err(invalid());
            }

            let unit_len = rest
                .find(|c: char| c == '.' || c.is_ascii_digit())
                .unwrap_or(rest.len());
            if unit_len == 0 {
                return Err(CodecError::duration(text, "missing unit in duration"));
            }
            let (unit_text, after) = rest.split_at(unit_len);
            rest = after;

            let unit = unit_nanos(unit_text)
                .ok_or_else(|| CodecError::duration(text, "unknown unit in duration"))?;

            if whole > NEG_LIMIT / unit {
                return Err(invalid());
            }
            let mut value = whole * unit;
            if fraction > 0 {
                #[allow(
                    clippy::cast_precision_loss,
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss
                )]
                let extra = (fraction as f64 * (unit as f64 / scale)) as u64;
                value = value.checked_add(extra).ok_or_else(invalid)?;
                if value > NEG_LIMIT {
                    return Err(invalid());
                }
            }

            total = total.checked_add(value).ok_or_else(invalid)?;
            if total > NEG_LIMIT {
                return Err(invalid());
            }
        }

        if negative {
            // total <= 2^63, so the wrapping negation lands exactly on i64::MIN at the edge.
            #[allow(clippy::cast_possible_wrap)]
            return Ok(Self((total as i64).wrapping_neg()));
        }
        i64::try_from(total).map(Self).map_err(|_| invalid())
    }
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Consumes leading ASCII digits. `None` on overflow.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    for digit in s[..end].bytes() {
        if value > NEG_LIMIT / 10 {
            return None;
        }
        value = value * 10 + u64::from(digit - b'0');
        if value > NEG_LIMIT {
            return None;
        }
    }
    Some((value, &s[end..]))
}

/// Consumes leading fraction digits, dropping precision once the
/// accumulator would overflow.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    let mut scale = 1f64;
    let mut overflow = false;
    for digit in s[..end].bytes() {
        if overflow {
            continue;
        }
        if value > (NEG_LIMIT - 1) / 10 {
            overflow = true;
            continue;
        }
        let next = value * 10 + u64::from(digit - b'0');
        if next > NEG_LIMIT {
            overflow = true;
            continue;
        }
        value = next;
        scale *= 10.0;
    }
    (value, scale, &s[end..])
}

/// Splits `v` into `v / 10^prec` and the fractional digits, trailing zeros
/// trimmed (empty when the fraction is zero).
fn split_fraction(mut v: u64, prec: u32) -> (u64, String) {
    let mut digits = Vec::with_capacity(prec as usize);
    let mut printed = false;
    for _ in 0..prec {
        let digit = v % 10;
        printed = printed || digit != 0;
        if printed {
            digits.push(char::from(b'0' + u8::try_from(digit).unwrap_or(0)));
        }
        v /= 10;
    }
    if digits.is_empty() {
        return (v, String::new());
    }
    digits.push('.');
    (v, digits.into_iter().rev().collect())
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        if magnitude == 0 {
            return f.write_str("0s");
        }
        if self.is_negative() {
            f.write_str("-")?;
        }

        if magnitude < SECOND {
            let (prec, unit) = if magnitude < MICROSECOND {
                (0, "ns")
            } else if magnitude < MILLISECOND {
                (3, "\u{00b5}s")
            } else {
                (6, "ms")
            };
            let (whole, frac) = split_fraction(magnitude, prec);
            return write!(f, "{whole}{frac}{unit}");
        }

        let (secs, frac) = split_fraction(magnitude, 9);
        let hours = secs / 3600;
        let minutes = (secs / 60) % 60;
        let seconds = secs % 60;
        if hours > 0 {
            write!(f, "{hours}h{minutes}m")?;
        } else if minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        write!(f, "{seconds}{frac}s")
    }
}

impl FromStr for Duration {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TextCodec for Duration {
    fn marshal_text(&self) -> Result<String, CodecError> {
        tracing::trace!("Duration::marshal_text");
        Ok(self.to_string())
    }

    fn unmarshal_text(text: &str) -> Result<Self, CodecError> {
        tracing::trace!("Duration::unmarshal_text");
        Self::parse(text)
    }
}

serde_via_text!(Duration);

impl From<std::time::Duration> for Duration {
    /// Saturates at the largest representable span.
    fn from(value: std::time::Duration) -> Self {
        Self::from_std(value).unwrap_or(Self(i64::MAX))
    }
}
