//! # Canonical JSON Text
//!
//! Compact JSON output whose numbers are written the way ECMAScript's
//! `Number::toString` writes them, so artifacts match `JSON.stringify`
//! byte-for-byte.
//!
//! | value    | serde_json default | here      |
//! |----------|--------------------|-----------|
//! | `1.0`    | `1.0`              | `1`       |
//! | `-0.0`   | `-0.0`             | `0`       |
//! | `1e21`   | `1e21`             | `1e+21`   |
//! | `1.5e-7` | `1.5e-7`           | `1.5e-7`  |
//! | `1e20`   | `1e20`             | `100000000000000000000` |

use crate::error::{CodecError, Result};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// `serde_json` formatter writing floats in `JSON.stringify` notation
#[derive(Debug, Clone, Copy, Default)]
pub struct StringifyFormatter;

impl Formatter for StringifyFormatter {
    fn write_f32<W>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.write_f64(writer, f64::from(value))
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(number_text(value).as_bytes())
    }
}

/// Serialize `data` as compact JSON text
pub fn to_string<T>(data: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let mut out = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, StringifyFormatter);
    data.serialize(&mut serializer).map_err(CodecError::serialize)?;
    String::from_utf8(out).map_err(CodecError::serialize)
}

/// Render a finite float the way `Number.prototype.toString` does
///
/// Non-finite values never reach the formatter; `serde_json` writes them as `null`.
pub fn number_text(value: f64) -> String {
    if value == 0.0 {
        return String::from("0");
    }

    // `{:e}` yields the shortest round-tripping digits, e.g. `1.2345e-7`
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let k = digits.len() as i32;
    let n = exponent + 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if value < 0.0 {
        out.push('-');
    }

    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        out.push_str(int_part);
        out.push('.');
        out.push_str(frac_part);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-n) as usize));
        out.push_str(&digits);
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('e');
        out.push(if n >= 1 { '+' } else { '-' });
        out.push_str(&(n - 1).abs().to_string());
    }
    out
}
