//! Number and unit rendering for quantities
//!
//! # Magnitude rule
//!
//! With no explicit number format, precision follows the magnitude of each
//! element so that roughly four significant digits are shown:
//!
//! | `|v|`              | rendering           |
//! |--------------------|---------------------|
//! | 0                  | `0`                 |
//! | < 0.1 or > 9999.9  | `1.23E-03`          |
//! | [0.1, 10)          | 3 decimals          |
//! | [10, 100)          | 2 decimals          |
//! | [100, 1000)        | 1 decimal           |
//! | [1000, 9999.9]     | no decimals         |
//!
//! # Explicit formats
//!
//! A subset of Python's format mini-language is accepted:
//! `[+][0][width][.precision][type]` with type one of `f F e E g G %`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::QuantityError;
use super::value::Value;
use crate::units::UnitToken;

/// Typst escape for the dot operator placed between number and unit factors
const TYPST_DOT: &str = "\\u{22C5}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatStyle {
    /// `5.000 kg m s-2`
    #[default]
    Plain,
    /// `$ 5.000 \u{22C5} kg \u{22C5} m \u{22C5} s#super[-2] $`
    Typst,
}

impl FromStr for FormatStyle {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(FormatStyle::Plain),
            "typst" => Ok(FormatStyle::Typst),
            other => Err(QuantityError::FormatSpec(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatKind {
    Magnitude,
    /// No type character: shortest round-trip rendering
    Repr,
    Fixed,
    Scientific { upper: bool },
    /// `keep_point` marks a precision given without a type, which keeps a
    /// trailing `.0` on integral fixed-point output
    General { upper: bool, keep_point: bool },
    Percent,
}

/// Parsed number format; the empty string selects the magnitude rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    kind: FormatKind,
    plus_sign: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::magnitude()
    }
}

impl NumberFormat {
    pub fn magnitude() -> Self {
        Self {
            kind: FormatKind::Magnitude,
            plus_sign: false,
            zero_pad: false,
            width: None,
            precision: None,
        }
    }

    pub fn is_magnitude(&self) -> bool {
        self.kind == FormatKind::Magnitude
    }

    pub fn render(&self, v: f64) -> String {
        let body = match self.kind {
            FormatKind::Magnitude => return magnitude(v),
            FormatKind::Repr => repr(v),
            FormatKind::Fixed => fixed(v, self.precision.unwrap_or(6)),
            FormatKind::Scientific { upper } => scientific(v, self.precision.unwrap_or(6), upper),
            FormatKind::General { upper, keep_point } => {
                general(v, self.precision.unwrap_or(6).max(1), upper, keep_point)
            }
            FormatKind::Percent => format!("{}%", fixed(v * 100.0, self.precision.unwrap_or(6))),
        };
        self.pad(body)
    }

    fn pad(&self, body: String) -> String {
        let (sign, digits) = match body.strip_prefix('-') {
            Some(rest) => ("-", rest.to_string()),
            None if self.plus_sign && !body.starts_with("nan") => ("+", body),
            None => ("", body),
        };
        let width = self.width.unwrap_or(0);
        let len = sign.len() + digits.chars().count();
        if len >= width {
            return format!("{sign}{digits}");
        }
        let fill = width - len;
        if self.zero_pad {
            format!("{sign}{}{digits}", "0".repeat(fill))
        } else {
            format!("{}{sign}{digits}", " ".repeat(fill))
        }
    }
}

impl FromStr for NumberFormat {
    type Err = QuantityError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut format = NumberFormat::magnitude();
        if spec.is_empty() {
            return Ok(format);
        }
        let invalid = || QuantityError::FormatSpec(spec.to_string());

        let mut rest = spec;
        if let Some(r) = rest.strip_prefix('+') {
            format.plus_sign = true;
            rest = r;
        }
        if let Some(r) = rest.strip_prefix('0') {
            format.zero_pad = true;
            rest = r;
        }

        let (width, r) = take_digits(rest);
        format.width = width;
        rest = r;

        if let Some(r) = rest.strip_prefix('.') {
            let (precision, r) = take_digits(r);
            format.precision = Some(precision.ok_or_else(invalid)?);
            rest = r;
        }

        format.kind = match rest {
            "" if format.precision.is_some() => FormatKind::General {
                upper: false,
                keep_point: true,
            },
            "" => FormatKind::Repr,
            "f" | "F" => FormatKind::Fixed,
            "e" => FormatKind::Scientific { upper: false },
            "E" => FormatKind::Scientific { upper: true },
            "g" => FormatKind::General {
                upper: false,
                keep_point: false,
            },
            "G" => FormatKind::General {
                upper: true,
                keep_point: false,
            },
            "%" => FormatKind::Percent,
            _ => return Err(invalid()),
        };
        Ok(format)
    }
}

fn take_digits(s: &str) -> (Option<usize>, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return (None, s);
    }
    (s[..end].parse().ok(), &s[end..])
}

fn non_finite(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

fn fixed(v: f64, precision: usize) -> String {
    if !v.is_finite() {
        return non_finite(v);
    }
    format!("{v:.precision$}")
}

/// Scientific notation with a signed, at least two digit exponent (`1.00E-03`)
fn scientific(v: f64, precision: usize, upper: bool) -> String {
    if !v.is_finite() {
        return non_finite(v);
    }
    let raw = format!("{v:.precision$e}");
    let (mantissa, exp) = split_exponent(&raw);
    join_exponent(mantissa, exp, upper)
}

fn split_exponent(raw: &str) -> (&str, i32) {
    match raw.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (raw, 0),
    }
}

fn join_exponent(mantissa: &str, exp: i32, upper: bool) -> String {
    let e = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exp.abs())
}

fn general(v: f64, precision: usize, upper: bool, keep_point: bool) -> String {
    if !v.is_finite() {
        return non_finite(v);
    }
    if v == 0.0 {
        return if keep_point { "0.0" } else { "0" }.to_string();
    }
    let raw = format!("{v:.prec$e}", prec = precision - 1);
    let (mantissa, exp) = split_exponent(&raw);
    if exp >= -4 && (exp as i64) < precision as i64 {
        let decimals = (precision as i64 - 1 - exp as i64).max(0) as usize;
        let fixed = strip_zeros(&format!("{v:.decimals$}")).to_string();
        if keep_point && !fixed.contains('.') {
            format!("{fixed}.0")
        } else {
            fixed
        }
    } else {
        join_exponent(strip_zeros(mantissa), exp, upper)
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Shortest round-trip rendering with a signed two-digit exponent
/// (`1e+20`, `1.5e-07`)
pub(crate) fn repr(v: f64) -> String {
    if !v.is_finite() {
        return non_finite(v);
    }
    let raw = format!("{v:?}");
    match raw.split_once('e') {
        Some(_) => {
            let (mantissa, exp) = split_exponent(&raw);
            join_exponent(mantissa, exp, false)
        }
        None => raw,
    }
}

/// Precision chosen from the magnitude of `v`
pub fn magnitude(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if !v.is_finite() {
        return non_finite(v);
    }
    let a = v.abs();
    if a < 0.1 || a > 9999.9 {
        scientific(v, 2, true)
    } else if a < 10.0 {
        format!("{v:.3}")
    } else if a < 100.0 {
        format!("{v:.2}")
    } else if a < 1000.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.0}")
    }
}

fn typst_unit(tokens: &[UnitToken]) -> String {
    tokens
        .iter()
        .map(|t| {
            if t.exponent == 1 {
                t.symbol.clone()
            } else {
                format!("{}#super[{}]", t.symbol, t.exponent)
            }
        })
        .collect::<Vec<_>>()
        .join(&format!(" {TYPST_DOT} "))
}

/// Render a payload and its unit in the requested style.
pub(crate) fn render(
    value: &Value,
    unit: &str,
    tokens: &[UnitToken],
    number: &NumberFormat,
    style: FormatStyle,
) -> String {
    let numbers = value.render(&|v| number.render(v));
    match style {
        FormatStyle::Plain if tokens.is_empty() => numbers,
        FormatStyle::Plain => format!("{numbers} {unit}"),
        FormatStyle::Typst if tokens.is_empty() => format!("$ {numbers} $"),
        FormatStyle::Typst => format!("$ {numbers} {TYPST_DOT} {} $", typst_unit(tokens)),
    }
}

impl fmt::Display for FormatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatStyle::Plain => write!(f, "plain"),
            FormatStyle::Typst => write!(f, "typst"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(s: &str) -> NumberFormat {
        s.parse().unwrap()
    }

    #[test]
    fn test_magnitude_table() {
        let cases = [
            (0.0, "0"),
            (0.05, "5.00E-02"),
            (0.001, "1.00E-03"),
            (0.1, "0.100"),
            (5.0, "5.000"),
            (9.999, "9.999"),
            (10.0, "10.00"),
            (99.99, "99.99"),
            (100.0, "100.0"),
            (999.9, "999.9"),
            (1000.0, "1000"),
            (1234.0, "1234"),
            (9999.9, "10000"),
            (10000.0, "1.00E+04"),
            (-0.05, "-5.00E-02"),
            (-5.0, "-5.000"),
            (1.5e120, "1.50E+120"),
        ];
        for (v, expected) in cases {
            assert_eq!(magnitude(v), expected, "failed for {v}");
        }
    }

    #[test]
    fn test_magnitude_non_finite() {
        assert_eq!(magnitude(f64::NAN), "nan");
        assert_eq!(magnitude(f64::INFINITY), "inf");
        assert_eq!(magnitude(f64::NEG_INFINITY), "-inf");
        assert_eq!(spec("").render(f64::NAN), "nan");
        assert_eq!(spec("8").render(f64::INFINITY), "     inf");
        assert_eq!(spec(".2f").render(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_fixed_spec() {
        assert_eq!(spec(".1f").render(5.12345), "5.1");
        assert_eq!(spec(".3F").render(2.0), "2.000");
        assert_eq!(spec("f").render(1.5), "1.500000");
    }

    #[test]
    fn test_scientific_spec() {
        assert_eq!(spec(".2E").render(12345.0), "1.23E+04");
        assert_eq!(spec(".3e").render(0.000123), "1.230e-04");
    }

    #[test]
    fn test_general_spec() {
        assert_eq!(spec("g").render(0.0001), "0.0001");
        assert_eq!(spec("g").render(1234567.0), "1.23457e+06");
        assert_eq!(spec(".3g").render(3.14159), "3.14");
        assert_eq!(spec(".2").render(100.0), "1e+02");
        assert_eq!(spec("G").render(1e-7), "1E-07");
        assert_eq!(spec("g").render(1.0), "1");
        assert_eq!(spec("g").render(0.0), "0");
    }

    #[test]
    fn test_precision_without_type_keeps_point() {
        assert_eq!(spec(".2").render(1.0), "1.0");
        assert_eq!(spec(".3").render(12.0), "12.0");
        assert_eq!(spec(".3").render(0.5), "0.5");
        assert_eq!(spec(".2").render(0.0), "0.0");
        assert_eq!(spec(".2").render(123.0), "1.2e+02");
        assert_eq!(spec(".3").render(3.14159), "3.14");
    }

    #[test]
    fn test_repr_exponents() {
        assert_eq!(repr(1e20), "1e+20");
        assert_eq!(repr(1.5e-7), "1.5e-07");
        assert_eq!(repr(-2.5e16), "-2.5e+16");
        assert_eq!(repr(10000.0), "10000.0");
        assert_eq!(repr(0.0001), "0.0001");
        assert_eq!(repr(f64::NAN), "nan");
        assert_eq!(spec("9").render(1e20), "    1e+20");
    }

    #[test]
    fn test_percent_and_repr() {
        assert_eq!(spec(".1%").render(0.256), "25.6%");
        assert_eq!(spec("8").render(5.0), "     5.0");
    }

    #[test]
    fn test_sign_and_padding() {
        assert_eq!(spec("+.2f").render(3.0), "+3.00");
        assert_eq!(spec("+.2f").render(-3.0), "-3.00");
        assert_eq!(spec("08.2f").render(-3.0), "-0003.00");
        assert_eq!(spec("7.1f").render(2.3), "    2.3");
    }

    #[test]
    fn test_invalid_specs() {
        for bad in [".f", "x", ".2q", "f2", "++f"] {
            assert_eq!(
                bad.parse::<NumberFormat>(),
                Err(QuantityError::FormatSpec(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_empty_spec_is_magnitude() {
        assert!(spec("").is_magnitude());
        assert_eq!(spec("").render(0.001), "1.00E-03");
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("typst".parse::<FormatStyle>().unwrap(), FormatStyle::Typst);
        assert_eq!("plain".parse::<FormatStyle>().unwrap(), FormatStyle::Plain);
        assert!("latex".parse::<FormatStyle>().is_err());
    }
}
