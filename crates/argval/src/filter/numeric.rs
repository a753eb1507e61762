use std::fmt::Display;
use std::num::IntErrorKind;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use super::Filter;
use crate::error::{MisconfigurationError, ParseError};
use crate::value::Value;

fn check_radix(radix: u32) -> Result<u32, MisconfigurationError> {
    if (2..=36).contains(&radix) {
        Ok(radix)
    } else {
        Err(MisconfigurationError::InvalidRadix(radix))
    }
}

fn check_bounds<T: PartialOrd + Display>(
    min: Option<&T>,
    max: Option<&T>,
) -> Result<(), MisconfigurationError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(MisconfigurationError::InvalidBounds {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
    }
    Ok(())
}

fn bound_text<T: Display>(bound: Option<&T>, unbounded: &str) -> String {
    bound
        .map(|b| b.to_string())
        .unwrap_or_else(|| unbounded.to_string())
}

fn out_of_range<T: Display>(raw: &str, min: Option<&T>, max: Option<&T>) -> ParseError {
    ParseError::range(format!(
        "'{raw}' is out of range [{}, {}]",
        bound_text(min, "-inf"),
        bound_text(max, "inf")
    ))
}

fn within<T: PartialOrd>(n: &T, min: Option<&T>, max: Option<&T>) -> bool {
    min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max)
}

fn describe_number(kind: &str, radix: u32, bounds: Option<(String, String)>) -> String {
    let mut out = if radix == 10 {
        kind.to_string()
    } else {
        format!("base-{radix} {kind}")
    };
    if let Some((min, max)) = bounds {
        out.push_str(&format!(" in [{min}, {max}]"));
    }
    out
}

/// 64-bit signed integer in a configurable radix.
#[derive(Debug, Clone)]
pub struct IntegerFilter {
    radix: u32,
    min: Option<i64>,
    max: Option<i64>,
}

impl Default for IntegerFilter {
    fn default() -> Self {
        Self {
            radix: 10,
            min: None,
            max: None,
        }
    }
}

impl IntegerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radix(mut self, radix: u32) -> Result<Self, MisconfigurationError> {
        self.radix = check_radix(radix)?;
        Ok(self)
    }

    /// Inclusive bounds; `None` leaves that side open.
    pub fn with_bounds(
        mut self,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Result<Self, MisconfigurationError> {
        check_bounds(min.as_ref(), max.as_ref())?;
        self.min = min;
        self.max = max;
        Ok(self)
    }

    pub fn radix(&self) -> u32 {
        self.radix
    }
}

impl Filter for IntegerFilter {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let n = match i64::from_str_radix(raw, self.radix) {
            Ok(n) => n,
            Err(e) => {
                return Err(match e.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        out_of_range(raw, self.min.as_ref(), self.max.as_ref())
                    }
                    _ => ParseError::format(format!(
                        "'{raw}' is not a valid base-{} integer",
                        self.radix
                    )),
                });
            }
        };
        if !within(&n, self.min.as_ref(), self.max.as_ref()) {
            return Err(out_of_range(raw, self.min.as_ref(), self.max.as_ref()));
        }
        Ok(Value::Int(n))
    }

    fn describe(&self) -> String {
        let bounds = (self.min.is_some() || self.max.is_some()).then(|| {
            (
                bound_text(self.min.as_ref(), "-inf"),
                bound_text(self.max.as_ref(), "inf"),
            )
        });
        describe_number("integer", self.radix, bounds)
    }
}

/// Arbitrary-precision integer.
#[derive(Debug, Clone)]
pub struct BigIntegerFilter {
    radix: u32,
    min: Option<BigInt>,
    max: Option<BigInt>,
}

impl Default for BigIntegerFilter {
    fn default() -> Self {
        Self {
            radix: 10,
            min: None,
            max: None,
        }
    }
}

impl BigIntegerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radix(mut self, radix: u32) -> Result<Self, MisconfigurationError> {
        self.radix = check_radix(radix)?;
        Ok(self)
    }

    pub fn with_bounds(
        mut self,
        min: Option<BigInt>,
        max: Option<BigInt>,
    ) -> Result<Self, MisconfigurationError> {
        check_bounds(min.as_ref(), max.as_ref())?;
        self.min = min;
        self.max = max;
        Ok(self)
    }
}

impl Filter for BigIntegerFilter {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        // parse_bytes skips '_' separators; i64 parsing does not.
        let n = (!raw.contains('_'))
            .then(|| BigInt::parse_bytes(raw.as_bytes(), self.radix))
            .flatten()
            .ok_or_else(|| {
                ParseError::format(format!(
                    "'{raw}' is not a valid base-{} integer",
                    self.radix
                ))
            })?;
        if !within(&n, self.min.as_ref(), self.max.as_ref()) {
            return Err(out_of_range(raw, self.min.as_ref(), self.max.as_ref()));
        }
        Ok(Value::BigInt(n))
    }

    fn describe(&self) -> String {
        let bounds = (self.min.is_some() || self.max.is_some()).then(|| {
            (
                bound_text(self.min.as_ref(), "-inf"),
                bound_text(self.max.as_ref(), "inf"),
            )
        });
        describe_number("integer", self.radix, bounds)
    }
}

/// Finite `f64`.
#[derive(Debug, Clone, Default)]
pub struct DecimalFilter {
    min: Option<f64>,
    max: Option<f64>,
}

impl DecimalFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(
        mut self,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<Self, MisconfigurationError> {
        for bound in [min, max].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(MisconfigurationError::InvalidBounds {
                    min: bound_text(min.as_ref(), "-inf"),
                    max: bound_text(max.as_ref(), "inf"),
                });
            }
        }
        check_bounds(min.as_ref(), max.as_ref())?;
        self.min = min;
        self.max = max;
        Ok(self)
    }
}

impl Filter for DecimalFilter {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let not_decimal = || ParseError::format(format!("'{raw}' is not a valid decimal"));
        let n = raw.parse::<f64>().map_err(|_| not_decimal())?;
        if n.is_nan() || (n.is_infinite() && raw.to_ascii_lowercase().contains("inf")) {
            return Err(not_decimal());
        }
        if n.is_infinite() {
            return Err(out_of_range(raw, self.min.as_ref(), self.max.as_ref()));
        }
        if !within(&n, self.min.as_ref(), self.max.as_ref()) {
            return Err(out_of_range(raw, self.min.as_ref(), self.max.as_ref()));
        }
        Ok(Value::Decimal(n))
    }

    fn describe(&self) -> String {
        let bounds = (self.min.is_some() || self.max.is_some()).then(|| {
            (
                bound_text(self.min.as_ref(), "-inf"),
                bound_text(self.max.as_ref(), "inf"),
            )
        });
        describe_number("decimal", 10, bounds)
    }
}

/// Arbitrary-precision decimal.
#[derive(Debug, Clone, Default)]
pub struct BigDecimalFilter {
    min: Option<BigDecimal>,
    max: Option<BigDecimal>,
}

impl BigDecimalFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(
        mut self,
        min: Option<BigDecimal>,
        max: Option<BigDecimal>,
    ) -> Result<Self, MisconfigurationError> {
        check_bounds(min.as_ref(), max.as_ref())?;
        self.min = min;
        self.max = max;
        Ok(self)
    }
}

impl Filter for BigDecimalFilter {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let n = BigDecimal::from_str(raw)
            .map_err(|_| ParseError::format(format!("'{raw}' is not a valid decimal")))?;
        if !within(&n, self.min.as_ref(), self.max.as_ref()) {
            return Err(out_of_range(raw, self.min.as_ref(), self.max.as_ref()));
        }
        Ok(Value::BigDecimal(n))
    }

    fn describe(&self) -> String {
        let bounds = (self.min.is_some() || self.max.is_some()).then(|| {
            (
                bound_text(self.min.as_ref(), "-inf"),
                bound_text(self.max.as_ref(), "inf"),
            )
        });
        describe_number("decimal", 10, bounds)
    }
}
