//! Value filters.
//!
//! A filter turns one raw string into a typed [`Value`] or rejects it with a
//! [`ParseError`] describing the violated constraint. Filters are pure, so a
//! validator may run the same filter any number of times.

mod meta;
mod numeric;
mod text;

use std::fmt;

use crate::error::ParseError;
use crate::value::Value;

pub use meta::{AnyFilter, SplitFilter};
pub use numeric::{BigDecimalFilter, BigIntegerFilter, DecimalFilter, IntegerFilter};
pub use text::{RegexFilter, SetFilter};

pub trait Filter: fmt::Debug + Send + Sync {
    fn parse(&self, raw: &str) -> Result<Value, ParseError>;

    /// Short human-readable description of accepted values, used in help
    /// text and composite error messages.
    fn describe(&self) -> String;
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        (**self).parse(raw)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Accepts any string unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringFilter;

impl Filter for StringFilter {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        Ok(Value::Str(raw.to_string()))
    }

    fn describe(&self) -> String {
        "string".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_filter_is_identity() {
        assert_eq!(StringFilter.parse("  x ").unwrap(), Value::from("  x "));
    }

    #[test]
    fn boxed_filters_delegate() {
        let boxed: Box<dyn Filter> = Box::new(IntegerFilter::new());
        assert_eq!(boxed.parse("7").unwrap(), Value::Int(7));
        assert_eq!(boxed.describe(), "integer");
    }
}
