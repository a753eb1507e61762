use super::Filter;
use crate::error::{MisconfigurationError, ParseError, ParseErrorKind};
use crate::value::Value;

/// Tries each child filter in order; the first that accepts wins.
#[derive(Debug)]
pub struct AnyFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl AnyFilter {
    pub fn new(filters: Vec<Box<dyn Filter>>) -> Result<Self, MisconfigurationError> {
        if filters.is_empty() {
            return Err(MisconfigurationError::EmptyAny);
        }
        Ok(Self { filters })
    }
}

impl Filter for AnyFilter {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        for filter in &self.filters {
            if let Ok(value) = filter.parse(raw) {
                return Ok(value);
            }
        }
        Err(ParseError::new(
            ParseErrorKind::NotAllowed,
            format!("'{raw}' is not {}", self.describe()),
        ))
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.filters.iter().map(|f| f.describe()).collect();
        parts.join(" or ")
    }
}

/// Splits a value on a separator and filters every piece, yielding a list.
#[derive(Debug)]
pub struct SplitFilter {
    separator: String,
    inner: Box<dyn Filter>,
}

impl SplitFilter {
    pub fn new(
        separator: impl Into<String>,
        inner: Box<dyn Filter>,
    ) -> Result<Self, MisconfigurationError> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(MisconfigurationError::EmptySeparator);
        }
        Ok(Self { separator, inner })
    }
}

impl Filter for SplitFilter {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        raw.split(self.separator.as_str())
            .map(|piece| self.inner.parse(piece))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }

    fn describe(&self) -> String {
        format!("'{}'-separated list of {}", self.separator, self.inner.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{IntegerFilter, SetFilter};

    #[test]
    fn any_filter_takes_first_accepting_child() {
        let f = AnyFilter::new(vec![
            Box::new(IntegerFilter::new()),
            Box::new(SetFilter::new(["auto"], false).unwrap()),
        ])
        .unwrap();
        assert_eq!(f.parse("12").unwrap(), Value::Int(12));
        assert_eq!(f.parse("AUTO").unwrap(), Value::from("auto"));

        let err = f.parse("x").unwrap_err();
        assert_eq!(err.message, "'x' is not integer or one of: auto");
    }

    #[test]
    fn split_filter_filters_each_piece() {
        let f = SplitFilter::new(",", Box::new(IntegerFilter::new())).unwrap();
        assert_eq!(
            f.parse("1,2,3").unwrap(),
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert!(f.parse("1,,3").is_err());
    }

    #[test]
    fn empty_configuration_is_rejected() {
        let err = AnyFilter::new(Vec::new()).unwrap_err();
        assert_eq!(err, MisconfigurationError::EmptyAny);
        assert_eq!(err.to_string(), "any filter needs at least one child filter");

        let err = SplitFilter::new("", Box::new(IntegerFilter::new())).unwrap_err();
        assert_eq!(err, MisconfigurationError::EmptySeparator);
        assert_eq!(err.to_string(), "split filter needs a non-empty separator");
    }
}
