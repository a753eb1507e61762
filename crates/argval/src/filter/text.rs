use regex::Regex;

use super::Filter;
use crate::error::{MisconfigurationError, ParseError, ParseErrorKind};
use crate::value::Value;

/// Whole-value regex match that returns one capture group.
#[derive(Debug, Clone)]
pub struct RegexFilter {
    pattern: String,
    regex: Regex,
    group: usize,
}

impl RegexFilter {
    /// Compile `pattern`; the raw value must match it entirely.
    pub fn new(pattern: &str) -> Result<Self, MisconfigurationError> {
        Self::with_group(pattern, 0)
    }

    pub fn with_group(pattern: &str, group: usize) -> Result<Self, MisconfigurationError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            MisconfigurationError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            }
        })?;
        if group >= regex.captures_len() {
            return Err(MisconfigurationError::InvalidGroup {
                pattern: pattern.to_string(),
                group,
            });
        }
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            group,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Filter for RegexFilter {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let caps = self.regex.captures(raw).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::NoMatch,
                format!("'{raw}' does not match pattern '{}'", self.pattern),
            )
        })?;
        // A group that did not take part in the match yields "".
        let text = caps.get(self.group).map(|m| m.as_str()).unwrap_or_default();
        Ok(Value::Str(text.to_string()))
    }

    fn describe(&self) -> String {
        format!("value matching '{}'", self.pattern)
    }
}

/// One of a fixed set of strings.
#[derive(Debug, Clone)]
pub struct SetFilter {
    values: Vec<String>,
    case_sensitive: bool,
}

impl SetFilter {
    pub fn new<I, S>(values: I, case_sensitive: bool) -> Result<Self, MisconfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !deduped.contains(&value) {
                deduped.push(value);
            }
        }
        if deduped.is_empty() {
            return Err(MisconfigurationError::EmptySet);
        }
        Ok(Self {
            values: deduped,
            case_sensitive,
        })
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl Filter for SetFilter {
    fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let found = if self.case_sensitive {
            self.values.iter().find(|v| v.as_str() == raw)
        } else {
            let lowered = raw.to_lowercase();
            self.values.iter().find(|v| v.to_lowercase() == lowered)
        };
        match found {
            Some(canonical) => Ok(Value::Str(canonical.clone())),
            None => Err(ParseError::new(
                ParseErrorKind::NotAllowed,
                format!(
                    "'{raw}' is not one of: {}",
                    self.values.join(", ")
                ),
            )),
        }
    }

    fn describe(&self) -> String {
        format!("one of: {}", self.values.join(", "))
    }
}
