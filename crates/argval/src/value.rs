use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// A typed value produced by a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    BigInt(BigInt),
    Decimal(f64),
    BigDecimal(BigDecimal),
    /// Repeatable options and variadic arguments.
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Decimal(n) => Some(*n),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_big_int(&self) -> Option<&BigInt> {
        match self {
            Self::BigInt(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_big_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Self::BigDecimal(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub(crate) fn into_list(self) -> Value {
        match self {
            Self::List(_) => self,
            other => Self::List(vec![other]),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::BigInt(n) => write!(f, "{n}"),
            Self::Decimal(n) => write!(f, "{n}"),
            Self::BigDecimal(n) => write!(f, "{n}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Decimal(n)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Self::BigInt(n)
    }
}

impl From<BigDecimal> for Value {
    fn from(n: BigDecimal) -> Self {
        Self::BigDecimal(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

// Arbitrary-precision numbers serialize as strings so JSON consumers keep
// every digit.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::BigInt(n) => serializer.serialize_str(&n.to_string()),
            Self::Decimal(n) => serializer.serialize_f64(*n),
            Self::BigDecimal(n) => serializer.serialize_str(&n.to_string()),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn serializes_big_numbers_as_strings() {
        let v = Value::List(vec![
            Value::Int(1),
            Value::BigInt(BigInt::from_str("123456789012345678901234567890").unwrap()),
            Value::BigDecimal(BigDecimal::from_str("1.50").unwrap()),
            Value::from("x"),
        ]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"[1,"123456789012345678901234567890","1.50","x"]"#);
    }

    #[test]
    fn display_joins_lists() {
        let v = Value::List(vec![Value::Int(1), Value::from("b")]);
        assert_eq!(v.to_string(), "[1, b]");
    }
}
