use indexmap::{IndexMap, IndexSet};
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::value::Value;

/// Typed result of a successful parse.
///
/// Immutable once returned by [`Validator::parse`](crate::Validator::parse).
/// Every lookup accepts a primary identifier or any of its aliases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedInput {
    flags: IndexSet<String>,
    values: IndexMap<String, Value>,
    /// Entities supplied on the command line (not defaulted).
    explicit: IndexSet<String>,
    aliases: IndexMap<String, String>,
    unmatched: Vec<String>,
}

impl ValidatedInput {
    pub(crate) fn new(aliases: IndexMap<String, String>) -> Self {
        Self {
            aliases,
            ..Default::default()
        }
    }

    fn canonical<'a>(&'a self, id: &'a str) -> &'a str {
        self.aliases.get(id).map(|s| s.as_str()).unwrap_or(id)
    }

    pub fn is_flag_set(&self, id: &str) -> bool {
        self.flags.contains(self.canonical(id))
    }

    /// Filtered value, default, or list (repeatable options, variadic
    /// arguments). `None` for an absent optional entity.
    pub fn get_option(&self, id: &str) -> Option<&Value> {
        self.values.get(self.canonical(id))
    }

    /// Whether the entity was given on the command line. Defaults do not
    /// count.
    pub fn is_set(&self, id: &str) -> bool {
        self.explicit.contains(self.canonical(id))
    }

    /// Tokens no declaration claimed (lenient mode only).
    ///
    /// Grouped by kind rather than by command-line order: unknown flags,
    /// then unknown options each followed by its value, then unclaimed
    /// positionals. Order within a group follows the command line.
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|s| s.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn set_flag(&mut self, primary: &str) {
        self.flags.insert(primary.to_string());
        self.explicit.insert(primary.to_string());
    }

    pub(crate) fn set_value(&mut self, primary: &str, value: Value, explicit: bool) {
        self.values.insert(primary.to_string(), value);
        if explicit {
            self.explicit.insert(primary.to_string());
        }
    }

    pub(crate) fn push_unmatched(&mut self, token: String) {
        self.unmatched.push(token);
    }
}

struct Values<'a>(&'a IndexMap<String, Value>);

impl Serialize for Values<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for ValidatedInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flags: Vec<&str> = self.flags().collect();
        let mut st = serializer.serialize_struct("ValidatedInput", 3)?;
        st.serialize_field("flags", &flags)?;
        st.serialize_field("values", &Values(&self.values))?;
        st.serialize_field("unmatched", &self.unmatched)?;
        st.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ValidatedInput {
        let aliases: IndexMap<String, String> = [
            ("verbose", "verbose"),
            ("v", "verbose"),
            ("encoding", "encoding"),
            ("e", "encoding"),
            ("level", "level"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let mut input = ValidatedInput::new(aliases);
        input.set_flag("verbose");
        input.set_value("encoding", Value::from("utf-8"), true);
        input.set_value("level", Value::Int(3), false);
        input
    }

    #[test]
    fn lookups_resolve_aliases() {
        let input = sample();
        assert!(input.is_flag_set("v"));
        assert!(input.is_flag_set("verbose"));
        assert_eq!(input.get_option("e"), input.get_option("encoding"));
        assert_eq!(input.get_option("e"), Some(&Value::from("utf-8")));
        assert_eq!(input.get_option("missing"), None);
    }

    #[test]
    fn defaults_are_not_set() {
        let input = sample();
        assert!(input.is_set("e"));
        assert!(!input.is_set("level"));
        assert_eq!(input.get_option("level"), Some(&Value::Int(3)));
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "flags": ["verbose"],
                "values": {"encoding": "utf-8", "level": 3},
                "unmatched": []
            })
        );
    }
}
