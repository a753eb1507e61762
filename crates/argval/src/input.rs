//! Token classification.
//!
//! `Input` knows nothing about declared flags or options; it only splits
//! argv by the prefix conventions of an [`Environment`].

use indexmap::{IndexMap, IndexSet};

use crate::environment::{Environment, PrefixKind};
use crate::error::TokenizeError;

/// Tokenized argv: flags, option values and positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    flags: IndexSet<String>,
    options: IndexMap<String, Vec<String>>,
    arguments: Vec<String>,
}

impl Input {
    /// Classify `argv` (without the program name).
    ///
    /// - `\tok` is the positional `tok` (escape char stripped)
    /// - a bare prefix (`-`, `--`) is positional
    /// - `--name value` appends `value` to option `name`
    /// - `-name` adds flag `name`
    /// - anything else is positional
    pub fn tokenize<I, S>(argv: I, env: &Environment) -> Result<Self, TokenizeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut input = Input::default();
        let mut tokens = argv.into_iter();

        while let Some(token) = tokens.next() {
            let token = token.as_ref();

            if let Some(rest) = token.strip_prefix(env.escape_char()) {
                input.arguments.push(rest.to_string());
                continue;
            }

            match classify(token, env) {
                Some((PrefixKind::Long, name)) => {
                    let Some(value) = tokens.next() else {
                        return Err(TokenizeError::MissingValue {
                            option: token.to_string(),
                        });
                    };
                    input
                        .options
                        .entry(name.to_string())
                        .or_default()
                        .push(value.as_ref().to_string());
                }
                Some((PrefixKind::Short, name)) => {
                    input.flags.insert(name.to_string());
                }
                None => input.arguments.push(token.to_string()),
            }
        }

        tracing::trace!(
            flags = input.flags.len(),
            options = input.options.len(),
            arguments = input.arguments.len(),
            "tokenized argv"
        );
        Ok(input)
    }

    pub fn flags(&self) -> &IndexSet<String> {
        &self.flags
    }

    pub fn options(&self) -> &IndexMap<String, Vec<String>> {
        &self.options
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn option_values(&self, name: &str) -> Option<&[String]> {
        self.options.get(name).map(|v| v.as_slice())
    }
}

fn classify<'t>(token: &'t str, env: &Environment) -> Option<(PrefixKind, &'t str)> {
    for (prefix, kind) in env.prefixes_by_precedence() {
        if let Some(name) = token.strip_prefix(prefix) {
            if name.is_empty() {
                return None;
            }
            return Some((kind, name));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(argv: &[&str]) -> Result<Input, TokenizeError> {
        Input::tokenize(argv, &Environment::default())
    }

    #[test]
    fn splits_flags_options_and_arguments() {
        let input = tokenize(&["-v", "--out", "a.txt", "in.txt", "-q", "more"]).unwrap();
        assert!(input.has_flag("v"));
        assert!(input.has_flag("q"));
        assert_eq!(input.option_values("out"), Some(&["a.txt".to_string()][..]));
        assert_eq!(input.arguments(), ["in.txt", "more"]);
    }

    #[test]
    fn repeated_options_append() {
        let input = tokenize(&["--input", "1", "--input", "2"]).unwrap();
        assert_eq!(
            input.option_values("input"),
            Some(&["1".to_string(), "2".to_string()][..])
        );
    }

    #[test]
    fn option_value_is_taken_verbatim() {
        let input = tokenize(&["--offset", "-5"]).unwrap();
        assert_eq!(input.option_values("offset"), Some(&["-5".to_string()][..]));
        assert!(input.flags().is_empty());
    }

    #[test]
    fn trailing_option_without_value_fails() {
        let err = tokenize(&["a", "--out"]).unwrap_err();
        assert_eq!(
            err,
            TokenizeError::MissingValue {
                option: "--out".to_string()
            }
        );
    }

    #[test]
    fn escape_and_bare_prefixes_are_positional() {
        let input = tokenize(&["\\-5", "-", "--"]).unwrap();
        assert_eq!(input.arguments(), ["-5", "-", "--"]);
        assert!(input.flags().is_empty());
        assert!(input.options().is_empty());
    }

    #[test]
    fn custom_prefixes() {
        let env = Environment::new("/", "//", '^').unwrap();
        let input = Input::tokenize(["/v", "//out", "x", "^/literal", "-y"], &env).unwrap();
        assert!(input.has_flag("v"));
        assert_eq!(input.option_values("out"), Some(&["x".to_string()][..]));
        assert_eq!(input.arguments(), ["/literal", "-y"]);
    }
}
