//! The match-filter-rule pipeline.

use crate::entity::{Entity, EntityKind};
use crate::environment::Environment;
use crate::error::{Error, MisconfigurationError, ValidationError};
use crate::input::Input;
use crate::registry::Registry;
use crate::rule::Rule;
use crate::validated::ValidatedInput;
use crate::value::Value;

/// Owns the declarations and validates argv against them.
///
/// Configure first (`add`, `add_rule`), then call `parse` any number of
/// times. Mutation needs `&mut self`, so configuration and parsing cannot
/// overlap.
#[derive(Debug)]
pub struct Validator {
    environment: Environment,
    registry: Registry,
    strict: bool,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            registry: Registry::default(),
            strict: true,
        }
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    /// In lenient mode unknown flags, unknown options and unclaimed
    /// positional tokens are collected into
    /// [`ValidatedInput::unmatched`] instead of failing.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register a flag, option or argument.
    pub fn add(&mut self, entity: impl Into<Entity>) -> Result<&mut Self, MisconfigurationError> {
        let entity = entity.into();
        tracing::trace!(id = entity.identifiers().primary(), kind = ?entity.kind(), "registering");
        self.registry.insert(entity)?;
        Ok(self)
    }

    /// Register a cross-field rule. Identifiers it names must already be
    /// registered.
    pub fn add_rule(
        &mut self,
        rule: impl Rule + 'static,
    ) -> Result<&mut Self, MisconfigurationError> {
        self.registry.push_rule(Box::new(rule))?;
        Ok(self)
    }

    /// Drop every declaration and rule. Environment and strictness stay.
    pub fn reset(&mut self) {
        self.registry.clear();
    }

    /// Tokenize `argv` (without the program name) and validate it.
    ///
    /// Resolution order: flags, options, arguments, then rules in
    /// registration order. The first failure aborts the parse.
    pub fn parse<I, S>(&self, argv: I) -> Result<ValidatedInput, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let input = Input::tokenize(argv, &self.environment)?;
        let mut out = ValidatedInput::new(self.registry.alias_map());

        self.resolve_flags(&input, &mut out)?;
        self.resolve_options(&input, &mut out)?;
        self.resolve_arguments(&input, &mut out)?;

        for rule in self.registry.rules() {
            tracing::trace!(rule = %rule.describe(), "evaluating rule");
            rule.validate(&self.registry, &out)?;
        }

        tracing::debug!(
            flags = out.flags().count(),
            values = out.values().count(),
            unmatched = out.unmatched().len(),
            "argv validated"
        );
        Ok(out)
    }

    fn resolve_flags(&self, input: &Input, out: &mut ValidatedInput) -> Result<(), Error> {
        for flag in self.registry.flags() {
            if flag.identifiers().all().any(|id| input.has_flag(id)) {
                out.set_flag(flag.id());
            }
        }

        for name in input.flags() {
            if matches!(self.registry.resolve(name), Some((EntityKind::Flag, _))) {
                continue;
            }
            let token = format!("{}{name}", self.environment.short_prefix());
            if self.strict {
                return Err(ValidationError::UnknownFlag(token).into());
            }
            out.push_unmatched(token);
        }
        Ok(())
    }

    fn resolve_options(&self, input: &Input, out: &mut ValidatedInput) -> Result<(), Error> {
        for option in self.registry.options() {
            let spec = option.value_spec();
            // Primary first, then aliases in declaration order.
            let raw: Vec<&str> = option
                .identifiers()
                .all()
                .filter_map(|id| input.option_values(id))
                .flatten()
                .map(|s| s.as_str())
                .collect();

            if raw.is_empty() {
                if let Some(value) = spec.absent(option.id(), option.is_repeatable())? {
                    out.set_value(option.id(), value, false);
                }
                continue;
            }

            let mut values = raw
                .iter()
                .map(|r| spec.apply(option.id(), r))
                .collect::<Result<Vec<_>, _>>()?;
            let value = if option.is_repeatable() {
                Value::List(values)
            } else {
                // Last occurrence wins.
                match values.pop() {
                    Some(last) => last,
                    None => continue,
                }
            };
            tracing::trace!(id = option.id(), %value, "option resolved");
            out.set_value(option.id(), value, true);
        }

        for (name, values) in input.options() {
            if matches!(self.registry.resolve(name), Some((EntityKind::Option, _))) {
                continue;
            }
            let token = format!("{}{name}", self.environment.long_prefix());
            if self.strict {
                return Err(ValidationError::UnknownOption(token).into());
            }
            for value in values {
                out.push_unmatched(token.clone());
                out.push_unmatched(value.clone());
            }
        }
        Ok(())
    }

    fn resolve_arguments(&self, input: &Input, out: &mut ValidatedInput) -> Result<(), Error> {
        let tokens = input.arguments();
        let mut claimed = vec![false; tokens.len()];

        for arg in self.registry.arguments() {
            let spec = arg.value_spec();
            let position = arg.position();

            if arg.is_variadic() {
                let rest = tokens.get(position..).unwrap_or_default();
                if rest.is_empty() {
                    if let Some(value) = spec.absent(arg.id(), true)? {
                        out.set_value(arg.id(), value, false);
                    }
                    continue;
                }
                let values = rest
                    .iter()
                    .map(|r| spec.apply(arg.id(), r))
                    .collect::<Result<Vec<_>, _>>()?;
                claimed[position..].fill(true);
                out.set_value(arg.id(), Value::List(values), true);
                continue;
            }

            match tokens.get(position) {
                Some(raw) => {
                    let value = spec.apply(arg.id(), raw)?;
                    claimed[position] = true;
                    out.set_value(arg.id(), value, true);
                }
                None => {
                    if let Some(value) = spec.absent(arg.id(), false)? {
                        out.set_value(arg.id(), value, false);
                    }
                }
            }
        }

        for (token, _) in tokens.iter().zip(&claimed).filter(|(_, c)| !**c) {
            if self.strict {
                return Err(ValidationError::UnexpectedArgument(token.clone()).into());
            }
            out.push_unmatched(token.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ArgumentDef, FlagDef, OptionDef};
    use crate::error::TokenizeError;
    use crate::filter::IntegerFilter;
    use crate::rule::{OptionSetRule, XorOptionsRule};

    fn validator() -> Validator {
        let mut v = Validator::new();
        v.add(FlagDef::new("verbose").with_alias("v")).unwrap();
        v.add(OptionDef::new("encoding").with_alias("e")).unwrap();
        v.add(
            OptionDef::new("level")
                .with_filter(IntegerFilter::new())
                .with_default(1i64),
        )
        .unwrap();
        v
    }

    #[test]
    fn resolves_flags_options_and_defaults() {
        let v = validator();
        let out = v.parse(["-v", "--e", "utf-8"]).unwrap();
        assert!(out.is_flag_set("verbose"));
        assert_eq!(out.get_option("encoding"), Some(&Value::from("utf-8")));
        assert_eq!(out.get_option("level"), Some(&Value::Int(1)));
        assert!(!out.is_set("level"));
    }

    #[test]
    fn missing_required_option() {
        let err = validator().parse(["-v"]).unwrap_err();
        assert_eq!(
            err,
            Error::Validation(ValidationError::MissingValue {
                identifier: "encoding".to_string()
            })
        );
    }

    #[test]
    fn scalar_option_keeps_last_value() {
        let out = validator()
            .parse(["--encoding", "a", "--e", "b", "--level", "2", "--level", "5"])
            .unwrap();
        // Primary spelling first, then aliases.
        assert_eq!(out.get_option("e"), Some(&Value::from("b")));
        assert_eq!(out.get_option("level"), Some(&Value::Int(5)));
    }

    #[test]
    fn every_occurrence_is_filtered() {
        let err = validator()
            .parse(["--e", "x", "--level", "oops", "--level", "2"])
            .unwrap_err();
        assert!(matches!(err, Error::Filter { ref value, .. } if value == "oops"));
    }

    #[test]
    fn strict_mode_rejects_unknown_tokens() {
        let v = validator();
        assert_eq!(
            v.parse(["--e", "x", "-q"]).unwrap_err(),
            Error::Validation(ValidationError::UnknownFlag("-q".to_string()))
        );
        assert_eq!(
            v.parse(["--e", "x", "--what", "1"]).unwrap_err(),
            Error::Validation(ValidationError::UnknownOption("--what".to_string()))
        );
        assert_eq!(
            v.parse(["--e", "x", "stray"]).unwrap_err(),
            Error::Validation(ValidationError::UnexpectedArgument("stray".to_string()))
        );
        // An option identifier used as a flag is still unknown as a flag.
        assert!(v.parse(["--e", "x", "-e"]).is_err());
    }

    #[test]
    fn lenient_mode_collects_unmatched() {
        let mut v = validator();
        v.set_strict(false);
        let out = v
            .parse(["--e", "x", "-q", "--what", "1", "stray"])
            .unwrap();
        assert_eq!(out.unmatched(), ["-q", "--what", "1", "stray"]);

        // Grouped by kind, not by position on the command line.
        let out = v
            .parse(["stray", "--what", "1", "-q", "--e", "x"])
            .unwrap();
        assert_eq!(out.unmatched(), ["-q", "--what", "1", "stray"]);
    }

    #[test]
    fn tokenize_errors_surface_from_parse() {
        let err = validator().parse(["-v", "--e"]).unwrap_err();
        assert_eq!(
            err,
            Error::Tokenize(TokenizeError::MissingValue {
                option: "--e".to_string()
            })
        );
        assert_eq!(err.to_string(), "option given without value: --e");
    }

    #[test]
    fn arguments_resolve_by_position() {
        let mut v = Validator::new();
        v.add(ArgumentDef::new("dst", 1)).unwrap();
        v.add(ArgumentDef::new("src", 0)).unwrap();
        v.add(ArgumentDef::new("mode", 2).with_default("copy")).unwrap();
        let out = v.parse(["a", "b"]).unwrap();
        assert_eq!(out.get_option("src"), Some(&Value::from("a")));
        assert_eq!(out.get_option("dst"), Some(&Value::from("b")));
        assert_eq!(out.get_option("mode"), Some(&Value::from("copy")));

        let err = v.parse(["a"]).unwrap_err();
        assert_eq!(
            err,
            Error::Validation(ValidationError::MissingValue {
                identifier: "dst".to_string()
            })
        );
    }

    #[test]
    fn variadic_argument_consumes_remainder() {
        let mut v = Validator::new();
        v.add(ArgumentDef::new("arg1", 0)).unwrap();
        v.add(ArgumentDef::new("arg2", 1).variadic()).unwrap();
        let out = v.parse(["a", "b", "c", "d"]).unwrap();
        assert_eq!(out.get_option("arg1"), Some(&Value::from("a")));
        assert_eq!(
            out.get_option("arg2"),
            Some(&Value::List(vec![
                Value::from("b"),
                Value::from("c"),
                Value::from("d")
            ]))
        );
    }

    #[test]
    fn rules_run_after_resolution() {
        let mut v = validator();
        v.add(FlagDef::new("json")).unwrap();
        v.add(FlagDef::new("yaml")).unwrap();
        v.add_rule(XorOptionsRule::new("json", "yaml")).unwrap();
        assert!(v.parse(["--e", "x", "-json"]).is_ok());
        let err = v.parse(["--e", "x", "-json", "-yaml"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Exactly one of 'json' and 'yaml' has to be set"
        );
    }

    #[test]
    fn rules_must_reference_known_identifiers() {
        let mut v = validator();
        let err = v.add_rule(OptionSetRule::new("later")).unwrap_err();
        assert_eq!(
            err,
            MisconfigurationError::UnknownIdentifier("later".to_string())
        );
        assert!(v.registry().rules().is_empty());
    }

    #[test]
    fn reset_clears_the_registry() {
        let mut v = validator().strict(false);
        v.reset();
        assert!(v.registry().is_empty());
        assert!(!v.is_strict());
        let out = v.parse(["anything"]).unwrap();
        assert_eq!(out.unmatched(), ["anything"]);
        v.add(FlagDef::new("verbose")).unwrap();
    }
}
