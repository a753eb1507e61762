use std::str::FromStr;

use argval::filter::{
    AnyFilter, BigDecimalFilter, BigIntegerFilter, DecimalFilter, IntegerFilter, RegexFilter,
    SetFilter, SplitFilter, StringFilter,
};
use argval::rule::{AndRule, NotRule, OptionSetRule, OrRule, XorOptionsRule, XorRule};
use argval::{
    ArgumentDef, Command, CommandSet, Environment, Filter, FlagDef, OptionDef, Rule, Validator,
    Value,
};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Declarative description of one validator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpecDocument {
    /// Program or command name. Commands are keyed by it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentSpec>,
    /// Defaults to strict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnvironmentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape_char: Option<char>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlagSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSpec>,
    /// Raw default, run through the filter when the document is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub repeatable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgumentSpec {
    pub id: String,
    pub position: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum FilterSpec {
    String,
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        radix: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// Bounds are strings so they may exceed `i64`.
    BigInteger {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        radix: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<String>,
    },
    Decimal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    BigDecimal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<String>,
    },
    Regex {
        pattern: String,
        #[serde(default)]
        group: usize,
    },
    Set {
        values: Vec<String>,
        #[serde(default = "default_true")]
        case_sensitive: bool,
    },
    Any {
        filters: Vec<FilterSpec>,
    },
    Split {
        separator: String,
        filter: Box<FilterSpec>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum RuleSpec {
    And {
        rules: Vec<RuleSpec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Or {
        rules: Vec<RuleSpec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Xor {
        rules: Vec<RuleSpec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Not {
        rules: Vec<RuleSpec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    OptionSet {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    XorOptions {
        first: String,
        second: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// A set of named validators. Each command is a [`SpecDocument`] whose
/// `name` is the command name, plus optional aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandsDocument {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    pub commands: Vec<CommandSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(flatten)]
    pub spec: SpecDocument,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn default_true() -> bool {
    true
}

impl SpecDocument {
    /// Register everything in document order: flags, options, arguments,
    /// then rules.
    pub fn build(&self) -> Result<Validator, SchemaError> {
        let environment = match &self.environment {
            Some(env) => env.build()?,
            None => Environment::default(),
        };
        let mut validator =
            Validator::with_environment(environment).strict(self.strict.unwrap_or(true));

        for flag in &self.flags {
            validator.add(flag.build())?;
        }
        for option in &self.options {
            validator.add(option.build()?)?;
        }
        for argument in &self.arguments {
            validator.add(argument.build()?)?;
        }
        for rule in &self.rules {
            validator.add_rule(rule.build())?;
        }

        tracing::debug!(
            name = %self.name,
            flags = self.flags.len(),
            options = self.options.len(),
            arguments = self.arguments.len(),
            rules = self.rules.len(),
            "validator built"
        );
        Ok(validator)
    }

    /// Sample document written by `argval init`.
    pub fn sample() -> Self {
        let option_set = |id: &str| RuleSpec::OptionSet {
            id: id.to_string(),
            message: None,
        };
        Self {
            name: "convert".to_string(),
            summary: "Convert input files to another encoding".to_string(),
            environment: None,
            strict: None,
            flags: vec![
                FlagSpec {
                    id: "verbose".to_string(),
                    aliases: vec!["v".to_string()],
                    description: "Print progress".to_string(),
                },
                FlagSpec {
                    id: "quiet".to_string(),
                    aliases: vec!["q".to_string()],
                    description: "Print nothing".to_string(),
                },
            ],
            options: vec![
                OptionSpec {
                    id: "encoding".to_string(),
                    aliases: vec!["e".to_string()],
                    description: "Target encoding".to_string(),
                    filter: Some(FilterSpec::Set {
                        values: vec!["utf-8".to_string(), "latin-1".to_string()],
                        case_sensitive: false,
                    }),
                    ..OptionSpec::default()
                },
                OptionSpec {
                    id: "jobs".to_string(),
                    aliases: vec!["j".to_string()],
                    description: "Worker count".to_string(),
                    filter: Some(FilterSpec::Integer {
                        radix: None,
                        min: Some(1),
                        max: Some(64),
                    }),
                    default: Some("4".to_string()),
                    ..OptionSpec::default()
                },
            ],
            arguments: vec![ArgumentSpec {
                id: "input".to_string(),
                position: 0,
                description: "Files to convert".to_string(),
                variadic: true,
                ..ArgumentSpec::default()
            }],
            rules: vec![RuleSpec::Not {
                rules: vec![RuleSpec::And {
                    rules: vec![option_set("verbose"), option_set("quiet")],
                    message: None,
                }],
                message: Some("-verbose and -quiet exclude each other".to_string()),
            }],
        }
    }
}

impl EnvironmentSpec {
    pub fn build(&self) -> Result<Environment, SchemaError> {
        let defaults = Environment::default();
        let env = Environment::new(
            self.short_prefix
                .as_deref()
                .unwrap_or(defaults.short_prefix()),
            self.long_prefix.as_deref().unwrap_or(defaults.long_prefix()),
            self.escape_char.unwrap_or(defaults.escape_char()),
        )?;
        Ok(env)
    }
}

impl FlagSpec {
    pub fn build(&self) -> FlagDef {
        self.aliases.iter().fold(
            FlagDef::new(&self.id).with_description(&self.description),
            |def, alias| def.with_alias(alias),
        )
    }
}

impl OptionSpec {
    pub fn build(&self) -> Result<OptionDef, SchemaError> {
        let filter = build_filter(self.filter.as_ref())?;
        let mut def = self.aliases.iter().fold(
            OptionDef::new(&self.id).with_description(&self.description),
            |def, alias| def.with_alias(alias),
        );
        if let Some(raw) = &self.default {
            def = def.with_default(typed_default(&self.id, filter.as_ref(), raw)?);
        }
        def = def.with_filter(filter);
        if self.optional {
            def = def.optional();
        }
        if self.repeatable {
            def = def.repeatable();
        }
        Ok(def)
    }
}

impl ArgumentSpec {
    pub fn build(&self) -> Result<ArgumentDef, SchemaError> {
        let filter = build_filter(self.filter.as_ref())?;
        let mut def = self.aliases.iter().fold(
            ArgumentDef::new(&self.id, self.position).with_description(&self.description),
            |def, alias| def.with_alias(alias),
        );
        if let Some(raw) = &self.default {
            def = def.with_default(typed_default(&self.id, filter.as_ref(), raw)?);
        }
        def = def.with_filter(filter);
        if self.optional {
            def = def.optional();
        }
        if self.variadic {
            def = def.variadic();
        }
        Ok(def)
    }
}

fn typed_default(identifier: &str, filter: &dyn Filter, raw: &str) -> Result<Value, SchemaError> {
    filter
        .parse(raw)
        .map_err(|source| SchemaError::InvalidDefault {
            identifier: identifier.to_string(),
            value: raw.to_string(),
            source,
        })
}

fn build_filter(spec: Option<&FilterSpec>) -> Result<Box<dyn Filter>, SchemaError> {
    match spec {
        Some(spec) => spec.build(),
        None => Ok(Box::new(StringFilter)),
    }
}

fn parse_bound<T: FromStr>(raw: Option<&String>) -> Result<Option<T>, SchemaError> {
    raw.map(|s| {
        s.trim()
            .parse::<T>()
            .map_err(|_| SchemaError::InvalidBound(s.clone()))
    })
    .transpose()
}

impl FilterSpec {
    pub fn build(&self) -> Result<Box<dyn Filter>, SchemaError> {
        let filter: Box<dyn Filter> = match self {
            FilterSpec::String => Box::new(StringFilter),
            FilterSpec::Integer { radix, min, max } => Box::new(
                IntegerFilter::new()
                    .with_radix(radix.unwrap_or(10))?
                    .with_bounds(*min, *max)?,
            ),
            FilterSpec::BigInteger { radix, min, max } => Box::new(
                BigIntegerFilter::new()
                    .with_radix(radix.unwrap_or(10))?
                    .with_bounds(
                        parse_bound::<BigInt>(min.as_ref())?,
                        parse_bound::<BigInt>(max.as_ref())?,
                    )?,
            ),
            FilterSpec::Decimal { min, max } => {
                Box::new(DecimalFilter::new().with_bounds(*min, *max)?)
            }
            FilterSpec::BigDecimal { min, max } => Box::new(BigDecimalFilter::new().with_bounds(
                parse_bound::<BigDecimal>(min.as_ref())?,
                parse_bound::<BigDecimal>(max.as_ref())?,
            )?),
            FilterSpec::Regex { pattern, group } => {
                Box::new(RegexFilter::with_group(pattern, *group)?)
            }
            FilterSpec::Set {
                values,
                case_sensitive,
            } => Box::new(SetFilter::new(values, *case_sensitive)?),
            FilterSpec::Any { filters } => {
                let children = filters
                    .iter()
                    .map(FilterSpec::build)
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(AnyFilter::new(children)?)
            }
            FilterSpec::Split { separator, filter } => {
                Box::new(SplitFilter::new(separator.as_str(), filter.build()?)?)
            }
        };
        Ok(filter)
    }
}

impl RuleSpec {
    pub fn build(&self) -> Box<dyn Rule> {
        fn children(rules: &[RuleSpec]) -> Vec<Box<dyn Rule>> {
            rules.iter().map(RuleSpec::build).collect()
        }

        match self {
            RuleSpec::And { rules, message } => {
                let rule = AndRule::new(children(rules));
                Box::new(match message {
                    Some(m) => rule.with_message(m),
                    None => rule,
                })
            }
            RuleSpec::Or { rules, message } => {
                let rule = OrRule::new(children(rules));
                Box::new(match message {
                    Some(m) => rule.with_message(m),
                    None => rule,
                })
            }
            RuleSpec::Xor { rules, message } => {
                let rule = XorRule::new(children(rules));
                Box::new(match message {
                    Some(m) => rule.with_message(m),
                    None => rule,
                })
            }
            RuleSpec::Not { rules, message } => {
                let rule = NotRule::new(children(rules));
                Box::new(match message {
                    Some(m) => rule.with_message(m),
                    None => rule,
                })
            }
            RuleSpec::OptionSet { id, message } => {
                let rule = OptionSetRule::new(id);
                Box::new(match message {
                    Some(m) => rule.with_message(m),
                    None => rule,
                })
            }
            RuleSpec::XorOptions {
                first,
                second,
                message,
            } => {
                let rule = XorOptionsRule::new(first, second);
                Box::new(match message {
                    Some(m) => rule.with_message(m),
                    None => rule,
                })
            }
        }
    }
}

impl CommandsDocument {
    pub fn build(&self) -> Result<CommandSet, SchemaError> {
        let mut set = CommandSet::new();
        for command in &self.commands {
            let spec = &command.spec;
            let built = command.aliases.iter().fold(
                Command::new(&spec.name, spec.build()?).with_summary(&spec.summary),
                |cmd, alias| cmd.with_alias(alias),
            );
            set.add(built)?;
        }
        tracing::debug!(commands = self.commands.len(), "command set built");
        Ok(set)
    }

    /// Look up a command by name or alias.
    pub fn command(&self, raw: &str) -> Result<&CommandSpec, SchemaError> {
        self.commands
            .iter()
            .find(|c| c.spec.name == raw || c.aliases.iter().any(|a| a == raw))
            .ok_or_else(|| SchemaError::UnknownCommand(raw.to_string()))
    }
}
