//! Declared flags, options and positional arguments.

use indexmap::IndexSet;

use crate::error::{Error, MisconfigurationError, ValidationError};
use crate::filter::{Filter, StringFilter};
use crate::value::Value;

/// A primary identifier plus aliases. The primary is the canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifiers {
    primary: String,
    aliases: IndexSet<String>,
}

impl Identifiers {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            aliases: IndexSet::new(),
        }
    }

    fn push_alias(&mut self, alias: String) {
        if alias != self.primary {
            self.aliases.insert(alias);
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(|s| s.as_str())
    }

    /// Primary first, then aliases in declaration order.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.aliases())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.primary == id || self.aliases.contains(id)
    }

    pub(crate) fn check(&self) -> Result<(), MisconfigurationError> {
        if self.all().any(|id| id.trim().is_empty()) {
            return Err(MisconfigurationError::EmptyIdentifier);
        }
        Ok(())
    }
}

/// Presence-only switch.
#[derive(Debug, Clone)]
pub struct FlagDef {
    ids: Identifiers,
    description: String,
}

impl FlagDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            ids: Identifiers::new(id),
            description: String::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.ids.push_alias(alias.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> &str {
        self.ids.primary()
    }

    pub fn identifiers(&self) -> &Identifiers {
        &self.ids
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Filter, default and required-ness shared by options and arguments.
#[derive(Debug)]
pub struct ValueSpec {
    filter: Box<dyn Filter>,
    default: Option<Value>,
    optional: bool,
}

impl Default for ValueSpec {
    fn default() -> Self {
        Self {
            filter: Box::new(StringFilter),
            default: None,
            optional: false,
        }
    }
}

impl ValueSpec {
    pub fn filter(&self) -> &dyn Filter {
        self.filter.as_ref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Required unless a default exists or the value was declared optional.
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }

    pub(crate) fn apply(&self, identifier: &str, raw: &str) -> Result<Value, Error> {
        self.filter.parse(raw).map_err(|source| Error::Filter {
            identifier: identifier.to_string(),
            value: raw.to_string(),
            source,
        })
    }

    /// Value used when nothing was supplied on the command line.
    pub(crate) fn absent(&self, identifier: &str, as_list: bool) -> Result<Option<Value>, Error> {
        if let Some(default) = &self.default {
            let value = if as_list {
                default.clone().into_list()
            } else {
                default.clone()
            };
            return Ok(Some(value));
        }
        if self.is_required() {
            return Err(ValidationError::MissingValue {
                identifier: identifier.to_string(),
            }
            .into());
        }
        Ok(as_list.then(|| Value::List(Vec::new())))
    }
}

/// Named parameter that takes a value (`--encoding utf-8`).
#[derive(Debug)]
pub struct OptionDef {
    ids: Identifiers,
    description: String,
    spec: ValueSpec,
    repeatable: bool,
}

impl OptionDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            ids: Identifiers::new(id),
            description: String::new(),
            spec: ValueSpec::default(),
            repeatable: false,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.ids.push_alias(alias.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.spec.filter = Box::new(filter);
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.spec.default = Some(default.into());
        self
    }

    /// Absent without a default yields no value instead of an error.
    pub fn optional(mut self) -> Self {
        self.spec.optional = true;
        self
    }

    /// Collect every occurrence into a list instead of keeping the last.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn id(&self) -> &str {
        self.ids.primary()
    }

    pub fn identifiers(&self) -> &Identifiers {
        &self.ids
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value_spec(&self) -> &ValueSpec {
        &self.spec
    }

    pub fn is_required(&self) -> bool {
        self.spec.is_required()
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }
}

/// Positional value identified by its zero-based index.
#[derive(Debug)]
pub struct ArgumentDef {
    ids: Identifiers,
    description: String,
    spec: ValueSpec,
    position: usize,
    variadic: bool,
}

impl ArgumentDef {
    pub fn new(id: impl Into<String>, position: usize) -> Self {
        Self {
            ids: Identifiers::new(id),
            description: String::new(),
            spec: ValueSpec::default(),
            position,
            variadic: false,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.ids.push_alias(alias.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.spec.filter = Box::new(filter);
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.spec.default = Some(default.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.spec.optional = true;
        self
    }

    /// Consume every positional token from this position onward.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn id(&self) -> &str {
        self.ids.primary()
    }

    pub fn identifiers(&self) -> &Identifiers {
        &self.ids
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value_spec(&self) -> &ValueSpec {
        &self.spec
    }

    pub fn is_required(&self) -> bool {
        self.spec.is_required()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Flag,
    Option,
    Argument,
}

/// Anything [`Validator::add`](crate::Validator::add) accepts.
#[derive(Debug)]
pub enum Entity {
    Flag(FlagDef),
    Option(OptionDef),
    Argument(ArgumentDef),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Flag(_) => EntityKind::Flag,
            Self::Option(_) => EntityKind::Option,
            Self::Argument(_) => EntityKind::Argument,
        }
    }

    pub fn identifiers(&self) -> &Identifiers {
        match self {
            Self::Flag(f) => f.identifiers(),
            Self::Option(o) => o.identifiers(),
            Self::Argument(a) => a.identifiers(),
        }
    }
}

impl From<FlagDef> for Entity {
    fn from(flag: FlagDef) -> Self {
        Self::Flag(flag)
    }
}

impl From<OptionDef> for Entity {
    fn from(option: OptionDef) -> Self {
        Self::Option(option)
    }
}

impl From<ArgumentDef> for Entity {
    fn from(argument: ArgumentDef) -> Self {
        Self::Argument(argument)
    }
}
