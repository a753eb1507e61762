//! Ordered store of declarations.
//!
//! Registration order is observable (it is the resolution order), so every
//! collection here preserves insertion order.

use indexmap::IndexMap;

use crate::entity::{ArgumentDef, Entity, EntityKind, FlagDef, OptionDef};
use crate::error::MisconfigurationError;
use crate::rule::Rule;

#[derive(Debug, Default)]
pub struct Registry {
    flags: IndexMap<String, FlagDef>,
    options: IndexMap<String, OptionDef>,
    arguments: IndexMap<String, ArgumentDef>,
    rules: Vec<Box<dyn Rule>>,
    /// Every identifier and alias -> (kind, primary identifier).
    index: IndexMap<String, (EntityKind, String)>,
}

impl Registry {
    pub fn flags(&self) -> impl Iterator<Item = &FlagDef> {
        self.flags.values()
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionDef> {
        self.options.values()
    }

    /// Arguments in registration order.
    pub fn arguments(&self) -> impl Iterator<Item = &ArgumentDef> {
        self.arguments.values()
    }

    /// Arguments sorted by position.
    pub fn arguments_by_position(&self) -> Vec<&ArgumentDef> {
        let mut args: Vec<&ArgumentDef> = self.arguments.values().collect();
        args.sort_by_key(|a| a.position());
        args
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn flag(&self, id: &str) -> Option<&FlagDef> {
        match self.resolve(id)? {
            (EntityKind::Flag, primary) => self.flags.get(primary),
            _ => None,
        }
    }

    pub fn option(&self, id: &str) -> Option<&OptionDef> {
        match self.resolve(id)? {
            (EntityKind::Option, primary) => self.options.get(primary),
            _ => None,
        }
    }

    pub fn argument(&self, id: &str) -> Option<&ArgumentDef> {
        match self.resolve(id)? {
            (EntityKind::Argument, primary) => self.arguments.get(primary),
            _ => None,
        }
    }

    /// Map an identifier or alias to its kind and primary identifier.
    pub fn resolve(&self, id: &str) -> Option<(EntityKind, &str)> {
        self.index
            .get(id)
            .map(|(kind, primary)| (*kind, primary.as_str()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty() && self.rules.is_empty()
    }

    pub fn variadic_argument(&self) -> Option<&ArgumentDef> {
        self.arguments.values().find(|a| a.is_variadic())
    }

    /// Identifier/alias -> primary identifier, for result lookups.
    pub(crate) fn alias_map(&self) -> IndexMap<String, String> {
        self.index
            .iter()
            .map(|(id, (_, primary))| (id.clone(), primary.clone()))
            .collect()
    }

    pub(crate) fn insert(&mut self, entity: Entity) -> Result<(), MisconfigurationError> {
        let ids = entity.identifiers();
        ids.check()?;
        for id in ids.all() {
            if let Some((_, existing)) = self.index.get(id) {
                return Err(MisconfigurationError::AmbiguousIdentifier {
                    identifier: id.to_string(),
                    existing: existing.clone(),
                });
            }
        }
        if let Entity::Argument(arg) = &entity {
            self.check_position(arg)?;
        }

        let kind = entity.kind();
        let primary = ids.primary().to_string();
        for id in ids.all() {
            self.index.insert(id.to_string(), (kind, primary.clone()));
        }
        match entity {
            Entity::Flag(flag) => {
                self.flags.insert(primary, flag);
            }
            Entity::Option(option) => {
                self.options.insert(primary, option);
            }
            Entity::Argument(arg) => {
                self.arguments.insert(primary, arg);
            }
        }
        Ok(())
    }

    /// The variadic argument, if any, must hold the highest position. Checked
    /// in both registration orders.
    fn check_position(&self, arg: &ArgumentDef) -> Result<(), MisconfigurationError> {
        if let Some(existing) = self
            .arguments
            .values()
            .find(|a| a.position() == arg.position())
        {
            return Err(MisconfigurationError::DuplicatePosition {
                identifier: arg.id().to_string(),
                existing: existing.id().to_string(),
                position: arg.position(),
            });
        }

        if arg.is_variadic() {
            if let Some(existing) = self.variadic_argument() {
                return Err(MisconfigurationError::DuplicateVariadic {
                    identifier: arg.id().to_string(),
                    existing: existing.id().to_string(),
                });
            }
            if let Some(later) = self
                .arguments
                .values()
                .find(|a| a.position() > arg.position())
            {
                return Err(MisconfigurationError::ArgumentAfterVariadic {
                    identifier: later.id().to_string(),
                    position: later.position(),
                    variadic: arg.id().to_string(),
                    variadic_position: arg.position(),
                });
            }
        } else if let Some(variadic) = self.variadic_argument() {
            if arg.position() > variadic.position() {
                return Err(MisconfigurationError::ArgumentAfterVariadic {
                    identifier: arg.id().to_string(),
                    position: arg.position(),
                    variadic: variadic.id().to_string(),
                    variadic_position: variadic.position(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn push_rule(&mut self, rule: Box<dyn Rule>) -> Result<(), MisconfigurationError> {
        rule.check(self)?;
        self.rules.push(rule);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.flags.clear();
        self.options.clear();
        self.arguments.clear();
        self.rules.clear();
        self.index.clear();
    }
}
