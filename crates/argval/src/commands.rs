//! Routing argv to one of several named validators.

use indexmap::IndexMap;

use crate::error::{Error, MisconfigurationError, ValidationError};
use crate::validated::ValidatedInput;
use crate::validator::Validator;

#[derive(Debug)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    summary: String,
    validator: Validator,
}

impl Command {
    pub fn new(name: impl Into<String>, validator: Validator) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            summary: String::new(),
            validator,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if alias != self.name && !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }
}

/// Named commands, in registration order.
#[derive(Debug, Default)]
pub struct CommandSet {
    commands: IndexMap<String, Command>,
    /// Name or alias -> canonical name.
    names: IndexMap<String, String>,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Its name and aliases must not collide with any
    /// name or alias already registered.
    pub fn add(&mut self, command: Command) -> Result<&mut Self, MisconfigurationError> {
        let spellings = std::iter::once(&command.name).chain(command.aliases.iter());
        for spelling in spellings {
            if spelling.trim().is_empty() {
                return Err(MisconfigurationError::EmptyIdentifier);
            }
            if let Some(existing) = self.names.get(spelling) {
                return Err(MisconfigurationError::DuplicateCommand {
                    name: spelling.clone(),
                    existing: existing.clone(),
                });
            }
        }

        let name = command.name.clone();
        self.names.insert(name.clone(), name.clone());
        for alias in &command.aliases {
            self.names.insert(alias.clone(), name.clone());
        }
        self.commands.insert(name, command);
        Ok(self)
    }

    /// Canonical name for a command name or alias.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.names.get(raw).map(|s| s.as_str())
    }

    pub fn get(&self, raw: &str) -> Option<&Command> {
        self.resolve(raw).and_then(|name| self.commands.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Route by the first token and validate the rest against that command.
    pub fn parse<I, S>(&self, argv: I) -> Result<(&str, ValidatedInput), Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut argv = argv.into_iter();
        let first = argv.next().ok_or(ValidationError::MissingCommand)?;
        let command = self
            .get(first.as_ref())
            .ok_or_else(|| ValidationError::UnknownCommand(first.as_ref().to_string()))?;
        tracing::debug!(command = command.name(), "dispatching");
        let input = command.validator.parse(argv)?;
        Ok((command.name(), input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ArgumentDef, FlagDef};
    use crate::value::Value;

    fn commands() -> CommandSet {
        let mut greet = Validator::new();
        greet.add(ArgumentDef::new("name", 0)).unwrap();
        let mut list = Validator::new();
        list.add(FlagDef::new("all").with_alias("a")).unwrap();

        let mut set = CommandSet::new();
        set.add(Command::new("greet", greet).with_alias("hi"))
            .unwrap();
        set.add(Command::new("list", list).with_alias("ls").with_summary("List things"))
            .unwrap();
        set
    }

    #[test]
    fn routes_by_name_or_alias() {
        let set = commands();
        let (name, input) = set.parse(["hi", "world"]).unwrap();
        assert_eq!(name, "greet");
        assert_eq!(input.get_option("name"), Some(&Value::from("world")));

        let (name, input) = set.parse(["ls", "-a"]).unwrap();
        assert_eq!(name, "list");
        assert!(input.is_flag_set("all"));
    }

    #[test]
    fn rejects_missing_or_unknown_command() {
        let set = commands();
        let empty: [&str; 0] = [];
        assert_eq!(
            set.parse(empty).unwrap_err(),
            Error::Validation(ValidationError::MissingCommand)
        );
        assert_eq!(
            set.parse(["nope"]).unwrap_err(),
            Error::Validation(ValidationError::UnknownCommand("nope".to_string()))
        );
    }

    #[test]
    fn rejects_conflicting_aliases() {
        let mut set = commands();
        let err = set
            .add(Command::new("hello", Validator::new()).with_alias("hi"))
            .unwrap_err();
        assert_eq!(
            err,
            MisconfigurationError::DuplicateCommand {
                name: "hi".to_string(),
                existing: "greet".to_string()
            }
        );
        assert!(set.add(Command::new("ls", Validator::new())).is_err());
        assert_eq!(set.resolve("hello"), None);
    }
}
