//! Cross-field rules and their combinators.
//!
//! Rules form an immutable tree built at configuration time. They read the
//! [`Registry`] and the assembled [`ValidatedInput`]; they never mutate
//! either.

use std::fmt;

use crate::error::{MisconfigurationError, ValidationError};
use crate::registry::Registry;
use crate::validated::ValidatedInput;

pub trait Rule: fmt::Debug + Send + Sync {
    fn validate(&self, registry: &Registry, input: &ValidatedInput)
    -> Result<(), ValidationError>;

    /// Description of the condition, used to build composite messages.
    fn describe(&self) -> String;

    /// Structural check run when the rule is registered.
    fn check(&self, _registry: &Registry) -> Result<(), MisconfigurationError> {
        Ok(())
    }
}

impl<R: Rule + ?Sized> Rule for Box<R> {
    fn validate(
        &self,
        registry: &Registry,
        input: &ValidatedInput,
    ) -> Result<(), ValidationError> {
        (**self).validate(registry, input)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn check(&self, registry: &Registry) -> Result<(), MisconfigurationError> {
        (**self).check(registry)
    }
}

fn check_children(
    name: &'static str,
    rules: &[Box<dyn Rule>],
    registry: &Registry,
) -> Result<(), MisconfigurationError> {
    if rules.is_empty() {
        return Err(MisconfigurationError::EmptyCombinator(name));
    }
    rules.iter().try_for_each(|r| r.check(registry))
}

fn describe_children(rules: &[Box<dyn Rule>]) -> String {
    let parts: Vec<String> = rules.iter().map(|r| r.describe()).collect();
    parts.join(", ")
}

fn check_known(registry: &Registry, id: &str) -> Result<(), MisconfigurationError> {
    if registry.contains(id) {
        Ok(())
    } else {
        Err(MisconfigurationError::UnknownIdentifier(id.to_string()))
    }
}

/// Every child must hold; the first failure is reported.
#[derive(Debug)]
pub struct AndRule {
    rules: Vec<Box<dyn Rule>>,
    message: Option<String>,
}

impl AndRule {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            rules,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for AndRule {
    fn validate(
        &self,
        registry: &Registry,
        input: &ValidatedInput,
    ) -> Result<(), ValidationError> {
        for rule in &self.rules {
            if let Err(err) = rule.validate(registry, input) {
                return Err(match &self.message {
                    Some(message) => ValidationError::rule_caused_by(message, err),
                    None => err,
                });
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.rules.iter().map(|r| r.describe()).collect();
        format!("({})", parts.join(" and "))
    }

    fn check(&self, registry: &Registry) -> Result<(), MisconfigurationError> {
        check_children("and", &self.rules, registry)
    }
}

/// At least one child must hold.
#[derive(Debug)]
pub struct OrRule {
    rules: Vec<Box<dyn Rule>>,
    message: Option<String>,
}

impl OrRule {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            rules,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for OrRule {
    fn validate(
        &self,
        registry: &Registry,
        input: &ValidatedInput,
    ) -> Result<(), ValidationError> {
        let mut last = None;
        for rule in &self.rules {
            match rule.validate(registry, input) {
                Ok(()) => return Ok(()),
                Err(err) => last = Some(err),
            }
        }
        let message = self.message.clone().unwrap_or_else(|| {
            format!(
                "At least one of these conditions has to be met: {}",
                describe_children(&self.rules)
            )
        });
        Err(ValidationError::Rule {
            message,
            cause: last.map(Box::new),
        })
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.rules.iter().map(|r| r.describe()).collect();
        format!("({})", parts.join(" or "))
    }

    fn check(&self, registry: &Registry) -> Result<(), MisconfigurationError> {
        check_children("or", &self.rules, registry)
    }
}

/// Exactly one child must hold. All children are evaluated.
#[derive(Debug)]
pub struct XorRule {
    rules: Vec<Box<dyn Rule>>,
    message: Option<String>,
}

impl XorRule {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            rules,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for XorRule {
    fn validate(
        &self,
        registry: &Registry,
        input: &ValidatedInput,
    ) -> Result<(), ValidationError> {
        let mut passed = 0usize;
        let mut last = None;
        for rule in &self.rules {
            match rule.validate(registry, input) {
                Ok(()) => passed += 1,
                Err(err) => last = Some(err),
            }
        }
        if passed == 1 {
            return Ok(());
        }
        let message = self.message.clone().unwrap_or_else(|| {
            format!(
                "Exactly one of these conditions has to be met: {}",
                describe_children(&self.rules)
            )
        });
        // With several successes there is no failing child to blame.
        let cause = if passed == 0 { last.map(Box::new) } else { None };
        Err(ValidationError::Rule { message, cause })
    }

    fn describe(&self) -> String {
        format!("exactly one of ({})", describe_children(&self.rules))
    }

    fn check(&self, registry: &Registry) -> Result<(), MisconfigurationError> {
        check_children("xor", &self.rules, registry)
    }
}

/// Every child must fail.
#[derive(Debug)]
pub struct NotRule {
    rules: Vec<Box<dyn Rule>>,
    message: Option<String>,
}

impl NotRule {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            rules,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for NotRule {
    fn validate(
        &self,
        registry: &Registry,
        input: &ValidatedInput,
    ) -> Result<(), ValidationError> {
        if self
            .rules
            .iter()
            .any(|rule| rule.validate(registry, input).is_ok())
        {
            let message = self.message.clone().unwrap_or_else(|| {
                format!(
                    "None of these conditions may be met: {}",
                    describe_children(&self.rules)
                )
            });
            return Err(ValidationError::rule(message));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("none of ({})", describe_children(&self.rules))
    }

    fn check(&self, registry: &Registry) -> Result<(), MisconfigurationError> {
        check_children("not", &self.rules, registry)
    }
}

/// The named flag, option or argument was given on the command line.
#[derive(Debug, Clone)]
pub struct OptionSetRule {
    id: String,
    message: Option<String>,
}

impl OptionSetRule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for OptionSetRule {
    fn validate(
        &self,
        _registry: &Registry,
        input: &ValidatedInput,
    ) -> Result<(), ValidationError> {
        if input.is_set(&self.id) {
            return Ok(());
        }
        Err(ValidationError::rule(self.message.clone().unwrap_or_else(
            || format!("'{}' has to be set", self.id),
        )))
    }

    fn describe(&self) -> String {
        format!("'{}' is set", self.id)
    }

    fn check(&self, registry: &Registry) -> Result<(), MisconfigurationError> {
        check_known(registry, &self.id)
    }
}

/// Exactly one of two entities is set.
#[derive(Debug, Clone)]
pub struct XorOptionsRule {
    first: String,
    second: String,
    message: Option<String>,
}

impl XorOptionsRule {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Rule for XorOptionsRule {
    fn validate(
        &self,
        _registry: &Registry,
        input: &ValidatedInput,
    ) -> Result<(), ValidationError> {
        if input.is_set(&self.first) != input.is_set(&self.second) {
            return Ok(());
        }
        Err(ValidationError::rule(self.message.clone().unwrap_or_else(
            || {
                format!(
                    "Exactly one of '{}' and '{}' has to be set",
                    self.first, self.second
                )
            },
        )))
    }

    fn describe(&self) -> String {
        format!("exactly one of '{}' and '{}' is set", self.first, self.second)
    }

    fn check(&self, registry: &Registry) -> Result<(), MisconfigurationError> {
        check_known(registry, &self.first)?;
        check_known(registry, &self.second)
    }
}

type Predicate = dyn Fn(&Registry, &ValidatedInput) -> bool + Send + Sync;

/// Caller-supplied condition.
pub struct PredicateRule {
    description: String,
    message: Option<String>,
    predicate: Box<Predicate>,
}

impl PredicateRule {
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Registry, &ValidatedInput) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            message: None,
            predicate: Box::new(predicate),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Debug for PredicateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRule")
            .field("description", &self.description)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl Rule for PredicateRule {
    fn validate(
        &self,
        registry: &Registry,
        input: &ValidatedInput,
    ) -> Result<(), ValidationError> {
        if (self.predicate)(registry, input) {
            return Ok(());
        }
        Err(ValidationError::rule(self.message.clone().unwrap_or_else(
            || format!("Condition not met: {}", self.description),
        )))
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}
