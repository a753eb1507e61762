//! Declarative command-line argument validation.
//!
//! Declare flags, options and positional arguments on a [`Validator`], attach
//! [filters](filter) that turn raw strings into typed [`Value`]s and
//! [rules](rule) that constrain combinations, then parse argv:
//!
//! ```
//! use argval::{ArgumentDef, FlagDef, OptionDef, Validator, Value};
//! use argval::filter::IntegerFilter;
//!
//! let mut v = Validator::new();
//! v.add(FlagDef::new("verbose").with_alias("v"))?;
//! v.add(OptionDef::new("encoding").with_alias("e"))?;
//! v.add(ArgumentDef::new("input", 0).with_filter(IntegerFilter::new()).variadic())?;
//!
//! let out = v.parse(["-v", "--e", "utf-8", "1", "2"])?;
//! assert!(out.is_flag_set("v"));
//! assert_eq!(out.get_option("encoding"), Some(&Value::from("utf-8")));
//! assert_eq!(out.get_option("input"), Some(&Value::List(vec![Value::Int(1), Value::Int(2)])));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Tokenization only needs the prefix conventions of an [`Environment`];
//! matching, filtering and rules are driven by the [`Registry`].

pub mod commands;
pub mod entity;
pub mod environment;
pub mod error;
pub mod filter;
pub mod help;
pub mod input;
pub mod registry;
pub mod rule;
pub mod validated;
pub mod validator;
pub mod value;

pub use commands::{Command, CommandSet};
pub use entity::{ArgumentDef, Entity, EntityKind, FlagDef, Identifiers, OptionDef, ValueSpec};
pub use environment::Environment;
pub use error::{
    Error, MisconfigurationError, ParseError, ParseErrorKind, Result, TokenizeError,
    ValidationError,
};
pub use filter::Filter;
pub use help::{HelpFormatter, TextWrapper};
pub use input::Input;
pub use registry::Registry;
pub use rule::Rule;
pub use validated::ValidatedInput;
pub use validator::Validator;
pub use value::Value;
