//! JSON documents that declare `argval` validators.
//!
//! A [`SpecDocument`] declares flags, options, arguments and rules and builds
//! into a [`Validator`](argval::Validator). A [`CommandsDocument`] holds one
//! spec per command and builds into a [`CommandSet`](argval::CommandSet).

mod document;
mod error;

use std::fs;
use std::path::Path;

pub use document::{
    ArgumentSpec, CommandSpec, CommandsDocument, EnvironmentSpec, FilterSpec, FlagSpec,
    OptionSpec, RuleSpec, SpecDocument,
};
pub use error::SchemaError;

/// Either kind of document; a top-level `commands` key selects
/// [`Document::Commands`].
#[derive(Debug, Clone)]
pub enum Document {
    Single(SpecDocument),
    Commands(CommandsDocument),
}

pub fn load_str(contents: &str) -> Result<SpecDocument, SchemaError> {
    Ok(serde_json::from_str(contents)?)
}

pub fn load_file(path: &Path) -> Result<SpecDocument, SchemaError> {
    load_str(&read(path)?)
}

pub fn load_commands_str(contents: &str) -> Result<CommandsDocument, SchemaError> {
    Ok(serde_json::from_str(contents)?)
}

pub fn load_commands_file(path: &Path) -> Result<CommandsDocument, SchemaError> {
    load_commands_str(&read(path)?)
}

pub fn load_document_str(contents: &str) -> Result<Document, SchemaError> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    if value.get("commands").is_some() {
        Ok(Document::Commands(serde_json::from_value(value)?))
    } else {
        Ok(Document::Single(serde_json::from_value(value)?))
    }
}

pub fn load_document_file(path: &Path) -> Result<Document, SchemaError> {
    load_document_str(&read(path)?)
}

fn read(path: &Path) -> Result<String, SchemaError> {
    tracing::debug!(path = %path.display(), "loading spec document");
    fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use argval::{Error, MisconfigurationError, ValidationError, Value};

    const CONVERT: &str = r#"{
        "name": "convert",
        "flags": [
            { "id": "verbose", "aliases": ["v"] },
            { "id": "quiet", "aliases": ["q"] }
        ],
        "options": [
            { "id": "encoding", "aliases": ["e"],
              "filter": { "type": "set", "values": ["UTF-8", "Latin-1"], "case-sensitive": false } },
            { "id": "mask", "filter": { "type": "integer", "radix": 16, "min": 0 }, "default": "ff" },
            { "id": "tag", "repeatable": true, "optional": true }
        ],
        "arguments": [
            { "id": "input", "position": 0, "variadic": true,
              "filter": { "type": "split", "separator": ",",
                          "filter": { "type": "any", "filters": [
                              { "type": "integer" },
                              { "type": "regex", "pattern": "[a-z]+" } ] } } }
        ],
        "rules": [
            { "type": "xor-options", "first": "verbose", "second": "quiet" }
        ]
    }"#;

    #[test]
    fn builds_working_validator() {
        let v = load_str(CONVERT).unwrap().build().unwrap();
        let out = v
            .parse(["-v", "--e", "utf-8", "--tag", "a", "--tag", "b", "1,x", "2"])
            .unwrap();
        assert_eq!(out.get_option("encoding"), Some(&Value::from("UTF-8")));
        assert_eq!(out.get_option("mask"), Some(&Value::Int(255)));
        assert!(!out.is_set("mask"));
        assert_eq!(
            out.get_option("tag"),
            Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
        );
        assert_eq!(
            out.get_option("input"),
            Some(&Value::List(vec![
                Value::List(vec![Value::Int(1), Value::from("x")]),
                Value::List(vec![Value::Int(2)]),
            ]))
        );

        let err = v.parse(["--e", "utf-8", "x"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Exactly one of 'verbose' and 'quiet' has to be set"
        );
    }

    #[test]
    fn rule_trees_and_environment() {
        let doc = load_str(
            r#"{
                "environment": { "short-prefix": "/", "long-prefix": "//" },
                "strict": false,
                "flags": [{ "id": "a" }, { "id": "b" }],
                "rules": [
                    { "type": "or", "message": "need a or b", "rules": [
                        { "type": "option-set", "id": "a" },
                        { "type": "option-set", "id": "b" } ] }
                ]
            }"#,
        )
        .unwrap();
        let v = doc.build().unwrap();
        assert!(!v.is_strict());

        let out = v.parse(["/b", "/zzz", "stray"]).unwrap();
        assert!(out.is_flag_set("b"));
        assert_eq!(out.unmatched(), ["/zzz", "stray"]);

        assert_eq!(
            v.parse(["stray"]).unwrap_err(),
            Error::Validation(ValidationError::rule_caused_by(
                "need a or b",
                ValidationError::rule("'b' has to be set")
            ))
        );
    }

    #[test]
    fn build_reports_misconfiguration() {
        let doc = load_str(
            r#"{ "flags": [{ "id": "x" }],
                 "rules": [{ "type": "option-set", "id": "missing" }] }"#,
        )
        .unwrap();
        assert!(matches!(
            doc.build().unwrap_err(),
            SchemaError::Misconfiguration(MisconfigurationError::UnknownIdentifier(id))
                if id == "missing"
        ));

        let doc = load_str(
            r#"{ "options": [{ "id": "n", "filter": { "type": "integer", "max": 3 }, "default": "9" }] }"#,
        )
        .unwrap();
        assert_eq!(
            doc.build().unwrap_err().to_string(),
            "invalid default '9' for 'n': '9' is out of range [-inf, 3]"
        );

        let doc = load_str(
            r#"{ "options": [{ "id": "n", "filter": { "type": "big-integer", "min": "ten" } }] }"#,
        )
        .unwrap();
        assert!(matches!(doc.build().unwrap_err(), SchemaError::InvalidBound(b) if b == "ten"));
    }

    #[test]
    fn rejects_unknown_filter_type() {
        let err = load_str(r#"{ "options": [{ "id": "n", "filter": { "type": "date" } }] }"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
    }

    #[test]
    fn sample_survives_json_and_builds() {
        let json = serde_json::to_string_pretty(&SpecDocument::sample()).unwrap();
        assert!(json.contains(r#""type": "option-set""#));
        let v = load_str(&json).unwrap().build().unwrap();
        assert!(v.parse(["--e", "UTF-8", "a.txt"]).is_ok());
        assert_eq!(
            v.parse(["-v", "-q", "--e", "utf-8", "a.txt"])
                .unwrap_err()
                .to_string(),
            "-verbose and -quiet exclude each other"
        );
    }

    #[test]
    fn commands_document_dispatches() {
        let doc = load_document_str(
            r#"{ "commands": [
                { "name": "add", "aliases": ["a"], "summary": "Add a thing",
                  "arguments": [{ "id": "item", "position": 0 }] },
                { "name": "list", "flags": [{ "id": "all" }] }
            ] }"#,
        )
        .unwrap();
        let Document::Commands(doc) = doc else {
            panic!("expected a commands document");
        };
        let set = doc.build().unwrap();
        let (name, out) = set.parse(["a", "milk"]).unwrap();
        assert_eq!(name, "add");
        assert_eq!(out.get_option("item"), Some(&Value::from("milk")));

        assert_eq!(doc.command("a").unwrap().spec.name, "add");
        assert!(matches!(
            doc.command("rm").unwrap_err(),
            SchemaError::UnknownCommand(c) if c == "rm"
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
        assert!(err.to_string().starts_with("failed to read /definitely/not/here.json"));
    }
}
