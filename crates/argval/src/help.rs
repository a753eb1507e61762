//! Help text rendering from registry introspection.
//!
//! Nothing here touches parse state; the formatter only reads declarations.
//! Line wrapping goes through a [`TextWrapper`] value owned by the formatter.

use crate::commands::CommandSet;
use crate::entity::{ArgumentDef, FlagDef, OptionDef, ValueSpec};
use crate::environment::Environment;
use crate::validator::Validator;

const MIN_HELP_WIDTH: usize = 20;

/// Greedy word wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextWrapper {
    width: usize,
}

impl Default for TextWrapper {
    fn default() -> Self {
        Self { width: 80 }
    }
}

impl TextWrapper {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Split `text` into lines of at most `width` chars. A single word longer
    /// than `width` gets a line of its own.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let mut line = String::new();
        let mut line_len = 0usize;
        for word in text.split_whitespace() {
            let word_len = word.chars().count();
            if line_len > 0 && line_len + 1 + word_len > self.width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }
}

/// Renders usage and help for a [`Validator`] or a [`CommandSet`].
#[derive(Debug, Clone)]
pub struct HelpFormatter {
    name: String,
    summary: String,
    wrapper: TextWrapper,
}

impl HelpFormatter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: String::new(),
            wrapper: TextWrapper::default(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_wrapper(mut self, wrapper: TextWrapper) -> Self {
        self.wrapper = wrapper;
        self
    }

    fn header(&self, out: &mut String) {
        if self.summary.trim().is_empty() {
            out.push_str(&self.name);
        } else {
            out.push_str(&format!("{} - {}", self.name, self.summary.trim()));
        }
        out.push('\n');
    }

    pub fn usage(&self, validator: &Validator) -> String {
        let registry = validator.registry();
        let mut parts = vec![self.name.clone()];
        if registry.flags().next().is_some() {
            parts.push("[FLAGS]".to_string());
        }
        if registry.options().next().is_some() {
            parts.push("[OPTIONS]".to_string());
        }
        for arg in registry.arguments_by_position() {
            parts.push(argument_left(arg));
        }
        parts.join(" ")
    }

    pub fn render(&self, validator: &Validator) -> String {
        let registry = validator.registry();
        let env = validator.environment();

        let mut out = String::new();
        self.header(&mut out);
        out.push_str(&format!("\nUsage: {}\n", self.usage(validator)));

        let arguments: Vec<(String, String)> = registry
            .arguments_by_position()
            .into_iter()
            .map(|a| (argument_left(a), argument_help(a)))
            .collect();
        self.section(&mut out, "Arguments", &arguments);

        let options: Vec<(String, String)> = registry
            .options()
            .map(|o| (option_left(o, env), option_help(o)))
            .collect();
        self.section(&mut out, "Options", &options);

        let flags: Vec<(String, String)> = registry
            .flags()
            .map(|f| (flag_left(f, env), f.description().trim().to_string()))
            .collect();
        self.section(&mut out, "Flags", &flags);

        let rules: Vec<(String, String)> = registry
            .rules()
            .iter()
            .map(|r| (r.describe(), String::new()))
            .collect();
        self.section(&mut out, "Constraints", &rules);

        out
    }

    pub fn render_commands(&self, commands: &CommandSet) -> String {
        let mut out = String::new();
        self.header(&mut out);
        out.push_str(&format!("\nUsage: {} <COMMAND> [ARGS]\n", self.name));

        let rows: Vec<(String, String)> = commands
            .iter()
            .map(|c| {
                let mut left = c.name().to_string();
                if !c.aliases().is_empty() {
                    left.push_str(&format!(" ({})", c.aliases().join(", ")));
                }
                (left, c.summary().trim().to_string())
            })
            .collect();
        self.section(&mut out, "Commands", &rows);
        out
    }

    fn section(&self, out: &mut String, title: &str, rows: &[(String, String)]) {
        if rows.is_empty() {
            return;
        }
        out.push_str(&format!("\n{title}:\n"));
        let width = rows
            .iter()
            .map(|(l, _)| l.chars().count())
            .max()
            .unwrap_or(0);
        let indent = 2 + width + 2;
        let help_width = self
            .wrapper
            .width()
            .saturating_sub(indent)
            .max(MIN_HELP_WIDTH);
        let wrapper = TextWrapper::new(help_width);

        for (left, help) in rows {
            let lines = wrapper.wrap(help);
            let Some((first, rest)) = lines.split_first() else {
                out.push_str(&format!("  {left}\n"));
                continue;
            };
            out.push_str(&format!("  {left:width$}  {first}\n"));
            for line in rest {
                out.push_str(&format!("{:indent$}{line}\n", ""));
            }
        }
    }
}

fn value_name(id: &str) -> String {
    id.to_ascii_uppercase()
}

fn identifier_list(prefix: &str, ids: impl Iterator<Item = impl AsRef<str>>) -> String {
    let names: Vec<String> = ids.map(|id| format!("{prefix}{}", id.as_ref())).collect();
    names.join(", ")
}

fn flag_left(flag: &FlagDef, env: &Environment) -> String {
    identifier_list(env.short_prefix(), flag.identifiers().all())
}

fn option_left(option: &OptionDef, env: &Environment) -> String {
    format!(
        "{} <{}>",
        identifier_list(env.long_prefix(), option.identifiers().all()),
        value_name(option.id())
    )
}

fn argument_left(arg: &ArgumentDef) -> String {
    let name = if arg.is_required() {
        format!("<{}>", arg.id())
    } else {
        format!("[{}]", arg.id())
    };
    if arg.is_variadic() {
        format!("{name}...")
    } else {
        name
    }
}

fn value_help(description: &str, spec: &ValueSpec, show_required: bool) -> String {
    let mut out = description.trim().to_string();
    let mut push = |part: String| {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&part);
    };
    let accepted = spec.filter().describe();
    if accepted != "string" {
        push(format!("[{accepted}]"));
    }
    if show_required && spec.is_required() {
        push("(required)".to_string());
    }
    if let Some(default) = spec.default_value() {
        push(format!("[default: {default}]"));
    }
    out
}

fn option_help(option: &OptionDef) -> String {
    let mut out = value_help(option.description(), option.value_spec(), true);
    if option.is_repeatable() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str("(repeatable)");
    }
    out
}

fn argument_help(arg: &ArgumentDef) -> String {
    // Required-ness already shows as <name> vs [name].
    value_help(arg.description(), arg.value_spec(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ArgumentDef, FlagDef, OptionDef};
    use crate::filter::{IntegerFilter, SetFilter};
    use crate::rule::XorOptionsRule;

    fn validator() -> Validator {
        let mut v = Validator::new();
        v.add(FlagDef::new("verbose").with_alias("v").with_description("Verbose output"))
            .unwrap();
        v.add(FlagDef::new("quiet").with_alias("q")).unwrap();
        v.add(
            OptionDef::new("encoding")
                .with_alias("e")
                .with_description("Input encoding")
                .with_filter(SetFilter::new(["utf-8", "latin-1"], false).unwrap()),
        )
        .unwrap();
        v.add(OptionDef::new("jobs").with_default(4i64)).unwrap();
        v.add(
            ArgumentDef::new("input", 0)
                .with_description("Files to read")
                .with_filter(IntegerFilter::new())
                .variadic(),
        )
        .unwrap();
        v.add_rule(XorOptionsRule::new("verbose", "quiet")).unwrap();
        v
    }

    #[test]
    fn wrapper_breaks_on_words() {
        let w = TextWrapper::new(10);
        assert_eq!(
            w.wrap("the quick brown fox jumps"),
            ["the quick", "brown fox", "jumps"]
        );
        assert_eq!(w.wrap("incomprehensibilities ok"), ["incomprehensibilities", "ok"]);
        assert!(w.wrap("   ").is_empty());
    }

    #[test]
    fn usage_lists_sections() {
        let f = HelpFormatter::new("tool");
        assert_eq!(f.usage(&validator()), "tool [FLAGS] [OPTIONS] <input>...");
    }

    #[test]
    fn render_includes_every_declaration() {
        let text = HelpFormatter::new("tool")
            .with_summary("Does things")
            .render(&validator());
        assert!(text.starts_with("tool - Does things\n"));
        assert!(text.contains("Arguments:\n  <input>...  Files to read [integer]\n"));
        assert!(text.contains("  --encoding, --e <ENCODING>  Input encoding"));
        assert!(text.contains("[one of: utf-8, latin-1] (required)"));
        assert!(text.contains("[default: 4]"));
        assert!(text.contains("-verbose, -v"));
        assert!(text.contains("Constraints:\n  exactly one of 'verbose' and 'quiet' is set\n"));
    }

    #[test]
    fn long_help_is_wrapped_and_indented() {
        let mut v = Validator::new();
        v.add(FlagDef::new("x").with_description(
            "one two three four five six seven eight nine ten eleven twelve",
        ))
        .unwrap();
        let text = HelpFormatter::new("t")
            .with_wrapper(TextWrapper::new(30))
            .render(&v);
        let lines: Vec<&str> = text
            .lines()
            .skip_while(|l| *l != "Flags:")
            .skip(1)
            .collect();
        assert_eq!(
            lines,
            [
                "  -x  one two three four five",
                "      six seven eight nine ten",
                "      eleven twelve",
            ]
        );
    }
}
