use anyhow::{Context, Result};
use argval::ValidatedInput;

/// One line per set flag, then `id = value` per resolved value, then any
/// tokens lenient mode left unmatched.
pub fn text(input: &ValidatedInput) -> String {
    let mut out = String::new();
    for flag in input.flags() {
        out.push_str(&format!("{flag}: set\n"));
    }
    for (id, value) in input.values() {
        let marker = if input.is_set(id) { "" } else { " (default)" };
        out.push_str(&format!("{id} = {value}{marker}\n"));
    }
    if !input.unmatched().is_empty() {
        out.push_str(&format!("unmatched: {}\n", input.unmatched().join(" ")));
    }
    out
}

pub fn json(value: &impl serde::Serialize) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("failed to serialize result")?;
    out.push('\n');
    Ok(out)
}
