use crate::error::MisconfigurationError;

/// Token-prefix conventions consulted by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    escape_char: char,
    short_prefix: String,
    long_prefix: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            escape_char: '\\',
            short_prefix: "-".to_string(),
            long_prefix: "--".to_string(),
        }
    }
}

impl Environment {
    pub fn new(
        short_prefix: impl Into<String>,
        long_prefix: impl Into<String>,
        escape_char: char,
    ) -> Result<Self, MisconfigurationError> {
        let short_prefix = short_prefix.into();
        let long_prefix = long_prefix.into();
        if short_prefix.is_empty() || long_prefix.is_empty() {
            return Err(MisconfigurationError::InvalidEnvironment(
                "prefixes must not be empty".to_string(),
            ));
        }
        if short_prefix == long_prefix {
            return Err(MisconfigurationError::InvalidEnvironment(format!(
                "short and long prefix are both '{short_prefix}'"
            )));
        }
        if short_prefix.starts_with(escape_char) || long_prefix.starts_with(escape_char) {
            return Err(MisconfigurationError::InvalidEnvironment(format!(
                "escape char '{escape_char}' starts a prefix"
            )));
        }
        Ok(Self {
            escape_char,
            short_prefix,
            long_prefix,
        })
    }

    pub fn escape_char(&self) -> char {
        self.escape_char
    }

    pub fn short_prefix(&self) -> &str {
        &self.short_prefix
    }

    pub fn long_prefix(&self) -> &str {
        &self.long_prefix
    }

    /// Prefixes in the order they must be tested: longest first, so `-`
    /// never claims a `--` token.
    pub(crate) fn prefixes_by_precedence(&self) -> [(&str, PrefixKind); 2] {
        let long = (self.long_prefix.as_str(), PrefixKind::Long);
        let short = (self.short_prefix.as_str(), PrefixKind::Short);
        if self.short_prefix.len() > self.long_prefix.len() {
            [short, long]
        } else {
            [long, short]
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrefixKind {
    Short,
    Long,
}
