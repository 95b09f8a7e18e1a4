//! Compilation settings.

use serde::{Deserialize, Serialize};

/// Path delimiter used when none is configured.
pub const DEFAULT_DELIMITER: &str = "/";

/// How unresolved symbolic references are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Any unresolved reference aborts resolution of the whole tree.
    Strict,
    /// Unresolved references become inert placeholders.
    #[default]
    Lenient,
}

impl Strictness {
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl From<bool> for Strictness {
    fn from(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Settings threaded through resolution and compilation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    #[serde(default)]
    pub strictness: Strictness,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self::new().with_strictness(Strictness::Strict)
    }

    pub fn lenient() -> Self {
        Self::new().with_strictness(Strictness::Lenient)
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            delimiter: default_delimiter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_lenient_with_slash() {
        let options = CompileOptions::default();
        assert_eq!(options.strictness, Strictness::Lenient);
        assert_eq!(options.delimiter, "/");
    }

    #[test]
    fn setters_override_defaults() {
        let options = CompileOptions::strict().with_delimiter(".");
        assert!(options.strictness.is_strict());
        assert_eq!(options.delimiter, ".");
    }

    #[test]
    fn strictness_from_flag() {
        assert_eq!(Strictness::from(true), Strictness::Strict);
        assert_eq!(Strictness::from(false), Strictness::Lenient);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: CompileOptions = serde_json::from_str(r#"{ "strictness": "strict" }"#).unwrap();
        assert_eq!(options, CompileOptions::strict());
    }
}
