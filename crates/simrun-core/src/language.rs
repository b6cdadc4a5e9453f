//! Supported languages and their starter templates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SimrunError;

/// Stable identifier of a supported language.
///
/// Serialized in lowercase (`"cpp"`, `"python"`, ...) so persisted editor
/// state stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    Cpp,
    C,
    Javascript,
    Python,
    Java,
    Go,
    Typescript,
}

/// A catalogue entry: the identifier, the display name sent to the
/// simulation service, and an optional short alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub id: LanguageId,
    pub name: &'static str,
    pub alias: Option<&'static str>,
}

/// The language catalogue, in menu order. The first entry is the default.
pub static LANGUAGES: [Language; 7] = [
    Language {
        id: LanguageId::Cpp,
        name: "C++",
        alias: None,
    },
    Language {
        id: LanguageId::C,
        name: "C",
        alias: None,
    },
    Language {
        id: LanguageId::Javascript,
        name: "JavaScript",
        alias: Some("js"),
    },
    Language {
        id: LanguageId::Python,
        name: "Python",
        alias: Some("py"),
    },
    Language {
        id: LanguageId::Java,
        name: "Java",
        alias: None,
    },
    Language {
        id: LanguageId::Go,
        name: "Go",
        alias: None,
    },
    Language {
        id: LanguageId::Typescript,
        name: "TypeScript",
        alias: Some("ts"),
    },
];

const CPP_TEMPLATE: &str = r#"#include <bits/stdc++.h>
using namespace std;

int main() {
    ios::sync_with_stdio(0);
    cin.tie(0);

    return 0;
}
"#;

const C_TEMPLATE: &str = r#"#include <stdio.h>

int main() {

    return 0;
}
"#;

const JAVA_TEMPLATE: &str = r#"public class Main {
    public static void main(String[] args) {

    }
}
"#;

const GO_TEMPLATE: &str = r#"package main

import "fmt"

func main() {

}
"#;

impl LanguageId {
    /// All identifiers in catalogue order.
    pub fn all() -> impl Iterator<Item = LanguageId> {
        LANGUAGES.iter().map(|language| language.id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Javascript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Go => "go",
            Self::Typescript => "typescript",
        }
    }

    /// The catalogue entry for this identifier.
    pub fn language(self) -> &'static Language {
        // Catalogue order matches declaration order of the enum.
        &LANGUAGES[self as usize]
    }

    /// Display name, used as the language label for the simulation service.
    pub fn name(self) -> &'static str {
        self.language().name
    }

    /// Starter code shown when nothing has been saved for this language.
    pub fn template(self) -> &'static str {
        match self {
            Self::Cpp => CPP_TEMPLATE,
            Self::C => C_TEMPLATE,
            Self::Javascript | Self::Typescript => "// Start coding here...\n",
            Self::Python => "# Start coding here...\n",
            Self::Java => JAVA_TEMPLATE,
            Self::Go => GO_TEMPLATE,
        }
    }

    /// Resolves a language from a file extension (without the dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "cpp" | "cc" | "cxx" | "hpp" => Some(Self::Cpp),
            "c" | "h" => Some(Self::C),
            "js" | "mjs" | "cjs" => Some(Self::Javascript),
            "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            "go" => Some(Self::Go),
            "ts" | "tsx" => Some(Self::Typescript),
            _ => None,
        }
    }
}

impl Default for LanguageId {
    fn default() -> Self {
        LANGUAGES[0].id
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageId {
    type Err = SimrunError;

    /// Accepts an identifier or an alias, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        LANGUAGES
            .iter()
            .find(|language| {
                language.id.as_str() == needle || language.alias.is_some_and(|a| a == needle)
            })
            .map(|language| language.id)
            .ok_or_else(|| SimrunError::not_found("language", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_order_matches_enum() {
        for (index, language) in LANGUAGES.iter().enumerate() {
            assert_eq!(language.id as usize, index);
            assert_eq!(language.id.language(), language);
        }
    }

    #[test]
    fn test_default_is_cpp() {
        assert_eq!(LanguageId::default(), LanguageId::Cpp);
        assert_eq!(LanguageId::default().name(), "C++");
    }

    #[test]
    fn test_parse_id_and_alias() {
        assert_eq!("python".parse::<LanguageId>().unwrap(), LanguageId::Python);
        assert_eq!("PY".parse::<LanguageId>().unwrap(), LanguageId::Python);
        assert_eq!("ts".parse::<LanguageId>().unwrap(), LanguageId::Typescript);
        assert!("rust".parse::<LanguageId>().unwrap_err().is_not_found());
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(LanguageId::from_extension("cc"), Some(LanguageId::Cpp));
        assert_eq!(LanguageId::from_extension("H"), Some(LanguageId::C));
        assert_eq!(LanguageId::from_extension("tsx"), Some(LanguageId::Typescript));
        assert_eq!(LanguageId::from_extension("rs"), None);
    }

    #[test]
    fn test_serde_uses_lowercase_ids() {
        let json = serde_json::to_string(&LanguageId::Javascript).unwrap();
        assert_eq!(json, "\"javascript\"");
        let parsed: LanguageId = serde_json::from_str("\"go\"").unwrap();
        assert_eq!(parsed, LanguageId::Go);
    }

    #[test]
    fn test_templates_are_language_specific() {
        assert!(LanguageId::Java.template().contains("public class Main"));
        assert!(LanguageId::Go.template().starts_with("package main"));
        assert_eq!(LanguageId::Python.template(), "# Start coding here...\n");
    }
}
