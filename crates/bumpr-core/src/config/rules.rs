//! Version file rules
//!
//! A rule is a regex whose first capture group is the version, a replacement
//! template containing `[version]`, and optional flags. Rules can be written
//! as `[pattern, replacement]`, `[pattern, replacement, flags]` or as a table
//! with named keys; a file maps to one rule or a list of them.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Flags applied when a rule does not set its own
pub const DEFAULT_FLAGS: &str = "gmi";

/// One rule or a list of rules for a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileEntry {
    /// A single rule
    One(RuleSpec),
    /// Several rules, applied in order
    Many(Vec<RuleSpec>),
}

impl FileEntry {
    /// Flatten into rules, in configured order
    pub fn rules(&self) -> Vec<FileRule> {
        match self {
            Self::One(spec) => vec![spec.clone().into()],
            Self::Many(specs) => specs.iter().cloned().map(Into::into).collect(),
        }
    }
}

/// Accepted spellings of a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// `[pattern, replacement, flags]`
    WithFlags(String, String, String),
    /// `[pattern, replacement]`
    Pair(String, String),
    /// `{ pattern, replacement, flags }`
    Table(FileRule),
}

impl From<RuleSpec> for FileRule {
    fn from(spec: RuleSpec) -> Self {
        match spec {
            RuleSpec::WithFlags(pattern, replacement, flags) => Self {
                pattern,
                replacement,
                flags: Some(flags),
            },
            RuleSpec::Pair(pattern, replacement) => Self {
                pattern,
                replacement,
                flags: None,
            },
            RuleSpec::Table(rule) => rule,
        }
    }
}

/// A normalized version rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRule {
    /// Pattern; capture group 1 is the version
    pub pattern: String,
    /// Replacement; `$n` and `$&` refer to the match, `$$` is a literal `$`
    pub replacement: String,
    /// Flag characters, defaults to [`DEFAULT_FLAGS`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
}

impl FileRule {
    /// Create a rule with explicit flags
    pub fn new(
        pattern: impl Into<String>,
        replacement: impl Into<String>,
        flags: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            flags: Some(flags.into()),
        }
    }

    /// Effective flags
    pub fn flags(&self) -> &str {
        self.flags.as_deref().unwrap_or(DEFAULT_FLAGS)
    }

    /// Compile the rule for `path` (used only in error messages)
    pub fn compile(&self, path: &str) -> Result<CompiledRule, ProviderError> {
        let flags: RegexFlags = self
            .flags()
            .parse()
            .map_err(|message| ProviderError::InvalidPattern {
                path: path.to_string(),
                message,
            })?;

        let regex = RegexBuilder::new(&self.pattern)
            .case_insensitive(flags.case_insensitive)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_all)
            .build()
            .map_err(|e| ProviderError::InvalidPattern {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let replacement = expand_references(&self.replacement, regex.captures_len());
        Ok(CompiledRule {
            regex,
            replacement,
            global: flags.global,
        })
    }
}

/// Parsed flag characters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexFlags {
    /// `g`: replace every match instead of the first
    pub global: bool,
    /// `m`: `^`/`$` match at line boundaries
    pub multi_line: bool,
    /// `i`: case-insensitive
    pub case_insensitive: bool,
    /// `s`: `.` matches newlines
    pub dot_all: bool,
}

impl std::str::FromStr for RegexFlags {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Self::default();
        for c in s.chars() {
            match c {
                'g' => flags.global = true,
                'm' => flags.multi_line = true,
                'i' => flags.case_insensitive = true,
                's' => flags.dot_all = true,
                // Unicode and sticky modes have no equivalent to toggle
                'u' | 'y' => {}
                other => return Err(format!("unknown regex flag '{}'", other)),
            }
        }
        Ok(flags)
    }
}

/// A rule ready to match and rewrite content
#[derive(Debug, Clone)]
pub struct CompiledRule {
    regex: Regex,
    replacement: String,
    global: bool,
}

impl CompiledRule {
    /// First non-empty capture group 1 among all matches
    pub fn extract<'a>(&self, content: &'a str) -> Option<&'a str> {
        self.regex
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|v| !v.is_empty())
    }

    /// Rewrite `content` with `version` substituted into the replacement
    pub fn apply(&self, content: &str, version: &str) -> String {
        let replacement = self.replacement.replace("[version]", &version.replace('$', "$$"));
        if self.global {
            self.regex.replace_all(content, replacement.as_str()).into_owned()
        } else {
            self.regex.replace(content, replacement.as_str()).into_owned()
        }
    }
}

/// Rewrite `$n`, `$nn` and `$&` into braced group references so that text
/// following a reference is never read as part of its name. A two-digit
/// reference falls back to one digit when the pattern has fewer groups.
fn expand_references(replacement: &str, groups: usize) -> String {
    let mut out = String::with_capacity(replacement.len() + 8);
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some('&') => {
                chars.next();
                out.push_str("${0}");
            }
            Some(first) if first.is_ascii_digit() => {
                chars.next();
                let mut index = first.to_digit(10).unwrap_or(0) as usize;
                if let Some(second) = chars.peek().and_then(|d| d.to_digit(10)) {
                    let wide = index * 10 + second as usize;
                    if wide > 0 && wide < groups {
                        chars.next();
                        index = wide;
                    }
                }
                if index > 0 && index < groups {
                    out.push_str(&format!("${{{}}}", index));
                } else {
                    out.push_str("$$");
                    out.push_str(&index.to_string());
                }
            }
            _ => out.push_str("$$"),
        }
    }

    out
}
