//! `[token]` template rendering
//!
//! Templates are plain strings with `[name]` placeholders. Rendering replaces
//! every occurrence of each known token; placeholders without a value are left
//! untouched. The compiled matcher for each token name is cached process-wide,
//! since changelog rendering re-renders the same templates once per commit.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use regex::{NoExpand, Regex};

/// Ordered token values for a render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    entries: Vec<(String, String)>,
}

impl Tokens {
    /// Create an empty token set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a token, replacing any previous value for the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`Tokens::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a token value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over tokens in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

fn token_cache() -> &'static Mutex<HashMap<String, Regex>> {
    static CACHE: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

fn token_regex(name: &str) -> Option<Regex> {
    let mut cache = match token_cache().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if let Some(re) = cache.get(name) {
        return Some(re.clone());
    }

    let re = Regex::new(&regex::escape(&format!("[{}]", name))).ok()?;
    cache.insert(name.to_string(), re.clone());
    Some(re)
}

/// Render `template`, replacing every `[name]` for each token in `tokens`
pub fn render(template: &str, tokens: &Tokens) -> String {
    let mut out = template.to_string();

    for (name, value) in tokens.iter() {
        if !out.contains(name) {
            continue;
        }
        if let Some(re) = token_regex(name) {
            out = re.replace_all(&out, NoExpand(value)).into_owned();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        let tokens = Tokens::new().with("version", "1.2.3");
        assert_eq!(
            render("v[version] ([version])", &tokens),
            "v1.2.3 (1.2.3)"
        );
    }

    #[test]
    fn test_unknown_tokens_are_left_verbatim() {
        let tokens = Tokens::new().with("version", "1.0.0");
        assert_eq!(render("[version] by [author_name]", &tokens), "1.0.0 by [author_name]");
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        let tokens = Tokens::new().with("version", "1.0.0");
        assert_eq!(render("[Version]", &tokens), "[Version]");
    }

    #[test]
    fn test_values_are_not_expanded() {
        let tokens = Tokens::new().with("message", "cost $1 and ${name}");
        assert_eq!(render("- [message]", &tokens), "- cost $1 and ${name}");
    }

    #[test]
    fn test_regex_metacharacters_in_names() {
        let tokens = Tokens::new().with("a.b", "x");
        assert_eq!(render("[a.b] [aXb]", &tokens), "x [aXb]");
    }

    #[test]
    fn test_render_is_idempotent() {
        let tokens = Tokens::new()
            .with("version", "2.0.0")
            .with("hash7", "abcdef1")
            .with("message", "Fix the thing");
        let template = "### [version]\n- [message] ([hash7]) [unknown]";
        let once = render(template, &tokens);
        assert_eq!(render(&once, &tokens), once);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut tokens = Tokens::new().with("version", "1.0.0");
        tokens.insert("version", "2.0.0");
        assert_eq!(tokens.get("version"), Some("2.0.0"));
        assert_eq!(tokens.iter().count(), 1);
    }

    #[test]
    fn test_cached_regex_is_reused() {
        let tokens = Tokens::new().with("cached_token", "ok");
        assert_eq!(render("[cached_token]", &tokens), "ok");
        assert_eq!(render("[cached_token][cached_token]", &tokens), "okok");
        let cache = token_cache().lock().unwrap();
        assert!(cache.contains_key("cached_token"));
    }
}
