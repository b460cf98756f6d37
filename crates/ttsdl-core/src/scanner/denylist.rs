//! Script-token denylist.

/// Tokens that betray Lua source captured by the lazy field pattern.
const DEFAULT_TOKENS: &[&str] = &["function", "end", "if", "then", "else", "lua"];

/// Substring heuristic for rejecting captured text that is script code
/// rather than a URL. Matching is case-insensitive.
///
/// This over-rejects: `.gif` contains `if`, `/weekend/` contains `end`.
/// The token list is configurable for that reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDenylist {
    tokens: Vec<String>,
}

impl ScriptDenylist {
    pub fn new(tokens: Vec<String>) -> Self {
        let tokens = tokens
            .into_iter()
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { tokens }
    }

    /// An empty list accepts everything.
    pub fn none() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// First token found in `url`, if any.
    pub fn matched_token(&self, url: &str) -> Option<&str> {
        let lower = url.to_ascii_lowercase();
        self.tokens
            .iter()
            .find(|t| lower.contains(t.as_str()))
            .map(String::as_str)
    }

    pub fn is_denied(&self, url: &str) -> bool {
        self.matched_token(url).is_some()
    }
}

impl Default for ScriptDenylist {
    fn default() -> Self {
        Self::new(DEFAULT_TOKENS.iter().map(|t| t.to_string()).collect())
    }
}
