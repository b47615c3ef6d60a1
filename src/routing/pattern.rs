//! Glob matching for forbidden routes and trusted addresses.
//!
//! `*` matches any run of characters, including none. Every other character
//! matches itself. Matching is case-sensitive and covers the whole input.

use regex::Regex;

use super::{RouteError, RouteResult};

/// A single compiled glob.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    raw: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compile a glob.
    ///
    /// # Example
    ///
    /// ```
    /// use artisan_api::routing::GlobPattern;
    ///
    /// let pattern = GlobPattern::new("migrate*").unwrap();
    /// assert!(pattern.is_match("migrate"));
    /// assert!(pattern.is_match("migrate:fresh"));
    /// assert!(!pattern.is_match("db:migrate"));
    /// ```
    pub fn new(pattern: &str) -> RouteResult<Self> {
        if pattern.is_empty() {
            return Err(RouteError::invalid_pattern(pattern, "pattern is empty"));
        }

        let body = regex::escape(pattern).replace(r"\*", ".*");
        let regex = Regex::new(&format!(r"(?s)^{}\z", body))
            .map_err(|e| RouteError::invalid_pattern(pattern, e.to_string()))?;

        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    /// Whether the whole input matches.
    pub fn is_match(&self, input: &str) -> bool {
        self.raw == input || self.regex.is_match(input)
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// An ordered set of globs.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<GlobPattern>,
}

impl PatternSet {
    /// Compile every pattern; the first malformed one fails the whole set.
    pub fn new<I, S>(patterns: I) -> RouteResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| GlobPattern::new(p.as_ref()))
            .collect::<RouteResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// The first pattern matching `input`, in declaration order.
    pub fn first_match(&self, input: &str) -> Option<&GlobPattern> {
        self.patterns.iter().find(|p| p.is_match(input))
    }

    /// Whether any pattern matches `input`.
    pub fn is_match(&self, input: &str) -> bool {
        self.first_match(input).is_some()
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if there are no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Patterns as written.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(GlobPattern::as_str)
    }
}
