use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// A user-supplied test over an asset name.
pub type PredicateFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Decides whether a rule applies to the current asset name.
///
/// The variant is picked once when the rule is built, so evaluation never
/// has to inspect what kind of test it was handed.
#[derive(Clone)]
pub enum Matcher {
    /// Matches when the name contains the string. An empty string matches
    /// every name.
    Substring(String),
    /// Matches when the expression matches anywhere in the name (unanchored).
    Pattern(Regex),
    /// Matches when the function returns `true`.
    Predicate(PredicateFn),
    /// A rule without a usable test. Never matches and never errors.
    Never,
}
impl Matcher {
    pub fn substring(needle: impl Into<String>) -> Self {
        Self::Substring(needle.into())
    }

    /// Compiles `pattern` eagerly so a bad expression fails at configuration
    /// time rather than in the middle of a build.
    pub fn pattern(pattern: impl AsRef<str>) -> Result<Self> {
        let pattern = pattern.as_ref();
        let regex = Regex::new(pattern).or_raise(|| ErrorKind::InvalidPattern(pattern.to_string()))?;
        Ok(Self::Pattern(regex))
    }

    pub fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Substring(needle) => name.contains(needle.as_str()),
            Self::Pattern(regex) => regex.is_match(name),
            Self::Predicate(f) => f(name),
            Self::Never => false,
        }
    }
}
impl From<&str> for Matcher {
    fn from(needle: &str) -> Self {
        Self::substring(needle)
    }
}
impl From<String> for Matcher {
    fn from(needle: String) -> Self {
        Self::Substring(needle)
    }
}
impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}
impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring(s) => f.debug_tuple("Substring").field(s).finish(),
            Self::Pattern(r) => f.debug_tuple("Pattern").field(&r.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Never => f.write_str("Never"),
        }
    }
}
