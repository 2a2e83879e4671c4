//! Replacement strategies applied once a rule has matched.
//!
//! Templates understand two placeholder tokens:
//!
//! | Token           | Replaced with                                   |
//! |-----------------|-------------------------------------------------|
//! | `[basename]`    | The final `/`-separated segment of the name     |
//! | `[resolvePath]` | The whole current name                          |
//!
//! Anything else (including unknown `[tokens]`) is copied literally.
//!
//! ```
//! use outctl_rules::Template;
//!
//! let template: Template = "out/[basename]".parse().unwrap();
//! assert_eq!(template.render("dist/foo/bar.js"), "out/bar.js");
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const BASENAME: &str = "[basename]";
const RESOLVE_PATH: &str = "[resolvePath]";

/// A user-supplied rewrite. Returning `None` drops the asset.
pub type RewriteFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// What to do with an asset name once its rule matched.
#[derive(Clone, Default)]
pub enum Replacer {
    /// Drop the asset entirely.
    #[default]
    Delete,
    /// Render a placeholder template against the current name.
    Template(Template),
    /// Hand the current name to a function.
    Function(RewriteFn),
}
impl Replacer {
    pub fn template(template: impl AsRef<str>) -> Self {
        Self::Template(Template::parse(template.as_ref()))
    }

    pub fn function(f: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    /// Produces the replacement for `name`, or `None` when the asset should
    /// be dropped. An empty replacement is also a drop.
    pub fn apply(&self, name: &str) -> Option<String> {
        let replaced = match self {
            Self::Delete => None,
            Self::Template(template) => Some(template.render(name)),
            Self::Function(f) => f(name),
        };
        replaced.filter(|s| !s.is_empty())
    }
}
impl fmt::Debug for Replacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => f.write_str("Delete"),
            Self::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Part {
    Literal(String),
    Basename,
    ResolvePath,
}

/// A replacement template, split into literal text and placeholders when it
/// is parsed.
///
/// Rendering is a single pass over the parsed parts, so a basename that
/// happens to contain `[resolvePath]` is never substituted a second time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    parts: Vec<Part>,
}
impl Template {
    fn parse(s: &str) -> Self {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = s;
        while !rest.is_empty() {
            let token = if rest.starts_with(BASENAME) {
                Some((Part::Basename, BASENAME.len()))
            } else if rest.starts_with(RESOLVE_PATH) {
                Some((Part::ResolvePath, RESOLVE_PATH.len()))
            } else {
                None
            };
            match token {
                Some((part, len)) => {
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(part);
                    rest = &rest[len..];
                },
                None => {
                    // Infallible: the loop guard ensures at least one char remains.
                    let Some(c) = rest.chars().next() else { break };
                    literal.push(c);
                    rest = &rest[c.len_utf8()..];
                },
            }
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }
        Self { parts }
    }

    pub fn render(&self, name: &str) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(s) => out.push_str(s),
                Part::Basename => out.push_str(basename(name)),
                Part::ResolvePath => out.push_str(name),
            }
        }
        out
    }
}
impl FromStr for Template {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Final path segment of `name`, ignoring trailing separators.
fn basename(name: &str) -> &str {
    let trimmed = name.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
