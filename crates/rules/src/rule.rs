use crate::matcher::Matcher;
use crate::replacer::Replacer;
use tracing::instrument;

/// A single match/replace pair.
#[derive(Clone, Debug)]
pub struct ControlRule {
    pub test: Matcher,
    pub replace: Replacer,
}
impl ControlRule {
    pub fn new(test: impl Into<Matcher>, replace: Replacer) -> Self {
        Self { test: test.into(), replace }
    }

    /// Shorthand for a rule that drops every matching asset.
    pub fn delete(test: impl Into<Matcher>) -> Self {
        Self::new(test, Replacer::Delete)
    }
}

/// The outcome of running an asset name through [`Rules`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Redirect {
    /// No rule changed the name. The host should not be told anything.
    Unchanged(String),
    /// The asset should be relabelled under a new name.
    Renamed(String),
    /// The asset should be dropped before it is written.
    Deleted,
}
impl Redirect {
    /// The name the asset ends up with, or `None` when it was dropped.
    pub fn resolved(&self) -> Option<&str> {
        match self {
            Self::Unchanged(name) | Self::Renamed(name) => Some(name),
            Self::Deleted => None,
        }
    }
}

/// An ordered, immutable list of [`ControlRule`]s.
///
/// # Examples
///
/// ```
/// use outctl_rules::{ControlRule, Matcher, Redirect, Replacer, Rules};
///
/// let rules: Rules = vec![
///     ControlRule::delete(Matcher::pattern(r"\.map$").unwrap()),
///     ControlRule::new(Matcher::substring("legacy/"), Replacer::template("old/[basename]")),
/// ]
/// .into();
///
/// assert_eq!(rules.redirect("js/app.js.map"), Redirect::Deleted);
/// assert_eq!(rules.redirect("legacy/a/b.js"), Redirect::Renamed("old/b.js".into()));
/// assert_eq!(rules.redirect("js/app.js"), Redirect::Unchanged("js/app.js".into()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Rules {
    rules: Vec<ControlRule>,
}
impl Rules {
    pub fn new(rules: impl IntoIterator<Item = ControlRule>) -> Self {
        Self { rules: rules.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Folds every rule, in declaration order, over `name`.
    ///
    /// Each matching rule rewrites the current name and the next rule sees
    /// the rewritten value. The first rule that drops the asset ends the fold.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn redirect(&self, name: &str) -> Redirect {
        let mut current = name.to_string();
        for rule in &self.rules {
            if !rule.test.matches(&current) {
                continue;
            }
            match rule.replace.apply(&current) {
                Some(replaced) => current = replaced,
                None => return Redirect::Deleted,
            }
        }
        match current == name {
            true => Redirect::Unchanged(current),
            false => Redirect::Renamed(current),
        }
    }
}
impl From<Vec<ControlRule>> for Rules {
    fn from(rules: Vec<ControlRule>) -> Self {
        Self { rules }
    }
}
impl FromIterator<ControlRule> for Rules {
    fn from_iter<I: IntoIterator<Item = ControlRule>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn always() -> Matcher {
        Matcher::predicate(|_| true)
    }

    #[test]
    fn test_no_rules_is_unchanged() {
        let rules = Rules::default();
        assert_eq!(rules.redirect("a.js"), Redirect::Unchanged("a.js".to_string()));
    }

    #[test]
    fn test_no_match_is_unchanged() {
        let rules = Rules::new([ControlRule::new(Matcher::substring("css/"), Replacer::template("x"))]);
        assert_eq!(rules.redirect("js/a.js"), Redirect::Unchanged("js/a.js".to_string()));
    }

    #[test]
    fn test_delete_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let rules = Rules::new([
            ControlRule::delete(always()),
            ControlRule::new(
                Matcher::predicate(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    true
                }),
                Replacer::template("X"),
            ),
        ]);
        assert_eq!(rules.redirect("a.js"), Redirect::Deleted);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_rules_chain() {
        let rules = Rules::new([
            ControlRule::new(Matcher::substring("dist/"), Replacer::template("out/[basename]")),
            ControlRule::new(Matcher::pattern(r"^out/").unwrap(), Replacer::template("[resolvePath].bak")),
        ]);
        assert_eq!(rules.redirect("dist/foo/bar.js"), Redirect::Renamed("out/bar.js.bak".to_string()));
    }

    #[test]
    fn test_later_rule_sees_rewritten_name() {
        // The second rule only matches the output of the first one.
        let rules = Rules::new([
            ControlRule::new(Matcher::substring("a.js"), Replacer::template("b.js")),
            ControlRule::delete(Matcher::substring("b.js")),
        ]);
        assert_eq!(rules.redirect("a.js"), Redirect::Deleted);
    }

    #[test]
    fn test_rewrite_back_to_original_is_unchanged() {
        let rules = Rules::new([
            ControlRule::new(Matcher::substring("a"), Replacer::template("tmp")),
            ControlRule::new(Matcher::substring("tmp"), Replacer::template("a")),
        ]);
        assert_eq!(rules.redirect("a"), Redirect::Unchanged("a".to_string()));
    }

    #[test]
    fn test_never_matcher_is_silent_no_op() {
        let rules = Rules::new([ControlRule::delete(Matcher::Never)]);
        assert_eq!(rules.redirect("a.js"), Redirect::Unchanged("a.js".to_string()));
    }

    #[test]
    fn test_redirect_is_idempotent_for_stable_names() {
        let rules = Rules::new([ControlRule::new(Matcher::substring("dist/"), Replacer::template("out/[basename]"))]);
        let first = rules.redirect("dist/foo/bar.js");
        let stable = first.resolved().unwrap().to_string();
        assert_eq!(rules.redirect(&stable), Redirect::Unchanged(stable.clone()));
        assert_eq!(rules.redirect(&stable), rules.redirect(&stable));
    }

    #[test]
    fn test_function_returning_none_deletes() {
        let rules = Rules::new([ControlRule::new(always(), Replacer::function(|_| None))]);
        assert_eq!(rules.redirect("a.js"), Redirect::Deleted);
        assert_eq!(Redirect::Deleted.resolved(), None);
    }
}
