//! Declarative rule shapes for configuration files.
//!
//! ```toml
//! [[control]]
//! test = "legacy/"                 # substring
//! replace = "old/[basename]"
//!
//! [[control]]
//! test = { pattern = '\.map$' }    # regular expression
//! # no `replace`: matching assets are dropped
//! ```
//!
//! Predicate and function rules only exist in code; configuration files can
//! express substrings, patterns and templates.

use crate::error::{ErrorKind, Result};
use crate::{ControlRule, Matcher, Replacer, Rules};
use exn::ResultExt;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleSpec {
    /// A rule without a test never matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<TestSpec>,
    /// A rule without a replacement drops the matching asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TestSpec {
    Substring(String),
    Pattern { pattern: String },
}

impl TryFrom<&RuleSpec> for ControlRule {
    type Error = crate::error::Error;

    fn try_from(spec: &RuleSpec) -> std::result::Result<Self, Self::Error> {
        let test = match &spec.test {
            Some(TestSpec::Substring(needle)) => Matcher::substring(needle),
            Some(TestSpec::Pattern { pattern }) => Matcher::pattern(pattern)?,
            None => Matcher::Never,
        };
        let replace = match &spec.replace {
            Some(template) => Replacer::template(template),
            None => Replacer::Delete,
        };
        Ok(ControlRule::new(test, replace))
    }
}

impl Rules {
    /// Builds the rule list from configuration, failing on the first rule
    /// that does not compile.
    pub fn from_specs<'a>(specs: impl IntoIterator<Item = &'a RuleSpec>) -> Result<Self> {
        specs
            .into_iter()
            .enumerate()
            .map(|(position, spec)| ControlRule::try_from(spec).or_raise(|| ErrorKind::InvalidRule(position)))
            .collect()
    }
}
