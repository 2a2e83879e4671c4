//! Asset name redirection.
//!
//! A [`Rules`] list is an ordered set of [`ControlRule`]s, each pairing a
//! [`Matcher`] with a [`Replacer`]. Running a name through
//! [`Rules::redirect`] yields a [`Redirect`]: the name is left alone, renamed,
//! or dropped.
//!
//! - Rules are evaluated in declaration order, and each matching rule feeds
//!   its output into the next rule.
//! - A rule that drops the asset stops evaluation immediately.
//! - Evaluation is pure. The same name and rules always give the same answer.
//!
//! With the `serde` feature, [`spec::RuleSpec`] describes rules in
//! configuration files and [`Rules::from_specs`] compiles them.

pub mod error;
mod matcher;
mod replacer;
mod rule;
#[cfg(feature = "serde")]
pub mod spec;

pub use crate::matcher::{Matcher, PredicateFn};
pub use crate::replacer::{Replacer, RewriteFn, Template};
pub use crate::rule::{ControlRule, Redirect, Rules};
