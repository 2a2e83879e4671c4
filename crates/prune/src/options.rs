/// Deletion settings for [`prune`](crate::prune).
///
/// Deserializing a partial map fills the missing keys from the defaults, so
/// user configuration is always merged over `{ dot: true, force: true,
/// dry_run: false }`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeleteOptions {
    /// Let globs match hidden (dot-prefixed) entries.
    pub dot: bool,
    /// Remove read-only entries too. Without it they are skipped with a
    /// warning.
    pub force: bool,
    /// Report what would be removed without removing anything.
    #[cfg_attr(feature = "serde", serde(alias = "dryRun"))]
    pub dry_run: bool,
    /// Extra globs that must never be removed. Added to, never replacing,
    /// the protection of the current build's assets.
    pub ignore: Vec<String>,
}
impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            dot: true,
            force: true,
            dry_run: false,
            ignore: Vec::new(),
        }
    }
}
impl DeleteOptions {
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
