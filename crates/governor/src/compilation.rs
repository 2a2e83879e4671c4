use crate::error::Result;

/// The host build's view of its emitted assets.
///
/// Implementations hold assets that are named but not written yet. The
/// governor only ever sees names; contents stay with the host.
pub trait Compilation {
    /// Names of every asset emitted so far, relative to the output directory.
    fn asset_names(&self) -> Vec<String>;

    /// Relabel an asset in place. The contents are unchanged.
    fn rename_asset(&mut self, from: &str, to: &str) -> Result<()>;

    /// Drop an asset so it is never written.
    fn delete_asset(&mut self, name: &str) -> Result<()>;
}

/// A change the governor asks the host to make to one asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetAction {
    Rename { from: String, to: String },
    Delete { name: String },
}
impl AssetAction {
    /// Apply this action to `compilation`.
    pub fn apply(&self, compilation: &mut impl Compilation) -> Result<()> {
        match self {
            Self::Rename { from, to } => compilation.rename_asset(from, to),
            Self::Delete { name } => compilation.delete_asset(name),
        }
    }
}

/// What the host reports once a build has finished.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildResult {
    pub has_errors: bool,
    /// Final asset names, after every rename and deletion.
    pub assets: Vec<String>,
}
impl BuildResult {
    pub fn succeeded(assets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { has_errors: false, assets: assets.into_iter().map(Into::into).collect() }
    }

    pub fn failed() -> Self {
        Self { has_errors: true, assets: Vec::new() }
    }
}
