use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("failed to load configuration")]
    Config,
    #[display("invalid options")]
    Options,
    #[display("failed to read manifest: {}", _0.display())]
    Manifest(#[error(not(source))] PathBuf),
    #[display("failed to access the ledger")]
    Ledger,
}
