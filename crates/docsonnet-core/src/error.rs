//! Error types for model extraction.

use thiserror::Error;

/// Errors raised while turning a tree into a document model.
///
/// `path` is the dotted field path of the offending node, starting at the
/// root package's name.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed tree at `{path}`: {reason}")]
    MalformedTree { path: String, reason: String },

    #[error("malformed field `{path}`: {reason}")]
    MalformedField { path: String, reason: String },

    #[error("ambiguous input at `{path}`: expected {expected}, found {found}")]
    AmbiguousInput {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("duplicate sub-package `{name}`: declared at `{first}` and `{second}`")]
    DuplicatePackage {
        name: String,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
