//! Error types for bindery operations.

use thiserror::Error;

/// Errors that can occur while decoding a publication archive.
///
/// Every variant is terminal for the read that raised it: no partially
/// populated [`Book`](crate::Book) is ever returned alongside an error.
#[derive(Error, Debug)]
pub enum Error {
    /// The archive could not be opened: bad path, unreadable file, or a
    /// corrupt ZIP central directory.
    #[error("cannot open archive: {0}")]
    ArchiveOpen(String),

    /// A required archive-relative path does not exist.
    #[error("entry not found in archive: {0}")]
    EntryNotFound(String),

    /// A required XML document failed to decode into its expected shape.
    #[error("malformed XML in {path}: {reason}")]
    MalformedXml { path: String, reason: String },

    /// No `META-INF/container.xml` entry exists.
    #[error("META-INF/container.xml not found")]
    ContainerMissing,

    /// No manifest item carries the `nav` property.
    #[error("no manifest item declares the `nav` property")]
    NavigationMissing,

    /// A spine itemref points at a manifest id that does not exist.
    /// Only raised when [`ReadOptions::strict_spine`](crate::ReadOptions) is set.
    #[error("spine itemref references unknown manifest id: {0}")]
    DanglingSpineRef(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl ToString) -> Self {
        Error::MalformedXml {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
