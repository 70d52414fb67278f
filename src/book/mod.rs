//! The assembled publication.

mod reader;

pub use reader::{read_book, read_book_from_archive, read_book_from_bytes, read_book_with};

use std::path::Path;

use crate::content::{Content, LocalTextContentFile};
use crate::error::Result;
use crate::nav::{NavKind, Navigation};
use crate::opf::{Metadata, Package};
use crate::options::ReadOptions;

/// A fully decoded publication.
///
/// Built once per read and never mutated by the library afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Book {
    /// Path the archive was read from, or empty for in-memory reads.
    pub file_path: String,
    /// First declared title, or empty.
    pub title: String,
    /// First declared creator, or empty.
    pub author: String,
    pub authors: Vec<String>,
    /// First declared description, or empty.
    pub description: String,
    /// Bytes of the cover image, if the manifest names one.
    pub cover_image: Option<Vec<u8>>,
    /// Spine documents in reading order.
    pub reading_order: Vec<LocalTextContentFile>,
    /// Every `<nav>` block of the navigation document, in document order.
    pub navigation: Vec<Navigation>,
    /// `<title>` of the navigation document.
    pub navigation_title: String,
    pub content: Content,
    /// The parsed package document, kept whole.
    pub package: Package,
}

impl Book {
    /// Read a book from disk with default options.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bindery::Book;
    ///
    /// let book = Book::open("path/to/book.epub")?;
    /// println!("{} by {}", book.title, book.author);
    /// # Ok::<(), bindery::Error>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_book(path)
    }

    /// Read a book from disk.
    pub fn open_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Self> {
        read_book_with(path, options)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.package.metadata
    }

    /// The table of contents block, if the navigation document has one.
    pub fn toc(&self) -> Option<&Navigation> {
        self.navigation.iter().find(|nav| nav.kind() == NavKind::Toc)
    }

    /// Language of the publication: the first `dc:language`, else the
    /// package's `xml:lang`.
    pub fn language(&self) -> Option<&str> {
        self.package
            .metadata
            .languages
            .first()
            .map(String::as_str)
            .or(self.package.language.as_deref())
    }

    /// Value of the package's unique identifier.
    pub fn identifier(&self) -> Option<&str> {
        self.package.unique_identifier_value()
    }
}
