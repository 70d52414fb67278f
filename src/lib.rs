//! # bindery
//!
//! Decode EPUB (OCF/OPF) archives into a structured, in-memory model.
//!
//! ## Features
//!
//! - Package metadata, manifest, spine, guide and collections
//! - Reading order loaded as text, in spine order
//! - Navigation outlines (table of contents, landmarks, page lists)
//! - Every manifest resource typed by MIME type and bucketed as HTML, CSS,
//!   images, fonts or audio
//! - Safe against hostile archives: hrefs can never address anything outside
//!   the container, and truncated entries read short instead of failing
//!
//! ## Quick Start
//!
//! ```no_run
//! use bindery::{read_book_with, ReadOptions};
//!
//! let book = read_book_with("input.epub", &ReadOptions::new().with_workers(4))?;
//! println!("{} by {}", book.title, book.author);
//!
//! if let Some(toc) = book.toc() {
//!     for entry in &toc.ol.items {
//!         println!("  {}", entry.text());
//!     }
//! }
//! # Ok::<(), bindery::Error>(())
//! ```
//!
//! ## Working with the Pipeline
//!
//! Each stage is usable on its own against an opened [`Archive`]:
//!
//! ```no_run
//! use bindery::{Archive, container, opf};
//!
//! let archive = Archive::open("input.epub")?;
//! let root = container::locate(&archive)?;
//! let package = opf::parse(&archive, &root.full_path)?;
//! for item in &package.manifest {
//!     println!("{} {:?}", item.href, item.content_type());
//! }
//! # Ok::<(), bindery::Error>(())
//! ```

pub mod archive;
pub mod book;
pub mod container;
pub mod content;
pub mod error;
pub mod io;
pub mod nav;
pub mod opf;
pub mod options;
pub mod path;
pub mod pool;
pub(crate) mod text;
pub(crate) mod xml;

pub use archive::{Archive, EntryStream};
pub use book::{Book, read_book, read_book_from_archive, read_book_from_bytes, read_book_with};
pub use container::RootFile;
pub use content::{Content, ContentType, classify};
pub use error::{Error, Result};
pub use nav::{NavKind, Navigation, NavigationDocument};
pub use opf::{Manifest, ManifestItem, Metadata, Package};
pub use options::ReadOptions;
pub use pool::LoadPool;
