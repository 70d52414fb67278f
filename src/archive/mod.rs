//! ZIP container access.
//!
//! The central directory is scanned once when the archive is opened. After
//! that every entry read is stateless: the compressed bytes are fetched from
//! the shared [`ByteSource`] at the recorded offset and inflated on the spot,
//! so one [`Archive`] can serve many threads reading distinct entries.

mod stream;

pub use stream::EntryStream;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::{debug, trace, warn};
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::io::{ByteSource, ByteSourceCursor, FileSource, MemorySource};
use crate::text;

/// Where an entry's payload lives and how to decode it.
#[derive(Clone, Debug)]
struct ZipEntryLoc {
    /// Offset to the compressed data within the ZIP file.
    data_offset: u64,
    /// Size of the compressed data.
    compressed_size: u64,
    /// Uncompressed size declared by the central directory.
    declared_size: u64,
    compression: Compression,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Compression {
    Stored,
    Deflated,
    Unsupported(String),
}

impl From<zip::CompressionMethod> for Compression {
    fn from(method: zip::CompressionMethod) -> Self {
        match method {
            zip::CompressionMethod::Stored => Compression::Stored,
            zip::CompressionMethod::Deflated => Compression::Deflated,
            other => Compression::Unsupported(format!("{other:?}")),
        }
    }
}

/// An opened publication archive.
///
/// Lookups are exact and case-sensitive against the entry names stored in
/// the central directory. Callers are expected to pass already-joined, clean
/// paths (see [`crate::path::resolve`]).
pub struct Archive {
    source: Arc<dyn ByteSource>,
    index: HashMap<String, ZipEntryLoc>,
    /// Entry names in central-directory order.
    names: Vec<String>,
}

impl Archive {
    /// Open an archive from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| Error::ArchiveOpen(format!("{}: {e}", path.display())))?;
        let source = FileSource::new(file)
            .map_err(|e| Error::ArchiveOpen(format!("{}: {e}", path.display())))?;
        Self::from_source(Arc::new(source))
    }

    /// Open an archive held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_source(Arc::new(MemorySource::new(data)))
    }

    /// Open an archive over any random-access byte source.
    pub fn from_source(source: Arc<dyn ByteSource>) -> Result<Self> {
        let cursor = ByteSourceCursor::new(source.clone());
        let mut zip = ZipArchive::new(cursor).map_err(|e| Error::ArchiveOpen(e.to_string()))?;

        let mut index = HashMap::with_capacity(zip.len());
        let mut names = Vec::with_capacity(zip.len());

        for i in 0..zip.len() {
            let file = zip
                .by_index_raw(i)
                .map_err(|e| Error::ArchiveOpen(e.to_string()))?;
            if file.is_dir() {
                continue;
            }

            let name = file.name().to_string();
            let loc = ZipEntryLoc {
                data_offset: file.data_start(),
                compressed_size: file.compressed_size(),
                declared_size: file.size(),
                compression: file.compression().into(),
            };

            if index.contains_key(&name) {
                warn!("duplicate archive entry {name:?}, keeping the first");
                continue;
            }
            index.insert(name.clone(), loc);
            names.push(name);
        }

        debug!("indexed {} archive entries", names.len());
        Ok(Self {
            source,
            index,
            names,
        })
    }

    /// Number of file entries.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entry names in central-directory order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Uncompressed size the archive declares for `name`.
    pub fn declared_size(&self, name: &str) -> Option<u64> {
        self.index.get(name).map(|loc| loc.declared_size)
    }

    /// Find an entry by exact name and open a stream over its contents.
    pub fn find(&self, name: &str) -> Result<EntryStream> {
        let loc = self
            .index
            .get(name)
            .ok_or_else(|| Error::EntryNotFound(name.to_string()))?;

        let compressed = self
            .source
            .read_up_to(loc.data_offset, loc.compressed_size as usize)?;
        if (compressed.len() as u64) < loc.compressed_size {
            warn!(
                "entry {name:?} truncated: {} of {} compressed bytes present",
                compressed.len(),
                loc.compressed_size
            );
        }

        match &loc.compression {
            Compression::Stored => Ok(EntryStream::stored(name, loc.declared_size, compressed)),
            Compression::Deflated => {
                Ok(EntryStream::deflated(name, loc.declared_size, compressed))
            }
            Compression::Unsupported(method) => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                format!("unsupported compression method {method} for {name}"),
            ))),
        }
    }

    /// Read an entry fully, up to its declared size.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        trace!("reading {name}");
        Ok(self.find(name)?.read_declared()?)
    }

    /// Read an entry and decode it to text.
    pub fn read_text(&self, name: &str) -> Result<String> {
        let bytes = self.read(name)?;
        Ok(text::decode(&bytes).into_owned())
    }
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("entries", &self.names.len())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::fixture::{archive_with, build_zip};
    use super::*;

    #[test]
    fn test_read_stored_and_deflated() {
        let bytes = build_zip(&[
            ("mimetype", b"application/epub+zip", zip::CompressionMethod::Stored),
            ("OEBPS/a.xhtml", b"<html/>", zip::CompressionMethod::Deflated),
        ]);
        let archive = Archive::from_bytes(bytes).unwrap();

        assert_eq!(archive.len(), 2);
        assert_eq!(archive.read("mimetype").unwrap(), b"application/epub+zip");
        assert_eq!(archive.read("OEBPS/a.xhtml").unwrap(), b"<html/>");
        assert_eq!(archive.declared_size("OEBPS/a.xhtml"), Some(7));
    }

    #[test]
    fn test_entry_names_keep_directory_order() {
        let archive = archive_with(&[("b.txt", b"b"), ("a.txt", b"a"), ("c/d.txt", b"d")]);
        let names: Vec<_> = archive.entry_names().collect();
        assert_eq!(names, vec!["b.txt", "a.txt", "c/d.txt"]);
    }

    #[test]
    fn test_lookup_is_exact() {
        let archive = archive_with(&[("OEBPS/Text/ch1.xhtml", b"x")]);

        assert!(archive.contains("OEBPS/Text/ch1.xhtml"));
        for miss in ["oebps/text/ch1.xhtml", "OEBPS/Text/../Text/ch1.xhtml", "/OEBPS/Text/ch1.xhtml"] {
            assert!(
                matches!(archive.read(miss), Err(Error::EntryNotFound(ref n)) if n == miss),
                "{miss} should not resolve"
            );
        }
    }

    #[test]
    fn test_corrupt_archive_fails_to_open() {
        let err = Archive::from_bytes(b"definitely not a zip file".to_vec()).unwrap_err();
        assert!(matches!(err, Error::ArchiveOpen(_)));
    }

    #[test]
    fn test_missing_file_fails_to_open() {
        let err = Archive::open("/nonexistent/dir/book.epub").unwrap_err();
        assert!(matches!(err, Error::ArchiveOpen(_)));
    }

    #[test]
    fn test_truncated_entry_is_a_short_read() {
        let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(b"abc".to_vec()));
        let mut index = HashMap::new();
        index.insert(
            "short.txt".to_string(),
            ZipEntryLoc {
                data_offset: 0,
                compressed_size: 10,
                declared_size: 10,
                compression: Compression::Stored,
            },
        );
        let archive = Archive {
            source,
            index,
            names: vec!["short.txt".to_string()],
        };

        assert_eq!(archive.read("short.txt").unwrap(), b"abc");
    }

    #[test]
    fn test_read_stops_at_declared_size() {
        let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(b"abcdefgh".to_vec()));
        let mut index = HashMap::new();
        index.insert(
            "e".to_string(),
            ZipEntryLoc {
                data_offset: 0,
                compressed_size: 8,
                declared_size: 5,
                compression: Compression::Stored,
            },
        );
        let archive = Archive {
            source,
            index,
            names: vec!["e".to_string()],
        };

        assert_eq!(archive.read("e").unwrap(), b"abcde");
    }

    #[test]
    fn test_unsupported_compression_is_fatal() {
        let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(b"data".to_vec()));
        let mut index = HashMap::new();
        index.insert(
            "e".to_string(),
            ZipEntryLoc {
                data_offset: 0,
                compressed_size: 4,
                declared_size: 4,
                compression: Compression::Unsupported("Bzip2".into()),
            },
        );
        let archive = Archive {
            source,
            index,
            names: vec!["e".to_string()],
        };

        match archive.read("e") {
            Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::Unsupported),
            other => panic!("expected unsupported I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_concurrent_reads() {
        use rayon::prelude::*;

        let entries: Vec<(String, Vec<u8>)> = (0..32)
            .map(|i| (format!("f{i}.bin"), vec![i as u8; 1000 + i]))
            .collect();
        let refs: Vec<_> = entries
            .iter()
            .map(|(n, d)| (n.as_str(), d.as_slice(), zip::CompressionMethod::Deflated))
            .collect();
        let archive = Archive::from_bytes(build_zip(&refs)).unwrap();

        let loaded: Vec<Vec<u8>> = entries
            .par_iter()
            .map(|(name, _)| archive.read(name).unwrap())
            .collect();
        for ((_, expected), got) in entries.iter().zip(loaded) {
            assert_eq!(expected, &got);
        }
    }
}
