use std::io::{self, Cursor, Read};

use flate2::read::DeflateDecoder;
use log::debug;

/// Upper bound on the buffer reserved up front from a declared size, so a
/// lying central directory cannot force a huge allocation before any data
/// has actually been inflated.
const MAX_INITIAL_CAPACITY: u64 = 16 * 1024 * 1024;

/// A readable view over one archive entry.
///
/// The stream owns its compressed bytes; dropping it releases everything.
pub struct EntryStream {
    name: String,
    declared_size: u64,
    inner: Inner,
}

enum Inner {
    Stored(Cursor<Vec<u8>>),
    Deflated(DeflateDecoder<Cursor<Vec<u8>>>),
}

impl EntryStream {
    pub(super) fn stored(name: &str, declared_size: u64, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            declared_size,
            inner: Inner::Stored(Cursor::new(data)),
        }
    }

    pub(super) fn deflated(name: &str, declared_size: u64, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            declared_size,
            inner: Inner::Deflated(DeflateDecoder::new(Cursor::new(data))),
        }
    }

    /// Archive path of the entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uncompressed size declared by the archive.
    pub fn declared_size(&self) -> u64 {
        self.declared_size
    }

    /// Buffer the entry up to its declared size.
    ///
    /// A stream that ends before the declared size is a short read and yields
    /// whatever was available. Any other read failure is returned.
    pub fn read_declared(mut self) -> io::Result<Vec<u8>> {
        let limit = self.declared_size;
        let mut out = Vec::with_capacity(limit.min(MAX_INITIAL_CAPACITY) as usize);
        let mut chunk = [0u8; 8192];

        while (out.len() as u64) < limit {
            let want = (limit - out.len() as u64).min(chunk.len() as u64) as usize;
            match self.read(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(n) => out.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
        }

        if (out.len() as u64) < limit {
            debug!(
                "short read on {}: {} of {} declared bytes",
                self.name,
                out.len(),
                limit
            );
        }
        Ok(out)
    }
}

impl Read for EntryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Stored(cursor) => cursor.read(buf),
            Inner::Deflated(decoder) => decoder.read(buf),
        }
    }
}

impl std::fmt::Debug for EntryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStream")
            .field("name", &self.name)
            .field("declared_size", &self.declared_size)
            .finish()
    }
}
