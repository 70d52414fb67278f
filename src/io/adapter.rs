use super::byte_source::ByteSource;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

/// Stateful `Read + Seek` view over a shared [`ByteSource`].
///
/// `zip::ZipArchive` needs a cursor to walk the central directory; entry
/// payloads are read afterwards straight from the source.
pub struct ByteSourceCursor {
    inner: Arc<dyn ByteSource>,
    position: u64,
}

impl ByteSourceCursor {
    pub fn new(inner: Arc<dyn ByteSource>) -> Self {
        Self { inner, position: 0 }
    }
}

impl Read for ByteSourceCursor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let total_len = self.inner.len();
        if self.position >= total_len {
            return Ok(0);
        }
        let want = (total_len - self.position).min(buf.len() as u64) as usize;
        let read = self.inner.read_at_into(self.position, &mut buf[..want])?;
        self.position += read as u64;
        Ok(read)
    }
}

impl Seek for ByteSourceCursor {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let base = match pos {
            SeekFrom::Start(p) => {
                self.position = p;
                return Ok(p);
            }
            SeekFrom::End(delta) => (self.inner.len(), delta),
            SeekFrom::Current(delta) => (self.position, delta),
        };

        match base.0.checked_add_signed(base.1) {
            Some(new_pos) => {
                self.position = new_pos;
                Ok(new_pos)
            }
            None => Err(io::Error::new(io::ErrorKind::InvalidInput, "Seek before 0")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;

    #[test]
    fn test_cursor_read_and_seek() {
        let source: Arc<dyn ByteSource> = Arc::new(MemorySource::new(b"abcdefgh".to_vec()));
        let mut cursor = ByteSourceCursor::new(source);

        let mut buf = [0u8; 3];
        assert_eq!(cursor.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"abc");

        assert_eq!(cursor.seek(SeekFrom::End(-2)).unwrap(), 6);
        let mut rest = Vec::new();
        cursor.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"gh");

        assert!(cursor.seek(SeekFrom::Current(-100)).is_err());
    }
}
