//! `META-INF/container.xml` lookup.

use log::debug;
use quick_xml::events::Event;

use crate::archive::Archive;
use crate::error::{Error, Result};
use crate::xml::{self, XmlCursor};

const CONTAINER_SUFFIX: &str = "META-INF/container.xml";

/// The package document declared by the container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RootFile {
    /// Archive-relative path of the package document.
    pub full_path: String,
    pub media_type: Option<String>,
}

/// Find the container document and return its first root file.
///
/// The entry is matched by suffix so archives that nest the whole
/// publication under a vendor prefix still resolve.
pub fn locate(archive: &Archive) -> Result<RootFile> {
    let entry = archive
        .entry_names()
        .find(|name| name.ends_with(CONTAINER_SUFFIX))
        .ok_or(Error::ContainerMissing)?;

    let content = archive.read_text(entry)?;
    let root = parse_container(&content, entry)?;
    debug!("container {entry} declares root file {}", root.full_path);
    Ok(root)
}

/// Parse container XML and return the first `rootfile` declaration.
pub fn parse_container(content: &str, path: &str) -> Result<RootFile> {
    let mut cursor = XmlCursor::new(content, path);

    loop {
        match cursor.next_event()? {
            Event::Start(e) | Event::Empty(e) if xml::element_name(&e) == b"rootfile" => {
                if let Some(full_path) = xml::attribute(&e, b"full-path")
                    && !full_path.trim().is_empty()
                {
                    return Ok(RootFile {
                        full_path: full_path.trim().to_string(),
                        media_type: xml::attribute(&e, b"media-type"),
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(cursor.malformed("no rootfile with a full-path"))
}
