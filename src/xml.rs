//! Shared quick-xml plumbing for the container, package and navigation
//! parsers.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

/// Forward-only cursor over one XML document.
///
/// Every parser in the crate walks its document with one of these, so XML
/// errors always carry the archive path of the document that failed.
pub struct XmlCursor<'a> {
    reader: Reader<&'a [u8]>,
    path: &'a str,
}

impl<'a> XmlCursor<'a> {
    pub fn new(content: &'a str, path: &'a str) -> Self {
        Self {
            reader: Reader::from_str(content),
            path,
        }
    }

    /// Next event, with parse failures mapped to [`Error::MalformedXml`].
    pub fn next_event(&mut self) -> Result<Event<'a>> {
        self.reader
            .read_event()
            .map_err(|e| Error::malformed(self.path, e))
    }

    pub fn malformed(&self, reason: impl ToString) -> Error {
        Error::malformed(self.path, reason)
    }

    /// Collect the text content of the element just opened, including the
    /// text of nested elements, up to its matching end tag. The result is
    /// trimmed.
    pub fn read_text(&mut self) -> Result<String> {
        let mut text = String::new();
        let mut depth = 0usize;

        loop {
            match self.next_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Event::Text(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
                Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
                Event::GeneralRef(e) => {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if let Some(resolved) = resolve_entity(&entity) {
                        text.push_str(&resolved);
                    }
                }
                Event::Eof => return Err(self.malformed("unexpected end of document")),
                _ => {}
            }
        }

        Ok(text.trim().to_string())
    }

    /// Next child element of the element being read, paired with whether it
    /// is self-closing. Returns `None` at the parent's end tag.
    pub fn next_child(&mut self) -> Result<Option<(BytesStart<'a>, bool)>> {
        loop {
            match self.next_event()? {
                Event::Start(e) => return Ok(Some((e, false))),
                Event::Empty(e) => return Ok(Some((e, true))),
                Event::End(_) => return Ok(None),
                Event::Eof => return Err(self.malformed("unexpected end of document")),
                _ => {}
            }
        }
    }

    /// Text of a child returned by [`next_child`](Self::next_child).
    pub fn child_text(&mut self, empty: bool) -> Result<String> {
        if empty {
            Ok(String::new())
        } else {
            self.read_text()
        }
    }

    /// Pass over a child returned by [`next_child`](Self::next_child).
    pub fn skip_child(&mut self, empty: bool) -> Result<()> {
        if empty { Ok(()) } else { self.skip_element() }
    }

    /// Pass over the element just opened, up to its matching end tag.
    pub fn skip_element(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            match self.next_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                Event::Eof => return Err(self.malformed("unexpected end of document")),
                _ => {}
            }
        }
    }
}

/// Extract local name from namespaced XML name (e.g., "dc:title" -> "title").
pub fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Local name of an element's tag, owned so the start event can be borrowed
/// again afterwards.
pub fn element_name(e: &BytesStart<'_>) -> Vec<u8> {
    local_name(e.name().as_ref()).to_vec()
}

/// Value of the attribute whose local name is `key`, entity-unescaped.
///
/// Namespace prefixes are ignored, so `epub:type` answers to `type`.
pub fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| local_name(attr.key.as_ref()) == key)
        .map(|attr| decode_attribute(&attr.value))
}

/// True when the element carries the attribute at all, whatever its value.
pub fn has_attribute(e: &BytesStart<'_>, key: &[u8]) -> bool {
    e.attributes()
        .flatten()
        .any(|attr| local_name(attr.key.as_ref()) == key)
}

fn decode_attribute(raw: &[u8]) -> String {
    let raw = String::from_utf8_lossy(raw);
    match quick_xml::escape::unescape(&raw) {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => raw.into_owned(),
    }
}

/// Resolve XML entity references.
pub fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        // XHTML navigation documents routinely lean on the HTML DTD
        "nbsp" => return Some("\u{a0}".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}
