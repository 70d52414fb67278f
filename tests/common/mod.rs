//! In-memory EPUB archives for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const COVER_BYTES: &[u8] = b"\xff\xd8\xff\xe0 not really a jpeg";

pub fn container_xml(full_path: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="{full_path}" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#
    )
}

pub fn chapter(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>{title}</title><link rel="stylesheet" href="../style.css"/></head>
<body>
<h1>{title}</h1>
<p>This is {title}.</p>
</body>
</html>"#
    )
}

pub const SAMPLE_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid" xml:lang="en">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:12345678-1234-1234-1234-123456789abc</dc:identifier>
    <dc:title>The Sample Book</dc:title>
    <dc:title>Second Title</dc:title>
    <dc:creator id="a1">First Author</dc:creator>
    <dc:creator id="a2">Second Author</dc:creator>
    <dc:language>en</dc:language>
    <dc:description>A book used in tests.</dc:description>
    <dc:description>Another description.</dc:description>
    <meta property="dcterms:modified">2024-01-01T00:00:00Z</meta>
  </metadata>
  <manifest>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="ch1" href="text/ch1.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch2" href="text/ch2.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch3" href="text/ch3.xhtml" media-type="application/xhtml+xml"/>
    <item id="css" href="style.css" media-type="text/css"/>
    <item id="cover" href="images/cover.jpg" media-type="image/jpeg" properties="cover-image"/>
    <item id="font" href="fonts/serif.otf" media-type="font/otf"/>
    <item id="intro" href="audio/intro.mp3" media-type="audio/mpeg"/>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="ch1"/>
    <itemref idref="ch2"/>
    <itemref idref="ch3" linear="no"/>
  </spine>
  <guide>
    <reference type="toc" title="Contents" href="nav.xhtml"/>
  </guide>
</package>"#;

pub const SAMPLE_NAV: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title>Navigation</title></head>
<body>
  <nav epub:type="toc" id="toc">
    <h1>Table of Contents</h1>
    <ol>
      <li><a href="text/ch1.xhtml">Chapter One</a></li>
      <li>
        <span>Part Two</span>
        <ol>
          <li><a href="text/ch2.xhtml">Chapter Two</a></li>
          <li><a href="text/ch3.xhtml#end">Chapter Three</a></li>
        </ol>
      </li>
    </ol>
  </nav>
  <nav epub:type="landmarks" hidden="">
    <h2>Landmarks</h2>
    <ol>
      <li><a epub:type="cover" href="images/cover.jpg">Cover</a></li>
      <li><a epub:type="bodymatter" href="text/ch1.xhtml">Start Reading</a></li>
    </ol>
  </nav>
</body>
</html>"#;

const SAMPLE_NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <navMap><navPoint id="n1"><navLabel><text>Chapter One</text></navLabel><content src="text/ch1.xhtml"/></navPoint></navMap>
</ncx>"#;

/// Archive entries, written in insertion order with `mimetype` stored first.
#[derive(Clone, Debug)]
pub struct EpubBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl EpubBuilder {
    /// Only the `mimetype` entry.
    pub fn empty() -> Self {
        Self {
            entries: vec![("mimetype".into(), b"application/epub+zip".to_vec())],
        }
    }

    /// A complete EPUB 3 publication rooted at `OEBPS/content.opf`.
    pub fn sample() -> Self {
        Self::empty()
            .file("META-INF/container.xml", container_xml("OEBPS/content.opf"))
            .file("OEBPS/content.opf", SAMPLE_OPF)
            .file("OEBPS/nav.xhtml", SAMPLE_NAV)
            .file("OEBPS/text/ch1.xhtml", chapter("Chapter One"))
            .file("OEBPS/text/ch2.xhtml", chapter("Chapter Two"))
            .file("OEBPS/text/ch3.xhtml", chapter("Chapter Three"))
            .file("OEBPS/style.css", "body { margin: 0 }")
            .file("OEBPS/images/cover.jpg", COVER_BYTES)
            .file("OEBPS/fonts/serif.otf", b"OTTO fake font".as_slice())
            .file("OEBPS/audio/intro.mp3", b"ID3 fake audio".as_slice())
            .file("OEBPS/toc.ncx", SAMPLE_NCX)
    }

    /// Add an entry, replacing any entry of the same name in place.
    pub fn file(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = data,
            None => self.entries.push((name.to_string(), data)),
        }
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.entries.retain(|(n, _)| n != name);
        self
    }

    /// Rewrite the package document with `f`.
    pub fn edit_opf(self, f: impl FnOnce(&str) -> String) -> Self {
        let opf = f(SAMPLE_OPF);
        self.file("OEBPS/content.opf", opf)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in &self.entries {
            let method = if name == "mimetype" {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            let options = SimpleFileOptions::default().compression_method(method);
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}
