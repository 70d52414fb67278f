//! Fatal conditions and tolerated defects.

mod common;

use bindery::{Error, ReadOptions, read_book, read_book_from_bytes};
use common::{EpubBuilder, container_xml};

fn read(builder: EpubBuilder) -> bindery::Result<bindery::Book> {
    read_book_from_bytes(builder.build(), &ReadOptions::default())
}

#[test]
fn test_missing_archive() {
    let err = read_book("/nonexistent/path/book.epub").unwrap_err();
    assert!(matches!(err, Error::ArchiveOpen(_)), "{err}");
}

#[test]
fn test_corrupt_archive() {
    let err = read_book_from_bytes(b"PK\x03\x04 garbage".to_vec(), &ReadOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::ArchiveOpen(_)), "{err}");
}

#[test]
fn test_container_missing() {
    let err = read(EpubBuilder::sample().without("META-INF/container.xml")).unwrap_err();
    assert!(matches!(err, Error::ContainerMissing), "{err}");
}

#[test]
fn test_container_under_vendor_prefix() {
    let book = read(
        EpubBuilder::sample()
            .without("META-INF/container.xml")
            .file("vendor/META-INF/container.xml", container_xml("OEBPS/content.opf")),
    )
    .unwrap();
    assert_eq!(book.title, "The Sample Book");
}

#[test]
fn test_container_without_rootfile() {
    let err = read(EpubBuilder::sample().file(
        "META-INF/container.xml",
        "<container><rootfiles></rootfiles></container>",
    ))
    .unwrap_err();
    assert!(matches!(err, Error::MalformedXml { .. }), "{err}");
}

#[test]
fn test_root_file_missing() {
    let err = read(EpubBuilder::sample().without("OEBPS/content.opf")).unwrap_err();
    assert!(matches!(err, Error::EntryNotFound(ref p) if p == "OEBPS/content.opf"), "{err}");
}

#[test]
fn test_malformed_package() {
    let err = read(EpubBuilder::sample().file(
        "OEBPS/content.opf",
        "<package><metadata></package>",
    ))
    .unwrap_err();
    assert!(
        matches!(err, Error::MalformedXml { ref path, .. } if path == "OEBPS/content.opf"),
        "{err}"
    );
}

#[test]
fn test_spine_document_missing() {
    let err = read(EpubBuilder::sample().without("OEBPS/text/ch2.xhtml")).unwrap_err();
    assert!(
        matches!(err, Error::EntryNotFound(ref p) if p == "OEBPS/text/ch2.xhtml"),
        "{err}"
    );
}

#[test]
fn test_navigation_document_missing() {
    let err = read(EpubBuilder::sample().without("OEBPS/nav.xhtml")).unwrap_err();
    assert!(
        matches!(err, Error::EntryNotFound(ref p) if p == "OEBPS/nav.xhtml"),
        "{err}"
    );
}

#[test]
fn test_unreferenced_manifest_entry_missing() {
    // Not in the spine, so only materialization touches it.
    let err = read(EpubBuilder::sample().without("OEBPS/audio/intro.mp3")).unwrap_err();
    assert!(
        matches!(err, Error::EntryNotFound(ref p) if p == "OEBPS/audio/intro.mp3"),
        "{err}"
    );
}

#[test]
fn test_navigation_missing() {
    let err = read(
        EpubBuilder::sample().edit_opf(|opf| opf.replace(r#" properties="nav""#, "")),
    )
    .unwrap_err();
    assert!(matches!(err, Error::NavigationMissing), "{err}");
}

#[test]
fn test_navigation_token_is_not_a_substring_match() {
    let err = read(EpubBuilder::sample().edit_opf(|opf| {
        opf.replace(r#"properties="nav""#, r#"properties="navigation""#)
    }))
    .unwrap_err();
    assert!(matches!(err, Error::NavigationMissing), "{err}");
}

#[test]
fn test_dangling_spine_ref_is_skipped() {
    let builder = EpubBuilder::sample().edit_opf(|opf| {
        opf.replace(
            r#"<itemref idref="ch2"/>"#,
            r#"<itemref idref="ghost"/><itemref idref="ch2"/>"#,
        )
    });
    let book = read(builder.clone()).unwrap();

    let keys: Vec<_> = book
        .reading_order
        .iter()
        .map(|f| f.file.key.as_str())
        .collect();
    assert_eq!(keys, vec!["text/ch1.xhtml", "text/ch2.xhtml", "text/ch3.xhtml"]);
    assert_eq!(book.package.spine.itemrefs.len(), 4);

    let strict = ReadOptions::new().with_strict_spine(true);
    let err = read_book_from_bytes(builder.build(), &strict).unwrap_err();
    assert!(matches!(err, Error::DanglingSpineRef(ref id) if id == "ghost"), "{err}");
}

#[test]
fn test_parallel_read_reports_missing_entry() {
    let bytes = EpubBuilder::sample().without("OEBPS/style.css").build();
    let err = read_book_from_bytes(bytes, &ReadOptions::new().with_workers(4)).unwrap_err();
    assert!(matches!(err, Error::EntryNotFound(ref p) if p == "OEBPS/style.css"), "{err}");
}

#[test]
fn test_parallel_read_reports_first_missing_entry_in_manifest_order() {
    let builder = EpubBuilder::sample()
        .without("OEBPS/style.css")
        .without("OEBPS/audio/intro.mp3");
    for workers in [1, 2, 8] {
        let options = ReadOptions::new().with_workers(workers);
        let err = read_book_from_bytes(builder.clone().build(), &options).unwrap_err();
        assert!(
            matches!(err, Error::EntryNotFound(ref p) if p == "OEBPS/style.css"),
            "{workers} workers: {err}"
        );
    }
}
