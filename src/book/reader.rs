use std::path::Path;

use log::{debug, warn};

use super::Book;
use crate::archive::Archive;
use crate::container;
use crate::content::{self, LocalTextContentFile};
use crate::error::{Error, Result};
use crate::nav;
use crate::opf::{self, ManifestItem, Package};
use crate::options::ReadOptions;
use crate::path;
use crate::pool::LoadPool;

/// Read a publication from disk with default options.
///
/// # Example
///
/// ```no_run
/// use bindery::read_book;
///
/// let book = read_book("path/to/book.epub")?;
/// for doc in &book.reading_order {
///     println!("{}: {} bytes", doc.file.key, doc.content.len());
/// }
/// # Ok::<(), bindery::Error>(())
/// ```
pub fn read_book<P: AsRef<Path>>(path: P) -> Result<Book> {
    read_book_with(path, &ReadOptions::default())
}

/// Read a publication from disk.
pub fn read_book_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Book> {
    let path = path.as_ref();
    let archive = Archive::open(path)?;
    read_book_from_archive(&archive, &path.to_string_lossy(), options)
}

/// Read a publication held in memory. The resulting book has an empty
/// `file_path`.
pub fn read_book_from_bytes(data: Vec<u8>, options: &ReadOptions) -> Result<Book> {
    let archive = Archive::from_bytes(data)?;
    read_book_from_archive(&archive, "", options)
}

/// Decode an already opened archive. `file_path` is recorded on the book
/// as given.
pub fn read_book_from_archive(
    archive: &Archive,
    file_path: &str,
    options: &ReadOptions,
) -> Result<Book> {
    let pool = LoadPool::new(options.workers)?;

    let root = container::locate(archive)?;
    let package = opf::parse(archive, &root.full_path)?;
    let content_dir = path::content_dir(&root.full_path);

    let cover_image = read_cover_image(archive, &package, &content_dir)?;
    let reading_order = read_reading_order(archive, &package, &content_dir, options, &pool)?;

    let nav_item = package
        .manifest
        .navigation_item()
        .ok_or(Error::NavigationMissing)?;
    let nav_path = path::resolve(archive, &content_dir, &nav_item.href);
    let navigation = nav::parse(archive, &nav_path)?;

    let content = content::materialize(archive, &package.manifest, &content_dir, &pool)?;

    let metadata = &package.metadata;
    let book = Book {
        file_path: file_path.to_string(),
        title: metadata.title().unwrap_or_default().to_string(),
        author: metadata.creator().unwrap_or_default().to_string(),
        authors: metadata.creator_names(),
        description: metadata.description().to_string(),
        cover_image,
        reading_order,
        navigation: navigation.navigations,
        navigation_title: navigation.title,
        content,
        package,
    };

    debug!(
        "read {:?}: {} reading-order documents, {} nav blocks, {} files",
        book.title,
        book.reading_order.len(),
        book.navigation.len(),
        book.content.all_files.len()
    );
    Ok(book)
}

/// Bytes of the cover image.
///
/// Every item carrying `cover-image` is read in manifest order and the last
/// one wins. Without any such item, the EPUB 2 `<meta name="cover">` names
/// the cover by manifest id.
fn read_cover_image(
    archive: &Archive,
    package: &Package,
    content_dir: &str,
) -> Result<Option<Vec<u8>>> {
    let manifest = &package.manifest;

    let mut cover = None;
    for item in manifest.with_property("cover-image") {
        if let Some(bytes) = read_local(archive, item, content_dir)? {
            cover = Some(bytes);
        }
    }
    if cover.is_some() {
        return Ok(cover);
    }

    let Some(id) = package.metadata.meta_content("cover") else {
        return Ok(None);
    };
    match manifest.get(id) {
        Some(item) => read_local(archive, item, content_dir),
        None => {
            warn!("cover meta names unknown manifest id {id:?}");
            Ok(None)
        }
    }
}

fn read_local(archive: &Archive, item: &ManifestItem, content_dir: &str) -> Result<Option<Vec<u8>>> {
    if path::is_remote(&item.href) {
        return Ok(None);
    }
    let file_path = path::resolve(archive, content_dir, &item.href);
    archive.read(&file_path).map(Some)
}

/// Spine documents in spine order, loaded as text.
fn read_reading_order(
    archive: &Archive,
    package: &Package,
    content_dir: &str,
    options: &ReadOptions,
    pool: &LoadPool,
) -> Result<Vec<LocalTextContentFile>> {
    let items = spine_items(package, options.strict_spine)?;
    pool.load_all(&items, |item| content::load_text(archive, item, content_dir))
}

fn spine_items(package: &Package, strict: bool) -> Result<Vec<&ManifestItem>> {
    let manifest = &package.manifest;
    let mut items = Vec::with_capacity(package.spine.itemrefs.len());
    for itemref in &package.spine.itemrefs {
        match manifest.get(&itemref.idref) {
            Some(item) if path::is_remote(&item.href) => {
                warn!("spine item {:?} is remote, skipping", itemref.idref);
            }
            Some(item) => items.push(item),
            None if strict => return Err(Error::DanglingSpineRef(itemref.idref.clone())),
            None => warn!(
                "spine itemref {:?} has no manifest item, skipping",
                itemref.idref
            ),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opf::{ItemRef, Manifest, Meta, Spine};

    fn item(id: &str, href: &str, media_type: &str, properties: Option<&str>) -> ManifestItem {
        ManifestItem {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
            properties: properties.map(Into::into),
            ..Default::default()
        }
    }

    fn itemref(idref: &str) -> ItemRef {
        ItemRef {
            id: None,
            idref: idref.into(),
            linear: true,
            properties: None,
        }
    }

    fn package(items: Vec<ManifestItem>, spine: &[&str]) -> Package {
        Package {
            manifest: Manifest::new(items),
            spine: Spine {
                itemrefs: spine.iter().map(|id| itemref(id)).collect(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_spine_items_skip_dangling_refs() {
        let package = package(
            vec![
                item("a", "a.xhtml", "application/xhtml+xml", None),
                item("b", "b.xhtml", "application/xhtml+xml", None),
            ],
            &["b", "ghost", "a", "b"],
        );
        let items = spine_items(&package, false).unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_spine_items_strict() {
        let package = package(vec![item("a", "a.xhtml", "application/xhtml+xml", None)], &["a", "ghost"]);
        let err = spine_items(&package, true).unwrap_err();
        assert!(matches!(err, Error::DanglingSpineRef(ref id) if id == "ghost"));
    }

    #[test]
    fn test_spine_items_skip_remote() {
        let package = package(
            vec![item("r", "https://example.com/x.xhtml", "application/xhtml+xml", None)],
            &["r"],
        );
        assert!(spine_items(&package, true).unwrap().is_empty());
    }

    #[test]
    fn test_cover_image_last_wins_then_meta_fallback() {
        use crate::archive::fixture::archive_with;

        let archive = archive_with(&[
            ("OPS/a.png", b"first"),
            ("OPS/b.png", b"second"),
            ("OPS/c.jpg", b"legacy"),
        ]);

        let marked = package(
            vec![
                item("a", "a.png", "image/png", Some("cover-image")),
                item("b", "b.png", "image/png", Some("cover-image")),
            ],
            &[],
        );
        let cover = read_cover_image(&archive, &marked, "OPS").unwrap();
        assert_eq!(cover.as_deref(), Some(&b"second"[..]));

        let mut legacy = package(vec![item("c", "c.jpg", "image/jpeg", None)], &[]);
        legacy.metadata.metas.push(Meta {
            name: Some("cover".into()),
            content: Some("c".into()),
            ..Default::default()
        });
        let cover = read_cover_image(&archive, &legacy, "OPS").unwrap();
        assert_eq!(cover.as_deref(), Some(&b"legacy"[..]));

        legacy.metadata.metas[0].content = Some("nope".into());
        assert_eq!(read_cover_image(&archive, &legacy, "OPS").unwrap(), None);
    }

    #[test]
    fn test_missing_cover_entry_is_fatal() {
        use crate::archive::fixture::archive_with;

        let archive = archive_with(&[("OPS/other.png", b"x")]);
        let package = package(vec![item("a", "gone.png", "image/png", Some("cover-image"))], &[]);
        let err = read_cover_image(&archive, &package, "OPS").unwrap_err();
        assert!(matches!(err, Error::EntryNotFound(ref p) if p == "OPS/gone.png"));
    }
}
