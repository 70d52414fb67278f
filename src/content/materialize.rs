use log::{debug, trace};

use super::{
    Content, ContentFile, ContentFileType, ContentLocation, ContentType, LocalByteContentFile,
    LocalContentFile, LocalTextContentFile,
};
use crate::archive::Archive;
use crate::error::Result;
use crate::opf::{Manifest, ManifestItem};
use crate::path;
use crate::pool::LoadPool;
use crate::text;

/// A manifest item after its payload has been fetched.
enum Loaded {
    Remote(ContentFile),
    Text(String, LocalTextContentFile),
    Binary(String, LocalByteContentFile),
}

/// Load every manifest item and sort it into buckets.
///
/// Loads are independent and may run on `pool`; bucketing always happens
/// afterwards in manifest order. A missing or unreadable local entry fails
/// the whole call.
pub fn materialize(
    archive: &Archive,
    manifest: &Manifest,
    content_dir: &str,
    pool: &LoadPool,
) -> Result<Content> {
    let loaded = pool.load_all(manifest.items(), |item| load(archive, item, content_dir))?;

    let mut content = Content::default();
    for (item, entry) in manifest.iter().zip(loaded) {
        match entry {
            Loaded::Remote(file) => content.remote.push(file),
            Loaded::Text(file_path, text) => {
                content.all_files.push(LocalContentFile {
                    file_path,
                    file: text.file.clone(),
                });
                match text.file.content_type {
                    ContentType::Xhtml => {
                        if content.navigation_html.is_none() && item.has_property("nav") {
                            content.navigation_html = Some(text.clone());
                        }
                        content.html.push(text);
                    }
                    ContentType::Css => content.css.push(text),
                    _ => {}
                }
            }
            Loaded::Binary(file_path, bytes) => {
                content.all_files.push(LocalContentFile {
                    file_path,
                    file: bytes.file.clone(),
                });
                let content_type = bytes.file.content_type;
                if content_type.is_image() {
                    if item.has_property("cover-image") {
                        content.cover = Some(bytes.clone());
                    }
                    content.images.push(bytes);
                } else if content_type.is_font() {
                    content.fonts.push(bytes);
                } else if content_type.is_audio() {
                    content.audios.push(bytes);
                }
            }
        }
    }

    debug!(
        "materialized {} local files ({} html, {} css, {} images, {} fonts, {} audio), {} remote",
        content.all_files.len(),
        content.html.len(),
        content.css.len(),
        content.images.len(),
        content.fonts.len(),
        content.audios.len(),
        content.remote.len()
    );
    Ok(content)
}

fn load(archive: &Archive, item: &ManifestItem, content_dir: &str) -> Result<Loaded> {
    if path::is_remote(&item.href) {
        trace!("remote manifest item {} ({})", item.id, item.href);
        return Ok(Loaded::Remote(ContentFile::new(
            &item.href,
            &item.media_type,
            ContentLocation::Remote,
        )));
    }

    let file = ContentFile::new(&item.href, &item.media_type, ContentLocation::Local);
    let file_path = path::resolve(archive, content_dir, &item.href);
    let bytes = archive.read(&file_path)?;

    Ok(match file.file_type {
        ContentFileType::Text => {
            let content = text::decode(&bytes).into_owned();
            Loaded::Text(file_path, LocalTextContentFile { file, content })
        }
        ContentFileType::Binary => {
            Loaded::Binary(file_path, LocalByteContentFile { file, content: bytes })
        }
    })
}

/// Load one item as text, whatever its category. Used for the reading order,
/// where every spine document is text by definition.
pub(crate) fn load_text(
    archive: &Archive,
    item: &ManifestItem,
    content_dir: &str,
) -> Result<LocalTextContentFile> {
    let mut file = ContentFile::new(&item.href, &item.media_type, ContentLocation::Local);
    file.file_type = ContentFileType::Text;
    let file_path = path::resolve(archive, content_dir, &item.href);
    let content = archive.read_text(&file_path)?;
    Ok(LocalTextContentFile { file, content })
}
