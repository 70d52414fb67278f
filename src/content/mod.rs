//! Content classification and payload records.
//!
//! Every manifest item is typed by its declared MIME type, never by its
//! filename. [`materialize`] then loads each local item as text or bytes and
//! sorts it into the buckets of a [`Content`].

mod materialize;

pub use materialize::materialize;
pub(crate) use materialize::load_text;

/// Category of a publication resource, derived from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ContentType {
    ImageGif,
    ImageJpeg,
    ImagePng,
    ImageSvg,
    ImageWebp,
    AudioMp3,
    AudioMp4,
    AudioOgg,
    Css,
    FontTruetype,
    FontSfnt,
    FontOpentype,
    FontWoff,
    FontWoff2,
    Xhtml,
    Xml,
    Script,
    Dtb,
    DtbNcx,
    Smil,
    /// Not produced by [`classify`]; `text/x-oeb1-document` maps to
    /// [`ContentType::Oeb1Css`].
    Oeb1Document,
    Oeb1Css,
    Other,
}

impl ContentType {
    /// True for categories whose payload is loaded as a string.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            ContentType::Xhtml
                | ContentType::Css
                | ContentType::Oeb1Document
                | ContentType::Oeb1Css
                | ContentType::Xml
                | ContentType::Dtb
                | ContentType::DtbNcx
                | ContentType::Smil
                | ContentType::Script
        )
    }

    pub fn is_image(self) -> bool {
        matches!(
            self,
            ContentType::ImageGif
                | ContentType::ImageJpeg
                | ContentType::ImagePng
                | ContentType::ImageSvg
                | ContentType::ImageWebp
        )
    }

    pub fn is_font(self) -> bool {
        matches!(
            self,
            ContentType::FontTruetype
                | ContentType::FontSfnt
                | ContentType::FontOpentype
                | ContentType::FontWoff
                | ContentType::FontWoff2
        )
    }

    pub fn is_audio(self) -> bool {
        matches!(
            self,
            ContentType::AudioMp3 | ContentType::AudioMp4 | ContentType::AudioOgg
        )
    }

    /// How an item of this category is loaded.
    pub fn file_type(self) -> ContentFileType {
        if self.is_text() {
            ContentFileType::Text
        } else {
            ContentFileType::Binary
        }
    }
}

/// Map a declared MIME type to its [`ContentType`].
///
/// Matching ignores ASCII case and surrounding whitespace. Unrecognized
/// types classify as [`ContentType::Other`].
pub fn classify(mime_type: &str) -> ContentType {
    match mime_type.trim().to_ascii_lowercase().as_str() {
        "application/xhtml+xml" => ContentType::Xhtml,
        "application/x-dtbook+xml" => ContentType::Dtb,
        "application/x-dtbncx+xml" => ContentType::DtbNcx,
        // Legacy OEB documents share the OEB stylesheet category.
        "text/x-oeb1-document" => ContentType::Oeb1Css,
        "application/xml" => ContentType::Xml,
        "text/css" => ContentType::Css,
        "text/x-oeb1-css" => ContentType::Oeb1Css,
        "application/javascript" | "application/ecmascript" | "text/javascript" => {
            ContentType::Script
        }
        "image/gif" => ContentType::ImageGif,
        "image/jpeg" => ContentType::ImageJpeg,
        "image/png" => ContentType::ImagePng,
        "image/svg+xml" => ContentType::ImageSvg,
        "image/webp" => ContentType::ImageWebp,
        "font/truetype" | "font/ttf" | "application/x-font-truetype" => ContentType::FontTruetype,
        "font/opentype" | "font/otf" | "application/vnd.ms-opentype" => ContentType::FontOpentype,
        "font/sfnt" | "application/font-sfnt" => ContentType::FontSfnt,
        "font/woff" | "application/font-woff" => ContentType::FontWoff,
        "font/woff2" => ContentType::FontWoff2,
        "application/smil+xml" => ContentType::Smil,
        "audio/mpeg" => ContentType::AudioMp3,
        "audio/mp4" => ContentType::AudioMp4,
        "audio/ogg" | "audio/ogg; codecs=opus" => ContentType::AudioOgg,
        _ => ContentType::Other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ContentLocation {
    /// Stored inside the archive.
    Local,
    /// Referenced by absolute URL; never loaded.
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ContentFileType {
    Text,
    Binary,
}

/// Classification record for one manifest item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContentFile {
    /// The manifest href, unresolved.
    pub key: String,
    pub content_type: ContentType,
    /// The declared media type, as written.
    pub mime_type: String,
    pub location: ContentLocation,
    pub file_type: ContentFileType,
}

impl ContentFile {
    pub fn new(href: &str, mime_type: &str, location: ContentLocation) -> Self {
        let content_type = classify(mime_type);
        Self {
            key: href.to_string(),
            content_type,
            mime_type: mime_type.to_string(),
            location,
            file_type: content_type.file_type(),
        }
    }
}

/// A local item loaded as text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LocalTextContentFile {
    pub file: ContentFile,
    pub content: String,
}

/// A local item loaded as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LocalByteContentFile {
    pub file: ContentFile,
    pub content: Vec<u8>,
}

/// A local item together with the archive path it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LocalContentFile {
    pub file_path: String,
    pub file: ContentFile,
}

/// Every manifest resource, loaded and bucketed.
///
/// Buckets keep manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Content {
    /// Last image carrying the `cover-image` property.
    pub cover: Option<LocalByteContentFile>,
    /// First XHTML item carrying the `nav` property.
    pub navigation_html: Option<LocalTextContentFile>,
    pub html: Vec<LocalTextContentFile>,
    pub css: Vec<LocalTextContentFile>,
    pub images: Vec<LocalByteContentFile>,
    pub fonts: Vec<LocalByteContentFile>,
    pub audios: Vec<LocalByteContentFile>,
    /// Every local item, whatever its category.
    pub all_files: Vec<LocalContentFile>,
    /// Items referenced by absolute URL.
    pub remote: Vec<ContentFile>,
}
