//! OPF package document: metadata, manifest, spine, guide and collections.

mod parser;

pub use parser::parse_package;

use std::collections::HashMap;

use log::{debug, warn};

use crate::archive::Archive;
use crate::content::{ContentType, classify};
use crate::error::Result;

/// Read and parse the package document at `root_path`.
///
/// No cross-validation happens here: spine idrefs and the `nav` property are
/// resolved later, by the book assembler.
pub fn parse(archive: &Archive, root_path: &str) -> Result<Package> {
    let content = archive.read_text(root_path)?;
    let package = parse_package(&content, root_path)?;
    debug!(
        "package {root_path}: {} manifest items, {} spine entries",
        package.manifest.len(),
        package.spine.itemrefs.len()
    );
    Ok(package)
}

/// The parsed root document of a publication.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Package {
    pub version: String,
    /// Id of the `dc:identifier` that uniquely identifies the publication.
    pub unique_identifier: Option<String>,
    /// Base text direction (`ltr`, `rtl`, `auto`).
    pub dir: Option<String>,
    /// `xml:lang` of the package element.
    pub language: Option<String>,
    pub metadata: Metadata,
    pub manifest: Manifest,
    pub spine: Spine,
    pub guide: Guide,
    pub collections: Vec<Collection>,
}

impl Package {
    /// Value of the identifier named by `unique-identifier`, falling back to
    /// the first identifier declared.
    pub fn unique_identifier_value(&self) -> Option<&str> {
        let ids = &self.metadata.identifiers;
        self.unique_identifier
            .as_deref()
            .and_then(|uid| ids.iter().find(|i| i.id.as_deref() == Some(uid)))
            .or_else(|| ids.first())
            .map(|i| i.value.as_str())
    }
}

/// Dublin Core metadata plus `<meta>` extensions.
///
/// Every field keeps document order; the first entry of a sequence is the
/// primary value by convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metadata {
    pub identifiers: Vec<Identifier>,
    pub titles: Vec<Title>,
    pub creators: Vec<Creator>,
    pub languages: Vec<String>,
    pub contributors: Vec<String>,
    pub coverages: Vec<String>,
    pub dates: Vec<String>,
    pub descriptions: Vec<String>,
    pub formats: Vec<String>,
    pub publishers: Vec<String>,
    pub relations: Vec<String>,
    pub rights: Vec<String>,
    pub sources: Vec<String>,
    pub subjects: Vec<String>,
    pub types: Vec<String>,
    pub metas: Vec<Meta>,
}

impl Metadata {
    /// First declared title.
    pub fn title(&self) -> Option<&str> {
        self.titles.first().map(|t| t.value.as_str())
    }

    /// First declared creator.
    pub fn creator(&self) -> Option<&str> {
        self.creators.first().map(|c| c.value.as_str())
    }

    /// Every creator name, in document order.
    pub fn creator_names(&self) -> Vec<String> {
        self.creators.iter().map(|c| c.value.clone()).collect()
    }

    /// First description, or the empty string.
    pub fn description(&self) -> &str {
        self.descriptions.first().map_or("", String::as_str)
    }

    /// `content` of the first EPUB 2 style `<meta name=".." content=".."/>`.
    pub fn meta_content(&self, name: &str) -> Option<&str> {
        self.metas
            .iter()
            .find(|m| m.name.as_deref() == Some(name))
            .and_then(|m| m.content.as_deref())
    }

    /// Value of the first EPUB 3 style `<meta property="..">`, optionally
    /// restricted to the element it refines (`#id`).
    pub fn property(&self, property: &str, refines: Option<&str>) -> Option<&str> {
        self.metas
            .iter()
            .find(|m| m.property.as_deref() == Some(property) && m.refines.as_deref() == refines)
            .map(|m| m.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Identifier {
    pub id: Option<String>,
    /// Identifier scheme from the EPUB 2 `opf:scheme` attribute.
    pub scheme: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Title {
    pub id: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Creator {
    pub id: Option<String>,
    /// MARC relator code from the EPUB 2 `opf:role` attribute (e.g. `aut`).
    pub role: Option<String>,
    /// Sort form from the EPUB 2 `opf:file-as` attribute.
    pub file_as: Option<String>,
    pub value: String,
}

/// A `<meta>` element in either its EPUB 2 (`name`/`content`) or EPUB 3
/// (`property`/`refines`/text) form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Meta {
    pub id: Option<String>,
    pub name: Option<String>,
    pub content: Option<String>,
    pub property: Option<String>,
    pub refines: Option<String>,
    pub scheme: Option<String>,
    pub value: String,
}

/// One declared publication resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ManifestItem {
    pub id: String,
    /// Path relative to the content directory.
    pub href: String,
    pub media_type: String,
    pub media_overlay: Option<String>,
    pub fallback: Option<String>,
    pub fallback_style: Option<String>,
    pub required_namespace: Option<String>,
    pub required_modules: Option<String>,
    /// Space-delimited property tokens (`nav`, `cover-image`, `scripted`, ...).
    pub properties: Option<String>,
}

impl ManifestItem {
    /// Property tokens of this item.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.properties
            .as_deref()
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    /// True when `token` is one of the item's properties. Membership is by
    /// whole token: `nav` does not match `navigation`.
    pub fn has_property(&self, token: &str) -> bool {
        self.properties().any(|p| p == token)
    }

    /// Category of the declared media type.
    pub fn content_type(&self) -> ContentType {
        classify(&self.media_type)
    }
}

/// Manifest items in document order, indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Manifest {
    items: Vec<ManifestItem>,
    #[cfg_attr(feature = "serde", serde(skip))]
    by_id: HashMap<String, usize>,
}

impl Manifest {
    /// Build a manifest, indexing items by id. Ids are meant to be unique;
    /// when one repeats, the first declaration owns the id.
    pub fn new(items: Vec<ManifestItem>) -> Self {
        let mut by_id = HashMap::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if by_id.contains_key(&item.id) {
                warn!("duplicate manifest id {:?}, keeping the first", item.id);
                continue;
            }
            by_id.insert(item.id.clone(), i);
        }
        Self { items, by_id }
    }

    pub fn items(&self) -> &[ManifestItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item declared with `id`.
    pub fn get(&self, id: &str) -> Option<&ManifestItem> {
        self.by_id.get(id).map(|&i| &self.items[i])
    }

    /// First item carrying the `nav` property.
    pub fn navigation_item(&self) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.has_property("nav"))
    }

    /// Items carrying `property`, in manifest order.
    pub fn with_property<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a ManifestItem> {
        self.items.iter().filter(move |item| item.has_property(property))
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestItem;
    type IntoIter = std::slice::Iter<'a, ManifestItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Default reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Spine {
    /// Manifest id of the legacy NCX table of contents.
    pub toc: Option<String>,
    pub page_progression_direction: Option<String>,
    pub itemrefs: Vec<ItemRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ItemRef {
    pub id: Option<String>,
    pub idref: String,
    /// Whether the item belongs to the primary reading order.
    pub linear: bool,
    pub properties: Option<String>,
}

/// Legacy EPUB 2 landmarks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Guide {
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reference {
    pub kind: String,
    pub title: String,
    pub href: String,
}

/// A recursive grouping of resources. Preserved, not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Collection {
    pub id: Option<String>,
    pub role: String,
    pub language: Option<String>,
    pub metadata: Metadata,
    pub collections: Vec<Collection>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Link {
    pub id: Option<String>,
    pub href: String,
    pub media_type: Option<String>,
    pub rel: Option<String>,
}
