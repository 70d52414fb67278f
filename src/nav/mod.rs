//! EPUB 3 navigation document: table of contents, landmarks, page lists.

mod parser;

pub use parser::parse_navigation;

use log::debug;

use crate::archive::Archive;
use crate::error::Result;

/// Read and parse the navigation document at `nav_path`.
pub fn parse(archive: &Archive, nav_path: &str) -> Result<NavigationDocument> {
    let content = archive.read_text(nav_path)?;
    let document = parse_navigation(&content, nav_path)?;
    debug!(
        "navigation {nav_path}: {} nav blocks",
        document.navigations.len()
    );
    Ok(document)
}

/// A parsed navigation document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NavigationDocument {
    /// Archive path the document was read from.
    pub file_path: String,
    /// Text of the document's `<title>`, or empty.
    pub title: String,
    pub navigations: Vec<Navigation>,
}

impl NavigationDocument {
    /// First navigation block of the given kind.
    pub fn find(&self, kind: NavKind) -> Option<&Navigation> {
        self.navigations.iter().find(|nav| nav.kind() == kind)
    }

    pub fn toc(&self) -> Option<&Navigation> {
        self.find(NavKind::Toc)
    }

    pub fn landmarks(&self) -> Option<&Navigation> {
        self.find(NavKind::Landmarks)
    }
}

/// One `<nav>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Navigation {
    /// Raw `epub:type` attribute value.
    pub epub_type: String,
    pub hidden: bool,
    /// First non-empty heading, checked from `h1` down to `h6`.
    pub header: String,
    pub ol: NavOl,
}

impl Navigation {
    /// Classify the block by the first recognized `epub:type` token.
    pub fn kind(&self) -> NavKind {
        self.epub_type
            .split_ascii_whitespace()
            .map(NavKind::from_token)
            .find(|kind| *kind != NavKind::Other)
            .unwrap_or(NavKind::Other)
    }
}

/// Structural role of a navigation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NavKind {
    Toc,
    Landmarks,
    PageList,
    /// List of audio clips.
    Loa,
    /// List of illustrations.
    Loi,
    /// List of tables.
    Lot,
    /// List of video clips.
    Lov,
    Other,
}

impl NavKind {
    fn from_token(token: &str) -> Self {
        match token {
            "toc" => NavKind::Toc,
            "landmarks" => NavKind::Landmarks,
            "page-list" => NavKind::PageList,
            "loa" => NavKind::Loa,
            "loi" => NavKind::Loi,
            "lot" => NavKind::Lot,
            "lov" => NavKind::Lov,
            _ => NavKind::Other,
        }
    }
}

/// An ordered list of outline entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NavOl {
    /// Set when the list carries a `hidden` attribute. Its items are kept.
    pub hidden: bool,
    pub items: Vec<NavLi>,
}

impl NavOl {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of entries in the whole subtree.
    pub fn count(&self) -> usize {
        self.items
            .iter()
            .map(|li| 1 + li.children.as_ref().map_or(0, NavOl::count))
            .sum()
    }
}

/// One outline entry: a label, sub-entries, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NavLi {
    pub label: Option<NavLabel>,
    pub children: Option<NavOl>,
}

impl NavLi {
    /// Display text of the label, or empty.
    pub fn text(&self) -> &str {
        match &self.label {
            Some(NavLabel::Anchor(a)) => &a.text,
            Some(NavLabel::Span(s)) => &s.text,
            None => "",
        }
    }

    /// Link target, when the label is an anchor.
    pub fn href(&self) -> Option<&str> {
        match &self.label {
            Some(NavLabel::Anchor(a)) => Some(&a.href),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NavLabel {
    Anchor(NavAnchor),
    /// A heading with no link target, typically grouping children.
    Span(NavSpan),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NavAnchor {
    /// Target relative to the navigation document, fragment included.
    pub href: String,
    pub text: String,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub epub_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NavSpan {
    pub text: String,
    pub title: Option<String>,
    pub alt: Option<String>,
}
