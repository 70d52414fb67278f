use quick_xml::events::{BytesStart, Event};

use super::{NavAnchor, NavLabel, NavLi, NavOl, NavSpan, Navigation, NavigationDocument};
use crate::error::Result;
use crate::xml::{XmlCursor, attribute, element_name, has_attribute};

/// Parse navigation document text.
///
/// Only `<nav>` blocks and the first `<title>` outside them are read; every
/// other element in the document is passed over.
pub fn parse_navigation(content: &str, file_path: &str) -> Result<NavigationDocument> {
    let mut cursor = XmlCursor::new(content, file_path);
    let mut title: Option<String> = None;
    let mut navigations = Vec::new();

    loop {
        match cursor.next_event()? {
            Event::Start(e) => match element_name(&e).as_slice() {
                b"nav" => navigations.push(parse_nav(&mut cursor, &e, false)?),
                b"title" => {
                    let text = cursor.read_text()?;
                    title.get_or_insert(text);
                }
                _ => {}
            },
            Event::Empty(e) if element_name(&e) == b"nav" => {
                navigations.push(parse_nav(&mut cursor, &e, true)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(NavigationDocument {
        file_path: file_path.to_string(),
        title: title.unwrap_or_default(),
        navigations,
    })
}

fn parse_nav(cursor: &mut XmlCursor<'_>, start: &BytesStart<'_>, empty: bool) -> Result<Navigation> {
    let mut nav = Navigation {
        epub_type: attribute(start, b"type").unwrap_or_default(),
        hidden: has_attribute(start, b"hidden"),
        ..Default::default()
    };
    if empty {
        return Ok(nav);
    }

    let mut headings: [Option<String>; 6] = Default::default();
    let mut ol: Option<NavOl> = None;

    while let Some((e, empty)) = cursor.next_child()? {
        let name = element_name(&e);
        match heading_level(&name) {
            Some(level) => {
                let text = cursor.child_text(empty)?;
                let slot = &mut headings[level];
                if slot.is_none() && !text.is_empty() {
                    *slot = Some(text);
                }
            }
            None if name == b"ol" && ol.is_none() => ol = Some(parse_ol(cursor, &e, empty)?),
            None => cursor.skip_child(empty)?,
        }
    }

    nav.header = headings.into_iter().flatten().next().unwrap_or_default();
    nav.ol = ol.unwrap_or_default();
    Ok(nav)
}

/// Zero-based level of `h1`..`h6`.
fn heading_level(name: &[u8]) -> Option<usize> {
    match name {
        [b'h', d @ b'1'..=b'6'] => Some(usize::from(d - b'1')),
        _ => None,
    }
}

fn parse_ol(cursor: &mut XmlCursor<'_>, start: &BytesStart<'_>, empty: bool) -> Result<NavOl> {
    let mut ol = NavOl {
        hidden: has_attribute(start, b"hidden"),
        items: Vec::new(),
    };
    if empty {
        return Ok(ol);
    }

    while let Some((e, empty)) = cursor.next_child()? {
        if element_name(&e) == b"li" {
            ol.items.push(parse_li(cursor, empty)?);
        } else {
            cursor.skip_child(empty)?;
        }
    }
    Ok(ol)
}

fn parse_li(cursor: &mut XmlCursor<'_>, empty: bool) -> Result<NavLi> {
    let mut li = NavLi::default();
    if empty {
        return Ok(li);
    }

    while let Some((e, empty)) = cursor.next_child()? {
        match element_name(&e).as_slice() {
            b"a" if li.label.is_none() => {
                li.label = Some(NavLabel::Anchor(NavAnchor {
                    href: attribute(&e, b"href").unwrap_or_default(),
                    title: attribute(&e, b"title"),
                    alt: attribute(&e, b"alt"),
                    epub_type: attribute(&e, b"type"),
                    text: cursor.child_text(empty)?,
                }));
            }
            b"span" if li.label.is_none() => {
                li.label = Some(NavLabel::Span(NavSpan {
                    title: attribute(&e, b"title"),
                    alt: attribute(&e, b"alt"),
                    text: cursor.child_text(empty)?,
                }));
            }
            b"ol" if li.children.is_none() => li.children = Some(parse_ol(cursor, &e, empty)?),
            _ => cursor.skip_child(empty)?,
        }
    }
    Ok(li)
}
