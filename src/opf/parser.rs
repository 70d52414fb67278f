use quick_xml::events::{BytesStart, Event};

use super::{
    Collection, Creator, Guide, Identifier, ItemRef, Link, Manifest, ManifestItem, Meta, Metadata,
    Package, Reference, Spine, Title,
};
use crate::error::Result;
use crate::xml::{XmlCursor, attribute, element_name};

/// Parse OPF package document text. `path` is only used in error messages.
pub fn parse_package(content: &str, path: &str) -> Result<Package> {
    let mut cursor = XmlCursor::new(content, path);

    loop {
        match cursor.next_event()? {
            Event::Start(e) if element_name(&e) == b"package" => {
                let mut package = package_attributes(&e);
                parse_package_body(&mut cursor, &mut package)?;
                return Ok(package);
            }
            Event::Empty(e) if element_name(&e) == b"package" => {
                return Ok(package_attributes(&e));
            }
            Event::Start(e) | Event::Empty(e) => {
                let found = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                return Err(cursor.malformed(format!("expected <package>, found <{found}>")));
            }
            Event::Eof => return Err(cursor.malformed("no <package> element")),
            _ => {}
        }
    }
}

fn package_attributes(e: &BytesStart<'_>) -> Package {
    Package {
        version: attribute(e, b"version").unwrap_or_default(),
        unique_identifier: attribute(e, b"unique-identifier"),
        dir: attribute(e, b"dir"),
        language: attribute(e, b"lang"),
        ..Default::default()
    }
}

fn parse_package_body(cursor: &mut XmlCursor<'_>, package: &mut Package) -> Result<()> {
    while let Some((e, empty)) = cursor.next_child()? {
        match element_name(&e).as_slice() {
            b"metadata" if !empty => package.metadata = parse_metadata(cursor)?,
            b"manifest" if !empty => package.manifest = parse_manifest(cursor)?,
            b"spine" => {
                package.spine = Spine {
                    toc: attribute(&e, b"toc"),
                    page_progression_direction: attribute(&e, b"page-progression-direction"),
                    itemrefs: if empty { Vec::new() } else { parse_itemrefs(cursor)? },
                };
            }
            b"guide" if !empty => package.guide = parse_guide(cursor)?,
            b"collection" => package.collections.push(parse_collection(cursor, &e, empty)?),
            _ => cursor.skip_child(empty)?,
        }
    }
    Ok(())
}

fn parse_metadata(cursor: &mut XmlCursor<'_>) -> Result<Metadata> {
    let mut metadata = Metadata::default();

    while let Some((e, empty)) = cursor.next_child()? {
        let name = element_name(&e);
        let list = match name.as_slice() {
            b"identifier" => {
                let id = attribute(&e, b"id");
                let scheme = attribute(&e, b"scheme");
                let value = cursor.child_text(empty)?;
                metadata.identifiers.push(Identifier { id, scheme, value });
                continue;
            }
            b"title" => {
                let id = attribute(&e, b"id");
                let value = cursor.child_text(empty)?;
                metadata.titles.push(Title { id, value });
                continue;
            }
            b"creator" => {
                let creator = Creator {
                    id: attribute(&e, b"id"),
                    role: attribute(&e, b"role"),
                    file_as: attribute(&e, b"file-as"),
                    value: cursor.child_text(empty)?,
                };
                metadata.creators.push(creator);
                continue;
            }
            b"meta" => {
                let meta = Meta {
                    id: attribute(&e, b"id"),
                    name: attribute(&e, b"name"),
                    content: attribute(&e, b"content"),
                    property: attribute(&e, b"property"),
                    refines: attribute(&e, b"refines"),
                    scheme: attribute(&e, b"scheme"),
                    value: cursor.child_text(empty)?,
                };
                metadata.metas.push(meta);
                continue;
            }
            b"language" => &mut metadata.languages,
            b"contributor" => &mut metadata.contributors,
            b"coverage" => &mut metadata.coverages,
            b"date" => &mut metadata.dates,
            b"description" => &mut metadata.descriptions,
            b"format" => &mut metadata.formats,
            b"publisher" => &mut metadata.publishers,
            b"relation" => &mut metadata.relations,
            b"rights" => &mut metadata.rights,
            b"source" => &mut metadata.sources,
            b"subject" => &mut metadata.subjects,
            b"type" => &mut metadata.types,
            _ => {
                cursor.skip_child(empty)?;
                continue;
            }
        };
        list.push(cursor.child_text(empty)?);
    }

    Ok(metadata)
}

fn parse_manifest(cursor: &mut XmlCursor<'_>) -> Result<Manifest> {
    let mut items = Vec::new();

    while let Some((e, empty)) = cursor.next_child()? {
        if element_name(&e) == b"item" {
            items.push(ManifestItem {
                id: attribute(&e, b"id").unwrap_or_default(),
                href: attribute(&e, b"href").unwrap_or_default(),
                media_type: attribute(&e, b"media-type").unwrap_or_default(),
                media_overlay: attribute(&e, b"media-overlay"),
                fallback: attribute(&e, b"fallback"),
                fallback_style: attribute(&e, b"fallback-style"),
                required_namespace: attribute(&e, b"required-namespace"),
                required_modules: attribute(&e, b"required-modules"),
                properties: attribute(&e, b"properties"),
            });
        }
        cursor.skip_child(empty)?;
    }

    Ok(Manifest::new(items))
}

fn parse_itemrefs(cursor: &mut XmlCursor<'_>) -> Result<Vec<ItemRef>> {
    let mut itemrefs = Vec::new();

    while let Some((e, empty)) = cursor.next_child()? {
        if element_name(&e) == b"itemref" {
            itemrefs.push(ItemRef {
                id: attribute(&e, b"id"),
                idref: attribute(&e, b"idref").unwrap_or_default(),
                linear: attribute(&e, b"linear").is_none_or(|v| v.trim() != "no"),
                properties: attribute(&e, b"properties"),
            });
        }
        cursor.skip_child(empty)?;
    }

    Ok(itemrefs)
}

fn parse_guide(cursor: &mut XmlCursor<'_>) -> Result<Guide> {
    let mut guide = Guide::default();

    while let Some((e, empty)) = cursor.next_child()? {
        if element_name(&e) == b"reference" {
            guide.references.push(Reference {
                kind: attribute(&e, b"type").unwrap_or_default(),
                title: attribute(&e, b"title").unwrap_or_default(),
                href: attribute(&e, b"href").unwrap_or_default(),
            });
        }
        cursor.skip_child(empty)?;
    }

    Ok(guide)
}

fn parse_collection(
    cursor: &mut XmlCursor<'_>,
    start: &BytesStart<'_>,
    empty: bool,
) -> Result<Collection> {
    let mut collection = Collection {
        id: attribute(start, b"id"),
        role: attribute(start, b"role").unwrap_or_default(),
        language: attribute(start, b"lang"),
        ..Default::default()
    };
    if empty {
        return Ok(collection);
    }

    while let Some((e, empty)) = cursor.next_child()? {
        match element_name(&e).as_slice() {
            b"metadata" if !empty => collection.metadata = parse_metadata(cursor)?,
            b"collection" => collection
                .collections
                .push(parse_collection(cursor, &e, empty)?),
            b"link" => {
                collection.links.push(Link {
                    id: attribute(&e, b"id"),
                    href: attribute(&e, b"href").unwrap_or_default(),
                    media_type: attribute(&e, b"media-type"),
                    rel: attribute(&e, b"rel"),
                });
                cursor.skip_child(empty)?;
            }
            _ => cursor.skip_child(empty)?,
        }
    }

    Ok(collection)
}
