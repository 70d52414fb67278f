//! Archive path arithmetic.
//!
//! Paths inside an archive are always `/`-separated and relative to the
//! archive root. Joining is purely lexical: `..` segments fold against their
//! parent. A `..` that would climb above the root is kept, so the joined path
//! names no entry and the lookup fails instead of landing on a root entry.

use crate::archive::Archive;

/// Directory component of the package document path, used as the base for
/// every manifest href. A root file at the archive root yields `""`.
pub fn content_dir(root_file_path: &str) -> String {
    let cleaned = clean(root_file_path);
    match cleaned.rfind('/') {
        Some(i) => cleaned[..i].to_string(),
        None => String::new(),
    }
}

/// Join `href` onto `base` and normalize the result.
pub fn join(base: &str, href: &str) -> String {
    let href = strip_fragment(href);
    if base.is_empty() {
        clean(href)
    } else {
        clean(&format!("{base}/{href}"))
    }
}

/// Resolve a manifest href against the content directory to an archive
/// entry name.
///
/// Hrefs are IRIs, so a percent-encoded href (`chapter%201.xhtml`) names the
/// entry stored as `chapter 1.xhtml`. The literal join is preferred; the
/// decoded form is used only when it exists and the literal one does not.
pub fn resolve(archive: &Archive, base: &str, href: &str) -> String {
    let joined = join(base, href);
    if archive.contains(&joined) {
        return joined;
    }

    if let Ok(decoded) = percent_encoding::percent_decode_str(&joined).decode_utf8()
        && decoded != joined
    {
        let decoded = clean(&decoded);
        if archive.contains(&decoded) {
            return decoded;
        }
    }
    joined
}

/// True when an href is an absolute URL rather than a path into the archive.
pub fn is_remote(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && scheme.len() > 1
}

/// Lexically normalize a `/`-separated path: drop empty and `.` segments and
/// fold `..` against its parent. Leading `..` segments survive.
pub fn clean(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    parts.join("/")
}

fn strip_fragment(href: &str) -> &str {
    href.split_once('#').map_or(href, |(path, _)| path)
}
