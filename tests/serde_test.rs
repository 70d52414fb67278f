//! Serialization of the decoded model (requires the `serde` feature).

#![cfg(feature = "serde")]

mod common;

use bindery::{ReadOptions, read_book_from_bytes};
use common::EpubBuilder;

#[test]
fn test_book_serializes_to_json() {
    let book = read_book_from_bytes(EpubBuilder::sample().build(), &ReadOptions::default()).unwrap();
    let json = serde_json::to_value(&book).unwrap();

    assert_eq!(json["title"], "The Sample Book");
    assert_eq!(json["authors"][1], "Second Author");
    assert_eq!(json["navigation"][0]["epub_type"], "toc");
    assert_eq!(json["content"]["css"][0]["file"]["content_type"], "Css");
    assert_eq!(json["content"]["css"][0]["file"]["location"], "Local");
    assert_eq!(
        json["package"]["manifest"]["items"][0]["properties"],
        "nav"
    );
    assert!(json["package"]["manifest"].get("by_id").is_none());
}
