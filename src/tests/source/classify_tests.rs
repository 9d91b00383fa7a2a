//! Tests for source classification.

use crate::{Handle, Kind, Source, classify, is_actual_data};
use std::io::Cursor;

fn kind_of<'a>(source: impl Into<Source<'a>>, base: Option<&str>) -> Kind {
    classify(&source.into(), base, &is_actual_data)
}

#[test]
fn data_like_strings_are_literal_text() {
    assert_eq!(kind_of("I'm just some plain text", None), Kind::LiteralText);
    assert_eq!(kind_of("line one\nline two", None), Kind::LiteralText);
    assert_eq!(kind_of("a\tb", None), Kind::LiteralText);
    assert_eq!(kind_of("two  spaces", None), Kind::LiteralText);
    assert_eq!(kind_of("say \"hi\"", None), Kind::LiteralText);
    assert_eq!(kind_of("", None), Kind::LiteralText);
    assert_eq!(kind_of("   ", None), Kind::LiteralText);
}

#[test]
fn plain_names_are_file_paths() {
    assert_eq!(kind_of("test data 1.txt", None), Kind::FilePath);
    assert_eq!(kind_of("/a/nonexistent/location/file.txt", None), Kind::FilePath);
    assert_eq!(kind_of("relative/file.txt", Some("/srv/data")), Kind::FilePath);
}

#[test]
fn urls_and_names_under_url_bases_are_urls() {
    assert_eq!(kind_of("http://example.org/test.txt", None), Kind::Url);
    assert_eq!(kind_of("file.txt", Some("https://example.org/data")), Kind::Url);
}

#[test]
fn data_check_wins_over_url_marker() {
    assert_eq!(
        kind_of("see http://example.org/x\nfor details", None),
        Kind::LiteralText
    );
}

#[test]
fn non_string_sources_classify_by_variant() {
    assert_eq!(kind_of(b"raw".as_slice(), None), Kind::BytesLike);
    assert_eq!(kind_of(vec![1u8, 2, 3], Some("http://x/")), Kind::BytesLike);
    assert_eq!(kind_of(Source::display(42), None), Kind::Stringable);
    assert_eq!(
        kind_of(Handle::new(Cursor::new(Vec::<u8>::new())), None),
        Kind::OpenHandle
    );
}

#[test]
fn custom_predicate_replaces_default() {
    let everything_is_data = |_: &str| true;
    let source = Source::from("plain.txt");
    assert_eq!(classify(&source, None, &everything_is_data), Kind::LiteralText);

    let nothing_is_data = |_: &str| false;
    let source = Source::from("a\nb");
    assert_eq!(classify(&source, None, &nothing_is_data), Kind::FilePath);
}

#[test]
fn kind_display_names() {
    assert_eq!(Kind::FilePath.to_string(), "file path");
    assert_eq!(Kind::OpenHandle.to_string(), "open handle");
}
