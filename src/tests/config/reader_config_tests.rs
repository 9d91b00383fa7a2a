//! Tests for ReaderConfig and OpenOptions.

use crate::{Codec, Error, OpenOptions, ReaderConfig};

#[test]
fn reader_config_deserializes_with_defaults() {
    let config: ReaderConfig = serde_json::from_str(r#"{ "read_codec": "latin-1" }"#).unwrap();
    assert_eq!(config.read_codec.as_deref(), Some("latin-1"));
    assert_eq!(config.base_location, None);
    assert_eq!(config.display_offset, None);
}

#[test]
fn reader_config_builds_options() {
    let options = ReaderConfig::new()
        .with_base_location("https://example.org/data")
        .with_read_codec("UTF-16LE")
        .into_options()
        .unwrap();
    assert_eq!(options.base_location(), Some("https://example.org/data"));
    assert_eq!(options.read_codec, Some(Codec::Utf16Le));
    assert_eq!(options.accept_header, None);
}

#[test]
fn reader_config_accepts_byte_order_sniffing_utf16() {
    let options = ReaderConfig::new().with_read_codec("utf-16").into_options().unwrap();
    assert_eq!(options.read_codec, Some(Codec::Utf16));
}

#[test]
fn unknown_codec_name_is_rejected() {
    let config = ReaderConfig::new().with_read_codec("morse");
    let err = OpenOptions::try_from(config).unwrap_err();
    match err {
        Error::InvalidUsage(msg) => assert!(msg.contains("morse")),
        other => panic!("expected InvalidUsage, got {other:?}"),
    }
}

#[test]
fn full_config_from_json() {
    let json = r#"{
        "base_location": "/srv/texts",
        "accept_header": "text/plain",
        "read_codec": "utf-8",
        "display_offset": "/srv"
    }"#;
    let config: ReaderConfig = serde_json::from_str(json).unwrap();
    let options = config.clone().into_options().unwrap();

    assert_eq!(options.base_location(), Some("/srv/texts"));
    assert_eq!(options.accept_header.as_deref(), Some("text/plain"));
    assert_eq!(options.read_codec, Some(Codec::Utf8));
    assert_eq!(config.display_offset.as_deref(), Some(std::path::Path::new("/srv")));
}

#[test]
fn default_predicate_applies_without_override() {
    let options = OpenOptions::new();
    assert!(options.is_actual_data("two  spaces"));
    assert!(!options.is_actual_data("file.txt"));

    let options = options.with_is_actual_data(|s| s.starts_with('#'));
    assert!(options.is_actual_data("# heading"));
    assert!(!options.is_actual_data("two  spaces"));
}

#[test]
fn options_debug_hides_the_predicate() {
    let options = OpenOptions::new().with_is_actual_data(|_| false);
    let debug = format!("{options:?}");
    assert!(debug.contains("custom_predicate: true"));
}
