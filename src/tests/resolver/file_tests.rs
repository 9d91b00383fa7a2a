//! Tests for file path sources over the in-memory filesystem.

use crate::{Codec, Error, FileSystem, InMemoryFs, Metadata, OpenOptions, OpenedFile, Resolver};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

const TEST_DATA: &[u8] = b"I'm some friendly test data\n";

fn setup() -> (InMemoryFs, Resolver) {
    let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
    let fs = InMemoryFs::new().with_modified(modified);
    fs.add_file("/data/test data 1.txt", TEST_DATA);
    fs.add_file("/data/test_utf8.txt", b"a,\xc3\xa9".to_vec());
    fs.add_file("/data/test_8859.txt", b"Some Text\tWith weird  \xd2text\xd3".to_vec());
    fs.add_file("/data/test_empty.txt", b"".to_vec());
    let resolver = Resolver::builder()
        .with_shared_filesystem(Arc::new(fs.clone()))
        .offline()
        .build();
    (fs, resolver)
}

fn in_data() -> OpenOptions {
    OpenOptions::new().with_base_location("/data")
}

#[test]
fn relative_path_resolves_against_base() {
    let (_, resolver) = setup();
    let text = resolver.read("test data 1.txt", None, &in_data()).unwrap();
    assert_eq!(text, "I'm some friendly test data\n");
}

#[test]
fn file_metadata_is_filled_in() {
    let (_, resolver) = setup();
    let mut metadata = Metadata::new();

    resolver
        .read("test data 1.txt", Some(&mut metadata), &in_data())
        .unwrap();

    assert_eq!(metadata.origin.as_deref(), Some("/data/test data 1.txt"));
    assert_eq!(metadata.origin_size, Some(28));
    assert_eq!(metadata.base_location.as_deref(), Some("/data"));
    let timestamp = metadata.origin_timestamp.expect("mtime recorded");
    let parsed = chrono::DateTime::parse_from_rfc3339(&timestamp).unwrap();
    assert_eq!(parsed.timestamp(), 1_600_000_000);
}

#[test]
fn base_location_from_metadata_finds_siblings() {
    let (_, resolver) = setup();
    let mut metadata = Metadata::new();
    resolver
        .read("/data/test data 1.txt", Some(&mut metadata), &OpenOptions::new())
        .unwrap();

    let options = OpenOptions::new().with_base_location(metadata.base_location.clone().unwrap());
    assert_eq!(resolver.read("test_utf8.txt", None, &options).unwrap(), "a,é");
}

#[test]
fn dot_segments_are_normalized() {
    let (_, resolver) = setup();
    let mut metadata = Metadata::new();
    let options = OpenOptions::new().with_base_location("/data/sub/..");
    resolver
        .read("./test_utf8.txt", Some(&mut metadata), &options)
        .unwrap();
    assert_eq!(metadata.origin.as_deref(), Some("/data/test_utf8.txt"));
}

#[test]
fn missing_file_is_not_found() {
    let (_, resolver) = setup();
    let err = resolver
        .read("/a/nonexistent/location/file.txt", None, &OpenOptions::new())
        .unwrap_err();
    match err {
        Error::NotFound(path) => {
            assert_eq!(path, PathBuf::from("/a/nonexistent/location/file.txt"))
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn denied_file_is_permission_denied() {
    let (fs, resolver) = setup();
    fs.deny("/data/secret.txt");
    let err = resolver.read("secret.txt", None, &in_data()).unwrap_err();
    assert!(matches!(err, Error::PermissionDenied(_)));
}

#[test]
fn filled_metadata_is_rejected_before_any_io() {
    let (fs, resolver) = setup();
    let mut metadata = Metadata::new();
    metadata.origin = Some("x".into());

    let err = resolver
        .open("test data 1.txt", Some(&mut metadata), &in_data())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidUsage(_)));
    assert_eq!(fs.accesses(), 0);
}

#[test]
fn cleared_metadata_can_be_reused() {
    let (_, resolver) = setup();
    let mut metadata = Metadata::new();
    resolver
        .read("test data 1.txt", Some(&mut metadata), &in_data())
        .unwrap();
    let first = metadata.clone();

    resolver
        .read("test data 1.txt", Some(metadata.clear()), &in_data())
        .unwrap();
    assert_eq!(metadata, first);
}

#[test]
fn files_default_to_utf8() {
    let (_, resolver) = setup();
    let err = resolver.read("test_8859.txt", None, &in_data()).unwrap_err();
    assert!(matches!(err, Error::Decode { codec: Codec::Utf8, .. }));
}

#[test]
fn read_codec_selects_latin1() {
    let (_, resolver) = setup();
    let options = in_data().with_read_codec(Codec::Latin1);
    let text = resolver.read("test_8859.txt", None, &options).unwrap();
    assert_eq!(text, "Some Text\tWith weird  \u{d2}text\u{d3}");
}

#[test]
fn decode_errors_wait_for_the_read() {
    let (_, resolver) = setup();
    let mut stream = resolver.open("test_8859.txt", None, &in_data()).unwrap();
    assert_eq!(stream.read(Some(10)).unwrap(), "Some Text\t");
    assert!(matches!(stream.read(None), Err(Error::Decode { .. })));
}

#[test]
fn empty_file_reads_empty() {
    let (_, resolver) = setup();
    let mut metadata = Metadata::new();
    let text = resolver
        .read("test_empty.txt", Some(&mut metadata), &in_data())
        .unwrap();
    assert_eq!(text, "");
    assert_eq!(metadata.origin_size, Some(0));
}

#[test]
fn stream_is_labelled_with_the_absolute_path() {
    let (_, resolver) = setup();
    let stream = resolver.open("test_utf8.txt", None, &in_data()).unwrap();
    assert_eq!(stream.label(), "/data/test_utf8.txt");
    assert_eq!(stream.codec(), Some(Codec::Utf8));
}

/// Replaces every file with a longer one right after handing out the reader.
#[derive(Debug)]
struct ReplacedAfterOpen(InMemoryFs);

impl FileSystem for ReplacedAfterOpen {
    fn open(&self, path: &Path) -> io::Result<OpenedFile> {
        let opened = self.0.open(path)?;
        self.0.add_file(path, b"a much longer replacement file".to_vec());
        Ok(opened)
    }
}

#[test]
fn metadata_describes_the_file_that_was_read() {
    let fs = InMemoryFs::new();
    fs.add_file("/data/swap.txt", b"short".to_vec());
    let resolver = Resolver::builder()
        .with_filesystem(ReplacedAfterOpen(fs.clone()))
        .offline()
        .build();
    let mut metadata = Metadata::new();

    let text = resolver
        .read("swap.txt", Some(&mut metadata), &in_data())
        .unwrap();

    assert_eq!(text, "short");
    assert_eq!(metadata.origin_size, Some(5));
}

#[test]
fn metadata_needs_a_single_filesystem_access() {
    let (fs, resolver) = setup();
    let mut metadata = Metadata::new();
    resolver
        .read("test data 1.txt", Some(&mut metadata), &in_data())
        .unwrap();
    assert_eq!(metadata.origin_size, Some(28));
    assert_eq!(fs.accesses(), 1);
}

#[test]
fn resolver_exposes_its_filesystem() {
    let (fs, resolver) = setup();
    let opened = resolver
        .filesystem()
        .open(Path::new("/data/test_utf8.txt"))
        .unwrap();
    assert_eq!(opened.stat.len, 4);
    assert_eq!(fs.accesses(), 1);
}

#[test]
fn utf16_read_codec_follows_the_file_bom() {
    let (fs, resolver) = setup();
    fs.add_file("/data/utf16be.txt", vec![0xFEu8, 0xFF, 0x00, b'o', 0x00, b'k']);
    let options = in_data().with_read_codec(Codec::Utf16);
    assert_eq!(resolver.read("utf16be.txt", None, &options).unwrap(), "ok");
}
