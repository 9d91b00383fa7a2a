//! Tests for error mapping and messages.

use crate::{Codec, Error};
use std::io;
use std::path::PathBuf;

#[test]
fn filesystem_errors_map_by_kind() {
    let err = Error::from_fs(io::Error::from(io::ErrorKind::NotFound), "/x/y.txt");
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "No such file or directory: /x/y.txt");

    let err = Error::from_fs(io::Error::from(io::ErrorKind::PermissionDenied), "/root/secret");
    assert!(matches!(err, Error::PermissionDenied(ref p) if p == &PathBuf::from("/root/secret")));

    let err = Error::from_fs(io::Error::other("disk on fire"), "/var/log");
    match err {
        Error::Io { target, source } => {
            assert_eq!(target, "/var/log");
            assert_eq!(source.to_string(), "disk on fire");
        }
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn http_error_messages() {
    let err = Error::Http {
        status: Some(404),
        url: "http://example.org/test.txt".into(),
        reason: None,
    };
    assert_eq!(err.to_string(), "HTTP Error 404: http://example.org/test.txt");
    assert_eq!(err.status(), Some(404));

    let err = Error::Http {
        status: None,
        url: "http://unreachable.invalid/".into(),
        reason: Some("dns failure".into()),
    };
    assert_eq!(
        err.to_string(),
        "HTTP request failed: http://unreachable.invalid/: dns failure"
    );
    assert_eq!(err.status(), None);
}

#[test]
fn decode_error_names_codec_and_target() {
    let err = Error::Decode {
        codec: Codec::Utf16Be,
        target: "notes.txt".into(),
        reason: "unpaired surrogate 0xdc00 at byte 2".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("notes.txt"));
    assert!(msg.contains("utf-16be"));
}

#[test]
fn converts_into_io_error_with_matching_kind() {
    let io_err: io::Error = Error::NotFound(PathBuf::from("/nope")).into();
    assert_eq!(io_err.kind(), io::ErrorKind::NotFound);

    let io_err: io::Error = Error::Decode {
        codec: Codec::Utf8,
        target: "t".into(),
        reason: "bad".into(),
    }
    .into();
    assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);

    let io_err: io::Error = Error::InvalidUsage("closed".into()).into();
    assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
}

#[cfg(feature = "miette")]
#[test]
fn miette_diagnostic_carries_help() {
    use crate::SourceDiagnostic;
    use miette::Diagnostic;

    let diag = SourceDiagnostic::from(Error::InvalidUsage("reused metadata".into()));
    assert!(diag.help().is_some());
    assert!(diag.to_string().contains("reused metadata"));
}
