//! Resolution of classified sources into text streams.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use path_clean::PathClean;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::Url;

use crate::builder::ResolverBuilder;
use crate::codec::Codec;
use crate::config::OpenOptions;
use crate::error::{Error, Result};
use crate::io::{FetchError, FileSystem, OpenedFile, Response, Transport};
use crate::metadata::{Metadata, format_time, now};
use crate::source::{Classified, Handle, HandleMode, Kind, Source};
use crate::stream::TextStream;

/// Characters escaped in URLs before fetching. `/`, `:`, `%` and the query
/// and fragment delimiters pass through.
const URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const TEXT_LABEL: &str = "<text>";
const BYTES_LABEL: &str = "<bytes>";
const HANDLE_LABEL: &str = "<handle>";

/// Turns sources into text streams.
///
/// A resolver holds no per-call state; the filesystem and transport it was
/// built with are shared by every call.
#[derive(Debug, Clone)]
pub struct Resolver {
    filesystem: Arc<dyn FileSystem>,
    transport: Arc<dyn Transport>,
}

/// Outcome of resolving a source: text that is already complete, or a stream.
enum Opened<'a> {
    Text(String),
    Stream(TextStream<'a>),
}

impl Resolver {
    /// Create a resolver over the given collaborators.
    pub fn new(filesystem: Arc<dyn FileSystem>, transport: Arc<dyn Transport>) -> Self {
        Self {
            filesystem,
            transport,
        }
    }

    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// Get the filesystem.
    pub fn filesystem(&self) -> &dyn FileSystem {
        self.filesystem.as_ref()
    }

    /// Get the transport.
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Classify `source` under `options`.
    pub fn classify(&self, source: &Source<'_>, options: &OpenOptions) -> Kind {
        source.kind(options.base_location(), &|s| options.is_actual_data(s))
    }

    /// Open `source` as a text stream.
    ///
    /// When `metadata` is given it is filled in with what was learned about
    /// the source. For file, URL and handle sources it must not already carry
    /// `origin`, `origin_timestamp` or `origin_size`.
    ///
    /// Decoding is lazy: `Error::Decode` for file, URL and handle sources
    /// surfaces from the stream's reads, not from here.
    pub fn open<'a>(
        &self,
        source: impl Into<Source<'a>>,
        metadata: Option<&mut Metadata>,
        options: &OpenOptions,
    ) -> Result<TextStream<'a>> {
        match self.resolve(source.into(), metadata, options)? {
            Opened::Text(text) => Ok(TextStream::from_text(TEXT_LABEL, text)),
            Opened::Stream(stream) => Ok(stream),
        }
    }

    /// Read all text of `source`.
    ///
    /// Literal text, bytes and stringable values are returned without
    /// building a stream. Otherwise the stream from [`open`](Self::open) is
    /// drained and closed.
    pub fn read<'a>(
        &self,
        source: impl Into<Source<'a>>,
        metadata: Option<&mut Metadata>,
        options: &OpenOptions,
    ) -> Result<String> {
        match self.resolve(source.into(), metadata, options)? {
            Opened::Text(text) => Ok(text),
            Opened::Stream(mut stream) => {
                let text = stream.read_to_string();
                stream.close();
                text
            }
        }
    }

    fn resolve<'a>(
        &self,
        source: Source<'a>,
        metadata: Option<&mut Metadata>,
        options: &OpenOptions,
    ) -> Result<Opened<'a>> {
        let predicate = |s: &str| options.is_actual_data(s);
        match source.into_classified(options.base_location(), &predicate) {
            Classified::LiteralText(text) => {
                Ok(Opened::Text(materialized(text.into_owned(), metadata)))
            }
            Classified::Stringable(value) => {
                Ok(Opened::Text(materialized(value.to_string(), metadata)))
            }
            Classified::BytesLike(bytes) => {
                let text = decode_bytes(bytes)?;
                Ok(Opened::Text(materialized(text, metadata)))
            }
            Classified::FilePath(path) => {
                self.open_file(&path, metadata, options).map(Opened::Stream)
            }
            Classified::Url(url) => self.open_url(&url, metadata, options).map(Opened::Stream),
            Classified::OpenHandle(handle) => {
                self.open_handle(handle, metadata, options).map(Opened::Stream)
            }
        }
    }

    fn open_file<'a>(
        &self,
        source: &str,
        metadata: Option<&mut Metadata>,
        options: &OpenOptions,
    ) -> Result<TextStream<'a>> {
        ensure_outputs_unset(metadata.as_deref(), Kind::FilePath)?;

        let path = absolute_path(source, options.base_location())?;
        debug!("opening file {}", path.display());
        let OpenedFile { reader, stat } = self
            .filesystem
            .open(&path)
            .map_err(|e| Error::from_fs(e, &path))?;

        if let Some(meta) = metadata {
            meta.origin = Some(path.to_string_lossy().into_owned());
            meta.origin_timestamp = stat.modified.map(format_time);
            meta.origin_size = Some(stat.len);
            meta.base_location = parent_dir(&path);
        }

        let codec = options.read_codec.unwrap_or(Codec::Utf8);
        Ok(TextStream::from_boxed(
            path.to_string_lossy().into_owned(),
            reader,
            Some(codec),
        ))
    }

    fn open_url<'a>(
        &self,
        source: &str,
        metadata: Option<&mut Metadata>,
        options: &OpenOptions,
    ) -> Result<TextStream<'a>> {
        ensure_outputs_unset(metadata.as_deref(), Kind::Url)?;

        let url = resolve_url(source, options.base_location())?;
        let mut headers = Vec::new();
        if let Some(accept) = options.accept_header.as_deref() {
            headers.push(("Accept", accept));
        }

        debug!("fetching {url}");
        // The transport's error names the final URL at best; report the one we asked for
        let response = self.transport.fetch(&url, &headers).map_err(|e| match e {
            FetchError::Status { status, .. } => Error::Http {
                status: Some(status),
                url: url.clone(),
                reason: None,
            },
            FetchError::Transport { message, .. } => Error::Http {
                status: None,
                url: url.clone(),
                reason: Some(message),
            },
        })?;
        if !response.is_success() {
            return Err(Error::Http {
                status: Some(response.status),
                url,
                reason: None,
            });
        }

        if let Some(meta) = metadata {
            meta.origin = Some(response.url.clone());
            meta.origin_timestamp = response
                .header("Last-Modified")
                .or_else(|| response.header("Date"))
                .map(str::to_owned);
            meta.origin_size = response
                .header("Content-Length")
                .and_then(|v| v.trim().parse().ok());
            meta.base_location = url_base(&response.url);
        }

        let Response {
            url: final_url,
            body,
            ..
        } = response;
        Ok(TextStream::from_boxed(final_url, body, options.read_codec))
    }

    fn open_handle<'a>(
        &self,
        handle: Handle<'a>,
        metadata: Option<&mut Metadata>,
        options: &OpenOptions,
    ) -> Result<TextStream<'a>> {
        ensure_outputs_unset(metadata.as_deref(), Kind::OpenHandle)?;

        let Handle {
            reader,
            name,
            stat,
            mode,
        } = handle;

        if let Some(meta) = metadata {
            meta.origin = name.clone();
            meta.origin_timestamp = Some(
                stat.and_then(|s| s.modified)
                    .map(format_time)
                    .unwrap_or_else(now),
            );
            meta.origin_size = stat.map(|s| s.len);
            meta.base_location = name.as_deref().and_then(|n| parent_dir(Path::new(n)));
        }

        let codec = match mode {
            HandleMode::Text => Some(options.read_codec.unwrap_or(Codec::Utf8)),
            HandleMode::Binary => options.read_codec,
        };
        let label = name.unwrap_or_else(|| HANDLE_LABEL.to_owned());
        Ok(TextStream::from_boxed(label, reader, codec))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        ResolverBuilder::new().build()
    }
}

/// Record metadata for text that needed no I/O.
fn materialized(text: String, metadata: Option<&mut Metadata>) -> String {
    if let Some(meta) = metadata {
        meta.origin = None;
        meta.base_location = None;
        meta.origin_timestamp = Some(now());
        meta.origin_size = Some(text.chars().count() as u64);
    }
    text
}

fn decode_bytes(bytes: Cow<'_, [u8]>) -> Result<String> {
    match bytes {
        Cow::Owned(vec) => String::from_utf8(vec).map_err(|e| {
            let failure = e.utf8_error();
            bytes_error(failure.valid_up_to())
        }),
        Cow::Borrowed(slice) => Codec::Utf8.decode_all(slice).map_err(|f| bytes_error(f.offset)),
    }
}

fn bytes_error(offset: usize) -> Error {
    Error::Decode {
        codec: Codec::Utf8,
        target: BYTES_LABEL.to_owned(),
        reason: format!("invalid utf-8 at byte {offset}"),
    }
}

fn ensure_outputs_unset(metadata: Option<&Metadata>, kind: Kind) -> Result<()> {
    if metadata.is_some_and(Metadata::has_outputs) {
        return Err(Error::InvalidUsage(format!(
            "origin fields are filled in when opening a {kind}; \
             pass a cleared metadata record instead"
        )));
    }
    Ok(())
}

/// Absolute, lexically normalized form of `source`.
fn absolute_path(source: &str, base_location: Option<&str>) -> Result<PathBuf> {
    let path = Path::new(source);
    let joined = match base_location {
        Some(base) if !path.is_absolute() => Path::new(base).join(path),
        _ => path.to_path_buf(),
    };
    if joined.is_absolute() {
        return Ok(joined.clean());
    }
    let cwd = std::env::current_dir().map_err(|e| Error::Io {
        target: source.to_owned(),
        source: e,
    })?;
    Ok(cwd.join(joined).clean())
}

fn parent_dir(path: &Path) -> Option<String> {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_string_lossy().into_owned())
}

/// Absolute URL for `source`, escaped for the wire.
fn resolve_url(source: &str, base_location: Option<&str>) -> Result<String> {
    let joined = if source.contains("://") {
        source.to_owned()
    } else {
        let mut base = base_location.unwrap_or_default().to_owned();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            Error::InvalidUsage(format!("base location '{base}' is not a valid URL: {e}"))
        })?;
        base_url
            .join(source)
            .map_err(|e| Error::InvalidUsage(format!("cannot join '{source}' onto '{base}': {e}")))?
            .to_string()
    };
    Ok(utf8_percent_encode(&joined, URL_UNSAFE).to_string())
}

/// `url` without its last path segment, query or fragment.
fn url_base(url: &str) -> Option<String> {
    let mut url = Url::parse(url).ok()?;
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop();
    }
    Some(url.to_string())
}
