//! Source values and their classification.
//!
//! This module provides:
//! - `Source`: everything a caller can hand to `open`/`read`
//! - `Handle`: an already-open stream supplied by the caller
//! - `Kind`: the six classification outcomes
//! - `classify` and the default `is_actual_data` predicate

mod handle;

pub use handle::{Handle, HandleMode};

use std::borrow::Cow;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

/// Marker separating a URL scheme from the rest.
pub(crate) const URL_MARKER: &str = "://";

/// What a source turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// A string that is the text itself
    LiteralText,
    /// Raw bytes to decode
    BytesLike,
    /// A value rendered through its `Display` impl
    Stringable,
    /// A string naming a file
    FilePath,
    /// A string naming a URL, or relative to a URL base location
    Url,
    /// An already-open stream
    OpenHandle,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::LiteralText => write!(f, "literal text"),
            Kind::BytesLike => write!(f, "bytes"),
            Kind::Stringable => write!(f, "stringable"),
            Kind::FilePath => write!(f, "file path"),
            Kind::Url => write!(f, "url"),
            Kind::OpenHandle => write!(f, "open handle"),
        }
    }
}

/// Anything that can be turned into text.
///
/// Build one with `From`/`Into`: strings become [`Source::Text`], byte
/// buffers [`Source::Bytes`] and handles [`Source::Handle`]. Other values
/// with a string rendering go through [`Source::display`].
pub enum Source<'a> {
    /// Literal text, a file path or a URL; [`classify`] decides which
    Text(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
    Display(Box<dyn fmt::Display + 'a>),
    Handle(Handle<'a>),
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Source::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Source::Display(_) => f.debug_tuple("Display").finish(),
            Source::Handle(h) => f.debug_tuple("Handle").field(h).finish(),
        }
    }
}

impl<'a> Source<'a> {
    /// Wrap any value whose `Display` rendering is the text.
    pub fn display(value: impl fmt::Display + 'a) -> Self {
        Source::Display(Box::new(value))
    }

    /// Classify this source.
    pub fn kind(&self, base_location: Option<&str>, is_actual_data: &dyn Fn(&str) -> bool) -> Kind {
        let kind = match self {
            Source::Text(s) => classify_str(s, base_location, is_actual_data),
            Source::Handle(_) => Kind::OpenHandle,
            Source::Bytes(_) => Kind::BytesLike,
            Source::Display(_) => Kind::Stringable,
        };
        debug!("classified source as {kind}");
        kind
    }

    /// Classify and keep the payload for dispatch.
    pub(crate) fn into_classified(
        self,
        base_location: Option<&str>,
        is_actual_data: &dyn Fn(&str) -> bool,
    ) -> Classified<'a> {
        let kind = self.kind(base_location, is_actual_data);
        match self {
            Source::Text(s) => match kind {
                Kind::Url => Classified::Url(s),
                Kind::FilePath => Classified::FilePath(s),
                _ => Classified::LiteralText(s),
            },
            Source::Handle(h) => Classified::OpenHandle(h),
            Source::Bytes(b) => Classified::BytesLike(b),
            Source::Display(d) => Classified::Stringable(d),
        }
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(s: &'a str) -> Self {
        Source::Text(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(s: &'a String) -> Self {
        Source::Text(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for Source<'_> {
    fn from(s: String) -> Self {
        Source::Text(Cow::Owned(s))
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(b: &'a [u8]) -> Self {
        Source::Bytes(Cow::Borrowed(b))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Source<'a> {
    fn from(b: &'a [u8; N]) -> Self {
        Source::Bytes(Cow::Borrowed(b.as_slice()))
    }
}

impl From<Vec<u8>> for Source<'_> {
    fn from(b: Vec<u8>) -> Self {
        Source::Bytes(Cow::Owned(b))
    }
}

impl<'a> From<Handle<'a>> for Source<'a> {
    fn from(h: Handle<'a>) -> Self {
        Source::Handle(h)
    }
}

/// A source together with its kind; each variant carries what its opening
/// strategy needs.
pub(crate) enum Classified<'a> {
    LiteralText(Cow<'a, str>),
    BytesLike(Cow<'a, [u8]>),
    Stringable(Box<dyn fmt::Display + 'a>),
    FilePath(Cow<'a, str>),
    Url(Cow<'a, str>),
    OpenHandle(Handle<'a>),
}

/// Default test telling literal text apart from a path or URL token.
///
/// A string counts as data when it is blank, or contains a carriage return,
/// newline, tab, two consecutive spaces, or a single or double quote.
pub fn is_actual_data(s: &str) -> bool {
    s.trim().is_empty() || s.contains(['\r', '\n', '\t', '\'', '"']) || s.contains("  ")
}

/// Decide which kind `source` is.
///
/// `base_location` only matters for strings: a relative name under a URL base
/// is a URL. Pure, never fails.
pub fn classify(
    source: &Source<'_>,
    base_location: Option<&str>,
    is_actual_data: &dyn Fn(&str) -> bool,
) -> Kind {
    source.kind(base_location, is_actual_data)
}

fn classify_str(
    s: &str,
    base_location: Option<&str>,
    is_actual_data: &dyn Fn(&str) -> bool,
) -> Kind {
    if is_actual_data(s) {
        Kind::LiteralText
    } else if s.contains(URL_MARKER) || base_location.is_some_and(|b| b.contains(URL_MARKER)) {
        Kind::Url
    } else {
        Kind::FilePath
    }
}
