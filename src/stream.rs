//! The uniform text-reading handle returned for every source.

use std::fmt;
use std::io::{self, Cursor, Read};

use log::{debug, trace, warn};

use crate::codec::{BOM_PROBE_LEN, Codec, Decoder};
use crate::error::{Error, Result};

/// Raw bytes pulled per step by `read_line` and the `io::Read` impl.
const CHUNK_SIZE: usize = 8 * 1024;

/// Text view over a byte stream.
///
/// The codec is either fixed when the stream is created or left open, in
/// which case the first read sniffs the byte-order mark and fixes it for the
/// rest of the stream. Decoding happens lazily, so malformed input is only
/// reported by the read that reaches it.
///
/// The wrapped reader is owned by the stream and released by [`close`] or on
/// drop, whichever comes first. Wrapping a borrowed reader (`&mut File`) only
/// releases the borrow.
///
/// [`close`]: TextStream::close
pub struct TextStream<'a> {
    label: String,
    inner: Option<Box<dyn Read + 'a>>,
    decoder: Option<Decoder>,
    /// Decoded text not yet handed out
    buffer: String,
    /// UTF-8 bytes not yet handed out through `io::Read`
    spill: Vec<u8>,
    eof: bool,
    failed: bool,
}

impl fmt::Debug for TextStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextStream")
            .field("label", &self.label)
            .field("codec", &self.codec())
            .field("closed", &self.is_closed())
            .field("eof", &self.eof)
            .finish()
    }
}

impl<'a> TextStream<'a> {
    /// Wrap a byte reader.
    ///
    /// With `codec = None` the encoding is sniffed on the first read.
    pub fn new(label: impl Into<String>, reader: impl Read + 'a, codec: Option<Codec>) -> Self {
        Self::from_boxed(label.into(), Box::new(reader), codec)
    }

    pub(crate) fn from_boxed(
        label: String,
        reader: Box<dyn Read + 'a>,
        codec: Option<Codec>,
    ) -> Self {
        Self {
            label,
            inner: Some(reader),
            decoder: codec.map(Decoder::new),
            buffer: String::new(),
            spill: Vec::new(),
            eof: false,
            failed: false,
        }
    }

    /// In-memory stream over already materialized text.
    pub fn from_text(label: impl Into<String>, text: String) -> Self {
        Self::new(label, Cursor::new(text.into_bytes()), Some(Codec::Utf8))
    }

    /// Identifier used in error messages (path, URL or handle name).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The codec in use, or `None` while it is still to be sniffed.
    pub fn codec(&self) -> Option<Codec> {
        self.decoder.as_ref().map(Decoder::codec)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Read text.
    ///
    /// With `limit = None` the rest of the stream is returned. With
    /// `Some(n)` text left over from an earlier [`read_line`](Self::read_line)
    /// is returned first; otherwise the result is the text decoded from at
    /// most `n` further bytes of input (more if those bytes end inside a
    /// character). An empty string means end of stream.
    pub fn read(&mut self, limit: Option<usize>) -> Result<String> {
        let mut text = std::mem::take(&mut self.buffer);
        match limit {
            None => text.push_str(&self.pull(None)?),
            Some(0) => {}
            Some(n) => {
                // Keep pulling while only part of a character has arrived
                while text.is_empty() && !self.eof {
                    text.push_str(&self.pull(Some(n))?);
                }
            }
        }
        Ok(text)
    }

    /// Read everything that is left.
    pub fn read_to_string(&mut self) -> Result<String> {
        self.read(None)
    }

    /// Read up to and including the next `\n`.
    ///
    /// Returns an empty string at end of stream; the last line may lack its
    /// terminator.
    pub fn read_line(&mut self) -> Result<String> {
        loop {
            if let Some(pos) = self.buffer.find('\n') {
                return Ok(self.buffer.drain(..=pos).collect());
            }
            if self.eof {
                return Ok(std::mem::take(&mut self.buffer));
            }
            let chunk = self.pull(Some(CHUNK_SIZE))?;
            self.buffer.push_str(&chunk);
        }
    }

    /// Release the underlying reader.
    ///
    /// Closing twice is a no-op; reading after close is `InvalidUsage`.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!("closed text stream '{}'", self.label);
        }
    }

    /// Pull raw bytes from the reader and decode them.
    fn pull(&mut self, limit: Option<usize>) -> Result<String> {
        if self.inner.is_none() {
            return Err(Error::InvalidUsage(format!(
                "read on closed stream '{}'",
                self.label
            )));
        }
        if self.eof {
            return Ok(String::new());
        }

        if self.decoder.is_none() {
            return self.sniff(limit);
        }

        let raw = self.read_raw(limit)?;
        self.decode(&raw)
    }

    /// First read on a stream whose codec is still open.
    fn sniff(&mut self, limit: Option<usize>) -> Result<String> {
        if let Some(n) = limit.filter(|n| *n < BOM_PROBE_LEN) {
            warn!(
                "read of {n} byte(s) from '{}' is too short to detect a byte-order mark, \
                 assuming utf-8",
                self.label
            );
            self.decoder = Some(Decoder::new(Codec::Utf8));
            let raw = self.read_raw(Some(n))?;
            return self.decode(&raw);
        }

        let probe = self.read_raw(Some(BOM_PROBE_LEN))?;
        if probe.len() < BOM_PROBE_LEN {
            // Only the 2- and 3-byte marks fit; zero-byte heuristics need four bytes
            let (codec, bom_len) = Codec::sniff(&probe);
            if bom_len > 0 {
                debug!("detected {codec} for short stream '{}'", self.label);
                self.decoder = Some(Decoder::new(codec));
                return self.decode(&probe[bom_len..]);
            }
            debug!("'{}' is shorter than a byte-order mark, decoding as utf-8", self.label);
            self.decoder = Some(Decoder::new(Codec::Utf8));
            return self.decode(&probe);
        }

        let (codec, bom_len) = Codec::sniff(&probe);
        debug!("detected {codec} for '{}' (bom: {bom_len} bytes)", self.label);
        self.decoder = Some(Decoder::new(codec));

        let mut raw = probe[bom_len..].to_vec();
        let rest = match limit {
            None => self.read_raw(None)?,
            Some(n) => self.read_raw(Some(n - BOM_PROBE_LEN))?,
        };
        raw.extend_from_slice(&rest);
        self.decode(&raw)
    }

    /// Read at most `limit` bytes (all bytes for `None`), marking end of
    /// stream when the reader runs dry first.
    fn read_raw(&mut self, limit: Option<usize>) -> Result<Vec<u8>> {
        let Some(reader) = self.inner.as_mut() else {
            return Ok(Vec::new());
        };

        let mut raw = Vec::new();
        let outcome = match limit {
            None => reader.read_to_end(&mut raw),
            Some(0) => Ok(0),
            Some(n) => reader.take(n as u64).read_to_end(&mut raw),
        };
        if let Err(source) = outcome {
            self.failed = true;
            return Err(Error::Io {
                target: self.label.clone(),
                source,
            });
        }

        match limit {
            None => self.eof = true,
            Some(n) => self.eof = n > 0 && raw.len() < n,
        }
        trace!("read {} raw byte(s) from '{}'", raw.len(), self.label);
        Ok(raw)
    }

    fn decode(&mut self, raw: &[u8]) -> Result<String> {
        let last = self.eof;
        let Some(decoder) = self.decoder.as_mut() else {
            return Ok(String::new());
        };
        let codec = decoder.codec();
        decoder.decode(raw, last).map_err(|failure| {
            self.failed = true;
            Error::Decode {
                codec,
                target: self.label.clone(),
                reason: failure.to_string(),
            }
        })
    }
}

/// Lines of the stream, each with its terminator.
///
/// Iteration stops after the first error.
impl Iterator for TextStream<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.is_closed() {
            return None;
        }
        match self.read_line() {
            Ok(line) if line.is_empty() => None,
            Ok(line) => Some(Ok(line)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Decoded text as UTF-8 bytes.
impl Read for TextStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.spill.is_empty() {
            let text = TextStream::read(self, Some(CHUNK_SIZE))?;
            self.spill = text.into_bytes();
        }
        let n = buf.len().min(self.spill.len());
        buf[..n].copy_from_slice(&self.spill[..n]);
        self.spill.drain(..n);
        Ok(n)
    }
}
