//! Text codecs, byte-order-mark sniffing and incremental decoding.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Number of leading bytes inspected when sniffing an encoding.
pub const BOM_PROBE_LEN: usize = 4;

const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF16_BE: &[u8] = &[0xFE, 0xFF];
const BOM_UTF32_LE: &[u8] = &[0xFF, 0xFE, 0x00, 0x00];
const BOM_UTF32_BE: &[u8] = &[0x00, 0x00, 0xFE, 0xFF];

/// Text codecs understood by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Codec {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
    /// UTF-16 whose byte order comes from a leading BOM, little-endian without one
    Utf16,
    /// UTF-32 whose byte order comes from a leading BOM, little-endian without one
    Utf32,
    /// ISO-8859-1: every byte maps to the code point of the same value
    Latin1,
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Utf8 => write!(f, "utf-8"),
            Codec::Utf16Le => write!(f, "utf-16le"),
            Codec::Utf16Be => write!(f, "utf-16be"),
            Codec::Utf32Le => write!(f, "utf-32le"),
            Codec::Utf32Be => write!(f, "utf-32be"),
            Codec::Utf16 => write!(f, "utf-16"),
            Codec::Utf32 => write!(f, "utf-32"),
            Codec::Latin1 => write!(f, "latin-1"),
        }
    }
}

impl Codec {
    /// Look up a codec by one of its common names, ignoring case.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" | "utf-8-sig" => Some(Codec::Utf8),
            "utf-16le" | "utf-16-le" | "utf16le" => Some(Codec::Utf16Le),
            "utf-16be" | "utf-16-be" | "utf16be" => Some(Codec::Utf16Be),
            "utf-32le" | "utf-32-le" | "utf32le" => Some(Codec::Utf32Le),
            "utf-32be" | "utf-32-be" | "utf32be" => Some(Codec::Utf32Be),
            "utf-16" | "utf16" => Some(Codec::Utf16),
            "utf-32" | "utf32" => Some(Codec::Utf32),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "l1" => Some(Codec::Latin1),
            _ => None,
        }
    }

    /// Guess the codec from the first bytes of a stream.
    ///
    /// Returns the codec and the length of the byte-order mark to skip.
    /// Without a BOM the zero-byte layout of the first four bytes decides
    /// between the UTF-16 and UTF-32 variants; anything else is UTF-8.
    pub fn sniff(probe: &[u8]) -> (Codec, usize) {
        if probe.starts_with(BOM_UTF32_BE) {
            return (Codec::Utf32Be, BOM_UTF32_BE.len());
        }
        if probe.starts_with(BOM_UTF32_LE) {
            return (Codec::Utf32Le, BOM_UTF32_LE.len());
        }
        if probe.starts_with(BOM_UTF16_BE) {
            return (Codec::Utf16Be, BOM_UTF16_BE.len());
        }
        if probe.starts_with(BOM_UTF16_LE) {
            return (Codec::Utf16Le, BOM_UTF16_LE.len());
        }
        if probe.starts_with(BOM_UTF8) {
            return (Codec::Utf8, BOM_UTF8.len());
        }
        if let [b0, b1, b2, b3, ..] = *probe {
            if b0 == 0 {
                // 00 XX -- -- is utf-16be, 00 00 -- -- is utf-32be
                let codec = if b1 != 0 { Codec::Utf16Be } else { Codec::Utf32Be };
                return (codec, 0);
            }
            if b1 == 0 {
                // XX 00 XX -- is utf-16le, XX 00 00 00 is utf-32le
                let codec = if b2 != 0 || b3 != 0 {
                    Codec::Utf16Le
                } else {
                    Codec::Utf32Le
                };
                return (codec, 0);
            }
        }
        (Codec::Utf8, 0)
    }

    /// Concrete byte order for `Utf16`/`Utf32` given the leading bytes,
    /// with the length of the BOM to skip. Other codecs pass through.
    fn with_byte_order(self, lead: &[u8]) -> (Codec, usize) {
        match self {
            Codec::Utf16 if lead.starts_with(BOM_UTF16_BE) => (Codec::Utf16Be, 2),
            Codec::Utf16 if lead.starts_with(BOM_UTF16_LE) => (Codec::Utf16Le, 2),
            Codec::Utf16 => (Codec::Utf16Le, 0),
            Codec::Utf32 if lead.starts_with(BOM_UTF32_BE) => (Codec::Utf32Be, 4),
            Codec::Utf32 if lead.starts_with(BOM_UTF32_LE) => (Codec::Utf32Le, 4),
            Codec::Utf32 => (Codec::Utf32Le, 0),
            other => (other, 0),
        }
    }

    /// Code unit width while the byte order is still undecided.
    fn pending_order_width(self) -> Option<usize> {
        match self {
            Codec::Utf16 => Some(2),
            Codec::Utf32 => Some(4),
            _ => None,
        }
    }

    /// Decode a complete buffer in one go.
    pub fn decode_all(self, bytes: &[u8]) -> Result<String, DecodeFailure> {
        Decoder::new(self).decode(bytes, true)
    }
}

impl FromStr for Codec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codec::from_name(s).ok_or_else(|| Error::InvalidUsage(format!("unknown text codec '{s}'")))
    }
}

/// Position and cause of a decoding failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    /// Byte offset (from the start of the decoded stream) of the bad input
    pub offset: usize,
    pub reason: String,
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.reason, self.offset)
    }
}

/// Streaming decoder for a fixed codec.
///
/// Bytes of a character split across two `decode` calls are held back until
/// the rest arrives. Passing `last = true` flushes: anything still held back
/// at that point is an error.
#[derive(Debug, Clone)]
pub struct Decoder {
    codec: Codec,
    pending: Vec<u8>,
    consumed: usize,
}

impl Decoder {
    pub fn new(codec: Codec) -> Self {
        Self {
            codec,
            pending: Vec::new(),
            consumed: 0,
        }
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// True if bytes of an unfinished character are buffered.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn decode(&mut self, input: &[u8], last: bool) -> Result<String, DecodeFailure> {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(input);

        if let Some(width) = self.codec.pending_order_width() {
            if bytes.len() < width && !last {
                self.pending = bytes;
                return Ok(String::new());
            }
            let (codec, bom_len) = self.codec.with_byte_order(&bytes);
            self.codec = codec;
            self.consumed += bom_len;
            bytes.drain(..bom_len);
        }

        let (text, used) = match self.codec {
            Codec::Utf8 => self.decode_utf8(&bytes, last)?,
            Codec::Utf16Le | Codec::Utf16 => self.decode_utf16(&bytes, last, u16::from_le_bytes)?,
            Codec::Utf16Be => self.decode_utf16(&bytes, last, u16::from_be_bytes)?,
            Codec::Utf32Le | Codec::Utf32 => self.decode_utf32(&bytes, last, u32::from_le_bytes)?,
            Codec::Utf32Be => self.decode_utf32(&bytes, last, u32::from_be_bytes)?,
            Codec::Latin1 => (bytes.iter().map(|&b| char::from(b)).collect(), bytes.len()),
        };

        self.consumed += used;
        self.pending = bytes[used..].to_vec();
        Ok(text)
    }

    fn fail(&self, at: usize, reason: impl Into<String>) -> DecodeFailure {
        DecodeFailure {
            offset: self.consumed + at,
            reason: reason.into(),
        }
    }

    fn decode_utf8(&self, bytes: &[u8], last: bool) -> Result<(String, usize), DecodeFailure> {
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok((s.to_owned(), bytes.len())),
            Err(e) => {
                let valid = e.valid_up_to();
                if e.error_len().is_none() && !last {
                    // Truncated sequence at the end: keep it for the next call
                    let text = String::from_utf8_lossy(&bytes[..valid]).into_owned();
                    Ok((text, valid))
                } else if e.error_len().is_none() {
                    Err(self.fail(valid, "incomplete utf-8 sequence at end of input"))
                } else {
                    Err(self.fail(valid, format!("invalid utf-8 byte 0x{:02x}", bytes[valid])))
                }
            }
        }
    }

    fn decode_utf16(
        &self,
        bytes: &[u8],
        last: bool,
        unit: fn([u8; 2]) -> u16,
    ) -> Result<(String, usize), DecodeFailure> {
        let mut used = bytes.len() - bytes.len() % 2;
        let mut units: Vec<u16> = bytes[..used]
            .chunks_exact(2)
            .map(|c| unit([c[0], c[1]]))
            .collect();

        if !last {
            // A high surrogate waits for its partner
            if matches!(units.last(), Some(u) if (0xD800..0xDC00).contains(u)) {
                units.pop();
                used -= 2;
            }
        } else if used != bytes.len() {
            return Err(self.fail(used, "truncated utf-16 code unit at end of input"));
        }

        let mut text = String::with_capacity(units.len());
        let mut unit_index = 0;
        for ch in char::decode_utf16(units.iter().copied()) {
            match ch {
                Ok(c) => {
                    text.push(c);
                    unit_index += c.len_utf16();
                }
                Err(e) => {
                    return Err(self.fail(
                        unit_index * 2,
                        format!("unpaired surrogate 0x{:04x}", e.unpaired_surrogate()),
                    ));
                }
            }
        }
        Ok((text, used))
    }

    fn decode_utf32(
        &self,
        bytes: &[u8],
        last: bool,
        unit: fn([u8; 4]) -> u32,
    ) -> Result<(String, usize), DecodeFailure> {
        let used = bytes.len() - bytes.len() % 4;
        if last && used != bytes.len() {
            return Err(self.fail(used, "truncated utf-32 code unit at end of input"));
        }

        let mut text = String::with_capacity(used / 4);
        for (i, c) in bytes[..used].chunks_exact(4).enumerate() {
            let value = unit([c[0], c[1], c[2], c[3]]);
            match char::from_u32(value) {
                Some(ch) => text.push(ch),
                None => return Err(self.fail(i * 4, format!("invalid code point 0x{value:x}"))),
            }
        }
        Ok((text, used))
    }
}
