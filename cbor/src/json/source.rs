use crate::error::{Error, Result};
use std::io;

/// A pull-style view over JSON input, one character at a time.
pub trait Source {
    /// The next character, without consuming it.
    fn peek(&mut self) -> Result<Option<char>>;

    /// Consumes the character returned by the last [`peek`](Source::peek).
    fn advance(&mut self);

    /// Offset of the next character, in the source's own units.
    fn position(&self) -> usize;
}

/// Decodes the UTF-8 sequence led by `lead` at `offset`, pulling continuation
/// bytes from `next`. Errors name the offending byte.
fn decode_utf8<F>(lead: u8, offset: usize, mut next: F) -> Result<(char, usize)>
where
    F: FnMut() -> Result<Option<u8>>,
{
    // Sequence length, payload bits of the lead byte and the range allowed
    // for the first continuation byte
    let (len, bits, lo, hi) = match lead {
        0x00..=0x7F => return Ok((lead as char, 1)),
        0xC2..=0xDF => (2, lead & 0x1F, 0x80, 0xBF),
        0xE0 => (3, lead & 0x0F, 0xA0, 0xBF),
        0xED => (3, lead & 0x0F, 0x80, 0x9F),
        0xE1..=0xEF => (3, lead & 0x0F, 0x80, 0xBF),
        0xF0 => (4, lead & 0x07, 0x90, 0xBF),
        0xF1..=0xF3 => (4, lead & 0x07, 0x80, 0xBF),
        0xF4 => (4, lead & 0x07, 0x80, 0x8F),
        _ => return Err(Error::InvalidUtf8(offset)),
    };
    let mut cp = bits as u32;
    for i in 1..len {
        let (lo, hi) = if i == 1 { (lo, hi) } else { (0x80, 0xBF) };
        match next()? {
            Some(b) if (lo..=hi).contains(&b) => cp = (cp << 6) | (b & 0x3F) as u32,
            _ => return Err(Error::InvalidUtf8(offset + i)),
        }
    }
    char::from_u32(cp)
        .map(|c| (c, len))
        .ok_or(Error::InvalidUtf8(offset))
}

/// UTF-8 bytes held in memory, validated as they are read.
pub struct Utf8Source<'a> {
    data: &'a [u8],
    pos: usize,
    peeked: Option<(char, usize)>,
}

impl<'a> Utf8Source<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            peeked: None,
        }
    }
}

impl Source for Utf8Source<'_> {
    fn peek(&mut self) -> Result<Option<char>> {
        if let Some((c, _)) = self.peeked {
            return Ok(Some(c));
        }
        let Some(&lead) = self.data.get(self.pos) else {
            return Ok(None);
        };
        let mut i = self.pos;
        let decoded = decode_utf8(lead, self.pos, || {
            i += 1;
            Ok(self.data.get(i).copied())
        })?;
        self.peeked = Some(decoded);
        Ok(Some(decoded.0))
    }

    fn advance(&mut self) {
        if let Some((_, len)) = self.peeked.take() {
            self.pos += len;
        }
    }

    fn position(&self) -> usize {
        self.pos
    }
}

/// UTF-16 code units held in memory; surrogate pairs are combined and lone
/// surrogates rejected.
pub struct Utf16Source<'a> {
    data: &'a [u16],
    pos: usize,
    peeked: Option<(char, usize)>,
}

impl<'a> Utf16Source<'a> {
    pub fn new(data: &'a [u16]) -> Self {
        Self {
            data,
            pos: 0,
            peeked: None,
        }
    }
}

impl Source for Utf16Source<'_> {
    fn peek(&mut self) -> Result<Option<char>> {
        if let Some((c, _)) = self.peeked {
            return Ok(Some(c));
        }
        let Some(pair) = self.data.get(self.pos..(self.pos + 2).min(self.data.len())) else {
            return Ok(None);
        };
        let decoded = match char::decode_utf16(pair.iter().copied()).next() {
            None => return Ok(None),
            Some(Ok(c)) => (c, c.len_utf16()),
            Some(Err(_)) => return Err(Error::syntax(self.pos, "Unpaired surrogate")),
        };
        self.peeked = Some(decoded);
        Ok(Some(decoded.0))
    }

    fn advance(&mut self) {
        if let Some((_, len)) = self.peeked.take() {
            self.pos += len;
        }
    }

    fn position(&self) -> usize {
        self.pos
    }
}

/// UTF-8 pulled from a reader a byte at a time. Wrap unbuffered readers in a
/// [`std::io::BufReader`].
pub struct ReaderSource<R> {
    bytes: io::Bytes<R>,
    pos: usize,
    peeked: Option<(char, usize)>,
}

impl<R: io::Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: reader.bytes(),
            pos: 0,
            peeked: None,
        }
    }
}

impl<R: io::Read> Source for ReaderSource<R> {
    fn peek(&mut self) -> Result<Option<char>> {
        if let Some((c, _)) = self.peeked {
            return Ok(Some(c));
        }
        let Some(lead) = self.bytes.next().transpose()? else {
            return Ok(None);
        };
        let bytes = &mut self.bytes;
        let decoded = decode_utf8(lead, self.pos, || Ok(bytes.next().transpose()?))?;
        self.peeked = Some(decoded);
        Ok(Some(decoded.0))
    }

    fn advance(&mut self) {
        if let Some((_, len)) = self.peeked.take() {
            self.pos += len;
        }
    }

    fn position(&self) -> usize {
        self.pos
    }
}
