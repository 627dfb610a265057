use crate::error::Result;
use std::io;

/// Destination for JSON text.
///
/// Writers hand over whole strings, substrings and single characters; the
/// sink decides how they are stored.
pub trait Sink {
    fn write_str(&mut self, s: &str) -> Result<()>;

    fn write_char(&mut self, c: char) -> Result<()> {
        self.write_str(c.encode_utf8(&mut [0; 4]))
    }
}

impl Sink for String {
    fn write_str(&mut self, s: &str) -> Result<()> {
        self.push_str(s);
        Ok(())
    }

    fn write_char(&mut self, c: char) -> Result<()> {
        self.push(c);
        Ok(())
    }
}

/// UTF-8 output to any [`io::Write`].
pub struct WriteSink<W> {
    inner: W,
}

impl<W: io::Write> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Sink for WriteSink<W> {
    fn write_str(&mut self, s: &str) -> Result<()> {
        self.inner.write_all(s.as_bytes())?;
        Ok(())
    }
}
