/*!
JSON text to and from [`Value`]s.

One parser drives every input form through the [`Source`] trait: UTF-8
bytes, UTF-16 code units and byte readers all produce identical values and
report errors at the offset of the offending input. Parsing follows RFC 8259
strictly: no trailing commas, no empty elements, no raw control characters in
strings and no lone surrogate escapes. Objects and arrays may nest 1000
levels deep.

JSON text sequences (RFC 7464) are read with the `*_sequence` functions.

The writer emits the same subset, escaping the characters some JavaScript
consumers treat as line terminators.
*/

mod base64;
mod number;
mod parser;
mod sink;
mod source;
mod writer;

pub use self::base64::write_base64;
pub use number::{parse_number_bytes, parse_number_str, parse_number_utf16};
pub use parser::MAX_NESTING;
pub use sink::{Sink, WriteSink};
pub use source::{ReaderSource, Source, Utf8Source, Utf16Source};
pub use writer::{write_utf16_string, write_value};

use crate::error::Result;
use crate::options::JsonOptions;
use crate::value::Value;
use parser::Parser;
use std::io;

/// Parses one JSON text from any [`Source`].
pub fn from_source<S: Source>(source: S, options: &JsonOptions) -> Result<Value> {
    Parser::new(source, options).parse()
}

pub fn from_str(text: &str, options: &JsonOptions) -> Result<Value> {
    from_slice(text.as_bytes(), options)
}

/// Parses one JSON text from UTF-8 bytes.
pub fn from_slice(data: &[u8], options: &JsonOptions) -> Result<Value> {
    from_source(Utf8Source::new(data), options)
}

/// Parses one JSON text from UTF-16 code units.
pub fn from_utf16(data: &[u16], options: &JsonOptions) -> Result<Value> {
    from_source(Utf16Source::new(data), options)
}

/// Parses one JSON text read as UTF-8 from `reader`.
pub fn from_reader<R: io::Read>(reader: R, options: &JsonOptions) -> Result<Value> {
    from_source(ReaderSource::new(io::BufReader::new(reader)), options)
}

/// Parses a JSON text sequence. Truncated texts are `None`.
pub fn sequence_from_source<S: Source>(
    source: S,
    options: &JsonOptions,
) -> Result<Vec<Option<Value>>> {
    Parser::new(source, options).parse_sequence()
}

pub fn sequence_from_slice(data: &[u8], options: &JsonOptions) -> Result<Vec<Option<Value>>> {
    sequence_from_source(Utf8Source::new(data), options)
}

pub fn sequence_from_reader<R: io::Read>(
    reader: R,
    options: &JsonOptions,
) -> Result<Vec<Option<Value>>> {
    sequence_from_source(ReaderSource::new(io::BufReader::new(reader)), options)
}

/// Renders `value` as JSON text.
pub fn to_string(value: &Value, options: &JsonOptions) -> Result<String> {
    let mut s = String::new();
    write_value(value, &mut s, options)?;
    Ok(s)
}

/// Writes `value` as UTF-8 JSON text to `writer`.
pub fn to_writer<W: io::Write>(value: &Value, writer: W, options: &JsonOptions) -> Result<()> {
    write_value(value, &mut WriteSink::new(writer), options)
}
