use super::number::{NumberError, parse_number};
use super::source::Source;
use crate::error::{Error, Result};
use crate::map::Map;
use crate::options::JsonOptions;
use crate::value::Value;
use smallvec::SmallVec;

/// Deepest nesting of arrays and objects accepted by the parser.
pub const MAX_NESTING: usize = 1000;

/// The ASCII record separator that frames a JSON text sequence.
const RECORD_SEPARATOR: char = '\x1E';

pub(crate) struct Parser<'o, S> {
    source: S,
    options: &'o JsonOptions,
    depth: usize,
    sequence: bool,
    truncated: bool,
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

impl<'o, S: Source> Parser<'o, S> {
    pub fn new(source: S, options: &'o JsonOptions) -> Self {
        Self {
            source,
            options,
            depth: 0,
            sequence: false,
            truncated: false,
        }
    }

    fn peek(&mut self) -> Result<Option<char>> {
        self.source.peek()
    }

    fn skip_whitespace(&mut self) -> Result<Option<char>> {
        loop {
            match self.peek()? {
                Some(c) if is_whitespace(c) => self.source.advance(),
                c => return Ok(c),
            }
        }
    }

    /// The error for `found` where something else was expected, noting when
    /// the text simply stopped short.
    fn unexpected(&mut self, found: Option<char>, reason: &'static str) -> Error {
        match found {
            None => {
                self.truncated = true;
                Error::syntax(self.source.position(), "Unexpected end of input")
            }
            Some(RECORD_SEPARATOR) if self.sequence => {
                self.truncated = true;
                Error::syntax(self.source.position(), "Truncated text in sequence")
            }
            Some(_) => Error::syntax(self.source.position(), reason),
        }
    }

    fn expect(&mut self, want: char, reason: &'static str) -> Result<()> {
        match self.skip_whitespace()? {
            Some(c) if c == want => {
                self.source.advance();
                Ok(())
            }
            found => Err(self.unexpected(found, reason)),
        }
    }

    fn value(&mut self) -> Result<Value> {
        match self.skip_whitespace()? {
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some('"') => {
                self.source.advance();
                self.string().map(Value::Text)
            }
            Some('t') => self.literal("true", Value::Bool(true)),
            Some('f') => self.literal("false", Value::Bool(false)),
            Some('n') => self.literal("null", Value::Null),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            found => Err(self.unexpected(found, "Unexpected character")),
        }
    }

    fn literal(&mut self, word: &str, value: Value) -> Result<Value> {
        for want in word.chars() {
            match self.peek()? {
                Some(c) if c == want => self.source.advance(),
                found => return Err(self.unexpected(found, "Invalid literal")),
            }
        }
        Ok(value)
    }

    fn number(&mut self) -> Result<Value> {
        let start = self.source.position();
        let mut text = SmallVec::<[u8; 32]>::new();
        while let Some(c) = self.peek()? {
            if !matches!(c, '0'..='9' | '-' | '+' | '.' | 'e' | 'E') {
                break;
            }
            text.push(c as u8);
            self.source.advance();
        }
        let at_end = self.peek()?.is_none();
        parse_number(&text, self.options).map_err(|e| match e {
            NumberError::Malformed => {
                self.truncated |= at_end;
                Error::syntax(start, "Invalid number")
            }
            NumberError::OutOfRange => Error::ResourceExhausted("number exponent out of range"),
        })
    }

    fn hex4(&mut self) -> Result<u16> {
        let mut v = 0u16;
        for _ in 0..4 {
            let digit = match self.peek()? {
                Some(c) => c.to_digit(16),
                None => None,
            };
            match digit {
                Some(d) => v = (v << 4) | d as u16,
                None => {
                    let found = self.peek()?;
                    return Err(self.unexpected(found, "Invalid \\u escape"));
                }
            }
            self.source.advance();
        }
        Ok(v)
    }

    fn escape(&mut self) -> Result<char> {
        let c = match self.peek()? {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\x08',
            Some('f') => '\x0C',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => {
                self.source.advance();
                let start = self.source.position();
                let unit = self.hex4()?;
                return match unit {
                    0xD800..=0xDBFF => {
                        // A high surrogate must be followed by an escaped low one
                        let low = if self.peek()? == Some('\\') {
                            self.source.advance();
                            if self.peek()? == Some('u') {
                                self.source.advance();
                                Some(self.hex4()?)
                            } else {
                                None
                            }
                        } else {
                            None
                        };
                        match low {
                            Some(low @ 0xDC00..=0xDFFF) => Ok(char::from_u32(
                                0x10000 + (((unit as u32) - 0xD800) << 10) + (low as u32 - 0xDC00),
                            )
                            .unwrap_or(char::REPLACEMENT_CHARACTER)),
                            _ => Err(Error::syntax(start, "Unpaired surrogate")),
                        }
                    }
                    0xDC00..=0xDFFF => Err(Error::syntax(start, "Unpaired surrogate")),
                    _ => Ok(char::from_u32(unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER)),
                };
            }
            found => return Err(self.unexpected(found, "Invalid escape")),
        };
        self.source.advance();
        Ok(c)
    }

    /// The body of a string whose opening quote has been consumed.
    fn string(&mut self) -> Result<String> {
        let mut s = String::new();
        loop {
            match self.peek()? {
                Some('"') => {
                    self.source.advance();
                    return Ok(s);
                }
                Some('\\') => {
                    self.source.advance();
                    s.push(self.escape()?);
                }
                Some(c) if (c as u32) < 0x20 => {
                    return Err(self.unexpected(Some(c), "Control character in string"));
                }
                Some(c) => {
                    s.push(c);
                    self.source.advance();
                }
                None => return Err(self.unexpected(None, "Unterminated string")),
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            tracing::debug!(offset = self.source.position(), "JSON nesting too deep");
            Err(Error::NestingTooDeep)
        } else {
            Ok(())
        }
    }

    fn array(&mut self) -> Result<Value> {
        self.source.advance();
        self.enter()?;
        let mut items = Vec::new();
        if self.skip_whitespace()? == Some(']') {
            self.source.advance();
        } else {
            loop {
                items.push(self.value()?);
                match self.skip_whitespace()? {
                    Some(',') => self.source.advance(),
                    Some(']') => {
                        self.source.advance();
                        break;
                    }
                    found => return Err(self.unexpected(found, "Expected ',' or ']'")),
                }
            }
        }
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn object(&mut self) -> Result<Value> {
        self.source.advance();
        self.enter()?;
        let mut map = Map::new();
        if self.skip_whitespace()? == Some('}') {
            self.source.advance();
        } else {
            loop {
                let key_start = self.source.position();
                self.expect('"', "Expected a string key")?;
                let key = Value::Text(self.string()?);
                self.expect(':', "Expected ':'")?;
                let value = self.value()?;
                if self.options.allow_duplicate_keys() {
                    map.insert(key, value);
                } else {
                    map.try_insert(key, value).inspect_err(|_| {
                        tracing::debug!(offset = key_start, "Duplicate JSON object key");
                    })?;
                }
                match self.skip_whitespace()? {
                    Some(',') => self.source.advance(),
                    Some('}') => {
                        self.source.advance();
                        break;
                    }
                    found => return Err(self.unexpected(found, "Expected ',' or '}'")),
                }
            }
        }
        self.depth -= 1;
        Ok(Value::Map(map))
    }

    /// Parses a single JSON text filling the whole input.
    pub fn parse(mut self) -> Result<Value> {
        let r = self.value().and_then(|value| match self.skip_whitespace()? {
            None => Ok(value),
            Some(_) => Err(Error::syntax(
                self.source.position(),
                "Unexpected data after JSON text",
            )),
        });
        r.inspect_err(|e| tracing::debug!(error = %e, "JSON parse failed"))
    }

    /// Parses a JSON text sequence: texts each introduced by a record
    /// separator. A truncated text yields `None` in its place.
    pub fn parse_sequence(mut self) -> Result<Vec<Option<Value>>> {
        self.sequence = true;
        let mut texts = Vec::new();
        loop {
            match self.skip_whitespace()? {
                None => break,
                Some(RECORD_SEPARATOR) => self.source.advance(),
                Some(_) => {
                    return Err(Error::syntax(
                        self.source.position(),
                        "Expected a record separator",
                    ));
                }
            }
            match self.skip_whitespace()? {
                // Empty record
                None | Some(RECORD_SEPARATOR) => continue,
                _ => {}
            }

            self.depth = 0;
            self.truncated = false;
            match self.record() {
                Ok(value) => texts.push(value),
                Err(_) if self.truncated => {
                    tracing::debug!(offset = self.source.position(), "Truncated JSON text");
                    texts.push(None);
                    // Resume at the next separator
                    while let Some(c) = self.peek()? {
                        if c == RECORD_SEPARATOR {
                            break;
                        }
                        self.source.advance();
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "JSON sequence parse failed");
                    return Err(e);
                }
            }
        }
        Ok(texts)
    }

    fn record(&mut self) -> Result<Option<Value>> {
        let is_number = matches!(self.peek()?, Some(c) if c == '-' || c.is_ascii_digit());
        let value = self.value()?;
        match self.peek()? {
            // A number running into the end may have lost digits
            None if is_number => return Ok(None),
            Some(RECORD_SEPARATOR) if is_number => {
                return Err(Error::syntax(
                    self.source.position(),
                    "Expected whitespace after number",
                ));
            }
            _ => {}
        }
        match self.skip_whitespace()? {
            None | Some(RECORD_SEPARATOR) => Ok(Some(value)),
            Some(_) => Err(Error::syntax(
                self.source.position(),
                "Expected a record separator",
            )),
        }
    }
}
