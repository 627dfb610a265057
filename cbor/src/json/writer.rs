use super::base64::write_base64;
use super::sink::Sink;
use crate::error::{Error, Result};
use crate::number::{Kind, Number, format_double};
use crate::options::JsonOptions;
use crate::tags;
use crate::value::Value;
use hashbrown::HashSet;

/// Deepest nesting of arrays and maps the writer will descend into.
pub const MAX_NESTING: usize = 1000;

/// Writes `value` as JSON text.
///
/// Byte strings become base64url without padding, or padded base64 under tag
/// 22, or upper-case hex under tag 23. Values with no JSON form (undefined,
/// other simple values, infinities and NaNs) are written as `null`.
pub fn write_value<S>(value: &Value, sink: &mut S, options: &JsonOptions) -> Result<()>
where
    S: Sink + ?Sized,
{
    Writer::new(sink, options).value(value)
}

/// Writes a UTF-16 string as a quoted JSON string.
///
/// Unpaired surrogates become U+FFFD when the options allow it, and are an
/// [`Error::UnpairedSurrogate`] otherwise.
pub fn write_utf16_string<S>(units: &[u16], sink: &mut S, options: &JsonOptions) -> Result<()>
where
    S: Sink + ?Sized,
{
    sink.write_char('"')?;
    for c in char::decode_utf16(units.iter().copied()) {
        let c = match c {
            Ok(c) => c,
            Err(_) if options.replace_surrogates() => char::REPLACEMENT_CHARACTER,
            Err(_) => return Err(Error::UnpairedSurrogate),
        };
        match escape(c) {
            Some(escaped) => write_escape(sink, c, escaped)?,
            None => sink.write_char(c)?,
        }
    }
    sink.write_char('"')
}

/// The short escape for `c`, `Some('u')` for a `\u` escape, or `None` when `c`
/// is written as is.
fn escape(c: char) -> Option<char> {
    match c {
        '"' => Some('"'),
        '\\' => Some('\\'),
        '\x08' => Some('b'),
        '\x0C' => Some('f'),
        '\n' => Some('n'),
        '\r' => Some('r'),
        '\t' => Some('t'),
        // Also escape what JavaScript treats as line terminators or strips
        '\0'..='\x1F'
        | '\x7F'..='\u{A0}'
        | '\u{2028}'
        | '\u{2029}'
        | '\u{FEFF}'
        | '\u{FFFE}'
        | '\u{FFFF}' => Some('u'),
        _ => None,
    }
}

fn write_escape<S>(sink: &mut S, c: char, escaped: char) -> Result<()>
where
    S: Sink + ?Sized,
{
    if escaped != 'u' {
        sink.write_char('\\')?;
        return sink.write_char(escaped);
    }
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let cp = c as u32;
    let mut buf = *b"\\u0000";
    for (i, shift) in [12, 8, 4, 0].into_iter().enumerate() {
        buf[2 + i] = HEX[((cp >> shift) & 0xF) as usize];
    }
    // Only ASCII was written
    sink.write_str(core::str::from_utf8(&buf).map_err(|e| Error::InvalidUtf8(e.valid_up_to()))?)
}

fn write_string<S>(sink: &mut S, s: &str) -> Result<()>
where
    S: Sink + ?Sized,
{
    sink.write_char('"')?;
    let mut run = 0;
    for (i, c) in s.char_indices() {
        if let Some(escaped) = escape(c) {
            sink.write_str(&s[run..i])?;
            write_escape(sink, c, escaped)?;
            run = i + c.len_utf8();
        }
    }
    sink.write_str(&s[run..])?;
    sink.write_char('"')
}

struct Writer<'a, S: ?Sized> {
    sink: &'a mut S,
    options: &'a JsonOptions,
    ancestors: Vec<*const Value>,
}

impl<'a, S> Writer<'a, S>
where
    S: Sink + ?Sized,
{
    fn new(sink: &'a mut S, options: &'a JsonOptions) -> Self {
        Self {
            sink,
            options,
            ancestors: Vec::new(),
        }
    }

    /// Runs `f` with `container` pushed on the ancestor stack, popping it
    /// again whatever `f` returns.
    fn descend<F>(&mut self, container: &Value, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let id = container as *const Value;
        if self.ancestors.last() == Some(&id) || self.ancestors.contains(&id) {
            return Err(Error::CircularReference);
        }
        if self.ancestors.len() >= MAX_NESTING {
            return Err(Error::NestingTooDeep);
        }
        self.ancestors.push(id);
        let r = f(self);
        self.ancestors.pop();
        r
    }

    fn null(&mut self) -> Result<()> {
        self.sink.write_str("null")
    }

    fn value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Unsigned(n) => self.sink.write_str(itoa::Buffer::new().format(*n)),
            Value::Negative(n) => self
                .sink
                .write_str(itoa::Buffer::new().format(-1 - *n as i128)),
            Value::Float(f) if f.is_finite() => self.sink.write_str(&format_double(*f)),
            Value::Bool(true) => self.sink.write_str("true"),
            Value::Bool(false) => self.sink.write_str("false"),
            Value::Float(_) | Value::Null | Value::Undefined | Value::Simple(_) => self.null(),
            Value::Bytes(b) => self.bytes(b, None),
            Value::Text(s) => write_string(&mut *self.sink, s),
            Value::Array(items) => self.descend(value, |w| {
                w.sink.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        w.sink.write_char(',')?;
                    }
                    w.value(item)?;
                }
                w.sink.write_char(']')
            }),
            Value::Map(_) => self.descend(value, |w| w.map(value)),
            Value::Tagged(tag, inner) => self.tagged(*tag, inner),
        }
    }

    fn tagged(&mut self, tag: u64, inner: &Value) -> Result<()> {
        if tags::is_numeric(tag) {
            return match Number::from_tagged(tag, inner) {
                Ok(number) => self.number(&number),
                // Malformed numeric content is written as plain data
                Err(_) => self.value(inner),
            };
        }
        match inner {
            Value::Bytes(b) => self.bytes(b, Some(tag)),
            _ => self.value(inner),
        }
    }

    fn bytes(&mut self, data: &[u8], tag: Option<u64>) -> Result<()> {
        self.sink.write_char('"')?;
        match tag {
            Some(tags::EXPECT_BASE16) => self.sink.write_str(&hex::encode_upper(data))?,
            Some(tags::EXPECT_BASE64) => {
                write_base64(&mut *self.sink, data, 0, data.len(), false, true)?
            }
            _ => write_base64(&mut *self.sink, data, 0, data.len(), true, false)?,
        }
        self.sink.write_char('"')
    }

    fn number(&mut self, number: &Number) -> Result<()> {
        if !number.is_finite() {
            return self.null();
        }
        match number.kind() {
            Kind::Integer(i) => self.sink.write_str(itoa::Buffer::new().format(*i)),
            Kind::Double(f) => self.sink.write_str(&format_double(*f)),
            Kind::BigInteger(b) => self.sink.write_str(&b.to_string()),
            Kind::Decimal(d) => self.sink.write_str(&d.to_string()),
            // Binary fractions always terminate in base 10; rationals are
            // rounded to 34 significant digits when they do not
            Kind::BinaryFloat(_) | Kind::Rational(_) => match number.to_decimal() {
                Ok(d) => self.sink.write_str(&d.to_string()),
                Err(e) => {
                    tracing::debug!(error = %e, "Number has no decimal form, writing null");
                    self.null()
                }
            },
        }
    }

    fn map(&mut self, value: &Value) -> Result<()> {
        let Value::Map(entries) = value else {
            return Ok(());
        };
        // JSON keys are strings: anything else is keyed by its own JSON text
        let mut seen = HashSet::with_capacity(entries.len());
        let mut keyed = Vec::with_capacity(entries.len());
        for (k, v) in entries {
            let key = match k.untagged() {
                Value::Text(s) => s.clone(),
                _ => {
                    let mut rendered = String::new();
                    Writer::new(&mut rendered, self.options).value(k)?;
                    rendered
                }
            };
            if !seen.insert(key.clone()) {
                tracing::debug!(key = %key, "Map keys collide as JSON text");
                return Err(Error::DuplicateKey);
            }
            keyed.push((key, v));
        }

        self.sink.write_char('{')?;
        for (i, (k, v)) in keyed.into_iter().enumerate() {
            if i > 0 {
                self.sink.write_char(',')?;
            }
            write_string(&mut *self.sink, &k)?;
            self.sink.write_char(':')?;
            self.value(v)?;
        }
        self.sink.write_char('}')
    }
}
