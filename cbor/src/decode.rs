use super::canonical;
use super::error::{Error, Result};
use super::map::Map;
use super::options::EncodeOptions;
use super::refs::{SharedRefs, StringRefs};
use super::tags;
use super::value::Value;

/// Deepest nesting of arrays, maps and tags accepted by the decoder.
pub const MAX_NESTING: usize = 1000;

pub trait FromCbor: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

fn parse_uint_minor(minor: u8, data: &[u8]) -> Result<(u64, usize)> {
    fn be<const N: usize>(data: &[u8]) -> Result<[u8; N]> {
        data.get(..N)
            .and_then(|b| b.try_into().ok())
            .ok_or(Error::NotEnoughData)
    }

    match minor {
        val if val < 24 => Ok((val as u64, 0)),
        24 => Ok((u8::from_be_bytes(be(data)?) as u64, 1)),
        25 => Ok((u16::from_be_bytes(be(data)?) as u64, 2)),
        26 => Ok((u32::from_be_bytes(be(data)?) as u64, 4)),
        27 => Ok((u64::from_be_bytes(be(data)?), 8)),
        _ => Err(Error::InvalidMinorValue(minor)),
    }
}

fn parse_data_minor(minor: u8, data: &[u8]) -> Result<(&[u8], usize)> {
    let (data_len, len) = parse_uint_minor(minor, data)?;
    let end = usize::try_from(data_len)
        .ok()
        .and_then(|l| l.checked_add(len))
        .ok_or(Error::NotEnoughData)?;
    data.get(len..end)
        .map(|d| (d, end))
        .ok_or(Error::NotEnoughData)
}

/// The chunks of an indefinite-length string, each with its offset relative
/// to `data`, and the length consumed including the break.
fn parse_data_chunked(major: u8, data: &[u8]) -> Result<(Vec<(usize, &[u8])>, usize)> {
    let mut chunks = Vec::new();
    let mut offset = 0;
    loop {
        let b = *data.get(offset).ok_or(Error::NotEnoughData)?;
        offset += 1;
        if b == 0xFF {
            break Ok((chunks, offset));
        }
        if b >> 5 != major || b & 0x1F == 31 {
            return Err(Error::InvalidChunk);
        }

        let (chunk, chunk_len) = parse_data_minor(b & 0x1F, &data[offset..])?;
        chunks.push((offset + chunk_len - chunk.len(), chunk));
        offset += chunk_len;
    }
}

fn to_text(data: &[u8], offset: usize) -> Result<&str> {
    core::str::from_utf8(data).map_err(|e| Error::InvalidUtf8(offset + e.valid_up_to()))
}

/// An array, map or tag whose content is still being read.
struct Frame {
    start: usize,
    open: Open,
}

impl Frame {
    fn is_full(&self) -> bool {
        matches!(
            self.open,
            Open::Array {
                remaining: Some(0),
                ..
            } | Open::Map {
                remaining: Some(0),
                ..
            }
        )
    }

    fn awaits_break(&self) -> bool {
        matches!(
            self.open,
            Open::Array {
                remaining: None,
                ..
            } | Open::Map {
                remaining: None,
                key: None,
                ..
            }
        )
    }
}

enum Open {
    Array {
        items: Vec<Value>,
        remaining: Option<usize>,
    },
    Map {
        map: Map,
        remaining: Option<usize>,
        key: Option<(Value, usize)>,
    },
    Tag {
        tag: u64,
        slot: Option<usize>,
        content: Option<Value>,
    },
}

enum Head {
    Item(Value),
    Open(Open),
    Break,
}

/// Counts one more entry, returning true when none remain.
fn counted(remaining: &mut Option<usize>) -> bool {
    match remaining {
        Some(n) => {
            *n = n.saturating_sub(1);
            *n == 0
        }
        None => false,
    }
}

struct Decoder<'a> {
    data: &'a [u8],
    offset: usize,
    options: EncodeOptions,
    strings: StringRefs,
    shared: SharedRefs,
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8], options: &EncodeOptions) -> Self {
        Self {
            data,
            offset: 0,
            options: *options,
            strings: StringRefs::default(),
            shared: SharedRefs::default(),
        }
    }

    fn rest(&self) -> &'a [u8] {
        self.data.get(self.offset..).unwrap_or_default()
    }

    fn uint(&mut self, minor: u8) -> Result<u64> {
        let (v, len) = parse_uint_minor(minor, self.rest())?;
        self.offset += len;
        Ok(v)
    }

    /// Reads one data item.
    ///
    /// Arrays, maps and tags still being read are held on `stack` rather
    /// than in native stack frames, so deep nesting costs heap only.
    fn item(&mut self) -> Result<Value> {
        let mut stack: Vec<Frame> = Vec::new();
        loop {
            let start = self.offset;
            let (mut value, mut at) = match self.head()? {
                Head::Item(value) => (value, start),
                Head::Break => match stack.pop() {
                    Some(frame) if frame.awaits_break() => (self.close(frame.open)?, frame.start),
                    _ => {
                        return Err(Error::syntax(
                            start,
                            "Break outside an indefinite-length item",
                        ));
                    }
                },
                Head::Open(open) => {
                    if stack.len() >= MAX_NESTING {
                        return Err(Error::NestingTooDeep);
                    }
                    let frame = Frame { start, open };
                    if !frame.is_full() {
                        stack.push(frame);
                        continue;
                    }
                    (self.close(frame.open)?, start)
                }
            };

            // Hand the finished item up, closing each container it fills
            loop {
                let Some(frame) = stack.last_mut() else {
                    return Ok(value);
                };
                if !self.accept(&mut frame.open, value, at)? {
                    break;
                }
                let Some(frame) = stack.pop() else {
                    break;
                };
                at = frame.start;
                value = self.close(frame.open)?;
            }
        }
    }

    /// Reads the head of one data item: a complete scalar or string, the
    /// start of an array, map or tag, or a break.
    fn head(&mut self) -> Result<Head> {
        let b = *self.data.get(self.offset).ok_or(Error::NotEnoughData)?;
        self.offset += 1;
        let value = match (b >> 5, b & 0x1F) {
            (_, minor @ 28..=30) => return Err(Error::InvalidMinorValue(minor)),
            (0, minor) => Value::Unsigned(self.uint(minor)?),
            (1, minor) => Value::Negative(self.uint(minor)?),
            (2, 31) => {
                /* Indefinite length byte string */
                let (chunks, len) = parse_data_chunked(2, self.rest())?;
                let v = chunks.into_iter().fold(Vec::new(), |mut v, (_, c)| {
                    v.extend_from_slice(c);
                    v
                });
                self.offset += len;
                self.string(Value::Bytes(v))
            }
            (2, minor) => {
                let (t, len) = parse_data_minor(minor, self.rest())?;
                self.offset += len;
                self.string(Value::Bytes(t.to_vec()))
            }
            (3, 31) => {
                /* Indefinite length text string */
                let base = self.offset;
                let (chunks, len) = parse_data_chunked(3, self.rest())?;
                let mut s = String::new();
                for (at, c) in chunks {
                    s.push_str(to_text(c, base + at)?);
                }
                self.offset += len;
                self.string(Value::Text(s))
            }
            (3, minor) => {
                let (t, len) = parse_data_minor(minor, self.rest())?;
                let s = to_text(t, self.offset + len - t.len())?;
                self.offset += len;
                self.string(Value::Text(s.to_string()))
            }
            (4, minor) => {
                let remaining = self.count(minor)?;
                let items = Vec::with_capacity(remaining.unwrap_or(0).min(self.rest().len()));
                return Ok(Head::Open(Open::Array { items, remaining }));
            }
            (5, minor) => {
                let remaining = self.count(minor)?;
                let map = Map::with_capacity(remaining.unwrap_or(0).min(self.rest().len() / 2));
                return Ok(Head::Open(Open::Map {
                    map,
                    remaining,
                    key: None,
                }));
            }
            (6, minor) => {
                let tag = self.uint(minor)?;
                let slot = match tag {
                    tags::STRING_REF_NAMESPACE => {
                        self.strings.push();
                        None
                    }
                    tags::SHAREABLE if self.options.resolve_references() => {
                        Some(self.shared.reserve())
                    }
                    _ => None,
                };
                return Ok(Head::Open(Open::Tag {
                    tag,
                    slot,
                    content: None,
                }));
            }
            (7, minor @ 0..=19) => Value::Simple(minor),
            (7, 20) => Value::Bool(false),
            (7, 21) => Value::Bool(true),
            (7, 22) => Value::Null,
            (7, 23) => Value::Undefined,
            (7, 24) => {
                let v = *self.data.get(self.offset).ok_or(Error::NotEnoughData)?;
                if v < 32 {
                    return Err(Error::InvalidSimpleValue(v));
                }
                self.offset += 1;
                Value::Simple(v)
            }
            (7, 25) => {
                /* FP16 */
                let v = half::f16::from_bits(self.uint(25)? as u16);
                Value::Float(v.into())
            }
            (7, 26) => {
                /* FP32 */
                let v = f32::from_bits(self.uint(26)? as u32);
                Value::Float(v.into())
            }
            (7, 27) => Value::Float(f64::from_bits(self.uint(27)?)),
            (7, _) => return Ok(Head::Break),
            (8.., _) => unreachable!(),
        };
        Ok(Head::Item(value))
    }

    fn count(&mut self, minor: u8) -> Result<Option<usize>> {
        if minor == 31 {
            return Ok(None);
        }
        let count = self.uint(minor)?;
        usize::try_from(count)
            .map(Some)
            .map_err(|_| Error::NotEnoughData)
    }

    fn string(&mut self, value: Value) -> Value {
        self.strings.record(&value);
        value
    }

    /// Adds a finished item to `open`, returning true once it is complete.
    fn accept(&self, open: &mut Open, value: Value, at: usize) -> Result<bool> {
        match open {
            Open::Array { items, remaining } => {
                items.push(value);
                Ok(counted(remaining))
            }
            Open::Map {
                map,
                remaining,
                key,
            } => {
                let Some((k, key_start)) = key.take() else {
                    *key = Some((value, at));
                    return Ok(false);
                };
                if self.options.allow_duplicate_keys() {
                    map.insert(k, value);
                } else {
                    map.try_insert(k, value).inspect_err(|_| {
                        tracing::debug!(offset = key_start, "Duplicate map key");
                    })?;
                }
                Ok(counted(remaining))
            }
            Open::Tag { content, .. } => {
                *content = Some(value);
                Ok(true)
            }
        }
    }

    fn close(&mut self, open: Open) -> Result<Value> {
        let (tag, slot, content) = match open {
            Open::Array { items, .. } => return Ok(Value::Array(items)),
            Open::Map { map, .. } => return Ok(Value::Map(map)),
            Open::Tag { tag, slot, content } => {
                (tag, slot, content.ok_or(Error::NotEnoughData)?)
            }
        };
        match tag {
            tags::STRING_REF_NAMESPACE => {
                self.strings.pop();
                Ok(content)
            }
            tags::STRING_REF => self.strings.get(&content),
            tags::SHARED_REF if self.options.resolve_references() => {
                self.shared.resolve(&content)
            }
            _ => match slot {
                Some(slot) => {
                    self.shared.fill(slot, content.clone());
                    Ok(content)
                }
                None => {
                    tags::check(tag, &content)?;
                    Ok(Value::tagged(tag, content))
                }
            },
        }
    }

    fn top_level(&mut self) -> Result<Value> {
        let start = self.offset;
        let value = self.item()?;
        if self.options.ctap2_canonical() {
            let canonical = canonical::encode(&value).map_err(|_| Error::NotCanonical)?;
            if canonical != self.data[start..self.offset] {
                return Err(Error::NotCanonical);
            }
        }
        Ok(value)
    }

    fn failed(&self, e: Error) -> Error {
        tracing::debug!(offset = self.offset, error = %e, "CBOR decode failed");
        e
    }
}

/// Parses exactly one data item from `data`.
///
/// Empty input yields `None` when the options allow it.
pub fn decode(data: &[u8], options: &EncodeOptions) -> Result<Option<Value>> {
    if data.is_empty() {
        return if options.allow_empty() {
            Ok(None)
        } else {
            Err(Error::NotEnoughData)
        };
    }

    let mut decoder = Decoder::new(data, options);
    let value = decoder.top_level().map_err(|e| decoder.failed(e))?;
    if decoder.offset != data.len() {
        return Err(decoder.failed(Error::TrailingData(decoder.offset)));
    }
    Ok(Some(value))
}

/// Parses a CBOR sequence: zero or more concatenated data items.
pub fn decode_sequence(data: &[u8], options: &EncodeOptions) -> Result<Vec<Value>> {
    let mut values = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let (value, len) = parse_value(&data[offset..], options)?;
        values.push(value);
        offset += len;
    }
    Ok(values)
}

/// Parses the first data item in `data`, returning it with the number of
/// bytes it occupies.
pub fn parse_value(data: &[u8], options: &EncodeOptions) -> Result<(Value, usize)> {
    let mut decoder = Decoder::new(data, options);
    let value = decoder.top_level().map_err(|e| decoder.failed(e))?;
    Ok((value, decoder.offset))
}

/// Decodes one data item and converts it to `T`.
pub fn parse<T>(data: &[u8]) -> Result<T>
where
    T: FromCbor,
{
    match decode(data, &EncodeOptions::new())? {
        Some(value) => T::from_value(value),
        None => Err(Error::NotEnoughData),
    }
}

impl FromCbor for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromCbor for u64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Unsigned(v) => Ok(v),
            Value::Negative(_) => Err(Error::Overflow("u64")),
            _ => Err(Error::IncorrectType),
        }
    }
}

impl FromCbor for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Unsigned(_) | Value::Negative(_) => value.as_i64().ok_or(Error::Overflow("i64")),
            _ => Err(Error::IncorrectType),
        }
    }
}

macro_rules! impl_narrow_from_cbor {
    ($via:ty => $($ty:ty),*) => {
        $(
            impl FromCbor for $ty {
                fn from_value(value: Value) -> Result<Self> {
                    <$via>::from_value(value)?
                        .try_into()
                        .map_err(|_| Error::Overflow(stringify!($ty)))
                }
            }
        )*
    };
}

impl_narrow_from_cbor!(u64 => u8, u16, u32, usize);
impl_narrow_from_cbor!(i64 => i8, i16, i32, isize);

impl FromCbor for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(f),
            _ => Err(Error::IncorrectType),
        }
    }
}

impl FromCbor for bool {
    fn from_value(value: Value) -> Result<Self> {
        value.as_bool().ok_or(Error::IncorrectType)
    }
}

impl FromCbor for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            _ => Err(Error::IncorrectType),
        }
    }
}

impl FromCbor for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(b),
            _ => Err(Error::IncorrectType),
        }
    }
}

impl<T> FromCbor for Option<T>
where
    T: FromCbor,
{
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}
