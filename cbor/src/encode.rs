use super::canonical;
use super::error::Result;
use super::options::EncodeOptions;
use super::value::Value;

/// Longest chunk written for an indefinite-length text string.
const TEXT_CHUNK_LEN: usize = 1024;

pub trait ToCbor {
    fn to_cbor(&self, encoder: &mut Encoder);
}

pub struct Encoder {
    data: Vec<u8>,
    options: EncodeOptions,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_options(EncodeOptions::new())
    }

    pub fn with_options(options: EncodeOptions) -> Self {
        Self {
            data: Vec::new(),
            options,
        }
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub(crate) fn emit_uint_minor(&mut self, major: u8, val: u64) {
        if val < 24 {
            self.data.push((major << 5) | (val as u8))
        } else if val <= u8::MAX as u64 {
            self.data.push((major << 5) | 24u8);
            self.data.push(val as u8)
        } else if val <= u16::MAX as u64 {
            self.data.push((major << 5) | 25u8);
            self.data.extend((val as u16).to_be_bytes())
        } else if val <= u32::MAX as u64 {
            self.data.push((major << 5) | 26u8);
            self.data.extend((val as u32).to_be_bytes())
        } else {
            self.data.push((major << 5) | 27u8);
            self.data.extend(val.to_be_bytes())
        }
    }

    fn emit_tags<I>(&mut self, tags: I)
    where
        I: IntoIterator<Item = u64>,
    {
        for tag in tags {
            self.emit_uint_minor(6, tag);
        }
    }

    /// Writes a double in its full 8-byte form.
    pub fn emit_f64_full(&mut self, value: f64) {
        self.data.push((7 << 5) | 27);
        self.data.extend(value.to_be_bytes())
    }

    pub fn emit_raw_slice(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data)
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        value.to_cbor(self)
    }

    pub fn emit_tagged<T, I>(&mut self, value: &T, tags: I)
    where
        T: ToCbor + ?Sized,
        I: IntoIterator<Item = u64>,
    {
        self.emit_tags(tags);
        self.emit(value)
    }

    fn emit_text_stream<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextStream),
    {
        let mut s = TextStream::new(self);
        f(&mut s);
        s.end()
    }

    pub fn emit_array<F>(&mut self, count: usize, f: F)
    where
        F: FnOnce(&mut Array),
    {
        let mut a = Array::new(self, count);
        f(&mut a);
        a.end()
    }

    pub fn emit_map<F>(&mut self, count: usize, f: F)
    where
        F: FnOnce(&mut Map),
    {
        let mut m = Map::new(self, count);
        f(&mut m);
        m.end()
    }
}

/// The chunks of an indefinite-length text string.
struct TextStream<'a> {
    encoder: &'a mut Encoder,
}

impl<'a> TextStream<'a> {
    fn new(encoder: &'a mut Encoder) -> Self {
        encoder.data.push((3 << 5) | 31);
        Self { encoder }
    }

    fn emit(&mut self, s: &str) {
        self.encoder.emit_uint_minor(3, s.len() as u64);
        self.encoder.data.extend_from_slice(s.as_bytes());
    }

    fn end(self) {
        self.encoder.data.push(0xFF)
    }
}

pub struct Sequence<'a, const D: usize> {
    encoder: &'a mut Encoder,
    count: usize,
    idx: usize,
}

pub type Array<'a> = Sequence<'a, 1>;
pub type Map<'a> = Sequence<'a, 2>;

impl<'a, const D: usize> Sequence<'a, D> {
    fn new(encoder: &'a mut Encoder, count: usize) -> Self {
        encoder.emit_uint_minor(if D == 1 { 4 } else { 5 }, count as u64);
        Self {
            encoder,
            count: count * D,
            idx: 0,
        }
    }

    fn next_field(&mut self) -> &mut Encoder {
        self.idx += 1;
        if self.idx > self.count {
            panic!("Too many items added to definite length sequence")
        }
        self.encoder
    }

    fn end(self) {
        if self.idx != self.count {
            panic!(
                "Definite length sequence is short of items: {}, expected {}",
                self.idx, self.count
            );
        }
    }

    pub fn emit_raw_slice(&mut self, data: &[u8]) {
        self.next_field().emit_raw_slice(data)
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        self.next_field().emit(value)
    }

    pub fn emit_tagged<T, I>(&mut self, value: &T, tags: I)
    where
        T: ToCbor + ?Sized,
        I: IntoIterator<Item = u64>,
    {
        self.next_field().emit_tagged(value, tags)
    }

    pub fn emit_array<F>(&mut self, count: usize, f: F)
    where
        F: FnOnce(&mut Array),
    {
        self.next_field().emit_array(count, f)
    }

    pub fn emit_map<F>(&mut self, count: usize, f: F)
    where
        F: FnOnce(&mut Map),
    {
        self.next_field().emit_map(count, f)
    }
}

macro_rules! impl_uint_to_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    encoder.emit_uint_minor(0, *self as u64);
                }
            }
        )*
    };
}

impl_uint_to_cbor!(u8, u16, u32, u64, usize);

fn emit_i64(encoder: &mut Encoder, val: i64) {
    if val >= 0 {
        encoder.emit_uint_minor(0, val as u64);
    } else {
        // -1 - val, without overflowing at i64::MIN
        encoder.emit_uint_minor(1, !val as u64);
    }
}

macro_rules! impl_int_to_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    emit_i64(encoder, *self as i64)
                }
            }
        )*
    };
}

impl_int_to_cbor!(i8, i16, i32, i64, isize);

fn lossless_float_coerce<T>(value: f64) -> Option<T>
where
    T: num_traits::FromPrimitive + Into<f64> + Copy,
{
    match <T as num_traits::FromPrimitive>::from_f64(value) {
        Some(f) if <T as Into<f64>>::into(f) == value => Some(f),
        _ => None,
    }
}

impl ToCbor for f64 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        if let Some(f) = lossless_float_coerce::<half::f16>(*self) {
            encoder.data.push((7 << 5) | 25);
            encoder.data.extend(f.to_be_bytes())
        } else if let Some(f) = lossless_float_coerce::<f32>(*self) {
            encoder.data.push((7 << 5) | 26);
            encoder.data.extend(f.to_be_bytes())
        } else if self.is_nan() && self.to_bits() == f64::NAN.to_bits() {
            // The canonical quiet NaN has a half-precision form
            encoder.data.extend([(7 << 5) | 25, 0x7E, 0x00])
        } else {
            encoder.emit_f64_full(*self)
        }
    }
}

impl ToCbor for f32 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        (*self as f64).to_cbor(encoder)
    }
}

impl ToCbor for bool {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.data.push((7 << 5) | if *self { 21 } else { 20 })
    }
}

impl ToCbor for str {
    fn to_cbor(&self, encoder: &mut Encoder) {
        if !encoder.options.use_indef_length_strings() {
            encoder.emit_uint_minor(3, self.len() as u64);
            return encoder.data.extend_from_slice(self.as_bytes());
        }
        encoder.emit_text_stream(|s| {
            let mut rest = self;
            while !rest.is_empty() {
                // Chunks must each be valid UTF-8
                let mut end = rest.len().min(TEXT_CHUNK_LEN);
                while !rest.is_char_boundary(end) {
                    end -= 1;
                }
                let (chunk, tail) = rest.split_at(end);
                s.emit(chunk);
                rest = tail;
            }
        })
    }
}

impl ToCbor for String {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_str().to_cbor(encoder)
    }
}

impl ToCbor for [u8] {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_uint_minor(2, self.len() as u64);
        encoder.data.extend_from_slice(self)
    }
}

impl ToCbor for Vec<u8> {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_slice().to_cbor(encoder)
    }
}

impl<T> ToCbor for Option<T>
where
    T: ToCbor,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Some(value) => encoder.emit(value),
            None => encoder.data.push((7 << 5) | 22),
        }
    }
}

impl ToCbor for Value {
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Value::Unsigned(n) => encoder.emit_uint_minor(0, *n),
            Value::Negative(n) => encoder.emit_uint_minor(1, *n),
            Value::Float(f) => f.to_cbor(encoder),
            Value::Bool(b) => b.to_cbor(encoder),
            Value::Null => encoder.data.push((7 << 5) | 22),
            Value::Undefined => encoder.data.push((7 << 5) | 23),
            Value::Simple(v) => encoder.emit_uint_minor(7, *v as u64),
            Value::Bytes(b) => b.to_cbor(encoder),
            Value::Text(s) => s.to_cbor(encoder),
            Value::Array(items) => encoder.emit_array(items.len(), |a| {
                for item in items {
                    a.emit(item);
                }
            }),
            Value::Map(entries) => encoder.emit_map(entries.len(), |m| {
                for (k, v) in entries {
                    m.emit(k);
                    m.emit(v);
                }
            }),
            Value::Tagged(tag, inner) => encoder.emit_tagged(inner.as_ref(), [*tag]),
        }
    }
}

pub fn emit<T>(value: &T) -> Vec<u8>
where
    T: ToCbor + ?Sized,
{
    let mut e = Encoder::new();
    e.emit(value);
    e.build()
}

pub fn emit_tagged<T, I>(value: &T, tags: I) -> Vec<u8>
where
    T: ToCbor + ?Sized,
    I: IntoIterator<Item = u64>,
{
    let mut e = Encoder::new();
    e.emit_tagged(value, tags);
    e.build()
}

/// Encodes `value` under `options`; with `ctap2_canonical` set this is
/// [`canonical::encode`] and can fail.
pub fn emit_with_options(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>> {
    if options.ctap2_canonical() {
        return canonical::encode(value);
    }
    let mut e = Encoder::with_options(*options);
    e.emit(value);
    Ok(e.build())
}

macro_rules! impl_collection_emit_functions {
    ($(( $method:ident, $collection_type:ty)),*) => {
        $(
            pub fn $method<F>(count: usize, f: F) -> Vec<u8>
            where
                F: FnOnce(&mut $collection_type),
            {
                let mut e = Encoder::new();
                e.$method(count, f);
                e.build()
            }
        )*
    };
}

impl_collection_emit_functions!((emit_array, Array), (emit_map, Map));

#[cfg(test)]
pub(crate) fn emit_simple_value(value: u8) -> Vec<u8> {
    match value {
        20..=31 => panic!("Invalid simple value, use bool or Option<T>"),
        _ => {
            let mut e = Encoder::new();
            e.emit_uint_minor(7, value as u64);
            e.build()
        }
    }
}
