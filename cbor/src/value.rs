use super::error::{Error, Result};
use super::map::Map;
use super::number::Number;
use core::hash::{Hash, Hasher};

/// An in-memory CBOR data item.
///
/// Containers own their children, so a value can never contain itself.
#[derive(Clone, Debug)]
pub enum Value {
    /// Major type 0.
    Unsigned(u64),
    /// Major type 1, representing `-1 - n`.
    Negative(u64),
    /// Major type 7 floating point, with the bit pattern preserved.
    Float(f64),
    Bool(bool),
    Null,
    Undefined,
    /// Any other simple value: 0..=19 or 32..=255.
    Simple(u8),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<Value>),
    Map(Map),
    Tagged(u64, Box<Value>),
}

impl Value {
    /// Wraps `value` in `tag`.
    pub fn tagged(tag: u64, value: Value) -> Self {
        Value::Tagged(tag, Box::new(value))
    }

    /// Creates a simple value, mapping 20..=23 onto their named forms.
    pub fn simple(value: u8) -> Result<Self> {
        match value {
            20 => Ok(Value::Bool(false)),
            21 => Ok(Value::Bool(true)),
            22 => Ok(Value::Null),
            23 => Ok(Value::Undefined),
            24..=31 => Err(Error::InvalidSimpleValue(value)),
            _ => Ok(Value::Simple(value)),
        }
    }

    /// The CBOR major type of the outermost data item.
    pub fn major_type(&self) -> u8 {
        match self {
            Value::Unsigned(_) => 0,
            Value::Negative(_) => 1,
            Value::Bytes(_) => 2,
            Value::Text(_) => 3,
            Value::Array(_) => 4,
            Value::Map(_) => 5,
            Value::Tagged(..) => 6,
            Value::Float(_)
            | Value::Bool(_)
            | Value::Null
            | Value::Undefined
            | Value::Simple(_) => 7,
        }
    }

    /// The value with every enclosing tag removed.
    pub fn untagged(&self) -> &Value {
        let mut v = self;
        while let Value::Tagged(_, inner) = v {
            v = inner;
        }
        v
    }

    /// The tags wrapping this value, outermost first.
    pub fn tags(&self) -> Vec<u64> {
        let mut tags = Vec::new();
        let mut v = self;
        while let Value::Tagged(tag, inner) = v {
            tags.push(*tag);
            v = inner;
        }
        tags
    }

    pub fn outermost_tag(&self) -> Option<u64> {
        match self {
            Value::Tagged(tag, _) => Some(*tag),
            _ => None,
        }
    }

    pub fn has_tag(&self, tag: u64) -> bool {
        let mut v = self;
        while let Value::Tagged(t, inner) = v {
            if *t == tag {
                return true;
            }
            v = inner;
        }
        false
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for arrays and maps, ignoring tags.
    pub fn is_container(&self) -> bool {
        matches!(self.untagged(), Value::Array(_) | Value::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Unsigned(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Unsigned(n) => i64::try_from(*n).ok(),
            Value::Negative(n) => i64::try_from(*n).ok().map(|n| -1 - n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// True if this value has a numeric interpretation, see [`Number::from_value`].
    pub fn is_number(&self) -> bool {
        Number::from_value(self).is_ok()
    }

    /// The numeric view of this value.
    pub fn to_number(&self) -> Result<Number> {
        Number::from_value(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unsigned(a), Value::Unsigned(b)) | (Value::Negative(a), Value::Negative(b)) => {
                a == b
            }
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
            (Value::Simple(a), Value::Simple(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Tagged(ta, a), Value::Tagged(tb, b)) => ta == tb && a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Unsigned(n) | Value::Negative(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null | Value::Undefined => {}
            Value::Simple(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Text(s) => s.hash(state),
            Value::Array(a) => a.hash(state),
            Value::Map(m) => m.hash(state),
            Value::Tagged(tag, inner) => {
                tag.hash(state);
                inner.hash(state)
            }
        }
    }
}

macro_rules! impl_from_uint {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Unsigned(value as u64)
                }
            }
        )*
    };
}

impl_from_uint!(u8, u16, u32, u64, usize);

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    let value = value as i64;
                    if value >= 0 {
                        Value::Unsigned(value as u64)
                    } else {
                        Value::Negative(!value as u64)
                    }
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, isize);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        value.to_value()
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl FromIterator<(Value, Value)> for Value {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        Value::Map(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn integer_conversions() {
        assert_eq!(Value::from(-1), Value::Negative(0));
        assert_eq!(Value::from(i64::MIN), Value::Negative(i64::MAX as u64));
        assert_eq!(Value::from(i64::MIN).as_i64(), Some(i64::MIN));
        assert_eq!(Value::Negative(u64::MAX).as_i64(), None);
        assert_eq!(Value::from(7u8).as_u64(), Some(7));
    }

    #[test]
    fn float_identity_by_bits() {
        assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
        assert_ne!(Value::from(0.0), Value::from(-0.0));
    }

    #[test]
    fn tags() {
        let v = Value::tagged(1, Value::tagged(2, Value::from("x")));
        assert_eq!(v.tags(), vec![1, 2]);
        assert_eq!(v.untagged(), &Value::from("x"));
        assert!(v.has_tag(2));
        assert_eq!(v.outermost_tag(), Some(1));
        assert_eq!(v.major_type(), 6);
    }

    #[test]
    fn simple_values() {
        assert_eq!(Value::simple(22).unwrap(), Value::Null);
        assert_eq!(Value::simple(16).unwrap(), Value::Simple(16));
        assert!(Value::simple(25).is_err());
    }
}
