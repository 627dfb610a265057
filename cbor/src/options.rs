/*!
Immutable option sets for the CBOR and JSON codecs.

Both option types can be built programmatically with the `with_*` methods or
parsed from an options string of semicolon-separated `key=value` pairs, e.g.
`"allowduplicatekeys=true;resolvereferences=on"`. Keys are case-insensitive,
boolean values are true for `1`, `true`, `yes` or `on` and false otherwise,
and unknown keys are ignored.
*/

use super::error::{Error, Result};
use core::fmt;
use core::str::FromStr;

fn pairs(s: &str) -> impl Iterator<Item = (String, &str)> {
    s.split(';').filter_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        let key = key.trim();
        (!key.is_empty()).then(|| (key.to_ascii_lowercase(), value.trim()))
    })
}

fn parse_bool(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}

/// Options controlling CBOR encoding and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    allow_duplicate_keys: bool,
    use_indef_length_strings: bool,
    ctap2_canonical: bool,
    resolve_references: bool,
    allow_empty: bool,
}

impl EncodeOptions {
    pub const fn new() -> Self {
        Self {
            allow_duplicate_keys: false,
            use_indef_length_strings: false,
            ctap2_canonical: false,
            resolve_references: false,
            allow_empty: false,
        }
    }

    /// Decoding keeps the last value for a repeated map key instead of failing.
    pub const fn allow_duplicate_keys(&self) -> bool {
        self.allow_duplicate_keys
    }

    /// Text strings are written as indefinite-length chunked strings.
    pub const fn use_indef_length_strings(&self) -> bool {
        self.use_indef_length_strings
    }

    /// Encoding produces, and decoding requires, CTAP2 canonical CBOR.
    pub const fn ctap2_canonical(&self) -> bool {
        self.ctap2_canonical
    }

    /// Decoding replaces shared references (tag 29) with the shared value.
    ///
    /// Resolved output can be orders of magnitude larger than the input; callers
    /// serializing it to a size-bounded sink must apply their own ceiling.
    pub const fn resolve_references(&self) -> bool {
        self.resolve_references
    }

    /// Decoding empty input yields no value instead of an error.
    pub const fn allow_empty(&self) -> bool {
        self.allow_empty
    }

    pub const fn with_allow_duplicate_keys(mut self, value: bool) -> Self {
        self.allow_duplicate_keys = value;
        self
    }

    pub const fn with_use_indef_length_strings(mut self, value: bool) -> Self {
        self.use_indef_length_strings = value;
        self
    }

    pub const fn with_ctap2_canonical(mut self, value: bool) -> Self {
        self.ctap2_canonical = value;
        self
    }

    pub const fn with_resolve_references(mut self, value: bool) -> Self {
        self.resolve_references = value;
        self
    }

    pub const fn with_allow_empty(mut self, value: bool) -> Self {
        self.allow_empty = value;
        self
    }
}

impl FromStr for EncodeOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut options = Self::new();
        for (key, value) in pairs(s) {
            match key.as_str() {
                "allowduplicatekeys" => options.allow_duplicate_keys = parse_bool(value),
                "useindeflengthstrings" => options.use_indef_length_strings = parse_bool(value),
                "ctap2canonical" => options.ctap2_canonical = parse_bool(value),
                "resolvereferences" => options.resolve_references = parse_bool(value),
                "allowempty" => options.allow_empty = parse_bool(value),
                _ => tracing::warn!("Ignoring unknown CBOR option '{key}'"),
            }
        }
        Ok(options)
    }
}

impl fmt::Display for EncodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allowduplicatekeys={};useindeflengthstrings={};ctap2canonical={};resolvereferences={};allowempty={}",
            self.allow_duplicate_keys,
            self.use_indef_length_strings,
            self.ctap2_canonical,
            self.resolve_references,
            self.allow_empty
        )
    }
}

/// How JSON number literals are converted to values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberConversion {
    /// The exact value in the narrowest exact representation: an integer when
    /// the literal's digits carry no net exponent, otherwise a decimal fraction.
    #[default]
    Full,
    /// Always the nearest 64-bit float.
    Double,
    /// An integer when the value is integral and within +/-(2^53 - 1),
    /// otherwise the nearest 64-bit float.
    IntOrFloat,
    /// The nearest 64-bit float, re-expressed as an integer when that float is
    /// integral and within +/-(2^53 - 1).
    IntOrFloatFromDouble,
    /// A decimal fraction rounded to IEEE 754 decimal128 precision and range.
    Decimal128,
}

impl FromStr for NumberConversion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        const MODES: [(&str, NumberConversion); 5] = [
            ("full", NumberConversion::Full),
            ("double", NumberConversion::Double),
            ("intorfloat", NumberConversion::IntOrFloat),
            ("intorfloatfromdouble", NumberConversion::IntOrFloatFromDouble),
            ("decimal128", NumberConversion::Decimal128),
        ];
        MODES
            .iter()
            .find(|(name, _)| s.eq_ignore_ascii_case(name))
            .map(|(_, mode)| *mode)
            .ok_or_else(|| Error::Config(format!("unrecognized number conversion '{s}'")))
    }
}

impl fmt::Display for NumberConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NumberConversion::Full => "full",
            NumberConversion::Double => "double",
            NumberConversion::IntOrFloat => "intorfloat",
            NumberConversion::IntOrFloatFromDouble => "intorfloatfromdouble",
            NumberConversion::Decimal128 => "decimal128",
        })
    }
}

/// Options controlling JSON parsing and writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    preserve_negative_zero: bool,
    allow_duplicate_keys: bool,
    base64_padding: bool,
    replace_surrogates: bool,
    number_conversion: NumberConversion,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonOptions {
    pub const fn new() -> Self {
        Self {
            preserve_negative_zero: true,
            allow_duplicate_keys: false,
            base64_padding: false,
            replace_surrogates: false,
            number_conversion: NumberConversion::Full,
        }
    }

    /// Negative zero literals keep their sign in modes that can represent it.
    pub const fn preserve_negative_zero(&self) -> bool {
        self.preserve_negative_zero
    }

    /// A repeated object key replaces the earlier value instead of failing.
    pub const fn allow_duplicate_keys(&self) -> bool {
        self.allow_duplicate_keys
    }

    /// Accepted for compatibility; byte string padding follows the tag in use.
    pub const fn base64_padding(&self) -> bool {
        self.base64_padding
    }

    /// Unpaired surrogates are written as U+FFFD instead of failing.
    pub const fn replace_surrogates(&self) -> bool {
        self.replace_surrogates
    }

    pub const fn number_conversion(&self) -> NumberConversion {
        self.number_conversion
    }

    pub const fn with_preserve_negative_zero(mut self, value: bool) -> Self {
        self.preserve_negative_zero = value;
        self
    }

    pub const fn with_allow_duplicate_keys(mut self, value: bool) -> Self {
        self.allow_duplicate_keys = value;
        self
    }

    pub const fn with_base64_padding(mut self, value: bool) -> Self {
        self.base64_padding = value;
        self
    }

    pub const fn with_replace_surrogates(mut self, value: bool) -> Self {
        self.replace_surrogates = value;
        self
    }

    pub const fn with_number_conversion(mut self, value: NumberConversion) -> Self {
        self.number_conversion = value;
        self
    }
}

impl FromStr for JsonOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut options = Self::new();
        for (key, value) in pairs(s) {
            match key.as_str() {
                "preservenegativezero" => options.preserve_negative_zero = parse_bool(value),
                "allowduplicatekeys" => options.allow_duplicate_keys = parse_bool(value),
                "base64padding" => options.base64_padding = parse_bool(value),
                "replacesurrogates" => options.replace_surrogates = parse_bool(value),
                "numberconversion" => options.number_conversion = value.parse()?,
                _ => tracing::warn!("Ignoring unknown JSON option '{key}'"),
            }
        }
        Ok(options)
    }
}

impl fmt::Display for JsonOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "preservenegativezero={};allowduplicatekeys={};base64padding={};replacesurrogates={};numberconversion={}",
            self.preserve_negative_zero,
            self.allow_duplicate_keys,
            self.base64_padding,
            self.replace_surrogates,
            self.number_conversion
        )
    }
}
