/*!
CBOR (RFC 8949) and JSON (RFC 8259) codecs over a shared value model.

[`Value`] is the in-memory data item. [`encode`] and [`decode`] move values
to and from CBOR, [`canonical`] produces the CTAP2 canonical form, and
[`json`] parses and writes JSON text. [`Number`] gives every numeric value,
from plain integers to bignums, decimal fractions and rationals, a single
arithmetic and comparison surface.
*/

pub mod canonical;
pub mod decode;
pub mod encode;
pub mod json;
pub mod number;
pub mod options;
pub mod tags;

mod error;
mod map;
mod refs;
mod value;

pub use error::{Error, ErrorClass, Result};
pub use map::Map;
pub use number::{Kind, Number};
pub use options::{EncodeOptions, JsonOptions, NumberConversion};
pub use value::Value;

#[cfg(test)]
mod canonical_tests;



#[cfg(test)]
mod json_tests;

#[cfg(test)]
mod number_tests;
