//! Reference tables for the string reference (tags 256/25) and shared value
//! (tags 28/29) schemes. Both live for a single decode call.

use super::error::{Error, Result};
use super::value::Value;

/// Upper bound on the number of data items produced by resolving shared
/// references in one decode.
pub(crate) const MAX_EXPANSION: usize = 1 << 20;

/// Shortest string worth recording in a table that already holds `len`
/// entries: a reference must never be longer than the string it replaces.
fn min_string_len(len: usize) -> usize {
    match len as u64 {
        0..24 => 3,
        24..256 => 4,
        256..65_536 => 5,
        65_536..4_294_967_296 => 7,
        _ => 11,
    }
}

/// One table per enclosing tag 256.
#[derive(Default)]
pub(crate) struct StringRefs {
    stack: Vec<Vec<Value>>,
}

impl StringRefs {
    pub fn push(&mut self) {
        self.stack.push(Vec::new())
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Records a byte or text string in the innermost namespace, if any.
    pub fn record(&mut self, value: &Value) {
        let Some(table) = self.stack.last_mut() else {
            return;
        };
        let len = match value {
            Value::Bytes(b) => b.len(),
            Value::Text(s) => s.len(),
            _ => return,
        };
        if len >= min_string_len(table.len()) {
            table.push(value.clone());
        }
    }

    pub fn get(&self, index: &Value) -> Result<Value> {
        let table = self
            .stack
            .last()
            .ok_or(Error::InvalidReference("string reference outside a namespace"))?;
        let Value::Unsigned(index) = index else {
            return Err(Error::InvalidTag {
                tag: super::tags::STRING_REF,
                reason: "index must be an unsigned integer",
            });
        };
        usize::try_from(*index)
            .ok()
            .and_then(|i| table.get(i))
            .cloned()
            .ok_or(Error::InvalidReference("unknown string reference"))
    }
}

/// Shareable values in the order their tag 28 was read.
///
/// A slot is `None` while its value is still being decoded, so a reference
/// to it from inside itself is detected as a cycle.
pub(crate) struct SharedRefs {
    slots: Vec<Option<Value>>,
    budget: usize,
}

impl Default for SharedRefs {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            budget: MAX_EXPANSION,
        }
    }
}

impl SharedRefs {
    pub fn reserve(&mut self) -> usize {
        self.slots.push(None);
        self.slots.len() - 1
    }

    pub fn fill(&mut self, slot: usize, value: Value) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = Some(value);
        }
    }

    /// A copy of the shared value at `index`, charged against the expansion
    /// budget.
    pub fn resolve(&mut self, index: &Value) -> Result<Value> {
        let Value::Unsigned(index) = index else {
            return Err(Error::InvalidTag {
                tag: super::tags::SHARED_REF,
                reason: "index must be an unsigned integer",
            });
        };
        let slot = usize::try_from(*index)
            .ok()
            .and_then(|i| self.slots.get(i))
            .ok_or(Error::InvalidReference("unknown shared reference"))?;
        let value = slot
            .as_ref()
            .ok_or(Error::InvalidReference("circular shared reference"))?;

        let cost = item_count(value);
        self.budget = self
            .budget
            .checked_sub(cost)
            .ok_or(Error::ResourceExhausted("shared reference expansion"))?;
        tracing::trace!(index, cost, "Resolved shared reference");
        Ok(value.clone())
    }
}

fn item_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.iter().map(item_count).sum::<usize>() + 1,
        Value::Map(entries) => {
            entries
                .iter()
                .map(|(k, v)| item_count(k) + item_count(v))
                .sum::<usize>()
                + 1
        }
        Value::Tagged(_, inner) => item_count(inner) + 1,
        _ => 1,
    }
}
