use super::error::{Error, Result};
use super::value::Value;
use core::hash::{BuildHasher, Hash, Hasher};
use hashbrown::{DefaultHashBuilder, HashTable};

/// A CBOR map: keys are unique, iteration follows insertion order, and
/// equality ignores order.
#[derive(Clone, Default)]
pub struct Map {
    entries: Vec<(Value, Value)>,
    index: HashTable<usize>,
    hasher: DefaultHashBuilder,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashTable::with_capacity(capacity),
            hasher: DefaultHashBuilder::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, key: &Value) -> Option<usize> {
        let hash = self.hasher.hash_one(key);
        self.index
            .find(hash, |&i| self.entries[i].0 == *key)
            .copied()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.find(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.find(key).map(|i| &mut self.entries[i].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.find(key).is_some()
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.find(&key) {
            Some(i) => Some(core::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.push(key, value);
                None
            }
        }
    }

    /// Inserts a new entry, failing if `key` is already present.
    pub fn try_insert(&mut self, key: Value, value: Value) -> Result<()> {
        if self.contains_key(&key) {
            return Err(Error::DuplicateKey);
        }
        self.push(key, value);
        Ok(())
    }

    fn push(&mut self, key: Value, value: Value) {
        let Self {
            entries,
            index,
            hasher,
        } = self;
        let hash = hasher.hash_one(&key);
        index.insert_unique(hash, entries.len(), |&i| hasher.hash_one(&entries[i].0));
        entries.push((key, value));
    }

    pub fn iter(&self) -> core::slice::Iter<'_, (Value, Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl Eq for Map {}

impl Hash for Map {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-insensitive: combine per-entry hashes from a fixed-key hasher
        let combined = self.entries.iter().fold(0u64, |acc, entry| {
            let mut h = std::collections::hash_map::DefaultHasher::new();
            entry.hash(&mut h);
            acc.wrapping_add(h.finish())
        });
        state.write_usize(self.len());
        state.write_u64(combined);
    }
}

impl core::fmt::Debug for Map {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl FromIterator<(Value, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        let mut map = Map::new();
        map.extend(iter);
        map
    }
}

impl Extend<(Value, Value)> for Map {
    fn extend<T: IntoIterator<Item = (Value, Value)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Map {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = &'a (Value, Value);
    type IntoIter = core::slice::Iter<'a, (Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insertion_order_and_replace() {
        let mut m = Map::new();
        m.insert("b".into(), 1.into());
        m.insert("a".into(), 2.into());
        assert_eq!(m.insert("b".into(), 3.into()), Some(Value::from(1)));
        let keys: Vec<_> = m.keys().cloned().collect();
        assert_eq!(keys, vec![Value::from("b"), Value::from("a")]);
        assert_eq!(m.get(&"b".into()), Some(&Value::from(3)));
    }

    #[test]
    fn duplicate_rejected() {
        let mut m = Map::new();
        m.try_insert(0.into(), Value::Null).unwrap();
        assert!(matches!(
            m.try_insert(0.into(), Value::Null),
            Err(Error::DuplicateKey)
        ));
        // A tagged key is a different key
        m.try_insert(Value::tagged(1, 0.into()), Value::Null).unwrap();
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn equality_ignores_order() {
        let a: Map = [("x".into(), 1.into()), ("y".into(), 2.into())]
            .into_iter()
            .collect();
        let b: Map = [("y".into(), 2.into()), ("x".into(), 1.into())]
            .into_iter()
            .collect();
        assert_eq!(a, b);
        assert_eq!(Value::Map(a.clone()), Value::Map(b));

        let mut m = Map::new();
        m.insert(Value::Map(a), Value::Null);
        let c: Map = [("y".into(), 2.into()), ("x".into(), 1.into())]
            .into_iter()
            .collect();
        assert!(m.contains_key(&Value::Map(c)));
    }
}
