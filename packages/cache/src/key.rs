//! Composite cache keys.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use metaprop_reflect::Value;

const MULTIPLIER: i64 = 37;
const INITIAL_HASH: i64 = 17;

/// A key built up from any number of components.
///
/// Each [`update`](CacheKey::update) folds the component into a running
/// hash and checksum. Equality checks those, then the component count, and
/// only then compares the components themselves, so unequal keys are
/// usually rejected without touching the values.
///
/// Float components compare by bit pattern, matching how they hash, so a
/// key holding `NaN` equals itself.
#[derive(Clone, Debug)]
pub struct CacheKey {
    hashcode: i64,
    checksum: i64,
    count: usize,
    components: Vec<Value>,
}

impl CacheKey {
    pub fn new() -> Self {
        Self {
            hashcode: INITIAL_HASH,
            checksum: 0,
            count: 0,
            components: Vec::new(),
        }
    }

    pub fn from_components<I>(components: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut key = Self::new();
        key.update_all(components);
        key
    }

    pub fn update(&mut self, component: impl Into<Value>) {
        let component = component.into();
        let mut base = component_hash(&component);

        self.count += 1;
        self.checksum = self.checksum.wrapping_add(base);
        base = base.wrapping_mul(self.count as i64);
        self.hashcode = MULTIPLIER.wrapping_mul(self.hashcode).wrapping_add(base);

        self.components.push(component);
    }

    pub fn update_all<I>(&mut self, components: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        for component in components {
            self.update(component);
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn components(&self) -> &[Value] {
        &self.components
    }
}

fn component_hash(component: &Value) -> i64 {
    let mut hasher = DefaultHasher::new();
    component.hash(&mut hasher);
    hasher.finish() as i64
}

impl Default for CacheKey {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.hashcode == other.hashcode
            && self.checksum == other.checksum
            && self.count == other.count
            && self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(a, b)| same_component(a, b))
    }
}

fn same_component(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => x.to_bits() == y.to_bits(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_component(x, y))
        }
        (Value::Map(xs), Value::Map(ys)) => same_entries(xs, ys),
        (Value::Record(x), Value::Record(y)) => {
            x.type_name() == y.type_name() && same_entries(x.fields(), y.fields())
        }
        _ => a == b,
    }
}

fn same_entries(a: &BTreeMap<String, Value>, b: &BTreeMap<String, Value>) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|((ka, va), (kb, vb))| ka == kb && same_component(va, vb))
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hashcode.hash(state);
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hashcode, self.checksum)?;
        for component in &self.components {
            f.write_str(":")?;
            match component {
                Value::Null => f.write_str("null")?,
                Value::Bool(b) => write!(f, "{}", b)?,
                Value::Integer(i) => write!(f, "{}", i)?,
                Value::Float(x) => write!(f, "{}", x)?,
                Value::String(s) => f.write_str(s)?,
                other => write!(f, "{:?}", other)?,
            }
        }
        Ok(())
    }
}

impl<T: Into<Value>> FromIterator<T> for CacheKey {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_components(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn key(parts: &[&str]) -> CacheKey {
        parts.iter().copied().collect()
    }

    #[test]
    fn equal_components_make_equal_keys() {
        let mut a = CacheKey::new();
        a.update("selectUser");
        a.update(42);
        let b = CacheKey::from_components(vec![Value::from("selectUser"), Value::from(42)]);

        assert_eq!(a, b);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn order_and_count_matter() {
        assert_ne!(key(&["a", "b"]), key(&["b", "a"]));
        assert_ne!(key(&["a"]), key(&["a", "a"]));
        assert_eq!(key(&["a", "b"]).count(), 2);
    }

    #[test]
    fn nan_components_match_by_bits() {
        let a = CacheKey::from_components([Value::from("ratio"), Value::Float(f64::NAN)]);
        assert_eq!(a, a.clone());

        let nested = |x: f64| CacheKey::from_components([Value::Array(vec![Value::Float(x)])]);
        assert_eq!(nested(f64::NAN), nested(f64::NAN));
        assert_ne!(nested(0.0), nested(-0.0));

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&a));
        assert!(set.remove(&a));
        assert!(set.is_empty());
    }

    #[test]
    fn empty_keys_are_equal() {
        assert_eq!(CacheKey::new(), CacheKey::default());
        assert_eq!(CacheKey::new().to_string(), "17:0");
    }

    #[test]
    fn display_lists_components() {
        let mut k = CacheKey::new();
        k.update("users");
        k.update(7);
        k.update(Value::Null);
        let display = k.to_string();
        assert!(display.ends_with(":users:7:null"), "{}", display);
    }
}
