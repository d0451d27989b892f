//! Operator attribute values.

use std::error::Error;
use std::fmt;

use rustc_hash::FxHashMap;

/// Value of an operator attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum Attr {
    Int(i64),
    Ints(Vec<i64>),
    Float(f32),
    Floats(Vec<f32>),
    String(String),
}

impl Attr {
    /// Return a short name for the attribute's type, for use in errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Attr::Int(_) => "int",
            Attr::Ints(_) => "ints",
            Attr::Float(_) => "float",
            Attr::Floats(_) => "floats",
            Attr::String(_) => "string",
        }
    }
}

impl From<i64> for Attr {
    fn from(val: i64) -> Attr {
        Attr::Int(val)
    }
}

impl From<Vec<i64>> for Attr {
    fn from(val: Vec<i64>) -> Attr {
        Attr::Ints(val)
    }
}

impl From<&[i64]> for Attr {
    fn from(val: &[i64]) -> Attr {
        Attr::Ints(val.to_vec())
    }
}

impl From<f32> for Attr {
    fn from(val: f32) -> Attr {
        Attr::Float(val)
    }
}

impl From<&str> for Attr {
    fn from(val: &str) -> Attr {
        Attr::String(val.to_string())
    }
}

/// Errors reading an attribute through an [`OpAdaptor`](crate::OpAdaptor).
#[derive(Clone, Debug, PartialEq)]
pub enum AttrError {
    /// A required attribute is not set.
    Missing { name: String },

    /// An attribute is set but has a different type than the operator expects.
    WrongType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl fmt::Display for AttrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrError::Missing { name } => write!(f, "required attribute \"{}\" is missing", name),
            AttrError::WrongType {
                name,
                expected,
                actual,
            } => write!(
                f,
                "attribute \"{}\" has type {} but expected {}",
                name, actual, expected
            ),
        }
    }
}

impl Error for AttrError {}

/// Map of attribute name to value for an operator instance.
///
/// An attribute that is not in the map is _not set_, which is distinct from
/// being set to a zero or empty value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrs {
    values: FxHashMap<String, Attr>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of an attribute, or `None` if it is not set.
    pub fn get(&self, name: &str) -> Option<&Attr> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Set an attribute, replacing any existing value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Attr>) {
        self.values.insert(name.into(), value.into());
    }

    /// Set an attribute only if it is not already set.
    ///
    /// Returns true if the value was inserted.
    pub fn set_if_absent(&mut self, name: &str, value: Attr) -> bool {
        if self.values.contains_key(name) {
            return false;
        }
        self.values.insert(name.to_string(), value);
        true
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Attr> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return an iterator over `(name, value)` pairs, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attr)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by_key(|(name, _)| *name);
        entries.into_iter()
    }
}

impl<N: Into<String>, V: Into<Attr>> FromIterator<(N, V)> for Attrs {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut attrs = Attrs::new();
        for (name, value) in iter {
            attrs.set(name, value);
        }
        attrs
    }
}
