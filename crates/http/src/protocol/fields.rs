//! Ordered header field collection.
//!
//! Unlike [`http::HeaderMap`], [`Fields`] keeps every field exactly as it arrived: insertion order
//! is preserved across different names, duplicate names are kept as separate entries and the
//! original casing of names is retained. Lookups by name are case-insensitive.

use std::slice;

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;

/// A single `name: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    value: String,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Case-insensitive comparison of the field name.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<Field>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    /// Appends a field. Existing fields with the same name are left untouched.
    pub fn insert<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.entries.push(Field { name: name.into(), value: value.into() });
    }

    /// Returns the value of the first field named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|f| f.is(name)).map(Field::value)
    }

    /// Returns the values of all fields named `name`, in arrival order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries.iter().filter(move |f| f.is(name)).map(Field::value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|f| f.is(name))
    }

    /// Removes every field named `name`, returning how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|f| !f.is(name));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Field> {
        self.entries.iter()
    }

    /// Builds an [`http::HeaderMap`], appending duplicates in arrival order.
    pub fn to_header_map(&self) -> Result<HeaderMap, http::Error> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for field in &self.entries {
            let name = HeaderName::from_bytes(field.name.as_bytes())?;
            let value = HeaderValue::from_str(&field.value)?;
            map.append(name, value);
        }
        Ok(map)
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a Field;
    type IntoIter = slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
