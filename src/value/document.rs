//! Insertion-ordered documents.

use std::fmt;

use indexmap::IndexMap;

use super::Value;

type Elements = IndexMap<String, Value, ahash::RandomState>;

/// An ordered map from field name to [`Value`].
///
/// Replacing the value of an existing key keeps the key at its first-seen
/// position. Equality is order-sensitive.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Elements,
}

impl Document {
    pub fn new() -> Self {
        Self {
            elements: Elements::default(),
        }
    }

    /// A document with a single element, e.g. `{ $match: {...} }`.
    pub fn single(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut doc = Self::new();
        doc.insert(key, value);
        doc
    }

    /// Insert or overwrite an element. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.elements.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.elements.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.elements.get_mut(key)
    }

    pub fn get_document(&self, key: &str) -> Option<&Document> {
        self.get(key).and_then(Value::as_document)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.elements.contains_key(key)
    }

    /// Remove an element, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.elements.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.elements.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The first element, used for single-operator documents like pipeline stages.
    pub fn first(&self) -> Option<(&str, &Value)> {
        self.elements.first().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge `other` into this document.
    ///
    /// New keys are appended in `other`'s order. Existing keys are replaced in
    /// place when `overwrite` is set and left alone otherwise.
    pub fn merge(&mut self, other: Document, overwrite: bool) {
        for (key, value) in other.elements {
            if overwrite || !self.elements.contains_key(&key) {
                self.elements.insert(key, value);
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        super::json::document_to_json(self)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.elements.iter().eq(other.elements.iter())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl TryFrom<serde_json::Value> for Document {
    type Error = Value;

    /// Build a document from a JSON object literal; non-objects are handed back.
    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match Value::from(json) {
            Value::Document(doc) => Ok(doc),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_keeps_position() {
        let mut doc = Document::new();
        doc.insert("a", 1);
        doc.insert("b", 2);
        doc.insert("a", 4);
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(doc.get("a"), Some(&Value::Int32(4)));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let ab: Document = [("a", 1), ("b", 2)].into_iter().collect();
        let ba: Document = [("b", 2), ("a", 1)].into_iter().collect();
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn test_merge_without_overwrite() {
        let mut left: Document = [("a", 1), ("b", 2)].into_iter().collect();
        let right: Document = [("a", 9), ("c", 3)].into_iter().collect();
        left.merge(right, false);
        let expected: Document = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(left, expected);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut doc: Document = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        doc.remove("a");
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["b", "c"]);
    }
}
