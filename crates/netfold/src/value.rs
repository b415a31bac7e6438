//! Structure types produced by folding markup

use indexmap::map::{IntoIter, Iter, Keys, Values};
use indexmap::IndexMap;
use serde::Serialize;
use std::ops::Index;

/// A folded value: a text scalar, an ordered list, or a nested object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Raw text content of a leaf element
    String(String),
    /// Children of a list tag, in document order
    Array(Array),
    /// Merged children of a non-list tag (key order preserved)
    Object(Object),
}

impl Default for Value {
    fn default() -> Self {
        Self::String(String::new())
    }
}

impl Value {
    /// Returns true if this value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns true if this value is an array
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns true if this value is an object
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns the string value if this is a string, None otherwise
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the array if this is an array, None otherwise
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the object if this is an object, None otherwise
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Follow a path of object keys, e.g. `["interface", "name"]`
    pub fn pointer<'a, I>(&self, path: I) -> Option<&Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter()
            .try_fold(self, |value, key| value.as_object()?.get(key))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::Array(Array(values))
    }
}

/// An order-preserving object (map of string keys to values)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Object(pub(crate) IndexMap<String, Value>);

impl Object {
    /// Creates a new empty object
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Creates an object holding a single entry
    pub fn single(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut obj = Self::new();
        obj.insert(key, value);
        obj
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Inserts a key-value pair into the object.
    ///
    /// An existing key keeps its position and has its value replaced; the
    /// previous value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a key, preserving the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl Index<&str> for Object {
    type Output = Value;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, key: &str) -> &Self::Output {
        &self.0[key]
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(mut self) -> Self::IntoIter {
        std::mem::take(&mut self.0).into_iter()
    }
}

impl Extend<(String, Value)> for Object {
    fn extend<I: IntoIterator<Item = (String, Value)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

/// An array of values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Array(pub(crate) Vec<Value>);

impl Array {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl Index<usize> for Array {
    type Output = Value;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(mut self) -> Self::IntoIter {
        std::mem::take(&mut self.0).into_iter()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(Vec::from_iter(iter))
    }
}

// Objects and arrays hand their nested values to `release` instead of
// dropping them in place, so a deeply nested value is freed without
// recursion.
impl Drop for Object {
    fn drop(&mut self) {
        if self.0.values().any(|value| !value.is_string()) {
            release(self.0.drain(..).map(|(_, value)| value).collect());
        }
    }
}

impl Drop for Array {
    fn drop(&mut self) {
        if self.0.iter().any(|value| !value.is_string()) {
            release(std::mem::take(&mut self.0));
        }
    }
}

fn release(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match value {
            Value::Object(mut object) => pending.extend(object.0.drain(..).map(|(_, v)| v)),
            Value::Array(mut array) => pending.append(&mut array.0),
            Value::String(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_methods() {
        assert!(Value::from("eth0").is_string());
        assert!(Value::from(Array::new()).is_array());
        assert!(Value::from(Object::new()).is_object());
        assert!(!Value::default().is_object());
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut obj = Object::new();
        obj.insert("a", "1");
        obj.insert("b", "2");
        let previous = obj.insert("a", "3");

        assert_eq!(previous, Some(Value::from("1")));
        let keys: Vec<_> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(obj["a"], Value::from("3"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut obj: Object = [("a", "1"), ("b", "2"), ("c", "3")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect();
        obj.remove("a");
        let keys: Vec<_> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_into_iter_keeps_order() {
        let obj: Object = [("b", "1"), ("a", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect();
        let keys: Vec<_> = obj.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);

        let arr: Array = ["x", "y"].into_iter().map(Value::from).collect();
        assert_eq!(arr.into_iter().count(), 2);
    }

    #[test]
    fn test_drop_deep_value() {
        let mut value = Value::from("x");
        for depth in 0..100_000 {
            value = if depth % 2 == 0 {
                Value::from(Object::single("a", value))
            } else {
                Value::from(vec![value])
            };
        }
        drop(value);
    }

    #[test]
    fn test_pointer() {
        let inner = Object::single("name", "eth0");
        let value = Value::from(Object::single("interface", inner));

        assert_eq!(
            value.pointer(["interface", "name"]),
            Some(&Value::from("eth0"))
        );
        assert_eq!(value.pointer(["interface", "mtu"]), None);
        assert_eq!(value.pointer(Vec::<&str>::new()), Some(&value));
    }

    #[test]
    fn test_array_basics() {
        let mut arr = Array::new();
        assert!(arr.is_empty());
        arr.push("x");
        arr.push("y");
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[1], Value::from("y"));
        assert_eq!(arr.get(2), None);
    }

    #[test]
    fn test_serialize_shape() -> Result<(), serde_json::Error> {
        let mut obj = Object::new();
        obj.insert("items", vec![Value::from("x"), Value::from("y")]);
        obj.insert("_attrs", Object::single("id", "5"));

        let json = serde_json::to_string(&Value::from(obj))?;
        assert_eq!(json, r#"{"items":["x","y"],"_attrs":{"id":"5"}}"#);
        Ok(())
    }
}
