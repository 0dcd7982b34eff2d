//! Values held by tree entries.
//!
//! [`Value`] is what a property holds. [`Item`] is what attach and the
//! mapping operations accept: either a value or a handle to a node that will
//! be reparented into the tree.

use std::{collections::BTreeMap, fmt, rc::Rc};

use super::{NodeId, TreeError};

/// A zero-argument callable stored as a property value.
///
/// Exports invoke it and record its result instead of the callable itself.
/// Two methods compare equal only if they share the same underlying closure.
#[derive(Clone)]
pub struct Method(Rc<dyn Fn() -> Value>);

impl Method {
    /// Wraps a closure.
    pub fn new(f: impl Fn() -> Value + 'static) -> Self {
        Method(Rc::new(f))
    }

    /// Invokes the closure.
    pub fn call(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method(..)")
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Values that can be stored as properties.
///
/// # Direct Comparisons
///
/// `Value` implements `PartialEq` with primitive types:
///
/// ```
/// # use domtree::tree::Value;
/// let text = Value::Text("en_US".to_string());
/// assert!(text == "en_US");
/// assert!(Value::Int(3) == 3);
/// assert!(!(text == 3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/empty value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text string value
    Text(String),
    /// Ordered collection of values
    List(Vec<Value>),
    /// Key-ordered collection of values
    Map(BTreeMap<String, Value>),
    /// Computed value, resolved on export
    Method(Method),
}

impl Value {
    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Method(_) => "method",
        }
    }

    /// Returns true if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value must be invoked to produce data
    pub fn is_method(&self) -> bool {
        matches!(self, Value::Method(_))
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float; integers are widened
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to convert to a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to convert to a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to convert to a map
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Invokes any methods, recursively through lists and maps.
    pub fn resolve(&self) -> Value {
        match self {
            Value::Method(method) => method.call().resolve(),
            Value::List(items) => Value::List(items.iter().map(Value::resolve).collect()),
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.resolve()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Converts to JSON, resolving methods first.
    ///
    /// Non-finite floats have no JSON form and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self.resolve() {
            Value::Null | Value::Method(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(n) => serde_json::Value::from(n),
            Value::Float(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Method(_) => write!(f, "<method>"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
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

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

impl From<Method> for Value {
    fn from(value: Method) -> Self {
        Value::Method(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

fn mismatch(expected: &str, actual: &Value) -> TreeError {
    TreeError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

impl TryFrom<&Value> for bool {
    type Error = TreeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl TryFrom<&Value> for i64 {
    type Error = TreeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_int().ok_or_else(|| mismatch("int", value))
    }
}

impl TryFrom<&Value> for f64 {
    type Error = TreeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_float().ok_or_else(|| mismatch("float", value))
    }
}

impl TryFrom<&Value> for String {
    type Error = TreeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| mismatch("text", value))
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = TreeError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        value.as_text().ok_or_else(|| mismatch("text", value))
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

/// Something that can be attached to a node: a plain value, or an existing
/// node that will be reparented.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A node handle; attaching moves the node under the new owner
    Node(NodeId),
    /// A plain value
    Value(Value),
}

impl Item {
    /// Returns the node handle if this item is a node
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Item::Node(id) => Some(*id),
            Item::Value(_) => None,
        }
    }

    /// Returns the value if this item is a plain value
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Item::Value(value) => Some(value),
            Item::Node(_) => None,
        }
    }
}

impl From<NodeId> for Item {
    fn from(id: NodeId) -> Self {
        Item::Node(id)
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Item::Value(value)
    }
}

impl From<&str> for Item {
    fn from(value: &str) -> Self {
        Item::Value(value.into())
    }
}

impl From<String> for Item {
    fn from(value: String) -> Self {
        Item::Value(value.into())
    }
}

impl From<i64> for Item {
    fn from(value: i64) -> Self {
        Item::Value(value.into())
    }
}

impl From<bool> for Item {
    fn from(value: bool) -> Self {
        Item::Value(value.into())
    }
}

impl From<f64> for Item {
    fn from(value: f64) -> Self {
        Item::Value(value.into())
    }
}

/// A property to create in bulk: a bare name (value `Null`) or a name/value
/// pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInit {
    pub name: String,
    pub value: Value,
}

impl From<&str> for PropertyInit {
    fn from(name: &str) -> Self {
        PropertyInit {
            name: name.to_string(),
            value: Value::Null,
        }
    }
}

impl From<String> for PropertyInit {
    fn from(name: String) -> Self {
        PropertyInit {
            name,
            value: Value::Null,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for PropertyInit {
    fn from((name, value): (K, V)) -> Self {
        PropertyInit {
            name: name.into(),
            value: value.into(),
        }
    }
}
