//! Declarative descriptions of subtrees.
//!
//! A [`Schema`] lists the children, dictgroups (map node children), and
//! properties to create at one node, with nested schemas for each child and
//! dictgroup. [`SchemaBuilder`] materializes it in a single recursive pass.
//!
//! # JSON form
//!
//! ```json
//! {
//!   "children": {"settings": {"children": {"app": {"props": {
//!     "lang": {"cast": "text", "default": "en_US"}
//!   }}}}},
//!   "dictgroups": ["controls", "devices"],
//!   "props": {"version": {"cast": "int"}}
//! }
//! ```
//!
//! `dictgroups` may be an object of nested schemas or an array of names.
//! Property specs may carry `values` and `validate_callback`; both are read
//! and kept but never used when building.

use std::{fmt, rc::Rc, str::FromStr};

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as Json};

use crate::{Result, tree::Value};

mod builder;
pub mod errors;

pub use builder::SchemaBuilder;
pub use errors::SchemaError;

/// Constructor producing a property's initial value.
pub type CastFn = Rc<dyn Fn() -> Value>;

/// How a property's initial value is produced when no default is given.
#[derive(Clone)]
pub enum Cast {
    /// Empty text
    Text,
    /// Zero
    Int,
    /// Zero
    Float,
    /// False
    Bool,
    /// Empty list
    List,
    /// Empty map
    Map,
    /// Null
    None,
    /// Caller-supplied constructor
    Custom(CastFn),
}

impl Cast {
    /// Wraps a closure as a custom cast.
    pub fn custom(f: impl Fn() -> Value + 'static) -> Self {
        Cast::Custom(Rc::new(f))
    }

    /// Canonical name of the cast.
    pub fn name(&self) -> &'static str {
        match self {
            Cast::Text => "text",
            Cast::Int => "int",
            Cast::Float => "float",
            Cast::Bool => "bool",
            Cast::List => "list",
            Cast::Map => "map",
            Cast::None => "none",
            Cast::Custom(_) => "custom",
        }
    }

    /// The value this cast produces when invoked without input.
    pub fn zero(&self) -> Value {
        match self {
            Cast::Text => Value::Text(String::new()),
            Cast::Int => Value::Int(0),
            Cast::Float => Value::Float(0.0),
            Cast::Bool => Value::Bool(false),
            Cast::List => Value::List(Vec::new()),
            Cast::Map => Value::Map(Default::default()),
            Cast::None => Value::Null,
            Cast::Custom(f) => f(),
        }
    }
}

impl fmt::Debug for Cast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cast({})", self.name())
    }
}

impl FromStr for Cast {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "str" | "text" | "string" => Ok(Cast::Text),
            "int" => Ok(Cast::Int),
            "float" => Ok(Cast::Float),
            "bool" => Ok(Cast::Bool),
            "list" => Ok(Cast::List),
            "dict" | "map" => Ok(Cast::Map),
            "none" => Ok(Cast::None),
            other => Err(other.to_string()),
        }
    }
}

/// Description of one property.
#[derive(Debug, Clone, Default)]
pub struct PropSpec {
    /// Constructor for the initial value; properties without one are skipped
    pub cast: Option<Cast>,
    /// Initial value, preferred over the cast's zero value
    pub default: Option<Value>,
    /// Allowed values, unused when building
    pub values: Option<Vec<Value>>,
    /// Validator reference, unused when building
    pub validate_callback: Option<Json>,
}

impl PropSpec {
    /// A property with a cast and no default.
    pub fn new(cast: Cast) -> Self {
        Self {
            cast: Some(cast),
            ..Default::default()
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The value a builder assigns: the default if present, otherwise the
    /// cast's zero value. `None` when there is no cast.
    pub fn initial_value(&self) -> Option<Value> {
        let cast = self.cast.as_ref()?;
        Some(self.default.clone().unwrap_or_else(|| cast.zero()))
    }
}

/// Declarative description of the entries to create at a node.
///
/// Section entries keep the order they were given in.
///
/// ```
/// use domtree::{schema::{Cast, PropSpec, Schema}, tree::DomTree};
///
/// let schema = Schema::new().child(
///     "settings",
///     Schema::new().child(
///         "app",
///         Schema::new().prop("lang", PropSpec::new(Cast::Text).with_default("en_US")),
///     ),
/// );
///
/// let mut tree = DomTree::new();
/// let root = tree.root();
/// tree.build_schema(root, &schema)?;
/// let app = tree.get_context(root, "settings.app")?;
/// assert_eq!(tree.get_property(app, "lang")?, &"en_US");
/// # Ok::<(), domtree::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    children: Vec<(String, Schema)>,
    dictgroups: Vec<(String, Schema)>,
    props: Vec<(String, PropSpec)>,
}

impl Schema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a child node section entry.
    pub fn child(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.children.push((name.into(), schema));
        self
    }

    /// Adds a dictgroup section entry.
    pub fn dictgroup(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.dictgroups.push((name.into(), schema));
        self
    }

    /// Adds a property section entry.
    pub fn prop(mut self, name: impl Into<String>, spec: PropSpec) -> Self {
        self.props.push((name.into(), spec));
        self
    }

    pub fn children(&self) -> &[(String, Schema)] {
        &self.children
    }

    pub fn dictgroups(&self) -> &[(String, Schema)] {
        &self.dictgroups
    }

    pub fn props(&self) -> &[(String, PropSpec)] {
        &self.props
    }

    /// Every top-level name across children, dictgroups and props.
    pub fn keys(&self) -> Vec<&str> {
        self.children
            .iter()
            .chain(&self.dictgroups)
            .map(|(name, _)| name.as_str())
            .chain(self.props.iter().map(|(name, _)| name.as_str()))
            .collect()
    }

    /// Returns true if all three sections are empty.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.dictgroups.is_empty() && self.props.is_empty()
    }

    /// Parses a schema from JSON text.
    ///
    /// # Errors
    /// [`SchemaError::InvalidSchema`] for malformed JSON, otherwise as
    /// [`from_value`](Schema::from_value).
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Json = serde_json::from_str(text).map_err(|e| invalid("", e))?;
        Self::from_value(value)
    }

    /// Parses a schema from a JSON value.
    ///
    /// Unknown top-level keys are skipped with a warning.
    ///
    /// # Errors
    /// [`SchemaError::InvalidSchema`] if a section has the wrong shape,
    /// [`SchemaError::UnknownCast`] if a property names an unknown cast.
    pub fn from_value(value: Json) -> Result<Self> {
        Ok(parse_schema(value, "")?)
    }
}

impl FromStr for Schema {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}

impl TryFrom<Json> for Schema {
    type Error = crate::Error;

    fn try_from(value: Json) -> Result<Self> {
        Self::from_value(value)
    }
}

#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(default)]
    children: Map<String, Json>,
    #[serde(default)]
    dictgroups: Option<RawGroups>,
    #[serde(default)]
    props: Map<String, Json>,
    #[serde(flatten)]
    extra: Map<String, Json>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawGroups {
    Nested(Map<String, Json>),
    Names(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawProp {
    #[serde(default)]
    cast: Option<String>,
    #[serde(default, deserialize_with = "present")]
    default: Option<Json>,
    #[serde(default)]
    values: Option<Vec<Json>>,
    #[serde(default)]
    validate_callback: Option<Json>,
    #[serde(flatten)]
    extra: Map<String, Json>,
}

// Keeps an explicit `null` distinct from an absent key.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Json>, D::Error> {
    Json::deserialize(deserializer).map(Some)
}

fn join(at: &str, name: &str) -> String {
    if at.is_empty() {
        name.to_string()
    } else {
        format!("{at}.{name}")
    }
}

fn invalid(at: &str, err: impl fmt::Display) -> SchemaError {
    SchemaError::InvalidSchema {
        at: if at.is_empty() { "<root>".to_string() } else { at.to_string() },
        reason: err.to_string(),
    }
}

fn parse_schema(value: Json, at: &str) -> std::result::Result<Schema, SchemaError> {
    let raw: RawSchema = serde_json::from_value(value).map_err(|e| invalid(at, e))?;
    for key in raw.extra.keys() {
        tracing::warn!(key = %key, at = %at, "Schema key not supported, skipping");
    }

    let mut schema = Schema::new();
    for (name, nested) in raw.children {
        let nested = parse_schema(nested, &join(at, &name))?;
        schema.children.push((name, nested));
    }
    match raw.dictgroups {
        Some(RawGroups::Nested(groups)) => {
            for (name, nested) in groups {
                let nested = parse_schema(nested, &join(at, &name))?;
                schema.dictgroups.push((name, nested));
            }
        }
        Some(RawGroups::Names(names)) => {
            schema.dictgroups = names.into_iter().map(|name| (name, Schema::new())).collect();
        }
        None => {}
    }
    for (name, spec) in raw.props {
        let spec = parse_prop(spec, &name, &join(at, &name))?;
        schema.props.push((name, spec));
    }
    Ok(schema)
}

fn parse_prop(value: Json, name: &str, at: &str) -> std::result::Result<PropSpec, SchemaError> {
    let raw: RawProp = serde_json::from_value(value).map_err(|e| invalid(at, e))?;
    for key in raw.extra.keys() {
        tracing::warn!(key = %key, at = %at, "Property spec key not supported, skipping");
    }

    let cast = raw
        .cast
        .map(|cast| {
            cast.parse::<Cast>().map_err(|cast| SchemaError::UnknownCast {
                property: name.to_string(),
                cast,
            })
        })
        .transpose()?;

    Ok(PropSpec {
        cast,
        default: raw.default.map(Value::from),
        values: raw.values.map(|values| values.into_iter().map(Value::from).collect()),
        validate_callback: raw.validate_callback,
    })
}
