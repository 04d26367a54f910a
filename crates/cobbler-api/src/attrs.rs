//! Record attribute dictionary and field coercions

use std::collections::BTreeMap;

use cobbler_xmlrpc::Value;
use serde::{Serialize, Serializer};

/// Marker the server uses for fields inherited from a parent object.
pub const INHERIT: &str = "<<inherit>>";

/// A field value that may be inherited from a parent object instead of
/// being set on the record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inheritable<T> {
    /// The server reported `<<inherit>>`
    Inherit,
    /// A concrete value set on the record
    Value(T),
}

impl<T> Inheritable<T> {
    /// Whether the field is inherited.
    #[must_use]
    pub fn is_inherit(&self) -> bool {
        matches!(self, Inheritable::Inherit)
    }

    /// Borrow the concrete value, if one is set.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Inheritable::Inherit => None,
            Inheritable::Value(v) => Some(v),
        }
    }

    /// Take the concrete value, if one is set.
    pub fn into_value(self) -> Option<T> {
        match self {
            Inheritable::Inherit => None,
            Inheritable::Value(v) => Some(v),
        }
    }
}

impl<T: Serialize> Serialize for Inheritable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Inheritable::Inherit => serializer.serialize_str(INHERIT),
            Inheritable::Value(v) => v.serialize(serializer),
        }
    }
}

/// Kernel options / template metadata as the server reports them: either a
/// key/value map or an opaque option string (old servers send the latter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValues {
    /// Parsed key/value pairs
    Map(BTreeMap<String, String>),
    /// Unparsed option string
    Raw(String),
}

impl KeyValues {
    /// Whether no options are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            KeyValues::Map(map) => map.is_empty(),
            KeyValues::Raw(raw) => raw.is_empty(),
        }
    }

    /// Convert back to a wire value for a modify call.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            KeyValues::Map(map) => Value::Struct(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::Str(v.clone())))
                    .collect(),
            ),
            KeyValues::Raw(raw) => Value::Str(raw.clone()),
        }
    }
}

impl Default for KeyValues {
    fn default() -> Self {
        KeyValues::Map(BTreeMap::new())
    }
}

impl Serialize for KeyValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            KeyValues::Map(map) => map.serialize(serializer),
            KeyValues::Raw(raw) => serializer.serialize_str(raw),
        }
    }
}

/// String-keyed view over a remote record dictionary.
///
/// The server's records are loosely typed: numbers arrive as strings or
/// ints depending on server version, `owners` arrives as a bare string or
/// a list, and option maps arrive as nil, empty string, or struct. The
/// accessors here normalize those shapes; unknown keys are simply ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs(BTreeMap<String, Value>);

impl From<BTreeMap<String, Value>> for Attrs {
    fn from(members: BTreeMap<String, Value>) -> Self {
        Attrs(members)
    }
}

impl Attrs {
    /// View a struct value as a record dictionary. Returns `None` for any
    /// other value shape.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_struct().map(|m| Attrs(m.clone()))
    }

    /// Whether the record has no attributes. The server answers a lookup
    /// for an unknown name with an empty record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw attribute value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Scalar attribute as a string. Nil, absent, and empty values map to
    /// `None`.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(scalar_string)
            .filter(|s| !s.is_empty())
    }

    /// Scalar attribute that may carry the `<<inherit>>` marker.
    #[must_use]
    pub fn inheritable(&self, key: &str) -> Option<Inheritable<String>> {
        match self.string(key) {
            Some(s) if s == INHERIT => Some(Inheritable::Inherit),
            Some(s) => Some(Inheritable::Value(s)),
            None => None,
        }
    }

    /// List attribute. The server emits both a bare string and a list of
    /// strings for these; both shapes are accepted.
    #[must_use]
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_string).collect(),
            Some(value) => scalar_string(value)
                .filter(|s| !s.is_empty())
                .map_or_else(Vec::new, |s| vec![s]),
            None => Vec::new(),
        }
    }

    /// Option-map attribute (`kernel_options`, `ks_meta`). Nil and the
    /// empty string map to an empty set; an unparsed option string is kept
    /// raw.
    #[must_use]
    pub fn key_values(&self, key: &str) -> KeyValues {
        match self.get(key) {
            Some(Value::Struct(members)) => KeyValues::Map(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), scalar_string(v).unwrap_or_default()))
                    .collect(),
            ),
            Some(value) => match scalar_string(value) {
                Some(s) if !s.is_empty() => KeyValues::Raw(s),
                _ => KeyValues::default(),
            },
            None => KeyValues::default(),
        }
    }

    /// Nested sub-records keyed by name (`interfaces`).
    #[must_use]
    pub fn sub_records(&self, key: &str) -> BTreeMap<String, Attrs> {
        self.get(key)
            .and_then(Value::as_struct)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|(name, v)| Attrs::from_value(v).map(|a| (name.clone(), a)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        Value::Double(d) => Some(d.to_string()),
        Value::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Value::DateTime(dt) => Some(dt.to_string()),
        Value::Base64(_) | Value::Struct(_) | Value::Array(_) | Value::Nil => None,
    }
}
