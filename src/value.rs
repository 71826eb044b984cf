//! Untyped values
//!
//! [`Value`] is the in-memory representation the matcher inspects. It mirrors
//! the JSON data model with two additions:
//!
//! - `Undefined`, distinct from `Null`, which is also what an absent property reads as
//! - `Instance`, an opaque host object carrying its class and declared ancestry
//!
//! Values are built from `serde_json::Value`, from Rust primitives, or directly.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Property map of an object value
pub type Map = BTreeMap<String, Value>;

static UNDEFINED: Value = Value::Undefined;

/// Largest integer an f64 holds exactly (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

// =============================================================================
// Value
// =============================================================================

/// An untyped value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
    Instance(Instance),
}

impl Value {
    /// Wrap a host object as an instance value
    pub fn instance<T: Any + Send + Sync>(data: T) -> Self {
        Value::Instance(Instance::new(data))
    }

    /// Short name of the value's kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Instance(_) => "instance",
        }
    }

    /// Whether the value can carry properties (objects, arrays, instances)
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_) | Value::Instance(_))
    }

    /// Read a property the way an accessor would.
    ///
    /// Missing properties read as `Undefined`. Arrays expose canonical indices
    /// and `length`; instances are opaque and expose nothing.
    pub fn property(&self, key: &str) -> Cow<'_, Value> {
        match self {
            Value::Object(map) => Cow::Borrowed(map.get(key).unwrap_or(&UNDEFINED)),
            Value::Array(items) => {
                if key == "length" {
                    return Cow::Owned(Value::Number(items.len() as f64));
                }
                match key.parse::<usize>() {
                    Ok(index) if index.to_string() == key => {
                        Cow::Borrowed(items.get(index).unwrap_or(&UNDEFINED))
                    }
                    _ => Cow::Borrowed(&UNDEFINED),
                }
            }
            _ => Cow::Borrowed(&UNDEFINED),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }
}

// =============================================================================
// Classes and Instances
// =============================================================================

/// Identity of a host type used for instance-of checks
#[derive(Clone, Copy)]
pub struct ClassRef {
    id: TypeId,
    name: &'static str,
}

impl ClassRef {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path (e.g. `Date` for `app::model::Date`)
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassRef {}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassRef({})", self.name)
    }
}

/// An opaque host object
///
/// Cloning shares the underlying data. Equality is identity.
#[derive(Clone)]
pub struct Instance {
    class: ClassRef,
    /// Classes this instance also counts as, nearest first
    ancestors: Vec<ClassRef>,
    data: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T: Any + Send + Sync>(data: T) -> Self {
        Self {
            class: ClassRef::of::<T>(),
            ancestors: Vec::new(),
            data: Arc::new(data),
        }
    }

    /// Declare that this instance also belongs to class `B`
    pub fn extends<B: Any>(mut self) -> Self {
        let ancestor = ClassRef::of::<B>();
        if ancestor != self.class && !self.ancestors.contains(&ancestor) {
            self.ancestors.push(ancestor);
        }
        self
    }

    /// The concrete class of this instance
    pub fn class(&self) -> ClassRef {
        self.class
    }

    pub fn ancestors(&self) -> &[ClassRef] {
        &self.ancestors
    }

    /// Whether `class` is this instance's class or one of its ancestors
    pub fn is_instance_of(&self, class: &ClassRef) -> bool {
        self.class == *class || self.ancestors.contains(class)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.data) as *const (),
            Arc::as_ptr(&other.data) as *const (),
        )
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .field("ancestors", &self.ancestors)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Instance(instance)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64, usize);

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Value {
    /// Serializes with JSON semantics: undefined properties are skipped,
    /// undefined array slots become null, integral numbers stay integers.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let defined = map.values().filter(|v| !v.is_undefined()).count();
                let mut out = serializer.serialize_map(Some(defined))?;
                for (key, value) in map.iter().filter(|(_, v)| !v.is_undefined()) {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Value::Instance(instance) => Err(S::Error::custom(format!(
                "cannot serialize instance of {}",
                instance.class().name()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
