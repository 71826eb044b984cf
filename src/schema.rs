//! Schema types and structures
//!
//! A [`Schema`] is a plain value describing an expected shape. It is a closed
//! enum; both the matcher and type inference match on it exhaustively.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::infer::TypeShape;
use crate::value::{ClassRef, Value};

// =============================================================================
// Schema
// =============================================================================

/// An expected value shape
#[derive(Debug, Clone)]
pub enum Schema {
    /// Any string
    String,
    /// Any number
    Number,
    /// Any boolean
    Boolean,
    /// Array schema.
    ///
    /// No elements: array of anything. One element: homogeneous array.
    /// More than one: fixed-length tuple, checked by position.
    Array(Vec<Schema>),
    /// Object schema; only the declared keys are checked
    Object(ObjectSchema),
    /// Instance of a host class (or a subclass of it)
    Class(ClassRef),
    /// Caller-supplied check
    Predicate(Predicate),
    /// Exact value
    Literal(Literal),
}

impl Schema {
    /// Homogeneous array of `element`
    pub fn array_of(element: impl Into<Schema>) -> Self {
        Schema::Array(vec![element.into()])
    }

    /// Array with unconstrained elements
    pub fn any_array() -> Self {
        Schema::Array(Vec::new())
    }

    /// Positional tuple.
    ///
    /// A single-element list is a homogeneous array, not a one-tuple.
    pub fn tuple<I>(elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Schema>,
    {
        Schema::Array(elements.into_iter().map(Into::into).collect())
    }

    /// Object schema from `(key, schema)` pairs
    pub fn object<I, K, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<Schema>,
    {
        Schema::Object(fields.into_iter().collect())
    }

    /// Instance-of check against `T`
    pub fn instance_of<T: Any>() -> Self {
        Schema::Class(ClassRef::of::<T>())
    }

    /// Predicate schema with an `unknown` declared type
    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Schema::Predicate(Predicate::new(check))
    }

    pub fn literal(literal: impl Into<Literal>) -> Self {
        Schema::Literal(literal.into())
    }

    pub fn undefined() -> Self {
        Schema::Literal(Literal::Undefined)
    }

    pub fn null() -> Self {
        Schema::Literal(Literal::Null)
    }

    /// Whether this schema carries the optionality tag
    pub fn is_optional(&self) -> bool {
        matches!(self, Schema::Predicate(p) if p.is_optional())
    }
}

// =============================================================================
// Object Schema
// =============================================================================

/// Property name to schema mapping
///
/// Keys are unique; declaration order only fixes the order mismatches are reported in.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<(String, Schema)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ObjectSchema::insert`]
    pub fn field(mut self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.insert(key, schema);
        self
    }

    /// Declare a property, replacing any previous declaration of the same key
    pub fn insert(&mut self, key: impl Into<String>, schema: impl Into<Schema>) {
        let key = key.into();
        let schema = schema.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = schema,
            None => self.fields.push((key, schema)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Schema> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.fields.iter().map(|(k, s)| (k.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, S: Into<Schema>> FromIterator<(K, S)> for ObjectSchema {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        let mut object = ObjectSchema::new();
        for (key, schema) in iter {
            object.insert(key, schema);
        }
        object
    }
}

// =============================================================================
// Predicate
// =============================================================================

/// Signature of a predicate check
pub type CheckFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A predicate schema leaf
///
/// Besides the check itself it carries two pieces of metadata that only type
/// inference reads: the optionality tag set by [`crate::optional`], and the
/// type the predicate asserts about values it accepts.
#[derive(Clone)]
pub struct Predicate {
    check: Arc<CheckFn>,
    optional: bool,
    declared: TypeShape,
}

impl Predicate {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
            optional: false,
            declared: TypeShape::Unknown,
        }
    }

    /// Set the type this predicate asserts
    pub fn with_type(mut self, declared: TypeShape) -> Self {
        self.declared = declared;
        self
    }

    pub(crate) fn into_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Run the check
    pub fn test(&self, value: &Value) -> bool {
        (self.check)(value)
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn declared_type(&self) -> &TypeShape {
        &self.declared
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("optional", &self.optional)
            .field("declared", &format_args!("{}", self.declared))
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Literal
// =============================================================================

/// An exact primitive value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Literal {
    /// Strict equality: no coercion, `NaN` equals nothing, `0.0` equals `-0.0`
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::Undefined, Value::Undefined) | (Literal::Null, Value::Null) => true,
            (Literal::Bool(a), Value::Bool(b)) => a == b,
            (Literal::Number(a), Value::Number(b)) => a == b,
            (Literal::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Undefined => f.write_str("undefined"),
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "{s:?}"),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Literal {
                fn from(n: $ty) -> Self {
                    Literal::Number(n as f64)
                }
            }

            impl From<$ty> for Schema {
                fn from(n: $ty) -> Self {
                    Schema::Literal(Literal::from(n))
                }
            }
        )*
    };
}

impl_from_number!(f32, f64, i32, i64, u32, u64, usize);

impl From<bool> for Schema {
    fn from(b: bool) -> Self {
        Schema::Literal(Literal::Bool(b))
    }
}

impl From<&str> for Schema {
    fn from(s: &str) -> Self {
        Schema::Literal(Literal::from(s))
    }
}

impl From<String> for Schema {
    fn from(s: String) -> Self {
        Schema::Literal(Literal::String(s))
    }
}

impl From<Literal> for Schema {
    fn from(literal: Literal) -> Self {
        Schema::Literal(literal)
    }
}

impl From<Vec<Schema>> for Schema {
    fn from(elements: Vec<Schema>) -> Self {
        Schema::Array(elements)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::Object(object)
    }
}

impl From<ClassRef> for Schema {
    fn from(class: ClassRef) -> Self {
        Schema::Class(class)
    }
}

impl From<Predicate> for Schema {
    fn from(predicate: Predicate) -> Self {
        Schema::Predicate(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_keys_are_unique() {
        let object = ObjectSchema::new()
            .field("id", Schema::String)
            .field("name", Schema::String)
            .field("id", Schema::Number);

        assert_eq!(object.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert!(matches!(object.get("id"), Some(Schema::Number)));
    }

    #[test]
    fn test_literal_strict_equality() {
        assert!(Literal::Null.matches(&Value::Null));
        assert!(!Literal::Null.matches(&Value::Undefined));
        assert!(!Literal::Undefined.matches(&Value::Null));
        assert!(Literal::from(0.0).matches(&Value::Number(-0.0)));
        assert!(!Literal::from(f64::NAN).matches(&Value::Number(f64::NAN)));
        assert!(!Literal::from(42).matches(&Value::from("42")));
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::from("A").to_string(), "\"A\"");
        assert_eq!(Literal::from(42).to_string(), "42");
        assert_eq!(Literal::from(1.5).to_string(), "1.5");
        assert_eq!(Literal::Undefined.to_string(), "undefined");
    }

    #[test]
    fn test_predicate_metadata() {
        let predicate = Predicate::new(|v| v.is_null());
        assert!(!predicate.is_optional());
        assert_eq!(predicate.declared_type(), &TypeShape::Unknown);
        assert!(predicate.test(&Value::Null));
        assert!(predicate.clone().into_optional().is_optional());
    }

    #[test]
    fn test_tuple_of_one_is_homogeneous_array() {
        let schema = Schema::tuple([Schema::Number]);
        assert!(matches!(schema, Schema::Array(ref e) if e.len() == 1));
    }
}
