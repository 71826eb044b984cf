//! Type Inference
//!
//! Derives, from a schema, a description of the type every conforming value
//! has. [`infer`] is a total function over [`Schema`], written against the
//! same closed enum the matcher walks:
//!
//! | Schema                  | TypeShape                          |
//! |-------------------------|------------------------------------|
//! | `String`/`Number`/...   | the primitive                      |
//! | `Array([])`             | `unknown[]`                        |
//! | `Array([T])`            | `T[]`                              |
//! | `Array([A, B, ..])`     | `[A, B, ..]`                       |
//! | `Object`                | required + optional property groups|
//! | `Class(C)`              | instance of `C`                    |
//! | `Predicate`             | the type the predicate declares    |
//! | `Literal(l)`            | the singleton type of `l`          |
//!
//! [`TypeShape::admits`] evaluates a shape against a value. For schemas whose
//! predicates declare their true type it agrees with the matcher exactly.
//! Rendering (`Display`) uses TypeScript-like notation.

use std::fmt;

use crate::schema::{Literal, Schema};
use crate::value::{ClassRef, Value};

// =============================================================================
// Type Shape
// =============================================================================

/// The static type a conforming value has
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    String,
    Number,
    Boolean,
    /// Any value
    Unknown,
    /// Singleton type of a literal
    Literal(Literal),
    /// Homogeneous array
    Array(Box<TypeShape>),
    /// Fixed-arity positional array
    Tuple(Vec<TypeShape>),
    Object(ObjectType),
    Instance(ClassRef),
    /// String-keyed map
    Record {
        key: Box<TypeShape>,
        value: Box<TypeShape>,
    },
    /// Any of the members; no members is the empty type
    Union(Vec<TypeShape>),
}

impl TypeShape {
    /// Build a union, flattening nested unions and dropping duplicates.
    ///
    /// A union containing `unknown` is `unknown`; a single member is itself.
    pub fn union<I: IntoIterator<Item = TypeShape>>(members: I) -> Self {
        let mut flat: Vec<TypeShape> = Vec::new();
        for member in members {
            match member {
                TypeShape::Unknown => return TypeShape::Unknown,
                TypeShape::Union(inner) => {
                    for m in inner {
                        if !flat.contains(&m) {
                            flat.push(m);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }

        match flat.len() {
            1 => flat.swap_remove(0),
            _ => TypeShape::Union(flat),
        }
    }

    /// The empty type
    pub fn never() -> Self {
        TypeShape::Union(Vec::new())
    }

    /// Whether `value` inhabits this type
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeShape::Unknown, _) => true,
            (TypeShape::String, Value::String(_))
            | (TypeShape::Number, Value::Number(_))
            | (TypeShape::Boolean, Value::Bool(_)) => true,
            (TypeShape::Literal(literal), _) => literal.matches(value),
            (TypeShape::Array(element), Value::Array(items)) => {
                items.iter().all(|item| element.admits(item))
            }
            (TypeShape::Tuple(elements), Value::Array(items)) => {
                items.len() == elements.len()
                    && elements.iter().zip(items).all(|(t, item)| t.admits(item))
            }
            (TypeShape::Object(object), _) => {
                value.is_composite()
                    && object
                        .fields()
                        .all(|(key, shape)| shape.admits(&value.property(key)))
            }
            (TypeShape::Instance(class), Value::Instance(instance)) => {
                instance.is_instance_of(class)
            }
            (TypeShape::Record { key, value: entry }, Value::Object(map)) => map
                .iter()
                .all(|(k, v)| key.admits(&Value::from(k.as_str())) && entry.admits(v)),
            (TypeShape::Union(members), _) => members.iter().any(|m| m.admits(value)),
            _ => false,
        }
    }
}

// =============================================================================
// Object Type
// =============================================================================

/// Object type split into required and optional properties
///
/// The two groups are disjoint and together hold every key of the schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectType {
    pub required: Vec<(String, TypeShape)>,
    pub optional: Vec<(String, TypeShape)>,
}

impl ObjectType {
    /// All properties, required first
    pub fn fields(&self) -> impl Iterator<Item = (&str, &TypeShape)> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .map(|(k, t)| (k.as_str(), t))
    }

    pub fn get(&self, key: &str) -> Option<&TypeShape> {
        self.fields().find(|(k, _)| *k == key).map(|(_, t)| t)
    }

    pub fn is_optional(&self, key: &str) -> bool {
        self.optional.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.required.len() + self.optional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Inference
// =============================================================================

/// Infer the type of values conforming to `schema`
pub fn infer(schema: &Schema) -> TypeShape {
    match schema {
        Schema::String => TypeShape::String,
        Schema::Number => TypeShape::Number,
        Schema::Boolean => TypeShape::Boolean,
        Schema::Array(elements) => match elements.as_slice() {
            [] => TypeShape::Array(Box::new(TypeShape::Unknown)),
            [element] => TypeShape::Array(Box::new(infer(element))),
            _ => TypeShape::Tuple(elements.iter().map(infer).collect()),
        },
        Schema::Object(object) => {
            let mut shape = ObjectType::default();
            for (key, property) in object.iter() {
                let group = if property.is_optional() {
                    &mut shape.optional
                } else {
                    &mut shape.required
                };
                group.push((key.to_string(), infer(property)));
            }
            TypeShape::Object(shape)
        }
        Schema::Class(class) => TypeShape::Instance(*class),
        Schema::Predicate(predicate) => predicate.declared_type().clone(),
        Schema::Literal(literal) => TypeShape::Literal(literal.clone()),
    }
}

// =============================================================================
// Rendering
// =============================================================================

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::String => f.write_str("string"),
            TypeShape::Number => f.write_str("number"),
            TypeShape::Boolean => f.write_str("boolean"),
            TypeShape::Unknown => f.write_str("unknown"),
            TypeShape::Literal(literal) => write!(f, "{literal}"),
            TypeShape::Array(element) => match element.as_ref() {
                TypeShape::Union(members) if members.len() > 1 => write!(f, "({element})[]"),
                _ => write!(f, "{element}[]"),
            },
            TypeShape::Tuple(elements) => {
                f.write_str("[")?;
                write_joined(f, elements, ", ")?;
                f.write_str("]")
            }
            TypeShape::Object(object) => write!(f, "{object}"),
            TypeShape::Instance(class) => f.write_str(class.short_name()),
            TypeShape::Record { key, value } => write!(f, "Record<{key}, {value}>"),
            TypeShape::Union(members) if members.is_empty() => f.write_str("never"),
            TypeShape::Union(members) => write_joined(f, members, " | "),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }

        f.write_str("{ ")?;
        let mut first = true;
        for (key, shape) in self.fields() {
            if !first {
                f.write_str("; ")?;
            }
            first = false;

            if is_identifier(key) {
                f.write_str(key)?;
            } else {
                write!(f, "{key:?}")?;
            }
            let marker = if self.is_optional(key) { "?" } else { "" };
            write!(f, "{marker}: {shape}")?;
        }
        f.write_str(" }")
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, shapes: &[TypeShape], separator: &str) -> fmt::Result {
    for (i, shape) in shapes.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{shape}")?;
    }
    Ok(())
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
