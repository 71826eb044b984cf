//! Schema combinators
//!
//! Composite schemas built on top of the matcher. Each one returns a
//! [`Predicate`] whose declared type is what [`crate::infer`] reports for it.

use crate::infer::{infer, TypeShape};
use crate::matcher::is;
use crate::schema::{Predicate, Schema};
use crate::value::Value;

/// Matches a value iff any of `schemas` matches it.
///
/// An empty union matches nothing.
pub fn union<I>(schemas: I) -> Predicate
where
    I: IntoIterator,
    I::Item: Into<Schema>,
{
    let members: Vec<Schema> = schemas.into_iter().map(Into::into).collect();
    let declared = TypeShape::union(members.iter().map(infer));
    Predicate::new(move |value| members.iter().any(|schema| is(value, schema))).with_type(declared)
}

/// `schema` or `undefined`, tagged so an enclosing object property is inferred as optional
pub fn optional(schema: impl Into<Schema>) -> Predicate {
    union([schema.into(), Schema::undefined()]).into_optional()
}

/// Matches plain objects whose every key conforms to `key` and every value to `value`.
///
/// Keys are checked as string values. The empty object matches.
pub fn record(key: impl Into<Schema>, value: impl Into<Schema>) -> Predicate {
    let key = key.into();
    let value = value.into();
    let declared = TypeShape::Record {
        key: Box::new(infer(&key)),
        value: Box::new(infer(&value)),
    };

    Predicate::new(move |candidate| match candidate {
        Value::Object(map) => map
            .iter()
            .all(|(k, v)| is(&Value::from(k.as_str()), &key) && is(v, &value)),
        _ => false,
    })
    .with_type(declared)
}

/// Reusable check equivalent to `is(value, schema)`
pub fn type_guard(schema: impl Into<Schema>) -> Predicate {
    let schema = schema.into();
    let declared = infer(&schema);
    Predicate::new(move |value| is(value, &schema)).with_type(declared)
}

/// Accepts anything
pub fn unknown() -> Predicate {
    Predicate::new(|_| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_union() {
        let schema = Schema::from(union([Schema::String, Schema::Number]));
        assert!(is(&v(json!("a")), &schema));
        assert!(is(&v(json!(1)), &schema));
        assert!(!is(&v(json!(true)), &schema));
        assert!(!is(&v(json!(null)), &Schema::from(union(Vec::<Schema>::new()))));
    }

    #[test]
    fn test_union_of_literals() {
        let status = Schema::from(union(["active", "inactive"]));
        assert!(is(&v(json!("active")), &status));
        assert!(!is(&v(json!("deleted")), &status));
        assert_eq!(infer(&status).to_string(), "\"active\" | \"inactive\"");
    }

    #[test]
    fn test_optional_property() {
        let schema = Schema::object([("foo", Schema::from(optional(Schema::String)))]);
        assert!(is(&v(json!({"foo": "x"})), &schema));
        assert!(is(&v(json!({})), &schema));
        assert!(!is(&v(json!({"foo": 1})), &schema));
        assert!(!is(&v(json!({"foo": null})), &schema));

        let mut explicit = crate::value::Map::new();
        explicit.insert("foo".to_string(), Value::Undefined);
        assert!(is(&Value::Object(explicit), &schema));
    }

    #[test]
    fn test_optional_is_tagged() {
        assert!(optional(Schema::Number).is_optional());
        assert!(!union([Schema::Number, Schema::undefined()]).is_optional());
        assert_eq!(optional(Schema::Number).declared_type().to_string(), "number | undefined");
    }

    #[test]
    fn test_record() {
        let schema = Schema::from(record(Schema::String, Schema::Number));
        assert!(is(&v(json!({})), &schema));
        assert!(is(&v(json!({"a": 1, "b": 2})), &schema));
        assert!(!is(&v(json!({"a": "1"})), &schema));
        assert!(!is(&v(json!([1, 2])), &schema));
        assert!(!is(&Value::Null, &schema));

        let keyed = Schema::from(record(union(["x", "y"]), Schema::Boolean));
        assert!(is(&v(json!({"x": true})), &keyed));
        assert!(!is(&v(json!({"z": true})), &keyed));
    }

    #[test]
    fn test_type_guard_is_reusable() {
        let is_point = type_guard(Schema::object([("x", Schema::Number), ("y", Schema::Number)]));
        assert!(is_point.test(&v(json!({"x": 1, "y": 2}))));
        assert!(!is_point.test(&v(json!({"x": 1}))));

        let schema = Schema::array_of(is_point.clone());
        assert!(is(&v(json!([{"x": 0, "y": 0}])), &schema));
        assert_eq!(infer(&schema).to_string(), "{ x: number; y: number }[]");
    }

    #[test]
    fn test_unknown() {
        let schema = Schema::object([("meta", Schema::from(unknown()))]);
        assert!(is(&v(json!({"meta": [1, {"a": null}]})), &schema));
        assert!(is(&v(json!({})), &schema));
        assert_eq!(infer(&schema).to_string(), "{ meta: unknown }");
    }
}
