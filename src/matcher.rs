//! Conformance matching
//!
//! `is` and `diff` share one recursive traversal of the schema. The traversal
//! only descends as far as the schema does, so it terminates on any value.
//!
//! ## Rules
//!
//! 1. Primitive markers check the value's kind
//! 2. Array schemas: empty = any array, one element = homogeneous, more = tuple
//! 3. Object schemas check each declared key on a composite value
//! 4. Class schemas check instance-of
//! 5. Predicates run their check
//! 6. Literals compare strictly
//!
//! Nothing in here fails: every `(value, schema)` pair has a defined answer.

use tracing::trace;

use crate::config::MatcherConfig;
use crate::schema::{ObjectSchema, Schema};
use crate::value::Value;

/// Default root token for mismatch paths
pub const ROOT: &str = "value";

// =============================================================================
// Matcher
// =============================================================================

/// Schema matcher with a configurable root token and mismatch cap
#[derive(Debug, Clone)]
pub struct Matcher {
    root: String,
    max_mismatches: Option<usize>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            root: ROOT.to_string(),
            max_mismatches: None,
        }
    }
}

impl Matcher {
    pub fn new(config: &MatcherConfig) -> Self {
        Self {
            root: config.root.clone(),
            max_mismatches: config.max_mismatches,
        }
    }

    /// Root token paths start from
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Whether `value` conforms to `schema`
    pub fn is(&self, value: &Value, schema: &Schema) -> bool {
        self.first_mismatch(value, schema).is_none()
    }

    /// Every mismatch path, in traversal order
    pub fn diff(&self, value: &Value, schema: &Schema) -> Vec<String> {
        self.diff_at(value, schema, &self.root)
    }

    /// Like [`Matcher::diff`], rooted at `path`
    pub fn diff_at(&self, value: &Value, schema: &Schema, path: &str) -> Vec<String> {
        let mut walk = Walk::new(self.max_mismatches);
        walk.visit(value, schema, path);
        walk.mismatches
    }

    /// The first path `diff` would report, found without collecting the rest
    pub fn first_mismatch(&self, value: &Value, schema: &Schema) -> Option<String> {
        let mut walk = Walk::new(Some(1));
        walk.visit(value, schema, &self.root);
        walk.mismatches.pop()
    }
}

// =============================================================================
// Free Functions
// =============================================================================

/// Whether `value` conforms to `schema`
pub fn is(value: &Value, schema: &Schema) -> bool {
    Matcher::default().is(value, schema)
}

/// Every path where `value` fails `schema`, rooted at [`ROOT`]
pub fn diff(value: &Value, schema: &Schema) -> Vec<String> {
    Matcher::default().diff(value, schema)
}

/// Every path where `value` fails `schema`, rooted at `path`
pub fn diff_at(value: &Value, schema: &Schema, path: &str) -> Vec<String> {
    Matcher::default().diff_at(value, schema, path)
}

// =============================================================================
// Traversal
// =============================================================================

struct Walk {
    mismatches: Vec<String>,
    /// Stop collecting once this many mismatches are known (always >= 1)
    limit: usize,
}

impl Walk {
    fn new(limit: Option<usize>) -> Self {
        Self {
            mismatches: Vec::new(),
            limit: limit.unwrap_or(usize::MAX).max(1),
        }
    }

    fn full(&self) -> bool {
        self.mismatches.len() >= self.limit
    }

    fn mismatch(&mut self, path: &str, expected: &'static str, found: &Value) {
        trace!(path, expected, found = found.kind(), "schema mismatch");
        if !self.full() {
            self.mismatches.push(path.to_string());
        }
    }

    fn visit(&mut self, value: &Value, schema: &Schema, path: &str) {
        if self.full() {
            return;
        }

        match schema {
            Schema::String => {
                if !matches!(value, Value::String(_)) {
                    self.mismatch(path, "string", value);
                }
            }
            Schema::Number => {
                if !matches!(value, Value::Number(_)) {
                    self.mismatch(path, "number", value);
                }
            }
            Schema::Boolean => {
                if !matches!(value, Value::Bool(_)) {
                    self.mismatch(path, "boolean", value);
                }
            }
            Schema::Array(elements) => self.visit_array(value, elements, path),
            Schema::Object(object) => self.visit_object(value, object, path),
            Schema::Class(class) => {
                let ok = matches!(value, Value::Instance(i) if i.is_instance_of(class));
                if !ok {
                    self.mismatch(path, "instance", value);
                }
            }
            Schema::Predicate(predicate) => {
                if !predicate.test(value) {
                    self.mismatch(path, "predicate", value);
                }
            }
            Schema::Literal(literal) => {
                if !literal.matches(value) {
                    self.mismatch(path, "literal", value);
                }
            }
        }
    }

    fn visit_array(&mut self, value: &Value, elements: &[Schema], path: &str) {
        let Value::Array(items) = value else {
            return self.mismatch(path, "array", value);
        };

        match elements {
            [] => {}
            [element] => {
                for (index, item) in items.iter().enumerate() {
                    if self.full() {
                        break;
                    }
                    self.visit(item, element, &format!("{path}[{index}]"));
                }
            }
            _ => {
                // Content first; the length is only compared once every position passed
                let before = self.mismatches.len();
                for (index, item) in items.iter().enumerate() {
                    if self.full() {
                        break;
                    }
                    let item_path = format!("{path}[{index}]");
                    match elements.get(index) {
                        Some(element) => self.visit(item, element, &item_path),
                        None if item.is_undefined() => {}
                        None => self.mismatch(&item_path, "undefined", item),
                    }
                }
                if self.mismatches.len() == before && items.len() != elements.len() {
                    self.mismatch(path, "tuple length", value);
                }
            }
        }
    }

    fn visit_object(&mut self, value: &Value, object: &ObjectSchema, path: &str) {
        if !value.is_composite() {
            return self.mismatch(path, "object", value);
        }

        for (key, schema) in object.iter() {
            if self.full() {
                break;
            }
            let property = value.property(key);
            self.visit(&property, schema, &format!("{path}.{key}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Date;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_primitive_markers() {
        assert!(is(&v(json!(42)), &Schema::Number));
        assert!(!is(&v(json!("42")), &Schema::Number));
        assert!(is(&v(json!("x")), &Schema::String));
        assert!(is(&v(json!(false)), &Schema::Boolean));
        assert!(!is(&Value::Undefined, &Schema::Boolean));
        assert!(!is(&Value::Null, &Schema::String));
    }

    #[test]
    fn test_homogeneous_array() {
        let schema = Schema::array_of(Schema::Number);
        assert!(is(&v(json!([])), &schema));
        assert!(is(&v(json!([1, 2, 3])), &schema));
        assert_eq!(diff(&v(json!([1, 2, "3"])), &schema), vec!["value[2]"]);
        assert_eq!(diff(&v(json!({"0": 1})), &schema), vec!["value"]);
    }

    #[test]
    fn test_any_array() {
        assert!(is(&v(json!([1, "a", null])), &Schema::any_array()));
        assert!(!is(&v(json!({})), &Schema::any_array()));
    }

    #[test]
    fn test_tuple_content_before_length() {
        let schema = Schema::tuple([Schema::String, Schema::Number, Schema::instance_of::<Date>()]);
        assert_eq!(diff(&v(json!(["A", 2, "X"])), &schema), vec!["value[2]"]);

        let pair = Schema::tuple([Schema::String, Schema::Number]);
        assert_eq!(diff(&v(json!(["A"])), &pair), vec!["value"]);
        assert_eq!(diff(&v(json!([1])), &pair), vec!["value[0]"]);
        assert_eq!(diff(&v(json!(["A", 2, 3])), &pair), vec!["value[2]"]);
        assert!(is(&v(json!(["A", 2])), &pair));
    }

    #[test]
    fn test_tuple_trailing_undefined_reports_length() {
        let pair = Schema::tuple([Schema::String, Schema::Number]);
        let value = Value::Array(vec![Value::from("A"), Value::from(2), Value::Undefined]);
        assert_eq!(diff(&value, &pair), vec!["value"]);
    }

    #[test]
    fn test_object_ignores_excess_keys() {
        let schema = Schema::object([("a", Schema::Number)]);
        assert!(is(&v(json!({"a": 1, "b": 2})), &schema));
        assert_eq!(diff(&v(json!({"b": 2})), &schema), vec!["value.a"]);
        assert_eq!(diff(&Value::Null, &schema), vec!["value"]);
        assert_eq!(diff(&v(json!("a")), &schema), vec!["value"]);
    }

    #[test]
    fn test_object_on_array_reads_length() {
        let schema = Schema::object([("length", Schema::literal(2))]);
        assert!(is(&v(json!([1, 2])), &schema));
        assert!(!is(&v(json!([1])), &schema));
    }

    #[test]
    fn test_nested_paths_in_order() {
        let schema = Schema::object([
            ("post", Schema::object([("id", Schema::Number), ("tags", Schema::array_of(Schema::String))])),
            ("author", Schema::String),
        ]);
        let value = v(json!({"post": {"id": "1", "tags": ["a", 2]}, "author": null}));
        assert_eq!(
            diff(&value, &schema),
            vec!["value.post.id", "value.post.tags[1]", "value.author"]
        );
    }

    #[test]
    fn test_class_schema() {
        struct Other;
        let schema = Schema::instance_of::<Date>();
        assert!(is(&Value::instance(Date), &schema));
        assert!(!is(&Value::instance(Other), &schema));
        assert!(!is(&v(json!({})), &schema));
    }

    #[test]
    fn test_predicate_and_literals() {
        let even = Schema::predicate(|v| v.as_f64().is_some_and(|n| n % 2.0 == 0.0));
        assert!(is(&v(json!(4)), &even));
        assert!(!is(&v(json!(3)), &even));

        assert!(is(&Value::Null, &Schema::null()));
        assert!(!is(&Value::Undefined, &Schema::null()));
        assert!(is(&Value::Undefined, &Schema::undefined()));
        assert!(is(&v(json!("A")), &Schema::from("A")));
        assert!(!is(&Value::Number(f64::NAN), &Schema::literal(f64::NAN)));
    }

    #[test]
    fn test_diff_at_custom_root() {
        let schema = Schema::object([("id", Schema::Number)]);
        assert_eq!(diff_at(&v(json!({})), &schema, "payload"), vec!["payload.id"]);
    }

    #[test]
    fn test_mismatch_cap() {
        let config = MatcherConfig {
            root: "input".to_string(),
            max_mismatches: Some(2),
        };
        let matcher = Matcher::new(&config);
        let schema = Schema::array_of(Schema::Number);
        let value = v(json!(["a", "b", "c"]));

        assert_eq!(matcher.diff(&value, &schema), vec!["input[0]", "input[1]"]);
        assert!(!matcher.is(&value, &schema));
    }

    #[test]
    fn test_zero_cap_still_reports() {
        let config = MatcherConfig {
            root: ROOT.to_string(),
            max_mismatches: Some(0),
        };
        let matcher = Matcher::new(&config);
        assert_eq!(matcher.diff(&v(json!("x")), &Schema::Number), vec!["value"]);
    }

    #[test]
    fn test_first_mismatch_matches_diff_head() {
        let schema = Schema::object([("a", Schema::Number), ("b", Schema::String)]);
        let value = v(json!({"a": "x", "b": 1}));
        let matcher = Matcher::default();
        assert_eq!(matcher.first_mismatch(&value, &schema), diff(&value, &schema).first().cloned());
    }
}
