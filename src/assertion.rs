//! Assertions
//!
//! `assert` turns a non-conforming value into a [`GuardError::TypeMismatch`]
//! carrying the first mismatch path. `cast` goes one step further and
//! deserializes a conforming value into a caller-chosen Rust type.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{GuardError, Result};
use crate::matcher::Matcher;
use crate::schema::Schema;
use crate::value::Value;

impl Matcher {
    /// Fail with the first mismatch path unless `value` conforms to `schema`
    pub fn assert(&self, value: &Value, schema: &Schema) -> Result<()> {
        match self.first_mismatch(value, schema) {
            None => Ok(()),
            Some(path) => {
                debug!(%path, kind = value.kind(), "value rejected by schema");
                Err(GuardError::TypeMismatch { path })
            }
        }
    }

    /// Assert, then deserialize `value` into `T`
    pub fn cast<T: DeserializeOwned>(&self, value: &Value, schema: &Schema) -> Result<T> {
        self.assert(value, schema)?;
        let json = serde_json::to_value(value)?;
        serde_json::from_value(json).map_err(|e| {
            debug!(error = %e, "conforming value did not deserialize");
            GuardError::from(e)
        })
    }
}

/// Fail with the first mismatch path unless `value` conforms to `schema`
pub fn assert(value: &Value, schema: &Schema) -> Result<()> {
    Matcher::default().assert(value, schema)
}

/// Assert `value` against `schema`, then deserialize it into `T`
pub fn cast<T: DeserializeOwned>(value: &Value, schema: &Schema) -> Result<T> {
    Matcher::default().cast(value, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::optional;
    use crate::matcher::diff;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Post {
        id: u32,
        title: String,
        #[serde(default)]
        draft: Option<bool>,
    }

    fn post_schema() -> Schema {
        Schema::object([
            ("id", Schema::Number),
            ("title", Schema::String),
            ("draft", Schema::from(optional(Schema::Boolean))),
        ])
    }

    #[test]
    fn test_assert_passes() {
        let value = Value::from(json!({"id": 1, "title": "hello"}));
        assert!(assert(&value, &post_schema()).is_ok());
    }

    #[test]
    fn test_assert_reports_first_path() {
        let schema = Schema::object([("post", post_schema())]);
        let value = Value::from(json!({"post": {"id": "1", "title": 2}}));

        let err = assert(&value, &schema).unwrap_err();
        assert_eq!(err.to_string(), "value.post.id does not match the schema.");
        assert_eq!(err.path(), diff(&value, &schema).first().map(String::as_str));
    }

    #[test]
    fn test_cast() {
        let value = Value::from(json!({"id": 7, "title": "t", "extra": [1, 2]}));
        let post: Post = cast(&value, &post_schema()).unwrap();
        assert_eq!(post, Post { id: 7, title: "t".to_string(), draft: None });
    }

    #[test]
    fn test_cast_rejects_before_deserializing() {
        let value = Value::from(json!({"id": "7", "title": "t"}));
        let err = cast::<Post>(&value, &post_schema()).unwrap_err();
        assert!(matches!(err, GuardError::TypeMismatch { ref path } if path == "value.id"));
    }

    #[test]
    fn test_cast_deserialize_failure() {
        // Conforms, but -1 does not fit a u32
        let value = Value::from(json!({"id": -1, "title": "t"}));
        let err = cast::<Post>(&value, &post_schema()).unwrap_err();
        assert!(matches!(err, GuardError::Json(_)));
    }
}
