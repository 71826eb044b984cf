//! Familiar Shape Guards
//!
//! Runtime shape checks for untyped values. A schema is built from ordinary
//! values (primitive markers, nested objects, arrays, literals, predicates)
//! and an arbitrary [`Value`] is checked against it.
//!
//! ## Features
//!
//! - **Conformance**: [`is`] answers yes/no, [`diff`] lists every failing path
//! - **Combinators**: [`union`], [`optional`], [`record`], [`type_guard`], [`unknown`]
//! - **Assertion**: [`assert()`] reports the first failing path as an error
//! - **Narrowing**: [`cast`] deserializes a conforming value into a Rust type
//! - **Inference**: [`infer`] describes the type every conforming value has
//!
//! ## Example
//!
//! ```
//! use familiar_guards::{diff, is, optional, Schema, Value};
//! use serde_json::json;
//!
//! let schema = Schema::object([
//!     ("id", Schema::Number),
//!     ("tags", Schema::array_of(Schema::String)),
//!     ("note", Schema::from(optional(Schema::String))),
//! ]);
//!
//! let good = Value::from(json!({"id": 1, "tags": ["a"]}));
//! assert!(is(&good, &schema));
//!
//! let bad = Value::from(json!({"id": "1", "tags": ["a", 2]}));
//! assert_eq!(diff(&bad, &schema), vec!["value.id", "value.tags[1]"]);
//! ```

pub mod assertion;
pub mod combinators;
pub mod config;
pub mod error;
pub mod infer;
pub mod matcher;
pub mod schema;
pub mod value;

pub use assertion::{assert, cast};
pub use combinators::{optional, record, type_guard, union, unknown};
pub use config::{GuardConfig, MatcherConfig};
pub use error::{GuardError, Result};
pub use infer::{infer, ObjectType, TypeShape};
pub use matcher::{diff, diff_at, is, Matcher, ROOT};
pub use schema::{Literal, ObjectSchema, Predicate, Schema};
pub use value::{ClassRef, Instance, Map, Value};
