//! Immutable JSON value model.
//!
//! # Example
//!
//! ```
//! use jsonkit_value::{DuplicateKeyPolicy, ObjectBuilder, Value};
//!
//! let mut b = ObjectBuilder::new(DuplicateKeyPolicy::First);
//! b.add("a", 1).unwrap();
//! b.add("a", 2).unwrap();
//! let v = b.build();
//! assert_eq!(v.get("a"), Some(&Value::from(1)));
//! ```

pub mod builder;
pub mod interop;
pub mod number;
pub mod value;

pub use builder::{ArrayBuilder, DuplicateKeyPolicy, ObjectBuilder, ValueError};
pub use number::{Number, NumberError};
pub use value::{Array, Object, Value, ValueKind};

pub use indexmap::IndexMap;
pub use num_bigint::BigInt;
