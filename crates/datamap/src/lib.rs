//! `jobkit-datamap`: the typed, change-tracked key/value map attached to jobs.
//!
//! Values are either stored natively (`put_int`, `put_uuid`, ...) or as their
//! canonical string encoding (`put_as_string`). Getters accept both forms, so
//! a value written by one side as a string can be read by the other as a
//! number and vice versa.

pub mod canonical;
pub mod map;
pub mod value;

pub use canonical::Coercible;
pub use map::TypedDataMap;
pub use value::{DataValue, DataValueKind};
