//! `jobkit-core`: job identity, identity generation and the error types
//! shared by the data map and descriptor crates.

pub mod error;
pub mod identity;
pub mod key;

pub use error::{DataMapError, DataMapResult, JobError, KeyError};
pub use identity::{IdentityGenerator, UuidIdentityGenerator};
pub use key::{DEFAULT_GROUP, JobKey};
