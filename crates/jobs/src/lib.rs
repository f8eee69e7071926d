//! `jobkit-jobs`: immutable job descriptors and the fluent builder that makes
//! them.
//!
//! A descriptor is everything a scheduling engine needs to know about a job
//! before it runs: who it is (`JobKey`), what runs (`JobType`), how it should
//! be treated (durability, recovery, concurrency and persistence policy), and
//! the data handed to each execution.

pub mod builder;
pub mod descriptor;
pub mod execution;
pub mod job_type;
pub mod policy;

pub use builder::JobDescriptorBuilder;
pub use descriptor::JobDescriptor;
pub use execution::merge_execution_data;
pub use job_type::JobType;
pub use policy::{JobTypeMetadata, JobTypePolicy, StaticJobTypeMetadata, TriState};

pub use jobkit_core::{DEFAULT_GROUP, IdentityGenerator, JobError, JobKey, KeyError, UuidIdentityGenerator};
pub use jobkit_datamap::{DataValue, TypedDataMap};
