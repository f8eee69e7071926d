//! The immutable job descriptor handed to a scheduling engine.

use serde::{Deserialize, Serialize};

use jobkit_core::JobKey;
use jobkit_datamap::TypedDataMap;

use crate::builder::JobDescriptorBuilder;
use crate::execution::merge_execution_data;
use crate::job_type::JobType;
use crate::policy::{JobTypeMetadata, TriState};

/// Snapshot of a job's identity, policy and data.
///
/// Created by [`JobDescriptorBuilder::build`] and read-only afterwards: there
/// are no `&mut` accessors, so a descriptor behind an `Arc` can be read by any
/// number of workers at once. Per-execution data is derived with
/// [`JobDescriptor::execution_data`], which returns a new map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptor {
    key: JobKey,
    description: Option<String>,
    job_type: Option<JobType>,
    durable: bool,
    requests_recovery: bool,
    data_map: TypedDataMap,
    concurrent_execution_disallowed: TriState,
    persist_data_after_execution: TriState,
}

impl JobDescriptor {
    /// Start describing a new job.
    pub fn builder() -> JobDescriptorBuilder {
        JobDescriptorBuilder::new()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        key: JobKey,
        description: Option<String>,
        job_type: Option<JobType>,
        durable: bool,
        requests_recovery: bool,
        data_map: TypedDataMap,
        concurrent_execution_disallowed: TriState,
        persist_data_after_execution: TriState,
    ) -> Self {
        Self {
            key,
            description,
            job_type,
            durable,
            requests_recovery,
            data_map,
            concurrent_execution_disallowed,
            persist_data_after_execution,
        }
    }

    pub fn key(&self) -> &JobKey {
        &self.key
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn job_type(&self) -> Option<&JobType> {
        self.job_type.as_ref()
    }

    /// Whether the job is kept when no trigger references it.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Whether the job is re-executed after a recovery or fail-over.
    pub fn requests_recovery(&self) -> bool {
        self.requests_recovery
    }

    pub fn data_map(&self) -> &TypedDataMap {
        &self.data_map
    }

    pub fn concurrent_execution_disallowed(&self) -> TriState {
        self.concurrent_execution_disallowed
    }

    pub fn persist_data_after_execution(&self) -> TriState {
        self.persist_data_after_execution
    }

    /// Effective concurrency policy: the pinned override, else the job type's
    /// declared default, else `false` when no job type is set.
    pub fn concurrent_execution_disallowed_with(&self, metadata: &dyn JobTypeMetadata) -> bool {
        self.concurrent_execution_disallowed.resolve(|| {
            self.job_type
                .as_ref()
                .is_some_and(|t| metadata.concurrent_execution_disallowed(t))
        })
    }

    /// Effective persistence policy, resolved like
    /// [`JobDescriptor::concurrent_execution_disallowed_with`].
    pub fn persist_data_after_execution_with(&self, metadata: &dyn JobTypeMetadata) -> bool {
        self.persist_data_after_execution.resolve(|| {
            self.job_type
                .as_ref()
                .is_some_and(|t| metadata.persist_data_after_execution(t))
        })
    }

    /// Data for one execution: this job's map overlaid with the trigger's.
    pub fn execution_data(&self, trigger: Option<&TypedDataMap>) -> TypedDataMap {
        merge_execution_data(&self.data_map, trigger)
    }

    /// A builder pre-loaded with this descriptor, for deriving a variant.
    pub fn to_builder(&self) -> JobDescriptorBuilder {
        let mut builder = JobDescriptorBuilder::new();
        builder
            .with_key(self.key.clone())
            .store_durably_with(self.durable)
            .request_recovery_with(self.requests_recovery)
            .set_job_data(self.data_map.clone());
        if let Some(description) = &self.description {
            builder.with_description(description.clone());
        }
        if let Some(job_type) = &self.job_type {
            builder.of_type(job_type.clone());
        }
        if let Some(flag) = self.concurrent_execution_disallowed.as_option() {
            builder.disallow_concurrent_execution_with(flag);
        }
        if let Some(flag) = self.persist_data_after_execution.as_option() {
            builder.persist_job_data_after_execution_with(flag);
        }
        builder
    }
}
