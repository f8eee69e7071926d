//! Fluent builder for [`JobDescriptor`].

use std::sync::Arc;

use jobkit_core::{IdentityGenerator, JobKey, UuidIdentityGenerator};
use jobkit_datamap::{DataValue, TypedDataMap};

use crate::descriptor::JobDescriptor;
use crate::job_type::JobType;
use crate::policy::TriState;

/// Mutable scratch state for a [`JobDescriptor`].
///
/// Every configuration method mutates the builder and hands the same builder
/// back, so calls chain:
///
/// ```ignore
/// let descriptor = JobDescriptorBuilder::new()
///     .with_identity("nightly-report")
///     .of_type("reports.nightly")
///     .store_durably()
///     .using_job_data("format", "pdf")
///     .build();
/// ```
///
/// `build` does not consume the builder; it can be reconfigured and built
/// again, and each build yields an independent descriptor. No method fails:
/// a missing or blank identity is replaced by a generated one at build time.
#[derive(Debug, Clone)]
pub struct JobDescriptorBuilder {
    key: Option<JobKey>,
    description: Option<String>,
    job_type: Option<JobType>,
    durable: bool,
    requests_recovery: bool,
    data_map: Option<TypedDataMap>,
    concurrent_execution_disallowed: TriState,
    persist_data_after_execution: TriState,
    identity_generator: Arc<dyn IdentityGenerator>,
}

impl Default for JobDescriptorBuilder {
    fn default() -> Self {
        Self {
            key: None,
            description: None,
            job_type: None,
            durable: false,
            requests_recovery: false,
            data_map: None,
            concurrent_execution_disallowed: TriState::Unset,
            persist_data_after_execution: TriState::Unset,
            identity_generator: Arc::new(UuidIdentityGenerator::new()),
        }
    }
}

impl JobDescriptorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_job_type(job_type: impl Into<JobType>) -> Self {
        let mut builder = Self::new();
        builder.of_type(job_type);
        builder
    }

    pub fn of_type(&mut self, job_type: impl Into<JobType>) -> &mut Self {
        self.job_type = Some(job_type.into());
        self
    }

    /// Name the job in the default group.
    pub fn with_identity(&mut self, name: impl Into<String>) -> &mut Self {
        self.key = Some(JobKey::new(name));
        self
    }

    pub fn with_identity_in_group(&mut self, name: impl Into<String>, group: impl Into<String>) -> &mut Self {
        self.key = Some(JobKey::in_group(name, group));
        self
    }

    pub fn with_key(&mut self, key: JobKey) -> &mut Self {
        self.key = Some(key);
        self
    }

    /// Replace the source of names used when no identity is set.
    pub fn with_identity_generator(&mut self, generator: Arc<dyn IdentityGenerator>) -> &mut Self {
        self.identity_generator = generator;
        self
    }

    pub fn with_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn clear_description(&mut self) -> &mut Self {
        self.description = None;
        self
    }

    pub fn request_recovery(&mut self) -> &mut Self {
        self.request_recovery_with(true)
    }

    pub fn request_recovery_with(&mut self, flag: bool) -> &mut Self {
        self.requests_recovery = flag;
        self
    }

    pub fn store_durably(&mut self) -> &mut Self {
        self.store_durably_with(true)
    }

    pub fn store_durably_with(&mut self, flag: bool) -> &mut Self {
        self.durable = flag;
        self
    }

    pub fn disallow_concurrent_execution(&mut self) -> &mut Self {
        self.disallow_concurrent_execution_with(true)
    }

    pub fn disallow_concurrent_execution_with(&mut self, flag: bool) -> &mut Self {
        self.concurrent_execution_disallowed = TriState::from_flag(flag);
        self
    }

    pub fn persist_job_data_after_execution(&mut self) -> &mut Self {
        self.persist_job_data_after_execution_with(true)
    }

    pub fn persist_job_data_after_execution_with(&mut self, flag: bool) -> &mut Self {
        self.persist_data_after_execution = TriState::from_flag(flag);
        self
    }

    /// Store one native value in the job's data.
    pub fn using_job_data(&mut self, key: impl Into<String>, value: impl Into<DataValue>) -> &mut Self {
        self.working_map().put(key, value);
        self
    }

    /// Merge `data` into the job's data; existing keys not in `data` are kept.
    pub fn using_job_data_map(&mut self, data: &TypedDataMap) -> &mut Self {
        self.working_map().put_all(data);
        self
    }

    /// Replace the job's data wholesale.
    pub fn set_job_data(&mut self, data: TypedDataMap) -> &mut Self {
        self.data_map = Some(data);
        self
    }

    fn working_map(&mut self) -> &mut TypedDataMap {
        self.data_map.get_or_insert_with(TypedDataMap::new)
    }

    /// Snapshot the current configuration.
    ///
    /// The data map is copied, so later changes to this builder never reach a
    /// descriptor it already produced.
    pub fn build(&self) -> JobDescriptor {
        let (key, generated) = self.resolve_key();
        tracing::debug!(
            job = %key,
            job_type = self.job_type.as_ref().map(JobType::name),
            generated_identity = generated,
            durable = self.durable,
            "built job descriptor"
        );

        JobDescriptor::new(
            key,
            self.description.clone(),
            self.job_type.clone(),
            self.durable,
            self.requests_recovery,
            self.data_map.clone().unwrap_or_default(),
            self.concurrent_execution_disallowed,
            self.persist_data_after_execution,
        )
    }

    fn resolve_key(&self) -> (JobKey, bool) {
        match &self.key {
            Some(key) if !key.name().trim().is_empty() => (key.clone(), false),
            Some(key) => (
                JobKey::in_group(self.identity_generator.generate_name(), key.group()),
                true,
            ),
            None => (JobKey::new(self.identity_generator.generate_name()), true),
        }
    }
}
