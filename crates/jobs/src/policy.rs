//! Execution policy overrides and their resolution against job-type metadata.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::job_type::JobType;

/// A policy flag that is either pinned by the descriptor or left to the job
/// type's declared default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    #[default]
    Unset,
    True,
    False,
}

impl TriState {
    pub fn from_flag(flag: bool) -> Self {
        if flag { TriState::True } else { TriState::False }
    }

    pub fn is_set(self) -> bool {
        self != TriState::Unset
    }

    pub fn as_option(self) -> Option<bool> {
        match self {
            TriState::Unset => None,
            TriState::True => Some(true),
            TriState::False => Some(false),
        }
    }

    /// The pinned value, or `default()` when unset. `default` is not called
    /// for pinned values.
    pub fn resolve(self, default: impl FnOnce() -> bool) -> bool {
        self.as_option().unwrap_or_else(default)
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(TriState::Unset, TriState::from_flag)
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        TriState::from_flag(value)
    }
}

/// Declared defaults of a job type, as reported by the engine's metadata
/// lookup.
pub trait JobTypeMetadata {
    fn concurrent_execution_disallowed(&self, job_type: &JobType) -> bool;

    fn persist_data_after_execution(&self, job_type: &JobType) -> bool;
}

/// Defaults declared for one job type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobTypePolicy {
    pub concurrent_execution_disallowed: bool,
    pub persist_data_after_execution: bool,
}

/// Table-backed [`JobTypeMetadata`]. Unknown job types report `false` for both
/// flags.
#[derive(Debug, Clone, Default)]
pub struct StaticJobTypeMetadata {
    policies: HashMap<JobType, JobTypePolicy>,
}

impl StaticJobTypeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, job_type: impl Into<JobType>, policy: JobTypePolicy) -> Self {
        self.policies.insert(job_type.into(), policy);
        self
    }

    pub fn policy(&self, job_type: &JobType) -> JobTypePolicy {
        self.policies.get(job_type).copied().unwrap_or_default()
    }
}

impl JobTypeMetadata for StaticJobTypeMetadata {
    fn concurrent_execution_disallowed(&self, job_type: &JobType) -> bool {
        self.policy(job_type).concurrent_execution_disallowed
    }

    fn persist_data_after_execution(&self, job_type: &JobType) -> bool {
        self.policy(job_type).persist_data_after_execution
    }
}
