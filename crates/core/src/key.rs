//! Job identity.

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

/// Group assigned to a job when none is given.
pub const DEFAULT_GROUP: &str = "DEFAULT";

/// Identity of a job: a name that is unique within its group.
///
/// Uniqueness across a scheduler is enforced by the engine, not here.
/// Loading a key applies the same rules as [`JobKey::in_group`] and refuses a
/// blank name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawJobKey")]
pub struct JobKey {
    name: String,
    group: String,
}

#[derive(Deserialize)]
struct RawJobKey {
    name: String,
    #[serde(default)]
    group: String,
}

impl TryFrom<RawJobKey> for JobKey {
    type Error = KeyError;

    fn try_from(raw: RawJobKey) -> Result<Self, Self::Error> {
        if raw.name.trim().is_empty() {
            return Err(KeyError::BlankName);
        }
        Ok(JobKey::in_group(raw.name, raw.group))
    }
}

impl JobKey {
    /// Key in [`DEFAULT_GROUP`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: DEFAULT_GROUP.to_string(),
        }
    }

    /// Key in an explicit group. A blank group falls back to [`DEFAULT_GROUP`].
    pub fn in_group(name: impl Into<String>, group: impl Into<String>) -> Self {
        let group = group.into();
        let group = if group.trim().is_empty() {
            DEFAULT_GROUP.to_string()
        } else {
            group
        };
        Self {
            name: name.into(),
            group,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn is_default_group(&self) -> bool {
        self.group == DEFAULT_GROUP
    }
}

impl core::fmt::Display for JobKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.group, self.name)
    }
}
