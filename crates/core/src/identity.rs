//! Name synthesis for jobs built without an explicit identity.

use uuid::Uuid;

/// Source of collision-resistant job names.
///
/// Implementations must not hand out the same name twice within a process.
pub trait IdentityGenerator: Send + Sync + core::fmt::Debug {
    fn generate_name(&self) -> String;
}

/// Generates names from UUIDv7 values in simple (32 hex digit) form.
///
/// v7 values are time-ordered, so generated names sort roughly by creation.
#[derive(Debug, Default, Copy, Clone)]
pub struct UuidIdentityGenerator;

impl UuidIdentityGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityGenerator for UuidIdentityGenerator {
    fn generate_name(&self) -> String {
        let name = Uuid::now_v7().simple().to_string();
        tracing::trace!(%name, "generated job name");
        name
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_simple_uuids() {
        let name = UuidIdentityGenerator::new().generate_name();
        assert_eq!(name.len(), 32);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn names_do_not_repeat() {
        let generator = UuidIdentityGenerator::new();
        let names: HashSet<String> = (0..10_000).map(|_| generator.generate_name()).collect();
        assert_eq!(names.len(), 10_000);
    }
}
