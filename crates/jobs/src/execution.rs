//! Execution-time view of job data.

use jobkit_datamap::TypedDataMap;

/// Build the data map seen by one execution.
///
/// Starts from a copy of `job` and overlays `trigger` on top, so trigger
/// entries win on key collision. Neither input is modified and the result is
/// clean: it has not been changed by the execution yet.
pub fn merge_execution_data(job: &TypedDataMap, trigger: Option<&TypedDataMap>) -> TypedDataMap {
    let mut merged = job.clone();
    if let Some(trigger) = trigger {
        merged.put_all(trigger);
    }
    merged.clear_dirty_flag();
    tracing::trace!(
        job_entries = job.len(),
        trigger_entries = trigger.map_or(0, TypedDataMap::len),
        merged_entries = merged.len(),
        "merged execution data"
    );
    merged
}
