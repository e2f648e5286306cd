//! Begin/complete logging around one repository operation
//!
//! - `{name}_BEGIN` on creation
//! - `{name}_COMPLETE` with `elapsed_us` on success
//! - `{name}_REJECTED` (WARN) for caller errors, `{name}_FAILED` (ERROR) otherwise
//! - `{name}_INCOMPLETE` (WARN) when dropped unresolved

use std::time::Instant;

use super::logger::Logger;

/// Logs the lifecycle of a single operation.
///
/// Fields given at creation are repeated on every event the scope emits,
/// so each line can be correlated on its own.
///
/// ```ignore
/// let scope = ObservationScope::new("RECORD_CREATE", &[("table", "events")]);
/// // ... do work ...
/// scope.complete(&[("id", "7")]);
/// ```
pub struct ObservationScope {
    name: &'static str,
    fields: Vec<(&'static str, String)>,
    started: Instant,
    resolved: bool,
}

impl ObservationScope {
    pub fn new(name: &'static str, fields: &[(&'static str, &str)]) -> Self {
        let scope = Self {
            name,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            started: Instant::now(),
            resolved: false,
        };
        Logger::info(&scope.event("BEGIN"), &scope.field_refs(&[]));
        scope
    }

    /// Operation name, e.g. `RECORD_QUERY`
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn elapsed_us(&self) -> String {
        self.started.elapsed().as_micros().to_string()
    }

    /// Logs `{name}_COMPLETE` with the scope fields plus `extra`
    pub fn complete(mut self, extra: &[(&str, &str)]) {
        self.resolved = true;
        let elapsed = self.elapsed_us();
        let mut fields = self.field_refs(extra);
        fields.push(("elapsed_us", elapsed.as_str()));
        Logger::info(&self.event("COMPLETE"), &fields);
    }

    /// Logs `{name}_REJECTED` at WARN
    pub fn reject(mut self, reason: &str) {
        self.resolved = true;
        Logger::warn(&self.event("REJECTED"), &self.field_refs(&[("reason", reason)]));
    }

    /// Logs `{name}_FAILED` at ERROR
    pub fn fail(mut self, reason: &str) {
        self.resolved = true;
        Logger::error(&self.event("FAILED"), &self.field_refs(&[("reason", reason)]));
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    fn event(&self, suffix: &str) -> String {
        format!("{}_{}", self.name, suffix)
    }

    fn field_refs<'s>(&'s self, extra: &[(&'s str, &'s str)]) -> Vec<(&'s str, &'s str)> {
        self.fields
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .chain(extra.iter().copied())
            .collect()
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.resolved {
            Logger::warn(
                &self.event("INCOMPLETE"),
                &self.field_refs(&[("reason", "scope dropped without completion")]),
            );
        }
    }
}
