use super::instruction::{ProgramSet, Route};
use ahash::AHashSet;
use itertools::Itertools;
use tracing::debug;

/// Drops every entry whose target (third `:` field) is not in `known`.
///
/// Surviving entries are re-joined with single spaces, which makes the
/// operation idempotent. Entries with fewer than three fields have no target
/// and are dropped as well.
pub fn sanitize(program: &str, known: &AHashSet<String>) -> String {
    program
        .split_whitespace()
        .filter(|entry| {
            let keep = entry
                .split(':')
                .nth(2)
                .is_some_and(|target| known.contains(target));
            if !keep {
                debug!(%entry, "removing entry with unknown target");
            }
            keep
        })
        .join(" ")
}

/// Sanitizes all three routes of a program set.
pub fn sanitize_set(programs: &ProgramSet, known: &AHashSet<String>) -> ProgramSet {
    let mut sanitized = ProgramSet::default();
    for route in Route::ALL {
        sanitized.set(route, sanitize(programs.get(route), known));
    }
    sanitized
}
