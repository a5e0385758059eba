//! New-case computation over the known-set.

use crate::record::CaseRecord;
use std::collections::HashSet;

/// Returns the records of `current` whose link does not appear in `known`.
///
/// Order is preserved from `current`. Pure function, O(n) via a set of
/// known links.
#[must_use]
pub fn new_cases(current: &[CaseRecord], known: &[CaseRecord]) -> Vec<CaseRecord> {
    let known_links: HashSet<&str> = known.iter().map(|case| case.link.as_str()).collect();

    current
        .iter()
        .filter(|case| !known_links.contains(case.link.as_str()))
        .cloned()
        .collect()
}
