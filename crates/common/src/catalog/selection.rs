//! Selection consistency rules
//!
//! When an upstream taxonomy selection (field or semester) changes, a
//! downstream subject selection that is no longer valid is reset to the
//! unset sentinel. The rule is one-directional: changing the subject
//! never affects field or semester.

use crate::catalog::filter::ResourceFilter;
use crate::taxonomy::TaxonomySnapshot;

/// Reset `filter.subject` when it is not a member of the subject set
/// valid under the filter's current (field, semester) pair.
///
/// An empty valid set leaves the selection untouched: the taxonomy may
/// simply not be loaded yet, and resetting on an empty set would wipe a
/// selection that is about to become valid.
pub fn reconcile_subject(mut filter: ResourceFilter, taxonomy: &TaxonomySnapshot) -> ResourceFilter {
    let Some(selected) = filter.subject.clone() else {
        return filter;
    };

    let valid = taxonomy.subjects_for(filter.field, filter.semester);
    if !valid.is_empty() && !valid.iter().any(|s| s.name == selected) {
        filter.subject = None;
    }

    filter
}
