//! Filter predicate engine
//!
//! Pure function of a resource list and a filter state. Every dimension
//! is optional; set dimensions AND together. `None` is the "all" sentinel,
//! so a subject literally named "" is never confused with "no subject
//! filter".

use crate::db::models::{Resource, ResourceKind};
use crate::taxonomy::TaxonomySnapshot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transient filter state for the browse view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceFilter {
    /// Selected field *identifier*; matching is by the resolved display
    /// name since resources store a denormalized field name.
    pub field: Option<Uuid>,
    pub semester: Option<i16>,
    pub subject: Option<String>,
    pub kind: Option<ResourceKind>,
    pub search: Option<String>,
}

impl ResourceFilter {
    /// A filter with every dimension unset
    pub fn unset() -> Self {
        Self::default()
    }

    /// True when no dimension is set
    pub fn is_unset(&self) -> bool {
        self.field.is_none()
            && self.semester.is_none()
            && self.subject.is_none()
            && self.kind.is_none()
            && self.search.is_none()
    }

    /// Reset every dimension ("clear filters")
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn matches(&self, resource: &Resource, taxonomy: &TaxonomySnapshot) -> bool {
        if let Some(field_id) = self.field {
            // An id the taxonomy cannot resolve leaves this dimension
            // unapplied, mirroring the selector-driven UI where stale ids
            // simply disappear from the options.
            if let Some(name) = taxonomy.field_name(field_id) {
                if resource.field != name {
                    return false;
                }
            }
        }

        if let Some(semester) = self.semester {
            if resource.semester != semester {
                return false;
            }
        }

        if let Some(ref subject) = self.subject {
            if &resource.subject != subject {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            if resource.kind != kind {
                return false;
            }
        }

        if let Some(ref search) = self.search {
            let query = search.to_lowercase();
            let in_title = resource.title.to_lowercase().contains(&query);
            let in_description = resource.description.to_lowercase().contains(&query);
            if !in_title && !in_description {
                return false;
            }
        }

        true
    }
}

/// Compute the subset of `resources` matching `filter`.
///
/// Pure and idempotent: applying the same filter twice yields the same
/// result as applying it once.
pub fn apply_filters(
    resources: &[Resource],
    filter: &ResourceFilter,
    taxonomy: &TaxonomySnapshot,
) -> Vec<Resource> {
    resources
        .iter()
        .filter(|r| filter.matches(r, taxonomy))
        .cloned()
        .collect()
}
