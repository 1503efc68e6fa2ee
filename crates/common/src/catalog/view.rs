//! Browse view state
//!
//! Composes the filter state with the pagination cursor. Any filter
//! mutation resets the current page to 1; field and semester changes run
//! the subject reconciliation; page-size changes keep the cursor (it is
//! re-clamped at render time).

use crate::catalog::filter::{apply_filters, ResourceFilter};
use crate::catalog::pagination::{paginate, Page};
use crate::catalog::selection::reconcile_subject;
use crate::db::models::{Resource, ResourceKind};
use crate::taxonomy::TaxonomySnapshot;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct BrowseView {
    filter: ResourceFilter,
    current_page: usize,
    page_size: usize,
}

impl BrowseView {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: ResourceFilter::unset(),
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn filter(&self) -> &ResourceFilter {
        &self.filter
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_field(&mut self, field: Option<Uuid>, taxonomy: &TaxonomySnapshot) {
        self.filter.field = field;
        self.filter_changed(taxonomy);
    }

    pub fn set_semester(&mut self, semester: Option<i16>, taxonomy: &TaxonomySnapshot) {
        self.filter.semester = semester;
        self.filter_changed(taxonomy);
    }

    /// Set the subject selection. The value is validated against the
    /// current (field, semester) pair so the view never carries a subject
    /// that is invalid under it; field and semester are never touched.
    pub fn set_subject(&mut self, subject: Option<String>, taxonomy: &TaxonomySnapshot) {
        self.filter.subject = subject;
        self.filter_changed(taxonomy);
    }

    pub fn set_kind(&mut self, kind: Option<ResourceKind>) {
        self.filter.kind = kind;
        self.current_page = 1;
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.filter.search = search;
        self.current_page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.current_page = 1;
    }

    /// Request a page; 0 clamps to 1, the upper bound is clamped at
    /// render time once the filtered length is known.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Change the page size without resetting the cursor.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    fn filter_changed(&mut self, taxonomy: &TaxonomySnapshot) {
        self.filter = reconcile_subject(self.filter.clone(), taxonomy);
        self.current_page = 1;
    }

    /// Apply the filter and slice out the current page.
    pub fn render(&self, resources: &[Resource], taxonomy: &TaxonomySnapshot) -> Page<Resource> {
        let filtered = apply_filters(resources, &self.filter, taxonomy);
        paginate(&filtered, self.page_size, self.current_page)
    }
}
