//! Catalog core
//!
//! Pure, side-effect-free read-side transformations over the resource
//! list: filtering, pagination, and selection consistency. Nothing in
//! this module mutates the store.

mod filter;
mod pagination;
mod selection;
mod view;

pub use filter::{apply_filters, ResourceFilter};
pub use pagination::{page_links, paginate, Page, PageLink};
pub use selection::reconcile_subject;
pub use view::BrowseView;
