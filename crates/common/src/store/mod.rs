//! Store layer
//!
//! `CatalogStore` is the seam between the read-side catalog core and the
//! persistence backend. The service treats the backend as an external
//! collaborator: every operation can fail, failures are surfaced to the
//! caller and never retried automatically.

mod memory;
mod postgres;

pub use memory::MemCatalog;
pub use postgres::PgCatalog;

use crate::db::models::{AdminUser, Field, Resource, ResourceKind, Subject};
use crate::errors::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Input for creating a resource; the store assigns id and upload date.
#[derive(Debug, Clone)]
pub struct NewResource {
    pub title: String,
    pub description: String,
    pub kind: ResourceKind,
    pub subject: String,
    pub semester: i16,
    pub field: String,
    pub field_id: Option<Uuid>,
    pub file_url: String,
}

/// Partial update of a resource. `upload_date` is immutable and
/// deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct ResourcePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<ResourceKind>,
    pub subject: Option<String>,
    pub semester: Option<i16>,
    pub field: Option<String>,
    pub field_id: Option<Option<Uuid>>,
    pub file_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSubject {
    pub name: String,
    pub field_id: Uuid,
    pub semester: i16,
}

#[derive(Debug, Clone, Default)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub field_id: Option<Uuid>,
    pub semester: Option<i16>,
}

/// Persistence operations consumed by the service.
///
/// Mutations are last-write-wins; there is no optimistic concurrency
/// token, so concurrent edits to the same row silently overwrite each
/// other.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Connectivity check for the readiness probe
    async fn ping(&self) -> Result<()>;

    // --- Resources ---

    /// All resources, newest-first by upload date; ties broken by
    /// insertion order (time-ordered ids).
    async fn list_resources(&self) -> Result<Vec<Resource>>;

    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>>;

    async fn create_resource(&self, input: NewResource) -> Result<Resource>;

    /// Returns `None` when no resource with `id` exists.
    async fn update_resource(&self, id: Uuid, patch: ResourcePatch) -> Result<Option<Resource>>;

    /// Returns whether a row was removed.
    async fn delete_resource(&self, id: Uuid) -> Result<bool>;

    // --- Fields ---

    /// All fields ordered by name.
    async fn list_fields(&self) -> Result<Vec<Field>>;

    async fn create_field(&self, name: String) -> Result<Field>;

    async fn update_field(&self, id: Uuid, name: String) -> Result<Option<Field>>;

    async fn delete_field(&self, id: Uuid) -> Result<bool>;

    // --- Subjects ---

    /// Subjects ordered by name, optionally scoped to a field and/or
    /// semester.
    async fn list_subjects(
        &self,
        field_id: Option<Uuid>,
        semester: Option<i16>,
    ) -> Result<Vec<Subject>>;

    async fn create_subject(&self, input: NewSubject) -> Result<Subject>;

    async fn update_subject(&self, id: Uuid, patch: SubjectPatch) -> Result<Option<Subject>>;

    async fn delete_subject(&self, id: Uuid) -> Result<bool>;

    // --- Referential counts (delete pre-checks) ---

    async fn count_resources_for_field(&self, field_name: &str) -> Result<u64>;

    async fn count_subjects_for_field(&self, field_id: Uuid) -> Result<u64>;

    async fn count_resources_for_subject(
        &self,
        field_name: &str,
        semester: i16,
        subject_name: &str,
    ) -> Result<u64>;

    // --- Admin users ---

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>>;

    async fn create_admin(
        &self,
        email: String,
        full_name: String,
        password_hash: String,
    ) -> Result<AdminUser>;
}
