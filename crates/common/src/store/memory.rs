//! In-memory store backend
//!
//! Backs the test suite and the database-less dev mode. Tables are plain
//! vectors behind an async `RwLock`; rows keep their insertion order so
//! the newest-first resource listing can break upload-date ties by it.

use super::{CatalogStore, NewResource, NewSubject, ResourcePatch, SubjectPatch};
use crate::db::models::{AdminUser, Field, Resource, Subject};
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    resources: Vec<Resource>,
    fields: Vec<Field>,
    subjects: Vec<Subject>,
    admins: Vec<AdminUser>,
}

/// In-memory `CatalogStore`
#[derive(Default)]
pub struct MemCatalog {
    tables: RwLock<Tables>,
    simulate_unavailable: RwLock<bool>,
}

impl MemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with a service-unavailable error, for
    /// exercising store-failure handling in tests.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.simulate_unavailable.write().await = unavailable;
    }

    async fn check_available(&self) -> Result<()> {
        if *self.simulate_unavailable.read().await {
            return Err(AppError::ServiceUnavailable {
                message: "store unreachable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemCatalog {
    async fn ping(&self) -> Result<()> {
        self.check_available().await
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        let mut resources = tables.resources.clone();
        // Stable sort: equal upload dates keep insertion order
        resources.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(resources)
    }

    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        Ok(tables.resources.iter().find(|r| r.id == id).cloned())
    }

    async fn create_resource(&self, input: NewResource) -> Result<Resource> {
        self.check_available().await?;
        let resource = Resource {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            kind: input.kind,
            subject: input.subject,
            semester: input.semester,
            field: input.field,
            field_id: input.field_id,
            upload_date: Utc::now().into(),
            file_url: input.file_url,
        };
        let mut tables = self.tables.write().await;
        tables.resources.push(resource.clone());
        Ok(resource)
    }

    async fn update_resource(&self, id: Uuid, patch: ResourcePatch) -> Result<Option<Resource>> {
        self.check_available().await?;
        let mut tables = self.tables.write().await;
        let Some(resource) = tables.resources.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            resource.title = title;
        }
        if let Some(description) = patch.description {
            resource.description = description;
        }
        if let Some(kind) = patch.kind {
            resource.kind = kind;
        }
        if let Some(subject) = patch.subject {
            resource.subject = subject;
        }
        if let Some(semester) = patch.semester {
            resource.semester = semester;
        }
        if let Some(field) = patch.field {
            resource.field = field;
        }
        if let Some(field_id) = patch.field_id {
            resource.field_id = field_id;
        }
        if let Some(file_url) = patch.file_url {
            resource.file_url = file_url;
        }

        Ok(Some(resource.clone()))
    }

    async fn delete_resource(&self, id: Uuid) -> Result<bool> {
        self.check_available().await?;
        let mut tables = self.tables.write().await;
        let before = tables.resources.len();
        tables.resources.retain(|r| r.id != id);
        Ok(tables.resources.len() < before)
    }

    async fn list_fields(&self) -> Result<Vec<Field>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        let mut fields = tables.fields.clone();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fields)
    }

    async fn create_field(&self, name: String) -> Result<Field> {
        self.check_available().await?;
        let mut tables = self.tables.write().await;
        if tables.fields.iter().any(|f| f.name == name) {
            return Err(AppError::Duplicate {
                message: format!("field \"{}\" already exists", name),
            });
        }
        let field = Field {
            id: Uuid::new_v4(),
            name,
        };
        tables.fields.push(field.clone());
        Ok(field)
    }

    async fn update_field(&self, id: Uuid, name: String) -> Result<Option<Field>> {
        self.check_available().await?;
        let mut tables = self.tables.write().await;
        if tables.fields.iter().any(|f| f.name == name && f.id != id) {
            return Err(AppError::Duplicate {
                message: format!("field \"{}\" already exists", name),
            });
        }
        let Some(field) = tables.fields.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        field.name = name;
        Ok(Some(field.clone()))
    }

    async fn delete_field(&self, id: Uuid) -> Result<bool> {
        self.check_available().await?;
        let mut tables = self.tables.write().await;
        let before = tables.fields.len();
        tables.fields.retain(|f| f.id != id);
        Ok(tables.fields.len() < before)
    }

    async fn list_subjects(
        &self,
        field_id: Option<Uuid>,
        semester: Option<i16>,
    ) -> Result<Vec<Subject>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        let mut subjects: Vec<Subject> = tables
            .subjects
            .iter()
            .filter(|s| field_id.map_or(true, |id| s.field_id == id))
            .filter(|s| semester.map_or(true, |sem| s.semester == sem))
            .cloned()
            .collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }

    async fn create_subject(&self, input: NewSubject) -> Result<Subject> {
        self.check_available().await?;
        let subject = Subject {
            id: Uuid::new_v4(),
            name: input.name,
            field_id: input.field_id,
            semester: input.semester,
        };
        let mut tables = self.tables.write().await;
        tables.subjects.push(subject.clone());
        Ok(subject)
    }

    async fn update_subject(&self, id: Uuid, patch: SubjectPatch) -> Result<Option<Subject>> {
        self.check_available().await?;
        let mut tables = self.tables.write().await;
        let Some(subject) = tables.subjects.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            subject.name = name;
        }
        if let Some(field_id) = patch.field_id {
            subject.field_id = field_id;
        }
        if let Some(semester) = patch.semester {
            subject.semester = semester;
        }
        Ok(Some(subject.clone()))
    }

    async fn delete_subject(&self, id: Uuid) -> Result<bool> {
        self.check_available().await?;
        let mut tables = self.tables.write().await;
        let before = tables.subjects.len();
        tables.subjects.retain(|s| s.id != id);
        Ok(tables.subjects.len() < before)
    }

    async fn count_resources_for_field(&self, field_name: &str) -> Result<u64> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        Ok(tables
            .resources
            .iter()
            .filter(|r| r.field == field_name)
            .count() as u64)
    }

    async fn count_subjects_for_field(&self, field_id: Uuid) -> Result<u64> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        Ok(tables
            .subjects
            .iter()
            .filter(|s| s.field_id == field_id)
            .count() as u64)
    }

    async fn count_resources_for_subject(
        &self,
        field_name: &str,
        semester: i16,
        subject_name: &str,
    ) -> Result<u64> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        Ok(tables
            .resources
            .iter()
            .filter(|r| r.field == field_name && r.semester == semester && r.subject == subject_name)
            .count() as u64)
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
        self.check_available().await?;
        let tables = self.tables.read().await;
        Ok(tables.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn create_admin(
        &self,
        email: String,
        full_name: String,
        password_hash: String,
    ) -> Result<AdminUser> {
        self.check_available().await?;
        let mut tables = self.tables.write().await;
        if tables.admins.iter().any(|a| a.email == email) {
            return Err(AppError::Duplicate {
                message: format!("admin \"{}\" already exists", email),
            });
        }
        let admin = AdminUser {
            id: Uuid::new_v4(),
            email,
            full_name,
            password_hash,
            created_at: Utc::now().into(),
        };
        tables.admins.push(admin.clone());
        Ok(admin)
    }
}
