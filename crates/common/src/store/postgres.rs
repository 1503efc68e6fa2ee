//! Postgres store backend (SeaORM)

use super::{CatalogStore, NewResource, NewSubject, ResourcePatch, SubjectPatch};
use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// `CatalogStore` over a Postgres connection pool
#[derive(Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        // Ids are time-ordered (v7), so the ascending id tiebreak is
        // insertion order.
        ResourceEntity::find()
            .order_by_desc(ResourceColumn::UploadDate)
            .order_by_asc(ResourceColumn::Id)
            .all(self.pool.read())
            .await
            .map_err(Into::into)
    }

    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>> {
        ResourceEntity::find_by_id(id)
            .one(self.pool.read())
            .await
            .map_err(Into::into)
    }

    async fn create_resource(&self, input: NewResource) -> Result<Resource> {
        let row = ResourceActiveModel {
            id: Set(Uuid::now_v7()),
            title: Set(input.title),
            description: Set(input.description),
            kind: Set(input.kind),
            subject: Set(input.subject),
            semester: Set(input.semester),
            field: Set(input.field),
            field_id: Set(input.field_id),
            upload_date: Set(chrono::Utc::now().into()),
            file_url: Set(input.file_url),
        };
        row.insert(self.pool.write()).await.map_err(Into::into)
    }

    async fn update_resource(&self, id: Uuid, patch: ResourcePatch) -> Result<Option<Resource>> {
        let Some(existing) = ResourceEntity::find_by_id(id).one(self.pool.write()).await? else {
            return Ok(None);
        };

        let mut row: ResourceActiveModel = existing.into();
        if let Some(title) = patch.title {
            row.title = Set(title);
        }
        if let Some(description) = patch.description {
            row.description = Set(description);
        }
        if let Some(kind) = patch.kind {
            row.kind = Set(kind);
        }
        if let Some(subject) = patch.subject {
            row.subject = Set(subject);
        }
        if let Some(semester) = patch.semester {
            row.semester = Set(semester);
        }
        if let Some(field) = patch.field {
            row.field = Set(field);
        }
        if let Some(field_id) = patch.field_id {
            row.field_id = Set(field_id);
        }
        if let Some(file_url) = patch.file_url {
            row.file_url = Set(file_url);
        }

        row.update(self.pool.write()).await.map(Some).map_err(Into::into)
    }

    async fn delete_resource(&self, id: Uuid) -> Result<bool> {
        let result = ResourceEntity::delete_by_id(id)
            .exec(self.pool.write())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_fields(&self) -> Result<Vec<Field>> {
        FieldEntity::find()
            .order_by_asc(FieldColumn::Name)
            .all(self.pool.read())
            .await
            .map_err(Into::into)
    }

    async fn create_field(&self, name: String) -> Result<Field> {
        let row = FieldActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
        };
        row.insert(self.pool.write()).await.map_err(Into::into)
    }

    async fn update_field(&self, id: Uuid, name: String) -> Result<Option<Field>> {
        let Some(existing) = FieldEntity::find_by_id(id).one(self.pool.write()).await? else {
            return Ok(None);
        };
        let mut row: FieldActiveModel = existing.into();
        row.name = Set(name);
        row.update(self.pool.write()).await.map(Some).map_err(Into::into)
    }

    async fn delete_field(&self, id: Uuid) -> Result<bool> {
        let result = FieldEntity::delete_by_id(id).exec(self.pool.write()).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_subjects(
        &self,
        field_id: Option<Uuid>,
        semester: Option<i16>,
    ) -> Result<Vec<Subject>> {
        let mut query = SubjectEntity::find().order_by_asc(SubjectColumn::Name);
        if let Some(field_id) = field_id {
            query = query.filter(SubjectColumn::FieldId.eq(field_id));
        }
        if let Some(semester) = semester {
            query = query.filter(SubjectColumn::Semester.eq(semester));
        }
        query.all(self.pool.read()).await.map_err(Into::into)
    }

    async fn create_subject(&self, input: NewSubject) -> Result<Subject> {
        let row = SubjectActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            field_id: Set(input.field_id),
            semester: Set(input.semester),
        };
        row.insert(self.pool.write()).await.map_err(Into::into)
    }

    async fn update_subject(&self, id: Uuid, patch: SubjectPatch) -> Result<Option<Subject>> {
        let Some(existing) = SubjectEntity::find_by_id(id).one(self.pool.write()).await? else {
            return Ok(None);
        };
        let mut row: SubjectActiveModel = existing.into();
        if let Some(name) = patch.name {
            row.name = Set(name);
        }
        if let Some(field_id) = patch.field_id {
            row.field_id = Set(field_id);
        }
        if let Some(semester) = patch.semester {
            row.semester = Set(semester);
        }
        row.update(self.pool.write()).await.map(Some).map_err(Into::into)
    }

    async fn delete_subject(&self, id: Uuid) -> Result<bool> {
        let result = SubjectEntity::delete_by_id(id)
            .exec(self.pool.write())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_resources_for_field(&self, field_name: &str) -> Result<u64> {
        ResourceEntity::find()
            .filter(ResourceColumn::Field.eq(field_name))
            .count(self.pool.read())
            .await
            .map_err(Into::into)
    }

    async fn count_subjects_for_field(&self, field_id: Uuid) -> Result<u64> {
        SubjectEntity::find()
            .filter(SubjectColumn::FieldId.eq(field_id))
            .count(self.pool.read())
            .await
            .map_err(Into::into)
    }

    async fn count_resources_for_subject(
        &self,
        field_name: &str,
        semester: i16,
        subject_name: &str,
    ) -> Result<u64> {
        ResourceEntity::find()
            .filter(ResourceColumn::Field.eq(field_name))
            .filter(ResourceColumn::Semester.eq(semester))
            .filter(ResourceColumn::Subject.eq(subject_name))
            .count(self.pool.read())
            .await
            .map_err(Into::into)
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
        AdminUserEntity::find()
            .filter(AdminUserColumn::Email.eq(email))
            .one(self.pool.read())
            .await
            .map_err(Into::into)
    }

    async fn create_admin(
        &self,
        email: String,
        full_name: String,
        password_hash: String,
    ) -> Result<AdminUser> {
        let row = AdminUserActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            full_name: Set(full_name),
            password_hash: Set(password_hash),
            created_at: Set(chrono::Utc::now().into()),
        };
        row.insert(self.pool.write()).await.map_err(Into::into)
    }
}
