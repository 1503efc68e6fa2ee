use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use studypoint_common::{
    auth::AdminContext,
    db::models::Subject,
    errors::{AppError, Result},
    store::{NewSubject, SubjectPatch},
    taxonomy,
};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubjectListParams {
    #[serde(rename = "fieldId")]
    pub field_id: Option<Uuid>,
    pub semester: Option<i16>,
}

/// GET /api/subjects
pub async fn list_subjects(
    State(state): State<AppState>,
    super::ApiQuery(params): super::ApiQuery<SubjectListParams>,
) -> Result<Json<Vec<Subject>>> {
    let subjects = state
        .store
        .list_subjects(params.field_id, params.semester)
        .await?;
    Ok(Json(subjects))
}

/// GET /api/semesters
pub async fn list_semesters() -> Json<Vec<i16>> {
    Json(taxonomy::semesters().collect())
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[serde(rename = "fieldId")]
    pub field_id: Uuid,
    #[validate(range(min = 1, max = 8))]
    pub semester: i16,
}

/// POST /api/subjects (admin)
pub async fn create_subject(
    State(state): State<AppState>,
    admin: AdminContext,
    Json(req): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<Subject>)> {
    req.validate().map_err(super::invalid)?;
    ensure_field_exists(&state, req.field_id).await?;

    let subject = state
        .store
        .create_subject(NewSubject {
            name: req.name,
            field_id: req.field_id,
            semester: req.semester,
        })
        .await?;
    state.taxonomy.reload(state.store.as_ref()).await?;

    info!(subject_id = %subject.id, admin = %admin.email, "subject created");
    Ok((StatusCode::CREATED, Json(subject)))
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[serde(rename = "fieldId")]
    pub field_id: Option<Uuid>,
    #[validate(range(min = 1, max = 8))]
    pub semester: Option<i16>,
}

/// PUT /api/subjects/{id} (admin)
pub async fn update_subject(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSubjectRequest>,
) -> Result<Json<Subject>> {
    req.validate().map_err(super::invalid)?;
    if let Some(field_id) = req.field_id {
        ensure_field_exists(&state, field_id).await?;
    }

    let subject = state
        .store
        .update_subject(
            id,
            SubjectPatch {
                name: req.name,
                field_id: req.field_id,
                semester: req.semester,
            },
        )
        .await?
        .ok_or_else(|| AppError::SubjectNotFound { id: id.to_string() })?;
    state.taxonomy.reload(state.store.as_ref()).await?;

    info!(subject_id = %id, admin = %admin.email, "subject updated");
    Ok(Json(subject))
}

/// DELETE /api/subjects/{id} (admin)
///
/// Blocked while any resource is filed under the subject.
pub async fn delete_subject(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let subjects = state.store.list_subjects(None, None).await?;
    let subject = subjects
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| AppError::SubjectNotFound { id: id.to_string() })?;

    let taxonomy = state.taxonomy.snapshot().await;
    let field_name = taxonomy.field_name(subject.field_id).unwrap_or_default();
    let references = state
        .store
        .count_resources_for_subject(field_name, subject.semester, &subject.name)
        .await?;
    if references > 0 {
        return Err(AppError::StillReferenced {
            entity: "Subject".to_string(),
            name: subject.name,
            references,
        });
    }

    if !state.store.delete_subject(id).await? {
        return Err(AppError::SubjectNotFound { id: id.to_string() });
    }
    state.taxonomy.reload(state.store.as_ref()).await?;

    info!(subject_id = %id, admin = %admin.email, "subject deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_field_exists(state: &AppState, field_id: Uuid) -> Result<()> {
    let fields = state.store.list_fields().await?;
    if !fields.iter().any(|f| f.id == field_id) {
        return Err(AppError::FieldNotFound {
            id: field_id.to_string(),
        });
    }
    Ok(())
}
