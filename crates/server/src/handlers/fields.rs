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
    db::models::Field,
    errors::{AppError, Result},
};

use crate::AppState;

/// GET /api/fields
pub async fn list_fields(State(state): State<AppState>) -> Result<Json<Vec<Field>>> {
    Ok(Json(state.store.list_fields().await?))
}

#[derive(Debug, Deserialize, Validate)]
pub struct FieldRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// POST /api/fields (admin)
pub async fn create_field(
    State(state): State<AppState>,
    admin: AdminContext,
    Json(req): Json<FieldRequest>,
) -> Result<(StatusCode, Json<Field>)> {
    req.validate().map_err(super::invalid)?;
    ensure_name_free(&state, &req.name, None).await?;

    let field = state.store.create_field(req.name).await?;
    state.taxonomy.reload(state.store.as_ref()).await?;

    info!(field_id = %field.id, admin = %admin.email, "field created");
    Ok((StatusCode::CREATED, Json(field)))
}

/// PUT /api/fields/{id} (admin)
///
/// Renames the field only. Resources keep the field name they were
/// uploaded under; they are not rewritten on rename.
pub async fn update_field(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
    Json(req): Json<FieldRequest>,
) -> Result<Json<Field>> {
    req.validate().map_err(super::invalid)?;
    ensure_name_free(&state, &req.name, Some(id)).await?;

    let field = state
        .store
        .update_field(id, req.name)
        .await?
        .ok_or_else(|| AppError::FieldNotFound { id: id.to_string() })?;
    state.taxonomy.reload(state.store.as_ref()).await?;

    info!(field_id = %id, admin = %admin.email, "field renamed");
    Ok(Json(field))
}

/// DELETE /api/fields/{id} (admin)
///
/// Blocked while any subject or resource still references the field.
pub async fn delete_field(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let fields = state.store.list_fields().await?;
    let field = fields
        .into_iter()
        .find(|f| f.id == id)
        .ok_or_else(|| AppError::FieldNotFound { id: id.to_string() })?;

    let subjects = state.store.count_subjects_for_field(id).await?;
    let resources = state.store.count_resources_for_field(&field.name).await?;
    if subjects + resources > 0 {
        return Err(AppError::StillReferenced {
            entity: "Field".to_string(),
            name: field.name,
            references: subjects + resources,
        });
    }

    if !state.store.delete_field(id).await? {
        return Err(AppError::FieldNotFound { id: id.to_string() });
    }
    state.taxonomy.reload(state.store.as_ref()).await?;

    info!(field_id = %id, admin = %admin.email, "field deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Case-insensitive uniqueness check for field names. `exclude` skips
/// the row being renamed.
async fn ensure_name_free(state: &AppState, name: &str, exclude: Option<Uuid>) -> Result<()> {
    let fields = state.store.list_fields().await?;
    let taken = fields
        .iter()
        .filter(|f| exclude != Some(f.id))
        .any(|f| f.name.eq_ignore_ascii_case(name));
    if taken {
        return Err(AppError::Duplicate {
            message: format!("field \"{}\" already exists", name),
        });
    }
    Ok(())
}
