use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use studypoint_common::{
    auth::AdminContext,
    catalog::{page_links, BrowseView, PageLink},
    db::models::{Resource, ResourceKind},
    errors::{AppError, Result},
    metrics::record_catalog_query,
    store::{NewResource, ResourcePatch},
};

use crate::AppState;

/// Browse query string. Every dimension is optional; omitted means
/// unfiltered. `page` and `perPage` are signed so out-of-range values
/// clamp instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    pub field: Option<Uuid>,
    pub semester: Option<i16>,
    pub subject: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ResourceKind>,
    pub q: Option<String>,
    pub page: Option<i64>,
    #[serde(rename = "perPage")]
    pub per_page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ResourcePage {
    pub items: Vec<Resource>,
    pub page: usize,
    #[serde(rename = "perPage")]
    pub per_page: usize,
    #[serde(rename = "totalItems")]
    pub total_items: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
    pub links: Vec<PageLink>,
}

/// GET /api/resources
///
/// Applies the filter dimensions, reconciles a stale subject selection,
/// clamps the requested page and returns one page plus its pager links.
pub async fn list_resources(
    State(state): State<AppState>,
    super::ApiQuery(params): super::ApiQuery<BrowseParams>,
) -> Result<Json<ResourcePage>> {
    let taxonomy = state.taxonomy.snapshot().await;
    let per_page = params
        .per_page
        .map(|p| p.clamp(1, state.config.catalog.max_page_size as i64) as usize)
        .unwrap_or(state.config.catalog.page_size);
    // Zero and negative page requests clamp to the first page.
    let requested_page = params.page.map_or(1, |p| p.max(1)) as usize;

    let mut view = BrowseView::new(per_page);
    view.set_field(params.field, &taxonomy);
    view.set_semester(params.semester, &taxonomy);
    view.set_subject(params.subject, &taxonomy);
    view.set_kind(params.kind);
    view.set_search(params.q);
    view.set_page(requested_page);

    let resources = state.store.list_resources().await?;
    let started = Instant::now();
    let page = view.render(&resources, &taxonomy);
    record_catalog_query(started.elapsed().as_secs_f64(), page.total_items);

    let links = page_links(page.current_page, page.total_pages);
    Ok(Json(ResourcePage {
        items: page.items,
        page: page.current_page,
        per_page,
        total_items: page.total_items,
        total_pages: page.total_pages,
        links,
    }))
}

/// GET /api/resources/{id}
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Resource>> {
    state
        .store
        .get_resource(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::ResourceNotFound { id: id.to_string() })
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateResourceRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(range(min = 1, max = 8))]
    pub semester: i16,
    #[serde(rename = "fieldId")]
    pub field_id: Uuid,
    #[serde(rename = "fileUrl", default)]
    pub file_url: String,
}

/// POST /api/resources (admin)
pub async fn create_resource(
    State(state): State<AppState>,
    admin: AdminContext,
    Json(req): Json<CreateResourceRequest>,
) -> Result<(StatusCode, Json<Resource>)> {
    req.validate().map_err(super::invalid)?;

    let taxonomy = state.taxonomy.snapshot().await;
    let field = taxonomy
        .field_name(req.field_id)
        .ok_or_else(|| AppError::FieldNotFound {
            id: req.field_id.to_string(),
        })?
        .to_string();

    if !taxonomy.contains_subject(Some(req.field_id), Some(req.semester), &req.subject) {
        return Err(AppError::Validation {
            message: format!(
                "subject \"{}\" is not defined for {} semester {}",
                req.subject, field, req.semester
            ),
            field: Some("subject".to_string()),
        });
    }

    let resource = state
        .store
        .create_resource(NewResource {
            title: req.title,
            description: req.description,
            kind: req.kind,
            subject: req.subject,
            semester: req.semester,
            field,
            field_id: Some(req.field_id),
            file_url: req.file_url,
        })
        .await?;

    info!(resource_id = %resource.id, admin = %admin.email, "resource created");
    Ok((StatusCode::CREATED, Json(resource)))
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateResourceRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ResourceKind>,
    #[validate(length(min = 1))]
    pub subject: Option<String>,
    #[validate(range(min = 1, max = 8))]
    pub semester: Option<i16>,
    #[serde(rename = "fieldId")]
    pub field_id: Option<Uuid>,
    #[serde(rename = "fileUrl")]
    pub file_url: Option<String>,
}

/// PUT /api/resources/{id} (admin)
///
/// Partial update; the upload date never changes. The subject placement
/// is re-checked only when the caller moves the resource inside the
/// taxonomy, so rows referencing since-removed subjects can still have
/// their title or file fixed.
pub async fn update_resource(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateResourceRequest>,
) -> Result<Json<Resource>> {
    req.validate().map_err(super::invalid)?;

    let existing = state
        .store
        .get_resource(id)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound { id: id.to_string() })?;
    let taxonomy = state.taxonomy.snapshot().await;

    let mut patch = ResourcePatch {
        title: req.title,
        description: req.description,
        kind: req.kind,
        subject: req.subject.clone(),
        semester: req.semester,
        field: None,
        field_id: None,
        file_url: req.file_url,
    };

    if let Some(field_id) = req.field_id {
        let name = taxonomy
            .field_name(field_id)
            .ok_or_else(|| AppError::FieldNotFound {
                id: field_id.to_string(),
            })?;
        patch.field = Some(name.to_string());
        patch.field_id = Some(Some(field_id));
    }

    if req.subject.is_some() || req.semester.is_some() || req.field_id.is_some() {
        let field_id = req.field_id.or(existing.field_id);
        let semester = req.semester.unwrap_or(existing.semester);
        let subject = req.subject.as_deref().unwrap_or(&existing.subject);
        if !taxonomy.contains_subject(field_id, Some(semester), subject) {
            return Err(AppError::Validation {
                message: format!(
                    "subject \"{}\" is not defined for semester {}",
                    subject, semester
                ),
                field: Some("subject".to_string()),
            });
        }
    }

    let updated = state
        .store
        .update_resource(id, patch)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound { id: id.to_string() })?;

    info!(resource_id = %id, admin = %admin.email, "resource updated");
    Ok(Json(updated))
}

/// DELETE /api/resources/{id} (admin)
pub async fn delete_resource(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.store.delete_resource(id).await? {
        return Err(AppError::ResourceNotFound { id: id.to_string() });
    }
    info!(resource_id = %id, admin = %admin.email, "resource deleted");
    Ok(StatusCode::NO_CONTENT)
}
