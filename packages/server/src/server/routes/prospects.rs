use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::common::ApiResponse;
use crate::domains::prospects::{ProspectError, ProspectWithCompany, SavedProspect};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SaveProspectRequest {
    pub company_id: String,
}

/// Ids that are not UUIDs cannot name a stored company.
fn parse_company_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// POST /api/prospects
pub async fn save_prospect_handler(
    Extension(state): Extension<AxumAppState>,
    body: Result<Json<SaveProspectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<SavedProspect>>), ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let company_id = parse_company_id(&request.company_id)
        .ok_or_else(|| ProspectError::CompanyNotFound(request.company_id.clone()))?;

    let prospect = state.deps.prospects.save(company_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            prospect,
            "Prospect saved successfully",
        )),
    ))
}

/// GET /api/prospects
pub async fn list_prospects_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<ApiResponse<Vec<ProspectWithCompany>>>, ApiError> {
    let prospects = state.deps.prospects.list().await?;
    Ok(Json(ApiResponse::success(prospects)))
}

/// DELETE /api/prospects/:company_id
pub async fn delete_prospect_handler(
    Extension(state): Extension<AxumAppState>,
    Path(company_id): Path<String>,
) -> Result<Json<ApiResponse<SavedProspect>>, ApiError> {
    let id = parse_company_id(&company_id).ok_or(ProspectError::NotSaved(company_id.clone()))?;

    let prospect = state.deps.prospects.delete(id).await?;
    Ok(Json(ApiResponse::with_message(
        prospect,
        "Prospect deleted successfully",
    )))
}
