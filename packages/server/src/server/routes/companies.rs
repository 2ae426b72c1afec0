use std::collections::HashMap;

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::common::{ApiResponse, PageRequest, Paginated};
use crate::domains::companies::{search, Company, CompanyError, FilterSet};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

/// Natural-language search result: the page plus the filters it ran with.
#[derive(Debug, Serialize)]
pub struct AiSearchResult {
    #[serde(flatten)]
    pub page: Paginated<Company>,
    pub filters: FilterSet,
}

fn page_request(
    params: &HashMap<String, String>,
    state: &AxumAppState,
) -> Result<PageRequest, ApiError> {
    PageRequest::parse(
        params.get("page").map(String::as_str),
        params.get("limit").map(String::as_str),
        &state.deps.page_sizes,
    )
    .map_err(ApiError::BadRequest)
}

/// GET /api/companies/search
///
/// Query params: name, industry, country, region, size, founded, product,
/// location, sort_field, sort_order, page, limit
pub async fn search_companies_handler(
    Extension(state): Extension<AxumAppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<Paginated<Company>>>, ApiError> {
    let page = page_request(&params, &state)?;
    let filters = FilterSet::from_query_params(&params);

    let result = search(state.deps.companies.as_ref(), &filters, page).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// GET /api/companies/ai-search?query=..
pub async fn ai_search_companies_handler(
    Extension(state): Extension<AxumAppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<AiSearchResult>>, ApiError> {
    let query = params.get("query").map(String::as_str).unwrap_or_default();
    if query.trim().is_empty() {
        return Err(ApiError::BadRequest("Search query is required".into()));
    }
    let page = page_request(&params, &state)?;

    let filters = state.deps.interpreter.interpret(query).await?;
    info!(filters = ?filters, "Parsed search filters");

    let result = search(state.deps.companies.as_ref(), &filters, page).await?;
    Ok(Json(ApiResponse::success(AiSearchResult {
        page: result,
        filters,
    })))
}

/// GET /api/companies/:id/enrich
pub async fn enrich_company_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Company>>, ApiError> {
    let id = Uuid::parse_str(id.trim()).map_err(|_| CompanyError::NotFound(id.clone()))?;

    let result = state.deps.enrichment.enrich(id).await?;
    Ok(Json(ApiResponse::success(result.company)))
}
