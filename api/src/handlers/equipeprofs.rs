//! Team membership handlers

use axum::{extract::State, http::StatusCode, Json};

use super::{AppJson, AppPath, AppQuery, PageParams};
use crate::domain::entities::{
    CreateEquipeProf, EquipeProf, EquipeProfFilter, EquipeProfId, UpdateEquipeProf,
};
use crate::error::AppError;
use crate::AppState;

/// GET /equipeprofs
pub async fn list_equipeprofs(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<EquipeProfFilter>,
    AppQuery(page): AppQuery<PageParams>,
) -> Result<Json<Vec<EquipeProf>>, AppError> {
    Ok(Json(state.equipeprofs.list(&filter, page.into()).await?))
}

/// POST /equipeprofs
pub async fn create_equipeprof(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateEquipeProf>,
) -> Result<(StatusCode, Json<EquipeProf>), AppError> {
    let vinculo = state.equipeprofs.create(payload).await?;
    Ok((StatusCode::CREATED, Json(vinculo)))
}

/// GET /equipeprofs/:id
pub async fn get_equipeprof(
    State(state): State<AppState>,
    AppPath(id): AppPath<EquipeProfId>,
) -> Result<Json<EquipeProf>, AppError> {
    Ok(Json(state.equipeprofs.get(id).await?))
}

/// PUT|PATCH /equipeprofs/:id
pub async fn update_equipeprof(
    State(state): State<AppState>,
    AppPath(id): AppPath<EquipeProfId>,
    AppJson(payload): AppJson<UpdateEquipeProf>,
) -> Result<Json<EquipeProf>, AppError> {
    Ok(Json(state.equipeprofs.update(id, payload).await?))
}

/// DELETE /equipeprofs/:id
pub async fn delete_equipeprof(
    State(state): State<AppState>,
    AppPath(id): AppPath<EquipeProfId>,
) -> Result<StatusCode, AppError> {
    state.equipeprofs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
