//! Mantenedora handlers

use axum::{extract::State, http::StatusCode, Json};

use super::{AppJson, AppPath, AppQuery, PageParams};
use crate::domain::entities::{
    Estabelecimento, Mantenedora, MantenedoraFilter, MantenedoraId, MantenedoraPatch,
    NewMantenedora,
};
use crate::error::AppError;
use crate::AppState;

/// GET /mantenedoras
pub async fn list_mantenedoras(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<MantenedoraFilter>,
    AppQuery(page): AppQuery<PageParams>,
) -> Result<Json<Vec<Mantenedora>>, AppError> {
    let mantenedoras = state.mantenedoras.list(&filter, page.into()).await?;
    Ok(Json(mantenedoras))
}

/// POST /mantenedoras
pub async fn create_mantenedora(
    State(state): State<AppState>,
    AppJson(new): AppJson<NewMantenedora>,
) -> Result<(StatusCode, Json<Mantenedora>), AppError> {
    let mantenedora = state.mantenedoras.create(new).await?;
    Ok((StatusCode::CREATED, Json(mantenedora)))
}

/// GET /mantenedoras/:id
pub async fn get_mantenedora(
    State(state): State<AppState>,
    AppPath(id): AppPath<MantenedoraId>,
) -> Result<Json<Mantenedora>, AppError> {
    Ok(Json(state.mantenedoras.get(id).await?))
}

/// PUT|PATCH /mantenedoras/:id
pub async fn update_mantenedora(
    State(state): State<AppState>,
    AppPath(id): AppPath<MantenedoraId>,
    AppJson(patch): AppJson<MantenedoraPatch>,
) -> Result<Json<Mantenedora>, AppError> {
    Ok(Json(state.mantenedoras.update(id, patch).await?))
}

/// DELETE /mantenedoras/:id
///
/// Removes every facility the mantenedora sponsors.
pub async fn delete_mantenedora(
    State(state): State<AppState>,
    AppPath(id): AppPath<MantenedoraId>,
) -> Result<StatusCode, AppError> {
    state.mantenedoras.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /mantenedoras/:id/estabelecimentos
pub async fn list_mantenedora_estabelecimentos(
    State(state): State<AppState>,
    AppPath(id): AppPath<MantenedoraId>,
    AppQuery(page): AppQuery<PageParams>,
) -> Result<Json<Vec<Estabelecimento>>, AppError> {
    let estabelecimentos = state
        .mantenedoras
        .list_estabelecimentos(id, page.into())
        .await?;
    Ok(Json(estabelecimentos))
}
