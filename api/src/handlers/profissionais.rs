//! Profissional handlers

use axum::{extract::State, http::StatusCode, Json};

use super::{AppJson, AppPath, AppQuery, PageParams};
use crate::domain::entities::{
    Equipe, NewProfissional, Profissional, ProfissionalFilter, ProfissionalId, ProfissionalPatch,
};
use crate::error::AppError;
use crate::AppState;

/// GET /profissionais
pub async fn list_profissionais(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<ProfissionalFilter>,
    AppQuery(page): AppQuery<PageParams>,
) -> Result<Json<Vec<Profissional>>, AppError> {
    Ok(Json(state.profissionais.list(&filter, page.into()).await?))
}

/// POST /profissionais
pub async fn create_profissional(
    State(state): State<AppState>,
    AppJson(new): AppJson<NewProfissional>,
) -> Result<(StatusCode, Json<Profissional>), AppError> {
    let profissional = state.profissionais.create(new).await?;
    Ok((StatusCode::CREATED, Json(profissional)))
}

/// GET /profissionais/sus/:codigo
pub async fn get_profissional_by_sus(
    State(state): State<AppState>,
    AppPath(codigo): AppPath<String>,
) -> Result<Json<Profissional>, AppError> {
    Ok(Json(state.profissionais.get_by_codigo_sus(&codigo).await?))
}

/// GET /profissionais/:id
pub async fn get_profissional(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProfissionalId>,
) -> Result<Json<Profissional>, AppError> {
    Ok(Json(state.profissionais.get(id).await?))
}

/// PUT|PATCH /profissionais/:id
pub async fn update_profissional(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProfissionalId>,
    AppJson(patch): AppJson<ProfissionalPatch>,
) -> Result<Json<Profissional>, AppError> {
    Ok(Json(state.profissionais.update(id, patch).await?))
}

/// DELETE /profissionais/:id
pub async fn delete_profissional(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProfissionalId>,
) -> Result<StatusCode, AppError> {
    state.profissionais.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /profissionais/:id/equipes
pub async fn list_profissional_equipes(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProfissionalId>,
) -> Result<Json<Vec<Equipe>>, AppError> {
    Ok(Json(state.profissionais.equipes(id).await?))
}
