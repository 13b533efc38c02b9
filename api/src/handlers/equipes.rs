//! Equipe handlers
//!
//! Teams reference their facility by `codigo_unidade` on the wire.

use axum::{extract::State, http::StatusCode, Json};

use super::{AppJson, AppPath, AppQuery, PageParams};
use crate::domain::entities::{
    CreateEquipe, Equipe, EquipeComProfissionais, EquipeFilter, EquipeId, UpdateEquipe,
};
use crate::error::AppError;
use crate::AppState;

/// GET /equipes
pub async fn list_equipes(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<EquipeFilter>,
    AppQuery(page): AppQuery<PageParams>,
) -> Result<Json<Vec<Equipe>>, AppError> {
    Ok(Json(state.equipes.list(&filter, page.into()).await?))
}

/// POST /equipes
pub async fn create_equipe(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateEquipe>,
) -> Result<(StatusCode, Json<Equipe>), AppError> {
    let equipe = state.equipes.create(payload).await?;
    Ok((StatusCode::CREATED, Json(equipe)))
}

/// GET /equipes/:id
pub async fn get_equipe(
    State(state): State<AppState>,
    AppPath(id): AppPath<EquipeId>,
) -> Result<Json<Equipe>, AppError> {
    Ok(Json(state.equipes.get(id).await?))
}

/// PUT|PATCH /equipes/:id
pub async fn update_equipe(
    State(state): State<AppState>,
    AppPath(id): AppPath<EquipeId>,
    AppJson(payload): AppJson<UpdateEquipe>,
) -> Result<Json<Equipe>, AppError> {
    Ok(Json(state.equipes.update(id, payload).await?))
}

/// DELETE /equipes/:id
pub async fn delete_equipe(
    State(state): State<AppState>,
    AppPath(id): AppPath<EquipeId>,
) -> Result<StatusCode, AppError> {
    state.equipes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /equipes/:id/profissionais
pub async fn get_equipe_profissionais(
    State(state): State<AppState>,
    AppPath(id): AppPath<EquipeId>,
) -> Result<Json<EquipeComProfissionais>, AppError> {
    Ok(Json(state.equipes.get_with_profissionais(id).await?))
}
