//! Estabelecimento handlers
//!
//! Reads return the facility with its address embedded under `endereco`.

use axum::{extract::State, http::StatusCode, Json};

use super::{AppJson, AppPath, AppQuery, PageParams};
use crate::domain::entities::{
    Endereco, Equipe, Estabelecimento, EstabelecimentoDetalhado, EstabelecimentoFilter,
    EstabelecimentoId, EstabelecimentoPatch, NewEstabelecimento,
};
use crate::error::AppError;
use crate::AppState;

/// GET /estabelecimentos
pub async fn list_estabelecimentos(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<EstabelecimentoFilter>,
    AppQuery(page): AppQuery<PageParams>,
) -> Result<Json<Vec<EstabelecimentoDetalhado>>, AppError> {
    let estabelecimentos = state.estabelecimentos.list(&filter, page.into()).await?;
    Ok(Json(estabelecimentos))
}

/// POST /estabelecimentos
pub async fn create_estabelecimento(
    State(state): State<AppState>,
    AppJson(new): AppJson<NewEstabelecimento>,
) -> Result<(StatusCode, Json<Estabelecimento>), AppError> {
    let estabelecimento = state.estabelecimentos.create(new).await?;
    Ok((StatusCode::CREATED, Json(estabelecimento)))
}

/// GET /estabelecimentos/:id
pub async fn get_estabelecimento(
    State(state): State<AppState>,
    AppPath(id): AppPath<EstabelecimentoId>,
) -> Result<Json<EstabelecimentoDetalhado>, AppError> {
    Ok(Json(state.estabelecimentos.get(id).await?))
}

/// GET /estabelecimentos/unidade/:codigo
pub async fn get_estabelecimento_by_unidade(
    State(state): State<AppState>,
    AppPath(codigo): AppPath<String>,
) -> Result<Json<EstabelecimentoDetalhado>, AppError> {
    Ok(Json(state.estabelecimentos.get_by_codigo_unidade(&codigo).await?))
}

/// GET /estabelecimentos/cnes/:codigo
pub async fn get_estabelecimento_by_cnes(
    State(state): State<AppState>,
    AppPath(codigo): AppPath<String>,
) -> Result<Json<EstabelecimentoDetalhado>, AppError> {
    Ok(Json(state.estabelecimentos.get_by_codigo_cnes(&codigo).await?))
}

/// PUT|PATCH /estabelecimentos/:id
pub async fn update_estabelecimento(
    State(state): State<AppState>,
    AppPath(id): AppPath<EstabelecimentoId>,
    AppJson(patch): AppJson<EstabelecimentoPatch>,
) -> Result<Json<Estabelecimento>, AppError> {
    Ok(Json(state.estabelecimentos.update(id, patch).await?))
}

/// DELETE /estabelecimentos/:id
pub async fn delete_estabelecimento(
    State(state): State<AppState>,
    AppPath(id): AppPath<EstabelecimentoId>,
) -> Result<StatusCode, AppError> {
    state.estabelecimentos.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /estabelecimentos/:id/endereco
pub async fn get_estabelecimento_endereco(
    State(state): State<AppState>,
    AppPath(id): AppPath<EstabelecimentoId>,
) -> Result<Json<Endereco>, AppError> {
    Ok(Json(state.estabelecimentos.endereco(id).await?))
}

/// GET /estabelecimentos/:id/equipes
pub async fn list_estabelecimento_equipes(
    State(state): State<AppState>,
    AppPath(id): AppPath<EstabelecimentoId>,
    AppQuery(page): AppQuery<PageParams>,
) -> Result<Json<Vec<Equipe>>, AppError> {
    Ok(Json(state.estabelecimentos.equipes(id, page.into()).await?))
}
