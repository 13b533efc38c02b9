//! Endereco handlers

use axum::{extract::State, http::StatusCode, Json};

use super::{AppJson, AppPath, AppQuery, PageParams};
use crate::domain::entities::{Endereco, EnderecoFilter, EnderecoId, EnderecoPatch, NewEndereco};
use crate::error::AppError;
use crate::AppState;

/// GET /enderecos
pub async fn list_enderecos(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<EnderecoFilter>,
    AppQuery(page): AppQuery<PageParams>,
) -> Result<Json<Vec<Endereco>>, AppError> {
    Ok(Json(state.enderecos.list(&filter, page.into()).await?))
}

/// POST /enderecos
pub async fn create_endereco(
    State(state): State<AppState>,
    AppJson(new): AppJson<NewEndereco>,
) -> Result<(StatusCode, Json<Endereco>), AppError> {
    let endereco = state.enderecos.create(new).await?;
    Ok((StatusCode::CREATED, Json(endereco)))
}

/// GET /enderecos/:id
pub async fn get_endereco(
    State(state): State<AppState>,
    AppPath(id): AppPath<EnderecoId>,
) -> Result<Json<Endereco>, AppError> {
    Ok(Json(state.enderecos.get(id).await?))
}

/// PUT|PATCH /enderecos/:id
pub async fn update_endereco(
    State(state): State<AppState>,
    AppPath(id): AppPath<EnderecoId>,
    AppJson(patch): AppJson<EnderecoPatch>,
) -> Result<Json<Endereco>, AppError> {
    Ok(Json(state.enderecos.update(id, patch).await?))
}

/// DELETE /enderecos/:id
pub async fn delete_endereco(
    State(state): State<AppState>,
    AppPath(id): AppPath<EnderecoId>,
) -> Result<StatusCode, AppError> {
    state.enderecos.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
