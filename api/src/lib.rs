//! CNES Registry API
//!
//! CRUD service over the CNES health-facility registry: mantenedoras,
//! estabelecimentos and their addresses, professionals, teams and team
//! memberships. Uses hexagonal (ports & adapters) architecture; the same
//! application services back the HTTP API and the `cnes-import` loader.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod entity;
pub mod error;
pub mod handlers;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod integration_tests;

use adapters::{
    PostgresEnderecoRepository, PostgresEquipeProfRepository, PostgresEquipeRepository,
    PostgresEstabelecimentoRepository, PostgresHealthCheck, PostgresMantenedoraRepository,
    PostgresProfissionalRepository,
};
use app::{
    EnderecoService, EquipeProfService, EquipeService, EstabelecimentoService,
    MantenedoraService, ProfissionalService,
};
use config::Config;
use domain::entities::EquipeProf;
use domain::ports::{
    EnderecoRepository, EquipeRepository, EstabelecimentoRepository, HealthCheck,
    MantenedoraRepository, ProfissionalRepository, Repository,
};

/// Open the connection pool described by `config`
pub async fn connect_database(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(config.db_echo_log);
    Database::connect(options).await
}

/// One implementation of every port
#[derive(Clone)]
pub struct Repositories {
    pub mantenedoras: Arc<dyn MantenedoraRepository>,
    pub estabelecimentos: Arc<dyn EstabelecimentoRepository>,
    pub enderecos: Arc<dyn EnderecoRepository>,
    pub profissionais: Arc<dyn ProfissionalRepository>,
    pub equipes: Arc<dyn EquipeRepository>,
    pub equipeprofs: Arc<dyn Repository<EquipeProf>>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repositories {
    pub fn postgres(db: DatabaseConnection) -> Self {
        Self {
            mantenedoras: Arc::new(PostgresMantenedoraRepository::new(db.clone())),
            estabelecimentos: Arc::new(PostgresEstabelecimentoRepository::new(db.clone())),
            enderecos: Arc::new(PostgresEnderecoRepository::new(db.clone())),
            profissionais: Arc::new(PostgresProfissionalRepository::new(db.clone())),
            equipes: Arc::new(PostgresEquipeRepository::new(db.clone())),
            equipeprofs: Arc::new(PostgresEquipeProfRepository::new(db.clone())),
            health: Arc::new(PostgresHealthCheck::new(db)),
        }
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory(store: Arc<test_utils::InMemoryCnesStore>) -> Self {
        Self {
            mantenedoras: store.clone(),
            estabelecimentos: store.clone(),
            enderecos: store.clone(),
            profissionais: store.clone(),
            equipes: store.clone(),
            equipeprofs: store.clone(),
            health: store,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub mantenedoras: Arc<MantenedoraService>,
    pub estabelecimentos: Arc<EstabelecimentoService>,
    pub enderecos: Arc<EnderecoService>,
    pub profissionais: Arc<ProfissionalService>,
    pub equipes: Arc<EquipeService>,
    pub equipeprofs: Arc<EquipeProfService>,
    pub health: Arc<dyn HealthCheck>,
    pub version: &'static str,
}

impl AppState {
    pub fn new(repos: Repositories) -> Self {
        let Repositories {
            mantenedoras,
            estabelecimentos,
            enderecos,
            profissionais,
            equipes,
            equipeprofs,
            health,
        } = repos;

        Self {
            mantenedoras: Arc::new(MantenedoraService::new(
                mantenedoras.clone(),
                estabelecimentos.clone(),
            )),
            estabelecimentos: Arc::new(EstabelecimentoService::new(
                estabelecimentos.clone(),
                mantenedoras,
                enderecos.clone(),
                equipes.clone(),
            )),
            enderecos: Arc::new(EnderecoService::new(enderecos, estabelecimentos.clone())),
            profissionais: Arc::new(ProfissionalService::new(
                profissionais.clone(),
                equipes.clone(),
            )),
            equipes: Arc::new(EquipeService::new(
                equipes.clone(),
                estabelecimentos,
                profissionais.clone(),
            )),
            equipeprofs: Arc::new(EquipeProfService::new(equipeprofs, equipes, profissionais)),
            health,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Build the HTTP router with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    use handlers::{
        enderecos, equipeprofs, equipes, estabelecimentos, healthcheck, mantenedoras,
        profissionais,
    };

    Router::new()
        .route("/healthcheck", get(healthcheck))
        // Mantenedoras
        .route(
            "/mantenedoras",
            get(mantenedoras::list_mantenedoras).post(mantenedoras::create_mantenedora),
        )
        .route(
            "/mantenedoras/:id",
            get(mantenedoras::get_mantenedora)
                .put(mantenedoras::update_mantenedora)
                .patch(mantenedoras::update_mantenedora)
                .delete(mantenedoras::delete_mantenedora),
        )
        .route(
            "/mantenedoras/:id/estabelecimentos",
            get(mantenedoras::list_mantenedora_estabelecimentos),
        )
        // Estabelecimentos
        .route(
            "/estabelecimentos",
            get(estabelecimentos::list_estabelecimentos)
                .post(estabelecimentos::create_estabelecimento),
        )
        .route(
            "/estabelecimentos/unidade/:codigo",
            get(estabelecimentos::get_estabelecimento_by_unidade),
        )
        .route(
            "/estabelecimentos/cnes/:codigo",
            get(estabelecimentos::get_estabelecimento_by_cnes),
        )
        .route(
            "/estabelecimentos/:id",
            get(estabelecimentos::get_estabelecimento)
                .put(estabelecimentos::update_estabelecimento)
                .patch(estabelecimentos::update_estabelecimento)
                .delete(estabelecimentos::delete_estabelecimento),
        )
        .route(
            "/estabelecimentos/:id/endereco",
            get(estabelecimentos::get_estabelecimento_endereco),
        )
        .route(
            "/estabelecimentos/:id/equipes",
            get(estabelecimentos::list_estabelecimento_equipes),
        )
        // Enderecos
        .route(
            "/enderecos",
            get(enderecos::list_enderecos).post(enderecos::create_endereco),
        )
        .route(
            "/enderecos/:id",
            get(enderecos::get_endereco)
                .put(enderecos::update_endereco)
                .patch(enderecos::update_endereco)
                .delete(enderecos::delete_endereco),
        )
        // Profissionais
        .route(
            "/profissionais",
            get(profissionais::list_profissionais).post(profissionais::create_profissional),
        )
        .route(
            "/profissionais/sus/:codigo",
            get(profissionais::get_profissional_by_sus),
        )
        .route(
            "/profissionais/:id",
            get(profissionais::get_profissional)
                .put(profissionais::update_profissional)
                .patch(profissionais::update_profissional)
                .delete(profissionais::delete_profissional),
        )
        .route(
            "/profissionais/:id/equipes",
            get(profissionais::list_profissional_equipes),
        )
        // Equipes
        .route(
            "/equipes",
            get(equipes::list_equipes).post(equipes::create_equipe),
        )
        .route(
            "/equipes/:id",
            get(equipes::get_equipe)
                .put(equipes::update_equipe)
                .patch(equipes::update_equipe)
                .delete(equipes::delete_equipe),
        )
        .route(
            "/equipes/:id/profissionais",
            get(equipes::get_equipe_profissionais),
        )
        // Team memberships
        .route(
            "/equipeprofs",
            get(equipeprofs::list_equipeprofs).post(equipeprofs::create_equipeprof),
        )
        .route(
            "/equipeprofs/:id",
            get(equipeprofs::get_equipeprof)
                .put(equipeprofs::update_equipeprof)
                .patch(equipeprofs::update_equipeprof)
                .delete(equipeprofs::delete_equipeprof),
        )
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
