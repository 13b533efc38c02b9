//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod postgres;

pub use postgres::{
    PostgresEnderecoRepository, PostgresEquipeProfRepository, PostgresEquipeRepository,
    PostgresEstabelecimentoRepository, PostgresHealthCheck, PostgresMantenedoraRepository,
    PostgresProfissionalRepository,
};
