//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod endereco_repo;
pub mod equipe_prof_repo;
pub mod equipe_repo;
pub mod estabelecimento_repo;
pub mod health;
pub mod mantenedora_repo;
pub mod profissional_repo;


use sea_orm::{DbErr, SqlErr};

use crate::domain::constraints::{
    constraint_name, foreign_key_violation_message, unique_violation_message,
};
use crate::error::DomainError;

pub use endereco_repo::PostgresEnderecoRepository;
pub use equipe_prof_repo::PostgresEquipeProfRepository;
pub use equipe_repo::PostgresEquipeRepository;
pub use estabelecimento_repo::PostgresEstabelecimentoRepository;
pub use health::PostgresHealthCheck;
pub use mantenedora_repo::PostgresMantenedoraRepository;
pub use profissional_repo::PostgresProfissionalRepository;

/// Translate constraint violations into domain errors; everything else is a
/// plain database error
pub(crate) fn map_db_err(err: DbErr) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            tracing::debug!("Unique violation: {}", msg);
            DomainError::AlreadyExists(unique_violation_message(constraint_name(&msg)).to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            tracing::debug!("Foreign key violation: {}", msg);
            DomainError::InvalidReference(
                foreign_key_violation_message(constraint_name(&msg)).to_string(),
            )
        }
        _ => DomainError::Database(err.to_string()),
    }
}

/// `%value%` pattern for ILIKE filters
pub(crate) fn contains_pattern(value: &str) -> String {
    format!("%{}%", value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_constraint_errors_are_database_errors() {
        let err = map_db_err(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, DomainError::Database(msg) if msg.contains("boom")));
    }

    #[test]
    fn record_not_found_is_database_error() {
        let err = map_db_err(DbErr::RecordNotFound("mantenedoras".to_string()));
        assert!(matches!(err, DomainError::Database(_)));
    }

    #[test]
    fn pattern_wraps_trimmed_value() {
        assert_eq!(contains_pattern(" Hospital "), "%Hospital%");
    }
}
