//! Database constraint names and the messages reported when they are violated
//!
//! The names match `migrations/0001_cnes_schema.sql`. Both the PostgreSQL
//! adapters and the in-memory test store report violations through this
//! table so callers see the same message regardless of backend.

pub const MANTENEDORA_CNPJ: &str = "mantenedoras_cnpj_mantenedora_key";
pub const ESTABELECIMENTO_CODIGO_UNIDADE: &str = "estabelecimentos_codigo_unidade_key";
pub const ESTABELECIMENTO_CODIGO_CNES: &str = "estabelecimentos_codigo_cnes_key";
pub const ENDERECO_ESTABELECIMENTO: &str = "enderecos_estabelecimento_id_key";
pub const PROFISSIONAL_CODIGO_SUS: &str = "profissionais_codigo_profissional_sus_key";
pub const EQUIPE_CODIGO: &str = "equipes_codigo_equipe_key";
pub const EQUIPEPROF_PAR: &str = "equipeprofs_equipe_id_profissional_id_key";

const UNIQUE_DEFAULT: &str = "Violação de restrição única";
const FOREIGN_KEY_DEFAULT: &str = "Registro relacionado não encontrado";
const FOREIGN_KEY_ENDERECO: &str =
    "Estabelecimento não encontrado ou já possui um endereço cadastrado";

/// Message for a unique-constraint violation
pub fn unique_violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(MANTENEDORA_CNPJ) => "CNPJ já cadastrado",
        Some(ESTABELECIMENTO_CODIGO_UNIDADE) => "Código da unidade já cadastrado",
        Some(ESTABELECIMENTO_CODIGO_CNES) => "Código CNES já cadastrado",
        Some(ENDERECO_ESTABELECIMENTO) => "Estabelecimento já possui um endereço cadastrado",
        Some(PROFISSIONAL_CODIGO_SUS) => "Código do profissional SUS já cadastrado",
        Some(EQUIPE_CODIGO) => "Código da equipe já cadastrado",
        Some(EQUIPEPROF_PAR) => "Profissional já vinculado a esta equipe",
        _ => UNIQUE_DEFAULT,
    }
}

/// Message for a foreign-key violation
pub fn foreign_key_violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.starts_with("enderecos_") => FOREIGN_KEY_ENDERECO,
        _ => FOREIGN_KEY_DEFAULT,
    }
}

/// Pull the constraint name out of a PostgreSQL error message, e.g.
/// `duplicate key value violates unique constraint "equipes_codigo_equipe_key"`.
/// Messages that quote a table first (foreign keys) are handled by anchoring
/// on the word `constraint`.
pub fn constraint_name(message: &str) -> Option<&str> {
    let start = match message.find("constraint \"") {
        Some(pos) => pos + "constraint \"".len(),
        None => message.rfind('"').and_then(|end| message[..end].rfind('"'))? + 1,
    };
    let len = message[start..].find('"')?;
    Some(&message[start..start + len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_unique_constraint() {
        let msg = r#"duplicate key value violates unique constraint "mantenedoras_cnpj_mantenedora_key""#;
        assert_eq!(constraint_name(msg), Some(MANTENEDORA_CNPJ));
        assert_eq!(
            unique_violation_message(constraint_name(msg)),
            "CNPJ já cadastrado"
        );
    }

    #[test]
    fn extracts_foreign_key_constraint_after_table_name() {
        let msg = r#"insert or update on table "enderecos" violates foreign key constraint "enderecos_estabelecimento_id_fkey""#;
        assert_eq!(
            constraint_name(msg),
            Some("enderecos_estabelecimento_id_fkey")
        );
        assert_eq!(
            foreign_key_violation_message(constraint_name(msg)),
            FOREIGN_KEY_ENDERECO
        );
    }

    #[test]
    fn falls_back_to_last_quoted_name() {
        assert_eq!(constraint_name(r#"violates "equipes_codigo_equipe_key""#), Some(EQUIPE_CODIGO));
    }

    #[test]
    fn unknown_constraints_use_defaults() {
        assert_eq!(constraint_name("no quotes here"), None);
        assert_eq!(unique_violation_message(None), UNIQUE_DEFAULT);
        assert_eq!(unique_violation_message(Some("other_key")), UNIQUE_DEFAULT);
        assert_eq!(
            foreign_key_violation_message(Some("equipes_estabelecimento_id_fkey")),
            FOREIGN_KEY_DEFAULT
        );
    }

    #[test]
    fn every_named_constraint_has_a_message() {
        for name in [
            MANTENEDORA_CNPJ,
            ESTABELECIMENTO_CODIGO_UNIDADE,
            ESTABELECIMENTO_CODIGO_CNES,
            ENDERECO_ESTABELECIMENTO,
            PROFISSIONAL_CODIGO_SUS,
            EQUIPE_CODIGO,
            EQUIPEPROF_PAR,
        ] {
            assert_ne!(unique_violation_message(Some(name)), UNIQUE_DEFAULT, "{}", name);
        }
    }
}
