//! Test fixtures
//!
//! Factory functions for creating valid payloads with sensible defaults.
//! Tests tweak the returned struct when they need something specific.

use std::sync::Arc;

use crate::domain::entities::{
    CreateEquipe, Equipe, EstabelecimentoId, Mantenedora, NewEndereco, NewEquipe,
    NewEstabelecimento, NewMantenedora, NewProfissional,
};

use super::mocks::InMemoryCnesStore;

/// A valid mantenedora payload for `cnpj`
pub fn new_mantenedora(cnpj: &str) -> NewMantenedora {
    NewMantenedora {
        cnpj_mantenedora: cnpj.to_string(),
        nome_razao_social_mantenedora: "Instituto Fortaleza de Medicina".to_string(),
        numero_telefone_mantenedora: Some("(85) 3219-1234".to_string()),
        codigo_banco: "001".to_string(),
        numero_agencia: "1234".to_string(),
        numero_conta_corrente: "56789-0".to_string(),
        data_criacao_mantenedora: None,
    }
}

/// A valid estabelecimento payload sponsored by `mantenedora`
pub fn new_estabelecimento_for(
    mantenedora: &Mantenedora,
    codigo_unidade: &str,
    codigo_cnes: &str,
) -> NewEstabelecimento {
    NewEstabelecimento {
        codigo_unidade: codigo_unidade.to_string(),
        codigo_cnes: codigo_cnes.to_string(),
        cnpj_mantenedora: mantenedora.cnpj_mantenedora.clone(),
        nome_razao_social_estabelecimento: "Hospital Geral de Fortaleza Ltda".to_string(),
        nome_fantasia_estabelecimento: "Hospital Geral".to_string(),
        numero_telefone_estabelecimento: Some("(85) 3101-7000".to_string()),
        email_estabelecimento: Some("contato@hgf.example.com".to_string()),
        mantenedora_id: mantenedora.id,
    }
}

/// A valid address without coordinates or complemento
pub fn new_endereco_for(estabelecimento_id: EstabelecimentoId) -> NewEndereco {
    NewEndereco {
        latitude: None,
        longitude: None,
        cep_estabelecimento: "60150160".to_string(),
        bairro: "Papicu".to_string(),
        logradouro: "Rua Ávila Goulart".to_string(),
        numero: "900".to_string(),
        complemento: None,
        estabelecimento_id,
    }
}

pub fn new_profissional(codigo_sus: &str) -> NewProfissional {
    NewProfissional {
        codigo_profissional_sus: codigo_sus.to_string(),
        nome_profissional: "Maria da Silva".to_string(),
        codigo_cns: None,
        situacao_profissional_cadsus: Some("ATIVO".to_string()),
    }
}

pub fn create_equipe(codigo_equipe: &str, codigo_unidade: &str) -> CreateEquipe {
    CreateEquipe {
        codigo_equipe: codigo_equipe.to_string(),
        nome_equipe: "ESF Papicu".to_string(),
        tipo_equipe: "70".to_string(),
        codigo_unidade: codigo_unidade.to_string(),
    }
}

/// Insert a team, creating a sponsor and facility first if the store has none
pub fn seed_equipe(store: &Arc<InMemoryCnesStore>, codigo_equipe: &str) -> Equipe {
    let estabelecimento = match store.first_estabelecimento() {
        Some(existing) => existing,
        None => {
            let mantenedora = store.insert_mantenedora(new_mantenedora("99887766554433"));
            store.insert_estabelecimento(new_estabelecimento_for(
                &mantenedora,
                "2304400000001",
                "2481286",
            ))
        }
    };

    store.insert_equipe(NewEquipe {
        codigo_equipe: codigo_equipe.to_string(),
        nome_equipe: format!("Equipe {}", codigo_equipe),
        tipo_equipe: "70".to_string(),
        estabelecimento_id: estabelecimento.id,
    })
}
