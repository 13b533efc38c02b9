//! Row types for the five CNES extracts and their mapping onto API payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use cnes_api::domain::entities::{
    CreateEquipe, CreateEquipeProf, EstabelecimentoId, Mantenedora, NewEndereco,
    NewEstabelecimento, NewMantenedora, NewProfissional,
};
use cnes_api::domain::validation::normalize_telefone;

/// `tbMantenedora{competencia}.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct MantenedoraRow {
    #[serde(rename = "NU_CNPJ_MANTENEDORA")]
    pub cnpj: String,
    #[serde(rename = "NO_RAZAO_SOCIAL")]
    pub razao_social: String,
    #[serde(rename = "NU_TELEFONE")]
    pub telefone: Option<String>,
    #[serde(rename = "CO_BANCO")]
    pub banco: Option<String>,
    #[serde(rename = "NU_AGENCIA")]
    pub agencia: Option<String>,
    #[serde(rename = "NU_CONTA_CORRENTE")]
    pub conta_corrente: Option<String>,
    #[serde(rename = "TO_CHAR(DT_PREENCHIMENTO,'DD/MM/YYYY')")]
    pub data_preenchimento: Option<String>,
}

impl MantenedoraRow {
    pub fn to_new(&self) -> NewMantenedora {
        NewMantenedora {
            cnpj_mantenedora: self.cnpj.clone(),
            nome_razao_social_mantenedora: self.razao_social.clone(),
            numero_telefone_mantenedora: telefone(self.telefone.as_deref(), &self.cnpj),
            codigo_banco: self.banco.clone().unwrap_or_default(),
            numero_agencia: self.agencia.clone().unwrap_or_default(),
            numero_conta_corrente: self.conta_corrente.clone().unwrap_or_default(),
            data_criacao_mantenedora: self.data_preenchimento.as_deref().and_then(parse_date),
        }
    }
}

/// `tbEstabelecimento{competencia}.csv`; each row also carries the address
#[derive(Debug, Clone, Deserialize)]
pub struct EstabelecimentoRow {
    #[serde(rename = "CO_UNIDADE")]
    pub codigo_unidade: String,
    #[serde(rename = "CO_CNES")]
    pub codigo_cnes: String,
    #[serde(rename = "NU_CNPJ_MANTENEDORA")]
    pub cnpj_mantenedora: Option<String>,
    #[serde(rename = "NO_RAZAO_SOCIAL")]
    pub razao_social: String,
    #[serde(rename = "NO_FANTASIA")]
    pub fantasia: String,
    #[serde(rename = "NU_TELEFONE")]
    pub telefone: Option<String>,
    #[serde(rename = "NO_EMAIL")]
    pub email: Option<String>,
    #[serde(rename = "NU_LATITUDE")]
    pub latitude: Option<String>,
    #[serde(rename = "NU_LONGITUDE")]
    pub longitude: Option<String>,
    #[serde(rename = "CO_CEP")]
    pub cep: Option<String>,
    #[serde(rename = "NO_BAIRRO")]
    pub bairro: Option<String>,
    #[serde(rename = "NO_LOGRADOURO")]
    pub logradouro: Option<String>,
    #[serde(rename = "NU_ENDERECO")]
    pub numero: Option<String>,
    #[serde(rename = "NO_COMPLEMENTO")]
    pub complemento: Option<String>,
}

impl EstabelecimentoRow {
    /// Payload for a facility sponsored by `mantenedora`
    pub fn to_new(&self, mantenedora: &Mantenedora) -> NewEstabelecimento {
        NewEstabelecimento {
            codigo_unidade: self.codigo_unidade.clone(),
            codigo_cnes: self.codigo_cnes.clone(),
            cnpj_mantenedora: mantenedora.cnpj_mantenedora.clone(),
            nome_razao_social_estabelecimento: self.razao_social.clone(),
            nome_fantasia_estabelecimento: self.fantasia.clone(),
            numero_telefone_estabelecimento: telefone(
                self.telefone.as_deref(),
                &self.codigo_unidade,
            ),
            email_estabelecimento: self.email.clone(),
            mantenedora_id: mantenedora.id,
        }
    }

    /// Address payload; fails when a coordinate cannot be parsed
    pub fn endereco(&self, estabelecimento_id: EstabelecimentoId) -> Result<NewEndereco, String> {
        Ok(NewEndereco {
            latitude: parse_coordinate(self.latitude.as_deref())?,
            longitude: parse_coordinate(self.longitude.as_deref())?,
            cep_estabelecimento: self.cep.clone().unwrap_or_default(),
            bairro: self.bairro.clone().unwrap_or_default(),
            logradouro: self.logradouro.clone().unwrap_or_default(),
            numero: self.numero.clone().unwrap_or_default(),
            complemento: self.complemento.clone(),
            estabelecimento_id,
        })
    }
}

/// `tbEquipe.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct EquipeRow {
    #[serde(rename = "SEQ_EQUIPE")]
    pub codigo_equipe: String,
    #[serde(rename = "NO_EQUIPE")]
    pub nome: String,
    #[serde(rename = "TP_EQUIPE")]
    pub tipo: String,
    #[serde(rename = "CO_UNIDADE")]
    pub codigo_unidade: String,
}

impl From<&EquipeRow> for CreateEquipe {
    fn from(row: &EquipeRow) -> Self {
        CreateEquipe {
            codigo_equipe: row.codigo_equipe.clone(),
            nome_equipe: row.nome.clone(),
            tipo_equipe: row.tipo.clone(),
            codigo_unidade: row.codigo_unidade.clone(),
        }
    }
}

/// `tbProf.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct ProfissionalRow {
    #[serde(rename = "CO_PROFISSIONAL_SUS")]
    pub codigo_sus: String,
    #[serde(rename = "NO_PROFISSIONAL")]
    pub nome: String,
    #[serde(rename = "CO_CNS")]
    pub cns: Option<String>,
    #[serde(rename = "ST_NMPROF_CADSUS")]
    pub situacao: Option<String>,
}

impl From<&ProfissionalRow> for NewProfissional {
    fn from(row: &ProfissionalRow) -> Self {
        NewProfissional {
            codigo_profissional_sus: row.codigo_sus.clone(),
            nome_profissional: row.nome.clone(),
            codigo_cns: row.cns.clone(),
            situacao_profissional_cadsus: row.situacao.clone(),
        }
    }
}

/// `tbEquipeProf.csv`
#[derive(Debug, Clone, Deserialize)]
pub struct EquipeProfRow {
    #[serde(rename = "SEQ_EQUIPE")]
    pub codigo_equipe: String,
    #[serde(rename = "CO_PROFISSIONAL_SUS")]
    pub codigo_sus: String,
}

impl From<&EquipeProfRow> for CreateEquipeProf {
    fn from(row: &EquipeProfRow) -> Self {
        CreateEquipeProf {
            codigo_equipe: row.codigo_equipe.clone(),
            codigo_profissional_sus: row.codigo_sus.clone(),
        }
    }
}

/// `DD/MM/YYYY` at midnight UTC
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Decimal with `,` or `.` separator; empty is absent
pub fn parse_coordinate(value: Option<&str>) -> Result<Option<f64>, String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .replace(',', ".")
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("coordenada inválida: {}", raw)),
    }
}

/// Normalized phone, or absent when it has the wrong number of digits
fn telefone(value: Option<&str>, owner: &str) -> Option<String> {
    let raw = value?;
    match normalize_telefone(raw) {
        Ok(formatted) => Some(formatted),
        Err(e) => {
            tracing::warn!("Dropping phone {:?} of {}: {}", raw, owner, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use cnes_api::domain::entities::MantenedoraId;

    fn mantenedora_row() -> MantenedoraRow {
        MantenedoraRow {
            cnpj: "07954571000104".to_string(),
            razao_social: "Secretaria da Saúde do Estado do Ceará".to_string(),
            telefone: Some("8531015123".to_string()),
            banco: Some("001".to_string()),
            agencia: Some("0008".to_string()),
            conta_corrente: Some("123456".to_string()),
            data_preenchimento: Some("15/03/2019".to_string()),
        }
    }

    #[test]
    fn parses_fill_date_at_midnight_utc() {
        assert_eq!(
            parse_date("15/03/2019"),
            Some(Utc.with_ymd_and_hms(2019, 3, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_date("2019-03-15"), None);
        assert_eq!(parse_date("31/02/2019"), None);
    }

    #[test]
    fn coordinates_accept_comma() {
        assert_eq!(parse_coordinate(Some("-3,7319")), Ok(Some(-3.7319)));
        assert_eq!(parse_coordinate(Some("-38.5267")), Ok(Some(-38.5267)));
        assert_eq!(parse_coordinate(None), Ok(None));
        assert_eq!(parse_coordinate(Some("  ")), Ok(None));
        assert!(parse_coordinate(Some("abc")).is_err());
    }

    #[test]
    fn mantenedora_row_maps_to_payload() {
        let new = mantenedora_row().to_new();

        assert_eq!(new.cnpj_mantenedora, "07954571000104");
        assert_eq!(
            new.numero_telefone_mantenedora.as_deref(),
            Some("(85) 3101-5123")
        );
        assert!(new.data_criacao_mantenedora.is_some());
        assert!(new.validated().is_ok());
    }

    #[test]
    fn bad_phone_and_date_become_absent() {
        let mut row = mantenedora_row();
        row.telefone = Some("3101".to_string());
        row.data_preenchimento = Some("sem data".to_string());

        let new = row.to_new();

        assert!(new.numero_telefone_mantenedora.is_none());
        assert!(new.data_criacao_mantenedora.is_none());
    }

    #[test]
    fn estabelecimento_takes_sponsor_cnpj_and_id() {
        let row = EstabelecimentoRow {
            codigo_unidade: "2304402000001".to_string(),
            codigo_cnes: "2481286".to_string(),
            cnpj_mantenedora: Some("07954571000104".to_string()),
            razao_social: "Hospital Geral de Fortaleza".to_string(),
            fantasia: "HGF".to_string(),
            telefone: Some("(85)31017000".to_string()),
            email: None,
            latitude: Some("-3,7319".to_string()),
            longitude: Some("x".to_string()),
            cep: Some("60150160".to_string()),
            bairro: Some("Papicu".to_string()),
            logradouro: Some("Rua Ávila Goulart".to_string()),
            numero: Some("900".to_string()),
            complemento: None,
        };
        let mantenedora = Mantenedora {
            id: MantenedoraId(7),
            cnpj_mantenedora: "07954571000104".to_string(),
            nome_razao_social_mantenedora: "SESA".to_string(),
            numero_telefone_mantenedora: None,
            codigo_banco: "001".to_string(),
            numero_agencia: "0008".to_string(),
            numero_conta_corrente: "123456".to_string(),
            data_criacao_mantenedora: Utc::now(),
        };

        let new = row.to_new(&mantenedora);

        assert_eq!(new.mantenedora_id, MantenedoraId(7));
        assert_eq!(
            new.numero_telefone_estabelecimento.as_deref(),
            Some("(85) 3101-7000")
        );
        assert!(row.endereco(EstabelecimentoId(1)).is_err());
    }
}
