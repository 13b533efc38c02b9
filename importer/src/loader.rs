//! Loads parsed extracts through the application services
//!
//! Order matters: sponsors, facilities (with their address), teams,
//! professionals, then memberships. A failing row is logged and counted but
//! never stops the run.

use std::collections::HashMap;
use std::fmt;

use cnes_api::domain::entities::{Mantenedora, NewProfissional};
use cnes_api::error::{AppError, DomainError};
use cnes_api::AppState;

use crate::records::{EquipeProfRow, EquipeRow, EstabelecimentoRow, MantenedoraRow, ProfissionalRow};

/// Parsed contents of the five extract files
#[derive(Debug, Default)]
pub struct CnesData {
    pub mantenedoras: Vec<MantenedoraRow>,
    pub estabelecimentos: Vec<EstabelecimentoRow>,
    pub equipes: Vec<EquipeRow>,
    pub profissionais: Vec<ProfissionalRow>,
    pub equipeprofs: Vec<EquipeProfRow>,
}

/// Outcome counts for one kind of record
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub created: usize,
    /// Already present, or not attempted
    pub skipped: usize,
    pub failed: usize,
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} skipped, {} failed",
            self.created, self.skipped, self.failed
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub mantenedoras: Tally,
    pub estabelecimentos: Tally,
    pub enderecos: Tally,
    pub equipes: Tally,
    pub profissionais: Tally,
    pub equipeprofs: Tally,
}

impl ImportReport {
    pub fn failed(&self) -> usize {
        [
            self.mantenedoras,
            self.estabelecimentos,
            self.enderecos,
            self.equipes,
            self.profissionais,
            self.equipeprofs,
        ]
        .iter()
        .map(|t| t.failed)
        .sum()
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mantenedoras:     {}", self.mantenedoras)?;
        writeln!(f, "estabelecimentos: {}", self.estabelecimentos)?;
        writeln!(f, "enderecos:        {}", self.enderecos)?;
        writeln!(f, "equipes:          {}", self.equipes)?;
        writeln!(f, "profissionais:    {}", self.profissionais)?;
        write!(f, "equipeprofs:      {}", self.equipeprofs)
    }
}

/// Count one create attempt; duplicates are skips, anything else a failure
fn tally<T>(tally: &mut Tally, kind: &str, key: &str, result: Result<T, AppError>) -> Option<T> {
    match result {
        Ok(value) => {
            tally.created += 1;
            tracing::debug!("Created {} {}", kind, key);
            Some(value)
        }
        Err(AppError::Domain(DomainError::AlreadyExists(msg))) => {
            tally.skipped += 1;
            tracing::debug!("Skipping {} {}: {}", kind, key, msg);
            None
        }
        Err(e) => {
            tally.failed += 1;
            tracing::warn!("Failed to import {} {}: {}", kind, key, e);
            None
        }
    }
}

pub struct Loader {
    state: AppState,
}

impl Loader {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn run(&self, data: &CnesData) -> ImportReport {
        let mut report = ImportReport::default();

        let sponsors = self.load_mantenedoras(&data.mantenedoras, &mut report).await;
        self.load_estabelecimentos(&data.estabelecimentos, &sponsors, &mut report)
            .await;

        for row in &data.equipes {
            let result = self.state.equipes.create(row.into()).await;
            tally(&mut report.equipes, "equipe", &row.codigo_equipe, result);
        }

        for row in &data.profissionais {
            let result = self.state.profissionais.create(NewProfissional::from(row)).await;
            tally(&mut report.profissionais, "profissional", &row.codigo_sus, result);
        }

        for row in &data.equipeprofs {
            let result = self.state.equipeprofs.create(row.into()).await;
            let key = format!("{}/{}", row.codigo_equipe, row.codigo_sus);
            tally(&mut report.equipeprofs, "vínculo", &key, result);
        }

        report
    }

    /// Create sponsors; the returned map holds every CNPJ in the file and the
    /// stored row when one could be created or found
    async fn load_mantenedoras(
        &self,
        rows: &[MantenedoraRow],
        report: &mut ImportReport,
    ) -> HashMap<String, Option<Mantenedora>> {
        let mut sponsors = HashMap::with_capacity(rows.len());

        for row in rows {
            let created = self.state.mantenedoras.create(row.to_new()).await;
            let already_exists = matches!(
                created,
                Err(AppError::Domain(DomainError::AlreadyExists(_)))
            );

            let mut stored = tally(&mut report.mantenedoras, "mantenedora", &row.cnpj, created);
            if already_exists {
                stored = match self.state.mantenedoras.find_by_cnpj(&row.cnpj).await {
                    Ok(found) => found,
                    Err(e) => {
                        tracing::warn!("Lookup of mantenedora {} failed: {}", row.cnpj, e);
                        None
                    }
                };
            }
            sponsors.insert(row.cnpj.clone(), stored);
        }

        sponsors
    }

    async fn load_estabelecimentos(
        &self,
        rows: &[EstabelecimentoRow],
        sponsors: &HashMap<String, Option<Mantenedora>>,
        report: &mut ImportReport,
    ) {
        for row in rows {
            let cnpj = row.cnpj_mantenedora.as_deref().unwrap_or_default();
            let mantenedora = match sponsors.get(cnpj) {
                Some(Some(mantenedora)) => mantenedora,
                Some(None) => {
                    tracing::warn!(
                        "Skipping estabelecimento {}: mantenedora {} was not loaded",
                        row.codigo_unidade,
                        cnpj
                    );
                    report.estabelecimentos.skipped += 1;
                    continue;
                }
                None => {
                    tracing::warn!(
                        "Skipping estabelecimento {}: no mantenedora with CNPJ {:?} in the extract",
                        row.codigo_unidade,
                        cnpj
                    );
                    report.estabelecimentos.skipped += 1;
                    continue;
                }
            };

            let created = self.state.estabelecimentos.create(row.to_new(mantenedora)).await;
            let Some(estabelecimento) = tally(
                &mut report.estabelecimentos,
                "estabelecimento",
                &row.codigo_unidade,
                created,
            ) else {
                continue;
            };

            match row.endereco(estabelecimento.id) {
                Ok(endereco) => {
                    let result = self.state.enderecos.create(endereco).await;
                    tally(&mut report.enderecos, "endereco", &row.codigo_unidade, result);
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping endereco of estabelecimento {}: {}",
                        row.codigo_unidade,
                        e
                    );
                    report.enderecos.skipped += 1;
                }
            }
        }
    }
}
