//! In-memory implementation of every port
//!
//! `InMemoryCnesStore` keeps all six tables behind one lock and enforces the
//! same unique, foreign-key and cascade rules as the SQL schema, reporting
//! violations with the messages from `domain::constraints`.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::domain::constraints::{
    self, foreign_key_violation_message, unique_violation_message,
};
use crate::domain::entities::{
    Endereco, EnderecoFilter, EnderecoId, EnderecoPatch, Equipe, EquipeFilter, EquipeId,
    EquipePatch, EquipeProf, EquipeProfFilter, EquipeProfId, EquipeProfPatch, Estabelecimento,
    EstabelecimentoFilter, EstabelecimentoId, EstabelecimentoPatch, Mantenedora,
    MantenedoraFilter, MantenedoraId, MantenedoraPatch, NewEndereco, NewEquipe, NewEquipeProf,
    NewEstabelecimento, NewMantenedora, NewProfissional, Page, Profissional, ProfissionalFilter,
    ProfissionalId, ProfissionalPatch,
};
use crate::domain::ports::{
    EnderecoRepository, EquipeRepository, EstabelecimentoRepository, HealthCheck,
    MantenedoraRepository, ProfissionalRepository, Repository,
};
use crate::domain::validation::normalize_cep;
use crate::error::DomainError;

// ============================================================================
// Table storage
// ============================================================================

/// Rows keyed by id plus a serial sequence that never reuses ids
struct Table<T> {
    rows: BTreeMap<i32, T>,
    seq: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            seq: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.seq += 1;
        self.seq
    }

    fn get(&self, id: i32) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn page(&self, page: Page, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .values()
            .filter(|row| keep(row))
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect()
    }
}

#[derive(Default)]
struct Tables {
    mantenedoras: Table<Mantenedora>,
    estabelecimentos: Table<Estabelecimento>,
    enderecos: Table<Endereco>,
    profissionais: Table<Profissional>,
    equipes: Table<Equipe>,
    equipeprofs: Table<EquipeProf>,
}

fn unique(constraint: &str) -> DomainError {
    DomainError::AlreadyExists(unique_violation_message(Some(constraint)).to_string())
}

fn foreign_key(constraint: &str) -> DomainError {
    DomainError::InvalidReference(foreign_key_violation_message(Some(constraint)).to_string())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(&needle.trim().to_lowercase())
}

fn matches<T: PartialEq>(filter: &Option<T>, value: &T) -> bool {
    filter.as_ref().map_or(true, |f| f == value)
}

fn matches_str(filter: &Option<String>, value: &str) -> bool {
    filter.as_deref().map_or(true, |f| f == value)
}

impl Tables {
    // --- mantenedoras -------------------------------------------------------

    fn check_mantenedora(&self, row: &Mantenedora) -> Result<(), DomainError> {
        let taken = self
            .mantenedoras
            .rows
            .values()
            .any(|m| m.id != row.id && m.cnpj_mantenedora == row.cnpj_mantenedora);
        if taken {
            return Err(unique(constraints::MANTENEDORA_CNPJ));
        }
        Ok(())
    }

    fn create_mantenedora(&mut self, new: &NewMantenedora) -> Result<Mantenedora, DomainError> {
        let row = Mantenedora {
            id: MantenedoraId(0),
            cnpj_mantenedora: new.cnpj_mantenedora.clone(),
            nome_razao_social_mantenedora: new.nome_razao_social_mantenedora.clone(),
            numero_telefone_mantenedora: new.numero_telefone_mantenedora.clone(),
            codigo_banco: new.codigo_banco.clone(),
            numero_agencia: new.numero_agencia.clone(),
            numero_conta_corrente: new.numero_conta_corrente.clone(),
            data_criacao_mantenedora: new.data_criacao_mantenedora.unwrap_or_else(Utc::now),
        };
        self.check_mantenedora(&row)?;
        let row = Mantenedora {
            id: MantenedoraId(self.mantenedoras.next_id()),
            ..row
        };
        self.mantenedoras.rows.insert(row.id.0, row.clone());
        Ok(row)
    }

    fn update_mantenedora(
        &mut self,
        id: MantenedoraId,
        patch: &MantenedoraPatch,
    ) -> Result<Option<Mantenedora>, DomainError> {
        let Some(mut row) = self.mantenedoras.get(id.0) else {
            return Ok(None);
        };
        if let Some(v) = &patch.cnpj_mantenedora {
            row.cnpj_mantenedora = v.clone();
        }
        if let Some(v) = &patch.nome_razao_social_mantenedora {
            row.nome_razao_social_mantenedora = v.clone();
        }
        if let Some(v) = &patch.numero_telefone_mantenedora {
            row.numero_telefone_mantenedora = v.clone();
        }
        if let Some(v) = &patch.codigo_banco {
            row.codigo_banco = v.clone();
        }
        if let Some(v) = &patch.numero_agencia {
            row.numero_agencia = v.clone();
        }
        if let Some(v) = &patch.numero_conta_corrente {
            row.numero_conta_corrente = v.clone();
        }
        self.check_mantenedora(&row)?;
        self.mantenedoras.rows.insert(id.0, row.clone());
        Ok(Some(row))
    }

    fn delete_mantenedora(&mut self, id: MantenedoraId) -> bool {
        if self.mantenedoras.rows.remove(&id.0).is_none() {
            return false;
        }
        let owned: Vec<EstabelecimentoId> = self
            .estabelecimentos
            .rows
            .values()
            .filter(|e| e.mantenedora_id == id)
            .map(|e| e.id)
            .collect();
        for estabelecimento_id in owned {
            self.delete_estabelecimento(estabelecimento_id);
        }
        true
    }

    // --- estabelecimentos ---------------------------------------------------

    fn check_estabelecimento(&self, row: &Estabelecimento) -> Result<(), DomainError> {
        for other in self.estabelecimentos.rows.values().filter(|e| e.id != row.id) {
            if other.codigo_unidade == row.codigo_unidade {
                return Err(unique(constraints::ESTABELECIMENTO_CODIGO_UNIDADE));
            }
            if other.codigo_cnes == row.codigo_cnes {
                return Err(unique(constraints::ESTABELECIMENTO_CODIGO_CNES));
            }
        }
        if !self.mantenedoras.rows.contains_key(&row.mantenedora_id.0) {
            return Err(foreign_key("estabelecimentos_mantenedora_id_fkey"));
        }
        Ok(())
    }

    fn create_estabelecimento(
        &mut self,
        new: &NewEstabelecimento,
    ) -> Result<Estabelecimento, DomainError> {
        let row = Estabelecimento {
            id: EstabelecimentoId(0),
            codigo_unidade: new.codigo_unidade.clone(),
            codigo_cnes: new.codigo_cnes.clone(),
            cnpj_mantenedora: new.cnpj_mantenedora.clone(),
            nome_razao_social_estabelecimento: new.nome_razao_social_estabelecimento.clone(),
            nome_fantasia_estabelecimento: new.nome_fantasia_estabelecimento.clone(),
            numero_telefone_estabelecimento: new.numero_telefone_estabelecimento.clone(),
            email_estabelecimento: new.email_estabelecimento.clone(),
            mantenedora_id: new.mantenedora_id,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.check_estabelecimento(&row)?;
        let row = Estabelecimento {
            id: EstabelecimentoId(self.estabelecimentos.next_id()),
            ..row
        };
        self.estabelecimentos.rows.insert(row.id.0, row.clone());
        Ok(row)
    }

    fn update_estabelecimento(
        &mut self,
        id: EstabelecimentoId,
        patch: &EstabelecimentoPatch,
    ) -> Result<Option<Estabelecimento>, DomainError> {
        let Some(mut row) = self.estabelecimentos.get(id.0) else {
            return Ok(None);
        };
        if let Some(v) = &patch.codigo_unidade {
            row.codigo_unidade = v.clone();
        }
        if let Some(v) = &patch.codigo_cnes {
            row.codigo_cnes = v.clone();
        }
        if let Some(v) = &patch.cnpj_mantenedora {
            row.cnpj_mantenedora = v.clone();
        }
        if let Some(v) = &patch.nome_razao_social_estabelecimento {
            row.nome_razao_social_estabelecimento = v.clone();
        }
        if let Some(v) = &patch.nome_fantasia_estabelecimento {
            row.nome_fantasia_estabelecimento = v.clone();
        }
        if let Some(v) = &patch.numero_telefone_estabelecimento {
            row.numero_telefone_estabelecimento = v.clone();
        }
        if let Some(v) = &patch.email_estabelecimento {
            row.email_estabelecimento = v.clone();
        }
        if let Some(v) = patch.mantenedora_id {
            row.mantenedora_id = v;
        }
        row.updated_at = Some(Utc::now());
        self.check_estabelecimento(&row)?;
        self.estabelecimentos.rows.insert(id.0, row.clone());
        Ok(Some(row))
    }

    fn delete_estabelecimento(&mut self, id: EstabelecimentoId) -> bool {
        if self.estabelecimentos.rows.remove(&id.0).is_none() {
            return false;
        }
        self.enderecos
            .rows
            .retain(|_, e| e.estabelecimento_id != id);
        let teams: Vec<EquipeId> = self
            .equipes
            .rows
            .values()
            .filter(|e| e.estabelecimento_id == id)
            .map(|e| e.id)
            .collect();
        for equipe_id in teams {
            self.delete_equipe(equipe_id);
        }
        true
    }

    // --- enderecos ----------------------------------------------------------

    fn check_endereco(&self, row: &Endereco) -> Result<(), DomainError> {
        let taken = self
            .enderecos
            .rows
            .values()
            .any(|e| e.id != row.id && e.estabelecimento_id == row.estabelecimento_id);
        if taken {
            return Err(unique(constraints::ENDERECO_ESTABELECIMENTO));
        }
        if !self
            .estabelecimentos
            .rows
            .contains_key(&row.estabelecimento_id.0)
        {
            return Err(foreign_key("enderecos_estabelecimento_id_fkey"));
        }
        Ok(())
    }

    fn create_endereco(&mut self, new: &NewEndereco) -> Result<Endereco, DomainError> {
        let row = Endereco {
            id: EnderecoId(0),
            latitude: new.latitude,
            longitude: new.longitude,
            cep_estabelecimento: new.cep_estabelecimento.clone(),
            bairro: new.bairro.clone(),
            logradouro: new.logradouro.clone(),
            numero: new.numero.clone(),
            complemento: new.complemento.clone(),
            estabelecimento_id: new.estabelecimento_id,
        };
        self.check_endereco(&row)?;
        let row = Endereco {
            id: EnderecoId(self.enderecos.next_id()),
            ..row
        };
        self.enderecos.rows.insert(row.id.0, row.clone());
        Ok(row)
    }

    fn update_endereco(
        &mut self,
        id: EnderecoId,
        patch: &EnderecoPatch,
    ) -> Result<Option<Endereco>, DomainError> {
        let Some(mut row) = self.enderecos.get(id.0) else {
            return Ok(None);
        };
        if let Some(v) = patch.latitude {
            row.latitude = v;
        }
        if let Some(v) = patch.longitude {
            row.longitude = v;
        }
        if let Some(v) = &patch.cep_estabelecimento {
            row.cep_estabelecimento = v.clone();
        }
        if let Some(v) = &patch.bairro {
            row.bairro = v.clone();
        }
        if let Some(v) = &patch.logradouro {
            row.logradouro = v.clone();
        }
        if let Some(v) = &patch.numero {
            row.numero = v.clone();
        }
        if let Some(v) = &patch.complemento {
            row.complemento = v.clone();
        }
        if let Some(v) = patch.estabelecimento_id {
            row.estabelecimento_id = v;
        }
        self.check_endereco(&row)?;
        self.enderecos.rows.insert(id.0, row.clone());
        Ok(Some(row))
    }

    // --- profissionais ------------------------------------------------------

    fn check_profissional(&self, row: &Profissional) -> Result<(), DomainError> {
        let taken = self.profissionais.rows.values().any(|p| {
            p.id != row.id && p.codigo_profissional_sus == row.codigo_profissional_sus
        });
        if taken {
            return Err(unique(constraints::PROFISSIONAL_CODIGO_SUS));
        }
        Ok(())
    }

    fn create_profissional(&mut self, new: &NewProfissional) -> Result<Profissional, DomainError> {
        let row = Profissional {
            id: ProfissionalId(0),
            codigo_profissional_sus: new.codigo_profissional_sus.clone(),
            nome_profissional: new.nome_profissional.clone(),
            codigo_cns: new.codigo_cns.clone(),
            situacao_profissional_cadsus: new.situacao_profissional_cadsus.clone(),
        };
        self.check_profissional(&row)?;
        let row = Profissional {
            id: ProfissionalId(self.profissionais.next_id()),
            ..row
        };
        self.profissionais.rows.insert(row.id.0, row.clone());
        Ok(row)
    }

    fn update_profissional(
        &mut self,
        id: ProfissionalId,
        patch: &ProfissionalPatch,
    ) -> Result<Option<Profissional>, DomainError> {
        let Some(mut row) = self.profissionais.get(id.0) else {
            return Ok(None);
        };
        if let Some(v) = &patch.codigo_profissional_sus {
            row.codigo_profissional_sus = v.clone();
        }
        if let Some(v) = &patch.nome_profissional {
            row.nome_profissional = v.clone();
        }
        if let Some(v) = &patch.codigo_cns {
            row.codigo_cns = v.clone();
        }
        if let Some(v) = &patch.situacao_profissional_cadsus {
            row.situacao_profissional_cadsus = v.clone();
        }
        self.check_profissional(&row)?;
        self.profissionais.rows.insert(id.0, row.clone());
        Ok(Some(row))
    }

    fn delete_profissional(&mut self, id: ProfissionalId) -> bool {
        if self.profissionais.rows.remove(&id.0).is_none() {
            return false;
        }
        self.equipeprofs
            .rows
            .retain(|_, v| v.profissional_id != id);
        true
    }

    // --- equipes ------------------------------------------------------------

    fn check_equipe(&self, row: &Equipe) -> Result<(), DomainError> {
        let taken = self
            .equipes
            .rows
            .values()
            .any(|e| e.id != row.id && e.codigo_equipe == row.codigo_equipe);
        if taken {
            return Err(unique(constraints::EQUIPE_CODIGO));
        }
        if !self
            .estabelecimentos
            .rows
            .contains_key(&row.estabelecimento_id.0)
        {
            return Err(foreign_key("equipes_estabelecimento_id_fkey"));
        }
        Ok(())
    }

    fn create_equipe(&mut self, new: &NewEquipe) -> Result<Equipe, DomainError> {
        let row = Equipe {
            id: EquipeId(0),
            codigo_equipe: new.codigo_equipe.clone(),
            nome_equipe: new.nome_equipe.clone(),
            tipo_equipe: new.tipo_equipe.clone(),
            estabelecimento_id: new.estabelecimento_id,
        };
        self.check_equipe(&row)?;
        let row = Equipe {
            id: EquipeId(self.equipes.next_id()),
            ..row
        };
        self.equipes.rows.insert(row.id.0, row.clone());
        Ok(row)
    }

    fn update_equipe(
        &mut self,
        id: EquipeId,
        patch: &EquipePatch,
    ) -> Result<Option<Equipe>, DomainError> {
        let Some(mut row) = self.equipes.get(id.0) else {
            return Ok(None);
        };
        if let Some(v) = &patch.codigo_equipe {
            row.codigo_equipe = v.clone();
        }
        if let Some(v) = &patch.nome_equipe {
            row.nome_equipe = v.clone();
        }
        if let Some(v) = &patch.tipo_equipe {
            row.tipo_equipe = v.clone();
        }
        if let Some(v) = patch.estabelecimento_id {
            row.estabelecimento_id = v;
        }
        self.check_equipe(&row)?;
        self.equipes.rows.insert(id.0, row.clone());
        Ok(Some(row))
    }

    fn delete_equipe(&mut self, id: EquipeId) -> bool {
        if self.equipes.rows.remove(&id.0).is_none() {
            return false;
        }
        self.equipeprofs.rows.retain(|_, v| v.equipe_id != id);
        true
    }

    // --- equipeprofs --------------------------------------------------------

    fn check_equipe_prof(&self, row: &EquipeProf) -> Result<(), DomainError> {
        let taken = self.equipeprofs.rows.values().any(|v| {
            v.id != row.id && v.equipe_id == row.equipe_id && v.profissional_id == row.profissional_id
        });
        if taken {
            return Err(unique(constraints::EQUIPEPROF_PAR));
        }
        if !self.equipes.rows.contains_key(&row.equipe_id.0) {
            return Err(foreign_key("equipeprofs_equipe_id_fkey"));
        }
        if !self.profissionais.rows.contains_key(&row.profissional_id.0) {
            return Err(foreign_key("equipeprofs_profissional_id_fkey"));
        }
        Ok(())
    }

    fn create_equipe_prof(&mut self, new: &NewEquipeProf) -> Result<EquipeProf, DomainError> {
        let row = EquipeProf {
            id: EquipeProfId(0),
            equipe_id: new.equipe_id,
            profissional_id: new.profissional_id,
        };
        self.check_equipe_prof(&row)?;
        let row = EquipeProf {
            id: EquipeProfId(self.equipeprofs.next_id()),
            ..row
        };
        self.equipeprofs.rows.insert(row.id.0, row.clone());
        Ok(row)
    }

    fn update_equipe_prof(
        &mut self,
        id: EquipeProfId,
        patch: &EquipeProfPatch,
    ) -> Result<Option<EquipeProf>, DomainError> {
        let Some(mut row) = self.equipeprofs.get(id.0) else {
            return Ok(None);
        };
        if let Some(v) = patch.equipe_id {
            row.equipe_id = v;
        }
        if let Some(v) = patch.profissional_id {
            row.profissional_id = v;
        }
        self.check_equipe_prof(&row)?;
        self.equipeprofs.rows.insert(id.0, row.clone());
        Ok(Some(row))
    }
}

// ============================================================================
// In-Memory CNES Store
// ============================================================================

/// Every repository port over one shared set of tables
pub struct InMemoryCnesStore {
    tables: RwLock<Tables>,
    healthy: AtomicBool,
}

impl Default for InMemoryCnesStore {
    fn default() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            healthy: AtomicBool::new(true),
        }
    }
}

impl InMemoryCnesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ping` fail, as if the database went away
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn insert_mantenedora(&self, new: NewMantenedora) -> Mantenedora {
        self.tables
            .write()
            .unwrap()
            .create_mantenedora(&new)
            .expect("fixture mantenedora should insert")
    }

    pub fn insert_estabelecimento(&self, new: NewEstabelecimento) -> Estabelecimento {
        self.tables
            .write()
            .unwrap()
            .create_estabelecimento(&new)
            .expect("fixture estabelecimento should insert")
    }

    pub fn insert_endereco(&self, new: NewEndereco) -> Endereco {
        self.tables
            .write()
            .unwrap()
            .create_endereco(&new)
            .expect("fixture endereco should insert")
    }

    pub fn insert_profissional(&self, new: NewProfissional) -> Profissional {
        self.tables
            .write()
            .unwrap()
            .create_profissional(&new)
            .expect("fixture profissional should insert")
    }

    pub fn insert_equipe(&self, new: NewEquipe) -> Equipe {
        self.tables
            .write()
            .unwrap()
            .create_equipe(&new)
            .expect("fixture equipe should insert")
    }

    /// Add a professional to a team
    pub fn link(&self, equipe_id: EquipeId, profissional_id: ProfissionalId) -> EquipeProf {
        self.tables
            .write()
            .unwrap()
            .create_equipe_prof(&NewEquipeProf {
                equipe_id,
                profissional_id,
            })
            .expect("fixture membership should insert")
    }

    pub fn first_estabelecimento(&self) -> Option<Estabelecimento> {
        self.tables
            .read()
            .unwrap()
            .estabelecimentos
            .rows
            .values()
            .next()
            .cloned()
    }

    pub fn mantenedora_count(&self) -> usize {
        self.tables.read().unwrap().mantenedoras.rows.len()
    }

    pub fn estabelecimento_count(&self) -> usize {
        self.tables.read().unwrap().estabelecimentos.rows.len()
    }

    pub fn endereco_count(&self) -> usize {
        self.tables.read().unwrap().enderecos.rows.len()
    }

    pub fn profissional_count(&self) -> usize {
        self.tables.read().unwrap().profissionais.rows.len()
    }

    pub fn equipe_count(&self) -> usize {
        self.tables.read().unwrap().equipes.rows.len()
    }

    pub fn equipe_prof_count(&self) -> usize {
        self.tables.read().unwrap().equipeprofs.rows.len()
    }
}

#[async_trait]
impl HealthCheck for InMemoryCnesStore {
    async fn ping(&self) -> Result<(), DomainError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::Database("connection refused".to_string()))
        }
    }
}

#[async_trait]
impl Repository<Mantenedora> for InMemoryCnesStore {
    async fn find_all(
        &self,
        filter: &MantenedoraFilter,
        page: Page,
    ) -> Result<Vec<Mantenedora>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.mantenedoras.page(page, |m| {
            matches_str(&filter.cnpj, &m.cnpj_mantenedora)
                && filter
                    .nome
                    .as_deref()
                    .map_or(true, |n| contains_ci(&m.nome_razao_social_mantenedora, n))
        }))
    }

    async fn find_by_id(&self, id: MantenedoraId) -> Result<Option<Mantenedora>, DomainError> {
        Ok(self.tables.read().unwrap().mantenedoras.get(id.0))
    }

    async fn create(&self, new: &NewMantenedora) -> Result<Mantenedora, DomainError> {
        self.tables.write().unwrap().create_mantenedora(new)
    }

    async fn update(
        &self,
        id: MantenedoraId,
        patch: &MantenedoraPatch,
    ) -> Result<Option<Mantenedora>, DomainError> {
        self.tables.write().unwrap().update_mantenedora(id, patch)
    }

    async fn delete(&self, id: MantenedoraId) -> Result<bool, DomainError> {
        Ok(self.tables.write().unwrap().delete_mantenedora(id))
    }
}

#[async_trait]
impl MantenedoraRepository for InMemoryCnesStore {
    async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Mantenedora>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .mantenedoras
            .rows
            .values()
            .find(|m| m.cnpj_mantenedora == cnpj)
            .cloned())
    }
}

#[async_trait]
impl Repository<Estabelecimento> for InMemoryCnesStore {
    async fn find_all(
        &self,
        filter: &EstabelecimentoFilter,
        page: Page,
    ) -> Result<Vec<Estabelecimento>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.estabelecimentos.page(page, |e| {
            matches_str(&filter.codigo_unidade, &e.codigo_unidade)
                && matches_str(&filter.codigo_cnes, &e.codigo_cnes)
                && matches_str(&filter.cnpj_mantenedora, &e.cnpj_mantenedora)
                && matches(&filter.mantenedora_id, &e.mantenedora_id.0)
                && filter.nome.as_deref().map_or(true, |n| {
                    contains_ci(&e.nome_fantasia_estabelecimento, n)
                        || contains_ci(&e.nome_razao_social_estabelecimento, n)
                })
        }))
    }

    async fn find_by_id(
        &self,
        id: EstabelecimentoId,
    ) -> Result<Option<Estabelecimento>, DomainError> {
        Ok(self.tables.read().unwrap().estabelecimentos.get(id.0))
    }

    async fn create(&self, new: &NewEstabelecimento) -> Result<Estabelecimento, DomainError> {
        self.tables.write().unwrap().create_estabelecimento(new)
    }

    async fn update(
        &self,
        id: EstabelecimentoId,
        patch: &EstabelecimentoPatch,
    ) -> Result<Option<Estabelecimento>, DomainError> {
        self.tables.write().unwrap().update_estabelecimento(id, patch)
    }

    async fn delete(&self, id: EstabelecimentoId) -> Result<bool, DomainError> {
        Ok(self.tables.write().unwrap().delete_estabelecimento(id))
    }
}

#[async_trait]
impl EstabelecimentoRepository for InMemoryCnesStore {
    async fn find_by_codigo_unidade(
        &self,
        codigo: &str,
    ) -> Result<Option<Estabelecimento>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .estabelecimentos
            .rows
            .values()
            .find(|e| e.codigo_unidade == codigo)
            .cloned())
    }

    async fn find_by_codigo_cnes(
        &self,
        codigo: &str,
    ) -> Result<Option<Estabelecimento>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .estabelecimentos
            .rows
            .values()
            .find(|e| e.codigo_cnes == codigo)
            .cloned())
    }

    async fn sync_cnpj_mantenedora(
        &self,
        mantenedora: MantenedoraId,
        cnpj: &str,
    ) -> Result<u64, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let mut written = 0;
        for row in tables
            .estabelecimentos
            .rows
            .values_mut()
            .filter(|e| e.mantenedora_id == mantenedora)
        {
            row.cnpj_mantenedora = cnpj.to_string();
            row.updated_at = Some(Utc::now());
            written += 1;
        }
        Ok(written)
    }
}

#[async_trait]
impl Repository<Endereco> for InMemoryCnesStore {
    async fn find_all(
        &self,
        filter: &EnderecoFilter,
        page: Page,
    ) -> Result<Vec<Endereco>, DomainError> {
        let cep = filter
            .cep
            .as_deref()
            .map(|cep| normalize_cep(cep).unwrap_or_else(|_| cep.to_string()));
        let tables = self.tables.read().unwrap();
        Ok(tables.enderecos.page(page, |e| {
            matches(&filter.estabelecimento_id, &e.estabelecimento_id.0)
                && matches(&cep, &e.cep_estabelecimento)
                && filter
                    .bairro
                    .as_deref()
                    .map_or(true, |b| contains_ci(&e.bairro, b))
        }))
    }

    async fn find_by_id(&self, id: EnderecoId) -> Result<Option<Endereco>, DomainError> {
        Ok(self.tables.read().unwrap().enderecos.get(id.0))
    }

    async fn create(&self, new: &NewEndereco) -> Result<Endereco, DomainError> {
        self.tables.write().unwrap().create_endereco(new)
    }

    async fn update(
        &self,
        id: EnderecoId,
        patch: &EnderecoPatch,
    ) -> Result<Option<Endereco>, DomainError> {
        self.tables.write().unwrap().update_endereco(id, patch)
    }

    async fn delete(&self, id: EnderecoId) -> Result<bool, DomainError> {
        Ok(self
            .tables
            .write()
            .unwrap()
            .enderecos
            .rows
            .remove(&id.0)
            .is_some())
    }
}

#[async_trait]
impl EnderecoRepository for InMemoryCnesStore {
    async fn find_by_estabelecimento(
        &self,
        id: EstabelecimentoId,
    ) -> Result<Option<Endereco>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .enderecos
            .rows
            .values()
            .find(|e| e.estabelecimento_id == id)
            .cloned())
    }

    async fn find_by_estabelecimentos(
        &self,
        ids: &[EstabelecimentoId],
    ) -> Result<Vec<Endereco>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .enderecos
            .rows
            .values()
            .filter(|e| ids.contains(&e.estabelecimento_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Repository<Profissional> for InMemoryCnesStore {
    async fn find_all(
        &self,
        filter: &ProfissionalFilter,
        page: Page,
    ) -> Result<Vec<Profissional>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.profissionais.page(page, |p| {
            matches_str(&filter.codigo_profissional_sus, &p.codigo_profissional_sus)
                && filter
                    .codigo_cns
                    .as_deref()
                    .map_or(true, |c| p.codigo_cns.as_deref() == Some(c))
                && filter
                    .nome
                    .as_deref()
                    .map_or(true, |n| contains_ci(&p.nome_profissional, n))
        }))
    }

    async fn find_by_id(&self, id: ProfissionalId) -> Result<Option<Profissional>, DomainError> {
        Ok(self.tables.read().unwrap().profissionais.get(id.0))
    }

    async fn create(&self, new: &NewProfissional) -> Result<Profissional, DomainError> {
        self.tables.write().unwrap().create_profissional(new)
    }

    async fn update(
        &self,
        id: ProfissionalId,
        patch: &ProfissionalPatch,
    ) -> Result<Option<Profissional>, DomainError> {
        self.tables.write().unwrap().update_profissional(id, patch)
    }

    async fn delete(&self, id: ProfissionalId) -> Result<bool, DomainError> {
        Ok(self.tables.write().unwrap().delete_profissional(id))
    }
}

#[async_trait]
impl ProfissionalRepository for InMemoryCnesStore {
    async fn find_by_codigo_profissional_sus(
        &self,
        codigo: &str,
    ) -> Result<Option<Profissional>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .profissionais
            .rows
            .values()
            .find(|p| p.codigo_profissional_sus == codigo)
            .cloned())
    }

    async fn find_by_equipe(&self, id: EquipeId) -> Result<Vec<Profissional>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .profissionais
            .rows
            .values()
            .filter(|p| {
                tables
                    .equipeprofs
                    .rows
                    .values()
                    .any(|v| v.equipe_id == id && v.profissional_id == p.id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Repository<Equipe> for InMemoryCnesStore {
    async fn find_all(&self, filter: &EquipeFilter, page: Page) -> Result<Vec<Equipe>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.equipes.page(page, |e| {
            matches_str(&filter.codigo_equipe, &e.codigo_equipe)
                && matches_str(&filter.tipo_equipe, &e.tipo_equipe)
                && matches(&filter.estabelecimento_id, &e.estabelecimento_id.0)
                && filter
                    .nome
                    .as_deref()
                    .map_or(true, |n| contains_ci(&e.nome_equipe, n))
        }))
    }

    async fn find_by_id(&self, id: EquipeId) -> Result<Option<Equipe>, DomainError> {
        Ok(self.tables.read().unwrap().equipes.get(id.0))
    }

    async fn create(&self, new: &NewEquipe) -> Result<Equipe, DomainError> {
        self.tables.write().unwrap().create_equipe(new)
    }

    async fn update(&self, id: EquipeId, patch: &EquipePatch) -> Result<Option<Equipe>, DomainError> {
        self.tables.write().unwrap().update_equipe(id, patch)
    }

    async fn delete(&self, id: EquipeId) -> Result<bool, DomainError> {
        Ok(self.tables.write().unwrap().delete_equipe(id))
    }
}

#[async_trait]
impl EquipeRepository for InMemoryCnesStore {
    async fn find_by_codigo_equipe(&self, codigo: &str) -> Result<Option<Equipe>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .equipes
            .rows
            .values()
            .find(|e| e.codigo_equipe == codigo)
            .cloned())
    }

    async fn find_by_profissional(&self, id: ProfissionalId) -> Result<Vec<Equipe>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .equipes
            .rows
            .values()
            .filter(|e| {
                tables
                    .equipeprofs
                    .rows
                    .values()
                    .any(|v| v.profissional_id == id && v.equipe_id == e.id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Repository<EquipeProf> for InMemoryCnesStore {
    async fn find_all(
        &self,
        filter: &EquipeProfFilter,
        page: Page,
    ) -> Result<Vec<EquipeProf>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.equipeprofs.page(page, |v| {
            matches(&filter.equipe_id, &v.equipe_id.0)
                && matches(&filter.profissional_id, &v.profissional_id.0)
        }))
    }

    async fn find_by_id(&self, id: EquipeProfId) -> Result<Option<EquipeProf>, DomainError> {
        Ok(self.tables.read().unwrap().equipeprofs.get(id.0))
    }

    async fn create(&self, new: &NewEquipeProf) -> Result<EquipeProf, DomainError> {
        self.tables.write().unwrap().create_equipe_prof(new)
    }

    async fn update(
        &self,
        id: EquipeProfId,
        patch: &EquipeProfPatch,
    ) -> Result<Option<EquipeProf>, DomainError> {
        self.tables.write().unwrap().update_equipe_prof(id, patch)
    }

    async fn delete(&self, id: EquipeProfId) -> Result<bool, DomainError> {
        Ok(self
            .tables
            .write()
            .unwrap()
            .equipeprofs
            .rows
            .remove(&id.0)
            .is_some())
    }
}
