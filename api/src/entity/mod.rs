//! SeaORM table models
//!
//! Mirrors `migrations/0001_cnes_schema.sql`. Domain types live in
//! `domain::entities`; adapters convert between the two.

pub mod enderecos;
pub mod equipeprofs;
pub mod equipes;
pub mod estabelecimentos;
pub mod mantenedoras;
pub mod profissionais;
