//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `entities`: Domain models for the registry tables
//! - `ports`: Trait definitions for persistence
//! - `validation`: Field rules shared by create and update payloads
//! - `constraints`: Schema constraint names and their user-facing messages

pub mod constraints;
pub mod entities;
pub mod ports;
pub mod validation;
