//! Persistencia Diesel para el trait `PortRepository`.
//! Este archivo expone el módulo `schema` y reexporta el repositorio Diesel
//! (SQLite por defecto, Postgres con la feature `pg`). La implementación
//! está en `port_persistence.rs`.

mod port_persistence;
pub mod schema;

pub use port_persistence::{connect, database_url, DieselPortRepository, DB_URL_FALLBACK_VAR, DB_URL_VAR};
