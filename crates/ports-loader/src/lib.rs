//! Crate `ports-loader`: carga en streaming de puertos desde JSON
//!
//! Este crate convierte un documento `{ "<UNLOC>": { ... }, ... }`, de tamaño
//! potencialmente mayor que la memoria disponible, en una secuencia de
//! `upsert_port` sobre cualquier `PortRepository`.
//!
//! Diseño resumido:
//! - Streaming: el objeto raíz se recorre par a par sobre el deserializador
//!   de `serde_json`; sólo un puerto vive en memoria a la vez.
//! - La clave externa es el identificador: sobrescribe cualquier `unloc` del
//!   objeto anidado.
//! - Un puerto inválido se registra y se salta; un error del almacenamiento
//!   se salta o aborta según `StoreFailurePolicy`.
//! - Cancelación cooperativa: la señal se consulta sin bloquear al comienzo
//!   de cada par; cancelar devuelve `Ok` con lo ya guardado.
//!
//! Ejemplo rápido:
//! ```rust
//! use ports_domain::{InMemoryPortRepository, PortRepository};
//! use ports_loader::{LoaderConfig, NeverCancel, PortLoader};
//! use std::sync::Arc;
//!
//! let repo = Arc::new(InMemoryPortRepository::new());
//! let loader = PortLoader::new(repo.clone(), LoaderConfig::default());
//! let json = r#"{"AEJEA": {"name": "Jebel Ali", "city": "Jebel Ali", "country": "UAE"}}"#;
//! let summary = loader.load(json.as_bytes(), &NeverCancel).unwrap();
//! assert_eq!(summary.upserted, 1);
//! assert_eq!(repo.count_ports().unwrap(), 1);
//! ```
pub mod cancel;
pub mod errors;
pub mod loader;
pub mod policy;
mod stream;

pub use cancel::{CancelSignal, CancellationToken, NeverCancel};
pub use errors::{LoadError, Result};
pub use loader::{LoadSummary, LoaderConfig, PortLoader};
pub use policy::{StoreFailurePolicy, UnknownPolicy};
