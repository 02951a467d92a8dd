//! Importador de puertos: configuración por entorno y ejecución de la carga
//! contra el almacenamiento elegido. El binario `ports-import` sólo añade el
//! logger y las señales del sistema.

pub mod config;
pub mod import;

pub use config::{AppConfig, ConfigError};
pub use import::{open_input, open_repository, run_import, ImportError, ImportReport};
