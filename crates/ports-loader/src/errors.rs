// Archivo: errors.rs
// Propósito: errores fatales de una carga. Los fallos por registro
// (validación, escrituras rechazadas) no llegan aquí: se registran y se
// cuentan en `LoadSummary`.
use ports_domain::StoreError;
use thiserror::Error;

/// Errores que abortan `PortLoader::load`.
///
/// - `UnexpectedShape`: el valor raíz no es un objeto JSON.
/// - `Malformed`: flujo de tokens inválido fuera de un miembro (clave mal
///   formada, documento truncado, falta el `}` final, basura al final).
/// - `InvalidMember`: el valor de un miembro no es un objeto con forma de
///   puerto; el cursor no puede resincronizarse.
/// - `Io`: fallo de lectura del flujo de bytes.
/// - `Store`: el almacenamiento devolvió un error que la política considera
///   fatal.
#[derive(Error, Debug)]
pub enum LoadError {
  #[error("Se esperaba un objeto JSON en la raíz: {0}")]
  UnexpectedShape(#[source] serde_json::Error),
  #[error("JSON mal formado: {0}")]
  Malformed(#[source] serde_json::Error),
  #[error("El valor del puerto '{unloc}' no es válido: {source}")]
  InvalidMember { unloc: String, source: serde_json::Error },
  #[error("Error de lectura: {0}")]
  Io(#[from] std::io::Error),
  #[error("Error de almacenamiento en el puerto '{unloc}': {source}")]
  Store { unloc: String, source: StoreError },
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, LoadError>;
