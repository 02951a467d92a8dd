// Archivo: loader.rs
// Propósito: implementar `PortLoader`, la capa que convierte un documento JSON
// `{ "<UNLOC>": { ... }, ... }` en una secuencia de `upsert_port` sobre el
// repositorio inyectado.
use crate::cancel::CancelSignal;
use crate::errors::{LoadError, Result};
use crate::policy::StoreFailurePolicy;
use crate::stream::{Interrupt, LoadState, PortsVisitor};
use log::info;
use ports_domain::PortRepository;
use serde::Deserializer as _;
use serde_json::error::Category;
use std::io::{BufReader, Read};
use std::sync::Arc;

/// Configuración del cargador.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoaderConfig {
    /// Qué errores del almacenamiento abortan la carga.
    pub failure_policy: StoreFailurePolicy,
}

/// Contadores de una carga terminada (completa o cancelada).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Puertos guardados con éxito.
    pub upserted: usize,
    /// Puertos descartados por validación.
    pub invalid: usize,
    /// Puertos descartados por errores del almacenamiento que la política
    /// permite saltar.
    pub store_failures: usize,
    /// La carga se detuvo por una cancelación antes del final del documento.
    pub cancelled: bool,
}

impl LoadSummary {
    /// Total de pares leídos del documento.
    pub fn processed(&self) -> usize {
        self.upserted + self.invalid + self.store_failures
    }
}

/// Cargador en streaming de puertos.
///
/// Lee el objeto raíz par a par; nunca mantiene en memoria más de un puerto.
/// Entre pares consulta la señal de cancelación sin bloquear: cancelar no es
/// un error y lo ya guardado permanece.
pub struct PortLoader<R>
    where R: PortRepository + ?Sized
{
    repo: Arc<R>,
    config: LoaderConfig,
}

impl<R> PortLoader<R> where R: PortRepository + ?Sized
{
    pub fn new(repo: Arc<R>, config: LoaderConfig) -> Self {
        Self { repo, config }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    /// Carga todos los puertos de `reader` en el repositorio.
    ///
    /// Devuelve `Ok` si el documento se consumió entero o si `cancel` pidió
    /// parar; `Err` ante JSON inválido, un miembro que no es objeto, un error
    /// de lectura o un error del almacenamiento que la política considera
    /// fatal.
    pub fn load<Rd, C>(&self, reader: Rd, cancel: &C) -> Result<LoadSummary>
        where Rd: Read,
              C: CancelSignal + ?Sized
    {
        info!("iniciando carga de puertos (política: {:?})", self.config.failure_policy);
        let mut de = serde_json::Deserializer::from_reader(BufReader::new(reader));
        let mut state = LoadState::new(self.repo.as_ref(), cancel, self.config.failure_policy);

        let outcome = (&mut de).deserialize_map(PortsVisitor { state: &mut state })
                               .and_then(|()| de.end());

        match (outcome, state.interrupt.take()) {
            (Ok(()), _) => {
                info!("carga completa: {:?}", state.summary);
                Ok(state.summary)
            }
            (Err(_), Some(Interrupt::Cancelled)) => {
                state.summary.cancelled = true;
                info!("carga cancelada tras {} puertos: {:?}", state.summary.processed(), state.summary);
                Ok(state.summary)
            }
            (Err(_), Some(Interrupt::Store { unloc, source })) => Err(LoadError::Store { unloc, source }),
            (Err(e), None) => Err(classify(e, state.entered, state.pending_key.take())),
        }
    }
}

fn classify(err: serde_json::Error, entered: bool, pending_key: Option<String>) -> LoadError {
    if err.is_io() {
        return LoadError::Io(err.into());
    }
    if let Some(unloc) = pending_key {
        return LoadError::InvalidMember { unloc, source: err };
    }
    if !entered && err.classify() == Category::Data {
        return LoadError::UnexpectedShape(err);
    }
    LoadError::Malformed(err)
}
