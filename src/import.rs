// Archivo: import.rs
// Propósito: unir configuración, almacenamiento y cargador en una sola
// ejecución del importador.
use crate::config::AppConfig;
use flate2::read::GzDecoder;
use log::info;
use ports_domain::{InMemoryPortRepository, PortRepository, StoreError};
use ports_loader::{CancelSignal, LoadError, LoadSummary, LoaderConfig, PortLoader};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("No se pudo abrir '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Almacenamiento no disponible: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Resultado de una importación: contadores de la carga y total de puertos
/// presentes en el almacenamiento al terminar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub summary: LoadSummary,
    pub stored: usize,
}

/// Abre el fichero de entrada; los `*.gz` se descomprimen al vuelo.
pub fn open_input(path: &Path) -> Result<Box<dyn Read + Send>, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Open { path: path.to_path_buf(), source })?;
    let gzipped = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if gzipped {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Elige el almacenamiento: Diesel si hay URL, memoria en otro caso.
pub fn open_repository(config: &AppConfig) -> Result<Arc<dyn PortRepository>, ImportError> {
    match config.db_url.as_deref() {
        Some(url) => {
            info!("usando almacenamiento Diesel");
            Ok(Arc::new(ports_persistence::connect(url)?))
        }
        None => {
            info!("usando almacenamiento en memoria");
            Ok(Arc::new(InMemoryPortRepository::new()))
        }
    }
}

/// Importa el fichero configurado en `repo`. Bloqueante: llamar desde un
/// hilo que pueda esperar E/S.
pub fn run_import<C>(config: &AppConfig, repo: Arc<dyn PortRepository>, cancel: &C) -> Result<ImportReport, ImportError>
    where C: CancelSignal + ?Sized
{
    let input = open_input(&config.json_path)?;
    info!("importando puertos desde {}", config.json_path.display());
    let loader = PortLoader::new(repo, LoaderConfig { failure_policy: config.failure_policy });
    let summary = loader.load(input, cancel)?;
    let stored = loader.repository().count_ports()?;
    Ok(ImportReport { summary, stored })
}
