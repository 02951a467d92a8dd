// Archivo: policy.rs
// Propósito: decidir si un error del almacenamiento aborta la carga o sólo
// descarta el registro en curso.
use ports_domain::StoreError;
use std::fmt;
use std::str::FromStr;

/// Severidad de los errores de `upsert_port` durante una carga.
///
/// Los errores de validación se saltan siempre; esta política sólo aplica a
/// los errores del almacenamiento.
#[derive(Clone, Copy, Default)]
pub enum StoreFailurePolicy {
    /// Aborta sólo si el almacenamiento lo clasifica como fatal
    /// (`StoreError::is_fatal`).
    #[default]
    Classified,
    /// Registra y continúa ante cualquier error.
    SkipAll,
    /// Aborta ante cualquier error.
    AbortAll,
    /// Clasificación del llamador: `true` aborta.
    Custom(fn(&StoreError) -> bool),
}

impl StoreFailurePolicy {
    pub fn aborts_on(&self, err: &StoreError) -> bool {
        match self {
            StoreFailurePolicy::Classified => err.is_fatal(),
            StoreFailurePolicy::SkipAll => false,
            StoreFailurePolicy::AbortAll => true,
            StoreFailurePolicy::Custom(f) => f(err),
        }
    }
}

impl fmt::Debug for StoreFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreFailurePolicy::Classified => write!(f, "Classified"),
            StoreFailurePolicy::SkipAll => write!(f, "SkipAll"),
            StoreFailurePolicy::AbortAll => write!(f, "AbortAll"),
            StoreFailurePolicy::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Política de fallos desconocida: '{0}' (valores: classified, skip, abort)")]
pub struct UnknownPolicy(pub String);

impl FromStr for StoreFailurePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classified" | "" => Ok(StoreFailurePolicy::Classified),
            "skip" | "skip-all" => Ok(StoreFailurePolicy::SkipAll),
            "abort" | "abort-all" => Ok(StoreFailurePolicy::AbortAll),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}
