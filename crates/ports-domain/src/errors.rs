// errors.rs
use std::fmt;
use thiserror::Error;

/// Regla incumplida por un campo concreto de un `Port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
  /// El campo es obligatorio y llegó vacío.
  Required,
  /// El campo debe tener exactamente `expected` caracteres.
  Length { expected: usize, actual: usize },
  /// La secuencia debe tener exactamente `expected` elementos.
  Arity { expected: usize, actual: usize },
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Rule::Required => write!(f, "es obligatorio"),
      Rule::Length { expected, actual } => {
        write!(f, "debe tener exactamente {} caracteres (tiene {})", expected, actual)
      }
      Rule::Arity { expected, actual } => {
        write!(f, "debe tener exactamente {} valores (tiene {})", expected, actual)
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
  pub field: String,
  pub rule: Rule,
}

impl fmt::Display for FieldViolation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "'{}' {}", self.field, self.rule)
  }
}

/// Resultado fallido de `Port::validate`: enumera todas las violaciones, no
/// sólo la primera.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error de validación en el puerto '{unloc}': {}", join_violations(.violations))]
pub struct ValidationError {
  pub unloc: String,
  pub violations: Vec<FieldViolation>,
}

impl ValidationError {
  /// Nombres de los campos que incumplen alguna regla, en orden de evaluación.
  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.violations.iter().map(|v| v.field.as_str())
  }

  pub fn has_field(&self, field: &str) -> bool {
    self.fields().any(|f| f == field)
  }
}

fn join_violations(violations: &[FieldViolation]) -> String {
  violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

/// Errores devueltos por las implementaciones de `PortRepository`.
///
/// - `Unavailable`: el almacenamiento no responde (conexión, pool, lock
///   envenenado). Se considera fatal para una carga.
/// - `Rejected`: el almacenamiento rechazó la escritura de un registro.
/// - `Serialization`: el registro no pudo (de)serializarse para guardarse.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
  #[error("Almacenamiento no disponible: {0}")]
  Unavailable(String),
  #[error("Escritura rechazada: {0}")]
  Rejected(String),
  #[error("Error de serialización: {0}")]
  Serialization(String),
}

impl StoreError {
  /// `true` cuando el fallo afecta al almacenamiento completo y no sólo al
  /// registro en curso.
  pub fn is_fatal(&self) -> bool {
    matches!(self, StoreError::Unavailable(_))
  }
}

impl From<serde_json::Error> for StoreError {
  fn from(e: serde_json::Error) -> Self {
    Self::Serialization(e.to_string())
  }
}
