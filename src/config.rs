// Archivo: config.rs
// Propósito: leer la configuración del importador desde variables de entorno.
use ports_loader::{StoreFailurePolicy, UnknownPolicy};
pub use ports_persistence::{DB_URL_FALLBACK_VAR, DB_URL_VAR};
use std::path::PathBuf;

pub const JSON_PATH_VAR: &str = "PORTS_JSON_PATH";
pub const FAILURE_POLICY_VAR: &str = "PORTS_STORE_FAILURE_POLICY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Falta la variable de entorno {0}")]
    Missing(&'static str),
    #[error("Valor inválido en {var}: {source}")]
    InvalidPolicy {
        var: &'static str,
        #[source]
        source: UnknownPolicy,
    },
}

/// Configuración del binario `ports-import`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Fichero de entrada (`.json` o `.json.gz`).
    pub json_path: PathBuf,
    /// URL del almacenamiento Diesel; `None` usa el repositorio en memoria.
    pub db_url: Option<String>,
    pub failure_policy: StoreFailurePolicy,
}

impl AppConfig {
    /// Lee la configuración del entorno del proceso. No carga `.env`; eso lo
    /// hace `main` antes de llamar aquí.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Igual que `from_env` pero con una función de búsqueda arbitraria.
    /// Los valores vacíos cuentan como ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let json_path = get(JSON_PATH_VAR).map(PathBuf::from)
                                          .ok_or(ConfigError::Missing(JSON_PATH_VAR))?;
        let db_url = ports_persistence::database_url(&lookup);
        let failure_policy = match get(FAILURE_POLICY_VAR) {
            Some(raw) => raw.parse::<StoreFailurePolicy>()
                            .map_err(|source| ConfigError::InvalidPolicy { var: FAILURE_POLICY_VAR, source })?,
            None => StoreFailurePolicy::default(),
        };

        Ok(AppConfig { json_path, db_url, failure_policy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_json_path_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(JSON_PATH_VAR)));
        let err = AppConfig::from_lookup(lookup(&[(JSON_PATH_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn defaults_to_memory_store_and_classified_policy() {
        let cfg = AppConfig::from_lookup(lookup(&[(JSON_PATH_VAR, "ports.json")])).unwrap();
        assert_eq!(cfg.json_path, PathBuf::from("ports.json"));
        assert!(cfg.db_url.is_none());
        assert!(matches!(cfg.failure_policy, StoreFailurePolicy::Classified));
    }

    #[test]
    fn ports_db_url_wins_over_database_url() {
        let cfg = AppConfig::from_lookup(lookup(&[(JSON_PATH_VAR, "p.json"),
                                                  (DB_URL_VAR, "a.sqlite"),
                                                  (DB_URL_FALLBACK_VAR, "b.sqlite")])).unwrap();
        assert_eq!(cfg.db_url.as_deref(), Some("a.sqlite"));
        let cfg = AppConfig::from_lookup(lookup(&[(JSON_PATH_VAR, "p.json"), (DB_URL_FALLBACK_VAR, "b.sqlite")])).unwrap();
        assert_eq!(cfg.db_url.as_deref(), Some("b.sqlite"));
    }

    #[test]
    fn failure_policy_is_parsed() {
        let cfg = AppConfig::from_lookup(lookup(&[(JSON_PATH_VAR, "p.json"), (FAILURE_POLICY_VAR, "Abort")])).unwrap();
        assert!(matches!(cfg.failure_policy, StoreFailurePolicy::AbortAll));
        let err = AppConfig::from_lookup(lookup(&[(JSON_PATH_VAR, "p.json"), (FAILURE_POLICY_VAR, "sometimes")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPolicy { .. }));
    }
}
