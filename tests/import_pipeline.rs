use flate2::write::GzEncoder;
use flate2::Compression;
use ports_domain::{InMemoryPortRepository, PortRepository};
use ports_loader::{CancellationToken, NeverCancel, StoreFailurePolicy};
use ports_service::{open_repository, run_import, AppConfig, ImportError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const PORTS: &str = r#"{
  "AEAJM": {
    "name": "Ajman", "city": "Ajman", "country": "United Arab Emirates",
    "alias": [], "regions": [], "coordinates": [55.5136433, 25.4052165],
    "province": "Ajman", "timezone": "Asia/Dubai", "unlocs": ["AEAJM"], "code": "52000"
  },
  "AEAUH": {
    "name": "Abu Dhabi", "city": "Abu Dhabi", "country": "United Arab Emirates",
    "coordinates": [54.37, 24.47], "unlocs": ["AEAUH"], "code": "52001"
  },
  "AEDXB": {
    "name": "Dubai", "city": "Dubai", "country": "United Arab Emirates",
    "unlocs": ["AEDXB"], "code": "52005"
  }
}"#;

fn config_for(path: &Path) -> AppConfig {
  AppConfig { json_path: path.to_path_buf(),
              db_url: None,
              failure_policy: StoreFailurePolicy::default() }
}

fn write_plain(dir: &Path) -> PathBuf {
  let path = dir.join("ports.json");
  std::fs::write(&path, PORTS).unwrap();
  path
}

#[test]
fn imports_plain_json_into_memory() {
  let dir = tempfile::tempdir().unwrap();
  let config = config_for(&write_plain(dir.path()));
  let repo = open_repository(&config).unwrap();
  let report = run_import(&config, repo.clone(), &NeverCancel).unwrap();
  assert_eq!(report.stored, 3);
  assert_eq!(report.summary.upserted, 3);
  assert!(!report.summary.cancelled);
  assert_eq!(repo.get_port_by_unloc("AEDXB").unwrap().unwrap().city(), "Dubai");
}

#[test]
fn imports_gzipped_json() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("ports.json.gz");
  let mut enc = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
  enc.write_all(PORTS.as_bytes()).unwrap();
  enc.finish().unwrap();

  let config = config_for(&path);
  let repo: Arc<dyn PortRepository> = Arc::new(InMemoryPortRepository::new());
  let report = run_import(&config, repo, &NeverCancel).unwrap();
  assert_eq!(report.stored, 3);
}

#[cfg(not(feature = "pg"))]
#[test]
fn imports_into_sqlite_store() {
  let dir = tempfile::tempdir().unwrap();
  let mut config = config_for(&write_plain(dir.path()));
  config.db_url = Some(dir.path().join("ports.sqlite").to_string_lossy().into_owned());
  let repo = open_repository(&config).unwrap();
  let report = run_import(&config, repo, &NeverCancel).unwrap();
  assert_eq!(report.stored, 3);
}

#[test]
fn cancelled_import_reports_what_was_stored() {
  let dir = tempfile::tempdir().unwrap();
  let config = config_for(&write_plain(dir.path()));
  let cancel = CancellationToken::new();
  cancel.cancel();
  let repo = open_repository(&config).unwrap();
  let report = run_import(&config, repo, &cancel).unwrap();
  assert!(report.summary.cancelled);
  assert_eq!(report.stored, 0);
}

#[test]
fn missing_input_file_is_an_open_error() {
  let dir = tempfile::tempdir().unwrap();
  let config = config_for(&dir.path().join("nope.json"));
  let repo = open_repository(&config).unwrap();
  let err = run_import(&config, repo, &NeverCancel).unwrap_err();
  assert!(matches!(err, ImportError::Open { .. }));
}

#[test]
fn malformed_input_is_a_load_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("broken.json");
  std::fs::write(&path, r#"{"AEAJM": {"name": "Ajman""#).unwrap();
  let config = config_for(&path);
  let repo = open_repository(&config).unwrap();
  let err = run_import(&config, repo, &NeverCancel).unwrap_err();
  assert!(matches!(err, ImportError::Load(_)));
}
