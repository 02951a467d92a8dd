use ports_domain::{InMemoryPortRepository, PortRepository};
use ports_loader::{CancellationToken, LoadError, LoaderConfig, PortLoader, StoreFailurePolicy};
use std::sync::Arc;

fn main() -> Result<(), LoadError> {
    // Repo en memoria y un documento con un registro inválido (sin ciudad)
    let repo = Arc::new(InMemoryPortRepository::new());
    let json = r#"{
        "AEAJM": {"name": "Ajman", "city": "Ajman", "country": "United Arab Emirates",
                  "coordinates": [55.5136433, 25.4052165], "unlocs": ["AEAJM"]},
        "AEAUH": {"name": "Abu Dhabi", "country": "United Arab Emirates"},
        "AEDXB": {"name": "Dubai", "city": "Dubai", "country": "United Arab Emirates"}
    }"#;

    let config = LoaderConfig { failure_policy: StoreFailurePolicy::SkipAll };
    let loader = PortLoader::new(repo.clone(), config);
    let cancel = CancellationToken::new();
    let summary = loader.load(json.as_bytes(), &cancel)?;
    println!("summary: {:?}", summary);

    for unloc in ["AEAJM", "AEAUH", "AEDXB"] {
        match repo.get_port_by_unloc(unloc) {
            Ok(Some(port)) => println!("{}", port),
            Ok(None) => println!("{}: no guardado", unloc),
            Err(e) => println!("{}: error {}", unloc, e),
        }
    }

    // Un token cancelado antes de empezar no escribe nada
    cancel.cancel();
    let empty = Arc::new(InMemoryPortRepository::new());
    let summary = PortLoader::new(empty.clone(), config).load(json.as_bytes(), &cancel)?;
    println!("cancelada: {:?}, puertos: {:?}", summary, empty.count_ports());
    Ok(())
}
