use crate::{Port, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Contrato de persistencia de puertos: un mapa plano `unloc -> Port`.
///
/// Las implementaciones deben ser seguras para compartirse entre hilos: el
/// cargador escribe mientras otras partes del sistema pueden consultar.
pub trait PortRepository: Send + Sync {
    /// Inserta o reemplaza el puerto con el mismo `unloc`. Idempotente: varias
    /// llamadas con el mismo id convergen al último valor.
    fn upsert_port(&self, port: Port) -> Result<(), StoreError>;

    /// Devuelve `Ok(None)` cuando el id no existe; la ausencia no es error.
    fn get_port_by_unloc(&self, unloc: &str) -> Result<Option<Port>, StoreError>;

    /// Número de identificadores distintos almacenados.
    fn count_ports(&self) -> Result<usize, StoreError>;
}

impl<R> PortRepository for Arc<R> where R: PortRepository + ?Sized
{
    fn upsert_port(&self, port: Port) -> Result<(), StoreError> {
        (**self).upsert_port(port)
    }

    fn get_port_by_unloc(&self, unloc: &str) -> Result<Option<Port>, StoreError> {
        (**self).get_port_by_unloc(unloc)
    }

    fn count_ports(&self) -> Result<usize, StoreError> {
        (**self).count_ports()
    }
}

/// Implementación en memoria. Lecturas concurrentes, escrituras exclusivas.
#[derive(Debug, Default)]
pub struct InMemoryPortRepository {
    ports: RwLock<HashMap<String, Port>>,
}

impl InMemoryPortRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // Un lock envenenado deja el mapa en estado desconocido: se trata como
    // almacenamiento no disponible.
    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Port>>, StoreError> {
        self.ports
            .read()
            .map_err(|e| StoreError::Unavailable(format!("RwLock 'ports' poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Port>>, StoreError> {
        self.ports
            .write()
            .map_err(|e| StoreError::Unavailable(format!("RwLock 'ports' poisoned: {}", e)))
    }
}

impl PortRepository for InMemoryPortRepository {
    fn upsert_port(&self, port: Port) -> Result<(), StoreError> {
        let mut ports = self.write()?;
        ports.insert(port.unloc().to_string(), port);
        Ok(())
    }

    fn get_port_by_unloc(&self, unloc: &str) -> Result<Option<Port>, StoreError> {
        let ports = self.read()?;
        Ok(ports.get(unloc).cloned())
    }

    fn count_ports(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn test_port(name: &str) -> Port {
        Port::new("TESTP", name, "Test City", "Test Country")
    }

    #[test]
    fn upsert_and_get() -> Result<(), StoreError> {
        let repo = InMemoryPortRepository::new();
        assert_eq!(repo.get_port_by_unloc("TESTP")?, None);

        repo.upsert_port(test_port("Test Port"))?;
        let got = repo.get_port_by_unloc("TESTP")?.expect("port stored");
        assert_eq!(got.name(), "Test Port");
        assert_eq!(got.city(), "Test City");
        assert_eq!(got.country(), "Test Country");
        Ok(())
    }

    #[test]
    fn upsert_is_last_write_wins() -> Result<(), StoreError> {
        let repo = InMemoryPortRepository::new();
        repo.upsert_port(test_port("first"))?;
        repo.upsert_port(test_port("second"))?;
        assert_eq!(repo.count_ports()?, 1);
        assert_eq!(repo.get_port_by_unloc("TESTP")?, Some(test_port("second")));
        Ok(())
    }

    #[test]
    fn readers_run_alongside_a_writer() {
        let repo = Arc::new(InMemoryPortRepository::new());
        let writer = {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                for i in 0..200 {
                    let unloc = format!("P{:04}", i);
                    repo.upsert_port(Port::new(unloc, "n", "c", "k")).unwrap();
                }
            })
        };
        let readers: Vec<_> = (0..4).map(|_| {
                                        let repo = Arc::clone(&repo);
                                        thread::spawn(move || {
                                            for _ in 0..200 {
                                                let n = repo.count_ports().unwrap();
                                                assert!(n <= 200);
                                                let _ = repo.get_port_by_unloc("P0000").unwrap();
                                            }
                                        })
                                    })
                                    .collect();
        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(repo.count_ports().unwrap(), 200);
    }
}
