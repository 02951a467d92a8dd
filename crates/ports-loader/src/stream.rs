// Archivo: stream.rs
// Propósito: recorrer el objeto raíz miembro a miembro sobre el deserializador
// de serde_json, sin materializar el documento completo. Cada par
// clave/valor se decodifica, valida y persiste antes de leer el siguiente.
use crate::cancel::CancelSignal;
use crate::loader::LoadSummary;
use crate::policy::StoreFailurePolicy;
use log::{debug, warn};
use ports_domain::{Port, PortRepository, StoreError};
use serde::de::value::MapAccessDeserializer;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::marker::PhantomData;

/// Motivo por el que el recorrido se detuvo antes del `}` final sin que el
/// JSON fuera inválido.
pub(crate) enum Interrupt {
    Cancelled,
    Store { unloc: String, source: StoreError },
}

/// Estado mutable de una carga, compartido con el visitante de serde.
pub(crate) struct LoadState<'a, R: ?Sized, C: ?Sized> {
    repo: &'a R,
    cancel: &'a C,
    policy: StoreFailurePolicy,
    pub(crate) summary: LoadSummary,
    /// Se abrió el objeto raíz.
    pub(crate) entered: bool,
    /// Clave cuyo valor se está decodificando.
    pub(crate) pending_key: Option<String>,
    pub(crate) interrupt: Option<Interrupt>,
}

impl<'a, R, C> LoadState<'a, R, C>
    where R: PortRepository + ?Sized,
          C: CancelSignal + ?Sized
{
    pub(crate) fn new(repo: &'a R, cancel: &'a C, policy: StoreFailurePolicy) -> Self {
        Self { repo,
               cancel,
               policy,
               summary: LoadSummary::default(),
               entered: false,
               pending_key: None,
               interrupt: None }
    }

    /// Valida y persiste un puerto ya decodificado. Sólo devuelve `Err` cuando
    /// la política manda abortar.
    fn accept(&mut self, port: Port) -> Result<(), Interrupt> {
        if let Err(e) = port.validate() {
            warn!("puerto descartado: {}", e);
            self.summary.invalid += 1;
            return Ok(());
        }
        let unloc = port.unloc().to_string();
        match self.repo.upsert_port(port) {
            Ok(()) => {
                debug!("puerto {} guardado", unloc);
                self.summary.upserted += 1;
                Ok(())
            }
            Err(e) if self.policy.aborts_on(&e) => Err(Interrupt::Store { unloc, source: e }),
            Err(e) => {
                warn!("fallo al guardar el puerto {}: {}", unloc, e);
                self.summary.store_failures += 1;
                Ok(())
            }
        }
    }
}

/// Visitante del objeto raíz: un puerto por iteración.
pub(crate) struct PortsVisitor<'s, 'a, R: ?Sized, C: ?Sized> {
    pub(crate) state: &'s mut LoadState<'a, R, C>,
}

impl<'de, 's, 'a, R, C> Visitor<'de> for PortsVisitor<'s, 'a, R, C>
    where R: PortRepository + ?Sized,
          C: CancelSignal + ?Sized
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object keyed by UN/LOCODE")
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
        where A: MapAccess<'de>
    {
        self.state.entered = true;
        loop {
            // Sondeo no bloqueante antes de tocar el siguiente par.
            if self.state.cancel.is_cancelled() {
                self.state.interrupt = Some(Interrupt::Cancelled);
                return Err(de::Error::custom("load cancelled"));
            }
            let Some(key) = map.next_key::<String>()? else {
                return Ok(());
            };
            self.state.pending_key = Some(key);
            let ObjectOnly(port) = map.next_value::<ObjectOnly<Port>>()?;
            let key = self.state.pending_key.take().unwrap_or_default();
            if let Err(interrupt) = self.state.accept(port.with_unloc(key)) {
                self.state.interrupt = Some(interrupt);
                return Err(de::Error::custom("load aborted by store"));
            }
        }
    }
}

/// Decodifica `T` sólo desde un objeto JSON.
///
/// Los structs derivados de serde aceptan también arrays posicionales; un
/// miembro que no es objeto debe ser un error de decodificación.
pub(crate) struct ObjectOnly<T>(pub(crate) T);

impl<'de, T> Deserialize<'de> for ObjectOnly<T> where T: Deserialize<'de>
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: Deserializer<'de>
    {
        struct ObjectVisitor<T>(PhantomData<T>);

        impl<'de, T> Visitor<'de> for ObjectVisitor<T> where T: Deserialize<'de>
        {
            type Value = T;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object describing a port")
            }

            fn visit_map<A>(self, map: A) -> Result<T, A::Error>
                where A: MapAccess<'de>
            {
                T::deserialize(MapAccessDeserializer::new(map))
            }
        }

        deserializer.deserialize_map(ObjectVisitor(PhantomData)).map(ObjectOnly)
    }
}
