// Archivo: cancel.rs
// Propósito: señales de cancelación cooperativa que el cargador consulta sin
// bloquear al inicio de cada registro.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;

/// Fuente de cancelación consultable sin bloquear.
///
/// La consulta ocurre entre registros; un registro en curso siempre termina
/// antes de que la cancelación tenga efecto.
pub trait CancelSignal {
    fn is_cancelled(&self) -> bool;
}

/// Token clonable: cualquier clon puede cancelar y todos lo observan.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

/// Un mensaje recibido cancela. Un canal desconectado no: ya nadie puede
/// pedir la cancelación.
impl<T> CancelSignal for Receiver<T> {
    fn is_cancelled(&self) -> bool {
        match self.try_recv() {
            Ok(_) => true,
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => false,
        }
    }
}

/// Señal que nunca cancela, para cargas sin interrupción externa.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<T> CancelSignal for &T where T: CancelSignal + ?Sized
{
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<T> CancelSignal for Arc<T> where T: CancelSignal + ?Sized
{
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}
