mod errors;
mod port;
mod repository;

pub use errors::{FieldViolation, Rule, StoreError, ValidationError};
pub use port::{Coordinates, Port, UNLOC_LEN};
pub use repository::{InMemoryPortRepository, PortRepository};
