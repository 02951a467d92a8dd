use crate::schema::ports;
use crate::schema::ports::dsl as ports_dsl;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{info, warn};
use ports_domain::{Port, PortRepository, StoreError};
use std::sync::Arc;
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
#[cfg(feature = "pg")]
type DbConn = PgConnection;
#[cfg(not(feature = "pg"))]
type DbConn = SqliteConnection;
type DbPool = Pool<ConnectionManager<DbConn>>;
/// Repo Diesel que implementa `PortRepository`.
pub struct DieselPortRepository {
  pool: Arc<DbPool>,
}
impl DieselPortRepository {
  /// Crea el pool de conexiones y aplica las migraciones pendientes.
  pub fn new(database_url: &str) -> Result<Self, StoreError> {
    let manager = ConnectionManager::<DbConn>::new(database_url);
    let pool = Pool::builder().max_size(4)
                              .build(manager)
                              .map_err(|e| StoreError::Unavailable(format!("no se pudo crear el pool de conexiones: {}", e)))?;
    let repo = DieselPortRepository { pool: Arc::new(pool) };
    let mut c = repo.conn()?;
    #[cfg(not(feature = "pg"))]
    for pragma in ["PRAGMA journal_mode = WAL;", "PRAGMA busy_timeout = 5000;"] {
      if let Err(e) = diesel::sql_query(pragma).execute(&mut c) {
        warn!("no se pudo aplicar '{}': {}", pragma, e);
      }
    }
    let applied = c.run_pending_migrations(MIGRATIONS)
                   .map_err(|e| StoreError::Unavailable(format!("migraciones: {}", e)))?;
    info!("repositorio de puertos listo ({} migraciones aplicadas)", applied.len());
    drop(c);
    Ok(repo)
  }
  fn conn(&self) -> Result<PooledConnection<ConnectionManager<DbConn>>, StoreError> {
    self.pool.get().map_err(|e| StoreError::Unavailable(format!("pool: {}", e)))
  }
}
// Fila Diesel de la tabla `ports`
#[derive(Debug, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = ports)]
#[diesel(primary_key(unloc))]
#[diesel(treat_none_as_null = true)]
struct PortRow {
  pub unloc: String,
  pub name: String,
  pub city: String,
  pub country: String,
  pub alias: String,
  pub regions: String,
  pub longitude: Option<f64>,
  pub latitude: Option<f64>,
  pub province: Option<String>,
  pub timezone: Option<String>,
  pub unlocs: String,
  pub code: Option<String>,
}
impl PortRow {
  fn from_port(port: &Port) -> Result<Self, StoreError> {
    let coordinates = port.coordinates();
    Ok(PortRow { unloc: port.unloc().to_string(),
                 name: port.name().to_string(),
                 city: port.city().to_string(),
                 country: port.country().to_string(),
                 alias: serde_json::to_string(port.alias())?,
                 regions: serde_json::to_string(port.regions())?,
                 longitude: coordinates.map(|c| c.longitude()),
                 latitude: coordinates.map(|c| c.latitude()),
                 province: port.province().map(|s| s.to_string()),
                 timezone: port.timezone().map(|s| s.to_string()),
                 unlocs: serde_json::to_string(port.unlocs())?,
                 code: port.code().map(|s| s.to_string()) })
  }
  fn into_port(self) -> Result<Port, StoreError> {
    let alias: Vec<String> = serde_json::from_str(&self.alias)?;
    let regions: Vec<String> = serde_json::from_str(&self.regions)?;
    let unlocs: Vec<String> = serde_json::from_str(&self.unlocs)?;
    let mut port = Port::new(self.unloc, self.name, self.city, self.country).with_alias(alias)
                                                                            .with_regions(regions)
                                                                            .with_unlocs(unlocs);
    if let (Some(lon), Some(lat)) = (self.longitude, self.latitude) {
      port = port.with_coordinates(lon, lat);
    }
    if let Some(p) = self.province {
      port = port.with_province(p);
    }
    if let Some(t) = self.timezone {
      port = port.with_timezone(t);
    }
    if let Some(c) = self.code {
      port = port.with_code(c);
    }
    Ok(port)
  }
}
// Una conexión cerrada o un gestor de transacciones roto afectan a todo el
// almacenamiento; el resto de errores sólo al registro en curso.
fn map_db_err(e: DieselError) -> StoreError {
  match e {
    DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
      StoreError::Unavailable(format!("db: {}", info.message()))
    }
    DieselError::BrokenTransactionManager => StoreError::Unavailable("db: transaction manager broken".into()),
    other => StoreError::Rejected(format!("db: {}", other)),
  }
}
impl PortRepository for DieselPortRepository {
  fn upsert_port(&self, port: Port) -> Result<(), StoreError> {
    let row = PortRow::from_port(&port)?;
    let mut conn = self.conn()?;
    diesel::insert_into(ports::table).values(&row)
                                     .on_conflict(ports_dsl::unloc)
                                     .do_update()
                                     .set(&row)
                                     .execute(&mut conn)
                                     .map_err(map_db_err)?;
    Ok(())
  }
  fn get_port_by_unloc(&self, unloc: &str) -> Result<Option<Port>, StoreError> {
    let mut conn = self.conn()?;
    let opt = ports_dsl::ports.filter(ports_dsl::unloc.eq(unloc))
                              .select(PortRow::as_select())
                              .first(&mut conn)
                              .optional()
                              .map_err(map_db_err)?;
    opt.map(PortRow::into_port).transpose()
  }
  fn count_ports(&self) -> Result<usize, StoreError> {
    let mut conn = self.conn()?;
    let n: i64 = ports_dsl::ports.count().get_result(&mut conn).map_err(map_db_err)?;
    Ok(n as usize)
  }
}
pub const DB_URL_VAR: &str = "PORTS_DB_URL";
pub const DB_URL_FALLBACK_VAR: &str = "DATABASE_URL";
/// URL de la base de datos: `PORTS_DB_URL`, o `DATABASE_URL` como respaldo.
/// Un valor vacío cuenta como ausente.
pub fn database_url<F>(lookup: F) -> Option<String>
  where F: Fn(&str) -> Option<String>
{
  let get = |key: &str| lookup(key).filter(|url| !url.trim().is_empty());
  get(DB_URL_VAR).or_else(|| get(DB_URL_FALLBACK_VAR))
}
fn looks_like_postgres(url: &str) -> bool {
  let l = url.to_lowercase();
  l.starts_with("postgres://") || l.starts_with("postgresql://")
}
/// Abre el repositorio comprobando que la URL encaja con el backend compilado.
///
/// Con la feature `pg` exige una URL de Postgres; sin ella rechaza URLs de
/// Postgres y trata la URL como ruta de fichero SQLite.
pub fn connect(url: &str) -> Result<DieselPortRepository, StoreError> {
  if cfg!(feature = "pg") && !looks_like_postgres(url) {
    return Err(StoreError::Unavailable("ports-persistence: PORTS_DB_URL does not look like Postgres URL".into()));
  }
  if !cfg!(feature = "pg") && looks_like_postgres(url) {
    return Err(StoreError::Unavailable("ports-persistence was compiled without 'pg' feature; enable the 'pg' feature \
                                        to use Postgres"
                                                        .into()));
  }
  DieselPortRepository::new(url)
}
