/// Database layer
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Embedded migration runner
///
/// Models live in the `models` module; the storage traits in `store`.

pub mod migrations;
pub mod pool;
