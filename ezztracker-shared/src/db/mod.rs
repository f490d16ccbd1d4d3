/// Database layer for ezzTracker
///
/// # Modules
///
/// - `pool`: SQLite connection pool lifecycle and health checks
/// - `migrations`: Embedded migrations and schema reset
/// - `listing`: Search/filter/sort/paginate queries shared by all admin lists
///
/// Models are in the `models` module at crate root level.
///
/// # Example
///
/// ```no_run
/// use ezztracker_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         file: std::env::var("DATABASE_FILE")?.into(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(&config).await?;
///     Ok(())
/// }
/// ```

pub mod listing;
pub mod migrations;
pub mod pool;
