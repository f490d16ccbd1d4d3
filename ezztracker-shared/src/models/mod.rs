/// Database models for ezzTracker
///
/// Each model owns its CRUD operations as associated functions taking a
/// `SqlitePool` (or any executor, for `create`, so the bootstrap routine can
/// seed inside one transaction).
///
/// # Models
///
/// - `company`: Customer companies
/// - `role`: Roles and the user/role association
/// - `user`: User accounts
/// - `os`: Operating systems
/// - `product`: Products, per company and OS
/// - `priority`, `status`: Ticket lookup tables
/// - `track`: Tickets
/// - `track_handler`: Ticket assignments
///
/// # Example
///
/// ```no_run
/// use ezztracker_shared::models::priority::{CreatePriority, Priority};
/// use ezztracker_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&DatabaseConfig::default()).await?;
///
/// let high = Priority::create(&pool, CreatePriority { name: "High".to_string() }).await?;
/// assert_eq!(high.to_string(), "High");
/// # Ok(())
/// # }
/// ```

pub mod company;
pub mod os;
pub mod priority;
pub mod product;
pub mod role;
pub mod status;
pub mod track;
pub mod track_handler;
pub mod user;
