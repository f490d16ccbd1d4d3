/// First-run bootstrap
///
/// On first start there is no database file. [`bootstrap`] then creates it,
/// builds the schema and seeds it with the default company, the two roles,
/// an administrator and a set of sample users. On every later start it only
/// applies pending migrations.
///
/// # Example
///
/// ```no_run
/// use ezztracker_shared::db::pool::DatabaseConfig;
/// use ezztracker_shared::seed::bootstrap;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let boot = bootstrap(&DatabaseConfig::default(), "ebizz").await?;
/// if boot.seeded {
///     println!("Created a fresh database");
/// }
/// # Ok(())
/// # }
/// ```

use rand::{distributions::Alphanumeric, Rng};
use sqlx::SqlitePool;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::auth::password::{hash_password, PasswordError};
use crate::db::migrations::{database_exists, reset_schema, run_migrations};
use crate::db::pool::{create_pool, DatabaseConfig};
use crate::models::company::{Company, CreateCompany};
use crate::models::role::{CreateRole, Role, SUPERUSER, USER};
use crate::models::user::{CreateUser, User};

/// Id of the company created on first run
pub const DEFAULT_COMPANY_ID: i64 = 1;

pub const ADMIN_LOGIN: &str = "admin";
pub const ADMIN_EMAIL: &str = "admin@ebizz.com.br";
pub const ADMIN_PASSWORD: &str = "admin";

const FIRST_NAMES: [&str; 25] = [
    "Harry", "Amelia", "Oliver", "Jack", "Isabella", "Charlie", "Sophie", "Mia", "Jacob",
    "Thomas", "Emily", "Lily", "Ava", "Isla", "Alfie", "Olivia", "Jessica", "Riley", "William",
    "James", "Geoffrey", "Lisa", "Benjamin", "Stacey", "Lucy",
];

const LAST_NAMES: [&str; 25] = [
    "Brown", "Smith", "Patel", "Jones", "Williams", "Johnson", "Taylor", "Thomas", "Roberts",
    "Khan", "Lewis", "Jackson", "Clarke", "James", "Phillips", "Wilson", "Ali", "Mason",
    "Mitchell", "Rose", "Davis", "Davies", "Rodriguez", "Cox", "Alexander",
];

const SAMPLE_PASSWORD_LEN: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

/// Result of [`bootstrap`]
#[derive(Debug)]
pub struct Bootstrap {
    pub pool: SqlitePool,

    /// True when the database was created and seeded by this call
    pub seeded: bool,
}

/// Opens the database, creating and seeding it if the file is missing
///
/// # Errors
///
/// Any failure while seeding rolls the seed back and is returned; the caller
/// is expected to abort startup.
pub async fn bootstrap(config: &DatabaseConfig, company_name: &str) -> Result<Bootstrap, SeedError> {
    initialize(config, |pool| async move {
        reset_schema(&pool).await?;
        build_sample_db(&pool, company_name).await
    })
    .await
}

/// Opens the database and runs `seed` when the file did not exist yet
///
/// A failed seed deletes the new file again, so the next start retries the
/// seed instead of opening an empty database.
async fn initialize<F, Fut>(config: &DatabaseConfig, seed: F) -> Result<Bootstrap, SeedError>
where
    F: FnOnce(SqlitePool) -> Fut,
    Fut: Future<Output = Result<(), SeedError>>,
{
    let existed = database_exists(&config.file);
    let pool = create_pool(config).await?;

    if existed {
        tracing::info!(file = %config.file.display(), "Opening existing database");
        run_migrations(&pool).await?;
        return Ok(Bootstrap { pool, seeded: false });
    }

    tracing::info!(file = %config.file.display(), "Database not found, building sample database");
    if let Err(e) = seed(pool.clone()).await {
        tracing::error!(error = %e, "Seeding failed, removing the new database");
        pool.close().await;
        remove_database_files(&config.file);
        return Err(e);
    }

    Ok(Bootstrap { pool, seeded: true })
}

/// Deletes a database file along with its journal files
fn remove_database_files(file: &Path) {
    let mut paths = vec![file.to_path_buf()];
    for suffix in ["-journal", "-wal", "-shm"] {
        let mut sibling = file.as_os_str().to_owned();
        sibling.push(suffix);
        paths.push(PathBuf::from(sibling));
    }

    for path in paths {
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(file = %path.display(), error = %e, "Failed to remove database file"),
        }
    }
}

/// Seeds an empty schema in a single transaction
pub async fn build_sample_db(pool: &SqlitePool, company_name: &str) -> Result<(), SeedError> {
    // Hash everything up front; hashing is slow and needs no connection
    let admin_hash = hash_password(ADMIN_PASSWORD)?;
    let samples = FIRST_NAMES
        .iter()
        .zip(LAST_NAMES.iter())
        .map(|(first, last)| Ok((*first, *last, hash_password(&random_password())?)))
        .collect::<Result<Vec<_>, PasswordError>>()?;

    let mut tx = pool.begin().await?;

    Company::create(
        &mut *tx,
        CreateCompany {
            id: Some(DEFAULT_COMPANY_ID),
            company_name: company_name.to_string(),
            description: None,
        },
    )
    .await?;

    let user_role = Role::create(
        &mut *tx,
        CreateRole {
            name: USER.to_string(),
            description: None,
        },
    )
    .await?;
    let superuser_role = Role::create(
        &mut *tx,
        CreateRole {
            name: SUPERUSER.to_string(),
            description: None,
        },
    )
    .await?;

    User::create(
        &mut *tx,
        CreateUser {
            login: Some(ADMIN_LOGIN.to_string()),
            first_name: Some("Admin".to_string()),
            email: ADMIN_EMAIL.to_string(),
            password_hash: admin_hash,
            company_id: Some(DEFAULT_COMPANY_ID),
            active: true,
            role_ids: vec![user_role.id, superuser_role.id],
            ..Default::default()
        },
    )
    .await?;

    for (first, last, password_hash) in samples {
        User::create(
            &mut *tx,
            CreateUser {
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
                email: sample_email(first, last),
                password_hash,
                active: true,
                role_ids: vec![user_role.id],
                ..Default::default()
            },
        )
        .await?;
    }

    tx.commit().await?;

    tracing::info!(users = FIRST_NAMES.len() + 1, "Sample database built");
    Ok(())
}

fn sample_email(first: &str, last: &str) -> String {
    format!("{}.{}@example.com", first, last).to_lowercase()
}

/// Random `[a-z0-9]` password for a sample user
fn random_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(|b| (b as char).to_ascii_lowercase())
        .take(SAMPLE_PASSWORD_LEN)
        .collect()
}
