use crate::config::AppConfig;
use crate::errors::ServiceError;
use futures::future::BoxFuture;
use metrics::{counter, gauge, histogram};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle timeout duration
    pub idle_timeout: Duration,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
        }
    }
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

/// Establishes a connection pool with default pool settings
pub async fn establish_connection(database_url: &str) -> Result<DbPool, ServiceError> {
    let config = DbConfig {
        url: database_url.to_string(),
        ..Default::default()
    };

    establish_connection_with_config(&config).await
}

/// Establishes a connection pool to the database with custom configuration
///
/// # Errors
/// Returns `ServiceError::ConnectionFailed` when the server cannot be reached
/// within `connect_timeout`.
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, ServiceError> {
    debug!(
        max_connections = config.max_connections,
        acquire_timeout = ?config.acquire_timeout,
        "Configuring database connection"
    );

    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);

    gauge!("restaurant_db.max_connections", config.max_connections as f64);

    let db_pool = Database::connect(opt).await.map_err(|e| {
        error!(error = %e, "Database connection establishment failed");
        counter!("restaurant_db.connection_failures", 1);
        ServiceError::ConnectionFailed(e.to_string())
    })?;

    info!("Database connection pool established");
    Ok(db_pool)
}

/// Establish DB pool using AppConfig tuning
pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, ServiceError> {
    let db_cfg: DbConfig = cfg.into();
    establish_connection_with_config(&db_cfg).await
}

/// Scoped access to the pool.
///
/// Every call checks a connection out for exactly one operation or one
/// transaction. Driver faults are converted to `ServiceError` before they leave
/// this type.
#[derive(Debug, Clone)]
pub struct DatabaseAccess {
    pool: Arc<DbPool>,
}

impl DatabaseAccess {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Runs `f` inside a transaction: commit on `Ok`, rollback on `Err`.
    pub async fn transaction<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<T, ServiceError>>
            + Send,
        T: Send,
    {
        let transaction_id = Uuid::new_v4();
        let start = Instant::now();

        debug!(transaction_id = %transaction_id, "Starting database transaction");
        counter!("restaurant_db.transaction.started", 1);

        let result = self.pool.transaction::<_, T, ServiceError>(f).await;

        let elapsed = start.elapsed();
        histogram!("restaurant_db.transaction.duration", elapsed.as_secs_f64());

        match &result {
            Ok(_) => {
                counter!("restaurant_db.transaction.committed", 1);
                debug!(transaction_id = %transaction_id, "Transaction committed in {:?}", elapsed);
            }
            Err(e) => {
                counter!("restaurant_db.transaction.rolled_back", 1);
                warn!(transaction_id = %transaction_id, error = %e, "Transaction rolled back after {:?}", elapsed);
            }
        }

        result.map_err(ServiceError::from)
    }

    /// Runs one statement (or one read) against the pool with metrics and logging.
    pub async fn execute<F, T>(&self, operation: &str, f: F) -> Result<T, ServiceError>
    where
        F: for<'c> FnOnce(&'c DbPool) -> BoxFuture<'c, Result<T, DbErr>> + Send,
        T: Send,
    {
        let start = Instant::now();
        debug!(operation = %operation, "Starting database operation");

        let result = f(&self.pool).await.map_err(|e| {
            error!(operation = %operation, error = %e, "Database operation failed");
            counter!("restaurant_db.operation.error", 1, "operation" => operation.to_string());
            ServiceError::from(e)
        });

        let elapsed = start.elapsed();
        histogram!("restaurant_db.operation.duration", elapsed.as_secs_f64(), "operation" => operation.to_string());

        if result.is_ok() {
            debug!(operation = %operation, duration = ?elapsed, "Database operation completed");
        }

        result
    }
}

/// Runs the embedded migrations, seeding reference positions on first run.
pub async fn run_migrations(pool: &DbPool) -> Result<(), ServiceError> {
    info!("Running database migrations");
    let start = Instant::now();

    let result = crate::migrator::Migrator::up(pool, None)
        .await
        .map_err(ServiceError::from);

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => info!("Database migrations completed in {:?}", elapsed),
        Err(e) => error!("Database migrations failed after {:?}: {}", elapsed, e),
    }

    result
}

/// Checks if the database connection is active
pub async fn check_connection(pool: &DbPool) -> Result<(), ServiceError> {
    let start = Instant::now();
    let result = pool.ping().await.map_err(|e| {
        counter!("restaurant_db.connection_failures", 1);
        ServiceError::ConnectionFailed(e.to_string())
    });

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => {
            debug!("Database connection check successful in {:?}", elapsed);
            gauge!("restaurant_db.connection_latency_ms", elapsed.as_millis() as f64);
        }
        Err(e) => error!("Database connection check failed after {:?}: {}", elapsed, e),
    }

    result
}

/// Closes the database connection pool
pub async fn close_pool(pool: DbPool) -> Result<(), ServiceError> {
    info!("Closing database connection pool");
    pool.close().await.map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Statement};
    use tempfile::TempDir;

    async fn file_pool(dir: &TempDir) -> DbPool {
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("db.sqlite").display());
        establish_connection(&url).await.expect("sqlite pool")
    }

    #[tokio::test]
    async fn connects_and_pings() {
        let dir = TempDir::new().unwrap();
        let pool = file_pool(&dir).await;
        assert!(check_connection(&pool).await.is_ok());
    }

    #[tokio::test]
    async fn unreachable_database_is_a_connection_failure() {
        let dir = TempDir::new().unwrap();
        let url = format!(
            "sqlite://{}?mode=ro",
            dir.path().join("missing/nowhere.sqlite").display()
        );
        let err = establish_connection(&url).await.unwrap_err();
        assert!(matches!(err, ServiceError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn transaction_rolls_back_on_error() {
        let dir = TempDir::new().unwrap();
        let pool = file_pool(&dir).await;
        pool.execute_unprepared("CREATE TABLE ledger (id INTEGER PRIMARY KEY, note TEXT)")
            .await
            .unwrap();
        let access = DatabaseAccess::new(Arc::new(pool));

        let result: Result<(), ServiceError> = access
            .transaction(|txn| {
                Box::pin(async move {
                    txn.execute_unprepared("INSERT INTO ledger (note) VALUES ('first')")
                        .await?;
                    Err(ServiceError::ValidationError("abort".into()))
                })
            })
            .await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));

        let count = access
            .execute("ledger.count", |db| {
                Box::pin(async move {
                    let row = db
                        .query_one(Statement::from_string(
                            db.get_database_backend(),
                            "SELECT COUNT(*) AS n FROM ledger",
                        ))
                        .await?;
                    row.map(|r| r.try_get::<i64>("", "n")).transpose()
                })
            })
            .await
            .unwrap();
        assert_eq!(count, Some(0));
    }

    #[tokio::test]
    async fn migrations_seed_positions() {
        let dir = TempDir::new().unwrap();
        let pool = file_pool(&dir).await;
        run_migrations(&pool).await.unwrap();
        // second run is a no-op
        run_migrations(&pool).await.unwrap();

        let row = pool
            .query_one(Statement::from_string(
                pool.get_database_backend(),
                "SELECT COUNT(*) AS n FROM positions",
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.try_get::<i64>("", "n").unwrap(), 5);
    }
}
