//! Database layer for Acado
//!
//! Provides:
//! - SeaORM entity models
//! - Repository traits with PostgreSQL and in-memory stores
//! - Connection pool management and schema sync
//! - Query and patch objects shared by both stores

pub mod models;
pub mod patch;
pub mod query;
mod memory;
mod repository;
mod store;

pub use memory::MemoryRepository;
pub use repository::Repository;
pub use store::{
    CourseRepository, FormRepository, HealthCheck, Repositories, UniversityRepository,
};

use crate::config::{DatabaseConfig, StoreBackend};
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::time::Duration;
use tracing::info;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DbPool {
    connection: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let mut opts = ConnectOptions::new(&config.url);
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .sqlx_logging(false);

        let connection = Database::connect(opts)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect: {}", e),
            })?;

        info!("Database connection established");

        Ok(Self { connection })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.connection
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Ping failed: {}", e),
            })?;

        Ok(())
    }

    /// Create any missing table. Parents before children so foreign keys resolve.
    pub async fn sync_schema(&self) -> Result<()> {
        self.create_table(models::UniversityEntity).await?;
        self.create_table(models::CourseEntity).await?;
        self.create_table(models::FormCategoryEntity).await?;
        self.create_table(models::ApplicationFormEntity).await?;
        self.create_table(models::FormFieldEntity).await?;

        info!("Database schema in sync");
        Ok(())
    }

    async fn create_table<E: EntityTrait>(&self, entity: E) -> Result<()> {
        let backend = self.connection.get_database_backend();
        let schema = Schema::new(backend);

        let mut statement = schema.create_table_from_entity(entity);
        statement.if_not_exists();

        self.connection.execute(backend.build(&statement)).await?;
        Ok(())
    }
}

/// Open the store selected by configuration
pub async fn connect(config: &DatabaseConfig) -> Result<Repositories> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory store");
            Ok(Repositories::from_store(MemoryRepository::new()))
        }
        StoreBackend::Postgres => {
            let pool = DbPool::new(config).await?;
            if config.sync_schema {
                pool.sync_schema().await?;
            }
            Ok(Repositories::from_store(Repository::new(pool)))
        }
    }
}
