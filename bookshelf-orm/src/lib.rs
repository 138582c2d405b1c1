/// This module contains the macros used in the crate.
#[macro_use]
mod macros;

/// This module contains the database-related functionality.
pub mod db;

/// This module contains the prelude for the crate.
pub mod prelude;

/// This module contains the custom types used in the crate.
pub mod types;

pub mod utils;

pub use db::PLACEHOLDER;

pub use async_trait;
pub use inventory;
pub use sqlx;

use std::{future::Future, pin::Pin};

pub type Connection = sqlx::Pool<sqlx::Any>;

const MAX_CONNECTIONS: u32 = 5;

/// Represents a database.
#[derive(Clone)]
pub struct Database {
    pub conn: Connection,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, Error> {
        sqlx::any::install_default_drivers();
        let conn = sqlx::any::AnyPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        tracing::debug!(max_connections = MAX_CONNECTIONS, "database pool opened");
        Ok(Self { conn })
    }

    /// Creates the table of every registered model that does not exist yet.
    pub async fn migrate(&self) -> Result<(), Error> {
        for model in inventory::iter::<MigrationRegistrar> {
            tracing::debug!(table = model.name, "migrating");
            (model.migrate_fn)(&self.conn).await?;
        }
        Ok(())
    }

    /// Drops and recreates the table of every registered model.
    pub async fn reset(&self) -> Result<(), Error> {
        for model in inventory::iter::<MigrationRegistrar> {
            tracing::warn!(table = model.name, "dropping table");
            (model.reset_fn)(&self.conn).await?;
        }
        Ok(())
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub type FutRes<'fut, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'fut>>;

type MigrateFn = for<'m> fn(&'m Connection) -> FutRes<'m, (), Error>;

pub struct MigrationRegistrar {
    pub name: &'static str,
    pub migrate_fn: MigrateFn,
    pub reset_fn: MigrateFn,
}

inventory::collect!(MigrationRegistrar);
