#[cfg(feature = "postgres")]
pub use super::types::Serial;

pub use sqlx::FromRow;

pub use super::db::{
    model::Model,
    pagination::{Page, PageError, Paginator},
    query::{
        condition::{And, Kwargs, Or},
        queryset::QuerySet,
    },
};
pub use super::kwargs;
pub use super::{types::*, Connection, Database, MigrationRegistrar};
pub use async_trait::async_trait;
pub use bookshelf_orm_derive::Model;
pub use inventory;
