//! Model operations: schema, inserts, updates, deletes and simple lookups.
//!
//! Anything more involved than a flat filter goes through [`QuerySet`],
//! which `Model::objects` hands out.

use serde::Serialize;
use sqlx::{any::AnyRow, FromRow, Row};

use super::query::{builder, condition::Kwargs, queryset::QuerySet, Arg};
use super::{Connection, PLACEHOLDER};
use crate::{utils, Error};

fn insert_statement(name: &str, kw: Vec<Kwargs>) -> (String, Vec<Arg>) {
    let insert_query = builder::to_insert_query(kw);
    let query = format!(
        "insert into {name} ({fields}) values ({placeholders});",
        fields = insert_query.fields,
        placeholders = insert_query.placeholders,
    );
    (query, insert_query.args)
}

fn log_schema(sql: &str) {
    if tracing::enabled!(tracing::Level::DEBUG) {
        let formatted_sql = sqlformat::format(
            sql,
            &sqlformat::QueryParams::None,
            &sqlformat::FormatOptions::default(),
        );
        tracing::debug!("\n{formatted_sql}");
    }
}

/// Trait for database model operations.
#[async_trait::async_trait]
pub trait Model {
    /// `create table if not exists` statement of the model
    const UP: &'static str;
    /// `drop table if exists` statement of the model
    const DOWN: &'static str;
    /// The table name of the model
    const NAME: &'static str;
    /// The primary key column of the model
    const PK: &'static str;

    /// Creates the model table if it does not exist yet.
    ///
    /// # Example
    /// ```ignore
    /// Book::migrate(&conn).await?;
    /// ```
    fn migrate(conn: &'_ Connection) -> crate::FutRes<'_, (), Error>
    where
        Self: Sized,
    {
        Box::pin(async move {
            log_schema(Self::UP);
            sqlx::query(Self::UP).execute(conn).await?;
            Ok(())
        })
    }

    /// Drops the model table, then creates it again. Every row is lost.
    fn reset(conn: &'_ Connection) -> crate::FutRes<'_, (), Error>
    where
        Self: Sized,
    {
        Box::pin(async move {
            sqlx::query(Self::DOWN).execute(conn).await?;
            log_schema(Self::UP);
            sqlx::query(Self::UP).execute(conn).await?;
            Ok(())
        })
    }

    /// Saves the current model instance to the database as a new row.
    ///
    /// # Example
    /// ```ignore
    /// let book = Book {
    ///     title: "The Dispossessed".to_string(),
    ///     author: "Ursula K. Le Guin".to_string(),
    ///     published_year: 1974,
    ///     ..Default::default()
    /// };
    /// book.save(&conn).await?;
    /// ```
    async fn save(&self, conn: &Connection) -> Result<(), Error>
    where
        Self: Sized;

    /// Insert arguments of the instance: every field but a generated key.
    fn create_kwargs(&self) -> Vec<Kwargs>;

    /// Creates a new row from keyword arguments.
    ///
    /// # Example
    /// ```ignore
    /// Book::create(
    ///     kwargs!(title = "Dune", author = "Frank Herbert", published_year = 1965),
    ///     &conn,
    /// )
    /// .await?;
    /// ```
    async fn create(kw: Vec<Kwargs>, conn: &Connection) -> Result<(), Error>
    where
        Self: Sized,
    {
        let (query, args) = insert_statement(Self::NAME, kw);

        let mut stream = sqlx::query(&query);
        binds!(args, stream);
        stream.execute(conn).await?;
        Ok(())
    }

    /// Inserts every instance inside one transaction: either all rows are
    /// written or none is.
    ///
    /// # Example
    /// ```ignore
    /// Book::bulk_create(&books, &conn).await?;
    /// ```
    async fn bulk_create(objects: &[Self], conn: &Connection) -> Result<(), Error>
    where
        Self: Sized + Sync,
    {
        let mut tx = conn.begin().await?;
        for object in objects {
            let (query, args) = insert_statement(Self::NAME, object.create_kwargs());
            let mut stream = sqlx::query(&query);
            binds!(args, stream);
            stream.execute(&mut *tx).await?;
        }
        tx.commit().await?;
        tracing::debug!(table = Self::NAME, rows = objects.len(), "bulk insert committed");
        Ok(())
    }

    /// Writes every non primary key field of the instance back to its row.
    async fn update(&self, conn: &Connection) -> Result<(), Error>
    where
        Self: Sized;

    /// Updates the row identified by `id_value` with the given arguments.
    ///
    /// # Example
    /// ```ignore
    /// Book::set(book_id, kwargs!(published_year = 1966), &conn).await?;
    /// ```
    async fn set<T: Serialize + Send + Sync>(
        id_value: T,
        kw: Vec<Kwargs>,
        conn: &Connection,
    ) -> Result<(), Error> {
        let mut update_query = builder::to_update_query(kw);

        update_query.args.push(Arg {
            value: utils::to_value(&id_value),
        });

        let index_id = update_query.args.len();
        let query = format!(
            "update {name} set {placeholders} where {id}={PLACEHOLDER}{index_id};",
            id = Self::PK,
            name = Self::NAME,
            placeholders = update_query.placeholders,
        );

        let mut stream = sqlx::query(&query);
        binds!(update_query.args, stream);
        stream.execute(conn).await?;
        Ok(())
    }

    /// Deletes the current model instance from the database.
    async fn delete(&self, conn: &Connection) -> Result<(), Error>
    where
        Self: Sized;

    /// Starts a lazily evaluated selection over the whole table.
    ///
    /// # Example
    /// ```ignore
    /// let books = Book::objects()
    ///     .filter(kwargs!(author icontains "le guin"))
    ///     .order_by(&["title"])
    ///     .fetch(&conn)
    ///     .await?;
    /// ```
    fn objects() -> QuerySet<Self>
    where
        Self: Sized,
    {
        QuerySet::new()
    }

    /// Retrieves all instances of the model from the database.
    async fn all(conn: &Connection) -> Result<Vec<Self>, Error>
    where
        Self: Sized + Unpin + Send + for<'r> FromRow<'r, AnyRow>,
    {
        Self::objects().fetch(conn).await
    }

    /// Filters instances of the model based on the provided parameters.
    ///
    /// # Example
    /// ```ignore
    /// let old = Book::filter(kwargs!(published_year < 1950), &conn).await?;
    /// ```
    async fn filter(kw: Vec<Kwargs>, conn: &Connection) -> Result<Vec<Self>, Error>
    where
        Self: Sized + Unpin + Send + for<'r> FromRow<'r, AnyRow>,
    {
        Self::objects().filter(kw).fetch(conn).await
    }

    /// Retrieves the first instance of the model matching the filter criteria.
    async fn get(kw: Vec<Kwargs>, conn: &Connection) -> Result<Option<Self>, Error>
    where
        Self: Sized + Unpin + Send + for<'r> FromRow<'r, AnyRow>,
    {
        Ok(Self::filter(kw, conn).await?.into_iter().next())
    }

    /// Counts the number of instances of the model in the database.
    async fn count(conn: &Connection) -> Result<i64, Error>
    where
        Self: Sized,
    {
        let query = format!("select count(*) from {name}", name = Self::NAME);
        Ok(sqlx::query(&query).fetch_one(conn).await?.try_get(0)?)
    }
}
