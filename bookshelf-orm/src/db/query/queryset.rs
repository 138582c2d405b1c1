//! Lazily evaluated selections, in the spirit of Django's `QuerySet`.
//!
//! Column names passed to `order_by`, `distinct_values` and the `Kwargs`
//! fields are spliced into the SQL text as-is. Only pass trusted names,
//! never request input; values always travel as bound arguments.

use std::marker::PhantomData;

use sqlx::{any::AnyRow, Any, Decode, FromRow, Type};

use super::{
    builder,
    condition::{And, Kwargs},
    Query,
};
use crate::db::{model::Model, Connection, TEXT_CAST};
use crate::Error;

pub struct QuerySet<M> {
    filters: Vec<Kwargs>,
    ordering: Vec<String>,
    _model: PhantomData<fn() -> M>,
}

impl<M> Clone for QuerySet<M> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            ordering: self.ordering.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> std::fmt::Debug for QuerySet<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySet")
            .field("filters", &self.filters)
            .field("ordering", &self.ordering)
            .finish()
    }
}

impl<M: Model> Default for QuerySet<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> QuerySet<M> {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            ordering: Vec::new(),
            _model: PhantomData,
        }
    }

    /// Narrows the selection. Successive calls are joined with `and`.
    pub fn filter(mut self, kw: Vec<Kwargs>) -> Self {
        self.filters = std::mem::take(&mut self.filters).and(Kwargs::group(kw));
        self
    }

    /// Replaces the ordering. A leading `-` sorts that column descending.
    pub fn order_by(mut self, fields: &[&str]) -> Self {
        self.ordering = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn filters(&self) -> &[Kwargs] {
        &self.filters
    }

    pub fn ordering(&self) -> &[String] {
        &self.ordering
    }

    fn where_clause(&self) -> Query {
        let mut query = builder::to_select_query(self.filters.clone(), 0);
        if !query.placeholders.is_empty() {
            query.placeholders = format!(" where {}", query.placeholders);
        }
        query
    }

    fn order_clause(&self) -> String {
        if self.ordering.is_empty() {
            return String::new();
        }
        let columns = self
            .ordering
            .iter()
            .map(|field| match field.strip_prefix('-') {
                Some(column) => format!("{column} desc"),
                None => format!("{field} asc"),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(" order by {columns}")
    }

    /// Renders the `select` statement, optionally limited to a window.
    pub fn to_sql(&self, window: Option<(i64, i64)>) -> String {
        let Query { placeholders, .. } = self.where_clause();
        let mut sql = format!(
            "select * from {name}{placeholders}{order}",
            name = M::NAME,
            order = self.order_clause(),
        );
        if let Some((offset, limit)) = window {
            sql.push_str(&format!(" limit {limit} offset {offset}"));
        }
        sql
    }

    async fn fetch_window(&self, window: Option<(i64, i64)>, conn: &Connection) -> Result<Vec<M>, Error>
    where
        M: Unpin + Send + for<'r> FromRow<'r, AnyRow>,
    {
        let Query { args, .. } = self.where_clause();
        let sql = self.to_sql(window);
        tracing::trace!(%sql, "fetch");

        let mut stream = sqlx::query_as::<_, M>(&sql);
        binds!(args, stream);
        Ok(stream.fetch_all(conn).await?)
    }

    /// Evaluates the whole selection.
    pub async fn fetch(&self, conn: &Connection) -> Result<Vec<M>, Error>
    where
        M: Unpin + Send + for<'r> FromRow<'r, AnyRow>,
    {
        self.fetch_window(None, conn).await
    }

    /// Evaluates at most `limit` rows starting after `offset` rows.
    pub async fn slice(&self, offset: i64, limit: i64, conn: &Connection) -> Result<Vec<M>, Error>
    where
        M: Unpin + Send + for<'r> FromRow<'r, AnyRow>,
    {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        self.fetch_window(Some((offset.max(0), limit)), conn).await
    }

    pub async fn first(&self, conn: &Connection) -> Result<Option<M>, Error>
    where
        M: Unpin + Send + for<'r> FromRow<'r, AnyRow>,
    {
        Ok(self.slice(0, 1, conn).await?.into_iter().next())
    }

    /// Number of rows the selection would return. Ordering is ignored.
    pub async fn count(&self, conn: &Connection) -> Result<i64, Error> {
        let Query { placeholders, args, .. } = self.where_clause();
        let sql = format!("select count(*) from {name}{placeholders}", name = M::NAME);
        tracing::trace!(%sql, "count");

        let mut stream = sqlx::query_scalar::<_, i64>(&sql);
        binds!(args, stream);
        Ok(stream.fetch_one(conn).await?)
    }

    /// Distinct values of one column within the selection, in ascending order.
    pub async fn distinct_values<T>(&self, field: &str, conn: &Connection) -> Result<Vec<T>, Error>
    where
        T: for<'r> Decode<'r, Any> + Type<Any> + Send + Unpin,
    {
        let Query { placeholders, args, .. } = self.where_clause();
        let sql = format!(
            "select distinct {field} from {name}{placeholders} order by {field} asc",
            name = M::NAME,
        );
        tracing::trace!(%sql, "distinct values");

        let mut stream = sqlx::query_scalar::<_, T>(&sql);
        binds!(args, stream);
        Ok(stream.fetch_all(conn).await?)
    }

    /// Like [`QuerySet::distinct_values`], rendered as text but still
    /// ordered by the column's own type.
    pub async fn distinct_labels(&self, field: &str, conn: &Connection) -> Result<Vec<String>, Error> {
        let Query { placeholders, args, .. } = self.where_clause();
        let sql = format!(
            "select distinct cast({field} as {TEXT_CAST}), {field} from {name}{placeholders} order by {field} asc",
            name = M::NAME,
        );
        tracing::trace!(%sql, "distinct labels");

        let mut stream = sqlx::query_scalar::<_, String>(&sql);
        binds!(args, stream);
        Ok(stream.fetch_all(conn).await?)
    }
}
