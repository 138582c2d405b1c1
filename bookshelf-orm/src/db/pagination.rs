//! Splits a [`QuerySet`] into numbered pages.
//!
//! Pages are 1-based. An empty selection still has one (empty) page so a
//! listing can always render page 1.

use serde::Serialize;
use sqlx::{any::AnyRow, FromRow};

use super::{model::Model, query::queryset::QuerySet, Connection};
use crate::Error;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("page number {0:?} is not an integer")]
    NotAnInteger(String),
    #[error("page number {0} is less than 1")]
    LessThanOne(i64),
    #[error("page {number} contains no results, last page is {num_pages}")]
    OutOfRange { number: i64, num_pages: i64 },
    #[error("{0}")]
    Database(Error),
}

impl From<Error> for PageError {
    fn from(err: Error) -> Self {
        PageError::Database(err)
    }
}

/// One window of a paginated selection.
#[derive(Debug, Clone, Serialize)]
pub struct Page<M> {
    pub object_list: Vec<M>,
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<i64>,
    pub previous_page_number: Option<i64>,
    /// 1-based index of the first object on the page, 0 when there is none.
    pub start_index: i64,
    /// 1-based index of the last object on the page, 0 when there is none.
    pub end_index: i64,
}

impl<M> Page<M> {
    fn new(object_list: Vec<M>, number: i64, counts: Counts) -> Self {
        let Counts {
            count,
            num_pages,
            per_page,
        } = counts;
        let has_next = number < num_pages;
        let has_previous = number > 1;
        let start_index = if count == 0 {
            0
        } else {
            per_page.saturating_mul(number - 1).saturating_add(1)
        };
        let end_index = if number == num_pages {
            count
        } else {
            number.saturating_mul(per_page)
        };
        Self {
            object_list,
            number,
            num_pages,
            count,
            per_page,
            has_next,
            has_previous,
            next_page_number: has_next.then_some(number + 1),
            previous_page_number: has_previous.then_some(number - 1),
            start_index,
            end_index,
        }
    }

    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    /// Every page number, `1..=num_pages`.
    pub fn page_range(&self) -> std::ops::RangeInclusive<i64> {
        1..=self.num_pages
    }
}

#[derive(Debug, Clone, Copy)]
struct Counts {
    count: i64,
    num_pages: i64,
    per_page: i64,
}

pub struct Paginator<M> {
    queryset: QuerySet<M>,
    per_page: i64,
    orphans: i64,
}

impl<M: Model> Paginator<M> {
    /// `per_page` below 1 is raised to 1.
    pub fn new(queryset: QuerySet<M>, per_page: i64) -> Self {
        Self {
            queryset,
            per_page: per_page.max(1),
            orphans: 0,
        }
    }

    /// Lets the last page absorb up to `orphans` extra objects instead of
    /// leaving them alone on a page of their own.
    pub fn with_orphans(mut self, orphans: i64) -> Self {
        self.orphans = orphans.max(0);
        self
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub async fn count(&self, conn: &Connection) -> Result<i64, Error> {
        self.queryset.count(conn).await
    }

    pub fn num_pages(&self, count: i64) -> i64 {
        let hits = (count - self.orphans).max(1);
        (hits - 1) / self.per_page + 1
    }

    /// Parses and bounds-checks a raw page number.
    pub fn validate_number(&self, raw: &str, count: i64) -> Result<i64, PageError> {
        let number = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| PageError::NotAnInteger(raw.to_string()))?;
        if number < 1 {
            return Err(PageError::LessThanOne(number));
        }
        let num_pages = self.num_pages(count);
        if number > num_pages {
            return Err(PageError::OutOfRange { number, num_pages });
        }
        Ok(number)
    }

    /// Resolves a page number leniently: a missing or non-integer number
    /// gives the first page, one out of range gives the last page.
    pub fn resolve_number(&self, raw: Option<&str>, count: i64) -> i64 {
        let Some(raw) = raw else {
            return 1;
        };
        match self.validate_number(raw, count) {
            Ok(number) => number,
            Err(PageError::NotAnInteger(_)) => 1,
            Err(_) => self.num_pages(count),
        }
    }

    /// Strict lookup: fails when `number` is not a valid page.
    pub async fn page(&self, number: i64, conn: &Connection) -> Result<Page<M>, PageError>
    where
        M: Unpin + Send + for<'r> FromRow<'r, AnyRow>,
    {
        let count = self.count(conn).await?;
        let number = self.validate_number(&number.to_string(), count)?;
        Ok(self.load(number, count, conn).await?)
    }

    /// Lenient lookup, see [`Paginator::resolve_number`].
    pub async fn get_page(&self, raw: Option<&str>, conn: &Connection) -> Result<Page<M>, Error>
    where
        M: Unpin + Send + for<'r> FromRow<'r, AnyRow>,
    {
        let count = self.count(conn).await?;
        let number = self.resolve_number(raw, count);
        self.load(number, count, conn).await
    }

    async fn load(&self, number: i64, count: i64, conn: &Connection) -> Result<Page<M>, Error>
    where
        M: Unpin + Send + for<'r> FromRow<'r, AnyRow>,
    {
        let bottom = (number - 1) * self.per_page;
        let mut top = bottom.saturating_add(self.per_page);
        if top.saturating_add(self.orphans) >= count {
            top = count;
        }
        let object_list = self.queryset.slice(bottom, top - bottom, conn).await?;
        tracing::debug!(number, count, rows = object_list.len(), "page loaded");

        let counts = Counts {
            count,
            num_pages: self.num_pages(count),
            per_page: self.per_page,
        };
        Ok(Page::new(object_list, number, counts))
    }
}
