//! The public catalog page: `GET /?filter_by&q&year&per_page&page`.

use bookshelf_orm::prelude::*;
use rocket::response::content::RawHtml;
use rocket::{Route, State};
use serde::Serialize;

use crate::{error::AppError, models::Book, templates::Templates, Settings};

/// Page size used when `per_page` is missing or not a positive integer.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Field the free-text search applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterBy {
    Author,
    Title,
    Year,
}

impl FilterBy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "author" => Some(FilterBy::Author),
            "title" => Some(FilterBy::Title),
            "year" => Some(FilterBy::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, FromForm)]
pub struct CatalogParams {
    pub filter_by: Option<String>,
    pub q: Option<String>,
    pub year: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
}

impl CatalogParams {
    pub fn filter_by(&self) -> &str {
        self.filter_by.as_deref().unwrap_or("author")
    }

    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }

    pub fn year(&self) -> &str {
        self.year.as_deref().unwrap_or_default()
    }
}

pub fn parse_per_page(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|per_page| *per_page > 0)
        .unwrap_or(DEFAULT_PER_PAGE)
}

/// All books ordered by title, narrowed by at most one predicate.
pub fn book_queryset(filter_by: &str, query: &str, year: &str) -> Result<QuerySet<Book>, AppError> {
    let books = Book::objects().order_by(&["title", "id"]);

    let books = match FilterBy::parse(filter_by) {
        Some(FilterBy::Author) if !query.is_empty() => books.filter(kwargs!(author icontains query)),
        Some(FilterBy::Title) if !query.is_empty() => books.filter(kwargs!(title icontains query)),
        Some(FilterBy::Year) if !year.is_empty() => {
            // wider than the column so an out-of-range year matches nothing
            let published_year: i64 = year
                .trim()
                .parse()
                .map_err(|_| AppError::InvalidYear(year.to_string()))?;
            books.filter(kwargs!(published_year = published_year))
        }
        _ => books,
    };
    Ok(books)
}

#[derive(Debug, Serialize)]
pub struct PageLink {
    pub number: i64,
    pub current: bool,
}

/// Everything `book_list.html` renders.
#[derive(Debug, Serialize)]
pub struct BookListContext {
    pub page_obj: Page<Book>,
    pub page_links: Vec<PageLink>,
    /// Query string of the current filters without `page`, already encoded.
    pub page_query: String,
    pub filter_by: String,
    pub query: String,
    pub year: String,
    pub per_page: i64,
    pub per_page_choices: Vec<i64>,
    pub year_choices: Vec<Integer>,
    pub author_list: Vec<String>,
    pub title_list: Vec<String>,
}

pub async fn book_list_context(
    params: &CatalogParams,
    settings: &Settings,
    conn: &Connection,
) -> Result<BookListContext, AppError> {
    let filter_by = params.filter_by();
    let query = params.query();
    let year = params.year();
    let per_page = parse_per_page(params.per_page.as_deref());

    let books = book_queryset(filter_by, query, year)?;
    let paginator = Paginator::new(books, per_page);
    let page_obj = paginator.get_page(params.page.as_deref(), conn).await?;

    tracing::debug!(
        filter_by,
        query,
        year,
        per_page,
        page = page_obj.number,
        count = page_obj.count,
        "book list"
    );

    let page_links = page_obj
        .page_range()
        .map(|number| PageLink {
            number,
            current: number == page_obj.number,
        })
        .collect();

    let page_query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("filter_by", filter_by)
        .append_pair("q", query)
        .append_pair("year", year)
        .append_pair("per_page", &per_page.to_string())
        .finish();

    Ok(BookListContext {
        page_obj,
        page_links,
        page_query,
        filter_by: filter_by.to_string(),
        query: query.to_string(),
        year: year.to_string(),
        per_page,
        per_page_choices: settings.per_page_choices.clone(),
        year_choices: Book::objects().distinct_values("published_year", conn).await?,
        author_list: Book::objects().distinct_values("author", conn).await?,
        title_list: Book::objects().distinct_values("title", conn).await?,
    })
}

#[get("/?<params..>")]
pub async fn book_list(
    params: CatalogParams,
    database: &State<Database>,
    settings: &State<Settings>,
    templates: &State<Templates>,
) -> Result<RawHtml<String>, AppError> {
    let context = book_list_context(&params, settings, &database.conn).await?;
    templates.render("book_list.html", &context)
}

pub fn routes() -> Vec<Route> {
    routes![book_list]
}
