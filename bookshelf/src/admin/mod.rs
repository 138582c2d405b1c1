//! Generic admin scaffolding: a site header, per-model list/search/filter
//! options and the change list built from them.
//!
//! A model is exposed by implementing [`ModelAdmin`]. The change list reads
//! `q` (search), `p` (page), `all` (show every row) and one exact filter per
//! field named in [`ModelAdmin::LIST_FILTER`]; any other parameter is ignored.

mod book;
mod routes;

use std::collections::HashMap;

use bookshelf_orm::prelude::*;
use bookshelf_orm::sqlx::any::AnyRow;
use serde::Serialize;

use crate::{error::AppError, Settings};

pub use book::{BookAdmin, BookForm, FieldError};
pub use routes::routes;

pub const SEARCH_VAR: &str = "q";
pub const PAGE_VAR: &str = "p";
pub const ALL_VAR: &str = "all";

#[derive(Debug, Clone, Serialize)]
pub struct AdminSite {
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
}

impl From<&Settings> for AdminSite {
    fn from(settings: &Settings) -> Self {
        Self {
            site_header: settings.site_header.clone(),
            site_title: settings.site_title.clone(),
            index_title: settings.index_title.clone(),
        }
    }
}

/// List, search and filter options of one model in the admin panel.
pub trait ModelAdmin {
    type Model: Model + Serialize + Unpin + Send + for<'r> FromRow<'r, AnyRow>;

    /// URL segment, `/admin/<slug>`.
    const SLUG: &'static str;
    const VERBOSE_NAME: &'static str;
    const VERBOSE_NAME_PLURAL: &'static str;

    const LIST_DISPLAY: &'static [&'static str];
    const LIST_FILTER: &'static [&'static str] = &[];
    const SEARCH_FIELDS: &'static [&'static str] = &[];
    const LIST_PER_PAGE: i64 = 100;
    const LIST_MAX_SHOW_ALL: i64 = 200;
    const ORDERING: &'static [&'static str] = &[];
}

/// Splits a search string into terms. Double quotes keep a phrase together.
pub fn search_terms(raw: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in raw.chars() {
        match c {
            '"' => {
                if quoted && !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
                quoted = !quoted;
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        terms.push(current);
    }
    terms
}

/// Change list parameters that survived validation against the model admin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeListQuery {
    pub search: String,
    /// `(field, value)` pairs in `LIST_FILTER` order.
    pub filters: Vec<(String, String)>,
    pub page: Option<String>,
    pub show_all: bool,
}

impl ChangeListQuery {
    pub fn from_params<A: ModelAdmin>(params: &HashMap<String, String>) -> Self {
        let filters = A::LIST_FILTER
            .iter()
            .filter_map(|field| {
                params
                    .get(*field)
                    .filter(|value| !value.is_empty())
                    .map(|value| (field.to_string(), value.clone()))
            })
            .collect();
        Self {
            search: params.get(SEARCH_VAR).cloned().unwrap_or_default(),
            filters,
            page: params.get(PAGE_VAR).cloned(),
            show_all: params.contains_key(ALL_VAR),
        }
    }

    fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.search.is_empty() {
            pairs.push((SEARCH_VAR.to_string(), self.search.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }

    /// Encoded query string of the current state with some keys replaced
    /// (`Some`) or removed (`None`). `p` and `all` are always dropped
    /// unless given again.
    pub fn query_string(&self, overrides: &[(&str, Option<&str>)]) -> String {
        let mut pairs = self.pairs();
        for (key, value) in overrides {
            pairs.retain(|(k, _)| k != key);
            if let Some(value) = value {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        format!("?{encoded}")
    }

    pub fn queryset<A: ModelAdmin>(&self) -> QuerySet<A::Model> {
        let mut ordering: Vec<&str> = A::ORDERING.to_vec();
        let pk = <A::Model as Model>::PK;
        if !ordering.iter().any(|f| f.trim_start_matches('-') == pk) {
            ordering.push(pk);
        }
        let mut queryset = <A::Model as Model>::objects().order_by(&ordering);

        for (field, value) in &self.filters {
            queryset = queryset.filter(Kwargs::label_eq(field, value.as_str()));
        }

        for term in search_terms(&self.search) {
            let any_field = A::SEARCH_FIELDS
                .iter()
                .fold(Vec::<Kwargs>::new(), |acc, field| acc.or(Kwargs::contains(*field, term.as_str())));
            queryset = queryset.filter(any_field);
        }
        queryset
    }
}

#[derive(Debug, Serialize)]
pub struct FilterChoice {
    pub label: String,
    pub selected: bool,
    pub query_string: String,
}

#[derive(Debug, Serialize)]
pub struct ListFilter {
    pub field: String,
    pub title: String,
    pub all_selected: bool,
    pub all_query_string: String,
    pub choices: Vec<FilterChoice>,
}

#[derive(Debug, Serialize)]
pub struct ChangeListRow {
    pub pk: serde_json::Value,
    pub cells: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PageLink {
    pub number: i64,
    pub current: bool,
    pub query_string: String,
}

/// Everything `admin/change_list.html` renders, apart from the site.
#[derive(Debug, Serialize)]
pub struct ChangeList {
    pub slug: &'static str,
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
    pub columns: Vec<String>,
    pub rows: Vec<ChangeListRow>,
    pub search: String,
    pub has_search: bool,
    pub filters: Vec<ListFilter>,
    pub result_count: i64,
    pub full_result_count: i64,
    pub show_all: bool,
    pub can_show_all: bool,
    pub multi_page: bool,
    pub page_number: i64,
    pub num_pages: i64,
    pub page_links: Vec<PageLink>,
    pub show_all_query_string: String,
    pub clear_query_string: String,
}

pub fn column_title(field: &str) -> String {
    let label = field.replace('_', " ");
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => label,
    }
}

fn cell_text(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "-".to_string(),
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn to_row<M: Model + Serialize>(object: &M, columns: &[&str]) -> Result<ChangeListRow, AppError> {
    let value = serde_json::to_value(object)?;
    Ok(ChangeListRow {
        pk: value.get(M::PK).cloned().unwrap_or_default(),
        cells: columns
            .iter()
            .map(|column| cell_text(value.get(*column)))
            .collect(),
    })
}

impl ChangeList {
    pub async fn build<A: ModelAdmin>(
        query: &ChangeListQuery,
        conn: &Connection,
    ) -> Result<Self, AppError> {
        let queryset = query.queryset::<A>();

        let full_result_count = <A::Model as Model>::count(conn).await?;
        let result_count = queryset.count(conn).await?;
        let can_show_all = result_count <= A::LIST_MAX_SHOW_ALL;
        let multi_page = result_count > A::LIST_PER_PAGE;
        let show_all = query.show_all && can_show_all;

        let per_page = if show_all || !multi_page {
            result_count.max(1)
        } else {
            A::LIST_PER_PAGE
        };
        let paginator = Paginator::new(queryset, per_page);
        let page = paginator.get_page(query.page.as_deref(), conn).await?;

        tracing::debug!(
            model = A::SLUG,
            result_count,
            full_result_count,
            show_all,
            page = page.number,
            "change list"
        );

        let rows = page
            .object_list
            .iter()
            .map(|object| to_row(object, A::LIST_DISPLAY))
            .collect::<Result<Vec<_>, _>>()?;

        let mut filters = Vec::new();
        for field in A::LIST_FILTER {
            let selected = query
                .filters
                .iter()
                .find(|(f, _)| f == field)
                .map(|(_, value)| value.as_str());
            let labels = <A::Model as Model>::objects()
                .distinct_labels(field, conn)
                .await?;
            let choices = labels
                .into_iter()
                .map(|label| FilterChoice {
                    selected: selected == Some(label.as_str()),
                    query_string: query.query_string(&[(*field, Some(label.as_str()))]),
                    label,
                })
                .collect();
            filters.push(ListFilter {
                field: field.to_string(),
                title: column_title(field),
                all_selected: selected.is_none(),
                all_query_string: query.query_string(&[(*field, None)]),
                choices,
            });
        }

        let page_links = if show_all || !multi_page {
            Vec::new()
        } else {
            page.page_range()
                .map(|number| PageLink {
                    number,
                    current: number == page.number,
                    query_string: query.query_string(&[(PAGE_VAR, Some(number.to_string().as_str()))]),
                })
                .collect()
        };

        Ok(Self {
            slug: A::SLUG,
            verbose_name: A::VERBOSE_NAME,
            verbose_name_plural: A::VERBOSE_NAME_PLURAL,
            columns: A::LIST_DISPLAY.iter().map(|f| column_title(f)).collect(),
            rows,
            search: query.search.clone(),
            has_search: !query.search.is_empty(),
            filters,
            result_count,
            full_result_count,
            show_all,
            can_show_all,
            multi_page,
            page_number: page.number,
            num_pages: page.num_pages,
            page_links,
            show_all_query_string: query.query_string(&[(ALL_VAR, Some(""))]),
            clear_query_string: query.query_string(&[(SEARCH_VAR, None)]),
        })
    }
}
