//! Loads books from a JSON fixture: an array of
//! `{"title": ..., "author": ..., "published_year": ...}` objects.

use std::path::Path;

use bookshelf_orm::prelude::*;
use serde::Deserialize;

use crate::{admin::BookForm, error::AppError, models::Book};

#[derive(Debug, Deserialize)]
struct BookRecord {
    title: String,
    author: String,
    published_year: Integer,
}

/// Parses and checks every entry. Nothing is written if one entry is bad.
pub fn parse(json: &str) -> Result<Vec<Book>, AppError> {
    let records: Vec<BookRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let form = BookForm {
                title: Some(record.title),
                author: Some(record.author),
                published_year: Some(record.published_year.to_string()),
            };
            form.validate(None).map_err(|errors| AppError::Fixture {
                index,
                message: errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("; "),
            })
        })
        .collect()
}

/// Inserts the books of the fixture at `path` in one transaction, returning
/// how many were added.
///
/// With `reset`, the table is dropped and recreated first.
pub async fn load(path: &Path, reset: bool, database: &Database) -> Result<usize, AppError> {
    let books = parse(&std::fs::read_to_string(path)?)?;

    if reset {
        Book::reset(&database.conn).await?;
    }
    Book::bulk_create(&books, &database.conn).await?;

    tracing::info!(path = %path.display(), count = books.len(), reset, "fixture loaded");
    Ok(books.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_fixture() {
        let books = parse(
            r#"[
                {"title": "Dune", "author": "Frank Herbert", "published_year": 1965},
                {"title": "Kindred", "author": "Octavia E. Butler", "published_year": 1979}
            ]"#,
        )
        .unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].author, "Octavia E. Butler");
        assert!(books.iter().all(|b| b.id.is_none()));
    }

    #[test]
    fn rejects_bad_entries() {
        let err = parse(r#"[{"title": "", "author": "Anon", "published_year": 2001}]"#).unwrap_err();
        assert!(matches!(err, AppError::Fixture { index: 0, .. }));

        let err = parse(r#"[{"title": "Dune"}]"#).unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }

    #[test]
    fn bundled_fixture_is_valid() {
        let books = parse(include_str!("../fixtures/books.json")).unwrap();
        assert!(books.len() > 20);
    }
}
