use serde::Serialize;

use super::ModelAdmin;
use crate::models::{Book, AUTHOR_MAX_LENGTH, TITLE_MAX_LENGTH};

pub struct BookAdmin;

impl ModelAdmin for BookAdmin {
    type Model = Book;

    const SLUG: &'static str = "book";
    const VERBOSE_NAME: &'static str = "book";
    const VERBOSE_NAME_PLURAL: &'static str = "books";

    const LIST_DISPLAY: &'static [&'static str] = &["title", "author", "published_year"];
    const LIST_FILTER: &'static [&'static str] = &["author", "title", "published_year"];
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "author"];
    const LIST_PER_PAGE: i64 = 10;
    const LIST_MAX_SHOW_ALL: i64 = 200;
    const ORDERING: &'static [&'static str] = &["title"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Add/change form of a book, exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromForm)]
pub struct BookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_year: Option<String>,
}

fn required_text(
    raw: Option<&str>,
    field: &'static str,
    max_length: usize,
    errors: &mut Vec<FieldError>,
) -> String {
    let value = raw.unwrap_or_default().trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, "This field is required."));
    } else if value.chars().count() > max_length {
        errors.push(FieldError::new(
            field,
            format!(
                "Ensure this value has at most {max_length} characters (it has {}).",
                value.chars().count()
            ),
        ));
    }
    value.to_string()
}

impl BookForm {
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: Some(book.title.clone()),
            author: Some(book.author.clone()),
            published_year: Some(book.published_year.to_string()),
        }
    }

    /// Checks the submission and builds the book it describes, keeping `id`.
    pub fn validate(&self, id: Option<i32>) -> Result<Book, Vec<FieldError>> {
        let mut errors = Vec::new();
        let title = required_text(self.title.as_deref(), "title", TITLE_MAX_LENGTH, &mut errors);
        let author = required_text(self.author.as_deref(), "author", AUTHOR_MAX_LENGTH, &mut errors);

        let year = self.published_year.as_deref().unwrap_or_default().trim();
        let published_year = if year.is_empty() {
            errors.push(FieldError::new("published_year", "This field is required."));
            0
        } else {
            year.parse::<i32>().unwrap_or_else(|_| {
                errors.push(FieldError::new("published_year", "Enter a whole number."));
                0
            })
        };

        if errors.is_empty() {
            Ok(Book {
                id,
                title,
                author,
                published_year,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, author: &str, year: &str) -> BookForm {
        BookForm {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            published_year: Some(year.to_string()),
        }
    }

    #[test]
    fn valid_form_builds_a_book() {
        let book = form("  Dune ", "Frank Herbert", "1965").validate(Some(3)).unwrap();
        assert_eq!(book.id, Some(3));
        assert_eq!(book.title, "Dune");
        assert_eq!(book.published_year, 1965);
    }

    #[test]
    fn every_problem_is_reported() {
        let errors = BookForm::default().validate(None).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["title", "author", "published_year"]);

        let errors = form(&"x".repeat(201), "Herbert", "sixties")
            .validate(None)
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("at most 200"));
        assert_eq!(errors[1].message, "Enter a whole number.");
    }

    #[test]
    fn round_trips_an_existing_book() {
        let book = Book {
            id: Some(1),
            title: "Kindred".to_string(),
            author: "Octavia E. Butler".to_string(),
            published_year: 1979,
        };
        assert_eq!(BookForm::from_book(&book).validate(book.id).unwrap(), book);
    }
}
