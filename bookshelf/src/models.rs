use bookshelf_orm::prelude::*;
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_LENGTH: usize = 200;
pub const AUTHOR_MAX_LENGTH: usize = 100;

/// A catalog record.
#[derive(Model, FromRow, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[field(primary_key = true, auto = true)]
    #[serde(default)]
    pub id: Option<Integer>,

    #[field(size = 200)]
    pub title: String,

    #[field(size = 100)]
    pub author: String,

    pub published_year: Integer,
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}
