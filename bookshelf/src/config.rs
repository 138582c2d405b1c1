//! Runtime settings.
//!
//! Values come from Rocket's figment (`Rocket.toml`, `ROCKET_*` variables)
//! with `DATABASE_URL` read from the environment or a `.env` file.

use rocket::figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub database_url: String,
    /// Page sizes offered by the catalog page.
    pub per_page_choices: Vec<i64>,
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://bookshelf.db?mode=rwc".to_string(),
            per_page_choices: vec![5, 10, 20],
            site_header: "📘 The Engineer’s Library Admin".to_string(),
            site_title: "Engineer’s Portal".to_string(),
            index_title: "Book Dashboard".to_string(),
        }
    }
}

impl Settings {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(rocket::Config::figment())
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_library() {
        let settings = Settings::default();
        assert_eq!(settings.per_page_choices, [5, 10, 20]);
        assert_eq!(settings.index_title, "Book Dashboard");
    }

    #[test]
    fn figment_overrides_defaults() {
        let settings: Settings = Settings::figment()
            .merge(("database_url", "sqlite::memory:"))
            .merge(("per_page_choices", [25, 50]))
            .extract()
            .unwrap();
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.per_page_choices, [25, 50]);
        assert_eq!(settings.site_title, "Engineer’s Portal");
    }
}
