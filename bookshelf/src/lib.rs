//! Bookshelf: a catalog of books with filtering, free-text search and
//! pagination, plus an admin panel over the same table.

#[macro_use]
extern crate rocket;

pub mod admin;
pub mod assets;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod seed;
pub mod templates;

use bookshelf_orm::Database;
use rocket::{figment::Figment, Build, Rocket};

pub use config::Settings;
pub use error::AppError;

/// Assembles the Rocket instance: routes, templates and managed state.
///
/// `figment` carries both Rocket's own configuration and [`Settings`].
pub fn build(figment: Figment, database: Database) -> Result<Rocket<Build>, AppError> {
    let settings: Settings = figment.extract()?;
    let templates = templates::Templates::new()?;
    let site = admin::AdminSite::from(&settings);

    tracing::info!(
        per_page_choices = ?settings.per_page_choices,
        "building bookshelf"
    );

    Ok(rocket::custom(figment)
        .manage(database)
        .manage(settings)
        .manage(templates)
        .manage(site)
        .mount("/", catalog::routes())
        .mount("/admin", admin::routes())
        .mount("/static", assets::routes()))
}
