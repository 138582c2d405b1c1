//! Tera templates, compiled into the binary.

use rocket::response::content::RawHtml;
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::AppError;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("book_list.html", include_str!("../templates/book_list.html")),
    ("admin/base.html", include_str!("../templates/admin/base.html")),
    ("admin/index.html", include_str!("../templates/admin/index.html")),
    ("admin/change_list.html", include_str!("../templates/admin/change_list.html")),
    ("admin/change_form.html", include_str!("../templates/admin/change_form.html")),
    (
        "admin/delete_confirmation.html",
        include_str!("../templates/admin/delete_confirmation.html"),
    ),
];

pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        tracing::debug!(count = TEMPLATES.len(), "templates loaded");
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &impl Serialize) -> Result<RawHtml<String>, AppError> {
        let context = Context::from_serialize(context)?;
        Ok(RawHtml(self.tera.render(name, &context)?))
    }
}
