use std::collections::{BTreeMap, HashMap};

use bookshelf_orm::prelude::*;
use rocket::form::Form;
use rocket::request::FlashMessage;
use rocket::response::{content::RawHtml, Flash, Redirect};
use rocket::{Either, Route, State};
use serde::Serialize;

use super::{AdminSite, BookAdmin, BookForm, ChangeList, ChangeListQuery, FieldError, ModelAdmin};
use crate::{error::AppError, models::Book, templates::Templates};

type FormResponse = Either<Flash<Redirect>, RawHtml<String>>;

#[derive(Debug, Serialize)]
struct Message {
    level: String,
    text: String,
}

impl From<FlashMessage<'_>> for Message {
    fn from(flash: FlashMessage<'_>) -> Self {
        Self {
            level: flash.kind().to_string(),
            text: flash.message().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ModelEntry {
    slug: &'static str,
    verbose_name: &'static str,
    verbose_name_plural: &'static str,
    count: i64,
}

#[derive(Debug, Serialize)]
struct IndexContext<'a> {
    site: &'a AdminSite,
    models: Vec<ModelEntry>,
}

#[derive(Debug, Serialize)]
struct ChangeListContext<'a> {
    site: &'a AdminSite,
    messages: Vec<Message>,
    cl: ChangeList,
}

#[derive(Debug, Serialize)]
struct ChangeFormContext<'a> {
    site: &'a AdminSite,
    slug: &'static str,
    verbose_name: &'static str,
    verbose_name_plural: &'static str,
    /// `None` while adding.
    object_id: Option<i32>,
    title: String,
    form: BookForm,
    errors: BTreeMap<&'static str, Vec<String>>,
}

#[derive(Debug, Serialize)]
struct DeleteContext<'a> {
    site: &'a AdminSite,
    slug: &'static str,
    verbose_name: &'static str,
    verbose_name_plural: &'static str,
    object: Book,
}

fn changelist_url() -> String {
    format!("/admin/{}", BookAdmin::SLUG)
}

fn change_form<'a>(
    site: &'a AdminSite,
    object_id: Option<i32>,
    form: BookForm,
    errors: Vec<FieldError>,
) -> ChangeFormContext<'a> {
    let title = match object_id {
        Some(_) => format!("Change {}", BookAdmin::VERBOSE_NAME),
        None => format!("Add {}", BookAdmin::VERBOSE_NAME),
    };
    let mut by_field: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    for error in errors {
        by_field.entry(error.field).or_default().push(error.message);
    }
    ChangeFormContext {
        site,
        slug: BookAdmin::SLUG,
        verbose_name: BookAdmin::VERBOSE_NAME,
        verbose_name_plural: BookAdmin::VERBOSE_NAME_PLURAL,
        object_id,
        title,
        form,
        errors: by_field,
    }
}

async fn get_book(id: i32, conn: &Connection) -> Result<Book, AppError> {
    Book::get(kwargs!(id = id), conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("book with id {id}")))
}

#[get("/")]
async fn index(
    database: &State<Database>,
    site: &State<AdminSite>,
    templates: &State<Templates>,
) -> Result<RawHtml<String>, AppError> {
    let models = vec![ModelEntry {
        slug: BookAdmin::SLUG,
        verbose_name: BookAdmin::VERBOSE_NAME,
        verbose_name_plural: BookAdmin::VERBOSE_NAME_PLURAL,
        count: Book::count(&database.conn).await?,
    }];
    templates.render("admin/index.html", &IndexContext { site, models })
}

#[get("/book?<params..>")]
async fn changelist(
    params: HashMap<String, String>,
    flash: Option<FlashMessage<'_>>,
    database: &State<Database>,
    site: &State<AdminSite>,
    templates: &State<Templates>,
) -> Result<RawHtml<String>, AppError> {
    let query = ChangeListQuery::from_params::<BookAdmin>(&params);
    let cl = ChangeList::build::<BookAdmin>(&query, &database.conn).await?;
    let context = ChangeListContext {
        site,
        messages: flash.into_iter().map(Message::from).collect(),
        cl,
    };
    templates.render("admin/change_list.html", &context)
}

#[get("/book/add")]
async fn add_form(
    site: &State<AdminSite>,
    templates: &State<Templates>,
) -> Result<RawHtml<String>, AppError> {
    let context = change_form(site, None, BookForm::default(), Vec::new());
    templates.render("admin/change_form.html", &context)
}

#[post("/book/add", data = "<form>")]
async fn add(
    form: Form<BookForm>,
    database: &State<Database>,
    site: &State<AdminSite>,
    templates: &State<Templates>,
) -> Result<FormResponse, AppError> {
    let form = form.into_inner();
    let book = match form.validate(None) {
        Ok(book) => book,
        Err(errors) => {
            let context = change_form(site, None, form, errors);
            return Ok(Either::Right(templates.render("admin/change_form.html", &context)?));
        }
    };

    book.save(&database.conn).await?;
    tracing::info!(title = %book.title, author = %book.author, "book added");
    Ok(Either::Left(Flash::success(
        Redirect::to(changelist_url()),
        format!("The book “{book}” was added successfully."),
    )))
}

#[get("/book/<id>/change")]
async fn change_form_page(
    id: i32,
    database: &State<Database>,
    site: &State<AdminSite>,
    templates: &State<Templates>,
) -> Result<RawHtml<String>, AppError> {
    let book = get_book(id, &database.conn).await?;
    let context = change_form(site, Some(id), BookForm::from_book(&book), Vec::new());
    templates.render("admin/change_form.html", &context)
}

#[post("/book/<id>/change", data = "<form>")]
async fn change(
    id: i32,
    form: Form<BookForm>,
    database: &State<Database>,
    site: &State<AdminSite>,
    templates: &State<Templates>,
) -> Result<FormResponse, AppError> {
    get_book(id, &database.conn).await?;

    let form = form.into_inner();
    let book = match form.validate(Some(id)) {
        Ok(book) => book,
        Err(errors) => {
            let context = change_form(site, Some(id), form, errors);
            return Ok(Either::Right(templates.render("admin/change_form.html", &context)?));
        }
    };

    book.update(&database.conn).await?;
    tracing::info!(id, title = %book.title, "book changed");
    Ok(Either::Left(Flash::success(
        Redirect::to(changelist_url()),
        format!("The book “{book}” was changed successfully."),
    )))
}

#[get("/book/<id>/delete")]
async fn delete_confirmation(
    id: i32,
    database: &State<Database>,
    site: &State<AdminSite>,
    templates: &State<Templates>,
) -> Result<RawHtml<String>, AppError> {
    let object = get_book(id, &database.conn).await?;
    let context = DeleteContext {
        site,
        slug: BookAdmin::SLUG,
        verbose_name: BookAdmin::VERBOSE_NAME,
        verbose_name_plural: BookAdmin::VERBOSE_NAME_PLURAL,
        object,
    };
    templates.render("admin/delete_confirmation.html", &context)
}

#[post("/book/<id>/delete")]
async fn delete(id: i32, database: &State<Database>) -> Result<Flash<Redirect>, AppError> {
    let book = get_book(id, &database.conn).await?;
    book.delete(&database.conn).await?;
    tracing::info!(id, title = %book.title, "book deleted");
    Ok(Flash::success(
        Redirect::to(changelist_url()),
        format!("The book “{book}” was deleted successfully."),
    ))
}

pub fn routes() -> Vec<Route> {
    routes![
        index,
        changelist,
        add_form,
        add,
        change_form_page,
        change,
        delete_confirmation,
        delete
    ]
}
