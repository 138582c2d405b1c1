#![allow(dead_code)]

use bookshelf::{models::Book, Settings};
use bookshelf_orm::prelude::*;
use rocket::local::asynchronous::Client;

pub const BOOKS: &[(&str, &str, i32)] = &[
    ("Dune", "Frank Herbert", 1965),
    ("Children of Dune", "Frank Herbert", 1976),
    ("The Left Hand of Darkness", "Ursula K. Le Guin", 1969),
    ("The Dispossessed", "Ursula K. Le Guin", 1974),
    ("Kindred", "Octavia E. Butler", 1979),
    ("Parable of the Sower", "Octavia E. Butler", 1993),
    ("Neuromancer", "William Gibson", 1984),
    ("Foundation", "Isaac Asimov", 1951),
    ("Hyperion", "Dan Simmons", 1989),
    ("Solaris", "Stanislaw Lem", 1961),
    ("Ubik", "Philip K. Dick", 1969),
    ("Dhalgren", "Samuel R. Delany", 1975),
];

/// Titles of `BOOKS` in catalog order.
pub fn sorted_titles() -> Vec<&'static str> {
    let mut titles: Vec<_> = BOOKS.iter().map(|(title, _, _)| *title).collect();
    titles.sort();
    titles
}

pub async fn setup(name: &str) -> (Client, Database) {
    let database = Database::new(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("failed to init database");
    database.migrate().await.expect("failed to migrate");

    for (title, author, published_year) in BOOKS {
        Book::create(
            kwargs!(title = title, author = author, published_year = published_year),
            &database.conn,
        )
        .await
        .expect("failed to seed");
    }

    let figment = Settings::figment().merge(("log_level", "off"));
    let rocket = bookshelf::build(figment, database.clone()).expect("failed to build rocket");
    let client = Client::tracked(rocket).await.expect("valid rocket instance");
    (client, database)
}

pub async fn book_id(title: &str, conn: &Connection) -> i32 {
    Book::get(kwargs!(title = title), conn)
        .await
        .unwrap()
        .and_then(|book| book.id)
        .expect("seeded book")
}
