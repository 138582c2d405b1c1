mod common;

use rocket::http::Status;
use rocket::local::asynchronous::Client;

use common::{setup, sorted_titles};

/// Titles of the rendered rows, top to bottom.
fn titles(html: &str) -> Vec<String> {
    html.split(r#"<td class="book-title">"#)
        .skip(1)
        .filter_map(|cell| cell.split("</td>").next())
        .map(str::to_string)
        .collect()
}

async fn get_titles(client: &Client, uri: &str) -> Vec<String> {
    let response = client.get(uri.to_string()).dispatch().await;
    assert_eq!(response.status(), Status::Ok, "{uri}");
    titles(&response.into_string().await.unwrap())
}

#[rocket::async_test]
async fn test_default_page_is_first_ten_by_title() {
    let (client, _database) = setup("catalog_default").await;

    let page = get_titles(&client, "/").await;
    assert_eq!(page, sorted_titles()[..10]);

    let rest = get_titles(&client, "/?page=2").await;
    assert_eq!(rest, sorted_titles()[10..]);
}

#[rocket::async_test]
async fn test_author_and_title_match_case_insensitive_substrings() {
    let (client, _database) = setup("catalog_icontains").await;

    let by_author = get_titles(&client, "/?filter_by=author&q=LE+guin").await;
    assert_eq!(by_author, ["The Dispossessed", "The Left Hand of Darkness"]);

    let by_title = get_titles(&client, "/?filter_by=title&q=dUnE").await;
    assert_eq!(by_title, ["Children of Dune", "Dune"]);

    // `q` is ignored while filtering by year
    let ignored = get_titles(&client, "/?filter_by=year&q=Dune").await;
    assert_eq!(ignored.len(), 10);

    let nothing = get_titles(&client, "/?filter_by=author&q=tolkien").await;
    assert!(nothing.is_empty());
}

#[rocket::async_test]
async fn test_year_matches_exactly() {
    let (client, _database) = setup("catalog_year").await;

    let by_year = get_titles(&client, "/?filter_by=year&year=1969").await;
    assert_eq!(by_year, ["The Left Hand of Darkness", "Ubik"]);

    // `year` only applies while filtering by year
    let by_author = get_titles(&client, "/?filter_by=author&year=1969").await;
    assert_eq!(by_author.len(), 10);

    let response = client.get("/?filter_by=year&year=sixties").dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_invalid_per_page_falls_back_to_ten() {
    let (client, _database) = setup("catalog_per_page").await;

    for per_page in ["abc", "0", "-3", "2.5", ""] {
        let page = get_titles(&client, &format!("/?per_page={per_page}")).await;
        assert_eq!(page.len(), 10, "per_page={per_page:?}");
    }
}

#[rocket::async_test]
async fn test_pages_never_exceed_per_page() {
    let (client, _database) = setup("catalog_pages").await;

    let mut seen = Vec::new();
    for page in 1..=3 {
        let titles = get_titles(&client, &format!("/?per_page=5&page={page}")).await;
        assert!(titles.len() <= 5);
        seen.extend(titles);
    }
    assert_eq!(seen, sorted_titles());

    // out of range goes to the last page, junk to the first
    let last = get_titles(&client, "/?per_page=5&page=99").await;
    assert_eq!(last, sorted_titles()[10..]);
    let first = get_titles(&client, "/?per_page=5&page=two").await;
    assert_eq!(first, sorted_titles()[..5]);
}

#[rocket::async_test]
async fn test_largest_per_page_is_one_page() {
    let (client, _database) = setup("catalog_max_per_page").await;

    let uri = format!("/?per_page={}&page=2", i64::MAX);
    let response = client.get(uri).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap();
    assert_eq!(titles(&html), sorted_titles());
    assert!(html.contains("Page 1 of 1"));
}

#[rocket::async_test]
async fn test_year_beyond_the_column_matches_nothing() {
    let (client, _database) = setup("catalog_huge_year").await;

    let titles = get_titles(&client, "/?filter_by=year&year=99999999999").await;
    assert!(titles.is_empty());
}

#[rocket::async_test]
async fn test_page_keeps_filters_and_lists_choices() {
    let (client, _database) = setup("catalog_context").await;

    let response = client
        .get("/?filter_by=author&q=e&per_page=5")
        .dispatch()
        .await;
    let html = response.into_string().await.unwrap();

    assert!(html.contains("Page 1 of"));
    assert!(html.contains("filter_by=author&amp;q=e&amp;year=&amp;per_page=5&amp;page=2"));
    assert!(html.contains(r#"<option value="1951""#));
    assert!(html.contains(r#"<option value="Octavia E. Butler">"#));
    assert!(html.contains(r#"<option value="Kindred">"#));
}

#[rocket::async_test]
async fn test_static_assets() {
    let (client, _database) = setup("catalog_static").await;

    let script = client.get("/static/script.js").dispatch().await;
    assert_eq!(script.status(), Status::Ok);
    assert_eq!(script.content_type(), Some(rocket::http::ContentType::JavaScript));
    assert!(script.into_string().await.unwrap().contains("toggle-dark-mode"));

    let style = client.get("/static/style.css").dispatch().await;
    assert_eq!(style.content_type(), Some(rocket::http::ContentType::CSS));
}
