use rocket::http::ContentType;
use rocket::Route;

const SCRIPT: &str = include_str!("../static/script.js");
const STYLE: &str = include_str!("../static/style.css");

#[get("/script.js")]
fn script() -> (ContentType, &'static str) {
    (ContentType::JavaScript, SCRIPT)
}

#[get("/style.css")]
fn style() -> (ContentType, &'static str) {
    (ContentType::CSS, STYLE)
}

pub fn routes() -> Vec<Route> {
    routes![script, style]
}
