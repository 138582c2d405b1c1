//! Column type aliases understood by `#[derive(Model)]`.
//!
//! The derive reads the alias name to pick the SQL column type, so a field
//! declared as `Integer` becomes `integer` and `Text` becomes `text`.

#[cfg(feature = "postgres")]
pub type Serial = i32;

pub type Integer = i32;
pub type Text = String;
