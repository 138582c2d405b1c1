use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::Request;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(bookshelf_orm::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("configuration error: {0}")]
    Config(#[from] rocket::figment::Error),

    #[error("invalid year {0:?}, expected a whole number")]
    InvalidYear(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("fixture entry {index}: {message}")]
    Fixture { index: usize, message: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bookshelf_orm::Error> for AppError {
    fn from(err: bookshelf_orm::Error) -> Self {
        AppError::Database(err)
    }
}

impl AppError {
    pub fn status(&self) -> Status {
        match self {
            AppError::InvalidYear(_) => Status::BadRequest,
            AppError::NotFound(_) => Status::NotFound,
            _ => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status.code >= 500 {
            tracing::error!(uri = %request.uri(), "{self}");
        } else {
            tracing::warn!(uri = %request.uri(), "{self}");
        }
        (status, self.to_string()).respond_to(request)
    }
}
