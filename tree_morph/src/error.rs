//! Errors surfaced by the viewer.

use ornament_field::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config: {0}")]
    Config(String),

    #[error("reading {path}: {source}")]
    Io {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("window: {0}")]
    Window(String),

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
