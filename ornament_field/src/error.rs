//! Error type for field construction.
//!
//! Per-frame updates never fail; only configuration can be rejected.

/// Errors raised while building a field from configuration.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("invalid field config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

pub type FieldResult<T> = std::result::Result<T, FieldError>;

impl FieldError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        FieldError::InvalidConfig { field, reason: reason.into() }
    }
}
