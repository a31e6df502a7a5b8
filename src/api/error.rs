use std::borrow::Cow;

/// Flat classification of [`SystemError`] for callers that only need to pick
/// a reaction (show a message, redirect to login, offer a retry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    InvalidState,
    UploadFailure,
    PersistenceFailure,
    Internal,
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // sqlx errors
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    #[error("Database Conflict: {0:?}")]
    Conflict(Option<DbErrorMeta>),
    #[error("Migration Error")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    // http errors
    #[error("HTTP Error")]
    HttpError(#[from] reqwest::Error),
    #[error("Storage Error ({status}): {message}")]
    Storage { status: u16, message: String },
    // serde errors
    #[error("JSON Serialization/Deserialization Error")]
    JsonError(#[from] serde_json::Error),
    // jwt errors
    #[error("JWT Error")]
    JwtError(#[from] jsonwebtoken::errors::Error),
    #[error("IO Error")]
    IoError(#[from] std::io::Error),
    #[error("Configuration Error: {0}")]
    Config(Cow<'static, str>),
    // Domain errors
    #[error("Validation Error: {0}")]
    Validation(Cow<'static, str>),
    #[error("Maximum {limit} images allowed (attempted {attempted})")]
    TooManyImages { limit: usize, attempted: usize },
    #[error("Unauthenticated: {0}")]
    Unauthenticated(Cow<'static, str>),
    #[error("Forbidden: {0}")]
    Forbidden(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Invalid State: {0}")]
    InvalidState(Cow<'static, str>),
    #[error("Upload failed with {remaining} file(s) not uploaded")]
    UploadFailure {
        remaining: usize,
        orphaned: Vec<String>,
        #[source]
        source: Box<SystemError>,
    },
    #[error("Listing could not be saved: {source}")]
    PersistenceFailure {
        orphaned: Vec<String>,
        #[source]
        source: Box<SystemError>,
    },
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug)]
pub struct DbErrorMeta {
    pub code: Option<String>,
    pub constraint: Option<String>,
    pub message: String,
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    return SystemError::Conflict(Some(DbErrorMeta {
                        code: db_err.code().map(|s| s.to_string()),
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }));
                }
                Some("23514") => {
                    let constraint = db_err.constraint().unwrap_or("check").to_string();
                    return SystemError::Validation(
                        format!("Constraint {constraint} violated").into(),
                    );
                }
                Some("42P01") => {
                    return SystemError::NotFound("Resource not found".into());
                }
                _ => {
                    tracing::error!(error = ?db_err, "Unhandled DB error");
                    return SystemError::DatabaseError(db_err.message().to_string().into());
                }
            }
        }
        if let sqlx::Error::RowNotFound = err {
            return SystemError::NotFound("Row not found".into());
        }
        tracing::error!(error = ?err, "Database failure");
        SystemError::InternalError(Box::new(err))
    }
}

impl From<validator::ValidationErrors> for SystemError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SystemError::Validation(errors.to_string().into())
    }
}

impl SystemError {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn invalid_state(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn config(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(msg.into())
    }

    /// Wraps a record-store write failure from a save.
    ///
    /// Domain outcomes with nothing uploaded are returned as they are. Any
    /// other failure becomes a `PersistenceFailure` carrying the URLs that are
    /// now unreferenced; `kind()` still reports the domain outcome of the
    /// wrapped error.
    pub fn after_upload(self, orphaned: Vec<String>) -> Self {
        if orphaned.is_empty() && self.is_domain() {
            return self;
        }
        SystemError::PersistenceFailure { orphaned, source: Box::new(self) }
    }

    fn is_domain(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation
                | ErrorKind::Unauthenticated
                | ErrorKind::Forbidden
                | ErrorKind::NotFound
                | ErrorKind::Conflict
        )
    }

    /// URLs written to the blob store that no listing references because of
    /// this failure.
    pub fn orphaned(&self) -> &[String] {
        match self {
            SystemError::UploadFailure { orphaned, .. }
            | SystemError::PersistenceFailure { orphaned, .. } => orphaned,
            _ => &[],
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SystemError::Validation(_) | SystemError::TooManyImages { .. } => {
                ErrorKind::Validation
            }
            SystemError::Unauthenticated(_) | SystemError::JwtError(_) => {
                ErrorKind::Unauthenticated
            }
            SystemError::Forbidden(_) => ErrorKind::Forbidden,
            SystemError::NotFound(_) => ErrorKind::NotFound,
            SystemError::Conflict(_) => ErrorKind::Conflict,
            SystemError::InvalidState(_) => ErrorKind::InvalidState,
            SystemError::UploadFailure { .. } => ErrorKind::UploadFailure,
            SystemError::PersistenceFailure { source, .. } => match source.kind() {
                ErrorKind::Internal => ErrorKind::PersistenceFailure,
                kind => kind,
            },
            _ => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_upload_keeps_ownership_kind_and_reports_orphans() {
        let err = SystemError::forbidden("not yours").after_upload(vec!["u1".into()]);
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.orphaned(), ["u1".to_string()]);
    }

    #[test]
    fn after_upload_wraps_store_failures_with_orphans() {
        let err = SystemError::DatabaseError("connection reset".into())
            .after_upload(vec!["u1".into(), "u2".into()]);
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
        assert_eq!(err.orphaned(), ["u1".to_string(), "u2".to_string()]);
        assert_eq!(
            err.to_string(),
            "Listing could not be saved: Database Error : connection reset"
        );
    }

    #[test]
    fn store_failure_without_uploads_is_still_a_persistence_failure() {
        let err = SystemError::DatabaseError("down".into()).after_upload(Vec::new());
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
        assert!(err.orphaned().is_empty());
    }

    #[test]
    fn domain_outcome_without_uploads_is_unchanged() {
        let err = SystemError::not_found("gone").after_upload(Vec::new());
        assert!(matches!(err, SystemError::NotFound(_)));
    }

    #[test]
    fn too_many_images_is_a_validation_error() {
        let err = SystemError::TooManyImages { limit: 10, attempted: 11 };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Maximum 10 images allowed (attempted 11)");
    }
}
