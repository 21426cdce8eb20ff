//! # Error Handling
//!
//! Unified error handling for Bandstand. Every failure a request can surface
//! funnels into [`AppError`], which renders the matching HTML error page:
//! missing ids become the 404 page, business-rule conflicts a 409, and
//! storage failures are logged with full detail while the visitor only sees a
//! generic message and a short reference code.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::views;

/// Application-level error taxonomy.
#[derive(Debug, Error)]
pub enum AppError {
    /// User input failed a required-field or type constraint.
    #[error("{0}")]
    Validation(String),
    /// A referenced id has no backing row.
    #[error("{0}")]
    NotFound(String),
    /// The request contradicts existing data, e.g. a duplicate show booking
    /// or deleting a venue that still has shows.
    #[error("{0}")]
    Conflict(String),
    /// Unexpected storage or infrastructure failure. The message is what the
    /// visitor sees; the source carries the internal detail for the log.
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Wrap an unexpected failure with a user-facing message. The internal
    /// detail only ever reaches the log.
    pub fn internal<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal {
            message: message.into(),
            source: source.into(),
        }
    }

    /// HTTP status this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Duplicate-key detection across the supported backends (Postgres `23505`,
/// SQLite `1555`/`2067`). Drivers do not agree on how they expose this, so
/// check both the sqlx flag and the raw codes.
fn is_unique_violation(error: &sea_orm::DbErr) -> bool {
    use sea_orm::RuntimeErr;

    const PG_UNIQUE: &str = "23505";
    const SQLITE_UNIQUE_CODES: &[&str] = &["1555", "2067"];

    let runtime_err = match error {
        sea_orm::DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | sea_orm::DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = runtime_err.as_database_error() else {
        return false;
    };

    if db_error.is_unique_violation() {
        return true;
    }

    match db_error.code() {
        Some(code) => code.as_ref() == PG_UNIQUE || SQLITE_UNIQUE_CODES.contains(&code.as_ref()),
        None => false,
    }
}

/// Referential-integrity detection (Postgres `23503`, SQLite `787`/`1811`),
/// the backstop behind the venue-delete pre-check.
fn is_foreign_key_violation(error: &sea_orm::DbErr) -> bool {
    use sea_orm::RuntimeErr;

    const PG_FOREIGN_KEY: &str = "23503";
    const SQLITE_FOREIGN_KEY_CODES: &[&str] = &["787", "1811"];

    let runtime_err = match error {
        sea_orm::DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | sea_orm::DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = runtime_err.as_database_error() else {
        return false;
    };

    if db_error.is_foreign_key_violation() {
        return true;
    }

    match db_error.code() {
        Some(code) => {
            code.as_ref() == PG_FOREIGN_KEY || SQLITE_FOREIGN_KEY_CODES.contains(&code.as_ref())
        }
        None => false,
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(error: sea_orm::DbErr) -> Self {
        if is_unique_violation(&error) {
            tracing::debug!(?error, "unique constraint violation detected");
            return AppError::Conflict("That record already exists.".to_string());
        }

        if is_foreign_key_violation(&error) {
            tracing::debug!(?error, "foreign key constraint violation detected");
            return AppError::Conflict(
                "That record is still referenced by other data and cannot be changed.".to_string(),
            );
        }

        match error {
            sea_orm::DbErr::RecordNotFound(record) => {
                AppError::NotFound(format!("Record not found: {record}"))
            }
            other => AppError::internal("Something went wrong. Please try again later.", other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Internal { message, source } => {
                let reference = format!("err-{}", &uuid::Uuid::new_v4().to_string()[..8]);
                tracing::error!(%reference, error = ?source, "request failed with internal error");
                (
                    status,
                    Html(views::error_page(status, &message, Some(&reference))),
                )
                    .into_response()
            }
            other => {
                let message = other.to_string();
                (status, Html(views::error_page(status, &message, None))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, Database, EntityTrait, Set};

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::Validation("bad".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::internal("oops", anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_hides_detail_from_display() {
        let err = AppError::internal(
            "Something went wrong. Please try again later.",
            anyhow::anyhow!("connection refused on 5432"),
        );
        assert!(!err.to_string().contains("5432"));
    }

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err: AppError = sea_orm::DbErr::RecordNotFound("venue 7".to_string()).into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_insert_maps_to_conflict() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let genre = crate::models::genre::ActiveModel {
            name: Set("Jazz".to_string()),
            ..Default::default()
        };
        genre.insert(&db).await.unwrap();

        let duplicate = crate::models::genre::ActiveModel {
            name: Set("Jazz".to_string()),
            ..Default::default()
        };
        let db_err = duplicate.insert(&db).await.unwrap_err();
        let err: AppError = db_err.into();
        assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn restricted_delete_maps_to_conflict() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let venue = crate::models::venue::ActiveModel {
            name: Set("The Musical Hop".to_string()),
            city: Set("San Francisco".to_string()),
            state: Set("CA".to_string()),
            address: Set("1015 Folsom Street".to_string()),
            seeking_talent: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let artist = crate::models::artist::ActiveModel {
            name: Set("Guns N Petals".to_string()),
            city: Set("San Francisco".to_string()),
            state: Set("CA".to_string()),
            seeking_venue: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        crate::models::show::ActiveModel {
            venue_id: Set(venue.id),
            artist_id: Set(artist.id),
            start_time: Set(chrono::NaiveDate::from_ymd_opt(2026, 9, 1)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let db_err = crate::models::Venue::delete_by_id(venue.id)
            .exec(&db)
            .await
            .unwrap_err();
        let err: AppError = db_err.into();
        assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
    }
}
