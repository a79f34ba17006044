//! Conversions from external infrastructure errors into domain errors.

use campuscal_common::storage::StorageError;
use campuscal_domain::CampusCalError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CampusCalError);

impl From<InfraError> for CampusCalError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CampusCalError> for InfraError {
    fn from(value: CampusCalError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCampusCalError {
    fn into_campuscal(self) -> CampusCalError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → CampusCalError */
/* -------------------------------------------------------------------------- */

impl IntoCampusCalError for SqlError {
    fn into_campuscal(self) -> CampusCalError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => CampusCalError::Storage("database is busy".into()),
                    ErrorCode::DatabaseLocked => CampusCalError::Storage("database is locked".into()),
                    ErrorCode::DiskFull => CampusCalError::Storage("disk is full".into()),
                    ErrorCode::ReadOnly => CampusCalError::Storage("database is read-only".into()),
                    ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt => {
                        CampusCalError::Storage(format!("database file is unusable: {message}"))
                    }
                    _ => CampusCalError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => CampusCalError::Storage("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                CampusCalError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                CampusCalError::Storage(format!("invalid column type for '{name}': {ty}"))
            }
            RE::InvalidPath(path) => {
                CampusCalError::Storage(format!("invalid database path: {}", path.to_string_lossy()))
            }
            other => CampusCalError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_campuscal())
    }
}

/* -------------------------------------------------------------------------- */
/* Pool and storage errors → CampusCalError */
/* -------------------------------------------------------------------------- */

impl IntoCampusCalError for StorageError {
    fn into_campuscal(self) -> CampusCalError {
        match self {
            StorageError::Rusqlite(err) => err.into_campuscal(),
            StorageError::Timeout(secs) => {
                CampusCalError::Storage(format!("timed out after {secs}s waiting for a connection"))
            }
            StorageError::InvalidConfig(msg) => CampusCalError::Config(msg),
            other => CampusCalError::Storage(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_campuscal())
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(CampusCalError::Storage(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CampusCalError */
/* -------------------------------------------------------------------------- */

impl IntoCampusCalError for HttpError {
    fn into_campuscal(self) -> CampusCalError {
        if self.is_timeout() {
            return CampusCalError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return CampusCalError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return CampusCalError::Network(status_message(status));
        }

        if self.is_builder() {
            return CampusCalError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() || self.is_body() {
            return CampusCalError::Network(format!("failed to read HTTP response body: {self}"));
        }

        CampusCalError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_campuscal())
    }
}

/// `HTTP 503 Service Unavailable` style description for a status
pub(crate) fn status_message(status: reqwest::StatusCode) -> String {
    format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("unknown status"))
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → CampusCalError */
/* -------------------------------------------------------------------------- */

/// Where a JSON failure happened decides how it is classified: a bad feed is
/// a parse failure, a bad stored record is a storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonContext {
    Feed,
    StoredRecord,
}

pub fn json_error(err: &serde_json::Error, context: JsonContext) -> CampusCalError {
    match context {
        JsonContext::Feed => CampusCalError::Parse(format!(
            "invalid JSON feed at line {} column {}: {err}",
            err.line(),
            err.column()
        )),
        JsonContext::StoredRecord => CampusCalError::Storage(format!("corrupt stored entries: {err}")),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
