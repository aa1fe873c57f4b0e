use std::fmt::{self, Display};

use warp::reject::{Reject, Rejection};

/// Error value every database action and handler resolves to.
///
/// `code` is the HTTP status the recovery filter answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: u16,
    pub info: Option<String>,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.info {
            Some(info) => write!(f, "{} ({})", self.code, info),
            None => write!(f, "{}", self.code),
        }
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlError {
    InvalidRequest,
    NotFound,
    Conflict,
    InternalServerError,
}

impl HtmlError {
    pub fn code(&self) -> u16 {
        match self {
            HtmlError::InvalidRequest => 400,
            HtmlError::NotFound => 404,
            HtmlError::Conflict => 409,
            HtmlError::InternalServerError => 500,
        }
    }

    pub fn new(self, info: &str) -> ApiError {
        ApiError {
            code: self.code(),
            info: Some(info.to_string()),
        }
    }
}

pub struct QueryError {
    code: u16,
    info: String,
}

impl QueryError {
    pub fn new(info: String) -> Self {
        Self { code: 500, info }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Database(e) if e.is_unique_violation() => Self {
                code: HtmlError::Conflict.code(),
                info: format!("Already exists: {e}"),
            },
            sqlx::Error::Database(e) if e.is_foreign_key_violation() => Self {
                code: HtmlError::InvalidRequest.code(),
                info: format!("Referenced row doesn't exist: {e}"),
            },
            sqlx::Error::Configuration(e) => Self::new(format!("{e}")),
            sqlx::Error::Database(e) => Self::new(format!("{e}")),
            sqlx::Error::Io(e) => Self::new(format!("{e}")),
            sqlx::Error::Tls(e) => Self::new(format!("{e}")),
            sqlx::Error::Protocol(e) => Self::new(e),
            sqlx::Error::RowNotFound => Self {
                code: HtmlError::NotFound.code(),
                info: String::from("RowNotFound"),
            },
            sqlx::Error::TypeNotFound { type_name } => {
                Self::new(format!("Type not found: {type_name}"))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => {
                Self::new(format!("Column index out of bounds {index} ({len})"))
            }
            sqlx::Error::ColumnNotFound(e) => Self::new(e),
            sqlx::Error::ColumnDecode { index, source } => {
                Self::new(format!("Column decode {index} ({source})"))
            }
            sqlx::Error::Decode(e) => Self::new(format!("{e}")),
            sqlx::Error::PoolTimedOut => Self::new(String::from("Pool timed out")),
            sqlx::Error::PoolClosed => Self::new(String::from("Pool closed")),
            sqlx::Error::WorkerCrashed => Self::new(String::from("Worker crashed")),
            sqlx::Error::Migrate(e) => Self::new(format!("{e}")),
            _ => Self::new(String::from("Unknown error")),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(value: QueryError) -> Self {
        if value.code >= 500 {
            log::error!("> Query failed: {}", value.info);
        }

        ApiError {
            code: value.code,
            info: Some(value.info),
        }
    }
}

/// A request field that is missing or has the wrong shape.
#[derive(Debug)]
pub struct TypeError {
    info: String,
}

impl TypeError {
    pub fn new(info: &str) -> Self {
        Self {
            info: info.to_string(),
        }
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.info)
    }
}

impl std::error::Error for TypeError {}

impl From<TypeError> for ApiError {
    fn from(value: TypeError) -> Self {
        HtmlError::InvalidRequest.new(&value.info)
    }
}

impl From<TypeError> for Rejection {
    fn from(value: TypeError) -> Self {
        ApiError::from(value).into()
    }
}

/// Failures that keep the service from starting.
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to connect to database: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Failed to migrate database: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to bind server: {0}")]
    Bind(#[from] warp::Error),

    #[error("Failed to seed database: {0}")]
    Seed(ApiError),
}
