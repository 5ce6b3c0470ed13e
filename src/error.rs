use serde::Serialize;
use thiserror::Error;

use crate::models::TableKind;

pub type Result<T> = std::result::Result<T, LoadError>;

pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Failure to bring a table up at startup. Always fatal for the table it concerns.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetching {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Source {0} could not be decoded as text")]
    Encoding(String),

    #[error("{dataset} source has no header line")]
    Empty { dataset: TableKind },

    #[error("{dataset} source is missing required column '{column}'")]
    MissingColumn {
        dataset: TableKind,
        column: &'static str,
    },

    #[error("{dataset} source line {line}: malformed '{column}' value '{value}'")]
    MalformedKey {
        dataset: TableKind,
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] validator::ValidationErrors),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Caller-correctable outcome of a query. The transport layer decides how to
/// present each kind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No matching record: {0}")]
    NotFound(NotFoundContext),

    #[error("{dataset} data is unavailable: {reason}")]
    Unavailable { dataset: TableKind, reason: String },
}

impl QueryError {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::InvalidInput(_) => "invalid_input",
            QueryError::NotFound(_) => "not_found",
            QueryError::Unavailable { .. } => "unavailable",
        }
    }
}

impl From<validator::ValidationErrors> for QueryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut reasons: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        reasons.sort();
        QueryError::InvalidInput(reasons.join("; "))
    }
}

/// What was asked for, plus the alternatives that do exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NotFoundContext {
    Soil {
        ponto: String,
        profundidade: String,
        points_disponiveis: Vec<String>,
        profundidades_disponiveis: Vec<String>,
    },
    Weather {
        data: String,
        hora: String,
        horas_disponiveis: Vec<String>,
        /// Filled only when the date itself is absent; a bounded sample in
        /// the source's own date format.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        datas_disponiveis: Vec<String>,
    },
}

impl std::fmt::Display for NotFoundContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotFoundContext::Soil {
                ponto,
                profundidade,
                points_disponiveis,
                profundidades_disponiveis,
            } => write!(
                f,
                "no soil analysis for point {} at depth '{}' (points: [{}]; depths: [{}])",
                ponto,
                profundidade,
                points_disponiveis.join(", "),
                profundidades_disponiveis.join(", ")
            ),
            NotFoundContext::Weather {
                data,
                hora,
                horas_disponiveis,
                datas_disponiveis,
            } => {
                if horas_disponiveis.is_empty() {
                    write!(
                        f,
                        "no weather observation for {} at {} (date not present; dates include: [{}])",
                        data,
                        hora,
                        datas_disponiveis.join(", ")
                    )
                } else {
                    write!(
                        f,
                        "no weather observation for {} at {} (hours on that date: [{}])",
                        data,
                        hora,
                        horas_disponiveis.join(", ")
                    )
                }
            }
        }
    }
}
