use service_core::error::AppError;
use thiserror::Error;

/// Failures of the rental computations and of the store behind them.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A record or status value the computation cannot interpret.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Caller-supplied input outside the accepted domain.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The document store could not answer; distinct from "no data".
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(#[source] anyhow::Error),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidState(msg) => AppError::Conflict(anyhow::anyhow!(msg)),
            DomainError::InvalidInput(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            err @ DomainError::NotFound { .. } => AppError::NotFound(anyhow::Error::new(err)),
            DomainError::UpstreamUnavailable(err) => AppError::UpstreamUnavailable(err),
        }
    }
}
