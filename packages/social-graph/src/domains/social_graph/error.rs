use thiserror::Error;

/// Failures surfaced by social graph operations.
#[derive(Error, Debug)]
pub enum SocialGraphError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(#[source] anyhow::Error),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl SocialGraphError {
    /// Stable machine-readable code for transport adapters.
    pub fn code(&self) -> &'static str {
        match self {
            SocialGraphError::NotFound(_) => "not_found",
            SocialGraphError::InvalidOperation(_) => "invalid_operation",
            SocialGraphError::DependencyUnavailable(_) => "dependency_unavailable",
            SocialGraphError::Conflict(_) => "conflict",
        }
    }
}

/// Store and bus adapters report through `anyhow`; anything they return is
/// an infrastructure failure from the domain's point of view.
impl From<anyhow::Error> for SocialGraphError {
    fn from(err: anyhow::Error) -> Self {
        SocialGraphError::DependencyUnavailable(err)
    }
}

pub type SocialGraphResult<T> = std::result::Result<T, SocialGraphError>;
