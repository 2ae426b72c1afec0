use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProspectError {
    #[error("company not found: {0}")]
    CompanyNotFound(String),

    #[error("company already saved as prospect: {0}")]
    AlreadySaved(String),

    #[error("prospect not found for company: {0}")]
    NotSaved(String),

    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

impl From<anyhow::Error> for ProspectError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(err)
    }
}
