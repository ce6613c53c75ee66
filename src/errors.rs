use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Container {0} does not exist.")]
    NoSuchContainer(String),

    #[error("Modules have shared descendants.")]
    SharedDescendants,
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
