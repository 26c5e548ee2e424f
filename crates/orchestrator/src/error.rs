/// Root crate error, composing every sub-crate's error via `#[from]`.
#[derive(thiserror::Error, Debug)]
pub enum OrchestratorError {
    #[error("config: {0}")]
    Config(String),

    #[error(transparent)]
    Domain(#[from] ao_domain::error::Error),
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
