/// Errors raised while simulating a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Infeasible leaf coverage: {0}")]
    InfeasibleConstraint(String),

    #[error("Retry budget exceeded: {what} did not succeed in {attempts} attempts")]
    RetryBudgetExceeded { what: &'static str, attempts: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Poisson error: {0}")]
    Poisson(#[from] rand_distr::PoissonError),

    #[error("Binomial error: {0}")]
    Binomial(#[from] rand_distr::BinomialError),
}

pub type Result<T> = std::result::Result<T, SimError>;
