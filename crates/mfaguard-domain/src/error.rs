use thiserror::Error;

/// Malformed or duplicate account input. Never retried: the input is deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidAccountError {
    #[error("account at position {position} has an empty identifier")]
    EmptyIdentifier { position: usize },

    #[error("duplicate account identifier '{identifier}'")]
    DuplicateIdentifier { identifier: String },

    #[error("account '{identifier}' has no observed value for attribute '{attribute}'")]
    MissingAttribute {
        identifier: String,
        attribute: String,
    },
}

/// Reasons an evaluation pass produced no result. Evaluation is all-or-nothing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    InvalidAccount(#[from] InvalidAccountError),

    #[error("account population is empty; compliance ratio is undefined")]
    EmptyPopulation,

    /// The check could not reach a verdict. Distinct from both "compliant" and "violated".
    #[error("policy check unavailable: {reason}")]
    PolicyCheckUnavailable { reason: String },
}
