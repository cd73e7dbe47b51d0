//! Pure policy compliance evaluation (no IO).
//!
//! Input: an account population materialized elsewhere, plus a policy.
//! Output: a compliance result (status, violators, ratio), or a report with findings + verdict.

#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod policy;
pub mod predicate;
pub mod report;
pub mod solver;

mod engine;
mod findings;
mod fingerprint;

pub use engine::{evaluate, evaluate_accounts, evaluate_direct, evaluate_with, run_checks};
pub use error::{EvaluationError, InvalidAccountError};

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
