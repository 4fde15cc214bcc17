//! Error policies of a decoration run.
//!
//! Every fallible API call of a run goes through one of these two functions, so the
//! call site states whether its failure ends the run.

use anyhow::Context;

/// The failure ends the run; the error is returned with `operation` as context.
pub fn fatal<T>(operation: &str, result: anyhow::Result<T>) -> anyhow::Result<T> {
    result.with_context(|| format!("could not {}", operation))
}

/// The failure is logged and swallowed; the run goes on.
pub fn isolated<T>(operation: &str, result: anyhow::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::error!("Could not {}: {:#}", operation, err);
            None
        }
    }
}
