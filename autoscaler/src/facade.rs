//! The all-or-some failure policy shared by the gatherer and evaluator
//! facades (§4.4, §4.6): per-item failures are tolerated unless every item
//! fails, in which case the facade reports the count and the first error.

use anyhow::{anyhow, Result};

/// Runs `results` (one `Result` per input item, in input order) through the
/// all-or-some policy. `what` names the item kind for the aggregate error
/// message, e.g. `"metrics"` or `"evaluations"`.
pub fn collect_or_fail<T>(results: Vec<Result<T>>, what: &str) -> Result<Vec<T>> {
    let total = results.len();
    let mut oks = Vec::with_capacity(total);
    let mut first_error = None;
    let mut invalid = 0usize;

    for result in results {
        match result {
            Ok(value) => oks.push(value),
            Err(err) => {
                invalid += 1;
                tracing::warn!("tolerated {what} failure: {err}");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    if oks.is_empty() && total > 0 {
        let first = first_error.expect("invalid count implies at least one captured error");
        return Err(anyhow!("invalid {what} ({invalid} invalid out of {total}), first error is: {first}"));
    }

    tracing::info!("{} of {total} {what} succeeded", oks.len());
    Ok(oks)
}
