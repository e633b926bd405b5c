//! Ordered fallback over alternative strategies.
//!
//! Several operations have a list of ways to achieve the same thing (header
//! conventions for the credential API, endpoints for an object). They are tried
//! strictly in order; the first success wins and later entries are never
//! attempted.

use std::future::Future;

/// The strategy that succeeded and what it produced.
#[derive(Debug)]
pub struct Winner<'a, S, T> {
    /// Position of the winning strategy in the list.
    pub index: usize,
    /// The winning strategy.
    pub strategy: &'a S,
    /// The value it produced.
    pub value: T,
}

/// Every strategy failed. Failures are kept in attempt order.
#[derive(Debug)]
pub struct Exhausted<'a, S, E> {
    /// `(strategy, error)` for each attempt.
    pub failures: Vec<(&'a S, E)>,
}

/// Try `attempt` with each of `strategies` in order and stop at the first `Ok`.
///
/// An empty list is reported as [`Exhausted`] with no failures.
///
/// # Examples
///
/// ```
/// use tempcreds_core::strategy::first_success;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let mirrors = ["a", "b", "c"];
/// let winner = first_success(&mirrors, |m| async move {
///     if *m == "b" { Ok(m.len()) } else { Err(format!("{m} down")) }
/// })
/// .await
/// .unwrap();
/// assert_eq!(winner.index, 1);
/// # });
/// ```
pub async fn first_success<'a, S, T, E, F, Fut>(
    strategies: &'a [S],
    mut attempt: F,
) -> Result<Winner<'a, S, T>, Exhausted<'a, S, E>>
where
    F: FnMut(&'a S) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut failures = Vec::new();
    for (index, strategy) in strategies.iter().enumerate() {
        match attempt(strategy).await {
            Ok(value) => {
                return Ok(Winner {
                    index,
                    strategy,
                    value,
                });
            }
            Err(e) => failures.push((strategy, e)),
        }
    }
    Err(Exhausted { failures })
}
