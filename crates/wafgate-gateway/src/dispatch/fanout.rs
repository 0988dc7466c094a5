//! Task-group fan-out with a join barrier.
//!
//! Every job runs on its own tokio task, at most `limit` at a time. Results
//! come back in job order; a panicking job is turned into a record through
//! `on_abort` and never takes its siblings down.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tokio::task::JoinError;

use wafgate_core::error::{Result, WafGateError};

pub async fn join_ordered<T, F, A>(jobs: Vec<F>, limit: usize, on_abort: A) -> Vec<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
    A: Fn(usize, JoinError) -> T,
{
    let permits = Arc::new(Semaphore::new(limit.max(1)));

    let handles: Vec<_> = jobs
        .into_iter()
        .map(|job| {
            let permits = Arc::clone(&permits);
            tokio::spawn(async move {
                // semaphore is never closed
                let _permit = permits.acquire_owned().await;
                job.await
            })
        })
        .collect();

    join_all(handles)
        .await
        .into_iter()
        .enumerate()
        .map(|(idx, res)| match res {
            Ok(v) => v,
            Err(e) => on_abort(idx, e),
        })
        .collect()
}

/// Bound one unit of work; a miss becomes a `Transport` error for that unit.
pub async fn within<T>(deadline: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(deadline, fut).await {
        Ok(res) => res,
        Err(_) => Err(WafGateError::Transport(format!(
            "no vendor answer within {}ms",
            deadline.as_millis()
        ))),
    }
}
