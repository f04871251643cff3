// Copyright (c) 2025 - Cowboy AI, Inc.
//! Fan-out combinators
//!
//! Both combinators poll every request concurrently on the current task.
//!
//! - [`first_success`] resolves with the first `Ok` to arrive. Requests
//!   still in flight are dropped, which is safe for idempotent GETs.
//! - [`all_successes`] waits for every request and keeps all `Ok`s in
//!   source order.
//!
//! Plain failures are absorbed. An authentication failure
//! (`UNAUTHORIZED` / `FORBIDDEN`) is returned as soon as it arrives.
//! When nothing succeeds, [`first_success`] reports the first failure
//! that was more than a plain `NOT_FOUND`.

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

use crate::errors::{ApiError, ApiErrorCode, ApiResult};

/// Resolve with the first successful request
///
/// When every request fails, the first failure to arrive whose code is not
/// `NOT_FOUND` is returned. Without one, or without any requests, the
/// result is `NOT_FOUND`.
pub async fn first_success<T, F>(requests: impl IntoIterator<Item = F>) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    let mut pending: FuturesUnordered<F> = requests.into_iter().collect();
    let total = pending.len();
    let mut failure: Option<ApiError> = None;

    while let Some(result) = pending.next().await {
        match result {
            Ok(value) => return Ok(value),
            Err(err) if err.is_auth_failure() => return Err(err),
            Err(err) if err.code != ApiErrorCode::NotFound => {
                failure.get_or_insert(err);
            }
            Err(_) => {}
        }
    }

    Err(failure.unwrap_or_else(|| {
        ApiError::not_found(format!("None of {} source(s) returned a result", total))
    }))
}

/// Collect every successful request, in the order the requests were given
///
/// An empty vector means nothing was found; only an authentication
/// failure produces `Err`.
pub async fn all_successes<T, F>(requests: impl IntoIterator<Item = F>) -> ApiResult<Vec<T>>
where
    F: Future<Output = ApiResult<T>>,
{
    let mut pending: FuturesUnordered<_> = requests
        .into_iter()
        .enumerate()
        .map(|(idx, request)| async move { (idx, request.await) })
        .collect();

    let mut found = Vec::new();
    while let Some((idx, result)) = pending.next().await {
        match result {
            Ok(value) => found.push((idx, value)),
            Err(err) if err.is_auth_failure() => return Err(err),
            Err(_) => {}
        }
    }

    found.sort_by_key(|(idx, _)| *idx);
    Ok(found.into_iter().map(|(_, value)| value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn delayed(millis: u64, result: ApiResult<u32>) -> BoxFuture<'static, ApiResult<u32>> {
        async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            result
        }
        .boxed()
    }

    #[tokio::test]
    async fn test_first_success_takes_fastest_ok() {
        let result = first_success(vec![
            delayed(50, Ok(1)),
            delayed(5, Ok(2)),
            delayed(1, Err(ApiError::not_found("gone"))),
        ])
        .await;

        assert_eq!(result, Ok(2));
    }

    #[tokio::test]
    async fn test_first_success_all_missing() {
        let result = first_success(vec![
            delayed(1, Err(ApiError::not_found("a"))),
            delayed(2, Err(ApiError::not_found("b"))),
        ])
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.code, ApiErrorCode::NotFound);
        assert_eq!(err.message, "None of 2 source(s) returned a result");
    }

    #[tokio::test]
    async fn test_first_success_reports_first_real_failure() {
        let result = first_success(vec![
            delayed(1, Err(ApiError::not_found("a"))),
            delayed(5, Err(ApiError::from_status(502, "bad gateway"))),
            delayed(2, Err(ApiError::internal("b"))),
        ])
        .await;

        assert_eq!(result, Err(ApiError::internal("b")));
    }

    #[tokio::test]
    async fn test_first_success_prefers_any_ok_over_failures() {
        let result = first_success(vec![
            delayed(1, Err(ApiError::internal("b"))),
            delayed(20, Ok(7)),
        ])
        .await;

        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_first_success_without_requests() {
        let requests: Vec<BoxFuture<'static, ApiResult<u32>>> = Vec::new();
        let result = first_success(requests).await;
        assert_eq!(result.unwrap_err().code, ApiErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_first_success_halts_on_auth_failure() {
        let result = first_success(vec![
            delayed(1, Err(ApiError::from_status(401, "denied"))),
            delayed(50, Ok(1)),
        ])
        .await;

        assert_eq!(result.unwrap_err().code, ApiErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_all_successes_keeps_source_order() {
        let result = all_successes(vec![
            delayed(30, Ok(1)),
            delayed(1, Err(ApiError::not_found("gone"))),
            delayed(10, Ok(3)),
            delayed(1, Ok(4)),
        ])
        .await;

        assert_eq!(result, Ok(vec![1, 3, 4]));
    }

    #[tokio::test]
    async fn test_all_successes_empty_when_nothing_found() {
        let result = all_successes(vec![
            delayed(1, Err(ApiError::not_found("a"))),
            delayed(1, Err(ApiError::internal("b"))),
        ])
        .await;

        assert_eq!(result, Ok(vec![]));
    }

    #[tokio::test]
    async fn test_all_successes_halts_on_forbidden() {
        let result = all_successes(vec![
            delayed(1, Ok(1)),
            delayed(2, Err(ApiError::from_status(403, "no access"))),
        ])
        .await;

        assert_eq!(result.unwrap_err().code, ApiErrorCode::Forbidden);
    }
}
