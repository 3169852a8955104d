//! End-to-end retry runs through the public API.
//!
//! The client below mimics an HTTP fetch: 5xx responses and connection
//! errors are worth retrying, 2xx is success, anything else is final.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::join_all;
use tenacious::delay::{exponential, fibonacci, no_delay, Delay, DelayExt};
use tenacious::testing::{FixedRandom, RecordingDelay};
use tenacious::{assert_cancelled, assert_failed};
use tenacious::{run, CancelReason, Failure, RetryLimit, RunContext, RunError};

#[derive(Debug, Clone, PartialEq)]
enum FetchError {
    Connection(String),
    Status(u16),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Connection(msg) => write!(f, "connection error: {}", msg),
            FetchError::Status(code) => write!(f, "http status code: {}", code),
        }
    }
}

impl std::error::Error for FetchError {}

/// Canned responses, served in order.
#[derive(Clone)]
struct FakeServer {
    responses: Arc<Mutex<VecDeque<Result<u16, String>>>>,
    hits: Arc<Mutex<u32>>,
}

impl FakeServer {
    fn new(responses: Vec<Result<u16, &str>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses
                    .into_iter()
                    .map(|r| r.map_err(str::to_string))
                    .collect(),
            )),
            hits: Arc::new(Mutex::new(0)),
        }
    }

    fn hits(&self) -> u32 {
        *self.hits.lock().unwrap()
    }

    async fn fetch(&self, _ctx: RunContext) -> Result<String, Failure<FetchError>> {
        *self.hits.lock().unwrap() += 1;
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(200));

        match response {
            Err(msg) => Err(Failure::retryable(FetchError::Connection(msg))),
            Ok(code @ 500..=599) => Err(Failure::retryable(FetchError::Status(code))),
            Ok(code @ 200..=299) => Ok(format!("body ({})", code)),
            Ok(code) => Err(Failure::fatal(FetchError::Status(code))),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn fetch_recovers_from_server_errors() {
    let server = FakeServer::new(vec![Err("reset"), Ok(503), Ok(502), Ok(200)]);
    let ctx = RunContext::new().with_timeout(Duration::from_secs(25));
    let mut log = Vec::new();

    let result = run(
        Some(&ctx),
        RetryLimit::retries(5),
        exponential(Duration::from_secs(1))
            .jitter()
            .logged_to(&mut log, |d| format!("Sleeping {:?} then retrying", d)),
        |ctx| {
            let server = server.clone();
            async move { server.fetch(ctx).await }
        },
    )
    .await;

    assert_eq!(result, Ok("body (200)".to_string()));
    assert_eq!(server.hits(), 4);

    let log = String::from_utf8(log).unwrap();
    assert_eq!(log.lines().count(), 3);
    assert!(log.lines().all(|line| line.starts_with("Sleeping ")));
}

#[tokio::test]
async fn fetch_gives_up_on_client_errors() {
    let server = FakeServer::new(vec![Ok(500), Ok(404), Ok(200)]);

    let result = run(None, RetryLimit::retries(5), no_delay(), |ctx| {
        let server = server.clone();
        async move { server.fetch(ctx).await }
    })
    .await;

    assert_failed!(result, FetchError::Status(404));
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn fetch_reports_last_error_when_budget_runs_out() {
    let server = FakeServer::new(vec![Ok(500), Ok(502), Ok(503), Ok(200)]);

    let result = run(None, RetryLimit::retries(2), no_delay(), |ctx| {
        let server = server.clone();
        async move { server.fetch(ctx).await }
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "http status code: 503");
    assert!(!err.is_too_many_retries());
    assert_eq!(err.into_inner(), Some(FetchError::Status(503)));
    assert_eq!(server.hits(), 3);
}

#[tokio::test(start_paused = true)]
async fn fetch_deadline_beats_unlimited_retries() {
    let server = FakeServer::new(vec![Ok(503); 100]);
    let ctx = RunContext::new().with_timeout(Duration::from_secs(25));

    let result = run(
        Some(&ctx),
        RetryLimit::RETRY_FOREVER,
        exponential(Duration::from_secs(1)),
        |ctx| {
            let server = server.clone();
            async move { server.fetch(ctx).await }
        },
    )
    .await;

    assert_cancelled!(result, CancelReason::DeadlineExceeded);
    // t = 0, 1, 3, 7, 15; the 16s wait would end at 31s
    assert_eq!(server.hits(), 5);
}

#[tokio::test(start_paused = true)]
async fn jittered_schedule_is_deterministic_with_fixed_source() {
    let mut delay = RecordingDelay::new(tenacious::delay::Rand::with_source(
        exponential(Duration::ZERO),
        FixedRandom::MAX,
    ));

    let _ = run(None, RetryLimit::retries(3), &mut delay, |_ctx| async {
        Err::<(), _>(Failure::retryable("busy"))
    })
    .await;

    assert_eq!(delay.iterations(), &[1, 2, 3]);
    assert_eq!(
        delay.delays(),
        &[
            Duration::from_millis(1100),
            Duration::from_millis(2200),
            Duration::from_millis(4400),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn concurrent_runs_with_their_own_strategies() {
    let runs = (0..4u32).map(|failures| async move {
        let mut seen = 0;
        let mut delay = RecordingDelay::new(fibonacci(Duration::from_millis(100)));
        let result = run(None, RetryLimit::retries(5), &mut delay, |_ctx| {
            seen += 1;
            let attempt = seen;
            async move {
                if attempt <= failures {
                    Err(Failure::retryable(attempt))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;
        (result, delay.iterations().to_vec())
    });

    let outcomes = join_all(runs).await;
    for (failures, (result, iterations)) in outcomes.into_iter().enumerate() {
        let failures = failures as u32;
        assert_eq!(result, Ok(failures + 1));
        assert_eq!(iterations, (1..=failures).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn cancelling_a_parent_stops_the_child_run() {
    let parent = RunContext::new();
    let child = parent.child();
    let mut attempts = 0;

    let result = run(
        Some(&child),
        RetryLimit::RETRY_FOREVER,
        tenacious::delay::from_fn(|_| Duration::from_secs(3600)),
        |_ctx| {
            attempts += 1;
            parent.cancel();
            async { Err::<(), _>(Failure::retryable("busy")) }
        },
    )
    .await;

    assert_eq!(result, Err(RunError::Cancelled(CancelReason::Cancelled)));
    assert_eq!(attempts, 1);
}

#[test]
fn strategies_never_go_negative() {
    let mut delay = no_delay().jitter();
    for i in 1..=10 {
        assert_eq!(delay.delay(i), Duration::ZERO);
    }
}
