//! Integration tests for rate limiting, deadlines and cancellation.

use integrations_genjob::mocks::{ManualClock, MockHttpTransport};
use integrations_genjob::observability::NoopLogger;
use integrations_genjob::{
    CancelPoint, Clock, ErrorKind, GenJobError, KieClient, KieConfig, RateLimiter, RateLimiterConfig,
    TimeoutError, TimeoutGate,
};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn create_test_client(transport: &MockHttpTransport, timeout: Duration) -> KieClient {
    let config = KieConfig::builder()
        .api_key(SecretString::new("kie-test-key".into()))
        .timeout(timeout)
        .build()
        .unwrap();
    KieClient::builder()
        .config(config)
        .transport(Arc::new(transport.clone()))
        .logger(Arc::new(NoopLogger))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_no_window_ever_holds_more_than_max() {
    // Arrange
    let clock = Arc::new(ManualClock::new());
    let config = RateLimiterConfig::new(5, Duration::from_secs(10));
    let limiter = RateLimiter::with_clock(config, clock.clone());
    let gaps = [0u64, 300, 0, 1200, 50, 4000, 0, 0, 700, 2500, 10, 0, 9000, 100, 0, 0, 0, 3300];
    let mut admitted: Vec<Instant> = Vec::new();

    // Act
    for round in 0..3 {
        for gap in gaps {
            clock.advance(Duration::from_millis(gap + round));
            limiter.acquire(None).await.unwrap();
            admitted.push(clock.now());
        }
    }

    // Assert
    for (i, start) in admitted.iter().enumerate() {
        let in_window = admitted[i..]
            .iter()
            .take_while(|t| t.duration_since(*start) < Duration::from_secs(10))
            .count();
        assert!(in_window <= 5, "{in_window} requests within one window starting at #{i}");
    }
}

#[tokio::test]
async fn test_kie_burst_waits_for_window() {
    // Arrange
    let clock = Arc::new(ManualClock::new());
    let limiter = RateLimiter::with_clock(RateLimiterConfig::kie(), clock.clone());

    // Act
    for _ in 0..18 {
        limiter.acquire(None).await.unwrap();
        clock.advance(Duration::from_millis(100));
    }
    let before = clock.elapsed();
    limiter.acquire(None).await.unwrap();

    // Assert
    assert!(clock.elapsed() - before >= Duration::from_millis(8200));
    assert_eq!(limiter.recorded(), 17);
}

#[tokio::test]
async fn test_unlimited_limiter_never_waits() {
    // Arrange
    let clock = Arc::new(ManualClock::new());
    let limiter = RateLimiter::with_clock(RateLimiterConfig::unlimited(), clock.clone());

    // Act
    for _ in 0..100 {
        limiter.acquire(None).await.unwrap();
    }

    // Assert
    assert!(clock.sleeps().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_limiter_shared_across_tasks() {
    // Arrange
    let limiter = Arc::new(RateLimiter::new(RateLimiterConfig::new(3, Duration::from_secs(2))));
    let started = Instant::now();

    // Act
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move {
                limiter.acquire(None).await.unwrap();
                Instant::now()
            })
        })
        .collect();
    let mut admitted = Vec::new();
    for handle in handles {
        admitted.push(handle.await.unwrap());
    }

    // Assert
    let immediate = admitted.iter().filter(|t| t.duration_since(started) < Duration::from_secs(2)).count();
    assert_eq!(immediate, 3);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_while_waiting_for_limiter() {
    // Arrange
    let limiter = RateLimiter::new(RateLimiterConfig::new(1, Duration::from_secs(60)));
    limiter.acquire(None).await.unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    // Act
    let error = limiter.acquire(Some(&cancel)).await.unwrap_err();

    // Assert
    assert!(matches!(error, GenJobError::Cancelled { point: CancelPoint::RateLimit }));
    assert_eq!(limiter.recorded(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_gate_deadline_fires() {
    // Arrange
    let gate = TimeoutGate::new(Duration::from_secs(30));
    let started = Instant::now();

    // Act
    let error = gate
        .run(None, || async {
            tokio::time::sleep(Duration::from_secs(120)).await;
            Ok::<_, GenJobError>(())
        })
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(error, GenJobError::Timeout(TimeoutError::Deadline { .. })));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(30) && elapsed < Duration::from_secs(31));
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_hits_client_deadline() {
    // Arrange
    let transport = MockHttpTransport::new().with_delay(Duration::from_secs(60));
    transport.enqueue_json_response(200, r#"{"code":200,"msg":"success","data":1.0}"#);
    let client = create_test_client(&transport, Duration::from_secs(30));
    let started = Instant::now();

    // Act
    let error = client.check_credits(None).await.unwrap_err();

    // Assert
    assert_eq!(error.kind(), ErrorKind::Timeout);
    assert!(started.elapsed() < Duration::from_secs(31));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_in_flight_request() {
    // Arrange
    let transport = MockHttpTransport::new().with_delay(Duration::from_secs(20));
    transport.enqueue_json_response(200, r#"{"code":200,"msg":"success","data":1.0}"#);
    let client = create_test_client(&transport, Duration::from_secs(30));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        trigger.cancel();
    });
    let started = Instant::now();

    // Act
    let error = client.check_credits(Some(&cancel)).await.unwrap_err();

    // Assert
    assert!(matches!(error, GenJobError::Cancelled { point: CancelPoint::Request }));
    assert!(started.elapsed() < Duration::from_secs(4));
}
