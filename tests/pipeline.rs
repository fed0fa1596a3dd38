//! End-to-end: client → service → stub provider, service → SQLite.

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use quote_relay::client::{write_bid, QuoteClient};
use quote_relay::config::SchemaMode;
use quote_relay::store::QuoteStore;

mod common;

#[tokio::test]
async fn test_successful_quote_is_returned_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let provider = common::start_provider("5.12", Duration::ZERO).await;
    let service = common::spawn_service(common::test_config(provider, &dir)).await;

    let res = common::http_client()
        .get(service.url("/cotacao"))
        .send()
        .await
        .expect("service unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert!(res.headers().get("x-request-id").is_some());

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["USDBRL"]["bid"], "5.12");
    assert_eq!(body["USDBRL"]["code"], "USD");
    assert_eq!(body["USDBRL"]["varBid"], "0.0093");
    assert_eq!(body["USDBRL"]["create_date"], "2024-06-14 18:00:00");

    assert_eq!(service.store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_every_request_adds_a_row() {
    let dir = tempfile::tempdir().unwrap();
    let provider = common::start_provider("5.12", Duration::ZERO).await;
    let service = common::spawn_service(common::test_config(provider, &dir)).await;
    let client = common::http_client();

    for _ in 0..3 {
        let res = client.get(service.url("/cotacao")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
    assert_eq!(service.store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_slow_provider_yields_500_and_no_row() {
    let dir = tempfile::tempdir().unwrap();
    let provider = common::start_provider("5.12", Duration::from_secs(5)).await;
    let mut config = common::test_config(provider, &dir);
    config.provider.fetch_timeout_ms = 200;
    let (logs, _guard) = common::capture_logs();
    let service = common::spawn_service(config).await;

    let started = Instant::now();
    let res = common::http_client()
        .get(service.url("/cotacao"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(res.bytes().await.unwrap().is_empty());
    assert_eq!(service.store.count().await.unwrap(), 0);

    let failures = logs.lines_with("Quote fetch failed");
    assert_eq!(failures.len(), 1, "logs:\n{}", logs.contents());
    assert!(failures[0].contains("kind=DeadlineExceeded"), "{}", failures[0]);
    assert!(failures[0].contains("deadline_exceeded=true"), "{}", failures[0]);
    assert!(failures[0].contains("budget_ms=200"), "{}", failures[0]);
}

#[tokio::test]
async fn test_unknown_paths_are_404() {
    let dir = tempfile::tempdir().unwrap();
    let provider = common::start_provider("5.12", Duration::ZERO).await;
    let service = common::spawn_service(common::test_config(provider, &dir)).await;
    let client = common::http_client();

    for path in ["/", "/cotacoes", "/cotacao/extra", "/health"] {
        let res = client.get(service.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "path {path}");
    }

    let res = client
        .post(service.url("/other"))
        .body("{\"bid\":\"1\"}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.bytes().await.unwrap().is_empty());

    assert_eq!(service.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_client_deadline_is_independent_of_service_budgets() {
    let dir = tempfile::tempdir().unwrap();
    // Service total latency is ~800ms, well inside its own 2s fetch budget.
    let provider = common::start_provider("5.12", Duration::from_millis(800)).await;
    let service = common::spawn_service(common::test_config(provider, &dir)).await;

    let impatient = QuoteClient::with_client(
        common::http_client(),
        &service.url("/cotacao"),
        "USDBRL",
        Duration::from_millis(300),
    );
    let started = Instant::now();
    let err = impatient.fetch_bid().await.unwrap_err();
    assert!(err.is_timeout(), "unexpected: {err}");
    assert!(started.elapsed() < Duration::from_millis(800));

    // Same service, same latency, a client with room to wait succeeds.
    let patient = QuoteClient::with_client(
        common::http_client(),
        &service.url("/cotacao"),
        "USDBRL",
        Duration::from_millis(3_000),
    );
    let bid = patient.fetch_bid().await.unwrap();
    assert_eq!(bid, "5.12");

    let output = dir.path().join("cotacao.txt");
    write_bid(&output, &bid).await.unwrap();
    assert_eq!(
        tokio::fs::read_to_string(&output).await.unwrap(),
        "Dólar: 5.12\n"
    );
}

#[tokio::test]
async fn test_service_500_reaches_client_as_non_timeout_error() {
    let dir = tempfile::tempdir().unwrap();
    let provider = common::start_programmable_backend(|| async {
        (502, String::new())
    })
    .await;
    let service = common::spawn_service(common::test_config(provider, &dir)).await;

    let client = QuoteClient::with_client(
        common::http_client(),
        &service.url("/cotacao"),
        "USDBRL",
        Duration::from_secs(3),
    );
    let err = client.fetch_bid().await.unwrap_err();
    assert!(!err.is_timeout());
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_persistence_failure_does_not_stop_the_service() {
    let dir = tempfile::tempdir().unwrap();
    let provider = common::start_provider("5.12", Duration::ZERO).await;
    let mut config = common::test_config(provider, &dir);
    config.store.persist_timeout_ms = 100;
    let service = common::spawn_service(config).await;
    let client = common::http_client();

    // Another writer holds the lock past the persist budget.
    let locker = rusqlite::Connection::open(service.store.path()).unwrap();
    locker.execute_batch("BEGIN IMMEDIATE").unwrap();

    let res = client.get(service.url("/cotacao")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.bytes().await.unwrap().is_empty());

    locker.execute_batch("ROLLBACK").unwrap();
    drop(locker);

    let res = client.get(service.url("/cotacao")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(service.store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_per_request_schema_mode_creates_table_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let provider = common::start_provider("5.12", Duration::ZERO).await;
    let mut config = common::test_config(provider, &dir);
    config.store.schema = SchemaMode::PerRequest;
    let service = common::spawn_service(config).await;

    // No table until the first request arrives.
    assert!(service.store.count().await.is_err());

    let res = common::http_client()
        .get(service.url("/cotacao"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(service.store.count().await.unwrap(), 1);

    // Re-ensuring an existing table is harmless.
    service.store.ensure_schema().await.unwrap();
    assert_eq!(service.store.count().await.unwrap(), 1);
}
