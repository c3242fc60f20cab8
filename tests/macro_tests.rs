//! Integration tests for the `#[testkit_doubles::test]` macro.

#![cfg(feature = "macros")]

use std::sync::Once;

use testkit_doubles::prelude::*;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Basic test without scope injection.
#[testkit_doubles::test]
fn test_basic_sync() {
    assert_eq!(2 + 2, 4);
}

/// Basic async test without scope injection.
#[testkit_doubles::test]
async fn test_basic_async() {
    assert_eq!(2 + 2, 4);
}

/// Test with TestScope injection; the expectation is checked at teardown.
#[testkit_doubles::test]
fn test_with_scope(scope: TestScope) {
    init_tracing();
    let store = scope.double(Contract::new("Store", ["get", "put"]));
    store.returns_by_value("get", "value", args!["key"]).unwrap();
    store.expect_once_with("get", args!["key"]).unwrap();
    store.expect_never("put").unwrap();

    assert_eq!(store.call("get", values!["key"]).unwrap(), Value::from("value"));
}

/// An unmet expectation fails the test at teardown.
#[testkit_doubles::test]
#[should_panic(expected = "1 of 1 expectations failed")]
fn test_unmet_expectation_fails(scope: TestScope) {
    let store = scope.double(Contract::new("Store", ["get"]));
    store.expect_once("get").unwrap();
}

/// Two doubles with unmet expectations fail the test once.
#[testkit_doubles::test]
#[should_panic(expected = "2 of 2 expectations failed")]
fn test_two_unmet_doubles_fail(scope: TestScope) {
    let store = scope.double(Contract::new("Store", ["get"]));
    store.expect_once("get").unwrap();
    let cache = scope.double(Contract::new("Cache", ["put"]));
    cache.expect_at_least_once("put").unwrap();
}

/// Every failed expectation of every double is listed in one panic.
#[test]
fn test_teardown_lists_every_failure() {
    let panic = std::panic::catch_unwind(test_two_unmet_doubles_fail).unwrap_err();
    let message = panic
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_default();

    assert!(message.contains("2 of 2 expectations failed"), "{message}");
    assert!(message.contains("Store::get call count"), "{message}");
    assert!(message.contains("Cache::put call count"), "{message}");
}

/// With `verify = false` nothing is checked at teardown.
#[testkit_doubles::test(verify = false)]
fn test_verify_disabled(scope: TestScope) {
    let store = scope.double(Contract::new("Store", ["get"]));
    store.expect_once("get").unwrap();
    assert_eq!(scope.len(), 1);
}

/// Tests may return a `Result`.
#[testkit_doubles::test]
fn test_result_return(scope: TestScope) -> Result<()> {
    let store = scope.double(Contract::new("Store", ["get"]));
    store.expect_at_least_once("get")?;
    store.call("get", values![])?;
    Ok(())
}

/// Async test with TestScope injection.
#[testkit_doubles::test]
async fn test_async_with_scope(scope: TestScope) {
    init_tracing();
    let store = scope.double(Contract::new("Store", ["get"]));
    store.when("get").at(0).returns_by_value(1).unwrap();
    store.expect_call_count("get", 2).unwrap();

    let clone = store.clone();
    let first = tokio::spawn(async move { clone.call("get", values![]) })
        .await
        .unwrap()
        .unwrap();
    let second = store.call("get", values![]).unwrap();

    assert_eq!(first, Value::from(1));
    assert_eq!(second, Value::Null);
}

/// Test with multi_thread flavor.
#[testkit_doubles::test(flavor = "multi_thread")]
async fn test_multi_thread(scope: TestScope) {
    let counter = scope.double(Contract::new("Counter", ["tick"]));
    counter.expect_call_count("tick", 4).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let counter = counter.clone();
            tokio::spawn(async move { counter.call("tick", values![]) })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
}

/// Async tests may return a `Result` too.
#[testkit_doubles::test]
async fn test_async_result_return(scope: TestScope) -> Result<()> {
    let store = scope.double(Contract::new("Store", ["get"]));
    store.throw_on("get", None)?;
    store.expect_once("get")?;
    assert!(store.call("get", values![]).is_err());
    Ok(())
}
