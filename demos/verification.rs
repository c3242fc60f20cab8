//! Demonstrates standing a double in for a trait and verifying how it was used.
//!
//! Run with: cargo run --example verification

use testkit_doubles::prelude::*;

/// The collaborator the code under test depends on.
trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
}

/// A hand-written `Store` that forwards every call to a double.
struct DoubleStore(Double);

impl Store for DoubleStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.0.call("get", values![key])?;
        Ok(value.as_str().map(str::to_string))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.0.call("put", values![key, value]).map(|_| ())
    }
}

/// Code under test: read-through cache fill.
fn fetch_or_default(store: &dyn Store, key: &str) -> Result<String> {
    if let Some(value) = store.get(key)? {
        return Ok(value);
    }
    store.put(key, "default")?;
    Ok("default".to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("testkit_doubles=debug"))
        .init();

    println!("=== Scripted responses ===\n");

    let double = Double::new(Contract::new("Store", ["get", "put"]));
    double.returns_by_value("get", "cached", args!["known"])?;
    double.expect_at_least_once("get")?;
    double.expect_once_with("put", args!["unknown", "default"])?;

    let store = DoubleStore(double.clone());
    println!("known   -> {}", fetch_or_default(&store, "known")?);
    println!("unknown -> {}", fetch_or_default(&store, "unknown")?);

    println!("\n=== Verification ===\n");
    let report = double.verify(&TracingReporter);
    println!("{report}");

    println!("\n=== Scripted failure ===\n");
    let failing = Double::new(Contract::new("Store", ["get", "put"]));
    failing.throw_at(1, "get", Some(Fault::new("connection reset")))?;
    let store = DoubleStore(failing);
    for attempt in 0..3 {
        match fetch_or_default(&store, "key") {
            Ok(value) => println!("attempt {attempt}: {value}"),
            Err(err) => println!("attempt {attempt}: failed with {err}"),
        }
    }

    Ok(())
}
