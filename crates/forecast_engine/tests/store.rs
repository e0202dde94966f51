use std::fs;
use std::sync::Arc;

use forecast_core::StateValue;
use forecast_engine::{Clock, JsonStateStore, MemoryStateStore, StateStore, StoreError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn fixed_clock() -> Clock {
    Arc::new(|| "2026-10-16T06:00:00+00:00".to_string())
}

#[test]
fn memory_store_acknowledges_every_write() {
    let mut store = MemoryStateStore::new(fixed_clock());
    store
        .set_state("forecast.clearSky", StateValue::Number(2.87))
        .unwrap();
    store.flush().unwrap();

    let state = store.get("forecast.clearSky").unwrap();
    assert_eq!(state.val, StateValue::Number(2.87));
    assert!(state.ack);
    assert_eq!(state.ts, "2026-10-16T06:00:00+00:00");
}

#[test]
fn json_store_starts_empty_when_file_is_missing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("states.json");
    let mut store = JsonStateStore::open(&path, fixed_clock()).unwrap();
    assert_eq!(store.path(), path.as_path());
    assert!(store.get("forecast.clearSky").is_none());

    // Nothing written, nothing to flush.
    store.flush().unwrap();
    assert!(!path.exists());
}

#[test]
fn json_store_round_trips_through_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("states.json");

    let mut store = JsonStateStore::open(&path, fixed_clock()).unwrap();
    store
        .set_state("forecast.realSky_min", StateValue::Number(0.91))
        .unwrap();
    store
        .set_state("forecast.forecastDate", StateValue::Text("17.10.2026".into()))
        .unwrap();
    store.set_state("forecast.home.clearSky", StateValue::Null).unwrap();
    store.flush().unwrap();

    let reopened = JsonStateStore::open(&path, fixed_clock()).unwrap();
    assert_eq!(
        reopened.get("forecast.realSky_min").unwrap().val,
        StateValue::Number(0.91)
    );
    assert_eq!(
        reopened.get("forecast.forecastDate").unwrap().val,
        StateValue::Text("17.10.2026".into())
    );
    assert_eq!(
        reopened.get("forecast.home.clearSky").unwrap().val,
        StateValue::Null
    );
}

#[test]
fn json_store_keeps_untouched_entries() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("states.json");
    fs::write(
        &path,
        r#"{"forecast.Region": {"val": "785", "ack": true, "ts": "2026-10-15T06:00:00+00:00"}}"#,
    )
    .unwrap();

    let mut store = JsonStateStore::open(&path, fixed_clock()).unwrap();
    store
        .set_state("forecast.clearSky", StateValue::Number(1.5))
        .unwrap();
    store.flush().unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["forecast.Region"]["val"], "785");
    assert_eq!(written["forecast.clearSky"]["val"], 1.5);
    assert_eq!(written["forecast.clearSky"]["ack"], true);
}

#[test]
fn json_store_rejects_corrupt_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("states.json");
    fs::write(&path, "not json").unwrap();

    let result = JsonStateStore::open(&path, fixed_clock());
    assert!(matches!(result, Err(StoreError::Parse { .. })));
}
