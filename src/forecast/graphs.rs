//! Cache-busted URLs for the per-model diagnostic graphs.
//!
//! The backend regenerates graph images under stable paths on every
//! prediction run, so a browser (or anything else with an HTTP cache) would
//! keep showing the previous run. Appending a fresh `?t=` parameter per
//! response forces a new fetch. That is this module's whole job: it does not
//! validate or otherwise touch the paths.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Graph kind → display URL, one map per model variant. Kinds the backend
/// did not produce are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphUrls {
    pub lstm: BTreeMap<String, String>,
    pub xgboost: BTreeMap<String, String>,
    pub hybrid: BTreeMap<String, String>,
}

impl GraphUrls {
    pub fn is_empty(&self) -> bool {
        self.lstm.is_empty() && self.xgboost.is_empty() && self.hybrid.is_empty()
    }
}

/// Model suffixes the backend appends to graph keys.
const MODEL_SUFFIXES: [&str; 3] = ["_lstm", "_xgboost", "_weighted"];

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Resolve the three graph bundles of one prediction response. Every URL in
/// the result carries the same timestamp; two responses never share one.
pub fn resolve(
    lstm: &BTreeMap<String, String>,
    xgboost: &BTreeMap<String, String>,
    hybrid: &BTreeMap<String, String>,
) -> GraphUrls {
    let stamp = next_stamp();
    GraphUrls {
        lstm: bust(lstm, stamp),
        xgboost: bust(xgboost, stamp),
        hybrid: bust(hybrid, stamp),
    }
}

fn bust(bundle: &BTreeMap<String, String>, stamp: i64) -> BTreeMap<String, String> {
    bundle
        .iter()
        .map(|(key, path)| (graph_kind(key).to_string(), format!("{path}?t={stamp}")))
        .collect()
}

/// Backend graph key → kind: "actual_vs_predicted_lstm" → "actual_vs_predicted".
/// Keys without a model suffix ("comparison_predictions") pass through.
fn graph_kind(key: &str) -> &str {
    MODEL_SUFFIXES
        .iter()
        .find_map(|suffix| key.strip_suffix(suffix))
        .unwrap_or(key)
}

/// Millisecond wall-clock stamp, strictly increasing across calls so that
/// two responses resolved within the same millisecond still differ.
fn next_stamp() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut prev = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_STAMP.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => prev = observed,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
