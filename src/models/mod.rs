use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ── Request bodies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StockInfoRequest<'a> {
    pub symbol: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest<'a> {
    pub symbol: &'a str,
    pub forecast_days: u32,
}

// ── Stock metadata ────────────────────────────────────────────────────────────

/// Company card returned by `POST /stock-info`. Replaced wholesale on every
/// successful fetch, never patched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockInfo {
    pub name: String,
    pub symbol: String,
    pub exchange: String,
    pub sector: String,
    pub industry: String,
    #[serde(deserialize_with = "display_value")]
    pub market_cap: String,
    #[serde(deserialize_with = "display_value")]
    pub pe_ratio: String,
    #[serde(deserialize_with = "display_value")]
    pub all_time_high: String,
    #[serde(deserialize_with = "display_value")]
    pub all_time_low: String,
    #[serde(default)]
    pub about: String,
}

// ── Prediction payload ────────────────────────────────────────────────────────

/// One predicted price for one calendar day. `date` may carry a
/// time-of-day component, e.g. "2025-08-07 00:00:00".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub date: String,
    pub value: f64,
}

/// Forecast series plus diagnostic graph paths for one model variant.
/// Graph keys are backend-named (e.g. "actual_vs_predicted_lstm") and map
/// to raw image paths under `GET /graph/{path}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelOutput {
    #[serde(default)]
    pub forecast: Vec<ForecastPoint>,
    #[serde(default)]
    pub graphs: BTreeMap<String, String>,
}

/// Full body of a successful `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    #[serde(deserialize_with = "display_value")]
    pub current_price: String,
    pub lstm: ModelOutput,
    pub xgboost: ModelOutput,
    pub hybrid: ModelOutput,
}

// ── Display rows ──────────────────────────────────────────────────────────────

/// One table row of the merged forecast view. Anchored on the LSTM series;
/// the other two columns are `None` when their series run short.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AlignedRow {
    pub date: String,
    pub lstm: f64,
    pub xgboost: Option<f64>,
    pub hybrid: Option<f64>,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// The backend is loose about numeric display fields: market cap, P/E and
/// prices arrive as either a JSON string or a bare number. Keep them as the
/// string the user should see.
fn display_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
