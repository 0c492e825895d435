//! Row alignment of the three model forecasts for tabular display.

pub mod graphs;

use crate::models::{AlignedRow, ForecastPoint};

/// Merge the per-model series into display rows.
///
/// The merge is positional and anchored on the LSTM series: one row per LSTM
/// point, the date taken from that point (calendar date only), the XGBoost
/// and hybrid columns read at the same index when it exists. A shorter series
/// leaves holes in its column rather than truncating the table. The backend
/// emits the three series index-congruent, so holes only appear when it
/// misbehaves.
///
/// The table is all-or-nothing: if any series came back empty, no rows are
/// produced at all.
pub fn align(
    lstm: &[ForecastPoint],
    xgboost: &[ForecastPoint],
    hybrid: &[ForecastPoint],
) -> Vec<AlignedRow> {
    if lstm.is_empty() || xgboost.is_empty() || hybrid.is_empty() {
        return Vec::new();
    }

    lstm.iter()
        .enumerate()
        .map(|(i, point)| AlignedRow {
            date: calendar_date(&point.date),
            lstm: point.value,
            xgboost: xgboost.get(i).map(|p| p.value),
            hybrid: hybrid.get(i).map(|p| p.value),
        })
        .collect()
}

/// "2025-08-07 00:00:00" → "2025-08-07"
fn calendar_date(date: &str) -> String {
    date.split_whitespace()
        .next()
        .unwrap_or(date)
        .to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
