//! Prediction pipeline: ties the forecast API → view state together.
//!
//! One `trigger()` drives the full request cycle:
//!   1. Validate the free-text day count; nothing runs on bad input.
//!   2. Enter `Loading`, dropping any previous run's data. A trigger that
//!      arrives while a run is in flight is refused, not raced.
//!   3. Fetch stock metadata. A failure here is recorded but not fatal:
//!      the metadata card is enrichment, the forecast is the product, so
//!      the prediction call is issued either way.
//!   4. Fetch the prediction; align the three model series; resolve
//!      cache-busted graph URLs (one shared stamp per response).
//!   5. Settle in `Success` or `Error`. Never left in `Loading`.
//!
//! No retries, no caching of past results.

use crate::api::ForecastSource;
use crate::forecast::{self, graphs};
use crate::view::{Phase, PredictionView, ViewState};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Refusals raised before any network call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TriggerError {
    #[error("forecast days must be a positive whole number, got {0:?}")]
    InvalidDays(String),

    #[error("a prediction is already in flight")]
    Busy,
}

pub struct PredictionPipeline<S> {
    source: S,
    state: ViewState,
}

impl<S: ForecastSource> PredictionPipeline<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: ViewState::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one full prediction cycle for `symbol`. `days_input` is the raw
    /// text of the day-count field. On `Ok` the returned phase is always
    /// `Success` or `Error`; backend failures land in the view state, not
    /// in the `Err` channel.
    pub async fn trigger(&mut self, symbol: &str, days_input: &str) -> Result<Phase, TriggerError> {
        let forecast_days = parse_forecast_days(days_input)?;

        if !self.state.begin() {
            return Err(TriggerError::Busy);
        }

        // Metadata first. Its outcome is observed before the forecast call
        // but does not gate it.
        match self.source.stock_info(symbol).await {
            Ok(stock_info) => {
                debug!("{}: metadata for {}", symbol, stock_info.name);
                self.state.stock_info_loaded(stock_info);
            }
            Err(e) => {
                warn!("{}: stock info failed: {}", symbol, e);
                self.state.stock_info_failed(e.to_string());
            }
        }

        self.state.clear_message();

        match self.source.predict(symbol, forecast_days).await {
            Ok(resp) => {
                let rows = forecast::align(
                    &resp.lstm.forecast,
                    &resp.xgboost.forecast,
                    &resp.hybrid.forecast,
                );
                let graph_urls =
                    graphs::resolve(&resp.lstm.graphs, &resp.xgboost.graphs, &resp.hybrid.graphs);

                info!(
                    "{}: {} day(s) requested, {} aligned row(s)",
                    symbol,
                    forecast_days,
                    rows.len()
                );
                self.state.succeed(PredictionView {
                    current_price: resp.current_price,
                    rows,
                    graphs: graph_urls,
                });
            }
            Err(e) => {
                warn!("{}: prediction failed: {}", symbol, e);
                self.state.fail(e.to_string());
            }
        }

        Ok(self.state.phase())
    }
}

/// Free-text day count from the form, rejected up front instead of being
/// sent to the backend to fail there.
pub fn parse_forecast_days(input: &str) -> Result<u32, TriggerError> {
    match input.trim().parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(TriggerError::InvalidDays(input.to_string())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::{ForecastPoint, ModelOutput, PredictionResponse, StockInfo};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Deterministic in-memory backend standing in for the HTTP client.
    #[derive(Default)]
    struct FakeSource {
        info_error: Option<String>,
        predict_error: Option<String>,
        points: usize,
        calls: Mutex<Vec<&'static str>>,
    }

    fn sample_info() -> StockInfo {
        StockInfo {
            name: "Apple Inc.".into(),
            symbol: "AAPL".into(),
            exchange: "NASDAQ".into(),
            sector: "Technology".into(),
            industry: "Consumer Electronics".into(),
            market_cap: "2.9T".into(),
            pe_ratio: "29.4".into(),
            all_time_high: "237.23".into(),
            all_time_low: "0.049".into(),
            about: "Designs and sells consumer electronics.".into(),
        }
    }

    fn sample_series(n: usize, offset: f64) -> Vec<ForecastPoint> {
        (0..n)
            .map(|i| ForecastPoint {
                date: format!("2025-08-{:02} 00:00:00", 7 + i),
                value: offset + i as f64,
            })
            .collect()
    }

    fn sample_response(points: usize) -> PredictionResponse {
        let graphs: BTreeMap<String, String> = [
            ("forecasted_prices_lstm", "lstm/fp.png"),
            ("actual_vs_predicted_lstm", "lstm/avp.png"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        PredictionResponse {
            current_price: "123.45".into(),
            lstm: ModelOutput {
                forecast: sample_series(points, 100.0),
                graphs,
            },
            xgboost: ModelOutput {
                forecast: sample_series(points, 200.0),
                graphs: BTreeMap::new(),
            },
            hybrid: ModelOutput {
                forecast: sample_series(points, 300.0),
                graphs: BTreeMap::new(),
            },
        }
    }

    #[async_trait]
    impl ForecastSource for FakeSource {
        async fn stock_info(&self, _symbol: &str) -> Result<StockInfo, ApiError> {
            self.calls.lock().unwrap().push("stock-info");
            match &self.info_error {
                Some(msg) => Err(ApiError::Backend(msg.clone())),
                None => Ok(sample_info()),
            }
        }

        async fn predict(
            &self,
            _symbol: &str,
            _forecast_days: u32,
        ) -> Result<PredictionResponse, ApiError> {
            self.calls.lock().unwrap().push("predict");
            match &self.predict_error {
                Some(msg) => Err(ApiError::Backend(msg.clone())),
                None => Ok(sample_response(self.points)),
            }
        }
    }

    fn pipeline(source: FakeSource) -> PredictionPipeline<FakeSource> {
        PredictionPipeline::new(source)
    }

    #[test]
    fn day_count_must_be_a_positive_whole_number() {
        assert_eq!(parse_forecast_days(" 7 "), Ok(7));
        assert!(matches!(
            parse_forecast_days("soon"),
            Err(TriggerError::InvalidDays(_))
        ));
        assert!(matches!(
            parse_forecast_days("0"),
            Err(TriggerError::InvalidDays(_))
        ));
        assert!(matches!(
            parse_forecast_days("-3"),
            Err(TriggerError::InvalidDays(_))
        ));
        assert!(matches!(
            parse_forecast_days("2.5"),
            Err(TriggerError::InvalidDays(_))
        ));
    }

    #[tokio::test]
    async fn invalid_input_makes_no_calls_and_no_state_change() {
        let mut pipe = pipeline(FakeSource {
            points: 5,
            ..FakeSource::default()
        });

        let result = pipe.trigger("AAPL", "soon").await;

        assert!(matches!(result, Err(TriggerError::InvalidDays(_))));
        assert_eq!(pipe.state().phase(), Phase::Idle);
        assert!(pipe.source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn clean_success_populates_the_full_view() {
        let mut pipe = pipeline(FakeSource {
            points: 5,
            ..FakeSource::default()
        });

        let phase = pipe.trigger("AAPL", "7").await.unwrap();

        assert_eq!(phase, Phase::Success);
        assert_eq!(pipe.state().current_price(), "123.45");
        assert_eq!(pipe.state().rows().len(), 5);
        assert_eq!(pipe.state().rows()[0].date, "2025-08-07");
        assert_eq!(pipe.state().stock_info().unwrap().name, "Apple Inc.");
        assert_eq!(pipe.state().graphs().lstm.len(), 2);
        assert_eq!(
            *pipe.source.calls.lock().unwrap(),
            vec!["stock-info", "predict"]
        );
    }

    #[tokio::test]
    async fn stock_info_failure_still_issues_the_prediction() {
        let mut pipe = pipeline(FakeSource {
            info_error: Some("Invalid stock symbol".into()),
            points: 3,
            ..FakeSource::default()
        });

        let phase = pipe.trigger("NOPE", "7").await.unwrap();

        assert_eq!(
            *pipe.source.calls.lock().unwrap(),
            vec!["stock-info", "predict"]
        );
        assert_eq!(phase, Phase::Success);
        assert!(pipe.state().stock_info().is_none());
        assert_eq!(pipe.state().rows().len(), 3);
        // The interim metadata message does not outlive a successful forecast.
        assert!(pipe.state().error_message().is_empty());
    }

    #[tokio::test]
    async fn prediction_failure_wins_regardless_of_metadata_outcome() {
        let mut pipe = pipeline(FakeSource {
            info_error: Some("Invalid stock symbol".into()),
            predict_error: Some("Not enough historical data".into()),
            ..FakeSource::default()
        });

        let phase = pipe.trigger("NOPE", "7").await.unwrap();

        assert_eq!(phase, Phase::Error);
        assert_eq!(pipe.state().error_message(), "Not enough historical data");
        assert!(pipe.state().current_price().is_empty());
        assert!(pipe.state().rows().is_empty());
        assert!(pipe.state().graphs().is_empty());
    }

    #[tokio::test]
    async fn replay_is_identical_up_to_the_cache_stamp() {
        let mut pipe = pipeline(FakeSource {
            points: 4,
            ..FakeSource::default()
        });

        pipe.trigger("AAPL", "7").await.unwrap();
        let first_rows = pipe.state().rows().to_vec();
        let first_price = pipe.state().current_price().to_string();
        let first_stamp = pipe.state().graphs().lstm["forecasted_prices"].clone();

        pipe.trigger("AAPL", "7").await.unwrap();

        assert_eq!(pipe.state().phase(), Phase::Success);
        assert_eq!(pipe.state().rows(), first_rows.as_slice());
        assert_eq!(pipe.state().current_price(), first_price);

        let second_stamp = &pipe.state().graphs().lstm["forecasted_prices"];
        assert_ne!(*second_stamp, first_stamp);
        assert!(first_stamp.starts_with("lstm/fp.png?t="));
        assert!(second_stamp.starts_with("lstm/fp.png?t="));
    }

    #[test]
    fn empty_series_means_success_with_no_rows() {
        tokio_test::block_on(async {
            let mut pipe = pipeline(FakeSource {
                points: 0,
                ..FakeSource::default()
            });

            let phase = pipe.trigger("AAPL", "7").await.unwrap();

            assert_eq!(phase, Phase::Success);
            assert!(pipe.state().rows().is_empty());
            assert_eq!(pipe.state().current_price(), "123.45");
        });
    }
}
