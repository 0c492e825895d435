pub mod response;

use crate::config::ApiConfig;
use crate::models::{PredictRequest, PredictionResponse, StockInfo, StockInfoRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Failure modes of one backend call. `Transport` means the call itself did
/// not complete; `Backend` is a well-formed reply carrying an in-band error
/// message; `Decode` is a reply that matches neither shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Backend(String),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable backend abstraction.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn stock_info(&self, symbol: &str) -> Result<StockInfo, ApiError>;
    async fn predict(&self, symbol: &str, forecast_days: u32)
        -> Result<PredictionResponse, ApiError>;
}

// ── Prediction service client ─────────────────────────────────────────────────

pub struct ForecastApiClient {
    inner: reqwest::Client,
    base: Url,
    stock_info_url: Url,
    predict_url: Url,
}

impl ForecastApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base = Url::parse(&base)
            .with_context(|| format!("Invalid base URL {:?}", config.base_url))?;

        Ok(Self {
            stock_info_url: base.join("stock-info")?,
            predict_url: base.join("predict")?,
            inner,
            base,
        })
    }

    /// Full display URL for a graph image path from a prediction response.
    /// The target is opaque: fetched by whatever shows the image, never parsed.
    pub fn graph_url(&self, path: &str) -> String {
        format!("{}graph/{}", self.base, path.trim_start_matches('/'))
    }

    /// POST a JSON body and hand back the raw JSON reply. The service reports
    /// failures in the body, not the status line, so the body is parsed
    /// whatever the status code was.
    async fn post_json<B: Serialize>(&self, url: &Url, body: &B) -> Result<Value, ApiError> {
        debug!("POST {}", url);
        let resp = self.inner.post(url.clone()).json(body).send().await?;
        Ok(resp.json::<Value>().await?)
    }
}

#[async_trait]
impl ForecastSource for ForecastApiClient {
    async fn stock_info(&self, symbol: &str) -> Result<StockInfo, ApiError> {
        let raw = self
            .post_json(&self.stock_info_url, &StockInfoRequest { symbol })
            .await?;
        response::decode(raw)
    }

    async fn predict(
        &self,
        symbol: &str,
        forecast_days: u32,
    ) -> Result<PredictionResponse, ApiError> {
        let raw = self
            .post_json(
                &self.predict_url,
                &PredictRequest {
                    symbol,
                    forecast_days,
                },
            )
            .await?;
        response::decode(raw)
    }
}
