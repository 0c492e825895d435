//! Single owned source of truth for what gets presented.
//!
//! Every mutation goes through a named transition; the presentation layer
//! only reads. Phases:
//!
//!   Idle ──begin──▶ Loading ──succeed──▶ Success
//!                      │                    │
//!                      └─────fail──▶ Error  │
//!   (Success and Error re-enter Loading on the next begin;
//!    begin is refused while a run is already in flight)

use crate::forecast::graphs::GraphUrls;
use crate::models::{AlignedRow, StockInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Everything a successful run produces, applied atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub current_price: String,
    pub rows: Vec<AlignedRow>,
    pub graphs: GraphUrls,
}

#[derive(Debug)]
pub struct ViewState {
    phase: Phase,
    stock_info: Option<StockInfo>,
    current_price: String,
    rows: Vec<AlignedRow>,
    graphs: GraphUrls,
    error: String,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            stock_info: None,
            current_price: String::new(),
            rows: Vec::new(),
            graphs: GraphUrls::default(),
            error: String::new(),
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    /// Enter `Loading`, dropping everything from the previous run. Refused
    /// (returns false, state untouched) while a run is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.phase == Phase::Loading {
            return false;
        }
        self.phase = Phase::Loading;
        self.stock_info = None;
        self.error.clear();
        self.clear_results();
        true
    }

    /// Record the metadata outcome while the run is still in flight.
    pub fn stock_info_loaded(&mut self, info: StockInfo) {
        debug_assert_eq!(self.phase, Phase::Loading);
        self.stock_info = Some(info);
        self.error.clear();
    }

    pub fn stock_info_failed(&mut self, message: impl Into<String>) {
        debug_assert_eq!(self.phase, Phase::Loading);
        self.stock_info = None;
        self.error = message.into();
    }

    /// Drop any interim message; the forecast outcome decides the run.
    pub fn clear_message(&mut self) {
        self.error.clear();
    }

    /// `Loading → Success`.
    pub fn succeed(&mut self, view: PredictionView) {
        debug_assert_eq!(self.phase, Phase::Loading);
        self.phase = Phase::Success;
        self.current_price = view.current_price;
        self.rows = view.rows;
        self.graphs = view.graphs;
        self.error.clear();
    }

    /// `Loading → Error`. A failed run keeps its message and nothing else.
    pub fn fail(&mut self, message: impl Into<String>) {
        debug_assert_eq!(self.phase, Phase::Loading);
        self.phase = Phase::Error;
        self.error = message.into();
        self.clear_results();
    }

    fn clear_results(&mut self) {
        self.current_price.clear();
        self.rows.clear();
        self.graphs = GraphUrls::default();
    }

    // ── Read access ───────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stock_info(&self) -> Option<&StockInfo> {
        self.stock_info.as_ref()
    }

    pub fn current_price(&self) -> &str {
        &self.current_price
    }

    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    pub fn graphs(&self) -> &GraphUrls {
        &self.graphs
    }

    pub fn error_message(&self) -> &str {
        &self.error
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
