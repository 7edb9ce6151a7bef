use serde::{Deserialize, Serialize};

/// One OHLCV bucket. Timestamps are Unix milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bucket start in Unix milliseconds; unique after reconciliation.
    #[serde(alias = "t")]
    pub timestamp_ms: i64,
    /// Open price.
    #[serde(alias = "o")]
    pub open: f64,
    /// High price.
    #[serde(alias = "h")]
    pub high: f64,
    /// Low price.
    #[serde(alias = "l")]
    pub low: f64,
    /// Close price.
    #[serde(alias = "c")]
    pub close: f64,
    /// Traded volume.
    #[serde(alias = "v")]
    pub volume: f64,
}

impl Bar {
    /// Bar from its timestamp and OHLCV values.
    pub const fn new(
        timestamp_ms: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp_ms,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Every price and the volume are finite.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }

    /// Close at or above open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// A batch of bars as delivered by a data source; may overlap other chunks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarChunk {
    /// Bars in source order.
    pub bars: Vec<Bar>,
}

impl From<Vec<Bar>> for BarChunk {
    fn from(bars: Vec<Bar>) -> Self {
        Self { bars }
    }
}

/// Net side of a position cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterDirection {
    /// Buyers.
    Long,
    /// Sellers.
    Short,
    /// Both sides.
    Mixed,
}

/// Pre-aggregated group of open positions drawn as one marker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Positions in the cluster.
    pub count: f64,
    /// Net side.
    pub direction: ClusterDirection,
    /// Mean entry price.
    #[serde(alias = "avgEntryPrice")]
    pub average_entry_price: f64,
    /// Mean open time in Unix milliseconds.
    #[serde(alias = "avgOpenedAt")]
    pub average_opened_at: f64,
    /// Sum of absolute position sizes.
    #[serde(alias = "totalAbsQty")]
    pub total_absolute_quantity: f64,
}

/// One moving-average sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaPoint {
    /// Timestamp of the bar that completed the window.
    pub timestamp_ms: i64,
    /// Mean close over the window.
    pub value: f64,
}

/// Everything one snapshot render needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequest {
    /// Instrument symbol shown in the header.
    pub symbol: String,
    /// Optional resolution label (e.g. `15m`) shown after the symbol.
    #[serde(default)]
    pub timeframe_label: Option<String>,
    /// Raw, possibly overlapping bar chunks.
    #[serde(default)]
    pub bar_chunks: Vec<BarChunk>,
    /// Inclusive window start in Unix milliseconds.
    pub from_ms: i64,
    /// Inclusive window end in Unix milliseconds.
    pub to_ms: i64,
    /// Position clusters to overlay.
    #[serde(default)]
    pub clusters: Vec<ClusterSummary>,
    /// Render time in Unix milliseconds.
    #[serde(alias = "now")]
    pub now_ms: i64,
}

impl SnapshotRequest {
    /// Request with no bars or clusters over `[from_ms, to_ms]`.
    pub fn new(symbol: impl Into<String>, from_ms: i64, to_ms: i64, now_ms: i64) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe_label: None,
            bar_chunks: Vec::new(),
            from_ms,
            to_ms,
            clusters: Vec::new(),
            now_ms,
        }
    }

    /// Append a bar chunk.
    pub fn with_chunk(mut self, chunk: impl Into<BarChunk>) -> Self {
        self.bar_chunks.push(chunk.into());
        self
    }

    /// Append a cluster.
    pub fn with_cluster(mut self, cluster: ClusterSummary) -> Self {
        self.clusters.push(cluster);
        self
    }

    /// Set the timeframe label.
    pub fn with_timeframe(mut self, label: impl Into<String>) -> Self {
        self.timeframe_label = Some(label.into());
        self
    }
}
