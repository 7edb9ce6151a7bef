use std::collections::VecDeque;

use crate::chart::model::{Bar, MaPoint};

/// Smallest accepted moving-average window.
pub const MIN_MA_PERIOD: usize = 2;
/// Largest accepted moving-average window.
pub const MAX_MA_PERIOD: usize = 200;

/// Trailing window with a running sum; O(1) per sample.
#[derive(Clone, Debug)]
struct SmaWindow {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
}

impl SmaWindow {
    fn new(period: usize) -> Self {
        Self {
            period,
            window: VecDeque::with_capacity(period + 1),
            sum: 0.0,
        }
    }

    fn push(&mut self, v: f64) -> Option<f64> {
        self.window.push_back(v);
        self.sum += v;
        if self.window.len() > self.period
            && let Some(old) = self.window.pop_front()
        {
            self.sum -= old;
        }
        (self.window.len() == self.period).then(|| self.sum / self.period as f64)
    }
}

/// Simple moving average of closes; the period is clamped to `[2, 200]`.
///
/// The first point is emitted at the bar that completes the first full window.
pub fn moving_average(bars: &[Bar], period: usize) -> Vec<MaPoint> {
    let period = period.clamp(MIN_MA_PERIOD, MAX_MA_PERIOD);
    let mut sma = SmaWindow::new(period);
    bars.iter()
        .filter_map(|bar| {
            sma.push(bar.close).map(|value| MaPoint {
                timestamp_ms: bar.timestamp_ms,
                value,
            })
        })
        .collect()
}
