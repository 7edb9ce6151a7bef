use kurbo::{Affine, Point, Rect};

use crate::chart::model::Bar;

/// Padded price range of a bar series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceDomain {
    /// Bottom of the plot.
    pub lo: f64,
    /// Top of the plot.
    pub hi: f64,
}

impl PriceDomain {
    /// `[min(low), max(high)]` widened by 6% of the range on both sides. A collapsed range is
    /// widened by 0.2% of the high instead, never less than `1e-6`.
    pub fn from_bars(bars: &[Bar]) -> Option<Self> {
        let min = bars.iter().map(|b| b.low).reduce(f64::min)?;
        let max = bars.iter().map(|b| b.high).reduce(f64::max)?;
        let mut pad = (max - min) * 0.06;
        if pad == 0.0 || !pad.is_finite() {
            pad = (max * 0.002).max(1e-6);
        }
        Some(Self {
            lo: min - pad,
            hi: max + pad,
        })
    }

    /// Width of the domain, `1` when it collapses.
    pub fn span(&self) -> f64 {
        let span = self.hi - self.lo;
        if span == 0.0 { 1.0 } else { span }
    }
}

/// First and last bar timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeDomain {
    /// Left edge in Unix milliseconds.
    pub t0: i64,
    /// Right edge in Unix milliseconds.
    pub t1: i64,
}

impl TimeDomain {
    /// Span of an ascending series; `None` when empty.
    pub fn from_bars(bars: &[Bar]) -> Option<Self> {
        Some(Self {
            t0: bars.first()?.timestamp_ms,
            t1: bars.last()?.timestamp_ms,
        })
    }

    /// Width in milliseconds, floored at 1.
    pub fn span_ms(&self) -> f64 {
        (self.t1.saturating_sub(self.t0) as f64).max(1.0)
    }
}

/// Maps `(time, price)` onto the plot rectangle.
///
/// Inputs are shifted to the domain origin before the affine is applied so large millisecond
/// timestamps keep their precision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartScale {
    plot: Rect,
    price: PriceDomain,
    time: TimeDomain,
    to_plot: Affine,
}

impl ChartScale {
    /// Scale mapping the domains onto `plot`, price increasing upwards.
    pub fn new(plot: Rect, price: PriceDomain, time: TimeDomain) -> Self {
        let to_plot = Affine::translate((plot.x0, plot.y0))
            * Affine::scale_non_uniform(
                plot.width() / time.span_ms(),
                -plot.height() / price.span(),
            );
        Self {
            plot,
            price,
            time,
            to_plot,
        }
    }

    /// Plot rectangle.
    pub fn plot(&self) -> Rect {
        self.plot
    }

    /// Price domain.
    pub fn price(&self) -> PriceDomain {
        self.price
    }

    /// Time domain.
    pub fn time(&self) -> TimeDomain {
        self.time
    }

    /// Plot-space point for `(t_ms, price)`; non-finite inputs give non-finite output.
    pub fn point(&self, t_ms: f64, price: f64) -> Point {
        self.to_plot * Point::new(t_ms - self.time.t0 as f64, price - self.price.hi)
    }

    /// Plot x for a timestamp.
    pub fn x(&self, t_ms: f64) -> f64 {
        self.point(t_ms, self.price.hi).x
    }

    /// Plot y for a price.
    pub fn y(&self, price: f64) -> f64 {
        self.point(self.time.t0 as f64, price).y
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/scale.rs"]
mod tests;
