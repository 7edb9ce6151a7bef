use serde::{Deserialize, Serialize};

use crate::chart::model::{ClusterDirection, ClusterSummary};
use crate::chart::theme::Theme;
use crate::raster::color::Rgb;

/// Smallest marker radius in pixels.
pub const MIN_CLUSTER_RADIUS: f64 = 6.0;
/// Largest marker radius in pixels.
pub const MAX_CLUSTER_RADIUS: f64 = 18.0;
/// Offset of the marker shadow on both axes.
pub const CLUSTER_SHADOW_OFFSET: f64 = 2.0;

/// Marker radius: `6 + 6 * log10(max(1, qty))`, clamped to `[6, 18]`.
pub fn cluster_radius(total_absolute_quantity: f64) -> f64 {
    let qty = total_absolute_quantity.max(1.0);
    (MIN_CLUSTER_RADIUS + 6.0 * qty.log10()).clamp(MIN_CLUSTER_RADIUS, MAX_CLUSTER_RADIUS)
}

/// Marker fill for a direction.
pub fn cluster_color(direction: ClusterDirection, theme: &Theme) -> Rgb {
    match direction {
        ClusterDirection::Mixed => theme.mixed,
        ClusterDirection::Short => theme.down,
        ClusterDirection::Long => theme.up,
    }
}

/// Community sentiment shown in the header badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Consensus {
    /// More long positions than short.
    Buy,
    /// More short positions than long.
    Sell,
    /// Balanced, including no clusters at all.
    Mixed,
}

impl Consensus {
    /// Badge label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Mixed => "MIXED",
        }
    }

    /// Label color.
    pub fn color(self, theme: &Theme) -> Rgb {
        match self {
            Self::Buy => theme.up,
            Self::Sell => theme.down,
            Self::Mixed => theme.mixed,
        }
    }
}

/// Weigh clusters by position count; a missing or non-positive count weighs 1. Mixed clusters
/// count towards the long side.
pub fn compute_consensus(clusters: &[ClusterSummary]) -> Consensus {
    let (mut long, mut short) = (0.0f64, 0.0f64);
    for c in clusters {
        let n = if c.count.is_finite() && c.count > 0.0 {
            c.count
        } else {
            1.0
        };
        match c.direction {
            ClusterDirection::Short => short += n,
            ClusterDirection::Long | ClusterDirection::Mixed => long += n,
        }
    }
    if long == short {
        Consensus::Mixed
    } else if long > short {
        Consensus::Buy
    } else {
        Consensus::Sell
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/clusters.rs"]
mod tests;
