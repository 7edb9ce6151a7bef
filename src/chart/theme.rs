use crate::foundation::error::ChartResult;
use crate::raster::color::{Rgb, Rgba8, hex_to_rgb};

/// Output width in pixels.
pub const CANVAS_WIDTH: u32 = 1200;
/// Output height in pixels.
pub const CANVAS_HEIGHT: u32 = 630;

/// Plot inset from the left edge.
pub const PAD_LEFT: u32 = 70;
/// Plot inset from the right edge.
pub const PAD_RIGHT: u32 = 40;
/// Plot inset from the top edge.
pub const PAD_TOP: u32 = 60;
/// Plot inset from the bottom edge.
pub const PAD_BOTTOM: u32 = 50;

/// Horizontal gridline bands.
pub const GRID_ROWS: u32 = 5;
/// Vertical gridline bands.
pub const GRID_COLS: u32 = 6;

/// Canvas fill.
pub const BACKGROUND_HEX: &str = "#0B1020";
/// Rising candles and long clusters.
pub const UP_HEX: &str = "#22C55E";
/// Falling candles and short clusters.
pub const DOWN_HEX: &str = "#EF4444";
/// Moving-average line.
pub const MA_HEX: &str = "#60A5FA";
/// Mixed clusters.
pub const MIXED_HEX: &str = "#A78BFA";

/// Current-price guide dash length.
pub const PRICE_GUIDE_DASH_PX: u32 = 10;
/// Current-price guide gap length.
pub const PRICE_GUIDE_GAP_PX: u32 = 6;

/// Resolved chart palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Canvas fill.
    pub background: Rgb,
    /// Rising candles, long clusters, BUY label.
    pub up: Rgb,
    /// Falling candles, short clusters, SELL label.
    pub down: Rgb,
    /// Moving-average line.
    pub moving_average: Rgb,
    /// Mixed clusters and label.
    pub mixed: Rgb,
    /// Gridlines.
    pub grid: Rgba8,
    /// Dashed current-price guide.
    pub price_guide: Rgba8,
    /// Offset disc beneath each cluster marker.
    pub cluster_shadow: Rgba8,
    /// Axis labels and footer.
    pub axis_text: Rgba8,
    /// Header text shadow.
    pub text_shadow: Rgba8,
    /// Sentiment badge outline.
    pub badge_border: Rgba8,
    /// Sentiment badge body.
    pub badge_fill: Rgba8,
    /// Sentiment badge prefix text.
    pub badge_text: Rgba8,
}

impl Theme {
    /// The fixed snapshot palette.
    pub fn standard() -> ChartResult<Self> {
        Ok(Self {
            background: hex_to_rgb(BACKGROUND_HEX)?,
            up: hex_to_rgb(UP_HEX)?,
            down: hex_to_rgb(DOWN_HEX)?,
            moving_average: hex_to_rgb(MA_HEX)?,
            mixed: hex_to_rgb(MIXED_HEX)?,
            grid: Rgba8::WHITE.with_opacity(0.06),
            price_guide: Rgba8::new(239, 68, 68, 128),
            cluster_shadow: Rgba8::BLACK.with_opacity(0.35),
            axis_text: Rgba8::WHITE.with_opacity(0.78),
            text_shadow: Rgba8::new(0, 0, 0, 170),
            badge_border: Rgba8::new(255, 255, 255, 44),
            badge_fill: Rgba8::new(2, 6, 23, 210),
            badge_text: Rgba8::new(226, 232, 240, 255),
        })
    }
}
