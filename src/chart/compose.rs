use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::chart::bars::flatten_bars;
use crate::chart::clusters::{
    CLUSTER_SHADOW_OFFSET, Consensus, cluster_color, cluster_radius, compute_consensus,
};
use crate::chart::indicators::{MAX_MA_PERIOD, MIN_MA_PERIOD, moving_average};
use crate::chart::labels::{format_day_label, format_price_label, format_updated_label};
use crate::chart::model::{Bar, ClusterSummary, MaPoint, SnapshotRequest};
use crate::chart::scale::{ChartScale, PriceDomain, TimeDomain};
use crate::chart::theme::{
    CANVAS_HEIGHT, CANVAS_WIDTH, GRID_COLS, GRID_ROWS, PAD_BOTTOM, PAD_LEFT, PAD_RIGHT, PAD_TOP,
    PRICE_GUIDE_DASH_PX, PRICE_GUIDE_GAP_PX, Theme,
};
use crate::fonts::provision::FontProvisioner;
use crate::foundation::error::ChartResult;
use crate::foundation::math::round_px;
use crate::raster::buffer::PixelBuffer;
use crate::raster::color::Rgba8;
use crate::raster::encode::encode_png;
use crate::text::bitmap::GLYPH_ADVANCE;
use crate::text::layer::TextLayer;
use crate::text::op::{TextAlign, TextOp, TextShadow};

const SYMBOL_FONT: (f32, u16) = (26.0, 800);
const TIMEFRAME_FONT: (f32, u16) = (14.0, 600);
const BADGE_FONT: (f32, u16) = (14.0, 700);
const BADGE_VALUE_WEIGHT: u16 = 900;
const AXIS_FONT: (f32, u16) = (11.0, 600);

const BADGE_PREFIX: &str = "Market sentiment : ";
const BADGE_PAD_X: i32 = 12;
const BADGE_PAD_Y: i32 = 6;
/// Vertical center of the header band the badge sits in.
const HEADER_CENTER_Y: i32 = 30;

/// Chart rendering options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOpts {
    /// Moving-average window in bars, clamped to `[2, 200]` when used.
    pub ma_period: usize,
    /// Pixel scale of the bitmap fallback font.
    pub bitmap_scale: u32,
    /// Draw header, badge, axis labels and footer.
    pub draw_labels: bool,
}

impl Default for ChartOpts {
    fn default() -> Self {
        Self {
            ma_period: 20,
            bitmap_scale: 2,
            draw_labels: true,
        }
    }
}

impl ChartOpts {
    /// Set the moving-average window.
    pub fn with_ma_period(mut self, period: usize) -> Self {
        self.ma_period = period.clamp(MIN_MA_PERIOD, MAX_MA_PERIOD);
        self
    }

    /// Set the bitmap font scale (at least 1).
    pub fn with_bitmap_scale(mut self, scale: u32) -> Self {
        self.bitmap_scale = scale.max(1);
        self
    }

    /// Toggle text and badge decorations.
    pub fn with_labels(mut self, draw_labels: bool) -> Self {
        self.draw_labels = draw_labels;
        self
    }
}

/// Synchronous snapshot renderer. Reusable across requests; holds no per-request state.
pub struct SnapshotRenderer {
    opts: ChartOpts,
    theme: Theme,
    text: TextLayer,
}

impl std::fmt::Debug for SnapshotRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotRenderer")
            .field("opts", &self.opts)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl SnapshotRenderer {
    /// Renderer drawing text through `text`.
    pub fn new(opts: ChartOpts, text: TextLayer) -> ChartResult<Self> {
        Ok(Self {
            opts,
            theme: Theme::standard()?,
            text,
        })
    }

    /// Renderer that only ever uses the bitmap font.
    pub fn bitmap_only(opts: ChartOpts) -> ChartResult<Self> {
        Self::new(opts, TextLayer::bitmap_only(opts.bitmap_scale))
    }

    /// Renderer using native text over `provisioner`'s backend, with bitmap fallback.
    pub fn with_fonts(provisioner: &FontProvisioner, opts: ChartOpts) -> ChartResult<Self> {
        Self::new(
            opts,
            TextLayer::from_provisioner(provisioner, opts.bitmap_scale),
        )
    }

    /// Options in effect.
    pub fn opts(&self) -> ChartOpts {
        self.opts
    }

    /// Render `request` and encode it as PNG.
    #[tracing::instrument(skip_all, fields(symbol = %request.symbol))]
    pub fn render(&self, request: &SnapshotRequest) -> ChartResult<Vec<u8>> {
        let buffer = self.render_buffer(request)?;
        encode_png(&buffer)
    }

    /// Render `request` into a fresh buffer without encoding.
    pub fn render_buffer(&self, request: &SnapshotRequest) -> ChartResult<PixelBuffer> {
        let mut buf = PixelBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT)?;
        buf.clear(self.theme.background.opaque());
        let plot = plot_rect();
        draw_grid(&mut buf, plot, self.theme.grid);

        let bars = flatten_bars(&request.bar_chunks, request.from_ms, request.to_ms);
        if bars.len() < 2 {
            tracing::debug!(bars = bars.len(), "fewer than two bars; background and grid only");
            return Ok(buf);
        }
        let (Some(price), Some(time)) =
            (PriceDomain::from_bars(&bars), TimeDomain::from_bars(&bars))
        else {
            return Ok(buf);
        };
        let scale = ChartScale::new(plot, price, time);

        if let Some(last) = bars.last() {
            draw_price_guide(&mut buf, &scale, last.close, self.theme.price_guide);
        }
        draw_candles(&mut buf, &bars, &scale, &self.theme);
        let ma = moving_average(&bars, self.opts.ma_period);
        draw_moving_average(&mut buf, &ma, &scale, self.theme.moving_average.opaque());
        draw_clusters(&mut buf, &request.clusters, &scale, &self.theme);

        if self.opts.draw_labels {
            let consensus = compute_consensus(&request.clusters);
            let mut ops = Vec::new();
            self.queue_header(&mut ops, request);
            self.draw_badge(&mut buf, &mut ops, consensus);
            self.queue_axis_labels(&mut ops, &scale);
            self.queue_footer(&mut ops, request.now_ms);
            let report = self.text.draw_text_ops(&mut buf, &ops);
            tracing::debug!(
                ops = ops.len(),
                drew_with_canvas = report.drew_with_canvas,
                "labels drawn"
            );
        }

        tracing::debug!(
            bars = bars.len(),
            ma_points = ma.len(),
            clusters = request.clusters.len(),
            "snapshot rendered"
        );
        Ok(buf)
    }

    /// Width budget per character for text whose layout must fit either renderer.
    fn char_width(&self, native_estimate: i32) -> i32 {
        native_estimate.max((GLYPH_ADVANCE * self.opts.bitmap_scale.max(1)) as i32)
    }

    fn queue_header(&self, ops: &mut Vec<TextOp>, request: &SnapshotRequest) {
        let symbol = request.symbol.trim().to_uppercase();
        let x = PAD_LEFT as f32;
        let shadow = TextShadow {
            dx: 0.0,
            dy: 2.0,
            blur_px: 6.0,
            color: self.theme.text_shadow,
        };
        if !symbol.is_empty() {
            ops.push(
                TextOp::new(symbol.clone(), x, 16.0)
                    .with_font(SYMBOL_FONT.0, SYMBOL_FONT.1)
                    .with_shadow(shadow),
            );
        }

        let timeframe = request.timeframe_label.as_deref().map(str::trim).unwrap_or("");
        if !timeframe.is_empty() {
            let advance = self.char_width(17) * symbol.chars().count() as i32;
            ops.push(
                TextOp::new(timeframe, x + (advance + 14) as f32, 22.0)
                    .with_font(TIMEFRAME_FONT.0, TIMEFRAME_FONT.1)
                    .with_color(self.theme.axis_text)
                    .with_shadow(TextShadow {
                        blur_px: 4.0,
                        color: self.theme.text_shadow.with_alpha(140),
                        ..shadow
                    }),
            );
        }
    }

    /// Pill-shaped badge in the top-right: outline, inset body, prefix left, value right.
    fn draw_badge(&self, buf: &mut PixelBuffer, ops: &mut Vec<TextOp>, consensus: Consensus) {
        let label = consensus.label();
        let char_w = self.char_width((BADGE_FONT.0 * 0.58).round() as i32);
        let text_h = (BADGE_FONT.0 as i32).max((7 * self.opts.bitmap_scale.max(1)) as i32);
        let chars = (BADGE_PREFIX.chars().count() + label.chars().count()) as i32;

        let w = chars * char_w + BADGE_PAD_X * 2;
        let h = text_h + BADGE_PAD_Y * 2;
        let x = (CANVAS_WIDTH - PAD_RIGHT) as i32 - w;
        let y = HEADER_CENTER_Y - h / 2;
        fill_pill(buf, x, y, w, h, self.theme.badge_border);
        fill_pill(buf, x + 1, y + 1, w - 2, h - 2, self.theme.badge_fill);

        let text_y = (y + BADGE_PAD_Y) as f32;
        let shadow = TextShadow {
            dx: 0.0,
            dy: 1.0,
            blur_px: 3.0,
            color: self.theme.text_shadow.with_alpha(150),
        };
        ops.push(
            TextOp::new(BADGE_PREFIX, (x + BADGE_PAD_X) as f32, text_y)
                .with_font(BADGE_FONT.0, BADGE_FONT.1)
                .with_color(self.theme.badge_text)
                .with_shadow(shadow),
        );
        ops.push(
            TextOp::new(label, (x + w - BADGE_PAD_X) as f32, text_y)
                .with_align(TextAlign::Right)
                .with_font(BADGE_FONT.0, BADGE_VALUE_WEIGHT)
                .with_color(consensus.color(&self.theme).opaque())
                .with_shadow(shadow),
        );
    }

    fn queue_axis_labels(&self, ops: &mut Vec<TextOp>, scale: &ChartScale) {
        let plot = scale.plot();
        let price = scale.price();
        for i in 0..=GRID_ROWS {
            let frac = f64::from(i) / f64::from(GRID_ROWS);
            let gy = plot.y0 + plot.height() * frac;
            let value = price.hi - (price.hi - price.lo) * frac;
            ops.push(
                TextOp::new(
                    format_price_label(value),
                    (plot.x1 - 6.0) as f32,
                    (gy - 14.0) as f32,
                )
                .with_align(TextAlign::Right)
                .with_font(AXIS_FONT.0, AXIS_FONT.1)
                .with_color(self.theme.axis_text),
            );
        }

        let time = scale.time();
        let span = time.t1.saturating_sub(time.t0) as f64;
        let mut last_label = String::new();
        for i in 0..=GRID_COLS {
            let frac = f64::from(i) / f64::from(GRID_COLS);
            let t = time.t0.saturating_add((span * frac).round() as i64);
            let label = format_day_label(t, time.t0, time.t1);
            if label.is_empty() || label == last_label {
                continue;
            }
            let gx = plot.x0 + plot.width() * frac;
            ops.push(
                TextOp::new(label.clone(), (gx - 10.0) as f32, (plot.y1 + 8.0) as f32)
                    .with_font(AXIS_FONT.0, AXIS_FONT.1)
                    .with_color(self.theme.axis_text),
            );
            last_label = label;
        }
    }

    fn queue_footer(&self, ops: &mut Vec<TextOp>, now_ms: i64) {
        ops.push(
            TextOp::new(
                format_updated_label(now_ms),
                (CANVAS_WIDTH - PAD_RIGHT) as f32,
                (CANVAS_HEIGHT - 20) as f32,
            )
            .with_align(TextAlign::Right)
            .with_font(AXIS_FONT.0, AXIS_FONT.1)
            .with_color(self.theme.axis_text.with_alpha(150)),
        );
    }
}

/// Plot area inside the fixed paddings.
pub fn plot_rect() -> Rect {
    Rect::new(
        f64::from(PAD_LEFT),
        f64::from(PAD_TOP),
        f64::from(CANVAS_WIDTH - PAD_RIGHT),
        f64::from(CANVAS_HEIGHT - PAD_BOTTOM),
    )
}

fn draw_grid(buf: &mut PixelBuffer, plot: Rect, color: Rgba8) {
    let (x0, x1) = (round_px(plot.x0), round_px(plot.x1));
    let (y0, y1) = (round_px(plot.y0), round_px(plot.y1));
    for i in 0..=GRID_ROWS {
        let y = round_px(plot.y0 + plot.height() * f64::from(i) / f64::from(GRID_ROWS));
        buf.draw_line(x0, y, x1, y, color);
    }
    for i in 0..=GRID_COLS {
        let x = round_px(plot.x0 + plot.width() * f64::from(i) / f64::from(GRID_COLS));
        buf.draw_line(x, y0, x, y1, color);
    }
}

fn draw_price_guide(buf: &mut PixelBuffer, scale: &ChartScale, close: f64, color: Rgba8) {
    let y = scale.y(close);
    if !y.is_finite() {
        return;
    }
    let plot = scale.plot();
    buf.draw_dashed_hline(
        round_px(plot.x0),
        round_px(plot.x1),
        round_px(y),
        PRICE_GUIDE_DASH_PX,
        PRICE_GUIDE_GAP_PX,
        color,
    );
}

/// Candles are spaced by index, not time, so gaps in the series do not leave holes.
fn draw_candles(buf: &mut PixelBuffer, bars: &[Bar], scale: &ChartScale, theme: &Theme) {
    let plot = scale.plot();
    let step = plot.width() / bars.len() as f64;
    let half_w = ((0.6 * step / 2.0).floor() as i32).max(1);
    for (i, bar) in bars.iter().enumerate() {
        let x = round_px(plot.x0 + (i as f64 + 0.5) * step);
        let color = if bar.is_up() { theme.up } else { theme.down }.opaque();

        buf.draw_line(
            x,
            round_px(scale.y(bar.high)),
            x,
            round_px(scale.y(bar.low)),
            color,
        );

        // Bodies may run far off-canvas when a close lies outside its own high/low.
        let clamp_y = |y: f64| y.clamp(-1.0, f64::from(CANVAS_HEIGHT) + 1.0);
        let (y_open, y_close) = (clamp_y(scale.y(bar.open)), clamp_y(scale.y(bar.close)));
        let top = y_open.min(y_close);
        let height = round_px(y_open.max(y_close) - top).max(1);
        buf.fill_rect(x - half_w, round_px(top), half_w * 2, height, color);
    }
}

fn draw_moving_average(buf: &mut PixelBuffer, points: &[MaPoint], scale: &ChartScale, color: Rgba8) {
    let mapped: Vec<(i32, i32)> = points
        .iter()
        .map(|p| {
            (
                round_px(scale.x(p.timestamp_ms as f64)),
                round_px(scale.y(p.value)),
            )
        })
        .collect();
    for pair in mapped.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        buf.draw_line(x0, y0, x1, y1, color);
    }
}

fn draw_clusters(
    buf: &mut PixelBuffer,
    clusters: &[ClusterSummary],
    scale: &ChartScale,
    theme: &Theme,
) {
    for c in clusters {
        let x = scale.x(c.average_opened_at);
        let y = scale.y(c.average_entry_price);
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        let r = round_px(cluster_radius(c.total_absolute_quantity));
        buf.fill_circle(
            round_px(x + CLUSTER_SHADOW_OFFSET),
            round_px(y + CLUSTER_SHADOW_OFFSET),
            r,
            theme.cluster_shadow,
        );
        buf.fill_circle(
            round_px(x),
            round_px(y),
            r,
            cluster_color(c.direction, theme).opaque(),
        );
    }
}

/// Rectangle with fully rounded left and right ends.
fn fill_pill(buf: &mut PixelBuffer, x: i32, y: i32, w: i32, h: i32, color: Rgba8) {
    if w <= 0 || h <= 0 {
        return;
    }
    let r = (h / 2).max(1);
    buf.fill_rect(x + r, y, w - r * 2, h, color);
    buf.fill_circle(x + r, y + r, r, color);
    buf.fill_circle(x + w - r, y + r, r, color);
}

/// Render with whatever fonts the process-wide provisioner has found so far.
pub fn render_snapshot(request: &SnapshotRequest) -> ChartResult<Vec<u8>> {
    SnapshotRenderer::with_fonts(FontProvisioner::global(), ChartOpts::default())?.render(request)
}

/// Make sure fonts are provisioned, then render.
///
/// Font discovery never fails the render; without fonts the bitmap text is used.
pub async fn render_snapshot_with_fonts(request: &SnapshotRequest) -> ChartResult<Vec<u8>> {
    let provisioner = FontProvisioner::global();
    let fonts_ready = provisioner.ensure_fonts().await;
    tracing::debug!(fonts_ready, "font provisioning finished");
    SnapshotRenderer::with_fonts(provisioner, ChartOpts::default())?.render(request)
}

#[cfg(test)]
#[path = "../../tests/unit/chart/compose.rs"]
mod tests;
