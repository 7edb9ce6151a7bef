//! Chartsnap renders price-chart snapshots as standalone PNG images.
//!
//! A snapshot is one 1200x630 image with candlesticks, a moving average, community position
//! clusters and a few labels, meant to be attached to a chat message. Rendering is synchronous
//! CPU work over a privately owned pixel buffer:
//!
//! - Reconcile overlapping bar chunks ([`flatten_bars`]) and compute overlays ([`moving_average`])
//! - Draw primitives into a [`PixelBuffer`]
//! - Draw queued [`TextOp`]s through a [`TextLayer`]: native font rendering when a usable font is
//!   provisioned, a built-in 5x7 bitmap font otherwise
//! - Encode to PNG ([`encode_png`])
//!
//! Font discovery ([`FontProvisioner`]) is process-wide, single-flight and best-effort; it never
//! fails a render.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chart;
mod fonts;
mod foundation;
mod raster;
mod text;

pub use crate::chart::bars::{flatten_bars, is_valid_bar};
pub use crate::chart::clusters::{
    Consensus, cluster_color, cluster_radius, compute_consensus,
};
pub use crate::chart::compose::{
    ChartOpts, SnapshotRenderer, plot_rect, render_snapshot, render_snapshot_with_fonts,
};
pub use crate::chart::indicators::moving_average;
pub use crate::chart::labels::{format_day_label, format_price_label, format_updated_label};
pub use crate::chart::model::{
    Bar, BarChunk, ClusterDirection, ClusterSummary, MaPoint, SnapshotRequest,
};
pub use crate::chart::scale::{ChartScale, PriceDomain, TimeDomain};
pub use crate::chart::theme::{CANVAS_HEIGHT, CANVAS_WIDTH, Theme};
pub use crate::fonts::backend::{FaceRequest, FontBackend, FontdbBackend, LoadedFace};
pub use crate::fonts::config::{DEFAULT_MAX_DOWNLOAD_BYTES, FontProvisionConfig};
pub use crate::fonts::fetch::{FontFetcher, HttpFontFetcher};
pub use crate::fonts::provision::FontProvisioner;
pub use crate::foundation::error::{ChartError, ChartResult};
pub use crate::raster::buffer::PixelBuffer;
pub use crate::raster::color::{Rgb, Rgba8, hex_to_rgb};
pub use crate::raster::composite::{source_over, source_over_in_place};
pub use crate::raster::encode::encode_png;
pub use crate::text::bitmap::BitmapTextRenderer;
pub use crate::text::layer::{TextDrawReport, TextLayer, TextRenderer};
pub use crate::text::native::NativeTextRenderer;
pub use crate::text::op::{TextAlign, TextOp, TextShadow};
