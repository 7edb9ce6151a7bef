use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ChartError, ChartResult};

/// Upper bound for a downloaded fallback font (2.5 MB).
pub const DEFAULT_MAX_DOWNLOAD_BYTES: usize = 2_621_440;

/// Location of the font shipped with the crate, relative to the asset root.
pub const BUNDLED_FONT_REL_PATH: &str = "assets/fonts/DejaVuSans.ttf";

/// Settings for process-wide font discovery.
///
/// Every tier is best-effort; an empty list simply skips that tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontProvisionConfig {
    /// Font file shipped alongside the component. A relative path is looked up under
    /// `asset_root`, or next to the executable and then in the working directory.
    pub bundled_font: PathBuf,
    /// Directory the bundled font path is relative to.
    pub asset_root: Option<PathBuf>,
    /// Common OS font files, probed in order when discovery finds nothing.
    pub os_font_paths: Vec<PathBuf>,
    /// Fallback font URLs, tried in order; the first successful download wins.
    pub fallback_urls: Vec<String>,
    /// Whether the network tier may run at all.
    pub network_enabled: bool,
    /// Hard ceiling for a downloaded font body.
    pub max_download_bytes: usize,
    /// HTTP timeout in milliseconds.
    pub http_timeout_ms: u64,
    /// HTTP user agent.
    pub user_agent: String,
    /// Families preferred for chart text when present, in order.
    pub preferred_families: Vec<String>,
    /// Representative string measured by the sanity check.
    pub probe_text: String,
}

impl Default for FontProvisionConfig {
    fn default() -> Self {
        Self {
            bundled_font: PathBuf::from(BUNDLED_FONT_REL_PATH),
            asset_root: None,
            os_font_paths: [
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/TTF/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
                "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
                "/usr/share/fonts/noto/NotoSans-Regular.ttf",
                "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                "/Library/Fonts/Arial.ttf",
                "C:\\Windows\\Fonts\\arial.ttf",
                "C:\\Windows\\Fonts\\segoeui.ttf",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
            fallback_urls: vec![
                "https://github.com/google/fonts/raw/main/ofl/inter/Inter%5Bopsz,wght%5D.ttf"
                    .to_owned(),
                "https://github.com/dejavu-fonts/dejavu-fonts/raw/master/ttf/DejaVuSans.ttf"
                    .to_owned(),
                "https://github.com/googlefonts/noto-fonts/raw/main/hinted/ttf/NotoSans/NotoSans-Regular.ttf"
                    .to_owned(),
            ],
            network_enabled: true,
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
            http_timeout_ms: 15_000,
            user_agent: concat!("chartsnap/", env!("CARGO_PKG_VERSION")).to_owned(),
            preferred_families: vec![
                "Inter".to_owned(),
                "DejaVu Sans".to_owned(),
                "Liberation Sans".to_owned(),
                "Noto Sans".to_owned(),
                "Arial".to_owned(),
            ],
            probe_text: "BTCUSD 12345.67".to_owned(),
        }
    }
}

impl FontProvisionConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ChartError::validation(format!("invalid font provision config: {e}")))
    }

    /// Return the config with the network tier disabled.
    pub fn without_network(mut self) -> Self {
        self.network_enabled = false;
        self
    }

    /// Where to look for the bundled font, in order.
    pub fn bundled_font_candidates(&self) -> Vec<PathBuf> {
        let rel = &self.bundled_font;
        if rel.is_absolute() {
            return vec![rel.clone()];
        }
        if let Some(root) = &self.asset_root {
            return vec![root.join(rel)];
        }
        let mut out = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            out.push(dir.join(rel));
        }
        out.push(rel.clone());
        out
    }

    /// First existing bundled font candidate.
    pub fn resolve_bundled_font(&self) -> Option<PathBuf> {
        self.bundled_font_candidates()
            .into_iter()
            .find(|p| p.is_file())
    }

    /// HTTP timeout as a [`Duration`].
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}
