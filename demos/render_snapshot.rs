use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use chartsnap::{
    ChartOpts, FontProvisionConfig, FontProvisioner, FontdbBackend, HttpFontFetcher,
    SnapshotRenderer, SnapshotRequest,
};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "render_snapshot")]
struct Cli {
    /// Snapshot request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Text backend to use.
    #[arg(long, value_enum, default_value_t = TextChoice::Auto)]
    text: TextChoice,

    /// Font provisioning config JSON; defaults are used when omitted.
    #[arg(long)]
    font_config: Option<PathBuf>,

    /// Never download fallback fonts.
    #[arg(long)]
    no_network: bool,

    /// Moving-average period in bars.
    #[arg(long, default_value_t = 20)]
    ma_period: usize,

    /// Skip header, badge, axis labels and footer.
    #[arg(long)]
    no_labels: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TextChoice {
    /// Native fonts when discovery succeeds, bitmap font otherwise.
    Auto,
    /// Built-in bitmap font only.
    Bitmap,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let raw = std::fs::read_to_string(&cli.in_path)
        .with_context(|| format!("read request '{}'", cli.in_path.display()))?;
    let request: SnapshotRequest = serde_json::from_str(&raw).context("parse request JSON")?;

    let opts = ChartOpts::default()
        .with_ma_period(cli.ma_period)
        .with_labels(!cli.no_labels);

    let renderer = match cli.text {
        TextChoice::Bitmap => SnapshotRenderer::bitmap_only(opts)?,
        TextChoice::Auto => {
            let provisioner = provisioner(&cli)?;
            let ready = provisioner.ensure_fonts().await;
            tracing::info!(ready, family = ?provisioner.resolved_family(), "font discovery done");
            SnapshotRenderer::with_fonts(&provisioner, opts)?
        }
    };

    let png = renderer.render(&request)?;
    std::fs::write(&cli.out, &png)
        .with_context(|| format!("write '{}'", cli.out.display()))?;
    println!("wrote {} ({} bytes)", cli.out.display(), png.len());
    Ok(())
}

fn provisioner(cli: &Cli) -> anyhow::Result<FontProvisioner> {
    let mut config = match &cli.font_config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read font config '{}'", path.display()))?;
            FontProvisionConfig::from_json_str(&raw)?
        }
        None => FontProvisionConfig::default(),
    };
    if cli.no_network {
        config = config.without_network();
    }
    let fetcher = HttpFontFetcher::new(&config)?;
    Ok(FontProvisioner::new(Arc::new(FontdbBackend::new()), config).with_fetcher(Arc::new(fetcher)))
}
