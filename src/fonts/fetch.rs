use anyhow::Context;
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::fonts::config::FontProvisionConfig;
use crate::foundation::error::{ChartError, ChartResult};

/// Downloads fallback font files.
pub trait FontFetcher: Send + Sync {
    /// Fetch `url`, failing once the body would exceed `max_bytes`.
    fn fetch<'a>(&'a self, url: &'a str, max_bytes: usize) -> BoxFuture<'a, ChartResult<Vec<u8>>>;
}

/// HTTPS fetcher on `reqwest` (rustls).
#[derive(Clone, Debug)]
pub struct HttpFontFetcher {
    client: reqwest::Client,
}

impl HttpFontFetcher {
    /// Build a client honoring the configured timeout and user agent.
    pub fn new(config: &FontProvisionConfig) -> ChartResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

impl FontFetcher for HttpFontFetcher {
    fn fetch<'a>(&'a self, url: &'a str, max_bytes: usize) -> BoxFuture<'a, ChartResult<Vec<u8>>> {
        async move {
            let mut resp = self
                .client
                .get(url)
                .send()
                .await
                .with_context(|| format!("GET {url}"))?
                .error_for_status()
                .with_context(|| format!("GET {url}"))?;

            if let Some(len) = resp.content_length()
                && len > max_bytes as u64
            {
                return Err(ChartError::font(format!(
                    "{url}: content-length {len} exceeds {max_bytes} bytes"
                )));
            }

            let mut body = Vec::new();
            while let Some(chunk) = resp
                .chunk()
                .await
                .with_context(|| format!("read body of {url}"))?
            {
                if body.len() + chunk.len() > max_bytes {
                    return Err(ChartError::font(format!(
                        "{url}: body exceeds {max_bytes} bytes"
                    )));
                }
                body.extend_from_slice(&chunk);
            }
            if body.is_empty() {
                return Err(ChartError::font(format!("{url}: empty body")));
            }
            Ok(body)
        }
        .boxed()
    }
}
