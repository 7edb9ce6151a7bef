use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{BoxFuture, Shared};

use crate::fonts::backend::{FontBackend, FontdbBackend};
use crate::fonts::config::FontProvisionConfig;
use crate::fonts::fetch::{FontFetcher, HttpFontFetcher};
use crate::foundation::diag::soft_failure;

/// Size used for the functional measurement check.
const PROBE_SIZE_PX: f32 = 16.0;

/// Family chosen by a successful discovery; `None` when every tier came up empty.
type Discovery = Option<String>;

type Attempt = Shared<BoxFuture<'static, Discovery>>;

struct Provision {
    backend: Arc<dyn FontBackend>,
    fetcher: Option<Arc<dyn FontFetcher>>,
    config: FontProvisionConfig,
}

/// Process-wide, single-flight font discovery for the native text backend.
///
/// Concurrent callers of [`FontProvisioner::ensure_fonts`] await the same in-flight attempt. A
/// successful attempt is kept forever; a failed one is forgotten so the next call starts over.
pub struct FontProvisioner {
    provision: Arc<Provision>,
    attempt: Mutex<Option<Attempt>>,
}

impl std::fmt::Debug for FontProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontProvisioner")
            .field("config", &self.provision.config)
            .field("resolved_family", &self.resolved_family())
            .finish_non_exhaustive()
    }
}

impl FontProvisioner {
    /// Provisioner over `backend` without a network tier until [`Self::with_fetcher`] is called.
    pub fn new(backend: Arc<dyn FontBackend>, config: FontProvisionConfig) -> Self {
        Self {
            provision: Arc::new(Provision {
                backend,
                fetcher: None,
                config,
            }),
            attempt: Mutex::new(None),
        }
    }

    /// Attach the downloader used by the network tier.
    pub fn with_fetcher(self, fetcher: Arc<dyn FontFetcher>) -> Self {
        let provision = Provision {
            backend: self.provision.backend.clone(),
            fetcher: Some(fetcher),
            config: self.provision.config.clone(),
        };
        Self {
            provision: Arc::new(provision),
            attempt: Mutex::new(None),
        }
    }

    /// Shared provisioner over a [`FontdbBackend`] with default config and an HTTP fetcher.
    pub fn global() -> &'static FontProvisioner {
        static GLOBAL: OnceLock<FontProvisioner> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let config = FontProvisionConfig::default();
            let fetcher = HttpFontFetcher::new(&config);
            let provisioner = FontProvisioner::new(Arc::new(FontdbBackend::new()), config);
            match fetcher {
                Ok(fetcher) => provisioner.with_fetcher(Arc::new(fetcher)),
                Err(e) => {
                    soft_failure!("font_http_client", error = %e, "font download tier disabled");
                    provisioner
                }
            }
        })
    }

    /// Backend that discovered fonts are registered into.
    pub fn backend(&self) -> Arc<dyn FontBackend> {
        self.provision.backend.clone()
    }

    /// Family picked by the last successful discovery, if it has completed.
    pub fn resolved_family(&self) -> Option<String> {
        let slot = self.attempt.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .and_then(|attempt| attempt.peek())
            .and_then(|discovery| discovery.clone())
    }

    /// Make sure the backend has a usable font family.
    ///
    /// Never fails: every step degrades to a logged no-op and the result is `false` when nothing
    /// usable was found. File probing, the system scan, registration and the sanity measurement
    /// run on a dedicated thread; only the download is polled on the caller's executor.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_fonts(&self) -> bool {
        let attempt = {
            let mut slot = self.attempt.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(attempt) => attempt.clone(),
                None => {
                    let attempt = discover(self.provision.clone()).boxed().shared();
                    *slot = Some(attempt.clone());
                    attempt
                }
            }
        };

        let discovery = attempt.clone().await;
        if discovery.is_none() {
            let mut slot = self.attempt.lock().unwrap_or_else(PoisonError::into_inner);
            if slot
                .as_ref()
                .is_some_and(|current| Shared::ptr_eq(current, &attempt))
            {
                *slot = None;
            }
        }
        discovery.is_some()
    }
}

async fn discover(provision: Arc<Provision>) -> Discovery {
    let local = provision.clone();
    let found_locally = off_executor(move || register_local_fonts(&local))
        .await
        .unwrap_or(false);

    if !found_locally {
        match provision.fetcher.as_deref() {
            Some(fetcher) if provision.config.network_enabled => {
                download_fallback(&provision, fetcher).await;
            }
            _ => tracing::debug!("font download tier skipped"),
        }
    }

    let check = provision.clone();
    off_executor(move || sanity_check(check.backend.as_ref(), &check.config))
        .await
        .flatten()
}

/// Run blocking font IO on a dedicated thread and await its result. `None` if the thread could
/// not be started or panicked.
async fn off_executor<T, F>(task: F) -> Option<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let span = tracing::Span::current();
    let spawned = std::thread::Builder::new()
        .name("chartsnap-fonts".to_owned())
        .spawn(move || {
            let _entered = span.enter();
            let _ = tx.send(task());
        });
    if let Err(e) = spawned {
        soft_failure!("font_thread", error = %e, "font discovery thread not started");
        return None;
    }
    rx.await.ok()
}

/// Bundled font, system scan, then the first OS font path. `true` once any family is known.
fn register_local_fonts(provision: &Provision) -> bool {
    let backend = provision.backend.as_ref();
    let config = &provision.config;

    let initial = backend.family_names();
    tracing::debug!(families = initial.len(), "registered font families before discovery");

    match config.resolve_bundled_font() {
        Some(path) => {
            if let Err(e) = backend.register_font_file(&path) {
                soft_failure!("bundled_font", error = %e, "bundled font not registered");
            }
        }
        None => soft_failure!(
            "bundled_font",
            path = %config.bundled_font.display(),
            "bundled font missing"
        ),
    }

    backend.load_system_fonts();

    if backend.family_names().is_empty() {
        register_first_os_font(backend, &config.os_font_paths);
    }
    !backend.family_names().is_empty()
}

fn register_first_os_font(backend: &dyn FontBackend, paths: &[PathBuf]) {
    for path in paths.iter().filter(|p| p.is_file()) {
        match backend.register_font_file(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "registered OS font");
                return;
            }
            Err(e) => soft_failure!("os_font", error = %e, "OS font not registered"),
        }
    }
}

async fn download_fallback(provision: &Arc<Provision>, fetcher: &dyn FontFetcher) {
    let config = &provision.config;
    for url in &config.fallback_urls {
        match fetcher.fetch(url, config.max_download_bytes).await {
            Ok(bytes) => {
                let backend = provision.backend.clone();
                let registered = off_executor(move || register_downloaded(backend.as_ref(), bytes))
                    .await
                    .unwrap_or(false);
                if registered {
                    tracing::info!(%url, "registered downloaded fallback font");
                    return;
                }
            }
            Err(e) => soft_failure!("font_download", %url, error = %e, "font download failed"),
        }
    }
}

/// Register downloaded bytes through a kept temp file, or in memory if that fails.
fn register_downloaded(backend: &dyn FontBackend, bytes: Vec<u8>) -> bool {
    match write_temp_font(&bytes) {
        Ok(path) => match backend.register_font_file(&path) {
            Ok(()) => return true,
            Err(e) => soft_failure!("font_register_file", error = %e, "temp font not registered"),
        },
        Err(e) => soft_failure!("font_temp_file", error = %e, "temp font not written"),
    }
    match backend.register_font_bytes(bytes) {
        Ok(()) => true,
        Err(e) => {
            soft_failure!("font_register_bytes", error = %e, "in-memory font not registered");
            false
        }
    }
}

fn write_temp_font(bytes: &[u8]) -> std::io::Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("chartsnap-font-")
        .suffix(".ttf")
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}

fn sanity_check(backend: &dyn FontBackend, config: &FontProvisionConfig) -> Discovery {
    let families = backend.family_names();
    let family = config
        .preferred_families
        .iter()
        .find(|p| families.iter().any(|f| f.eq_ignore_ascii_case(p)))
        .or_else(|| families.first())?
        .clone();

    match backend.measure_text(&config.probe_text, Some(&family), PROBE_SIZE_PX, 400) {
        Ok(width) if width.is_finite() && width > 0.0 => {
            tracing::info!(%family, width, "native fonts ready");
            Some(family)
        }
        Ok(width) => {
            soft_failure!("font_sanity", %family, width, "probe text measured empty");
            None
        }
        Err(e) => {
            soft_failure!("font_sanity", %family, error = %e, "probe text not measurable");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/provision.rs"]
mod tests;
